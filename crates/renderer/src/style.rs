//! Per-polygon styling for outlook layers.
//!
//! Defaults come from each record's `fill` and `stroke` attributes. The
//! hazard then adjusts them: significant-severe layers are hatched with no
//! fill, dry thunderstorm layers are cross-hatched with no fill. Caller
//! overrides are applied last and replace the derived value for the whole
//! layer.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use outlook_common::{Color, GeometryRecord, Hazard, Hatch, OutlookError, OutlookResult};

/// Caller-supplied style options. Every set field wins over derived values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleOverrides {
    pub facecolor: Option<Color>,
    pub edgecolor: Option<Color>,
    pub hatch: Option<Hatch>,
    pub linewidth: Option<f64>,
    pub alpha: Option<f64>,
    pub zorder: Option<f64>,
}

impl StyleOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_facecolor(mut self, color: impl Into<Color>) -> Self {
        self.facecolor = Some(color.into());
        self
    }

    pub fn with_edgecolor(mut self, color: impl Into<Color>) -> Self {
        self.edgecolor = Some(color.into());
        self
    }

    pub fn with_hatch(mut self, pattern: impl Into<String>) -> Self {
        self.hatch = Some(Hatch::new(pattern));
        self
    }

    pub fn with_linewidth(mut self, linewidth: f64) -> Self {
        self.linewidth = Some(linewidth);
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = Some(alpha);
        self
    }

    pub fn with_zorder(mut self, zorder: f64) -> Self {
        self.zorder = Some(zorder);
        self
    }

    pub fn validate(&self) -> OutlookResult<()> {
        if let Some(alpha) = self.alpha {
            if !(0.0..=1.0).contains(&alpha) {
                return Err(OutlookError::invalid(
                    "alpha",
                    format!("{} is outside 0.0..=1.0", alpha),
                ));
            }
        }
        if let Some(linewidth) = self.linewidth {
            if !linewidth.is_finite() || linewidth < 0.0 {
                return Err(OutlookError::invalid(
                    "linewidth",
                    format!("{} is not a non-negative width", linewidth),
                ));
            }
        }
        Ok(())
    }
}

/// Resolved style of one record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordStyle {
    pub facecolor: Color,
    pub edgecolor: Color,
    pub hatch: Option<Hatch>,
}

/// Resolved style of a whole layer; every vector is index-aligned with the records.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LayerStyle {
    pub facecolors: Vec<Color>,
    pub edgecolors: Vec<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hatch: Option<Hatch>,
    pub short_labels: Vec<String>,
    pub long_labels: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linewidth: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alpha: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zorder: Option<f64>,
}

impl LayerStyle {
    pub fn len(&self) -> usize {
        self.facecolors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facecolors.is_empty()
    }

    pub fn record_style(&self, index: usize) -> Option<RecordStyle> {
        Some(RecordStyle {
            facecolor: self.facecolors.get(index)?.clone(),
            edgecolor: self.edgecolors.get(index)?.clone(),
            hatch: self.hatch.clone(),
        })
    }
}

fn required<'a>(record: &'a GeometryRecord, key: &str, index: usize) -> OutlookResult<&'a Value> {
    record
        .attribute(key)
        .ok_or_else(|| OutlookError::MissingAttribute {
            key: key.to_string(),
            record: index,
        })
}

/// Attribute text as written in the file; non-string values use their JSON form.
fn required_text(record: &GeometryRecord, key: &str, index: usize) -> OutlookResult<String> {
    Ok(match required(record, key, index)? {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    })
}

/// Derive the layer style for `records` of an outlook with `hazard`.
pub fn resolve_style(
    hazard: Option<Hazard>,
    records: &[GeometryRecord],
    overrides: &StyleOverrides,
) -> OutlookResult<LayerStyle> {
    overrides.validate()?;

    let unfilled = hazard.is_some_and(|h| h.is_significant() || h.is_dry_thunder());
    let mut style = LayerStyle {
        hatch: match hazard {
            Some(h) if h.is_significant() => Some(Hatch::significant()),
            Some(h) if h.is_dry_thunder() => Some(Hatch::dry_thunder()),
            _ => None,
        },
        linewidth: overrides.linewidth,
        alpha: overrides.alpha,
        zorder: overrides.zorder,
        ..LayerStyle::default()
    };

    for (index, record) in records.iter().enumerate() {
        let fill = Color::parse(&required_text(record, "fill", index)?);
        let stroke = Color::parse(&required_text(record, "stroke", index)?);

        style.facecolors.push(if unfilled { Color::None } else { fill });
        style.edgecolors.push(stroke);
        style.short_labels.push(required_text(record, "LABEL", index)?);
        style.long_labels.push(required_text(record, "LABEL2", index)?);
    }

    if let Some(facecolor) = &overrides.facecolor {
        style.facecolors.fill(facecolor.clone());
    }
    if let Some(edgecolor) = &overrides.edgecolor {
        style.edgecolors.fill(edgecolor.clone());
    }
    if let Some(hatch) = &overrides.hatch {
        style.hatch = Some(hatch.clone());
    }

    debug!(
        hazard = hazard.map(Hazard::as_str).unwrap_or("-"),
        records = style.len(),
        hatch = style.hatch.as_ref().map(Hatch::as_str).unwrap_or("-"),
        "Resolved layer style"
    );

    Ok(style)
}

#[cfg(test)]
mod tests {
    use super::*;
    use outlook_common::Geometry;
    use serde_json::json;

    fn record(label: &str, fill: &str, stroke: &str) -> GeometryRecord {
        let attributes = json!({
            "LABEL": label,
            "LABEL2": format!("{} Risk", label),
            "fill": fill,
            "stroke": stroke,
        });
        GeometryRecord {
            geometry: Geometry::polygon(vec![[-97.0, 35.0], [-96.0, 35.0], [-97.0, 35.0]]),
            attributes: attributes.as_object().cloned().unwrap_or_default(),
        }
    }

    #[test]
    fn test_overrides_validation() {
        assert!(StyleOverrides::new().with_alpha(0.5).validate().is_ok());
        assert!(StyleOverrides::new().with_alpha(1.5).validate().is_err());
        assert!(StyleOverrides::new().with_linewidth(-1.0).validate().is_err());
    }

    #[test]
    fn test_overrides_deserialize_partial() {
        let overrides: StyleOverrides =
            serde_json::from_str(r##"{"facecolor": "none", "zorder": 3}"##).unwrap();
        assert_eq!(overrides.facecolor, Some(Color::None));
        assert_eq!(overrides.zorder, Some(3.0));
        assert!(overrides.edgecolor.is_none());
    }

    #[test]
    fn test_record_style_view() {
        let records = [record("MRGL", "#66A366", "#005500")];
        let style = resolve_style(Some(Hazard::Categorical), &records, &StyleOverrides::new())
            .unwrap();

        let first = style.record_style(0).unwrap();
        assert_eq!(first.facecolor, Color::hex("#66A366"));
        assert_eq!(first.edgecolor, Color::hex("#005500"));
        assert!(first.hatch.is_none());
        assert!(style.record_style(1).is_none());
    }

    #[test]
    fn test_non_string_label_is_kept_verbatim() {
        let mut rec = record("0.05", "#9d4e15", "#70380f");
        rec.attributes.insert("LABEL".to_string(), json!(5));
        let style = resolve_style(Some(Hazard::Hail), &[rec], &StyleOverrides::new()).unwrap();
        assert_eq!(style.short_labels, vec!["5"]);
    }

    #[test]
    fn test_serialized_layer_omits_unset_options() {
        let style = resolve_style(None, &[], &StyleOverrides::new()).unwrap();
        let value = serde_json::to_value(&style).unwrap();
        assert!(value.get("hatch").is_none());
        assert!(value.get("alpha").is_none());
        assert_eq!(value["facecolors"], json!([]));
    }
}
