//! Overlay features handed to a plotting library.

use chrono::{NaiveDateTime, NaiveTime};
use serde::{Serialize, Serializer};

use outlook_common::{
    Feature, FeatureCollection, Geometry, GeometryRecord, ProductFamily, RequestKey,
};
use renderer::{LayerStyle, LegendEntry, LegendKind, StyleOverrides};
use storage::Records;

/// `(min_lon, min_lat, max_lon, max_lat)` over every record.
fn union_bounds(records: &[GeometryRecord]) -> Option<(f64, f64, f64, f64)> {
    records
        .iter()
        .filter_map(|r| r.geometry.bounds())
        .reduce(|a, b| (a.0.min(b.0), a.1.min(b.1), a.2.max(b.2), a.3.max(b.3)))
}

fn serialize_records<S: Serializer>(records: &Records, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(records.iter())
}

/// A convective or fire weather outlook layer with its resolved style.
#[derive(Debug, Clone, Serialize)]
pub struct OutlookFeature {
    pub family: ProductFamily,
    pub request: RequestKey,
    /// Midnight of the outlook date.
    pub timestamp: NaiveDateTime,
    pub style: LayerStyle,
    #[serde(serialize_with = "serialize_records")]
    records: Records,
}

impl OutlookFeature {
    pub(crate) fn new(
        family: ProductFamily,
        request: RequestKey,
        records: Records,
        style: LayerStyle,
    ) -> Self {
        Self {
            family,
            request,
            timestamp: request.date.and_time(NaiveTime::MIN),
            style,
            records,
        }
    }

    pub fn records(&self) -> &[GeometryRecord] {
        &self.records
    }

    /// The cached records themselves, shared with every other feature built
    /// from the same request.
    pub fn shared_records(&self) -> Records {
        self.records.clone()
    }

    /// Index-aligned with [`records`](Self::records) and the style vectors.
    pub fn geometries(&self) -> Vec<Geometry> {
        storage::geometries(&self.records)
    }

    /// Extent of the layer, `None` when the outlook has no polygons.
    pub fn bounds(&self) -> Option<(f64, f64, f64, f64)> {
        union_bounds(&self.records)
    }

    pub fn short_labels(&self) -> &[String] {
        &self.style.short_labels
    }

    pub fn long_labels(&self) -> &[String] {
        &self.style.long_labels
    }

    pub fn legend(&self) -> Option<Vec<LegendEntry>> {
        LegendKind::for_outlook(self.family, self.request.forecast_day, self.request.hazard)
            .map(LegendKind::entries)
    }

    /// Records as GeoJSON with the resolved colors added to each feature's properties.
    pub fn to_feature_collection(&self) -> FeatureCollection {
        self.records
            .iter()
            .enumerate()
            .fold(FeatureCollection::new(), |collection, (index, record)| {
                let mut feature = Feature::new(record.geometry.clone());
                feature.properties = record.attributes.clone();
                if let Some(style) = self.style.record_style(index) {
                    feature = feature
                        .with_property("facecolor", style.facecolor.as_str())
                        .with_property("edgecolor", style.edgecolor.as_str());
                    if let Some(hatch) = style.hatch {
                        feature = feature.with_property("hatch", hatch.as_str());
                    }
                }
                collection.with_feature(feature)
            })
    }
}

/// A mesoscale discussion polygon, styled only by the caller's options.
#[derive(Debug, Clone, Serialize)]
pub struct DiscussionFeature {
    pub year: i32,
    pub number: u16,
    pub style: StyleOverrides,
    #[serde(serialize_with = "serialize_records")]
    records: Records,
}

impl DiscussionFeature {
    pub(crate) fn new(year: i32, number: u16, records: Records, style: StyleOverrides) -> Self {
        Self {
            year,
            number,
            style,
            records,
        }
    }

    pub fn records(&self) -> &[GeometryRecord] {
        &self.records
    }

    pub fn geometries(&self) -> Vec<Geometry> {
        storage::geometries(&self.records)
    }

    pub fn bounds(&self) -> Option<(f64, f64, f64, f64)> {
        union_bounds(&self.records)
    }

    pub fn to_feature_collection(&self) -> FeatureCollection {
        self.records
            .iter()
            .fold(FeatureCollection::new(), |collection, record| {
                let mut feature = Feature::new(record.geometry.clone());
                feature.properties = record.attributes.clone();
                collection.with_feature(feature)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use outlook_common::{Color, Hazard};
    use renderer::resolve_style;
    use serde_json::{json, Map};

    fn record(label: &str) -> GeometryRecord {
        let attributes = json!({
            "LABEL": label,
            "LABEL2": "10% Significant Hail Risk",
            "fill": "#888888",
            "stroke": "#000000",
        });
        GeometryRecord {
            geometry: Geometry::polygon(vec![[-97.0, 35.0], [-96.0, 35.0], [-97.0, 35.0]]),
            attributes: attributes.as_object().cloned().unwrap_or_else(Map::new),
        }
    }

    fn sighail_feature() -> OutlookFeature {
        let request = RequestKey::new(1, Some(1630), 2020, 4, 12, Some("sighail")).unwrap();
        let records: Records = vec![record("SIGN")].into();
        let style = resolve_style(Some(Hazard::SigHail), &records, &StyleOverrides::new()).unwrap();
        OutlookFeature::new(ProductFamily::Convective, request, records, style)
    }

    #[test]
    fn test_timestamp_is_midnight_of_outlook_date() {
        let feature = sighail_feature();
        assert_eq!(
            feature.timestamp.format("%Y-%m-%dT%H:%M").to_string(),
            "2020-04-12T00:00"
        );
    }

    #[test]
    fn test_feature_collection_carries_resolved_style() {
        let collection = sighail_feature().to_feature_collection();
        let properties = &collection.features[0].properties;

        assert_eq!(properties["LABEL"], "SIGN");
        assert_eq!(properties["facecolor"], Color::None.as_str());
        assert_eq!(properties["edgecolor"], "#000000");
        assert_eq!(properties["hatch"], "SS");
    }

    #[test]
    fn test_serialized_feature_includes_records() {
        let value = serde_json::to_value(sighail_feature()).unwrap();
        assert_eq!(value["family"], "convective");
        assert_eq!(value["records"][0]["attributes"]["LABEL"], "SIGN");
        assert_eq!(value["style"]["hatch"], "SS");
    }

    #[test]
    fn test_bounds_cover_every_record() {
        let request = RequestKey::new(1, Some(1630), 2020, 4, 12, Some("cat")).unwrap();
        let mut east = record("SLGT");
        east.geometry = Geometry::polygon(vec![[-90.0, 30.0], [-88.0, 33.0], [-90.0, 30.0]]);
        let records: Records = vec![record("MRGL"), east].into();
        let style = resolve_style(Some(Hazard::Categorical), &records, &StyleOverrides::new())
            .unwrap();
        let feature = OutlookFeature::new(ProductFamily::Convective, request, records, style);

        assert_eq!(feature.bounds(), Some((-97.0, 30.0, -88.0, 35.0)));
    }

    #[test]
    fn test_legend_follows_request() {
        let legend = sighail_feature().legend().unwrap();
        assert_eq!(legend[0].label, "10% Sig.");
        assert!(legend[0].facecolor.is_none());
    }
}
