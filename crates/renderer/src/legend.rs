//! Legend entries for outlook products.
//!
//! Entries describe the swatches only; drawing them is up to the caller.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use outlook_common::{Color, ForecastDay, Hatch, Hazard, OutlookError, ProductFamily};

use crate::palette::{PaletteEntry, PaletteName};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub label: String,
    pub edgecolor: Color,
    pub facecolor: Color,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hatch: Option<Hatch>,
}

impl LegendEntry {
    fn plain(entry: &PaletteEntry) -> Self {
        Self {
            label: entry.label.to_string(),
            edgecolor: entry.edgecolor(),
            facecolor: entry.facecolor(),
            hatch: None,
        }
    }

    fn hatched(entry: &PaletteEntry, hatch: Hatch) -> Self {
        Self {
            hatch: Some(hatch),
            ..Self::plain(entry)
        }
    }
}

/// Products a legend can be built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LegendKind {
    ConvectiveCategorical,
    ConvectiveAllHazards,
    ConvectiveHail,
    ConvectiveWind,
    ConvectiveTornado,
    ConvectiveExtended,
    FireCategorical,
    ExtendedFireCategorical,
    ExtendedFireProbability,
}

impl LegendKind {
    pub const ALL: [LegendKind; 9] = [
        LegendKind::ConvectiveCategorical,
        LegendKind::ConvectiveAllHazards,
        LegendKind::ConvectiveHail,
        LegendKind::ConvectiveWind,
        LegendKind::ConvectiveTornado,
        LegendKind::ConvectiveExtended,
        LegendKind::FireCategorical,
        LegendKind::ExtendedFireCategorical,
        LegendKind::ExtendedFireProbability,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LegendKind::ConvectiveCategorical => "convective_categorical",
            LegendKind::ConvectiveAllHazards => "convective_all_hazards",
            LegendKind::ConvectiveHail => "convective_hail",
            LegendKind::ConvectiveWind => "convective_wind",
            LegendKind::ConvectiveTornado => "convective_tornado",
            LegendKind::ConvectiveExtended => "convective_extended",
            LegendKind::FireCategorical => "fire_categorical",
            LegendKind::ExtendedFireCategorical => "extended_fire_categorical",
            LegendKind::ExtendedFireProbability => "extended_fire_probability",
        }
    }

    pub fn palette(self) -> PaletteName {
        match self {
            LegendKind::ConvectiveCategorical => PaletteName::Categorical,
            // The all-hazards legend reuses the hail ramp.
            LegendKind::ConvectiveAllHazards | LegendKind::ConvectiveHail => PaletteName::Hail,
            LegendKind::ConvectiveWind => PaletteName::Wind,
            LegendKind::ConvectiveTornado => PaletteName::Tornado,
            LegendKind::ConvectiveExtended => PaletteName::ExtendedSevere,
            LegendKind::FireCategorical => PaletteName::FireCategorical,
            LegendKind::ExtendedFireCategorical => PaletteName::ExtendedFireCategorical,
            LegendKind::ExtendedFireProbability => PaletteName::ExtendedFireProbability,
        }
    }

    /// Legend matching an outlook request, if one exists for that product.
    pub fn for_outlook(
        family: ProductFamily,
        day: ForecastDay,
        hazard: Option<Hazard>,
    ) -> Option<LegendKind> {
        match family {
            ProductFamily::Convective if day.get() >= 4 => Some(LegendKind::ConvectiveExtended),
            ProductFamily::Convective => match hazard? {
                Hazard::Categorical => Some(LegendKind::ConvectiveCategorical),
                Hazard::Tornado | Hazard::SigTornado => Some(LegendKind::ConvectiveTornado),
                Hazard::Hail | Hazard::SigHail => Some(LegendKind::ConvectiveHail),
                Hazard::Wind | Hazard::SigWind => Some(LegendKind::ConvectiveWind),
                Hazard::Probabilistic | Hazard::SigProbabilistic => {
                    Some(LegendKind::ConvectiveAllHazards)
                }
                _ => None,
            },
            ProductFamily::Fire if day.get() <= 2 => Some(LegendKind::FireCategorical),
            ProductFamily::Fire => match hazard? {
                Hazard::WindRh | Hazard::DryThunder => Some(LegendKind::ExtendedFireProbability),
                _ => Some(LegendKind::ExtendedFireCategorical),
            },
            ProductFamily::MesoscaleDiscussion => None,
        }
    }

    /// Entries in palette order.
    pub fn entries(self) -> Vec<LegendEntry> {
        let palette = self.palette().palette();
        palette
            .entries()
            .iter()
            .map(|entry| match (self, entry.category) {
                (
                    LegendKind::ConvectiveAllHazards
                    | LegendKind::ConvectiveHail
                    | LegendKind::ConvectiveWind
                    | LegendKind::ConvectiveTornado,
                    "SIGN",
                ) => LegendEntry {
                    facecolor: Color::None,
                    ..LegendEntry::hatched(entry, Hatch::significant())
                },
                (LegendKind::FireCategorical, "IDRT" | "SDRT") => {
                    LegendEntry::hatched(entry, Hatch::dry_thunder())
                }
                _ => LegendEntry::plain(entry),
            })
            .collect()
    }
}

impl fmt::Display for LegendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LegendKind {
    type Err = OutlookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LegendKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| OutlookError::invalid("legend", format!("unknown legend '{}'", s)))
    }
}
