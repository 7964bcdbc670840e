//! Fixed SPC outlook color tables.
//!
//! Each palette maps a category (the `LABEL` written in the outlook file,
//! e.g. `SLGT` or `0.15`) to an edge color, a face color and a legend label.
//! Entries are ordered from highest to lowest risk, the order legends use.

use std::fmt;
use std::str::FromStr;

use outlook_common::{Color, OutlookError, OutlookResult};
use serde::Serialize;

/// One palette category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaletteEntry {
    pub category: &'static str,
    pub edge: &'static str,
    pub face: &'static str,
    pub label: &'static str,
}

impl PaletteEntry {
    const fn new(
        category: &'static str,
        edge: &'static str,
        face: &'static str,
        label: &'static str,
    ) -> Self {
        Self {
            category,
            edge,
            face,
            label,
        }
    }

    pub fn edgecolor(&self) -> Color {
        Color::parse(self.edge)
    }

    pub fn facecolor(&self) -> Color {
        Color::parse(self.face)
    }
}

/// Named, ordered set of palette entries.
#[derive(Debug, PartialEq, Eq)]
pub struct Palette {
    pub name: &'static str,
    entries: &'static [PaletteEntry],
}

impl Palette {
    pub fn entries(&self) -> &'static [PaletteEntry] {
        self.entries
    }

    pub fn categories(&self) -> impl Iterator<Item = &'static str> {
        self.entries.iter().map(|e| e.category)
    }

    /// Entry for `category`; unknown categories are an error, never a default.
    pub fn get(&self, category: &str) -> OutlookResult<&'static PaletteEntry> {
        self.entries
            .iter()
            .find(|e| e.category == category)
            .ok_or_else(|| OutlookError::PaletteKeyNotFound {
                palette: self.name,
                category: category.to_string(),
            })
    }
}

/// The palettes SPC publishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaletteName {
    Categorical,
    Tornado,
    Wind,
    Hail,
    AnySevere,
    ExtendedSevere,
    FireCategorical,
    ExtendedFireCategorical,
    ExtendedFireProbability,
}

impl PaletteName {
    pub const ALL: [PaletteName; 9] = [
        PaletteName::Categorical,
        PaletteName::Tornado,
        PaletteName::Wind,
        PaletteName::Hail,
        PaletteName::AnySevere,
        PaletteName::ExtendedSevere,
        PaletteName::FireCategorical,
        PaletteName::ExtendedFireCategorical,
        PaletteName::ExtendedFireProbability,
    ];

    pub fn palette(self) -> &'static Palette {
        match self {
            PaletteName::Categorical => &CATEGORICAL,
            PaletteName::Tornado => &TORNADO,
            PaletteName::Wind => &WIND,
            PaletteName::Hail => &HAIL,
            PaletteName::AnySevere => &ANY_SEVERE,
            PaletteName::ExtendedSevere => &EXTENDED_SEVERE,
            PaletteName::FireCategorical => &FIRE_CATEGORICAL,
            PaletteName::ExtendedFireCategorical => &EXTENDED_FIRE_CATEGORICAL,
            PaletteName::ExtendedFireProbability => &EXTENDED_FIRE_PROBABILITY,
        }
    }

    pub fn as_str(self) -> &'static str {
        self.palette().name
    }
}

impl fmt::Display for PaletteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaletteName {
    type Err = OutlookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PaletteName::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| OutlookError::invalid("palette", format!("unknown palette '{}'", s)))
    }
}

/// Significant-severe polygon shared by the probabilistic palettes.
const SIGN: PaletteEntry = PaletteEntry::new("SIGN", "#000000", "#888888", "10% Sig.");

pub static CATEGORICAL: Palette = Palette {
    name: "categorical",
    entries: &[
        PaletteEntry::new("HIGH", "#CC00CC", "#EE99EE", "High"),
        PaletteEntry::new("MDT", "#CC0000", "#E06666", "Moderate"),
        PaletteEntry::new("ENH", "#FF6600", "#FFA366", "Enhanced"),
        PaletteEntry::new("SLGT", "#DDAA00", "#FFE066", "Slight"),
        PaletteEntry::new("MRGL", "#005500", "#66A366", "Marginal"),
        PaletteEntry::new("TSTM", "#55BB55", "#C1E9C1", "Thunder"),
    ],
};

pub static TORNADO: Palette = Palette {
    name: "tornado",
    entries: &[
        SIGN,
        PaletteEntry::new("0.60", "#2952a3", "#5c85d6", "60%"),
        PaletteEntry::new("0.45", "#a300cc", "#d633ff", "45%"),
        PaletteEntry::new("0.30", "#CC00CC", "#EE99EE", "30%"),
        PaletteEntry::new("0.15", "#CC0000", "#E06666", "15%"),
        PaletteEntry::new("0.10", "#DDAA00", "#FFE066", "10%"),
        PaletteEntry::new("0.05", "#70380f", "#9d4e15", "5%"),
        PaletteEntry::new("0.02", "#005500", "#66A366", "2%"),
    ],
};

/// Wind, hail and any-severe share one probability ramp.
const SEVERE_PROBABILITIES: [PaletteEntry; 6] = [
    SIGN,
    PaletteEntry::new("0.60", "#a300cc", "#d633ff", "60%"),
    PaletteEntry::new("0.45", "#CC00CC", "#EE99EE", "45%"),
    PaletteEntry::new("0.30", "#CC0000", "#E06666", "30%"),
    PaletteEntry::new("0.15", "#DDAA00", "#FFE066", "15%"),
    PaletteEntry::new("0.05", "#70380f", "#9d4e15", "5%"),
];

pub static WIND: Palette = Palette {
    name: "wind",
    entries: &SEVERE_PROBABILITIES,
};

pub static HAIL: Palette = Palette {
    name: "hail",
    entries: &SEVERE_PROBABILITIES,
};

pub static ANY_SEVERE: Palette = Palette {
    name: "any_severe",
    entries: &SEVERE_PROBABILITIES,
};

pub static EXTENDED_SEVERE: Palette = Palette {
    name: "extended_severe",
    entries: &[
        PaletteEntry::new("0.30", "#FF6600", "#FFA366", "30%"),
        PaletteEntry::new("0.15", "#DDAA00", "#FFE066", "15%"),
    ],
};

pub static FIRE_CATEGORICAL: Palette = Palette {
    name: "fire_weather_categorical",
    entries: &[
        PaletteEntry::new("EXTM", "#CC00CC", "#EE99EE", "Extreme"),
        PaletteEntry::new("CRIT", "#cc0000", "#ff3333", "Critical"),
        PaletteEntry::new("ELEV", "#e68a00", "#ffad33", "Elevated"),
        PaletteEntry::new("SDRT", "#cc0000", "none", "Scattered Dry Thunderstorm"),
        PaletteEntry::new("IDRT", "#70380f", "none", "Isolated Dry Thunderstorm"),
    ],
};

pub static EXTENDED_FIRE_CATEGORICAL: Palette = Palette {
    name: "extended_fire_weather_categorical",
    entries: &[
        PaletteEntry::new("D3", "#CC00CC", "#EE99EE", "Day 3 Critical"),
        PaletteEntry::new("D4", "#cc0000", "#ff3333", "Day 4 Critical"),
        PaletteEntry::new("D5", "#a300cc", "#d633ff", "Day 5 Critical"),
        PaletteEntry::new("D6", "#005500", "#66A366", "Day 6 Critical"),
        PaletteEntry::new("D7", "#2952a3", "#5c85d6", "Day 7 Critical"),
        PaletteEntry::new("D8", "#70380f", "#9d4e15", "Day 8 Critical"),
    ],
};

pub static EXTENDED_FIRE_PROBABILITY: Palette = Palette {
    name: "extended_fire_weather_probability",
    entries: &[
        PaletteEntry::new("WINDRH_0.70", "#cc0000", "#ff3333", "70% Critical Wind & RH"),
        PaletteEntry::new("WINDRH_0.40", "#e68a00", "#ffad33", "40% Critical Wind & RH"),
        PaletteEntry::new("DRYT_0.40", "#00b2ee", "#80ffff", "40% Critical Dry Thunderstorm"),
        PaletteEntry::new("DRYT_0.10", "#8b4726", "#c5a393", "10% Critical Dry Thunderstorm"),
    ],
};
