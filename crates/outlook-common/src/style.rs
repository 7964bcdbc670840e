//! Colors and hatch patterns as they appear in SPC attribute tables and palettes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Color value, kept in the textual form the renderer expects.
///
/// `none` means "do not fill", which is distinct from a transparent color.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Color {
    None,

    /// Hex string: "#RRGGBB" or "#RRGGBBAA"
    Hex(String),

    Named(String),
}

impl Color {
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if s.eq_ignore_ascii_case("none") {
            Color::None
        } else if s.starts_with('#') {
            Color::Hex(s.to_string())
        } else {
            Color::Named(s.to_string())
        }
    }

    pub fn hex(s: impl Into<String>) -> Self {
        Color::Hex(s.into())
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Color::None)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Color::None => "none",
            Color::Hex(s) | Color::Named(s) => s,
        }
    }
}

impl From<&str> for Color {
    fn from(s: &str) -> Self {
        Color::parse(s)
    }
}

impl From<String> for Color {
    fn from(s: String) -> Self {
        Color::parse(&s)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.as_str().to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hatch pattern string in matplotlib notation.
///
/// Repeating a symbol increases density; `S` is the custom SPC
/// significant-severe marker.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hatch(String);

impl Hatch {
    /// Significant severe hatching.
    pub const SIGNIFICANT: &'static str = "SS";
    /// Dry thunderstorm hatching.
    pub const DRY_THUNDER: &'static str = "xx";

    pub fn new(pattern: impl Into<String>) -> Self {
        Self(pattern.into())
    }

    pub fn significant() -> Self {
        Self::new(Self::SIGNIFICANT)
    }

    pub fn dry_thunder() -> Self {
        Self::new(Self::DRY_THUNDER)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Hatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_parsing() {
        assert_eq!(Color::parse("none"), Color::None);
        assert_eq!(Color::parse("None"), Color::None);
        assert_eq!(Color::parse(" #FF5500 "), Color::hex("#FF5500"));
        assert_eq!(Color::parse("red"), Color::Named("red".to_string()));
        assert!(Color::parse("NONE").is_none());
        assert_eq!(Color::None.to_string(), "none");
    }

    #[test]
    fn test_color_serializes_as_plain_string() {
        let json = serde_json::to_string(&vec![Color::None, Color::hex("#123456")]).unwrap();
        assert_eq!(json, r##"["none","#123456"]"##);

        let back: Vec<Color> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, vec![Color::None, Color::hex("#123456")]);
    }

    #[test]
    fn test_hatch_patterns() {
        assert_eq!(Hatch::significant().as_str(), "SS");
        assert_eq!(Hatch::dry_thunder().to_string(), "xx");
        assert_eq!(serde_json::to_string(&Hatch::new("//")).unwrap(), r#""//""#);
    }
}
