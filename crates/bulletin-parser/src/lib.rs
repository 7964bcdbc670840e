//! Mesoscale discussion bulletin decoder.
//!
//! SPC mesoscale discussions are plain-text products. The affected area is
//! listed after a `LAT...LON` marker as whitespace-separated 8-digit tokens,
//! each one a latitude/longitude pair in hundredths of a degree. This crate
//! turns the text into a single-polygon GeoJSON feature collection carrying
//! the discussion number.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use outlook_common::{Feature, FeatureCollection, Geometry, OutlookError, OutlookResult, Position};

pub const COORDINATE_MARKER: &str = "LAT...LON";
pub const NUMBER_MARKER: &str = "Mesoscale Discussion";

static COORDS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"LAT\.\.\.LON\s+(?P<coords>(?:\d{8}\s*)+)").unwrap_or_else(|_| unreachable!())
});

static NUMBER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Mesoscale Discussion (?P<mdnum>\d{4})").unwrap_or_else(|_| unreachable!())
});

/// How much of the bulletin to quote in parse errors.
const EXCERPT_CHARS: usize = 80;

/// A decoded discussion: its number and the outline in the order listed.
#[derive(Debug, Clone, PartialEq)]
pub struct Discussion {
    pub number: u16,
    pub ring: Vec<Position>,
}

impl Discussion {
    /// Single-feature collection in the layout persisted to the local cache.
    pub fn to_feature_collection(&self) -> FeatureCollection {
        FeatureCollection::new().with_feature(
            Feature::new(Geometry::polygon(self.ring.clone())).with_property("number", self.number),
        )
    }
}

/// Decode one `LAT...LON` token into `(longitude, latitude)`.
///
/// The first four digits are latitude x 100 and the last four the west
/// longitude magnitude x 100. Bulletins drop the leading `1` of longitudes at
/// or beyond 100W, so a magnitude below 3000 gets it restored. The result is
/// always in the western hemisphere.
pub fn decode_coordinate_pair(token: &str) -> OutlookResult<Position> {
    if token.len() != 8 || !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(OutlookError::MalformedCoordinate(token.to_string()));
    }

    let lat_hundredths: u32 = token[..4]
        .parse()
        .map_err(|_| OutlookError::MalformedCoordinate(token.to_string()))?;
    let mut lon_hundredths: u32 = token[4..]
        .parse()
        .map_err(|_| OutlookError::MalformedCoordinate(token.to_string()))?;

    if lon_hundredths < 3000 {
        lon_hundredths += 10_000;
    }

    Ok([
        -(lon_hundredths as f64) / 100.0,
        lat_hundredths as f64 / 100.0,
    ])
}

/// Parse a raw discussion. Bytes that are not valid UTF-8 are dropped.
pub fn parse_discussion(raw: impl AsRef<[u8]>) -> OutlookResult<Discussion> {
    let text = String::from_utf8_lossy(raw.as_ref()).replace('\u{FFFD}', "");

    let number = NUMBER_RE
        .captures(&text)
        .and_then(|caps| caps.name("mdnum"))
        .ok_or_else(|| missing_marker(NUMBER_MARKER, &text))?
        .as_str()
        .parse::<u16>()
        .map_err(|_| missing_marker(NUMBER_MARKER, &text))?;

    let coords = COORDS_RE
        .captures(&text)
        .and_then(|caps| caps.name("coords"))
        .ok_or_else(|| missing_marker(COORDINATE_MARKER, &text))?;

    let mut ring = coords
        .as_str()
        .split_whitespace()
        .map(decode_coordinate_pair)
        .collect::<OutlookResult<Vec<_>>>()?;

    if let (Some(first), Some(last)) = (ring.first().copied(), ring.last().copied()) {
        if first != last {
            ring.push(first);
        }
    }

    debug!(number, vertices = ring.len(), "Decoded mesoscale discussion");

    Ok(Discussion { number, ring })
}

/// Parse a raw discussion straight into its persisted GeoJSON form.
pub fn parse_bulletin(raw: impl AsRef<[u8]>) -> OutlookResult<FeatureCollection> {
    parse_discussion(raw).map(|d| d.to_feature_collection())
}

fn missing_marker(marker: &'static str, text: &str) -> OutlookError {
    OutlookError::MissingMarker {
        marker,
        excerpt: text.trim().chars().take(EXCERPT_CHARS).collect(),
    }
}
