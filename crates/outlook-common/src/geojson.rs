//! GeoJSON feature collections as published by SPC, and the records read from them.
//!
//! Only polygonal geometries are modelled; every outlook and discussion
//! product is a set of (multi)polygons in longitude/latitude.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A `[longitude, latitude]` pair.
pub type Position = [f64; 2];

/// A GeoJSON FeatureCollection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureCollection {
    /// Type identifier (always "FeatureCollection").
    #[serde(rename = "type")]
    pub type_: String,

    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new() -> Self {
        Self {
            type_: "FeatureCollection".to_string(),
            features: Vec::new(),
        }
    }

    pub fn with_feature(mut self, feature: Feature) -> Self {
        self.features.push(feature);
        self
    }
}

impl Default for FeatureCollection {
    fn default() -> Self {
        Self::new()
    }
}

/// A GeoJSON Feature with free-form properties.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Feature {
    /// Type identifier (always "Feature").
    #[serde(rename = "type")]
    pub type_: String,

    /// `null` properties are read as an empty map.
    #[serde(default, deserialize_with = "properties_or_empty")]
    pub properties: Map<String, Value>,

    pub geometry: Geometry,
}

impl Feature {
    pub fn new(geometry: Geometry) -> Self {
        Self {
            type_: "Feature".to_string(),
            properties: Map::new(),
            geometry,
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}

fn properties_or_empty<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Map<String, Value>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Polygonal GeoJSON geometries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Geometry {
    /// Linear rings, first is the exterior, the rest are holes.
    Polygon { coordinates: Vec<Vec<Position>> },

    MultiPolygon { coordinates: Vec<Vec<Vec<Position>>> },
}

impl Geometry {
    pub fn polygon(exterior: Vec<Position>) -> Self {
        Geometry::Polygon {
            coordinates: vec![exterior],
        }
    }

    /// `(min_lon, min_lat, max_lon, max_lat)`, or `None` for an empty geometry.
    pub fn bounds(&self) -> Option<(f64, f64, f64, f64)> {
        let positions: Box<dyn Iterator<Item = &Position>> = match self {
            Geometry::Polygon { coordinates } => Box::new(coordinates.iter().flatten()),
            Geometry::MultiPolygon { coordinates } => {
                Box::new(coordinates.iter().flatten().flatten())
            }
        };

        positions.fold(None, |acc, [lon, lat]| {
            let (min_lon, min_lat, max_lon, max_lat) =
                acc.unwrap_or((*lon, *lat, *lon, *lat));
            Some((
                min_lon.min(*lon),
                min_lat.min(*lat),
                max_lon.max(*lon),
                max_lat.max(*lat),
            ))
        })
    }
}

/// A geometry with its attribute table, one per feature.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeometryRecord {
    pub geometry: Geometry,
    pub attributes: Map<String, Value>,
}

impl GeometryRecord {
    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// String attribute lookup; `None` when absent or not a string.
    pub fn str_attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(Value::as_str)
    }
}

impl From<Feature> for GeometryRecord {
    fn from(feature: Feature) -> Self {
        Self {
            geometry: feature.geometry,
            attributes: feature.properties,
        }
    }
}
