//! Common types shared across the SPC outlook overlay crates.

pub mod error;
pub mod geojson;
pub mod request;
pub mod style;

pub use error::{ErrorKind, OutlookError, OutlookResult};
pub use geojson::{Feature, FeatureCollection, Geometry, GeometryRecord, Position};
pub use request::{ForecastDay, Hazard, IssuanceTime, ProductFamily, RequestKey, ResourceKey};
pub use style::{Color, Hatch};
