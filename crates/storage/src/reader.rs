//! Reading cached GeoJSON into geometry records.

use std::path::Path;

use serde_json::{Map, Value};
use tokio::fs;
use tracing::{debug, instrument};

use outlook_common::{FeatureCollection, Geometry, GeometryRecord, OutlookError, OutlookResult};

/// Attribute equality filter. A feature is skipped when any entry equals
/// the feature's attribute of the same name. Every feature must carry each
/// excluded attribute; a missing one is a lookup error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Exclusions(Vec<(String, Value)>);

impl Exclusions {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.push((key.into(), value.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether the feature at index `record` is filtered out.
    pub fn excludes(&self, attributes: &Map<String, Value>, record: usize) -> OutlookResult<bool> {
        for (key, value) in &self.0 {
            let actual = attributes
                .get(key)
                .ok_or_else(|| OutlookError::MissingAttribute {
                    key: key.clone(),
                    record,
                })?;
            if actual == value {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

/// One record per feature of `collection`, in file order, minus exclusions.
pub fn filter_records(
    collection: FeatureCollection,
    exclude: &Exclusions,
) -> OutlookResult<Vec<GeometryRecord>> {
    let total = collection.features.len();
    let mut records = Vec::with_capacity(total);
    for (index, feature) in collection.features.into_iter().enumerate() {
        if !exclude.excludes(&feature.properties, index)? {
            records.push(GeometryRecord::from(feature));
        }
    }

    if records.len() < total {
        debug!(
            skipped = total - records.len(),
            kept = records.len(),
            "Excluded features"
        );
    }
    Ok(records)
}

#[instrument(skip(exclude), fields(path = %path.display()))]
pub async fn read_records(path: &Path, exclude: &Exclusions) -> OutlookResult<Vec<GeometryRecord>> {
    let contents = fs::read(path).await.map_err(|e| OutlookError::io(path, e))?;
    let collection: FeatureCollection =
        serde_json::from_slice(&contents).map_err(|source| OutlookError::InvalidGeoJson {
            path: path.to_path_buf(),
            source,
        })?;

    filter_records(collection, exclude)
}

pub async fn read_geometries(path: &Path, exclude: &Exclusions) -> OutlookResult<Vec<Geometry>> {
    Ok(geometries(&read_records(path, exclude).await?))
}

/// Geometry view of `records`; the n-th geometry belongs to the n-th record.
pub fn geometries(records: &[GeometryRecord]) -> Vec<Geometry> {
    records.iter().map(|r| r.geometry.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use outlook_common::ErrorKind;
    use test_utils::{outlook_geojson, temp_test_dir, write_fixture, HAIL_ROWS};

    #[tokio::test]
    async fn test_exclusion_keeps_order() {
        let dir = temp_test_dir();
        let path = write_fixture(dir.path(), "hail.geojson", &outlook_geojson(&HAIL_ROWS));
        let exclude = Exclusions::none().with("LABEL", "SIGN");

        let all = read_records(&path, &Exclusions::none()).await.unwrap();
        let records = read_records(&path, &exclude).await.unwrap();
        let labels: Vec<_> = records
            .iter()
            .map(|r| r.str_attribute("LABEL").unwrap())
            .collect();
        assert_eq!(labels, vec!["0.05", "0.15"]);

        let shapes = read_geometries(&path, &exclude).await.unwrap();
        assert_eq!(shapes.len(), 2);
        assert_eq!(shapes[0], all[0].geometry);
        assert_eq!(shapes[1], all[1].geometry);
    }

    #[tokio::test]
    async fn test_any_exclusion_entry_matches() {
        let dir = temp_test_dir();
        let path = write_fixture(dir.path(), "hail.geojson", &outlook_geojson(&HAIL_ROWS));
        let exclude = Exclusions::none()
            .with("LABEL", "SIGN")
            .with("LABEL", "0.05");

        let records = read_records(&path, &exclude).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].str_attribute("LABEL"), Some("0.15"));
    }

    #[tokio::test]
    async fn test_exclusion_compares_values_exactly() {
        let dir = temp_test_dir();
        let path = write_fixture(dir.path(), "hail.geojson", &outlook_geojson(&HAIL_ROWS));

        // DN is numeric in the file, a string never matches it.
        let exclude = Exclusions::none().with("DN", "2");
        assert_eq!(read_records(&path, &exclude).await.unwrap().len(), 3);

        let exclude = Exclusions::none().with("DN", 2);
        assert_eq!(read_records(&path, &exclude).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_missing_excluded_attribute_is_a_lookup_error() {
        let dir = temp_test_dir();
        let path = write_fixture(dir.path(), "hail.geojson", &outlook_geojson(&HAIL_ROWS));
        let exclude = Exclusions::none().with("CATEGORY", "SIGN");

        let err = read_records(&path, &exclude).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Lookup);
        match err {
            OutlookError::MissingAttribute { key, record } => {
                assert_eq!(key, "CATEGORY");
                assert_eq!(record, 0);
            }
            other => panic!("Expected MissingAttribute, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_geojson_is_a_parse_error() {
        let dir = temp_test_dir();
        let path = write_fixture(dir.path(), "broken.geojson", "{\"type\": \"FeatureCollection\"");

        let err = read_records(&path, &Exclusions::none()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
        assert!(err.to_string().contains("broken.geojson"));
    }

    #[tokio::test]
    async fn test_missing_file_is_an_io_error() {
        let dir = temp_test_dir();
        let err = read_records(&dir.path().join("absent.geojson"), &Exclusions::none())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn test_empty_collection() {
        let records = filter_records(FeatureCollection::new(), &Exclusions::none()).unwrap();
        assert!(records.is_empty());
    }
}
