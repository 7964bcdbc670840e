//! Error types for outlook resolution, fetching and styling.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using OutlookError.
pub type OutlookResult<T> = Result<T, OutlookError>;

/// Primary error type for outlook operations.
#[derive(Debug, Error)]
pub enum OutlookError {
    // === Parse Errors ===
    #[error("Bulletin is missing the '{marker}' section (text starts with: {excerpt:?})")]
    MissingMarker {
        marker: &'static str,
        excerpt: String,
    },

    #[error("Malformed coordinate token '{0}': expected exactly 8 decimal digits")]
    MalformedCoordinate(String),

    #[error("Invalid GeoJSON in {path}: {source}")]
    InvalidGeoJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    // === Fetch Errors ===
    #[error("Failed to fetch {url}: {message}")]
    Fetch {
        url: String,
        status: Option<u16>,
        message: String,
    },

    // === Filesystem Errors ===
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode GeoJSON: {0}")]
    Encode(#[source] serde_json::Error),

    // === Lookup Errors ===
    #[error("Record {record} has no '{key}' attribute")]
    MissingAttribute { key: String, record: usize },

    #[error("Category '{category}' not found in palette '{palette}'")]
    PaletteKeyNotFound {
        palette: &'static str,
        category: String,
    },

    #[error("Template placeholder '{{{0}}}' has no value")]
    MissingPlaceholder(String),

    // === Parameter Errors ===
    #[error("Invalid parameter value for '{param}': {message}")]
    InvalidParameter {
        param: &'static str,
        message: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Coarse classification used by callers deciding how to report a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Parse,
    Fetch,
    Io,
    Lookup,
    Parameter,
}

impl OutlookError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            OutlookError::MissingMarker { .. }
            | OutlookError::MalformedCoordinate(_)
            | OutlookError::InvalidGeoJson { .. } => ErrorKind::Parse,

            OutlookError::Fetch { .. } => ErrorKind::Fetch,

            OutlookError::Io { .. } | OutlookError::Encode(_) => ErrorKind::Io,

            OutlookError::MissingAttribute { .. }
            | OutlookError::PaletteKeyNotFound { .. }
            | OutlookError::MissingPlaceholder(_) => ErrorKind::Lookup,

            OutlookError::InvalidParameter { .. } | OutlookError::Config(_) => {
                ErrorKind::Parameter
            }
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        OutlookError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn invalid(param: &'static str, message: impl Into<String>) -> Self {
        OutlookError::InvalidParameter {
            param,
            message: message.into(),
        }
    }

    /// HTTP status of a failed fetch, if the server answered at all.
    pub fn fetch_status(&self) -> Option<u16> {
        match self {
            OutlookError::Fetch { status, .. } => *status,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        let err = OutlookError::MissingMarker {
            marker: "LAT...LON",
            excerpt: "Mesoscale Discussion 0412".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::Parse);

        let err = OutlookError::Fetch {
            url: "https://example.com/a.geojson".to_string(),
            status: Some(404),
            message: "HTTP 404 Not Found".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::Fetch);
        assert_eq!(err.fetch_status(), Some(404));
        assert!(err.to_string().contains("https://example.com/a.geojson"));

        let err = OutlookError::PaletteKeyNotFound {
            palette: "hail",
            category: "0.02".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::Lookup);
    }

    #[test]
    fn test_placeholder_message() {
        let err = OutlookError::MissingPlaceholder("hazard".to_string());
        assert_eq!(err.to_string(), "Template placeholder '{hazard}' has no value");
    }
}
