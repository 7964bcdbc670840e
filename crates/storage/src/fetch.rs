//! Fetching outlook products into the local cache.
//!
//! A resource is looked up under the pre-existing bundle and the data
//! directory first. Only when neither has it is the remote product fetched,
//! written to a `.partial` sibling and renamed into place, so an interrupted
//! or failed fetch never leaves a truncated file at the target path.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use metrics::counter;
use reqwest::Client;
use tokio::fs;
use tracing::{debug, info, instrument, warn};

use outlook_common::{OutlookError, OutlookResult, ProductFamily};

use crate::config::StorageConfig;
use crate::locator::{Placeholders, ResourceDescriptor};

/// Retrieves the raw bytes behind a URL.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str) -> OutlookResult<Bytes>;
}

/// HTTP transport backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(config: &StorageConfig) -> OutlookResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .connect_timeout(config.connect_timeout())
            .user_agent(config.user_agent.clone())
            .pool_max_idle_per_host(4)
            .build()
            .map_err(|e| OutlookError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> OutlookResult<Bytes> {
        let fetch_error = |status: Option<u16>, message: String| OutlookError::Fetch {
            url: url.to_string(),
            status,
            message,
        };

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| fetch_error(e.status().map(|s| s.as_u16()), e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(fetch_error(Some(status.as_u16()), format!("HTTP {}", status)));
        }

        response
            .bytes()
            .await
            .map_err(|e| fetch_error(Some(status.as_u16()), e.to_string()))
    }
}

/// Resolves descriptors to local files, fetching what is missing.
#[derive(Clone)]
pub struct Fetcher {
    config: StorageConfig,
    transport: Arc<dyn Transport>,
}

impl Fetcher {
    pub fn new(config: StorageConfig, transport: Arc<dyn Transport>) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    /// First cache root holding `relative`, bundle before data directory.
    pub async fn locate(&self, relative: &Path) -> Option<PathBuf> {
        for root in self.config.search_roots() {
            let candidate = root.join(relative);
            if fs::metadata(&candidate)
                .await
                .map(|m| m.is_file())
                .unwrap_or(false)
            {
                return Some(candidate);
            }
        }
        None
    }

    /// Local path of the resource, fetching and persisting it when absent.
    ///
    /// Bulletins are stored as the decoded GeoJSON, everything else as the
    /// raw bytes received.
    #[instrument(skip(self, descriptor, placeholders), fields(family = %descriptor.family))]
    pub async fn resolve_path(
        &self,
        descriptor: &ResourceDescriptor,
        placeholders: &Placeholders,
    ) -> OutlookResult<PathBuf> {
        let relative = descriptor.relative_path(placeholders)?;

        if let Some(existing) = self.locate(&relative).await {
            debug!(path = %existing.display(), "Resource already cached");
            return Ok(existing);
        }

        let url = descriptor.url(&self.config.base_url, placeholders)?;
        let target = self.config.data_dir.join(&relative);

        counter!("outlook_fetch_total").increment(1);
        let body = match self.transport.get(&url).await {
            Ok(body) => body,
            Err(e) => {
                counter!("outlook_fetch_errors_total").increment(1);
                warn!(url = %url, error = %e, "Fetch failed");
                return Err(e);
            }
        };
        counter!("outlook_fetch_bytes_total").increment(body.len() as u64);

        let payload = match descriptor.family {
            ProductFamily::MesoscaleDiscussion => {
                let collection = bulletin_parser::parse_bulletin(&body)?;
                Bytes::from(serde_json::to_vec(&collection).map_err(OutlookError::Encode)?)
            }
            ProductFamily::Convective | ProductFamily::Fire => body,
        };

        persist_atomically(&target, &payload).await?;

        info!(
            url = %url,
            path = %target.display(),
            bytes = payload.len(),
            "Persisted outlook resource"
        );

        Ok(target)
    }
}

/// `<name>.partial` next to `target`.
fn partial_path(target: &Path) -> PathBuf {
    let mut name = target.file_name().unwrap_or_default().to_os_string();
    name.push(".partial");
    target.with_file_name(name)
}

/// Write `contents` to `target` via a sibling partial file.
pub async fn persist_atomically(target: &Path, contents: &[u8]) -> OutlookResult<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| OutlookError::io(parent, e))?;
    }

    let partial = partial_path(target);

    if let Err(e) = fs::write(&partial, contents).await {
        let _ = fs::remove_file(&partial).await;
        return Err(OutlookError::io(&partial, e));
    }

    if let Err(e) = fs::rename(&partial, target).await {
        let _ = fs::remove_file(&partial).await;
        return Err(OutlookError::io(target, e));
    }

    Ok(())
}
