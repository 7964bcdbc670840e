//! Overlay service: one fetcher and one record cache shared by every request.

use std::sync::Arc;

use tracing::{info, instrument};

use outlook_common::{
    Hazard, OutlookError, OutlookResult, ProductFamily, RequestKey, ResourceKey,
};
use renderer::{resolve_style, StyleOverrides};
use storage::{
    descriptor_for, read_records, Exclusions, Fetcher, HttpTransport, Placeholders, RecordCache,
    RecordCacheStats, Records, StorageConfig, Transport, DISCUSSION_DESCRIPTOR,
};

use crate::feature::{DiscussionFeature, OutlookFeature};

/// Builds overlay features, fetching and parsing each resource at most once.
pub struct OverlayService {
    fetcher: Fetcher,
    cache: RecordCache,
}

impl OverlayService {
    /// Service fetching over HTTP with the configured timeouts.
    pub fn new(config: StorageConfig) -> OutlookResult<Self> {
        config.validate()?;
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    pub fn with_transport(config: StorageConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            fetcher: Fetcher::new(config, transport),
            cache: RecordCache::new(),
        }
    }

    pub fn config(&self) -> &StorageConfig {
        self.fetcher.config()
    }

    pub async fn cache_stats(&self) -> RecordCacheStats {
        self.cache.stats().await
    }

    /// Styled outlook layer for `request`.
    ///
    /// Fields the product does not use (issuance time and hazard for day 4-8
    /// convective outlooks) are dropped before the cache lookup; fixed
    /// issuance times are filled in.
    #[instrument(skip_all, fields(family = %family, request = %request))]
    pub async fn outlook(
        &self,
        family: ProductFamily,
        request: RequestKey,
        overrides: &StyleOverrides,
    ) -> OutlookResult<OutlookFeature> {
        let descriptor = descriptor_for(family, request.forecast_day)?;
        let request = descriptor.normalize(request)?;

        // Probabilistic files also carry the SIGN polygon; it belongs to the sig* layer.
        let exclude = if family == ProductFamily::Convective
            && request.hazard.is_some_and(Hazard::embeds_significant)
        {
            Exclusions::none().with("LABEL", "SIGN")
        } else {
            Exclusions::none()
        };

        let key = ResourceKey::Outlook { family, request };
        let records = self
            .cache
            .get_or_fetch(key, || async {
                let path = self
                    .fetcher
                    .resolve_path(descriptor, &Placeholders::for_request(&request))
                    .await?;
                let records = read_records(&path, &exclude).await?;
                info!(key = %key, records = records.len(), "Loaded outlook");
                Ok(records)
            })
            .await?;

        let style = resolve_style(request.hazard, &records, overrides)?;
        Ok(OutlookFeature::new(family, request, records, style))
    }

    pub async fn convective_outlook(
        &self,
        request: RequestKey,
        overrides: &StyleOverrides,
    ) -> OutlookResult<OutlookFeature> {
        self.outlook(ProductFamily::Convective, request, overrides)
            .await
    }

    pub async fn fire_outlook(
        &self,
        request: RequestKey,
        overrides: &StyleOverrides,
    ) -> OutlookResult<OutlookFeature> {
        self.outlook(ProductFamily::Fire, request, overrides).await
    }

    /// Mesoscale discussion `number` of `year`.
    #[instrument(skip(self, overrides))]
    pub async fn discussion(
        &self,
        year: i32,
        number: u16,
        overrides: &StyleOverrides,
    ) -> OutlookResult<DiscussionFeature> {
        if number == 0 || number > 9999 {
            return Err(OutlookError::invalid(
                "number",
                format!("{} is not a four digit discussion number", number),
            ));
        }
        if !(0..=9999).contains(&year) {
            return Err(OutlookError::invalid(
                "year",
                format!("{} is not a four digit year", year),
            ));
        }
        overrides.validate()?;

        let key = ResourceKey::Discussion { year, number };
        let records: Records = self
            .cache
            .get_or_fetch(key, || async {
                let path = self
                    .fetcher
                    .resolve_path(
                        &DISCUSSION_DESCRIPTOR,
                        &Placeholders::for_discussion(year, number),
                    )
                    .await?;
                let records = read_records(&path, &Exclusions::none()).await?;
                info!(key = %key, "Loaded mesoscale discussion");
                Ok(records)
            })
            .await?;

        Ok(DiscussionFeature::new(year, number, records, overrides.clone()))
    }
}
