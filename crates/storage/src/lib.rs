//! Storage layer for SPC outlook overlays.
//!
//! Provides:
//! - Configuration of the local cache layout and the upstream host
//! - The `(forecast day, product family)` descriptor table and path templating
//! - Fetching remote products exactly once into the local cache
//! - Reading cached GeoJSON into geometry records
//! - A process-lifetime record cache keyed by request

pub mod cache;
pub mod config;
pub mod fetch;
pub mod locator;
#[cfg(any(test, feature = "test-util"))]
pub mod memory;
pub mod reader;

pub use cache::{RecordCache, RecordCacheStats, Records};
pub use config::StorageConfig;
pub use fetch::{persist_atomically, Fetcher, HttpTransport, Transport};
pub use locator::{
    descriptor_for, render_template, HazardRule, IssuanceRule, Placeholders, ResourceDescriptor,
    DISCUSSION_DESCRIPTOR,
};
#[cfg(any(test, feature = "test-util"))]
pub use memory::MemoryTransport;
pub use reader::{filter_records, geometries, read_geometries, read_records, Exclusions};
