//! Map overlays for SPC outlooks and mesoscale discussions.
//!
//! [`OverlayService`] ties the pipeline together: descriptor lookup, fetching
//! into the local cache, reading records once per request, and resolving the
//! per-polygon style a plotting library needs.

pub mod feature;
pub mod service;

pub use feature::{DiscussionFeature, OutlookFeature};
pub use service::OverlayService;
