//! Styling for SPC outlook overlays.
//!
//! Implements:
//! - The fixed SPC palettes
//! - Per-polygon style resolution with hazard rules and caller overrides
//! - Legend entry lists per product

pub mod legend;
pub mod palette;
pub mod style;

pub use legend::{LegendEntry, LegendKind};
pub use palette::{Palette, PaletteEntry, PaletteName};
pub use style::{resolve_style, LayerStyle, RecordStyle, StyleOverrides};
