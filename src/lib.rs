//! viz-rs: chart geometry toolkit.
//!
//! The crate turns tabular records into drawable geometry: dimensions and
//! margins, scales, histogram bins, line/area/arc/geo paths, keyed
//! enter/update/exit reconciliation and pointer interaction. Charts are
//! materialized as a `RenderFrame` that any `Renderer` can draw; an SVG
//! renderer is included.

pub mod animation;
pub mod api;
pub mod core;
pub mod data;
pub mod error;
pub mod interaction;
pub mod render;
pub mod selection;
pub mod shape;
pub mod telemetry;

pub use api::{Chart, ChartConfig};
pub use error::{ChartError, ChartResult};
