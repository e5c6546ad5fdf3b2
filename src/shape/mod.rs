//! Shape generators: SVG path data for lines, areas, arcs and maps.

mod arc;
mod area;
mod curve;
pub mod geo;
mod line;
mod path;
mod radial;

pub use arc::{ArcGenerator, PieLayout, PieSlice, PieSort};
pub use area::AreaGenerator;
pub use curve::Curve;
pub use line::LineGenerator;
pub use path::{PathBuilder, format_number};
pub use radial::{RadialLineGenerator, polar_to_cartesian};
