pub mod constants;
pub mod error;
pub mod extent;
pub mod colormap;
pub mod time_array;
pub mod renderer;
pub mod scatter;
pub mod hexbin;
pub mod gif_exporter;
pub mod exporter;

pub use error::{Result, VizError};
pub use exporter::{AnimationKind, ExportConfig, ExportSummary, Exporter};
pub use time_array::{PointSlice, SimulationProps, TimeArray};

#[cfg(test)]
mod exporter_test;
