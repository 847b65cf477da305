// Export our modules for use in binaries and tests
pub mod client;
pub mod config;
pub mod geodata;
pub mod ndvi;

pub use geodata::{Greenspace, MapLayers, NdviPoint};
pub use ndvi::{color_for, Rgb};
