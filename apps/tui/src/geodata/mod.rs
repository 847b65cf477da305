// Geodata module for greenmap_tui
// Loads and types the static GeoJSON layers the map renders

pub mod feature;
pub mod loader;

pub use feature::{Greenspace, NdviPoint};
pub use loader::{load_layers, Bounds, GeodataError, MapLayers};
