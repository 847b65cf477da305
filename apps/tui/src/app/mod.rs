// App module for greenmap_tui
// Handles application state and business logic

pub mod input;
pub mod state;

pub use input::{handle_input, handle_mouse};
pub use state::{App, AppScreen, Effect, NetEvent, SelectedFeature, Viewport};
