pub mod legend;
pub mod map_canvas;
pub mod panel;
