pub mod screens;

use crossterm::event::{KeyCode, MouseEvent};
use ratatui::layout::Rect;

use crate::app::state::{App, Effect};

pub fn handle_input(app: &mut App, key: KeyCode) -> Option<Effect> {
    screens::dispatch_input(app, key)
}

pub fn handle_mouse(app: &mut App, event: MouseEvent, terminal_area: Rect) -> Option<Effect> {
    screens::map::handle_map_mouse(app, event, terminal_area)
}
