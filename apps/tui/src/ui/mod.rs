// UI module for greenmap_tui
// Handles all UI rendering functions

pub mod screens;
pub mod widgets;

use crate::app::state::AppScreen;
use crate::app::App;
use ratatui::Frame;

pub fn ui(app: &App, f: &mut Frame<'_>) {
    match app.screen {
        AppScreen::Intro => screens::intro::render_intro(app, f),
        AppScreen::Map => screens::map::render_map(app, f),
    }
}
