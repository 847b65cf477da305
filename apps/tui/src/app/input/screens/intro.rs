use crossterm::event::KeyCode;

use crate::app::state::{App, AppScreen};
use crate::ui::screens::intro::INTRO_MAX_SCROLL;

pub fn handle_intro_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Up => app.scroll_intro(-1, INTRO_MAX_SCROLL),
        KeyCode::Down => app.scroll_intro(1, INTRO_MAX_SCROLL),
        KeyCode::PageUp => app.scroll_intro(-5, INTRO_MAX_SCROLL),
        KeyCode::PageDown => app.scroll_intro(5, INTRO_MAX_SCROLL),
        KeyCode::Home => app.intro_scroll = 0,
        KeyCode::Enter | KeyCode::Char(' ' | 'm') => {
            app.screen = AppScreen::Map;
        }
        KeyCode::Char('q') | KeyCode::Esc => {
            app.running = false;
        }
        _ => {}
    }
}
