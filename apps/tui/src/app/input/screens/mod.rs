pub mod intro;
pub mod map;

use crossterm::event::KeyCode;

use crate::app::state::{App, AppScreen, Effect};

pub fn dispatch_input(app: &mut App, key: KeyCode) -> Option<Effect> {
    match app.screen {
        AppScreen::Intro => {
            intro::handle_intro_input(app, key);
            None
        }
        AppScreen::Map => map::handle_map_input(app, key),
    }
}
