use crossterm::event::{KeyCode, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use crate::app::state::{App, AppScreen, Effect};
use crate::ui::screens::map::layout;

pub fn handle_map_input(app: &mut App, key: KeyCode) -> Option<Effect> {
    if app.show_help {
        if matches!(key, KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?')) {
            app.show_help = false;
        }
        return None;
    }

    if app.selected.is_some() {
        return handle_panel_input(app, key);
    }

    match key {
        KeyCode::Tab => {
            app.focus_next();
            None
        }
        KeyCode::BackTab => {
            app.focus_prev();
            None
        }
        KeyCode::Enter => app.focused.and_then(|index| app.select_greenspace(index)),
        KeyCode::Left => {
            app.viewport.pan(-0.1, 0.0);
            None
        }
        KeyCode::Right => {
            app.viewport.pan(0.1, 0.0);
            None
        }
        KeyCode::Up => {
            app.viewport.pan(0.0, 0.1);
            None
        }
        KeyCode::Down => {
            app.viewport.pan(0.0, -0.1);
            None
        }
        KeyCode::Char('+' | '=') => {
            app.viewport.zoom(0.8);
            None
        }
        KeyCode::Char('-') => {
            app.viewport.zoom(1.25);
            None
        }
        KeyCode::Char('i') => {
            app.screen = AppScreen::Intro;
            None
        }
        KeyCode::Char('?') | KeyCode::F(1) => {
            app.show_help = true;
            None
        }
        KeyCode::Esc => {
            app.status_message.clear();
            None
        }
        KeyCode::Char('q') => {
            app.running = false;
            None
        }
        _ => None,
    }
}

/// Key handling while the evaluation panel is open: printable keys feed
/// the draft, Enter submits, Esc dismisses (notification first, then the
/// selection itself).
fn handle_panel_input(app: &mut App, key: KeyCode) -> Option<Effect> {
    match key {
        KeyCode::Esc => {
            if app.status_message.is_empty() {
                app.dismiss_selection();
            } else {
                app.status_message.clear();
            }
            None
        }
        KeyCode::Enter => app.submit_draft(),
        KeyCode::Backspace => {
            app.draft.pop();
            None
        }
        KeyCode::Tab => {
            app.focus_next();
            None
        }
        KeyCode::BackTab => {
            app.focus_prev();
            None
        }
        KeyCode::Char(c) => {
            app.draft.push(c);
            None
        }
        _ => None,
    }
}

pub fn handle_map_mouse(
    app: &mut App,
    event: MouseEvent,
    terminal_area: Rect,
) -> Option<Effect> {
    if app.screen != AppScreen::Map || app.show_help {
        return None;
    }

    let map_inner = layout(terminal_area, app.selected.is_some()).map_inner();

    match event.kind {
        MouseEventKind::Moved => {
            app.update_hover(hit_test(app, map_inner, event.column, event.row));
            app.hovered_ndvi = nearest_ndvi(app, map_inner, event.column, event.row);
            None
        }
        MouseEventKind::Down(MouseButton::Left) => {
            hit_test(app, map_inner, event.column, event.row)
                .and_then(|index| app.select_greenspace(index))
        }
        MouseEventKind::ScrollUp => {
            app.viewport.zoom(0.8);
            None
        }
        MouseEventKind::ScrollDown => {
            app.viewport.zoom(1.25);
            None
        }
        _ => None,
    }
}

/// Resolves the greenspace under a terminal cell. Later features win when
/// polygons overlap, matching paint order.
fn hit_test(app: &App, map_inner: Rect, column: u16, row: u16) -> Option<usize> {
    let layers = app.layers.as_ref()?;
    let (lon, lat) = app.viewport.cell_to_lonlat(map_inner, column, row)?;
    layers
        .greenspaces
        .iter()
        .rposition(|greenspace| greenspace.contains(lon, lat))
}

/// NDVI sample close to the pointer, for the status readout.
fn nearest_ndvi(app: &App, map_inner: Rect, column: u16, row: u16) -> Option<f64> {
    let layers = app.layers.as_ref()?;
    let (lon, lat) = app.viewport.cell_to_lonlat(map_inner, column, row)?;
    let threshold = app.viewport.lon_span() * 0.02;

    let mut best: Option<(f64, f64)> = None;
    for point in &layers.points {
        let dx = point.lon - lon;
        let dy = point.lat - lat;
        let distance = dx.hypot(dy);
        if distance <= threshold && best.map_or(true, |(d, _)| distance < d) {
            best = Some((distance, point.value));
        }
    }
    best.map(|(_, value)| value)
}
