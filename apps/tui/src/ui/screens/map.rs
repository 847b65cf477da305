use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line as TextLine, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::ui::widgets::{legend, map_canvas, panel};

/// Width of the evaluation panel column when a feature is selected.
const PANEL_WIDTH: u16 = 38;

/// Screen regions for the map view. Input handlers rebuild this from the
/// terminal size so mouse hit-testing matches what was drawn.
#[derive(Debug, Clone, Copy)]
pub struct MapLayout {
    pub map: Rect,
    pub legend: Rect,
    pub panel: Option<Rect>,
    pub status: Rect,
    pub shortcuts: Rect,
}

impl MapLayout {
    /// Canvas area inside the map block's borders; the region mouse
    /// coordinates are projected from.
    pub fn map_inner(&self) -> Rect {
        Rect {
            x: self.map.x.saturating_add(1),
            y: self.map.y.saturating_add(1),
            width: self.map.width.saturating_sub(2),
            height: self.map.height.saturating_sub(2),
        }
    }
}

pub fn layout(area: Rect, panel_open: bool) -> MapLayout {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(8),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(area);

    let (content, panel) = if panel_open {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(20), Constraint::Length(PANEL_WIDTH)])
            .split(rows[0]);
        (columns[0], Some(columns[1]))
    } else {
        (rows[0], None)
    };

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(3)])
        .split(content);

    MapLayout {
        map: left[0],
        legend: left[1],
        panel,
        status: rows[1],
        shortcuts: rows[2],
    }
}

pub fn render_map(app: &App, f: &mut Frame<'_>) {
    if app.show_help {
        render_help(f, f.area().inner(Margin::new(2, 1)));
        return;
    }

    let regions = layout(f.area(), app.selected.is_some());

    map_canvas::render_map_canvas(app, f, regions.map);
    legend::render_legend(f, regions.legend);
    if let Some(panel_area) = regions.panel {
        panel::render_panel(app, f, panel_area);
    }
    render_status(app, f, regions.status);
    render_shortcuts(app, f, regions.shortcuts);
}

fn render_status(app: &App, f: &mut Frame<'_>, area: Rect) {
    let status_block = Block::default()
        .title(" Status ")
        .title_style(Style::default().fg(Color::Yellow))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let status_text = if app.status_message.is_empty() {
        hover_readout(app)
    } else {
        let style = if app.status_message.starts_with("Error") {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(Color::Green)
        };
        Text::from(Span::styled(&app.status_message, style))
    };

    let paragraph = Paragraph::new(status_text)
        .block(status_block)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

/// With no pending notification the status line doubles as the tooltip:
/// hovered greenspace name and nearby NDVI reading.
fn hover_readout(app: &App) -> Text<'static> {
    let mut spans = Vec::new();

    if let Some(greenspace) = app
        .hovered
        .and_then(|i| app.layers.as_ref()?.greenspaces.get(i))
    {
        spans.push(Span::styled(
            greenspace.label(),
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ));
    }

    if let Some(value) = app.hovered_ndvi {
        if !spans.is_empty() {
            spans.push(Span::raw("   "));
        }
        spans.push(Span::styled(
            format!("NDVI: {value:.2}"),
            Style::default().fg(Color::White),
        ));
    }

    if spans.is_empty() {
        Text::from(Span::styled(
            "Hover a greenspace, or Tab + Enter to select one",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Text::from(TextLine::from(spans))
    }
}

fn render_shortcuts(app: &App, f: &mut Frame<'_>, area: Rect) {
    let key_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let label_style = Style::default().fg(Color::Gray);

    let shortcuts = if app.selected.is_some() {
        TextLine::from(vec![
            Span::styled("Type", key_style),
            Span::styled(": Draft | ", label_style),
            Span::styled("Enter", key_style),
            Span::styled(": Submit | ", label_style),
            Span::styled("Esc", key_style),
            Span::styled(": Close panel | ", label_style),
            Span::styled("Tab", key_style),
            Span::styled(": Next greenspace", label_style),
        ])
    } else {
        TextLine::from(vec![
            Span::styled("Click/Enter", key_style),
            Span::styled(": Select | ", label_style),
            Span::styled("Tab", key_style),
            Span::styled(": Cycle | ", label_style),
            Span::styled("Arrows", key_style),
            Span::styled(": Pan | ", label_style),
            Span::styled("+/-", key_style),
            Span::styled(": Zoom | ", label_style),
            Span::styled("?", key_style),
            Span::styled(": Help | ", label_style),
            Span::styled("q", key_style),
            Span::styled(": Quit", label_style),
        ])
    };

    f.render_widget(Paragraph::new(shortcuts).alignment(Alignment::Center), area);
}

pub fn render_help(f: &mut Frame<'_>, area: Rect) {
    let help_block = Block::default()
        .title("== Help & Keyboard Shortcuts ==")
        .title_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let key = |k: &'static str, desc: &'static str| {
        TextLine::from(vec![
            Span::styled(
                format!("  {k}"),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!(" - {desc}"), Style::default()),
        ])
    };

    let help_text = vec![
        TextLine::from(Span::styled(
            "Greenmap Viewer",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )),
        TextLine::from(""),
        TextLine::from("Explore greenspaces and NDVI samples, and attach evaluations to any greenspace."),
        TextLine::from(""),
        TextLine::from(Span::styled(
            "Map:",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        key("Mouse move", "Hover / highlight greenspaces"),
        key("Left click", "Select the greenspace under the cursor"),
        key("Tab / Shift-Tab", "Cycle keyboard focus through greenspaces"),
        key("Enter", "Select the focused greenspace"),
        key("Arrow keys", "Pan the viewport"),
        key("+ / -", "Zoom in / out (mouse wheel works too)"),
        key("i", "Back to the intro screen"),
        TextLine::from(""),
        TextLine::from(Span::styled(
            "Evaluation panel (open while a greenspace is selected):",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        key("Printable keys", "Type the evaluation draft"),
        key("Enter", "Submit (needs non-blank text)"),
        key("Esc", "Dismiss notification, then close the panel"),
        TextLine::from(""),
        TextLine::from(Span::styled(
            "Press Esc to close this help screen",
            Style::default().fg(Color::Yellow),
        )),
    ];

    let help_paragraph = Paragraph::new(Text::from(help_text))
        .block(help_block)
        .wrap(Wrap { trim: true });

    f.render_widget(help_paragraph, area);
}
