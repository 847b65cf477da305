use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Margin},
    style::{Color, Modifier, Style},
    text::{Line as TextLine, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::App;

/// Upper bound for the intro scroll offset; roughly the content height.
pub const INTRO_MAX_SCROLL: u16 = 24;

const INTRO_LINES: &[&str] = &[
    "",
    "Cities breathe through their green spaces. Parks, riverside strips",
    "and pocket gardens cool the streets around them, absorb stormwater",
    "and give neighbourhoods room to slow down.",
    "",
    "Greenmap visualizes that green infrastructure for central Hangzhou.",
    "The map combines three layers:",
    "",
    "  * the road network, for orientation,",
    "  * NDVI sample points, colored from bare-soil brown to dense-canopy",
    "    green by their vegetation index,",
    "  * greenspace polygons from OpenStreetMap, each one selectable.",
    "",
    "NDVI (Normalized Difference Vegetation Index) condenses satellite",
    "imagery into a single 0-to-1 score per sample point: the greener the",
    "dot, the denser the vegetation it measured.",
    "",
    "Hover a greenspace to highlight it and see its name. Click it (or",
    "Tab to it and press Enter) to open the evaluation panel, read what",
    "others wrote about the place, and leave your own evaluation.",
    "",
    "Evaluations are stored by the greenmap server; start it alongside",
    "this viewer or point GREENMAP_SERVER_URL at a running instance.",
    "",
];

pub fn render_intro(app: &App, f: &mut Frame<'_>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(f.area().inner(Margin::new(2, 1)));

    let title_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));
    let title = Paragraph::new(Text::from(vec![
        TextLine::from(Span::styled(
            "G R E E N M A P",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )),
        TextLine::from(Span::styled(
            "Urban greenspace & NDVI viewer",
            Style::default().fg(Color::White),
        )),
        TextLine::from(Span::styled(
            "Hangzhou study area",
            Style::default().fg(Color::Gray),
        )),
    ]))
    .alignment(Alignment::Center)
    .block(title_block);
    f.render_widget(title, chunks[0]);

    let body_lines = INTRO_LINES
        .iter()
        .map(|line| TextLine::from(*line))
        .collect::<Vec<_>>();
    let body = Paragraph::new(Text::from(body_lines))
        .block(
            Block::default()
                .title(" About ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .wrap(Wrap { trim: false })
        .scroll((app.intro_scroll, 0));
    f.render_widget(body, chunks[1]);

    let hint = TextLine::from(vec![
        Span::styled(
            "↑/↓",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(": Scroll | ", Style::default().fg(Color::Gray)),
        Span::styled(
            "Enter",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(": Open map | ", Style::default().fg(Color::Gray)),
        Span::styled(
            "q",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(": Quit", Style::default().fg(Color::Gray)),
    ]);
    f.render_widget(Paragraph::new(hint).alignment(Alignment::Center), chunks[2]);
}
