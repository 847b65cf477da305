use chrono::NaiveDateTime;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;
use throbber_widgets_tui::Throbber;

use crate::app::App;

/// Evaluation panel for the selected greenspace: past evaluations on top
/// (newest first, as served), the draft input below.
pub fn render_panel(app: &App, f: &mut Frame<'_>, area: Rect) {
    let Some(selected) = &app.selected else {
        return;
    };

    let block = Block::default()
        .title(format!(" {} ", selected.name))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(4),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(inner);

    render_evaluations(app, f, chunks[0]);
    render_draft(app, f, chunks[1]);

    let hint = TextLine::from(vec![
        Span::styled(
            "Enter",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(": Submit  ", Style::default().fg(Color::Gray)),
        Span::styled(
            "Esc",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(": Close", Style::default().fg(Color::Gray)),
    ]);
    f.render_widget(Paragraph::new(hint), chunks[2]);
}

fn render_evaluations(app: &App, f: &mut Frame<'_>, area: Rect) {
    if app.evaluations_loading {
        let throbber = Throbber::default().label("Loading evaluations...");
        f.render_stateful_widget(throbber, area, &mut app.throbber.clone());
        return;
    }

    if app.evaluations.is_empty() {
        let paragraph = Paragraph::new("No evaluations yet. Add the first one below.")
            .style(Style::default().fg(Color::Gray))
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
        return;
    }

    let mut lines = vec![TextLine::from(Span::styled(
        format!("Past evaluations ({}):", app.evaluations.len()),
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    ))];
    for record in &app.evaluations {
        lines.push(TextLine::from(Span::styled(
            record.comment.clone(),
            Style::default().fg(Color::White),
        )));
        lines.push(TextLine::from(Span::styled(
            format_timestamp(&record.created_at),
            Style::default().fg(Color::DarkGray),
        )));
        lines.push(TextLine::from(""));
    }

    let paragraph = Paragraph::new(Text::from(lines)).wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn render_draft(app: &App, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title(" Add evaluation ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let content = if app.submitting {
        Span::styled("Submitting...", Style::default().fg(Color::Gray))
    } else {
        let blink = (app.animation_counter * 2.0).sin() > 0.0;
        let cursor = if blink { "█" } else { " " };
        Span::styled(
            format!("> {}{cursor}", app.draft),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
    };

    f.render_widget(Paragraph::new(TextLine::from(content)).block(block), area);
}

/// SQLite hands back `YYYY-MM-DD HH:MM:SS`; trim the seconds for display
/// and fall back to the raw string for anything unexpected.
fn format_timestamp(raw: &str) -> String {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map_or_else(
        |_| raw.to_string(),
        |dt| dt.format("%Y-%m-%d %H:%M").to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::format_timestamp;

    #[test]
    fn timestamps_drop_seconds() {
        assert_eq!(
            format_timestamp("2026-08-07 10:30:45"),
            "2026-08-07 10:30"
        );
    }

    #[test]
    fn unparseable_timestamps_pass_through() {
        assert_eq!(format_timestamp("just now"), "just now");
    }
}
