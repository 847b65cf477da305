use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::ndvi::color_for;

/// Color-ramp legend strip under the map: the full NDVI gradient with its
/// endpoints labelled.
pub fn render_legend(f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title(" NDVI ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    f.render_widget(block, area);

    if inner.width < 12 || inner.height < 1 {
        return;
    }

    let steps = usize::from(inner.width.saturating_sub(8));
    let label_style = Style::default().fg(Color::Gray);

    let mut spans = vec![Span::styled("0.0 ", label_style)];
    for i in 0..steps {
        #[allow(clippy::cast_precision_loss)]
        let value = i as f64 / steps.saturating_sub(1).max(1) as f64;
        spans.push(Span::styled(
            "█",
            Style::default().fg(color_for(value).into()),
        ));
    }
    spans.push(Span::styled(" 1.0", label_style));

    f.render_widget(Paragraph::new(TextLine::from(spans)), inner);
}
