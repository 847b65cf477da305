use geo_types::LineString;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Style};
use ratatui::widgets::canvas::{Canvas, Circle, Context, Line as CanvasLine};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::app::App;
use crate::geodata::Greenspace;
use crate::ndvi::{color_for, Rgb};

pub fn render_map_canvas(app: &App, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title(" Greenspace NDVI Map ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));

    let Some(layers) = &app.layers else {
        let paragraph = Paragraph::new("No map data loaded")
            .block(block)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray));
        f.render_widget(paragraph, area);
        return;
    };

    let viewport = app.viewport;
    let selected_id = app.selected.as_ref().map(|s| s.id.as_str());
    let point_radius = viewport.lon_span() / 150.0;

    f.render_widget(
        Canvas::default()
            .block(block)
            .x_bounds([viewport.min_lon, viewport.max_lon])
            .y_bounds([viewport.min_lat, viewport.max_lat])
            .paint(|ctx| {
                for line in &layers.roads {
                    draw_polyline(ctx, line, Color::DarkGray);
                }

                for (index, greenspace) in layers.greenspaces.iter().enumerate() {
                    let color = polygon_color(app, index, greenspace, selected_id);
                    for polygon in &greenspace.boundary {
                        draw_polyline(ctx, polygon.exterior(), color);
                        for interior in polygon.interiors() {
                            draw_polyline(ctx, interior, color);
                        }
                    }
                }

                // Points last so the samples stay visible over polygons.
                for point in &layers.points {
                    ctx.draw(&Circle {
                        x: point.lon,
                        y: point.lat,
                        radius: point_radius,
                        color: color_for(point.value).into(),
                    });
                }
            }),
        area,
    );
}

/// Style resolution per feature: selection wins, hover/focus brightens the
/// feature's own base color, idle renders the base color untouched.
fn polygon_color(
    app: &App,
    index: usize,
    greenspace: &Greenspace,
    selected_id: Option<&str>,
) -> Color {
    if selected_id == Some(greenspace.id.as_str()) {
        Color::White
    } else if app.hovered == Some(index) || app.focused == Some(index) {
        highlight(greenspace.base_color).into()
    } else {
        greenspace.base_color.into()
    }
}

/// Hover analog of full fill opacity: the same hue, pushed brighter.
fn highlight(color: Rgb) -> Rgb {
    Rgb::new(
        color.r.saturating_add(80),
        color.g.saturating_add(80),
        color.b.saturating_add(80),
    )
}

fn draw_polyline(ctx: &mut Context<'_>, line: &LineString<f64>, color: Color) {
    for pair in line.0.windows(2) {
        ctx.draw(&CanvasLine {
            x1: pair[0].x,
            y1: pair[0].y,
            x2: pair[1].x,
            y2: pair[1].y,
            color,
        });
    }
}
