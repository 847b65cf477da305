use std::io::Stdout;
use std::sync::Arc;
use std::time::Duration;

use color_eyre::Result;
use crossterm::event::{self, Event};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::Terminal;
use tokio::sync::mpsc;

use crate::app::state::{App, Effect, NetEvent};
use crate::app::{handle_input, handle_mouse};
use crate::client::EvaluationClient;
use crate::ui;

/// Run the main application event loop.
///
/// Network work is spawned, never awaited here: the loop keeps drawing
/// while fetches are in flight, and completed results come back through
/// the channel tagged with the selection token they were issued under.
pub async fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    client: EvaluationClient,
) -> Result<()> {
    // Configure event poll timeout (ms)
    const EVENT_POLL_TIMEOUT: u64 = 50;

    let client = Arc::new(client);
    let (tx, mut rx) = mpsc::unbounded_channel::<NetEvent>();

    loop {
        // Update animations
        app.update();

        if let Err(e) = terminal.draw(|f| ui::ui(app, f)) {
            return Err(color_eyre::eyre::eyre!("Terminal draw error: {e}"));
        }

        // Drain completed fetches/submits; stale tokens are dropped inside
        // apply_net_event, follow-up effects (post-submit refresh) are
        // dispatched right away.
        while let Ok(net) = rx.try_recv() {
            if let Some(effect) = app.apply_net_event(net) {
                dispatch(effect, &client, &tx);
            }
        }

        if matches!(
            event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT)),
            Ok(true)
        ) {
            match event::read() {
                Ok(Event::Key(key)) => {
                    if let Some(effect) = handle_input(app, key.code) {
                        dispatch(effect, &client, &tx);
                    }
                    if !app.running {
                        break;
                    }
                }
                Ok(Event::Mouse(mouse)) => {
                    let (width, height) = crossterm::terminal::size().unwrap_or((80, 24));
                    let area = Rect::new(0, 0, width, height);
                    if let Some(effect) = handle_mouse(app, mouse, area) {
                        dispatch(effect, &client, &tx);
                    }
                }
                Ok(Event::Resize(_, _)) => {
                    // Force a redraw after resize
                    if terminal.draw(|f| ui::ui(app, f)).is_err() {
                        // Non-fatal redraw error
                    }
                }
                Ok(Event::FocusGained | Event::FocusLost | Event::Paste(_)) | Err(_) => {
                    // Ignore the rest
                }
            }
        }
    }
    Ok(())
}

/// Spawns the network call for an effect and routes its completion back
/// into the loop's channel.
fn dispatch(
    effect: Effect,
    client: &Arc<EvaluationClient>,
    tx: &mpsc::UnboundedSender<NetEvent>,
) {
    let client = Arc::clone(client);
    let tx = tx.clone();
    tokio::spawn(async move {
        let net = match effect {
            Effect::FetchEvaluations { token, green_id } => {
                let result = client.list_evaluations(&green_id).await;
                NetEvent::EvaluationsFetched { token, result }
            }
            Effect::SubmitEvaluation {
                token,
                green_id,
                comment,
            } => {
                let result = client.submit_evaluation(&green_id, &comment).await;
                NetEvent::SubmitFinished { token, result }
            }
        };
        let _ = tx.send(net);
    });
}

/// Run the application in headless mode (no UI)
pub fn run_headless(app: &mut App, json: bool) -> Result<()> {
    app.initialize()?;

    if json {
        render_headless_json(app)?;
    } else {
        render_headless_stats(app);
    }

    Ok(())
}

fn render_headless_stats(app: &App) {
    let Some(stats) = build_headless_stats(app) else {
        println!("No layers loaded");
        return;
    };

    println!("\nGreenmap Layer Stats");
    println!("====================");
    println!("Greenspaces: {}", stats.greenspaces);
    println!("Roads: {}", stats.roads);
    println!("NDVI samples: {}", stats.ndvi_points);
    println!("Skipped samples (non-numeric NDVI): {}", stats.skipped_points);

    if let (Some(min), Some(mean), Some(max)) = (stats.ndvi_min, stats.ndvi_mean, stats.ndvi_max) {
        println!("\nNDVI range:");
        println!("- min: {min:.3}");
        println!("- mean: {mean:.3}");
        println!("- max: {max:.3}");
    }
}

fn render_headless_json(app: &App) -> Result<()> {
    let Some(stats) = build_headless_stats(app) else {
        println!("{{}}");
        return Ok(());
    };
    let json = serde_json::to_string_pretty(&stats)?;
    println!("{json}");
    Ok(())
}

fn build_headless_stats(app: &App) -> Option<HeadlessStats> {
    let layers = app.layers.as_ref()?;

    let mut ndvi_min = None;
    let mut ndvi_max = None;
    let mut sum = 0.0;
    for point in &layers.points {
        sum += point.value;
        ndvi_min = Some(ndvi_min.map_or(point.value, |m: f64| m.min(point.value)));
        ndvi_max = Some(ndvi_max.map_or(point.value, |m: f64| m.max(point.value)));
    }
    #[allow(clippy::cast_precision_loss)]
    let ndvi_mean = if layers.points.is_empty() {
        None
    } else {
        Some(sum / layers.points.len() as f64)
    };

    Some(HeadlessStats {
        greenspaces: layers.greenspaces.len(),
        roads: layers.roads.len(),
        ndvi_points: layers.points.len(),
        skipped_points: layers.skipped_points,
        ndvi_min,
        ndvi_mean,
        ndvi_max,
    })
}

#[derive(serde::Serialize)]
struct HeadlessStats {
    greenspaces: usize,
    roads: usize,
    ndvi_points: usize,
    skipped_points: usize,
    ndvi_min: Option<f64>,
    ndvi_mean: Option<f64>,
    ndvi_max: Option<f64>,
}
