mod app;
mod cli;
mod client;
mod config;
mod event;
mod geodata;
mod ndvi;
mod terminal;
mod ui;

use app::App;
use clap::Parser;
use client::EvaluationClient;
use color_eyre::Result;

#[tokio::main]
async fn main() -> Result<()> {
    // Setup error handling
    color_eyre::install()?;

    let args = cli::CliArgs::parse();
    args.apply_env_overrides();

    // Initialize application state
    let mut app = App::new();

    // Check if we're running in a terminal
    if args.headless || !is_terminal() {
        // Run in headless mode
        return event::run_headless(&mut app, args.json);
    }

    // Load configuration and the GeoJSON layers
    if let Err(e) = app.initialize() {
        eprintln!("Error loading map layers: {e}");
        eprintln!("Will continue with an empty map");
        app.status_message = format!("Error: failed to load map layers: {e}");
    }

    let client = EvaluationClient::new(app.server_url.clone());

    // Setup terminal
    let mut terminal = terminal::setup()?;

    // Run the application
    let result = event::run(&mut terminal, &mut app, client).await;

    // Restore terminal
    terminal::cleanup(true, true);

    // Return the result
    result
}

// Check if we're running in a terminal
fn is_terminal() -> bool {
    atty::is(atty::Stream::Stdout)
}
