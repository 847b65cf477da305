use clap::Parser;

#[derive(Debug, Parser)]
#[command(
    name = "greenmap_server",
    version,
    about = "Evaluation store for the greenmap viewer"
)]
pub struct CliArgs {
    /// Override the listen port
    #[arg(long)]
    pub port: Option<u16>,

    /// Override the database file
    #[arg(long, value_name = "PATH")]
    pub db: Option<String>,

    /// Override the allowed CORS origin
    #[arg(long = "cors-origin", value_name = "ORIGIN")]
    pub cors_origin: Option<String>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl CliArgs {
    pub fn apply_env_overrides(&self) {
        if let Some(port) = self.port {
            std::env::set_var("PORT", port.to_string());
        }
        if let Some(db) = &self.db {
            std::env::set_var("DATABASE_NAME", db);
        }
        if let Some(origin) = &self.cors_origin {
            std::env::set_var("CORS_ORIGIN", origin);
        }
        if self.debug {
            std::env::set_var("RUST_LOG", "debug");
        }
    }
}
