use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "greenmap_tui", version, about = "Greenspace NDVI map viewer")]
pub struct CliArgs {
    /// Print layer stats and exit
    #[arg(long)]
    pub headless: bool,

    /// Print headless stats as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Override the GeoJSON data directory
    #[arg(long = "data-dir", value_name = "PATH")]
    pub data_dir: Option<String>,

    /// Override the evaluation server URL
    #[arg(long = "server-url", value_name = "URL")]
    pub server_url: Option<String>,
}

impl CliArgs {
    pub fn apply_env_overrides(&self) {
        if let Some(dir) = &self.data_dir {
            std::env::set_var("GREENMAP_DATA_DIR", dir);
        }
        if let Some(url) = &self.server_url {
            std::env::set_var("GREENMAP_SERVER_URL", url);
        }
        if self.debug {
            std::env::set_var("DEBUG", "1");
        }
    }
}
