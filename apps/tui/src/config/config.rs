use dotenv::dotenv;
use std::env;
use std::path::PathBuf;

/// Resolved viewer configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub server_url: String,
}

/// Initializes the application configuration from the environment.
///
/// `GREENMAP_DATA_DIR` points at the directory holding the three GeoJSON
/// layers (default `./data`); `GREENMAP_SERVER_URL` is the evaluation
/// store endpoint (default `http://localhost:3001`).
pub fn init_app_config() -> AppConfig {
    // Load environment variables from .env file
    dotenv().ok();

    AppConfig {
        data_dir: get_data_dir(),
        server_url: get_server_url(),
    }
}

/// Gets the directory holding the GeoJSON layers.
pub fn get_data_dir() -> PathBuf {
    env::var("GREENMAP_DATA_DIR").map_or_else(|_| PathBuf::from("./data"), PathBuf::from)
}

/// Gets the evaluation store base URL.
pub fn get_server_url() -> String {
    env::var("GREENMAP_SERVER_URL").unwrap_or_else(|_| "http://localhost:3001".to_string())
}
