mod config;

pub use config::{get_data_dir, get_server_url, init_app_config, AppConfig};
