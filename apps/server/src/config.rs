use color_eyre::eyre::eyre;
use dotenv::dotenv;
use std::env;
use std::path::PathBuf;

/// Resolved server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub database_url: String,
    pub cors_origin: String,
}

/// Initializes the server configuration from the environment.
///
/// `PORT` defaults to 3001, `DATABASE_NAME` to `evaluations.db` next to
/// the working directory, `CORS_ORIGIN` to `*`.
pub fn init_server_config() -> color_eyre::Result<ServerConfig> {
    // Load environment variables from .env file
    dotenv().ok();

    let port = match env::var("PORT") {
        Ok(raw) => raw.parse::<u16>().map_err(|_| eyre!("invalid PORT: {raw}"))?,
        Err(_) => 3001,
    };

    let db_name = env::var("DATABASE_NAME").unwrap_or_else(|_| "evaluations.db".to_string());
    let database_url = database_url_for(&db_name)?;

    let cors_origin = env::var("CORS_ORIGIN").unwrap_or_else(|_| "*".to_string());

    Ok(ServerConfig {
        port,
        database_url,
        cors_origin,
    })
}

/// Builds the SQLite URL for a database file relative to the current
/// directory. SQLx wants three slashes for absolute paths and two for
/// relative ones.
fn database_url_for(db_name: &str) -> color_eyre::Result<String> {
    let base_dir: PathBuf = env::current_dir()?;
    let database_path = base_dir.join(db_name);

    if let Some(parent) = database_path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let path_str = database_path
        .to_str()
        .ok_or_else(|| eyre!("Invalid database path"))?;
    let clean_path = path_str.trim_start_matches('/');

    Ok(if database_path.is_absolute() {
        format!("sqlite:///{clean_path}")
    } else {
        format!("sqlite://{clean_path}")
    })
}
