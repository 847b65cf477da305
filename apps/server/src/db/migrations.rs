use color_eyre::Result;
use sqlx::{
    migrate::MigrateDatabase, query, sqlite::SqlitePoolOptions, Sqlite, SqlitePool,
};

/// Sets up the database by creating the evaluations table if it doesn't
/// exist. The only schema management is create-if-absent.
pub async fn setup_database(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    query(
        "CREATE TABLE IF NOT EXISTS evaluations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            green_id TEXT NOT NULL,
            comment TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
    )
    .execute(pool)
    .await?;

    query("CREATE INDEX IF NOT EXISTS idx_evaluations_green_id ON evaluations (green_id)")
        .execute(pool)
        .await?;

    Ok(())
}

/// Creates a connection pool for the given SQLite URL, creating the
/// database file and schema when missing.
pub async fn create_database_pool(database_url: &str) -> Result<SqlitePool> {
    tracing::info!(database_url, "initializing database");

    if !Sqlite::database_exists(database_url).await.unwrap_or(false) {
        Sqlite::create_database(database_url).await.map_err(|e| {
            color_eyre::eyre::eyre!("Failed to create SQLite database: {e}")
        })?;
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .after_connect(|conn, _| {
            Box::pin(async move {
                use sqlx::Executor as _;
                // WAL keeps concurrent readers out of the writers' way
                conn.execute("PRAGMA journal_mode = WAL;").await?;
                conn.execute("PRAGMA synchronous = NORMAL;").await?;
                Ok(())
            })
        })
        .connect(database_url)
        .await
        .map_err(|e| color_eyre::eyre::eyre!("Failed to connect to SQLite database: {e}"))?;

    setup_database(&pool)
        .await
        .map_err(|e| color_eyre::eyre::eyre!("Failed to set up database schema: {e}"))?;

    Ok(pool)
}
