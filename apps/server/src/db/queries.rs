use sqlx::{query, query_as, SqlitePool};

use crate::db::models::EvaluationRecord;

/// Inserts a new evaluation with a server-assigned timestamp. The insert
/// is a single atomic statement; concurrent writers interleave freely.
pub async fn insert_evaluation(
    pool: &SqlitePool,
    green_id: &str,
    comment: &str,
) -> Result<(), sqlx::Error> {
    let created_at = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string();

    query("INSERT INTO evaluations (green_id, comment, created_at) VALUES (?, ?, ?)")
        .bind(green_id)
        .bind(comment)
        .bind(created_at)
        .execute(pool)
        .await?;

    Ok(())
}

/// Retrieves all evaluations for a feature, newest first. The id is the
/// tie-breaker for rows inserted within the same second.
pub async fn get_evaluations(
    pool: &SqlitePool,
    green_id: &str,
) -> Result<Vec<EvaluationRecord>, sqlx::Error> {
    let rows = query_as::<_, EvaluationRecord>(
        "SELECT id, green_id, comment, created_at FROM evaluations \
         WHERE green_id = ? ORDER BY created_at DESC, id DESC",
    )
    .bind(green_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::setup_database;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn setup_test_db() -> Result<SqlitePool, sqlx::Error> {
        // Use an in-memory database for testing
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;

        setup_database(&pool).await?;

        Ok(pool)
    }

    #[tokio::test]
    async fn test_insert_and_list_roundtrip() -> Result<(), Box<dyn std::error::Error>> {
        let pool = setup_test_db().await?;

        insert_evaluation(&pool, "42", "nice park").await?;

        let rows = get_evaluations(&pool, "42").await?;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].green_id, "42");
        assert_eq!(rows[0].comment, "nice park");
        assert!(!rows[0].created_at.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_listing_unknown_id_is_empty() -> Result<(), Box<dyn std::error::Error>> {
        let pool = setup_test_db().await?;

        let rows = get_evaluations(&pool, "no-such-feature").await?;
        assert!(rows.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_rows_come_back_newest_first() -> Result<(), Box<dyn std::error::Error>> {
        let pool = setup_test_db().await?;

        query("INSERT INTO evaluations (green_id, comment, created_at) VALUES (?, ?, ?)")
            .bind("7")
            .bind("older")
            .bind("2026-08-06 09:00:00")
            .execute(&pool)
            .await?;
        query("INSERT INTO evaluations (green_id, comment, created_at) VALUES (?, ?, ?)")
            .bind("7")
            .bind("newer")
            .bind("2026-08-07 09:00:00")
            .execute(&pool)
            .await?;

        let rows = get_evaluations(&pool, "7").await?;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].comment, "newer");
        assert_eq!(rows[1].comment, "older");

        Ok(())
    }

    #[tokio::test]
    async fn test_same_second_inserts_order_by_id() -> Result<(), Box<dyn std::error::Error>> {
        let pool = setup_test_db().await?;

        insert_evaluation(&pool, "7", "first").await?;
        insert_evaluation(&pool, "7", "second").await?;

        let rows = get_evaluations(&pool, "7").await?;
        assert_eq!(rows.len(), 2);
        assert!(rows[0].id > rows[1].id);

        Ok(())
    }

    #[tokio::test]
    async fn test_lists_are_isolated_per_green_id() -> Result<(), Box<dyn std::error::Error>> {
        let pool = setup_test_db().await?;

        insert_evaluation(&pool, "1", "for one").await?;
        insert_evaluation(&pool, "2", "for two").await?;

        let rows = get_evaluations(&pool, "1").await?;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].comment, "for one");

        Ok(())
    }
}
