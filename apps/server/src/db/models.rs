use serde::Serialize;
use sqlx::FromRow;

/// Represents an evaluation row in the database.
///
/// Rows are immutable after insert; there is no update or delete path.
/// `green_id` is stored as text and is not checked against any feature
/// set, so orphaned rows are possible and must list without error.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct EvaluationRecord {
    pub id: i64,
    pub green_id: String,
    pub comment: String,
    pub created_at: String,
}
