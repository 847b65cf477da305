//! HTTP request handlers for the evaluation store.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tracing::{error, info, instrument};

use crate::db::queries::{get_evaluations, insert_evaluation};

pub struct AppState {
    pub pool: SqlitePool,
}

pub type SharedState = Arc<AppState>;

/// Body of `POST /evaluate`. `greenId` arrives as a string or a number
/// depending on the client, so it is taken as a raw JSON value and
/// normalized below.
#[derive(Debug, Deserialize)]
pub struct EvaluatePayload {
    #[serde(rename = "greenId")]
    pub green_id: Option<Value>,
    pub comment: Option<String>,
}

/// `POST /evaluate` — validates and stores one evaluation.
///
/// 400 when `greenId` is missing or `comment` trims to empty; 500 with
/// the raw storage error otherwise. A failed request never takes the
/// process down.
#[instrument(skip_all)]
pub async fn submit_evaluation(
    State(state): State<SharedState>,
    Json(payload): Json<EvaluatePayload>,
) -> (StatusCode, Json<Value>) {
    let Some(green_id) = normalize_green_id(payload.green_id.as_ref()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "greenId is required"})),
        );
    };

    let comment = payload.comment.as_deref().unwrap_or("").trim().to_string();
    if comment.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "comment must not be blank"})),
        );
    }

    match insert_evaluation(&state.pool, &green_id, &comment).await {
        Ok(()) => {
            info!(%green_id, "evaluation stored");
            (StatusCode::OK, Json(json!({"success": true})))
        }
        Err(e) => {
            error!(%green_id, error = %e, "failed to store evaluation");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": e.to_string()})),
            )
        }
    }
}

/// `GET /evaluations/:greenId` — all evaluations for a feature, newest
/// first. Unknown ids yield an empty array, not an error.
#[instrument(skip(state))]
pub async fn list_evaluations(
    State(state): State<SharedState>,
    Path(green_id): Path<String>,
) -> (StatusCode, Json<Value>) {
    match get_evaluations(&state.pool, &green_id).await {
        Ok(rows) => (StatusCode::OK, Json(json!(rows))),
        Err(e) => {
            error!(%green_id, error = %e, "failed to list evaluations");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": e.to_string()})),
            )
        }
    }
}

/// Accepts a JSON string or number; rejects missing, null, blank and
/// structured values.
fn normalize_green_id(raw: Option<&Value>) -> Option<String> {
    match raw? {
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                None
            } else {
                Some(s.to_string())
            }
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::setup_database;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn test_state() -> Result<SharedState, sqlx::Error> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        setup_database(&pool).await?;
        Ok(Arc::new(AppState { pool }))
    }

    fn payload(green_id: Value, comment: &str) -> EvaluatePayload {
        EvaluatePayload {
            green_id: Some(green_id),
            comment: Some(comment.to_string()),
        }
    }

    #[tokio::test]
    async fn missing_green_id_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
        let state = test_state().await?;

        let body = EvaluatePayload {
            green_id: None,
            comment: Some("x".to_string()),
        };
        let (status, Json(response)) = submit_evaluation(State(state), Json(body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(response.get("error").is_some());

        Ok(())
    }

    #[tokio::test]
    async fn whitespace_comment_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
        let state = test_state().await?;

        let (status, Json(response)) =
            submit_evaluation(State(state), Json(payload(json!(7), "   "))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(response.get("error").is_some());

        Ok(())
    }

    #[tokio::test]
    async fn submit_then_list_roundtrip() -> Result<(), Box<dyn std::error::Error>> {
        let state = test_state().await?;

        let (status, Json(response)) = submit_evaluation(
            State(state.clone()),
            Json(payload(json!("42"), "  nice park  ")),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(response.get("success"), Some(&json!(true)));

        let (status, Json(listed)) =
            list_evaluations(State(state), Path("42".to_string())).await;
        assert_eq!(status, StatusCode::OK);

        let rows = listed.as_array().map(Vec::as_slice).unwrap_or_default();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("comment"), Some(&json!("nice park")));
        assert!(rows[0]
            .get("created_at")
            .and_then(Value::as_str)
            .is_some_and(|s| !s.is_empty()));

        Ok(())
    }

    #[tokio::test]
    async fn numeric_green_ids_are_accepted() -> Result<(), Box<dyn std::error::Error>> {
        let state = test_state().await?;

        let (status, _) =
            submit_evaluation(State(state.clone()), Json(payload(json!(42), "fine"))).await;
        assert_eq!(status, StatusCode::OK);

        let (_, Json(listed)) = list_evaluations(State(state), Path("42".to_string())).await;
        assert_eq!(listed.as_array().map_or(0, Vec::len), 1);

        Ok(())
    }

    #[tokio::test]
    async fn listing_without_rows_returns_empty_array() -> Result<(), Box<dyn std::error::Error>>
    {
        let state = test_state().await?;

        let (status, Json(listed)) =
            list_evaluations(State(state), Path("999".to_string())).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed, json!([]));

        Ok(())
    }

    #[test]
    fn green_id_normalization() {
        assert_eq!(normalize_green_id(None), None);
        assert_eq!(normalize_green_id(Some(&json!(""))), None);
        assert_eq!(normalize_green_id(Some(&json!("  "))), None);
        assert_eq!(normalize_green_id(Some(&json!({"nested": 1}))), None);
        assert_eq!(
            normalize_green_id(Some(&json!("way-123"))),
            Some("way-123".to_string())
        );
        assert_eq!(normalize_green_id(Some(&json!(7))), Some("7".to_string()));
    }
}
