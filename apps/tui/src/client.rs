//! HTTP client for the evaluation store.

use serde::Deserialize;
use thiserror::Error;

/// A stored evaluation row, as returned by `GET /evaluations/:greenId`.
#[derive(Debug, Clone, Deserialize)]
pub struct EvaluationRecord {
    pub id: i64,
    pub green_id: String,
    pub comment: String,
    pub created_at: String,
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// Non-2xx response; status and body are surfaced to the user as-is.
    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },
}

#[derive(Debug, Clone)]
pub struct EvaluationClient {
    base_url: String,
    http: reqwest::Client,
}

impl EvaluationClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            http: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetches all evaluations for a feature, newest first. An unknown id
    /// yields an empty list, not an error.
    pub async fn list_evaluations(
        &self,
        green_id: &str,
    ) -> Result<Vec<EvaluationRecord>, ClientError> {
        let url = format!("{}/evaluations/{green_id}", self.base_url);
        let response = self.http.get(url).send().await?;
        let response = error_for_status(response).await?;
        Ok(response.json().await?)
    }

    /// Submits a new evaluation. The comment is trimmed by the caller;
    /// the server re-validates regardless.
    pub async fn submit_evaluation(
        &self,
        green_id: &str,
        comment: &str,
    ) -> Result<(), ClientError> {
        let url = format!("{}/evaluate", self.base_url);
        let payload = serde_json::json!({
            "greenId": green_id,
            "comment": comment,
        });
        let response = self.http.post(url).json(&payload).send().await?;
        error_for_status(response).await?;
        Ok(())
    }
}

/// Turns a non-2xx response into a `ClientError::Status` carrying the
/// body, so the panel can show the server's reason.
async fn error_for_status(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ClientError::Status {
        status: status.as_u16(),
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_stripped() {
        let client = EvaluationClient::new("http://localhost:3001/");
        assert_eq!(client.base_url(), "http://localhost:3001");
    }

    #[test]
    fn status_error_carries_status_and_body() {
        let err = ClientError::Status {
            status: 400,
            body: r#"{"error":"missing greenId"}"#.to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("400"));
        assert!(message.contains("missing greenId"));
    }
}
