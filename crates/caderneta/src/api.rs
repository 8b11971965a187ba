//! HTTP client for the homeschooling records API.
//!
//! One typed method per backend operation, built on shared plumbing that
//! normalizes every failure into a single [`ApiError`]: non-2xx responses
//! surface the backend's `detail` message when present, transport and decode
//! failures carry their cause. Each failure is logged once here and then
//! returned so the initiating flow can apply its own placeholder.

use reqwest::header::CONTENT_DISPOSITION;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error};

use crate::types::{Activity, AnalysisResult, Child, Goal, NewActivity, NewChild, NewGoal, Subject};

/// Uniform failure type for all API calls.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Non-2xx response, with the backend's `detail` message when available.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// The request never produced a response.
    #[error("falha de rede: {0}")]
    Transport(reqwest::Error),

    /// The response body could not be interpreted.
    #[error("resposta inválida da API: {0}")]
    Decode(String),
}

/// A generated PDF report as returned by the backend: raw bytes plus the
/// filename suggested by the `Content-Disposition` header, if any.
#[derive(Debug, Clone)]
pub struct ReportDownload {
    pub filename: Option<String>,
    pub bytes: Vec<u8>,
}

/// Body for the report and analysis endpoints, which scope by child.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ChildScopedRequest<'a> {
    child_id: &'a str,
}

/// Client for the remote homeschooling API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // ---- typed endpoints ----

    pub async fn list_children(&self) -> Result<Vec<Child>, ApiError> {
        self.json(self.http.get(self.url("/api/children"))).await
    }

    pub async fn add_child(&self, payload: &NewChild) -> Result<Child, ApiError> {
        self.json(self.http.post(self.url("/api/children")).json(payload))
            .await
    }

    pub async fn list_subjects(&self) -> Result<Vec<Subject>, ApiError> {
        self.json(self.http.get(self.url("/api/subjects"))).await
    }

    pub async fn list_goals(&self, child_id: &str) -> Result<Vec<Goal>, ApiError> {
        let path = format!("/api/children/{child_id}/goals");
        self.json(self.http.get(self.url(&path))).await
    }

    pub async fn add_goal(&self, child_id: &str, payload: &NewGoal) -> Result<Goal, ApiError> {
        let path = format!("/api/children/{child_id}/goals");
        self.json(self.http.post(self.url(&path)).json(payload)).await
    }

    pub async fn list_activities(&self, child_id: &str) -> Result<Vec<Activity>, ApiError> {
        let path = format!("/api/children/{child_id}/activities");
        self.json(self.http.get(self.url(&path))).await
    }

    pub async fn log_activity(
        &self,
        child_id: &str,
        payload: &NewActivity,
    ) -> Result<Activity, ApiError> {
        let path = format!("/api/children/{child_id}/activities");
        self.json(self.http.post(self.url(&path)).json(payload)).await
    }

    /// Request the example PDF report for a child.
    ///
    /// Unlike the JSON endpoints, the body is returned as raw bytes together
    /// with the filename suggested by `Content-Disposition`.
    pub async fn generate_report(&self, child_id: &str) -> Result<ReportDownload, ApiError> {
        let request = self
            .http
            .post(self.url("/api/reports/generate-example"))
            .json(&ChildScopedRequest { child_id });
        let response = self.send(request).await?;

        let filename = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|value| value.to_str().ok())
            .and_then(parse_filename);

        let bytes = response
            .bytes()
            .await
            .map_err(|e| surfaced(ApiError::Decode(e.to_string())))?
            .to_vec();

        debug!(size = bytes.len(), filename = ?filename, "relatório recebido");
        Ok(ReportDownload { filename, bytes })
    }

    pub async fn analyze(&self, child_id: &str) -> Result<AnalysisResult, ApiError> {
        self.json(
            self.http
                .post(self.url("/api/ai/analyze-simulated"))
                .json(&ChildScopedRequest { child_id }),
        )
        .await
    }

    // ---- shared plumbing ----

    /// Send a request and normalize the failure paths. On non-2xx the body is
    /// read and the backend's `detail` field is preferred over the HTTP
    /// status reason.
    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|e| surfaced(ApiError::Transport(e)))?;

        let status = response.status();
        if !status.is_success() {
            let fallback = status
                .canonical_reason()
                .unwrap_or("erro desconhecido")
                .to_string();
            let message = match response.text().await {
                Ok(body) => extract_detail(&body).unwrap_or(fallback),
                Err(_) => fallback,
            };
            return Err(surfaced(ApiError::Http {
                status: status.as_u16(),
                message,
            }));
        }

        Ok(response)
    }

    /// Send and decode a JSON response.
    async fn json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = self.send(request).await?;
        match decode(response).await? {
            Some(value) => Ok(value),
            None => Err(surfaced(ApiError::Decode(
                "corpo vazio (204) onde JSON era esperado".to_string(),
            ))),
        }
    }
}

/// Decode a successful response body. `204 No Content` maps to `None`,
/// distinct from a body containing JSON `null`.
async fn decode<T: DeserializeOwned>(response: Response) -> Result<Option<T>, ApiError> {
    if response.status() == StatusCode::NO_CONTENT {
        return Ok(None);
    }
    let body = response
        .text()
        .await
        .map_err(|e| surfaced(ApiError::Decode(e.to_string())))?;
    serde_json::from_str(&body)
        .map(Some)
        .map_err(|e| surfaced(ApiError::Decode(e.to_string())))
}

/// Log the failure once before handing it back to the caller.
fn surfaced(err: ApiError) -> ApiError {
    error!(error = %err, "falha na chamada à API");
    err
}

/// Extract the `detail` message from an error body, if it is JSON with one.
fn extract_detail(body: &str) -> Option<String> {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()?
        .get("detail")?
        .as_str()
        .map(|s| s.to_string())
}

/// Pull the suggested filename out of a `Content-Disposition` header.
/// Accepts `filename="x.pdf"` and `filename=x.pdf`, case-insensitive.
fn parse_filename(header: &str) -> Option<String> {
    let lower = header.to_ascii_lowercase();
    let start = lower.rfind("filename=")? + "filename=".len();
    let name = header[start..].trim().trim_matches('"').trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}
