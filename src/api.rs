use reqwest::header::{HeaderMap, HeaderValue, COOKIE};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use url::Url;

use crate::config::{AppConfig, MAX_HISTORY_LIMIT};
use crate::models::{AnalysisDetail, HistoryPage};

/// ---------------------------------------------------------------------------
/// Configuration Constants
/// ---------------------------------------------------------------------------

const ANALYSIS_API_PATH: &str = "cycling-readiness/api/ai/analysis";
const ERROR_BODY_PREVIEW_CHARS: usize = 200;

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
  #[error("HTTP request failed: {0}")]
  Request(#[from] reqwest::Error),

  #[error("Invalid request URL: {0}")]
  InvalidUrl(#[from] url::ParseError),

  #[error("Invalid session cookie: {0}")]
  InvalidHeader(String),

  #[error("Backend error ({status}): {message}")]
  Api { status: u16, message: String },

  #[error("Failed to parse backend response: {0}")]
  Parse(String),

  #[error("An analysis request is already in flight")]
  RequestInFlight,
}

impl ApiError {
  pub fn is_not_found(&self) -> bool {
    matches!(self, ApiError::Api { status: 404, .. })
  }
}

impl Serialize for ApiError {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: serde::Serializer,
  {
    serializer.serialize_str(&self.to_string())
  }
}

/// ---------------------------------------------------------------------------
/// Response Types
/// ---------------------------------------------------------------------------

/// Result of asking the backend to analyze a workout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeOutcome {
  /// A stored analysis was returned instead of a fresh one
  #[serde(default)]
  pub cached: bool,
  pub analysis: AnalysisDetail,
}

#[derive(Debug, Deserialize)]
struct AnalysisEnvelope {
  analysis: AnalysisDetail,
}

/// ---------------------------------------------------------------------------
/// Backend Client
/// ---------------------------------------------------------------------------

/// Clones share one in-flight flag, so only one analyze call runs at a time
#[derive(Debug, Clone)]
pub struct BackendClient {
  client: Client,
  base_url: Url,
  analyze_in_flight: Arc<AtomicBool>,
}

impl BackendClient {
  pub fn new(config: &AppConfig) -> Result<Self, ApiError> {
    let mut headers = HeaderMap::new();
    if let Some(cookie) = &config.session_cookie {
      let value = HeaderValue::from_str(cookie).map_err(|e| ApiError::InvalidHeader(e.to_string()))?;
      headers.insert(COOKIE, value);
    }

    let client = Client::builder()
      .timeout(config.timeout)
      .default_headers(headers)
      .build()?;

    Ok(Self {
      client,
      base_url: config.base_url.clone(),
      analyze_in_flight: Arc::new(AtomicBool::new(false)),
    })
  }

  fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
    Ok(self.base_url.join(&format!("{}/{}", ANALYSIS_API_PATH, path))?)
  }

  /// Page of past analyses, newest first. `limit` is clamped to 1..=100
  pub async fn fetch_history(&self, limit: u32, offset: u32) -> Result<HistoryPage, ApiError> {
    let limit = limit.clamp(1, MAX_HISTORY_LIMIT);
    let url = self.endpoint("history")?;

    tracing::debug!(limit, offset, "fetching analysis history");

    let response = self
      .client
      .get(url)
      .query(&[("limit", limit), ("offset", offset)])
      .send()
      .await?;

    let body = read_envelope(response).await?;
    let page: HistoryPage = serde_json::from_value(body).map_err(|e| ApiError::Parse(e.to_string()))?;

    tracing::info!(
      count = page.analyses.len(),
      total = page.pagination.total,
      "loaded analysis history"
    );
    Ok(page)
  }

  /// Stored analysis for one workout; 404 when the workout was never analyzed
  pub async fn fetch_analysis(&self, workout_id: i64) -> Result<AnalysisDetail, ApiError> {
    let url = self.endpoint(&format!("workout/{}", workout_id))?;
    let response = self.client.get(url).send().await?;

    let body = read_envelope(response).await?;
    let envelope: AnalysisEnvelope =
      serde_json::from_value(body).map_err(|e| ApiError::Parse(e.to_string()))?;
    Ok(envelope.analysis)
  }

  /// Run (or re-run with `force_regenerate`) the analysis for a workout
  pub async fn analyze_workout(
    &self,
    workout_id: i64,
    force_regenerate: bool,
  ) -> Result<AnalyzeOutcome, ApiError> {
    let _guard = self.try_begin_analysis()?;

    tracing::info!(workout_id, force_regenerate, "requesting workout analysis");

    let url = self.endpoint("analyze")?;
    let response = self
      .client
      .post(url)
      .json(&json!({
        "workout_id": workout_id,
        "force_regenerate": force_regenerate,
      }))
      .send()
      .await?;

    let body = read_envelope(response).await?;
    let outcome: AnalyzeOutcome =
      serde_json::from_value(body).map_err(|e| ApiError::Parse(e.to_string()))?;

    tracing::info!(workout_id, cached = outcome.cached, "analysis ready");
    Ok(outcome)
  }

  fn try_begin_analysis(&self) -> Result<InFlightGuard<'_>, ApiError> {
    self
      .analyze_in_flight
      .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
      .map_err(|_| ApiError::RequestInFlight)?;
    Ok(InFlightGuard(&self.analyze_in_flight))
  }
}

/// Clears the in-flight flag on every exit path, including cancellation
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
  fn drop(&mut self) {
    self.0.store(false, Ordering::Release);
  }
}

/// ---------------------------------------------------------------------------
/// Envelope Handling
/// ---------------------------------------------------------------------------

/// Backend answers `{"success": bool, "error"?: string, ...}`
async fn read_envelope(response: Response) -> Result<Value, ApiError> {
  let status = response.status();
  let text = response.text().await?;
  let parsed: Option<Value> = serde_json::from_str(&text).ok();

  let success = parsed
    .as_ref()
    .and_then(|v| v.get("success"))
    .and_then(Value::as_bool)
    .unwrap_or(false);

  if status.is_success() && success {
    return parsed.ok_or_else(|| ApiError::Parse("empty response body".into()));
  }

  let message = parsed
    .as_ref()
    .and_then(|v| v.get("error"))
    .and_then(Value::as_str)
    .map(String::from)
    .unwrap_or_else(|| {
      if status.is_success() {
        "request was not successful".to_string()
      } else {
        format!("HTTP {}: {}", status, preview(&text))
      }
    });

  tracing::warn!(status = status.as_u16(), %message, "backend request failed");

  Err(ApiError::Api {
    status: status.as_u16(),
    message,
  })
}

fn preview(text: &str) -> String {
  text.chars().take(ERROR_BODY_PREVIEW_CHARS).collect()
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
