use std::env;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

/// ---------------------------------------------------------------------------
/// Configuration Constants
/// ---------------------------------------------------------------------------

const DEFAULT_BASE_URL: &str = "http://localhost:5000";
const DEFAULT_HISTORY_LIMIT: u32 = 50;
const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const MAX_HISTORY_LIMIT: u32 = 100;

const ENV_BASE_URL: &str = "RIDE_ANALYZER_BASE_URL";
const ENV_SESSION_COOKIE: &str = "RIDE_ANALYZER_SESSION_COOKIE";
const ENV_HISTORY_LIMIT: &str = "RIDE_ANALYZER_HISTORY_LIMIT";
const ENV_TIMEOUT_SECS: &str = "RIDE_ANALYZER_TIMEOUT_SECS";

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  #[error("Invalid value for {name}: {reason}")]
  Invalid { name: String, reason: String },

  #[error("Invalid backend URL: {0}")]
  InvalidUrl(String),
}

impl serde::Serialize for ConfigError {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: serde::Serializer,
  {
    serializer.serialize_str(&self.to_string())
  }
}

/// ---------------------------------------------------------------------------
/// App Config
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct AppConfig {
  /// Always ends with '/', so relative joins keep any path prefix
  pub base_url: Url,
  /// Sent verbatim as the `Cookie` header (backend uses session login)
  pub session_cookie: Option<String>,
  pub history_limit: u32,
  pub timeout: Duration,
}

impl AppConfig {
  /// Defaults for everything except the backend location
  pub fn new(base_url: &str) -> Result<Self, ConfigError> {
    Ok(Self {
      base_url: parse_base_url(base_url)?,
      session_cookie: None,
      history_limit: DEFAULT_HISTORY_LIMIT,
      timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
    })
  }

  /// Read from the process environment (call `dotenvy::dotenv()` first to pick up `.env`)
  pub fn from_env() -> Result<Self, ConfigError> {
    let base_url = env::var(ENV_BASE_URL).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
    let mut config = Self::new(&base_url)?;

    config.session_cookie = env::var(ENV_SESSION_COOKIE).ok().filter(|c| !c.trim().is_empty());

    if let Some(limit) = parse_var::<u32>(ENV_HISTORY_LIMIT)? {
      config.history_limit = limit.clamp(1, MAX_HISTORY_LIMIT);
    }

    if let Some(secs) = parse_var::<u64>(ENV_TIMEOUT_SECS)? {
      if secs == 0 {
        return Err(ConfigError::Invalid {
          name: ENV_TIMEOUT_SECS.into(),
          reason: "must be greater than zero".into(),
        });
      }
      config.timeout = Duration::from_secs(secs);
    }

    Ok(config)
  }
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
  let mut url = Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", raw, e)))?;

  if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
    return Err(ConfigError::InvalidUrl(format!("{}: expected an http(s) base URL", raw)));
  }

  if !url.path().ends_with('/') {
    let path = format!("{}/", url.path());
    url.set_path(&path);
  }

  Ok(url)
}

fn parse_var<T>(name: &str) -> Result<Option<T>, ConfigError>
where
  T: FromStr,
  T::Err: std::fmt::Display,
{
  match env::var(name) {
    Ok(raw) if !raw.trim().is_empty() => raw
      .trim()
      .parse::<T>()
      .map(Some)
      .map_err(|e| ConfigError::Invalid {
        name: name.to_string(),
        reason: e.to_string(),
      }),
    _ => Ok(None),
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
