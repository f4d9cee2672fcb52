pub mod api;
pub mod comparison;
pub mod config;
pub mod delta;
pub mod deviation;
pub mod kpis;
pub mod models;
pub mod report;
pub mod scoring;
pub mod zones;

#[cfg(test)]
mod test_utils;

use chrono::Utc;

use api::{ApiError, BackendClient};
use config::{AppConfig, ConfigError};
use report::{select_workout_id, AnalyzerReport};

pub use comparison::{compare_plan, ComparisonResult, PlanComparator};
pub use delta::{classify_status, compute_delta_percent, ComparisonStatus};
pub use deviation::{extract_deviation_chips, DeviationChip};
pub use zones::{resolve_zone, ZoneCatalog, ZoneRange};

/// ---------------------------------------------------------------------------
/// Run Options
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
  /// Defaults to the most recent analysis in the history page
  pub workout_id: Option<i64>,
  pub regenerate: bool,
  /// Defaults to the configured history limit
  pub limit: Option<u32>,
  pub offset: u32,
}

#[derive(Debug, thiserror::Error)]
pub enum RunError {
  #[error(transparent)]
  Config(#[from] ConfigError),

  #[error(transparent)]
  Api(#[from] ApiError),
}

/// ---------------------------------------------------------------------------
/// Entry Point
/// ---------------------------------------------------------------------------

/// Load history, analyze the selected workout and assemble the report
pub async fn run(options: RunOptions) -> Result<AnalyzerReport, RunError> {
  // Load environment variables from .env file
  dotenvy::dotenv().ok();

  let config = AppConfig::from_env()?;
  let client = BackendClient::new(&config)?;
  let limit = options.limit.unwrap_or(config.history_limit);

  tracing::info!(base_url = %config.base_url, limit, offset = options.offset, "loading analyzer");

  let mut page = client.fetch_history(limit, options.offset).await?;

  let selected_id = select_workout_id(&page.analyses, options.workout_id);
  let detail = match selected_id {
    Some(workout_id) => {
      let outcome = client.analyze_workout(workout_id, options.regenerate).await?;

      // fresh analyses are not in the page yet
      if !outcome.cached {
        page = client.fetch_history(limit, options.offset).await?;
      }
      Some((workout_id, outcome.analysis))
    }
    None => {
      tracing::info!("no analyses yet, nothing selected");
      None
    }
  };

  let today = Utc::now().date_naive();
  Ok(AnalyzerReport::build(
    &page.analyses,
    detail.as_ref().map(|(id, analysis)| (*id, analysis)),
    today,
  ))
}
