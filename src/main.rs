use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ride_analyzer::{run, RunOptions};

#[derive(Parser)]
#[command(
  name = "ride-analyzer",
  about = "AI ride analysis with plan vs reality comparison",
  long_about = "Fetches analysis history from the training backend, analyzes one workout and prints the dashboard report as JSON."
)]
struct Cli {
  /// Workout to analyze (defaults to the most recent analysis)
  #[arg(long)]
  workout_id: Option<i64>,

  /// Ignore any stored analysis and generate a new one
  #[arg(long)]
  regenerate: bool,

  /// History page size (1-100)
  #[arg(long)]
  limit: Option<u32>,

  /// History page offset
  #[arg(long, default_value_t = 0)]
  offset: u32,
}

#[tokio::main]
async fn main() -> ExitCode {
  // logs go to stderr, stdout carries the report
  tracing_subscriber::registry()
    .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
    .init();

  let cli = Cli::parse();
  let options = RunOptions {
    workout_id: cli.workout_id,
    regenerate: cli.regenerate,
    limit: cli.limit,
    offset: cli.offset,
  };

  match run(options).await {
    Ok(report) => match serde_json::to_string_pretty(&report) {
      Ok(json) => {
        println!("{}", json);
        ExitCode::SUCCESS
      }
      Err(e) => {
        tracing::error!("Failed to serialize report: {}", e);
        ExitCode::FAILURE
      }
    },
    Err(e) => {
      tracing::error!("{}", e);
      ExitCode::FAILURE
    }
  }
}
