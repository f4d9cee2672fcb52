//! 30-day KPIs over the analysis history

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::models::{AnalysisHistoryItem, WorkoutSummary};
use crate::scoring::{score_color_class, ExecutionLabel};

const KPI_WINDOW_DAYS: i64 = 30;
const OVERREACHED_WARNING_COUNT: usize = 3;
const GOOD_RATE_TARGET_PCT: i64 = 70;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisKpis {
  /// Analyses inside the window
  pub window_count: usize,
  pub avg_execution: Option<i64>,
  pub avg_execution_class: &'static str,
  pub avg_compliance: Option<i64>,
  pub avg_compliance_class: &'static str,
  /// Overreached label or high fatigue risk
  pub overreached_count: usize,
  pub overreached_class: &'static str,
  /// Share of good/excellent executions
  pub good_rate_pct: Option<i64>,
  pub good_rate_class: &'static str,
}

impl AnalysisKpis {
  /// Items without a date are outside every window
  pub fn compute(history: &[AnalysisHistoryItem], today: NaiveDate) -> Self {
    let cutoff = today - Duration::days(KPI_WINDOW_DAYS);
    let recent: Vec<&AnalysisHistoryItem> = history
      .iter()
      .filter(|a| a.date.map_or(false, |d| d >= cutoff))
      .collect();

    let avg_execution = rounded_mean(recent.iter().filter_map(|a| a.overall_score));

    // zero compliance means "no plan", not a failed plan
    let avg_compliance = rounded_mean(
      recent
        .iter()
        .filter_map(|a| a.compliance_score)
        .filter(|s| *s > 0.0),
    );

    let overreached_count = recent
      .iter()
      .filter(|a| {
        a.execution_label.as_deref() == Some("overreached") || a.fatigue_risk.as_deref() == Some("high")
      })
      .count();

    let good_count = recent
      .iter()
      .filter_map(|a| a.execution_label.as_deref())
      .filter_map(|l| l.parse::<ExecutionLabel>().ok())
      .filter(ExecutionLabel::is_good_or_better)
      .count();

    let good_rate_pct = if recent.is_empty() {
      None
    } else {
      Some((good_count as f64 / recent.len() as f64 * 100.0).round() as i64)
    };

    Self {
      window_count: recent.len(),
      avg_execution,
      avg_execution_class: score_color_class(avg_execution.map(|v| v as f64)),
      avg_compliance,
      avg_compliance_class: score_color_class(avg_compliance.map(|v| v as f64)),
      overreached_count,
      overreached_class: if overreached_count > OVERREACHED_WARNING_COUNT {
        "kpi-warning"
      } else {
        ""
      },
      good_rate_pct,
      good_rate_class: match good_rate_pct {
        Some(rate) if rate >= GOOD_RATE_TARGET_PCT => "kpi-good",
        _ => "",
      },
    }
  }
}

fn rounded_mean(values: impl Iterator<Item = f64>) -> Option<i64> {
  let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
  if count == 0 {
    None
  } else {
    Some((sum / count as f64).round() as i64)
  }
}

/// Workout summary recorded alongside a history row
pub fn workout_summary_for(history: &[AnalysisHistoryItem], workout_id: i64) -> Option<&WorkoutSummary> {
  history
    .iter()
    .find(|a| a.workout_id == workout_id)
    .map(|a| &a.workout_summary)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_utils::history_item;

  fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 31).unwrap()
  }

  #[test]
  fn test_kpis_over_window() {
    let history = vec![
      history_item(1, today(), Some(90.0), Some(80.0), "excellent", "low"),
      history_item(2, today() - Duration::days(3), Some(70.0), Some(0.0), "good", "medium"),
      history_item(3, today() - Duration::days(10), Some(55.0), Some(61.0), "overreached", "high"),
      history_item(4, today() - Duration::days(30), None, None, "ok", "high"),
      // outside window
      history_item(5, today() - Duration::days(31), Some(10.0), Some(10.0), "overreached", "high"),
    ];

    let kpis = AnalysisKpis::compute(&history, today());
    assert_eq!(kpis.window_count, 4);
    // (90 + 70 + 55) / 3 = 71.67
    assert_eq!(kpis.avg_execution, Some(72));
    assert_eq!(kpis.avg_execution_class, "score-good");
    // zero compliance excluded: (80 + 61) / 2 = 70.5
    assert_eq!(kpis.avg_compliance, Some(71));
    assert_eq!(kpis.overreached_count, 2);
    assert_eq!(kpis.overreached_class, "");
    // 2 of 4
    assert_eq!(kpis.good_rate_pct, Some(50));
    assert_eq!(kpis.good_rate_class, "");
  }

  #[test]
  fn test_kpis_empty_history() {
    let kpis = AnalysisKpis::compute(&[], today());
    assert_eq!(kpis.window_count, 0);
    assert_eq!(kpis.avg_execution, None);
    assert_eq!(kpis.avg_execution_class, "");
    assert_eq!(kpis.good_rate_pct, None);
    assert_eq!(kpis.overreached_count, 0);
  }

  #[test]
  fn test_kpi_warning_and_good_classes() {
    let mut history: Vec<_> = (0..4)
      .map(|i| history_item(i, today(), Some(60.0), None, "good", "high"))
      .collect();
    history.push(history_item(9, today(), Some(85.0), None, "excellent", "low"));

    let kpis = AnalysisKpis::compute(&history, today());
    assert_eq!(kpis.overreached_count, 4);
    assert_eq!(kpis.overreached_class, "kpi-warning");
    assert_eq!(kpis.good_rate_pct, Some(100));
    assert_eq!(kpis.good_rate_class, "kpi-good");
    assert_eq!(kpis.avg_compliance, None);
  }

  #[test]
  fn test_workout_summary_lookup() {
    let history = vec![history_item(7, today(), None, None, "ok", "low")];
    assert!(workout_summary_for(&history, 7).is_some());
    assert!(workout_summary_for(&history, 8).is_none());
  }
}
