//! Analyzer dashboard report
//!
//! Assembles KPIs, the history list and the selected analysis (with its
//! plan-vs-reality micro charts) into one serializable view.

use chrono::NaiveDate;
use serde::Serialize;

use crate::comparison::{compare_plan, ComparisonResult, Metric, MetricComparison};
use crate::delta::{ComparisonStatus, Planned};
use crate::kpis::{workout_summary_for, AnalysisKpis};
use crate::models::{AnalysisDetail, AnalysisHistoryItem};
use crate::scoring::{
  bar_width, compliance_class, delta_badge_class, execution_badge, fatigue_badge, format_plan_type,
  format_signed_delta, score_color_class, Badge,
};

const NO_SUMMARY_TEXT: &str = "No summary available.";
const UNKNOWN_PLAN_TYPE: &str = "Unknown";

/// ---------------------------------------------------------------------------
/// Report Types
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct AnalyzerReport {
  pub kpis: AnalysisKpis,
  pub history: Vec<HistoryRow>,
  pub selected: Option<AnalysisView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HistoryRow {
  pub workout_id: i64,
  pub date: Option<NaiveDate>,
  pub execution: Badge,
  /// Extra badge only when fatigue risk is high
  pub high_fatigue: bool,
  pub overall_score: Option<i64>,
  pub score_class: &'static str,
  pub duration_text: String,
  pub power_text: String,
  pub selected: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct DimensionBar {
  pub name: &'static str,
  pub score: Option<i64>,
  pub width: f64,
  pub class: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct CoachPanel {
  pub has_coach_plan: bool,
  pub plan_type_display: String,
  pub compliance_score: Option<i64>,
  pub compliance_class: &'static str,
  pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChipView {
  pub text: String,
  pub class: &'static str,
}

/// Where the planned target sits on a micro chart (percent of scale)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlannedMarker {
  None,
  Bar { width: f64 },
  Range { start: f64, width: f64 },
}

#[derive(Debug, Clone, Serialize)]
pub struct MicroChart {
  pub metric: Metric,
  pub title: &'static str,
  pub actual_text: String,
  pub actual_width: f64,
  pub planned_text: String,
  pub planned: PlannedMarker,
  pub status: ComparisonStatus,
  pub status_class: &'static str,
  pub delta: Option<Badge>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanVsReality {
  pub charts: Vec<MicroChart>,
  pub comparison: ComparisonResult,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisView {
  pub workout_id: i64,
  pub analysis_date: Option<String>,
  pub overall_score: Option<i64>,
  pub overall_class: &'static str,
  pub execution: Badge,
  pub fatigue: Badge,
  pub dimensions: Vec<DimensionBar>,
  pub coach: CoachPanel,
  pub chips: Vec<ChipView>,
  pub plan_vs_reality: Option<PlanVsReality>,
  pub physiology: Vec<(&'static str, String)>,
  pub summary_short: String,
  pub summary_detailed: Option<String>,
  pub action_items: Vec<String>,
  pub prompt_version: String,
}

/// ---------------------------------------------------------------------------
/// Report Assembly
/// ---------------------------------------------------------------------------

impl AnalyzerReport {
  /// `selected` is the workout id with its analysis; the plan-vs-reality
  /// panel needs that workout to be present in `history`
  pub fn build(
    history: &[AnalysisHistoryItem],
    selected: Option<(i64, &AnalysisDetail)>,
    today: NaiveDate,
  ) -> Self {
    let selected_id = selected.map(|(id, _)| id);

    Self {
      kpis: AnalysisKpis::compute(history, today),
      history: history
        .iter()
        .map(|item| history_row(item, selected_id == Some(item.workout_id)))
        .collect(),
      selected: selected.map(|(id, detail)| AnalysisView::build(id, detail, history)),
    }
  }
}

/// Requested workout, otherwise the most recent analysis
pub fn select_workout_id(history: &[AnalysisHistoryItem], requested: Option<i64>) -> Option<i64> {
  requested.or_else(|| history.first().map(|item| item.workout_id))
}

fn history_row(item: &AnalysisHistoryItem, selected: bool) -> HistoryRow {
  HistoryRow {
    workout_id: item.workout_id,
    date: item.date,
    execution: execution_badge(item.execution_label.as_deref()),
    high_fatigue: item.fatigue_risk.as_deref() == Some("high"),
    overall_score: rounded(item.overall_score),
    score_class: score_color_class(item.overall_score),
    duration_text: item.workout_summary.duration_text(),
    power_text: item.workout_summary.power_text(),
    selected,
  }
}

impl AnalysisView {
  fn build(workout_id: i64, detail: &AnalysisDetail, history: &[AnalysisHistoryItem]) -> Self {
    let scores = &detail.scores;
    let dims = &scores.dimension_scores;
    let coach = &detail.coach_comparison;

    let chips = crate::deviation::extract_deviation_chips(coach.notes.as_deref())
      .into_iter()
      .map(|chip| ChipView {
        class: chip.category.css_class(),
        text: chip.text,
      })
      .collect();

    let plan_vs_reality = workout_summary_for(history, workout_id)
      .and_then(|summary| compare_plan(summary, coach))
      .map(|comparison| PlanVsReality {
        charts: comparison
          .metrics()
          .map(|(metric, cmp)| micro_chart(metric, cmp, &comparison))
          .collect(),
        comparison,
      });

    Self {
      workout_id,
      analysis_date: detail.analysis_date.clone(),
      overall_score: rounded(scores.overall_score),
      overall_class: score_color_class(scores.overall_score),
      execution: execution_badge(scores.label.as_deref()),
      fatigue: fatigue_badge(scores.fatigue_risk.as_deref()),
      dimensions: vec![
        dimension_bar("Intensity", dims.intensity),
        dimension_bar("Duration", dims.duration),
        dimension_bar("HR Response", dims.hr_response),
      ],
      coach: CoachPanel {
        has_coach_plan: coach.has_coach_plan,
        plan_type_display: coach
          .plan_type
          .as_deref()
          .filter(|p| !p.is_empty())
          .map(format_plan_type)
          .unwrap_or_else(|| UNKNOWN_PLAN_TYPE.to_string()),
        compliance_score: rounded(coach.compliance_score),
        compliance_class: compliance_class(coach.compliance_score),
        notes: coach.notes.clone(),
      },
      chips,
      plan_vs_reality,
      physiology: detail.physiology.as_ref().map(|p| p.rows()).unwrap_or_default(),
      summary_short: detail
        .summary
        .short_text
        .clone()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| NO_SUMMARY_TEXT.to_string()),
      summary_detailed: detail.summary.detailed_text.clone(),
      action_items: detail.action_items.clone(),
      prompt_version: detail
        .raw
        .prompt_version
        .clone()
        .unwrap_or_else(|| "unknown".to_string()),
    }
  }
}

fn dimension_bar(name: &'static str, score: Option<f64>) -> DimensionBar {
  DimensionBar {
    name,
    score: rounded(score),
    width: bar_width(score),
    class: score_color_class(score),
  }
}

fn rounded(value: Option<f64>) -> Option<i64> {
  value.map(|v| v.round() as i64)
}

/// ---------------------------------------------------------------------------
/// Micro Charts
/// ---------------------------------------------------------------------------

fn micro_chart(metric: Metric, cmp: &MetricComparison, comparison: &ComparisonResult) -> MicroChart {
  let scale = chart_scale(metric, cmp);
  let percent = |value: f64| (value / scale * 100.0).min(100.0);
  let zone_label = comparison.zone.map(|z| z.label);

  let (planned_text, planned) = match (metric, cmp.planned) {
    (_, None) => ("n/a".to_string(), PlannedMarker::None),
    (Metric::Duration, Some(target)) => {
      let minutes = target.reference();
      (
        format!("{} min", minutes.round() as i64),
        PlannedMarker::Bar { width: percent(minutes) },
      )
    }
    (_, Some(target)) => {
      let bounds = target.bounds();
      let unit = unit(metric);
      let text = match zone_label {
        Some(label) => format!("{}–{}{} ({})", bounds.min, bounds.max, unit, label),
        None => format!("{}–{}{}", bounds.min, bounds.max, unit),
      };
      (
        text,
        PlannedMarker::Range {
          start: bounds.min / scale * 100.0,
          width: (bounds.max - bounds.min) / scale * 100.0,
        },
      )
    }
  };

  let status_class = match metric {
    Metric::Duration => "",
    Metric::Power | Metric::HeartRate => cmp.status.color_class(),
  };

  MicroChart {
    metric,
    title: match metric {
      Metric::Duration => "Duration",
      Metric::Power => "Power (W)",
      Metric::HeartRate => "Heart Rate (bpm)",
    },
    actual_text: format!("{}{}", cmp.actual, unit(metric)),
    actual_width: percent(cmp.actual),
    planned_text,
    planned,
    status: cmp.status,
    status_class,
    delta: cmp.delta_percent.map(|delta| Badge {
      text: format_signed_delta(delta),
      class: delta_badge_class(metric, cmp.status, delta),
    }),
  }
}

/// Chart scale keeps small values readable and leaves headroom above the range
fn chart_scale(metric: Metric, cmp: &MetricComparison) -> f64 {
  let planned_top = match cmp.planned {
    Some(Planned::Point(value)) => value,
    Some(Planned::Range(bounds)) if metric == Metric::Duration => bounds.midpoint(),
    Some(Planned::Range(bounds)) => bounds.max,
    None => 0.0,
  };

  match metric {
    Metric::Duration => cmp.actual.max(planned_top).max(60.0),
    Metric::Power => cmp.actual.max(planned_top).max(100.0) * 1.2,
    Metric::HeartRate => cmp.actual.max(planned_top).max(180.0) * 1.1,
  }
}

fn unit(metric: Metric) -> &'static str {
  match metric {
    Metric::Duration => " min",
    Metric::Power => "W",
    Metric::HeartRate => " bpm",
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
