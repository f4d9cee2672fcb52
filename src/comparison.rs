//! Plan vs reality comparison
//!
//! Reconciles a coach plan with the recorded workout: resolves the target
//! zone, classifies each measured metric against it, and collects deviation
//! chips from the coach notes. Stateless; the zone catalog is injected.

use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

use crate::delta::{ComparisonStatus, Planned};
use crate::deviation::{extract_deviation_chips, DeviationChip};
use crate::models::{CoachPlan, WorkoutSummary};
use crate::zones::{classify_plan_type, ZoneCatalog, ZoneRange, ZoneResolution};

/// ---------------------------------------------------------------------------
/// Planned Duration From Notes
/// ---------------------------------------------------------------------------

/// (pattern, sign): planned = actual + sign * N. Checked in order, first match wins.
const DURATION_ADJUSTMENTS: [(&str, f64); 4] = [
  (r"(?i)extended\s+by\s+(\d+)\s*min", -1.0),
  (r"(?i)shortened\s+by\s+(\d+)\s*min", 1.0),
  (r"(?i)(\d+)\s*min(?:utes?)?\s+longer", -1.0),
  (r"(?i)(\d+)\s*min(?:utes?)?\s+shorter", 1.0),
];

fn duration_patterns() -> &'static [(Regex, f64)] {
  static PATTERNS: OnceLock<Vec<(Regex, f64)>> = OnceLock::new();
  PATTERNS.get_or_init(|| {
    DURATION_ADJUSTMENTS
      .iter()
      .filter_map(|(pattern, sign)| Regex::new(pattern).ok().map(|re| (re, *sign)))
      .collect()
  })
}

/// Back-calculate the planned duration from adjustment language such as
/// "extended by 15 min" or "10 minutes shorter". Non-positive results are discarded.
pub fn planned_duration_from_notes(notes: Option<&str>, actual_duration: f64) -> Option<f64> {
  let notes = notes.filter(|n| !n.is_empty())?;

  let (minutes, sign) = duration_patterns().iter().find_map(|(re, sign)| {
    re.captures(notes)
      .and_then(|caps| caps[1].parse::<f64>().ok())
      .map(|minutes| (minutes, *sign))
  })?;

  let planned = actual_duration + sign * minutes;
  if planned > 0.0 && planned.is_finite() {
    Some(planned)
  } else {
    None
  }
}

/// ---------------------------------------------------------------------------
/// Comparison Result
/// ---------------------------------------------------------------------------

/// One metric's actual value against its target
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricComparison {
  pub actual: f64,
  pub planned: Option<Planned>,
  pub status: ComparisonStatus,
  pub delta_percent: Option<i64>,
}

impl MetricComparison {
  /// Without a target the actual value is still surfaced, as unknown
  pub fn against(actual: f64, planned: Option<Planned>) -> Self {
    match planned {
      Some(target) => Self {
        actual,
        planned: Some(target),
        status: target.status_of(actual),
        delta_percent: target.delta_of(actual),
      },
      None => Self {
        actual,
        planned: None,
        status: ComparisonStatus::Unknown,
        delta_percent: None,
      },
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonResult {
  pub plan_type: Option<String>,
  pub compliance_score: Option<f64>,
  pub resolution: ZoneResolution,
  pub zone: Option<ZoneRange>,
  /// Absent metrics are omitted, never zero-filled
  #[serde(skip_serializing_if = "Option::is_none")]
  pub duration: Option<MetricComparison>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub power: Option<MetricComparison>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub heart_rate: Option<MetricComparison>,
  /// Planned duration came from the notes rather than the zone
  pub duration_from_notes: bool,
  pub chips: Vec<DeviationChip>,
}

impl ComparisonResult {
  /// Metrics in display order: duration, power, heart rate
  pub fn metrics(&self) -> impl Iterator<Item = (Metric, &MetricComparison)> {
    [
      (Metric::Duration, self.duration.as_ref()),
      (Metric::Power, self.power.as_ref()),
      (Metric::HeartRate, self.heart_rate.as_ref()),
    ]
    .into_iter()
    .filter_map(|(metric, cmp)| cmp.map(|c| (metric, c)))
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
  Duration,
  Power,
  HeartRate,
}

/// ---------------------------------------------------------------------------
/// Comparator
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
pub struct PlanComparator<'a> {
  catalog: &'a ZoneCatalog,
}

impl<'a> PlanComparator<'a> {
  pub fn new(catalog: &'a ZoneCatalog) -> Self {
    Self { catalog }
  }

  /// `None` when there is no coach plan or nothing was measured
  pub fn compare(&self, workout: &WorkoutSummary, plan: &CoachPlan) -> Option<ComparisonResult> {
    if !plan.has_coach_plan || workout.is_empty() {
      return None;
    }

    let resolution = classify_plan_type(plan.plan_type.as_deref());
    let zone = self.catalog.lookup(resolution).copied();
    let notes = plan.notes.as_deref();

    let mut duration_from_notes = false;
    let duration = workout.duration_min.map(|actual| {
      let planned = match planned_duration_from_notes(notes, actual) {
        Some(from_notes) => {
          duration_from_notes = true;
          Some(Planned::Point(from_notes))
        }
        None => zone.map(|z| Planned::Range(z.duration)),
      };
      MetricComparison::against(actual, planned)
    });

    let power = workout
      .avg_power_w
      .map(|actual| MetricComparison::against(actual, zone.map(|z| Planned::Range(z.power))));

    let heart_rate = workout
      .avg_hr_bpm
      .map(|actual| MetricComparison::against(actual, zone.map(|z| Planned::Range(z.hr))));

    let chips = extract_deviation_chips(notes);

    tracing::debug!(
      plan_type = ?plan.plan_type,
      ?resolution,
      chips = chips.len(),
      duration_from_notes,
      "compared workout against coach plan"
    );

    Some(ComparisonResult {
      plan_type: plan.plan_type.clone(),
      compliance_score: plan.compliance_score,
      resolution,
      zone,
      duration,
      power,
      heart_rate,
      duration_from_notes,
      chips,
    })
  }
}

impl Default for PlanComparator<'static> {
  fn default() -> Self {
    Self::new(ZoneCatalog::shared())
  }
}

/// Compare against the shared zone catalog
pub fn compare_plan(workout: &WorkoutSummary, plan: &CoachPlan) -> Option<ComparisonResult> {
  PlanComparator::default().compare(workout, plan)
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
