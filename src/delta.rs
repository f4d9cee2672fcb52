//! Actual-vs-target status and percentage deltas
//!
//! Both operations are total: missing data, zero targets and non-finite input
//! map to `Unknown` / `None` instead of failing.

use serde::Serialize;

use crate::zones::Bounds;

/// ---------------------------------------------------------------------------
/// Status Classification
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonStatus {
  Below,
  Within,
  Above,
  Unknown,
}

impl ComparisonStatus {
  pub fn as_str(&self) -> &'static str {
    match self {
      ComparisonStatus::Below => "below",
      ComparisonStatus::Within => "within",
      ComparisonStatus::Above => "above",
      ComparisonStatus::Unknown => "unknown",
    }
  }

  /// Chart coloring: in range is good, over is a warning, under is low
  pub fn color_class(&self) -> &'static str {
    match self {
      ComparisonStatus::Within => "comparison-good",
      ComparisonStatus::Above => "comparison-warn",
      ComparisonStatus::Below => "comparison-low",
      ComparisonStatus::Unknown => "",
    }
  }
}

impl std::fmt::Display for ComparisonStatus {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// Bounds are inclusive on both ends
pub fn classify_status(actual: Option<f64>, min: Option<f64>, max: Option<f64>) -> ComparisonStatus {
  match (actual, min, max) {
    (Some(actual), Some(min), Some(max)) if actual.is_finite() => {
      if actual < min {
        ComparisonStatus::Below
      } else if actual > max {
        ComparisonStatus::Above
      } else {
        ComparisonStatus::Within
      }
    }
    _ => ComparisonStatus::Unknown,
  }
}

/// ---------------------------------------------------------------------------
/// Delta Percent
/// ---------------------------------------------------------------------------

/// Signed percentage difference, rounded half away from zero
pub fn compute_delta_percent(actual: Option<f64>, planned: Option<f64>) -> Option<i64> {
  let (actual, planned) = (actual?, planned?);
  if planned == 0.0 {
    return None;
  }

  let pct = ((actual - planned) / planned * 100.0).round();
  if pct.is_finite() {
    Some(pct as i64)
  } else {
    None
  }
}

/// ---------------------------------------------------------------------------
/// Planned Targets
/// ---------------------------------------------------------------------------

/// A target expressed as a single value or as a band
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Planned {
  Point(f64),
  Range(Bounds),
}

impl Planned {
  /// Value deltas are measured against: the point, or the band midpoint
  pub fn reference(&self) -> f64 {
    match self {
      Planned::Point(value) => *value,
      Planned::Range(bounds) => bounds.midpoint(),
    }
  }

  pub fn bounds(&self) -> Bounds {
    match self {
      Planned::Point(value) => Bounds::new(*value, *value),
      Planned::Range(bounds) => *bounds,
    }
  }

  pub fn status_of(&self, actual: f64) -> ComparisonStatus {
    let bounds = self.bounds();
    classify_status(Some(actual), Some(bounds.min), Some(bounds.max))
  }

  pub fn delta_of(&self, actual: f64) -> Option<i64> {
    compute_delta_percent(Some(actual), Some(self.reference()))
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
