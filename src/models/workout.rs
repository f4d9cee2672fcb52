use serde::{Deserialize, Serialize};

/// Measured side of a comparison, as the backend summarises a recorded ride
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSummary {
  pub duration_min: Option<f64>,
  pub avg_power_w: Option<f64>,
  pub avg_hr_bpm: Option<f64>,
}

impl WorkoutSummary {
  /// No measurement at all
  pub fn is_empty(&self) -> bool {
    self.duration_min.is_none() && self.avg_power_w.is_none() && self.avg_hr_bpm.is_none()
  }

  /// History list text, e.g. "62m"
  pub fn duration_text(&self) -> String {
    self
      .duration_min
      .map(|d| format!("{}m", d.round() as i64))
      .unwrap_or_else(|| "--".to_string())
  }

  /// History list text, e.g. "181W"
  pub fn power_text(&self) -> String {
    self
      .avg_power_w
      .map(|w| format!("{}W", w.round() as i64))
      .unwrap_or_else(|| "--".to_string())
  }
}
