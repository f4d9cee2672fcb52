use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::WorkoutSummary;

/// Coach side of a comparison, taken from an analysis' `coach_comparison`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoachPlan {
  #[serde(default)]
  pub has_coach_plan: bool,
  #[serde(default)]
  pub plan_type: Option<String>,
  /// 0-100, computed by the backend
  #[serde(default)]
  pub compliance_score: Option<f64>,
  #[serde(default)]
  pub notes: Option<String>,
}

/// One row of `/analysis/history`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisHistoryItem {
  pub workout_id: i64,
  #[serde(default)]
  pub date: Option<NaiveDate>,
  #[serde(default)]
  pub overall_score: Option<f64>,
  #[serde(default)]
  pub compliance_score: Option<f64>,
  #[serde(default)]
  pub execution_label: Option<String>,
  #[serde(default)]
  pub fatigue_risk: Option<String>,
  #[serde(default)]
  pub notes_short: Option<String>,
  #[serde(default)]
  pub workout_summary: WorkoutSummary,
  #[serde(default)]
  pub created_at: Option<String>,
  #[serde(default)]
  pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Pagination {
  pub limit: u32,
  pub offset: u32,
  pub total: u64,
  pub has_more: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryPage {
  #[serde(default)]
  pub analyses: Vec<AnalysisHistoryItem>,
  #[serde(default)]
  pub pagination: Pagination,
}

/// ---------------------------------------------------------------------------
/// Analysis Detail
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DimensionScores {
  pub intensity: Option<f64>,
  pub duration: Option<f64>,
  pub hr_response: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisScores {
  pub overall_score: Option<f64>,
  /// "excellent" | "good" | "ok" | "too_easy" | "overreached"
  pub label: Option<String>,
  /// "low" | "medium" | "high"
  pub fatigue_risk: Option<String>,
  #[serde(default)]
  pub dimension_scores: DimensionScores,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisSummary {
  pub short_text: Option<String>,
  pub detailed_text: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Physiology {
  pub hrv_state: Option<String>,
  pub rhr_state: Option<String>,
  pub recovery_status: Option<String>,
  pub cardiac_efficiency: Option<String>,
}

impl Physiology {
  /// (label, value) rows in display order, skipping empty fields
  pub fn rows(&self) -> Vec<(&'static str, String)> {
    [
      ("HRV State", &self.hrv_state),
      ("RHR State", &self.rhr_state),
      ("Recovery", &self.recovery_status),
      ("Efficiency", &self.cardiac_efficiency),
    ]
    .into_iter()
    .filter_map(|(label, value)| match value {
      Some(v) if !v.is_empty() => Some((label, v.clone())),
      _ => None,
    })
    .collect()
  }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawMeta {
  pub prompt_version: Option<String>,
}

/// Full AI analysis for one workout
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisDetail {
  #[serde(default)]
  pub analysis_date: Option<String>,
  #[serde(default)]
  pub scores: AnalysisScores,
  #[serde(default)]
  pub coach_comparison: CoachPlan,
  #[serde(default)]
  pub summary: AnalysisSummary,
  #[serde(default)]
  pub physiology: Option<Physiology>,
  #[serde(default)]
  pub action_items: Vec<String>,
  #[serde(default)]
  pub raw: RawMeta,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_history_item_from_backend_json() {
    let json = r#"{
      "workout_id": 42,
      "date": "2025-01-15",
      "overall_score": 78,
      "compliance_score": 65,
      "execution_label": "good",
      "fatigue_risk": "medium",
      "notes_short": null,
      "workout_summary": {"duration_min": 75, "avg_power_w": 180.4, "avg_hr_bpm": 172},
      "created_at": "2025-01-15T18:02:11",
      "updated_at": null
    }"#;
    let item: AnalysisHistoryItem = serde_json::from_str(json).unwrap();
    assert_eq!(item.workout_id, 42);
    assert_eq!(item.date, NaiveDate::from_ymd_opt(2025, 1, 15));
    assert_eq!(item.workout_summary.avg_hr_bpm, Some(172.0));
  }

  #[test]
  fn test_coach_plan_defaults() {
    let plan: CoachPlan = serde_json::from_str("{}").unwrap();
    assert!(!plan.has_coach_plan);
    assert!(plan.plan_type.is_none());
  }

  #[test]
  fn test_detail_tolerates_sparse_payload() {
    let json = r#"{
      "scores": {"overall_score": 81, "label": "excellent", "fatigue_risk": "low"},
      "coach_comparison": {"has_coach_plan": true, "plan_type": "norwegian_4x4", "compliance_score": 90, "notes": ""}
    }"#;
    let detail: AnalysisDetail = serde_json::from_str(json).unwrap();
    assert_eq!(detail.scores.overall_score, Some(81.0));
    assert!(detail.scores.dimension_scores.intensity.is_none());
    assert!(detail.coach_comparison.has_coach_plan);
    assert!(detail.action_items.is_empty());
  }

  #[test]
  fn test_physiology_rows_skip_empty() {
    let physiology = Physiology {
      hrv_state: Some("Stable".into()),
      rhr_state: Some(String::new()),
      recovery_status: None,
      cardiac_efficiency: Some("Improving".into()),
    };
    let rows = physiology.rows();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].0, "HRV State");
    assert_eq!(rows[1].1, "Improving");
  }
}
