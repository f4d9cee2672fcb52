//! Test utilities and fixture factories
//!
//! Builders for workouts, coach plans and backend payloads shared by the
//! unit tests of every module.

use chrono::NaiveDate;
use serde_json::json;

use crate::models::{AnalysisHistoryItem, CoachPlan, WorkoutSummary};

/// ---------------------------------------------------------------------------
/// Domain Fixtures
/// ---------------------------------------------------------------------------

pub fn workout(duration_min: Option<f64>, avg_power_w: Option<f64>, avg_hr_bpm: Option<f64>) -> WorkoutSummary {
  WorkoutSummary {
    duration_min,
    avg_power_w,
    avg_hr_bpm,
  }
}

/// A coach plan that exists; empty notes become `None`
pub fn coach_plan(plan_type: &str, notes: &str, compliance_score: Option<f64>) -> CoachPlan {
  CoachPlan {
    has_coach_plan: true,
    plan_type: Some(plan_type.to_string()),
    compliance_score,
    notes: if notes.is_empty() {
      None
    } else {
      Some(notes.to_string())
    },
  }
}

pub fn history_item(
  workout_id: i64,
  date: NaiveDate,
  overall_score: Option<f64>,
  compliance_score: Option<f64>,
  execution_label: &str,
  fatigue_risk: &str,
) -> AnalysisHistoryItem {
  AnalysisHistoryItem {
    workout_id,
    date: Some(date),
    overall_score,
    compliance_score,
    execution_label: Some(execution_label.to_string()),
    fatigue_risk: Some(fatigue_risk.to_string()),
    notes_short: None,
    workout_summary: workout(Some(75.0), Some(180.0), Some(172.0)),
    created_at: None,
    updated_at: None,
  }
}

/// ---------------------------------------------------------------------------
/// Backend Payloads
/// ---------------------------------------------------------------------------

pub fn history_response_json() -> serde_json::Value {
  json!({
    "success": true,
    "analyses": [
      {
        "workout_id": 42,
        "date": "2025-03-30",
        "overall_score": 78,
        "compliance_score": 65,
        "execution_label": "good",
        "fatigue_risk": "medium",
        "notes_short": "Solid 4x4",
        "workout_summary": {"duration_min": 75, "avg_power_w": 180.0, "avg_hr_bpm": 172},
        "created_at": "2025-03-30T18:02:11",
        "updated_at": null
      },
      {
        "workout_id": 41,
        "date": "2025-03-28",
        "overall_score": 52,
        "compliance_score": null,
        "execution_label": "overreached",
        "fatigue_risk": "high",
        "notes_short": null,
        "workout_summary": {"duration_min": 95, "avg_power_w": null, "avg_hr_bpm": 151},
        "created_at": "2025-03-28T07:40:00",
        "updated_at": null
      }
    ],
    "pagination": {"limit": 50, "offset": 0, "total": 2, "has_more": false}
  })
}

pub fn analysis_json() -> serde_json::Value {
  json!({
    "analysis_date": "2025-03-30",
    "scores": {
      "overall_score": 78,
      "dimension_scores": {"intensity": 82, "duration": 64, "hr_response": 71},
      "label": "good",
      "fatigue_risk": "medium"
    },
    "coach_comparison": {
      "has_coach_plan": true,
      "plan_type": "norwegian_4x4",
      "compliance_score": 65,
      "notes": "HR exceeded target, pushed hard"
    },
    "summary": {
      "short_text": "Hard but productive 4x4.",
      "detailed_text": "Intervals landed in Z4-Z5."
    },
    "physiology": {
      "hrv_state": "Stable",
      "rhr_state": "Slightly elevated",
      "recovery_status": "Adequate",
      "cardiac_efficiency": "Improving"
    },
    "action_items": ["Keep tomorrow easy", "Hydrate before intervals"],
    "raw": {"prompt_version": "v3"}
  })
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use crate::models::{AnalysisDetail, HistoryPage};

  #[test]
  fn test_fixture_payloads_parse() {
    let page: HistoryPage = serde_json::from_value(history_response_json()).unwrap();
    assert_eq!(page.analyses.len(), 2);
    assert_eq!(page.pagination.total, 2);

    let detail: AnalysisDetail = serde_json::from_value(analysis_json()).unwrap();
    assert_eq!(detail.action_items.len(), 2);
    assert_eq!(detail.raw.prompt_version.as_deref(), Some("v3"));
  }

  #[test]
  fn test_coach_plan_fixture_blank_notes() {
    assert!(coach_plan("rest", "", None).notes.is_none());
  }
}
