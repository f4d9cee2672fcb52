//! Score bands, labels and badges for the analyzer dashboard
//!
//! Maps backend scores and enum strings onto display text and style classes.

use serde::Serialize;

use crate::comparison::Metric;
use crate::delta::ComparisonStatus;

/// ---------------------------------------------------------------------------
/// Score Bands
/// ---------------------------------------------------------------------------

/// Execution / overall score coloring (0-100)
pub fn score_color_class(score: Option<f64>) -> &'static str {
  match score {
    None => "",
    Some(s) if s >= 80.0 => "score-excellent",
    Some(s) if s >= 65.0 => "score-good",
    Some(s) if s >= 50.0 => "score-ok",
    Some(_) => "score-low",
  }
}

/// Plan compliance coloring (0-100)
pub fn compliance_class(score: Option<f64>) -> &'static str {
  match score {
    None => "",
    Some(s) if s >= 80.0 => "compliance-high",
    Some(s) if s >= 60.0 => "compliance-medium",
    Some(_) => "compliance-low",
  }
}

/// ---------------------------------------------------------------------------
/// Execution Labels
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionLabel {
  Excellent,
  Good,
  Ok,
  TooEasy,
  Overreached,
}

impl ExecutionLabel {
  pub fn text(&self) -> &'static str {
    match self {
      ExecutionLabel::Excellent => "Excellent",
      ExecutionLabel::Good => "Good",
      ExecutionLabel::Ok => "OK",
      ExecutionLabel::TooEasy => "Too Easy",
      ExecutionLabel::Overreached => "Overreached",
    }
  }

  pub fn css_class(&self) -> &'static str {
    match self {
      ExecutionLabel::Excellent => "label-excellent",
      ExecutionLabel::Good => "label-good",
      ExecutionLabel::Ok => "label-ok",
      ExecutionLabel::TooEasy => "label-too-easy",
      ExecutionLabel::Overreached => "label-overreached",
    }
  }

  pub fn is_good_or_better(&self) -> bool {
    matches!(self, ExecutionLabel::Excellent | ExecutionLabel::Good)
  }
}

impl std::str::FromStr for ExecutionLabel {
  type Err = String;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "excellent" => Ok(Self::Excellent),
      "good" => Ok(Self::Good),
      "ok" => Ok(Self::Ok),
      "too_easy" => Ok(Self::TooEasy),
      "overreached" => Ok(Self::Overreached),
      _ => Err(format!("Unknown execution label: {}", s)),
    }
  }
}

/// ---------------------------------------------------------------------------
/// Fatigue Risk
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FatigueRisk {
  Low,
  Medium,
  High,
}

impl FatigueRisk {
  pub fn badge_text(&self) -> &'static str {
    match self {
      FatigueRisk::Low => "Low Fatigue Risk",
      FatigueRisk::Medium => "Medium Fatigue Risk",
      FatigueRisk::High => "High Fatigue Risk",
    }
  }

  pub fn css_class(&self) -> &'static str {
    match self {
      FatigueRisk::Low => "fatigue-low",
      FatigueRisk::Medium => "fatigue-medium",
      FatigueRisk::High => "fatigue-high",
    }
  }
}

impl std::str::FromStr for FatigueRisk {
  type Err = String;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "low" => Ok(Self::Low),
      "medium" => Ok(Self::Medium),
      "high" => Ok(Self::High),
      _ => Err(format!("Unknown fatigue risk: {}", s)),
    }
  }
}

/// Text + class pair ready for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Badge {
  pub text: String,
  pub class: &'static str,
}

/// Known labels get their display text; unknown ones pass through unstyled
pub fn execution_badge(label: Option<&str>) -> Badge {
  match label.map(|l| (l, l.parse::<ExecutionLabel>())) {
    Some((_, Ok(known))) => Badge {
      text: known.text().to_string(),
      class: known.css_class(),
    },
    Some((raw, Err(_))) if !raw.is_empty() => Badge {
      text: raw.to_string(),
      class: "",
    },
    _ => Badge {
      text: "--".to_string(),
      class: "",
    },
  }
}

pub fn fatigue_badge(risk: Option<&str>) -> Badge {
  match risk.map(|r| (r, r.parse::<FatigueRisk>())) {
    Some((_, Ok(known))) => Badge {
      text: known.badge_text().to_string(),
      class: known.css_class(),
    },
    Some((raw, Err(_))) if !raw.is_empty() => Badge {
      text: raw.to_string(),
      class: "",
    },
    _ => Badge {
      text: "--".to_string(),
      class: "",
    },
  }
}

/// ---------------------------------------------------------------------------
/// Delta Badges and Plan Type Text
/// ---------------------------------------------------------------------------

/// Duration is styled by sign; power and HR by range status
pub fn delta_badge_class(metric: Metric, status: ComparisonStatus, delta: i64) -> &'static str {
  match metric {
    Metric::Duration => match delta {
      d if d > 0 => "delta-positive",
      d if d < 0 => "delta-negative",
      _ => "delta-neutral",
    },
    Metric::Power | Metric::HeartRate => match status {
      ComparisonStatus::Within => "delta-neutral",
      ComparisonStatus::Above => "delta-positive",
      ComparisonStatus::Below | ComparisonStatus::Unknown => "delta-negative",
    },
  }
}

/// "+12%", "-5%", "0%"
pub fn format_signed_delta(delta: i64) -> String {
  if delta > 0 {
    format!("+{}%", delta)
  } else {
    format!("{}%", delta)
  }
}

/// "norwegian_4x4" -> "Norwegian 4x4"
pub fn format_plan_type(plan_type: &str) -> String {
  let spaced = plan_type.replace('_', " ");
  let mut out = String::with_capacity(spaced.len());
  let mut at_word_start = true;

  for ch in spaced.chars() {
    if ch.is_alphanumeric() {
      if at_word_start {
        out.extend(ch.to_uppercase());
      } else {
        out.push(ch);
      }
      at_word_start = false;
    } else {
      out.push(ch);
      at_word_start = true;
    }
  }

  out
}

/// Dimension bar width, clamped to 0-100
pub fn bar_width(score: Option<f64>) -> f64 {
  score.unwrap_or(0.0).clamp(0.0, 100.0)
}
