//! Deviation chips from coach notes
//!
//! Lexical keyword scan over free-text comparison notes. There is no negation
//! handling: "did not exceed power" still produces a power chip.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChipCategory {
  Duration,
  Power,
  Hr,
  Intensity,
}

impl ChipCategory {
  pub fn text(&self) -> &'static str {
    match self {
      ChipCategory::Duration => "+Duration",
      ChipCategory::Power => "Power ↑",
      ChipCategory::Hr => "HR ↑",
      ChipCategory::Intensity => "Intensity ↑",
    }
  }

  pub fn css_class(&self) -> &'static str {
    match self {
      ChipCategory::Duration => "chip-duration",
      ChipCategory::Power => "chip-power",
      ChipCategory::Hr => "chip-hr",
      ChipCategory::Intensity => "chip-intensity",
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviationChip {
  pub text: String,
  pub category: ChipCategory,
}

impl From<ChipCategory> for DeviationChip {
  fn from(category: ChipCategory) -> Self {
    Self {
      text: category.text().to_string(),
      category,
    }
  }
}

/// A chip fires when any `standalone` phrase is present, or when a `subject`
/// and a `qualifier` are both present anywhere in the notes.
#[derive(Debug, Clone, Copy)]
pub struct ChipRule {
  pub category: ChipCategory,
  pub standalone: &'static [&'static str],
  pub subjects: &'static [&'static str],
  pub qualifiers: &'static [&'static str],
}

impl ChipRule {
  fn matches(&self, lowered: &str) -> bool {
    let contains_any = |needles: &[&str]| needles.iter().any(|n| lowered.contains(n));
    contains_any(self.standalone) || (contains_any(self.subjects) && contains_any(self.qualifiers))
  }
}

/// Evaluation order is chip order
pub const CHIP_RULES: [ChipRule; 4] = [
  ChipRule {
    category: ChipCategory::Duration,
    standalone: &[],
    subjects: &["minutes", "min", "duration"],
    qualifiers: &["exceeded", "longer", "extended"],
  },
  ChipRule {
    category: ChipCategory::Power,
    standalone: &[],
    subjects: &["power"],
    qualifiers: &["exceeded", "higher", "above"],
  },
  ChipRule {
    category: ChipCategory::Hr,
    standalone: &[],
    subjects: &["heart rate", "hr"],
    qualifiers: &["exceeded", "higher", "elevated", "above"],
  },
  ChipRule {
    category: ChipCategory::Intensity,
    standalone: &["intense", "too hard", "beyond z1", "beyond z2"],
    subjects: &["intensity"],
    qualifiers: &["exceeded", "higher"],
  },
];

pub fn extract_deviation_chips(notes: Option<&str>) -> Vec<DeviationChip> {
  let notes = match notes {
    Some(notes) if !notes.is_empty() => notes,
    _ => return Vec::new(),
  };

  let lowered = notes.to_lowercase();

  CHIP_RULES
    .iter()
    .filter(|rule| rule.matches(&lowered))
    .map(|rule| DeviationChip::from(rule.category))
    .collect()
}
