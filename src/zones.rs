//! Zone resolution for coach plan types
//!
//! Maps a coach's plan type (a catalog key or a loose free-text label) to the
//! heart-rate, power and duration band the session is expected to land in.

use serde::Serialize;
use std::sync::OnceLock;

/// ---------------------------------------------------------------------------
/// Bounds and Zone Ranges
/// ---------------------------------------------------------------------------

/// Inclusive numeric band, `min <= max`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, serde::Deserialize)]
pub struct Bounds {
  pub min: f64,
  pub max: f64,
}

impl Bounds {
  pub const fn new(min: f64, max: f64) -> Self {
    Self { min, max }
  }

  pub fn midpoint(&self) -> f64 {
    (self.min + self.max) / 2.0
  }

  pub fn contains(&self, value: f64) -> bool {
    value >= self.min && value <= self.max
  }
}

/// Target band for one plan type
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ZoneRange {
  pub hr: Bounds,
  pub power: Bounds,
  /// Minutes
  pub duration: Bounds,
  /// Display zone name, e.g. "Z4-Z5"
  pub label: &'static str,
}

/// ---------------------------------------------------------------------------
/// Plan Types
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanType {
  Rest,
  RecoverySpinZ1,
  EasyEnduranceZ1,
  SteadyEnduranceZ2,
  ProgressiveEndurance,
  #[serde(rename = "norwegian_4x4")]
  Norwegian4x4,
  #[serde(rename = "threshold_3x8")]
  Threshold3x8,
  Vo2maxIntervals,
  CadenceDrills,
  HybridEndurance,
}

impl PlanType {
  /// Catalog order; indexes `ZoneCatalog` storage
  pub const ALL: [PlanType; 10] = [
    PlanType::Rest,
    PlanType::RecoverySpinZ1,
    PlanType::EasyEnduranceZ1,
    PlanType::SteadyEnduranceZ2,
    PlanType::ProgressiveEndurance,
    PlanType::Norwegian4x4,
    PlanType::Threshold3x8,
    PlanType::Vo2maxIntervals,
    PlanType::CadenceDrills,
    PlanType::HybridEndurance,
  ];

  pub fn key(&self) -> &'static str {
    match self {
      PlanType::Rest => "rest",
      PlanType::RecoverySpinZ1 => "recovery_spin_z1",
      PlanType::EasyEnduranceZ1 => "easy_endurance_z1",
      PlanType::SteadyEnduranceZ2 => "steady_endurance_z2",
      PlanType::ProgressiveEndurance => "progressive_endurance",
      PlanType::Norwegian4x4 => "norwegian_4x4",
      PlanType::Threshold3x8 => "threshold_3x8",
      PlanType::Vo2maxIntervals => "vo2max_intervals",
      PlanType::CadenceDrills => "cadence_drills",
      PlanType::HybridEndurance => "hybrid_endurance",
    }
  }

  /// Exact lookup of an already-normalized key
  pub fn from_key(key: &str) -> Option<Self> {
    Self::ALL.into_iter().find(|plan| plan.key() == key)
  }

  fn index(self) -> usize {
    self as usize
  }
}

impl std::fmt::Display for PlanType {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.key())
  }
}

impl std::str::FromStr for PlanType {
  type Err = String;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::from_key(&normalize_plan_type(s)).ok_or_else(|| format!("Unknown plan type: {}", s))
  }
}

/// ---------------------------------------------------------------------------
/// Heuristic Matching
/// ---------------------------------------------------------------------------

/// Substring rule applied when a plan type is not an exact catalog key
#[derive(Debug, Clone, Copy)]
pub struct HeuristicRule {
  pub needles: &'static [&'static str],
  pub target: PlanType,
}

impl HeuristicRule {
  fn matches(&self, normalized: &str) -> bool {
    self.needles.iter().any(|needle| normalized.contains(needle))
  }
}

/// Evaluated top to bottom, first match wins.
/// "z2_threshold" therefore resolves to steady endurance, not threshold.
pub const HEURISTIC_RULES: [HeuristicRule; 5] = [
  HeuristicRule {
    needles: &["z1", "recovery", "easy"],
    target: PlanType::RecoverySpinZ1,
  },
  HeuristicRule {
    needles: &["z2", "endurance", "steady"],
    target: PlanType::SteadyEnduranceZ2,
  },
  HeuristicRule {
    needles: &["norwegian", "4x4"],
    target: PlanType::Norwegian4x4,
  },
  HeuristicRule {
    needles: &["threshold", "tempo"],
    target: PlanType::Threshold3x8,
  },
  HeuristicRule {
    needles: &["vo2", "interval"],
    target: PlanType::Vo2maxIntervals,
  },
];

/// How a plan type string was mapped onto the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "match", content = "plan_type", rename_all = "snake_case")]
pub enum ZoneResolution {
  Exact(PlanType),
  Heuristic(PlanType),
  Unresolved,
}

impl ZoneResolution {
  pub fn plan_type(&self) -> Option<PlanType> {
    match self {
      ZoneResolution::Exact(plan) | ZoneResolution::Heuristic(plan) => Some(*plan),
      ZoneResolution::Unresolved => None,
    }
  }
}

/// Lower-case and collapse each whitespace run into a single underscore
pub fn normalize_plan_type(plan_type: &str) -> String {
  let mut normalized = String::with_capacity(plan_type.len());
  let mut in_whitespace = false;

  for ch in plan_type.chars() {
    if ch.is_whitespace() {
      if !in_whitespace {
        normalized.push('_');
      }
      in_whitespace = true;
    } else {
      normalized.extend(ch.to_lowercase());
      in_whitespace = false;
    }
  }

  normalized
}

pub fn classify_plan_type(plan_type: Option<&str>) -> ZoneResolution {
  let raw = match plan_type {
    Some(raw) if !raw.is_empty() => raw,
    _ => return ZoneResolution::Unresolved,
  };

  let normalized = normalize_plan_type(raw);

  if let Some(plan) = PlanType::from_key(&normalized) {
    return ZoneResolution::Exact(plan);
  }

  HEURISTIC_RULES
    .iter()
    .find(|rule| rule.matches(&normalized))
    .map(|rule| ZoneResolution::Heuristic(rule.target))
    .unwrap_or(ZoneResolution::Unresolved)
}

/// ---------------------------------------------------------------------------
/// Zone Catalog
/// ---------------------------------------------------------------------------

/// Immutable plan type -> zone table
#[derive(Debug, Clone)]
pub struct ZoneCatalog {
  zones: [ZoneRange; 10],
}

impl ZoneCatalog {
  /// Ranges for a typical athlete profile
  pub fn standard() -> Self {
    Self {
      zones: PlanType::ALL.map(standard_zone),
    }
  }

  /// Process-wide catalog, built on first use
  pub fn shared() -> &'static ZoneCatalog {
    static CATALOG: OnceLock<ZoneCatalog> = OnceLock::new();
    CATALOG.get_or_init(ZoneCatalog::standard)
  }

  /// Replace one entry (athlete-specific catalogs)
  pub fn with_zone(mut self, plan: PlanType, zone: ZoneRange) -> Self {
    self.zones[plan.index()] = zone;
    self
  }

  pub fn zone(&self, plan: PlanType) -> &ZoneRange {
    &self.zones[plan.index()]
  }

  pub fn lookup(&self, resolution: ZoneResolution) -> Option<&ZoneRange> {
    resolution.plan_type().map(|plan| self.zone(plan))
  }

  pub fn resolve(&self, plan_type: Option<&str>) -> Option<&ZoneRange> {
    self.lookup(classify_plan_type(plan_type))
  }
}

impl Default for ZoneCatalog {
  fn default() -> Self {
    Self::standard()
  }
}

/// Resolve against the shared catalog
pub fn resolve_zone(plan_type: Option<&str>) -> Option<&'static ZoneRange> {
  ZoneCatalog::shared().resolve(plan_type)
}

fn standard_zone(plan: PlanType) -> ZoneRange {
  let (hr, power, duration, label) = match plan {
    PlanType::Rest => ((0.0, 100.0), (0.0, 0.0), (0.0, 0.0), "Rest"),
    PlanType::RecoverySpinZ1 => ((110.0, 125.0), (44.0, 59.0), (20.0, 30.0), "Z1"),
    PlanType::EasyEnduranceZ1 => ((110.0, 125.0), (44.0, 65.0), (30.0, 60.0), "Z1"),
    PlanType::SteadyEnduranceZ2 => ((125.0, 140.0), (65.0, 85.0), (45.0, 90.0), "Z2"),
    PlanType::ProgressiveEndurance => ((120.0, 145.0), (60.0, 90.0), (45.0, 75.0), "Z1-Z2"),
    PlanType::Norwegian4x4 => ((160.0, 185.0), (150.0, 200.0), (45.0, 60.0), "Z4-Z5"),
    PlanType::Threshold3x8 => ((150.0, 170.0), (120.0, 160.0), (40.0, 55.0), "Z3-Z4"),
    PlanType::Vo2maxIntervals => ((165.0, 190.0), (160.0, 220.0), (35.0, 50.0), "Z5"),
    PlanType::CadenceDrills => ((115.0, 135.0), (50.0, 75.0), (30.0, 45.0), "Z1-Z2"),
    PlanType::HybridEndurance => ((120.0, 145.0), (55.0, 85.0), (45.0, 75.0), "Z1-Z2"),
  };

  ZoneRange {
    hr: Bounds::new(hr.0, hr.1),
    power: Bounds::new(power.0, power.1),
    duration: Bounds::new(duration.0, duration.1),
    label,
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_exact_match_any_casing() {
    let zone = resolve_zone(Some("Norwegian_4x4")).unwrap();
    assert_eq!(zone.hr, Bounds::new(160.0, 185.0));
    assert_eq!(zone.power, Bounds::new(150.0, 200.0));
    assert_eq!(zone.duration, Bounds::new(45.0, 60.0));
    assert_eq!(zone.label, "Z4-Z5");
  }

  #[test]
  fn test_exact_match_with_spaces() {
    assert_eq!(
      classify_plan_type(Some("Easy Endurance   Z1")),
      ZoneResolution::Exact(PlanType::EasyEnduranceZ1)
    );
    assert_eq!(
      classify_plan_type(Some("CADENCE\tDRILLS")),
      ZoneResolution::Exact(PlanType::CadenceDrills)
    );
  }

  #[test]
  fn test_every_catalog_key_resolves_to_itself() {
    let catalog = ZoneCatalog::standard();
    for plan in PlanType::ALL {
      assert_eq!(classify_plan_type(Some(plan.key())), ZoneResolution::Exact(plan));
      let spaced = plan.key().replace('_', " ").to_uppercase();
      assert_eq!(catalog.resolve(Some(&spaced)), Some(catalog.zone(plan)));
    }
  }

  #[test]
  fn test_catalog_bounds_are_ordered() {
    let catalog = ZoneCatalog::standard();
    for plan in PlanType::ALL {
      let zone = catalog.zone(plan);
      assert!(zone.hr.min <= zone.hr.max, "{} hr", plan);
      assert!(zone.power.min <= zone.power.max, "{} power", plan);
      assert!(zone.duration.min <= zone.duration.max, "{} duration", plan);
    }
  }

  #[test]
  fn test_missing_or_empty_is_unresolved() {
    assert_eq!(classify_plan_type(None), ZoneResolution::Unresolved);
    assert_eq!(classify_plan_type(Some("")), ZoneResolution::Unresolved);
    assert!(resolve_zone(None).is_none());
    assert!(resolve_zone(Some("")).is_none());
    assert!(resolve_zone(Some("   ")).is_none());
  }

  #[test]
  fn test_unknown_label_is_unresolved() {
    assert!(resolve_zone(Some("strength_session")).is_none());
    assert!(resolve_zone(Some("yoga")).is_none());
  }

  #[test]
  fn test_heuristic_rules_in_order() {
    assert_eq!(
      classify_plan_type(Some("recovery_z1")),
      ZoneResolution::Heuristic(PlanType::RecoverySpinZ1)
    );
    assert_eq!(
      classify_plan_type(Some("endurance_z2")),
      ZoneResolution::Heuristic(PlanType::SteadyEnduranceZ2)
    );
    assert_eq!(
      classify_plan_type(Some("4x4_vo2")),
      ZoneResolution::Heuristic(PlanType::Norwegian4x4)
    );
    assert_eq!(
      classify_plan_type(Some("Tempo Blocks")),
      ZoneResolution::Heuristic(PlanType::Threshold3x8)
    );
    assert_eq!(
      classify_plan_type(Some("vo2 short intervals")),
      ZoneResolution::Heuristic(PlanType::Vo2maxIntervals)
    );
  }

  #[test]
  fn test_z2_beats_tempo() {
    // rule 2 ("z2") is checked before rule 4 ("tempo")
    assert_eq!(
      classify_plan_type(Some("z2 tempo ride")),
      ZoneResolution::Heuristic(PlanType::SteadyEnduranceZ2)
    );
    assert_eq!(
      resolve_zone(Some("z2_threshold")),
      Some(ZoneCatalog::shared().zone(PlanType::SteadyEnduranceZ2))
    );
  }

  #[test]
  fn test_easy_beats_endurance() {
    // "easy" (rule 1) wins over "endurance" (rule 2) for non-catalog labels
    assert_eq!(
      classify_plan_type(Some("easy endurance")),
      ZoneResolution::Heuristic(PlanType::RecoverySpinZ1)
    );
  }

  #[test]
  fn test_normalize_plan_type() {
    assert_eq!(normalize_plan_type("Steady  Endurance Z2"), "steady_endurance_z2");
    assert_eq!(normalize_plan_type(" lead"), "_lead");
    assert_eq!(normalize_plan_type("already_snake"), "already_snake");
  }

  #[test]
  fn test_plan_type_from_str_and_display() {
    let plan: PlanType = "Threshold 3x8".parse().unwrap();
    assert_eq!(plan, PlanType::Threshold3x8);
    assert_eq!(plan.to_string(), "threshold_3x8");
    assert!("threshold".parse::<PlanType>().is_err());
  }

  #[test]
  fn test_plan_type_serializes_as_key() {
    for plan in PlanType::ALL {
      assert_eq!(
        serde_json::to_value(plan).unwrap(),
        serde_json::Value::String(plan.key().to_string())
      );
    }
  }

  #[test]
  fn test_injected_catalog_overrides_entry() {
    let custom = ZoneRange {
      hr: Bounds::new(150.0, 175.0),
      power: Bounds::new(210.0, 260.0),
      duration: Bounds::new(40.0, 50.0),
      label: "Z4-Z5",
    };
    let catalog = ZoneCatalog::standard().with_zone(PlanType::Norwegian4x4, custom);
    assert_eq!(catalog.resolve(Some("norwegian_4x4")), Some(&custom));
    // shared catalog untouched
    assert_eq!(resolve_zone(Some("norwegian_4x4")).unwrap().power.min, 150.0);
  }

  #[test]
  fn test_resolution_is_repeatable() {
    let first = classify_plan_type(Some("Hybrid Endurance"));
    let second = classify_plan_type(Some("Hybrid Endurance"));
    assert_eq!(first, second);
  }
}
