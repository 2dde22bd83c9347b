use serde::{Deserialize, Serialize};

/// Overperformance credit stops here when averaging plans into a score.
pub const DEFAULT_EFFICIENCY_CAP: f64 = 120.0;
/// Uncapped efficiency at or above this marks a KPI as on target.
pub const DEFAULT_GOOD_THRESHOLD: f64 = 100.0;
/// Inclusive lower bounds for rubric bands 5, 4, 3 and 2.
pub const DEFAULT_BAND_BREAKPOINTS: [f64; 4] = [90.0, 75.0, 50.0, 30.0];
/// Criteria whose auto-evaluation score follows work-plan performance.
pub const PLAN_DRIVEN_CRITERIA: [&str; 3] = ["Productivity", "Quality of Work", "Reliability"];
/// Score given to every other criterion during auto-evaluation.
pub const DEFAULT_CRITERION_SCORE: u8 = 3;
/// Top of the rubric scale.
pub const RUBRIC_MAX_SCORE: u8 = 5;
/// Bottom of the rubric scale.
pub const RUBRIC_MIN_SCORE: u8 = 1;
/// Placeholder the evaluation form sends for a criterion left untouched.
pub const UNSCORED: u8 = 0;

/// Tunable thresholds used by the scoring engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringPolicy {
    pub efficiency_cap: f64,
    pub good_threshold: f64,
    pub band_breakpoints: [f64; 4],
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            efficiency_cap: DEFAULT_EFFICIENCY_CAP,
            good_threshold: DEFAULT_GOOD_THRESHOLD,
            band_breakpoints: DEFAULT_BAND_BREAKPOINTS,
        }
    }
}

impl ScoringPolicy {
    /// Maps an aggregate plan score onto the 1-5 rubric scale.
    pub fn band_for(&self, aggregate: f64) -> u8 {
        self.band_breakpoints
            .iter()
            .zip((2..=RUBRIC_MAX_SCORE).rev())
            .find(|(breakpoint, _)| aggregate >= **breakpoint)
            .map(|(_, band)| band)
            .unwrap_or(RUBRIC_MIN_SCORE)
    }

    pub fn is_plan_driven(criterion_name: &str) -> bool {
        PLAN_DRIVEN_CRITERIA.contains(&criterion_name)
    }
}
