//! Performance scoring shared by every surface that shows or stores a score.
//!
//! Work plans are reduced to efficiencies, capped and averaged into a plan
//! score. Auto-evaluation bands that score onto the rubric; manual
//! evaluation totals manager-entered rubric scores. The two paths are kept
//! separate on purpose and never fed into each other.

mod policy;
mod rules;

pub use policy::{
    ScoringPolicy, DEFAULT_BAND_BREAKPOINTS, DEFAULT_CRITERION_SCORE, DEFAULT_EFFICIENCY_CAP,
    DEFAULT_GOOD_THRESHOLD, PLAN_DRIVEN_CRITERIA, RUBRIC_MAX_SCORE, RUBRIC_MIN_SCORE, UNSCORED,
};

use super::domain::{Criterion, CriterionId, EmployeeId, RubricScores, WorkPlan, WorkPlanId};
use serde::{Deserialize, Serialize};

/// Anything with a target and an achieved value can be scored.
pub trait KpiMeasurement {
    fn target_value(&self) -> f64;
    fn achieved_value(&self) -> f64;
}

impl KpiMeasurement for WorkPlan {
    fn target_value(&self) -> f64 {
        self.target_value
    }

    fn achieved_value(&self) -> f64 {
        self.achieved_value
    }
}

impl<M: KpiMeasurement> KpiMeasurement for &M {
    fn target_value(&self) -> f64 {
        (*self).target_value()
    }

    fn achieved_value(&self) -> f64 {
        (*self).achieved_value()
    }
}

/// Per-KPI verdict shown next to each plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum KpiStatus {
    Good,
    Alert,
}

impl KpiStatus {
    pub const fn label(self) -> &'static str {
        match self {
            KpiStatus::Good => "GOOD",
            KpiStatus::Alert => "ALERT",
        }
    }
}

/// Efficiency breakdown for one measurement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KpiScore {
    /// Uncapped efficiency; `None` when the target is zero.
    pub efficiency: Option<f64>,
    /// Efficiency as it counts toward the aggregate.
    pub scoring_efficiency: Option<f64>,
    pub status: KpiStatus,
}

/// One row of an employee's plan report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanEfficiency {
    pub plan_id: WorkPlanId,
    pub title: String,
    pub metric: String,
    pub target_value: f64,
    pub achieved_value: f64,
    #[serde(flatten)]
    pub score: KpiScore,
}

/// Plan report plus the live score derived from it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanScoreSummary {
    pub employee_id: EmployeeId,
    pub plan_count: usize,
    pub live_score: f64,
    pub plans: Vec<PlanEfficiency>,
}

/// Rubric snapshot and the weighted percentage it yields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RubricOutcome {
    pub scores: RubricScores,
    pub total_score: f64,
}

/// Rejections raised while scoring a manual rubric.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoringError {
    #[error("criterion {0} is not part of the rubric")]
    UnknownCriterion(CriterionId),
    #[error("score {score} for '{criterion}' must be between 1 and {max}")]
    ScoreOutOfRange {
        criterion: String,
        score: u8,
        max: u8,
    },
}

/// Stateless scorer applying a `ScoringPolicy`.
#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    policy: ScoringPolicy,
}

impl ScoringEngine {
    pub fn new(policy: ScoringPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ScoringPolicy {
        &self.policy
    }

    pub fn efficiency<M: KpiMeasurement>(&self, item: &M) -> Option<f64> {
        rules::efficiency(item.target_value(), item.achieved_value())
    }

    /// Efficiency, capped efficiency and status for a single KPI.
    pub fn score_kpi<M: KpiMeasurement>(&self, item: &M) -> KpiScore {
        let efficiency = self.efficiency(item);
        let status = match efficiency {
            Some(value) if value >= self.policy.good_threshold => KpiStatus::Good,
            _ => KpiStatus::Alert,
        };

        KpiScore {
            efficiency,
            scoring_efficiency: efficiency.map(|value| rules::capped(value, &self.policy)),
            status,
        }
    }

    /// Mean capped efficiency across plans, 0 when there are none.
    pub fn aggregate_score<M: KpiMeasurement>(&self, items: &[M]) -> f64 {
        rules::aggregate(items, &self.policy)
    }

    pub fn plan_summary(&self, employee_id: EmployeeId, plans: &[WorkPlan]) -> PlanScoreSummary {
        let rows = plans
            .iter()
            .map(|plan| PlanEfficiency {
                plan_id: plan.id,
                title: plan.title.clone(),
                metric: plan.metric.clone(),
                target_value: plan.target_value,
                achieved_value: plan.achieved_value,
                score: self.score_kpi(plan),
            })
            .collect();

        PlanScoreSummary {
            employee_id,
            plan_count: plans.len(),
            live_score: self.aggregate_score(plans),
            plans: rows,
        }
    }

    /// Bands a plan score onto the rubric and totals it.
    pub fn auto_rubric(&self, aggregate: f64, criteria: &[Criterion]) -> RubricOutcome {
        let scores =
            rules::band_criteria(aggregate, criteria, &self.policy, DEFAULT_CRITERION_SCORE);
        let total_score = rules::weighted_percentage(criteria.iter().map(|criterion| {
            let score = scores.get(&criterion.id).copied().unwrap_or_default();
            (score, criterion.weight, RUBRIC_MAX_SCORE)
        }));

        RubricOutcome {
            scores,
            total_score,
        }
    }

    /// Totals manager-entered scores. Unscored criteria still count toward
    /// the maximum.
    pub fn manual_rubric(
        &self,
        criteria: &[Criterion],
        scores: &RubricScores,
    ) -> Result<f64, ScoringError> {
        rules::validate_manual_scores(criteria, scores)?;

        Ok(rules::weighted_percentage(criteria.iter().map(|criterion| {
            let score = scores.get(&criterion.id).copied().unwrap_or_default();
            (score, criterion.weight, criterion.max_score)
        })))
    }
}
