//! Employee performance tracking: KPI work plans, rubric evaluations and
//! the scoring that turns one into the other.

pub mod domain;
pub mod import;
pub mod overview;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod seed;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    AutoEvaluation, Criterion, CriterionId, Employee, EmployeeId, EmployeeRole, Evaluation,
    EvaluationDraft, EvaluationId, EvaluationKind, EvaluationSubmission, EvaluationWithEmployee,
    NewWorkPlan, PlanProgress, PlanProgressUpdate, PlanStatus, PlanType, RubricScores, WorkPlan,
    WorkPlanDraft, WorkPlanId,
};
pub use import::{KpiImportError, KpiSheetEntry, KpiSheetImporter};
pub use overview::{
    CompanyOverview, DepartmentAverage, LeaderboardEntry, ParticipationStatus, ScoreBand,
    ScoreBucket,
};
pub use repository::{PerformanceRepository, RepositoryError};
pub use router::performance_router;
pub use scoring::{
    KpiMeasurement, KpiScore, KpiStatus, PlanEfficiency, PlanScoreSummary, RubricOutcome,
    ScoringEngine, ScoringError, ScoringPolicy,
};
pub use service::{PerformanceService, PerformanceServiceError, UNKNOWN_EMPLOYEE_CODE};
