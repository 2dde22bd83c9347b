use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for employee rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeId(pub i64);

/// Identifier wrapper for rubric criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CriterionId(pub i64);

/// Identifier wrapper for KPI work plans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkPlanId(pub i64);

/// Identifier wrapper for persisted evaluations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EvaluationId(pub i64);

macro_rules! display_id {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        })*
    };
}

display_id!(EmployeeId, CriterionId, WorkPlanId, EvaluationId);

/// Access level resolved at login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmployeeRole {
    Manager,
    Employee,
}

impl EmployeeRole {
    pub const fn label(self) -> &'static str {
        match self {
            EmployeeRole::Manager => "manager",
            EmployeeRole::Employee => "employee",
        }
    }
}

/// Staff record. Created with the reference data and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    pub department: String,
    pub manager: String,
    pub join_date: NaiveDate,
    pub role: EmployeeRole,
    pub avatar_url: Option<String>,
}

/// One line of the evaluation rubric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Criterion {
    pub id: CriterionId,
    pub name: String,
    pub max_score: u8,
    pub weight: u32,
}

/// Reporting cadence of a KPI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlanType {
    Daily,
    Weekly,
    Monthly,
}

impl PlanType {
    pub const fn label(self) -> &'static str {
        match self {
            PlanType::Daily => "Daily",
            PlanType::Weekly => "Weekly",
            PlanType::Monthly => "Monthly",
        }
    }
}

/// Progress marker on a work plan. Any value may follow any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlanStatus {
    #[default]
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
}

impl PlanStatus {
    pub const fn label(self) -> &'static str {
        match self {
            PlanStatus::Pending => "Pending",
            PlanStatus::InProgress => "In Progress",
            PlanStatus::Completed => "Completed",
        }
    }

    /// Status implied by a progress update that did not name one.
    pub fn derived(target_value: f64, achieved_value: f64) -> Self {
        if achieved_value >= target_value {
            PlanStatus::Completed
        } else {
            PlanStatus::InProgress
        }
    }
}

/// A KPI assigned to one employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkPlan {
    pub id: WorkPlanId,
    pub employee_id: EmployeeId,
    pub title: String,
    #[serde(rename = "type")]
    pub plan_type: PlanType,
    pub target_value: f64,
    pub achieved_value: f64,
    pub metric: String,
    pub start_date: NaiveDate,
    pub due_date: NaiveDate,
    pub status: PlanStatus,
}

/// Payload accepted when a manager assigns a KPI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewWorkPlan {
    #[serde(default)]
    pub employee_id: Option<EmployeeId>,
    pub title: String,
    #[serde(rename = "type")]
    pub plan_type: PlanType,
    pub target_value: f64,
    #[serde(default)]
    pub metric: String,
    pub start_date: NaiveDate,
    pub due_date: NaiveDate,
}

/// Validated plan ready to be stored; the store assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkPlanDraft {
    pub employee_id: EmployeeId,
    pub title: String,
    pub plan_type: PlanType,
    pub target_value: f64,
    pub metric: String,
    pub start_date: NaiveDate,
    pub due_date: NaiveDate,
}

/// Progress update for an existing plan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanProgressUpdate {
    pub achieved_value: f64,
    #[serde(default)]
    pub status: Option<PlanStatus>,
}

/// Resolved progress written back to the store.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanProgress {
    pub achieved_value: f64,
    pub status: PlanStatus,
}

/// Criterion id to 1-5 score, captured when the evaluation was made.
pub type RubricScores = BTreeMap<CriterionId, u8>;

/// How an evaluation's total score was produced. Manual totals use each
/// criterion's own maximum, auto totals the fixed 1-5 rubric scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationKind {
    #[default]
    Manual,
    PlanBased,
    Auto,
}

impl EvaluationKind {
    pub const fn label(self) -> &'static str {
        match self {
            EvaluationKind::Manual => "manual",
            EvaluationKind::PlanBased => "plan_based",
            EvaluationKind::Auto => "auto",
        }
    }
}

/// Immutable evaluation fact in an employee's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub id: EvaluationId,
    pub employee_id: EmployeeId,
    pub date: DateTime<Utc>,
    pub total_score: f64,
    pub notes: String,
    #[serde(rename = "scores_json")]
    pub scores: RubricScores,
    pub kind: EvaluationKind,
}

/// Evaluation waiting for the store to assign an id.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationDraft {
    pub employee_id: EmployeeId,
    pub date: DateTime<Utc>,
    pub total_score: f64,
    pub notes: String,
    pub scores: RubricScores,
    pub kind: EvaluationKind,
}

/// Evaluation payload posted by the dashboard.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EvaluationSubmission {
    #[serde(default)]
    pub employee_id: Option<EmployeeId>,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub total_score: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default, rename = "scores_json")]
    pub scores: RubricScores,
    #[serde(default)]
    pub kind: Option<EvaluationKind>,
}

/// Evaluation joined with the owning employee for the global history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationWithEmployee {
    #[serde(flatten)]
    pub evaluation: Evaluation,
    pub employee_name: String,
    pub department: String,
}

/// Result returned by an auto-evaluation run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AutoEvaluation {
    pub id: EvaluationId,
    pub total_score: f64,
    pub avg_plan_completion: f64,
}
