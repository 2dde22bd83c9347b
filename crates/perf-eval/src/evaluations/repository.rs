use super::domain::{
    Criterion, Employee, EmployeeId, Evaluation, EvaluationDraft, PlanProgress, WorkPlan,
    WorkPlanDraft, WorkPlanId,
};

/// Storage abstraction over the employee, criteria, evaluation and work-plan
/// tables so the service can be exercised without a database.
pub trait PerformanceRepository: Send + Sync {
    fn employees(&self) -> Result<Vec<Employee>, RepositoryError>;
    fn employee(&self, id: EmployeeId) -> Result<Option<Employee>, RepositoryError>;
    fn criteria(&self) -> Result<Vec<Criterion>, RepositoryError>;

    fn evaluations(&self) -> Result<Vec<Evaluation>, RepositoryError>;
    fn evaluations_for(&self, employee_id: EmployeeId) -> Result<Vec<Evaluation>, RepositoryError>;
    fn insert_evaluation(&self, draft: EvaluationDraft) -> Result<Evaluation, RepositoryError>;

    /// Plans for one employee, or every plan when `employee_id` is `None`.
    fn plans(&self, employee_id: Option<EmployeeId>) -> Result<Vec<WorkPlan>, RepositoryError>;
    fn plan(&self, id: WorkPlanId) -> Result<Option<WorkPlan>, RepositoryError>;
    fn insert_plan(&self, draft: WorkPlanDraft) -> Result<WorkPlan, RepositoryError>;
    /// Overwrites the achieved value and status. Last write wins.
    fn update_plan_progress(
        &self,
        id: WorkPlanId,
        progress: PlanProgress,
    ) -> Result<WorkPlan, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
