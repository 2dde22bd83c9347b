use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, info, warn};

use super::domain::{
    AutoEvaluation, Criterion, Employee, EmployeeId, Evaluation, EvaluationDraft,
    EvaluationKind, EvaluationSubmission, EvaluationWithEmployee, NewWorkPlan, PlanProgress,
    PlanProgressUpdate, PlanStatus, WorkPlan, WorkPlanDraft, WorkPlanId,
};
use super::overview::CompanyOverview;
use super::repository::{PerformanceRepository, RepositoryError};
use super::scoring::{PlanScoreSummary, ScoringEngine, ScoringError, ScoringPolicy};

/// Fixed code returned when a login name matches nobody.
pub const UNKNOWN_EMPLOYEE_CODE: &str = "EMPLOYEE_NOT_FOUND";

/// Service composing the repository and the scoring engine.
pub struct PerformanceService<R> {
    repository: Arc<R>,
    engine: Arc<ScoringEngine>,
}

impl<R> PerformanceService<R>
where
    R: PerformanceRepository + 'static,
{
    pub fn new(repository: Arc<R>, policy: ScoringPolicy) -> Self {
        Self {
            repository,
            engine: Arc::new(ScoringEngine::new(policy)),
        }
    }

    pub fn engine(&self) -> &ScoringEngine {
        &self.engine
    }

    /// Resolve an employee by name. Names compare trimmed and case-insensitively.
    pub fn login(&self, name: &str) -> Result<Employee, PerformanceServiceError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PerformanceServiceError::Validation(
                "name is required".to_string(),
            ));
        }

        let employee = self
            .repository
            .employees()?
            .into_iter()
            .find(|employee| employee.name.trim().eq_ignore_ascii_case(name));

        match employee {
            Some(employee) => {
                info!(employee_id = %employee.id, role = employee.role.label(), "login");
                Ok(employee)
            }
            None => {
                warn!(name, "login rejected for unknown name");
                Err(PerformanceServiceError::UnknownLogin)
            }
        }
    }

    pub fn employees(&self) -> Result<Vec<Employee>, PerformanceServiceError> {
        Ok(self.repository.employees()?)
    }

    pub fn employee(&self, id: EmployeeId) -> Result<Employee, PerformanceServiceError> {
        self.repository
            .employee(id)?
            .ok_or(PerformanceServiceError::EmployeeNotFound(id))
    }

    pub fn criteria(&self) -> Result<Vec<Criterion>, PerformanceServiceError> {
        Ok(self.repository.criteria()?)
    }

    /// Every evaluation joined with its employee, newest first.
    pub fn evaluations(&self) -> Result<Vec<EvaluationWithEmployee>, PerformanceServiceError> {
        let employees = self.repository.employees()?;
        let mut evaluations = self.repository.evaluations()?;
        sort_newest_first(&mut evaluations);

        Ok(evaluations
            .into_iter()
            .filter_map(|evaluation| {
                let employee = employees
                    .iter()
                    .find(|employee| employee.id == evaluation.employee_id)?;
                Some(EvaluationWithEmployee {
                    employee_name: employee.name.clone(),
                    department: employee.department.clone(),
                    evaluation,
                })
            })
            .collect())
    }

    /// One employee's history, newest first.
    pub fn evaluations_for(
        &self,
        employee_id: EmployeeId,
    ) -> Result<Vec<Evaluation>, PerformanceServiceError> {
        let mut evaluations = self.repository.evaluations_for(employee_id)?;
        sort_newest_first(&mut evaluations);
        Ok(evaluations)
    }

    /// Persist a dashboard evaluation. A missing total is computed from the
    /// rubric scores.
    pub fn record_evaluation(
        &self,
        submission: EvaluationSubmission,
        now: DateTime<Utc>,
    ) -> Result<Evaluation, PerformanceServiceError> {
        let employee_id = self.require_employee(submission.employee_id)?;
        let kind = submission.kind.unwrap_or_default();
        if kind == EvaluationKind::Auto {
            return Err(PerformanceServiceError::Validation(
                "auto evaluations are produced by auto-evaluate only".to_string(),
            ));
        }
        let criteria = self.repository.criteria()?;
        let computed = self.engine.manual_rubric(&criteria, &submission.scores)?;

        let total_score = match submission.total_score {
            Some(score) if !score.is_finite() => {
                return Err(PerformanceServiceError::Validation(
                    "total_score must be a finite number".to_string(),
                ))
            }
            Some(score) => score,
            None => computed,
        };

        let draft = EvaluationDraft {
            employee_id,
            date: submission.date.unwrap_or(now),
            total_score,
            notes: submission.notes.unwrap_or_default(),
            scores: submission.scores,
            kind,
        };

        let stored = self.repository.insert_evaluation(draft)?;
        info!(
            evaluation_id = %stored.id,
            employee_id = %stored.employee_id,
            kind = stored.kind.label(),
            total_score = stored.total_score,
            "evaluation recorded"
        );
        Ok(stored)
    }

    /// Assign a KPI work plan to an employee.
    pub fn assign_plan(&self, plan: NewWorkPlan) -> Result<WorkPlan, PerformanceServiceError> {
        let employee_id = self.require_employee(plan.employee_id)?;

        let title = plan.title.trim();
        if title.is_empty() {
            return Err(PerformanceServiceError::Validation(
                "title is required".to_string(),
            ));
        }
        if plan.target_value == 0.0 || !plan.target_value.is_finite() {
            return Err(PerformanceServiceError::Validation(
                "target_value must be a non-zero number".to_string(),
            ));
        }
        if plan.due_date < plan.start_date {
            return Err(PerformanceServiceError::Validation(
                "due_date must not precede start_date".to_string(),
            ));
        }

        let stored = self.repository.insert_plan(WorkPlanDraft {
            employee_id,
            title: title.to_string(),
            plan_type: plan.plan_type,
            target_value: plan.target_value,
            metric: plan.metric.trim().to_string(),
            start_date: plan.start_date,
            due_date: plan.due_date,
        })?;
        info!(plan_id = %stored.id, employee_id = %employee_id, title = %stored.title, "work plan assigned");
        Ok(stored)
    }

    pub fn plans(
        &self,
        employee_id: Option<EmployeeId>,
    ) -> Result<Vec<WorkPlan>, PerformanceServiceError> {
        Ok(self.repository.plans(employee_id)?)
    }

    /// Record achieved progress. Without an explicit status the plan becomes
    /// `Completed` at target and `In Progress` below it.
    pub fn update_progress(
        &self,
        plan_id: WorkPlanId,
        update: PlanProgressUpdate,
    ) -> Result<WorkPlan, PerformanceServiceError> {
        if !update.achieved_value.is_finite() {
            return Err(PerformanceServiceError::Validation(
                "achieved_value must be a finite number".to_string(),
            ));
        }

        let status = match update.status {
            Some(status) => status,
            None => {
                let plan = self
                    .repository
                    .plan(plan_id)?
                    .ok_or(PerformanceServiceError::PlanNotFound(plan_id))?;
                PlanStatus::derived(plan.target_value, update.achieved_value)
            }
        };

        let progress = PlanProgress {
            achieved_value: update.achieved_value,
            status,
        };

        match self.repository.update_plan_progress(plan_id, progress) {
            Ok(plan) => {
                debug!(plan_id = %plan.id, status = plan.status.label(), "work plan progress updated");
                Ok(plan)
            }
            Err(RepositoryError::NotFound) => Err(PerformanceServiceError::PlanNotFound(plan_id)),
            Err(other) => Err(other.into()),
        }
    }

    /// Per-KPI efficiencies and the live plan score for one employee.
    pub fn plan_summary(
        &self,
        employee_id: EmployeeId,
    ) -> Result<PlanScoreSummary, PerformanceServiceError> {
        self.employee(employee_id)?;
        let plans = self.repository.plans(Some(employee_id))?;
        Ok(self.engine.plan_summary(employee_id, &plans))
    }

    /// Band the employee's plan score onto the rubric and store the result as
    /// an auto evaluation. Nothing is stored when the employee has no plans.
    pub fn auto_evaluate(
        &self,
        employee_id: Option<EmployeeId>,
        now: DateTime<Utc>,
    ) -> Result<AutoEvaluation, PerformanceServiceError> {
        let employee_id = self.require_employee(employee_id)?;

        let plans = self.repository.plans(Some(employee_id))?;
        if plans.is_empty() {
            return Err(PerformanceServiceError::NoWorkPlans(employee_id));
        }

        let aggregate = self.engine.aggregate_score(&plans);
        let criteria = self.repository.criteria()?;
        let rubric = self.engine.auto_rubric(aggregate, &criteria);

        let stored = self.repository.insert_evaluation(EvaluationDraft {
            employee_id,
            date: now,
            total_score: rubric.total_score,
            notes: format!(
                "Auto-generated from {} work plan(s). Average completion: {:.1}%",
                plans.len(),
                aggregate
            ),
            scores: rubric.scores,
            kind: EvaluationKind::Auto,
        })?;

        info!(
            evaluation_id = %stored.id,
            employee_id = %employee_id,
            plan_count = plans.len(),
            avg_plan_completion = aggregate,
            total_score = stored.total_score,
            "auto evaluation stored"
        );

        Ok(AutoEvaluation {
            id: stored.id,
            total_score: stored.total_score,
            avg_plan_completion: aggregate,
        })
    }

    pub fn overview(&self, today: NaiveDate) -> Result<CompanyOverview, PerformanceServiceError> {
        let employees = self.repository.employees()?;
        let evaluations = self.repository.evaluations()?;
        let plans = self.repository.plans(None)?;
        Ok(CompanyOverview::compute(
            &self.engine,
            &employees,
            &evaluations,
            &plans,
            today,
        ))
    }

    fn require_employee(
        &self,
        employee_id: Option<EmployeeId>,
    ) -> Result<EmployeeId, PerformanceServiceError> {
        let employee_id = employee_id.ok_or_else(|| {
            PerformanceServiceError::Validation("employee_id is required".to_string())
        })?;

        match self.repository.employee(employee_id)? {
            Some(_) => Ok(employee_id),
            None => Err(PerformanceServiceError::Validation(format!(
                "employee {employee_id} does not exist"
            ))),
        }
    }
}

fn sort_newest_first(evaluations: &mut [Evaluation]) {
    evaluations.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
}

/// Error raised by the performance service.
#[derive(Debug, thiserror::Error)]
pub enum PerformanceServiceError {
    #[error("{0}")]
    Validation(String),
    #[error("{}", UNKNOWN_EMPLOYEE_CODE)]
    UnknownLogin,
    #[error("employee {0} not found")]
    EmployeeNotFound(EmployeeId),
    #[error("work plan {0} not found")]
    PlanNotFound(WorkPlanId),
    #[error("employee {0} has no work plans to evaluate")]
    NoWorkPlans(EmployeeId),
    #[error(transparent)]
    Scoring(#[from] ScoringError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
