use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde_json::Value;

use crate::evaluations::domain::{
    Criterion, Employee, EmployeeId, Evaluation, EvaluationDraft, EvaluationId, NewWorkPlan,
    PlanProgress, PlanType, WorkPlan, WorkPlanDraft, WorkPlanId,
};
use crate::evaluations::repository::{PerformanceRepository, RepositoryError};
use crate::evaluations::scoring::ScoringPolicy;
use crate::evaluations::{performance_router, seed, PerformanceService};

#[derive(Default)]
struct Tables {
    employees: Vec<Employee>,
    criteria: Vec<Criterion>,
    evaluations: Vec<Evaluation>,
    plans: Vec<WorkPlan>,
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryRepository {
    pub(super) fn seeded() -> Self {
        let repository = Self::default();
        {
            let mut tables = repository.tables.lock().expect("repository mutex poisoned");
            tables.employees = seed::roster();
            tables.criteria = seed::criteria();
        }
        repository
    }

    pub(super) fn evaluation_count(&self) -> usize {
        self.tables
            .lock()
            .expect("repository mutex poisoned")
            .evaluations
            .len()
    }
}

impl PerformanceRepository for MemoryRepository {
    fn employees(&self) -> Result<Vec<Employee>, RepositoryError> {
        Ok(self.tables.lock().expect("repository mutex poisoned").employees.clone())
    }

    fn employee(&self, id: EmployeeId) -> Result<Option<Employee>, RepositoryError> {
        let tables = self.tables.lock().expect("repository mutex poisoned");
        Ok(tables.employees.iter().find(|e| e.id == id).cloned())
    }

    fn criteria(&self) -> Result<Vec<Criterion>, RepositoryError> {
        Ok(self.tables.lock().expect("repository mutex poisoned").criteria.clone())
    }

    fn evaluations(&self) -> Result<Vec<Evaluation>, RepositoryError> {
        Ok(self.tables.lock().expect("repository mutex poisoned").evaluations.clone())
    }

    fn evaluations_for(&self, employee_id: EmployeeId) -> Result<Vec<Evaluation>, RepositoryError> {
        let tables = self.tables.lock().expect("repository mutex poisoned");
        Ok(tables
            .evaluations
            .iter()
            .filter(|e| e.employee_id == employee_id)
            .cloned()
            .collect())
    }

    fn insert_evaluation(&self, draft: EvaluationDraft) -> Result<Evaluation, RepositoryError> {
        let mut tables = self.tables.lock().expect("repository mutex poisoned");
        let evaluation = Evaluation {
            id: EvaluationId(tables.evaluations.len() as i64 + 1),
            employee_id: draft.employee_id,
            date: draft.date,
            total_score: draft.total_score,
            notes: draft.notes,
            scores: draft.scores,
            kind: draft.kind,
        };
        tables.evaluations.push(evaluation.clone());
        Ok(evaluation)
    }

    fn plans(&self, employee_id: Option<EmployeeId>) -> Result<Vec<WorkPlan>, RepositoryError> {
        let tables = self.tables.lock().expect("repository mutex poisoned");
        Ok(tables
            .plans
            .iter()
            .filter(|plan| employee_id.map_or(true, |id| plan.employee_id == id))
            .cloned()
            .collect())
    }

    fn plan(&self, id: WorkPlanId) -> Result<Option<WorkPlan>, RepositoryError> {
        let tables = self.tables.lock().expect("repository mutex poisoned");
        Ok(tables.plans.iter().find(|plan| plan.id == id).cloned())
    }

    fn insert_plan(&self, draft: WorkPlanDraft) -> Result<WorkPlan, RepositoryError> {
        let mut tables = self.tables.lock().expect("repository mutex poisoned");
        let plan = WorkPlan {
            id: WorkPlanId(tables.plans.len() as i64 + 1),
            employee_id: draft.employee_id,
            title: draft.title,
            plan_type: draft.plan_type,
            target_value: draft.target_value,
            achieved_value: 0.0,
            metric: draft.metric,
            start_date: draft.start_date,
            due_date: draft.due_date,
            status: Default::default(),
        };
        tables.plans.push(plan.clone());
        Ok(plan)
    }

    fn update_plan_progress(
        &self,
        id: WorkPlanId,
        progress: PlanProgress,
    ) -> Result<WorkPlan, RepositoryError> {
        let mut tables = self.tables.lock().expect("repository mutex poisoned");
        let plan = tables
            .plans
            .iter_mut()
            .find(|plan| plan.id == id)
            .ok_or(RepositoryError::NotFound)?;
        plan.achieved_value = progress.achieved_value;
        plan.status = progress.status;
        Ok(plan.clone())
    }
}

pub(super) struct UnavailableRepository;

impl PerformanceRepository for UnavailableRepository {
    fn employees(&self) -> Result<Vec<Employee>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn employee(&self, _id: EmployeeId) -> Result<Option<Employee>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn criteria(&self) -> Result<Vec<Criterion>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn evaluations(&self) -> Result<Vec<Evaluation>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn evaluations_for(&self, _employee_id: EmployeeId) -> Result<Vec<Evaluation>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn insert_evaluation(&self, _draft: EvaluationDraft) -> Result<Evaluation, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn plans(&self, _employee_id: Option<EmployeeId>) -> Result<Vec<WorkPlan>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn plan(&self, _id: WorkPlanId) -> Result<Option<WorkPlan>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn insert_plan(&self, _draft: WorkPlanDraft) -> Result<WorkPlan, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update_plan_progress(
        &self,
        _id: WorkPlanId,
        _progress: PlanProgress,
    ) -> Result<WorkPlan, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) const ALICE: EmployeeId = EmployeeId(1);
pub(super) const BOB: EmployeeId = EmployeeId(2);

pub(super) fn build_service() -> (PerformanceService<MemoryRepository>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::seeded());
    let service = PerformanceService::new(repository.clone(), ScoringPolicy::default());
    (service, repository)
}

pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 30, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn new_plan(employee_id: EmployeeId, title: &str, target_value: f64) -> NewWorkPlan {
    NewWorkPlan {
        employee_id: Some(employee_id),
        title: title.to_string(),
        plan_type: PlanType::Daily,
        target_value,
        metric: "%".to_string(),
        start_date: NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date"),
        due_date: NaiveDate::from_ymd_opt(2025, 6, 8).expect("valid date"),
    }
}

/// Stored plan with progress already applied, for pure scoring tests.
pub(super) fn plan_with(target_value: f64, achieved_value: f64) -> WorkPlan {
    WorkPlan {
        id: WorkPlanId(1),
        employee_id: ALICE,
        title: "Production Achievement".to_string(),
        plan_type: PlanType::Daily,
        target_value,
        achieved_value,
        metric: "%".to_string(),
        start_date: NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date"),
        due_date: NaiveDate::from_ymd_opt(2025, 6, 2).expect("valid date"),
        status: Default::default(),
    }
}

/// Assigns a plan and records progress against it through the service.
pub(super) fn assign_with_progress(
    service: &PerformanceService<MemoryRepository>,
    employee_id: EmployeeId,
    target_value: f64,
    achieved_value: f64,
) -> WorkPlan {
    let plan = service
        .assign_plan(new_plan(employee_id, "Machine Availability", target_value))
        .expect("plan assigned");
    service
        .update_progress(
            plan.id,
            crate::evaluations::domain::PlanProgressUpdate {
                achieved_value,
                status: None,
            },
        )
        .expect("progress recorded")
}

pub(super) fn router_with_service(service: PerformanceService<MemoryRepository>) -> axum::Router {
    performance_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
