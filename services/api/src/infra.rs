use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use perf_eval::evaluations::{
    seed, Criterion, Employee, EmployeeId, Evaluation, EvaluationDraft, EvaluationId,
    PerformanceRepository, PlanProgress, PlanStatus, RepositoryError, WorkPlan, WorkPlanDraft,
    WorkPlanId,
};
use std::collections::BTreeMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default)]
struct Tables {
    employees: BTreeMap<EmployeeId, Employee>,
    criteria: Vec<Criterion>,
    evaluations: BTreeMap<EvaluationId, Evaluation>,
    plans: BTreeMap<WorkPlanId, WorkPlan>,
}

/// Process-local store. Records are keyed by id so listings come back in
/// insertion order.
#[derive(Default, Clone)]
pub(crate) struct InMemoryPerformanceStore {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryPerformanceStore {
    /// Rubric criteria are always loaded; the demo roster only on request.
    pub(crate) fn with_reference_data(seed_demo_roster: bool) -> Self {
        let employees = if seed_demo_roster {
            seed::roster()
                .into_iter()
                .map(|employee| (employee.id, employee))
                .collect()
        } else {
            BTreeMap::new()
        };

        Self {
            tables: Arc::new(Mutex::new(Tables {
                employees,
                criteria: seed::criteria(),
                ..Tables::default()
            })),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, RepositoryError> {
        self.tables
            .lock()
            .map_err(|_| RepositoryError::Unavailable("store mutex poisoned".to_string()))
    }
}

impl PerformanceRepository for InMemoryPerformanceStore {
    fn employees(&self) -> Result<Vec<Employee>, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard.employees.values().cloned().collect())
    }

    fn employee(&self, id: EmployeeId) -> Result<Option<Employee>, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard.employees.get(&id).cloned())
    }

    fn criteria(&self) -> Result<Vec<Criterion>, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard.criteria.clone())
    }

    fn evaluations(&self) -> Result<Vec<Evaluation>, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard.evaluations.values().cloned().collect())
    }

    fn evaluations_for(&self, employee_id: EmployeeId) -> Result<Vec<Evaluation>, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard
            .evaluations
            .values()
            .filter(|evaluation| evaluation.employee_id == employee_id)
            .cloned()
            .collect())
    }

    fn insert_evaluation(&self, draft: EvaluationDraft) -> Result<Evaluation, RepositoryError> {
        let mut guard = self.lock()?;
        let id = EvaluationId(guard.evaluations.keys().next_back().map_or(1, |last| last.0 + 1));
        let evaluation = Evaluation {
            id,
            employee_id: draft.employee_id,
            date: draft.date,
            total_score: draft.total_score,
            notes: draft.notes,
            scores: draft.scores,
            kind: draft.kind,
        };
        guard.evaluations.insert(id, evaluation.clone());
        Ok(evaluation)
    }

    fn plans(&self, employee_id: Option<EmployeeId>) -> Result<Vec<WorkPlan>, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard
            .plans
            .values()
            .filter(|plan| employee_id.map_or(true, |id| plan.employee_id == id))
            .cloned()
            .collect())
    }

    fn plan(&self, id: WorkPlanId) -> Result<Option<WorkPlan>, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard.plans.get(&id).cloned())
    }

    fn insert_plan(&self, draft: WorkPlanDraft) -> Result<WorkPlan, RepositoryError> {
        let mut guard = self.lock()?;
        let id = WorkPlanId(guard.plans.keys().next_back().map_or(1, |last| last.0 + 1));
        let plan = WorkPlan {
            id,
            employee_id: draft.employee_id,
            title: draft.title,
            plan_type: draft.plan_type,
            target_value: draft.target_value,
            achieved_value: 0.0,
            metric: draft.metric,
            start_date: draft.start_date,
            due_date: draft.due_date,
            status: PlanStatus::Pending,
        };
        guard.plans.insert(id, plan.clone());
        Ok(plan)
    }

    fn update_plan_progress(
        &self,
        id: WorkPlanId,
        progress: PlanProgress,
    ) -> Result<WorkPlan, RepositoryError> {
        let mut guard = self.lock()?;
        let plan = guard.plans.get_mut(&id).ok_or(RepositoryError::NotFound)?;
        plan.achieved_value = progress.achieved_value;
        plan.status = progress.status;
        Ok(plan.clone())
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
