use std::sync::Arc;

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use chrono::{Local, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;

use super::domain::{
    EmployeeId, EvaluationSubmission, NewWorkPlan, PlanProgressUpdate, WorkPlanId,
};
use super::repository::PerformanceRepository;
use super::seed::KPI_CATALOG;
use super::service::{PerformanceService, PerformanceServiceError};

/// Router builder exposing the performance API.
pub fn performance_router<R>(service: Arc<PerformanceService<R>>) -> Router
where
    R: PerformanceRepository + 'static,
{
    Router::new()
        .route("/api/login", post(login_handler::<R>))
        .route("/api/employees", get(employees_handler::<R>))
        .route("/api/employees/:id", get(employee_handler::<R>))
        .route("/api/criteria", get(criteria_handler::<R>))
        .route(
            "/api/evaluations",
            get(evaluations_handler::<R>).post(record_evaluation_handler::<R>),
        )
        .route(
            "/api/evaluations/:employee_id",
            get(employee_evaluations_handler::<R>),
        )
        .route(
            "/api/plans",
            get(plans_handler::<R>).post(assign_plan_handler::<R>),
        )
        .route("/api/plans/summary", get(plan_summary_handler::<R>))
        .route("/api/plans/:id", put(update_progress_handler::<R>))
        .route("/api/kpis", get(kpi_catalog_handler))
        .route("/api/auto-evaluate", post(auto_evaluate_handler::<R>))
        .route("/api/overview", get(overview_handler::<R>))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginRequest {
    #[serde(default)]
    pub(crate) name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AutoEvaluateRequest {
    #[serde(default)]
    pub(crate) employee_id: Option<EmployeeId>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct PlanQuery {
    #[serde(default)]
    pub(crate) employee_id: Option<i64>,
}

fn success<T: Serialize>(data: T) -> Response {
    (StatusCode::OK, Json(json!({ "message": "success", "data": data }))).into_response()
}

fn failure(err: PerformanceServiceError) -> Response {
    let status = match &err {
        PerformanceServiceError::Validation(_)
        | PerformanceServiceError::NoWorkPlans(_)
        | PerformanceServiceError::Scoring(_) => StatusCode::BAD_REQUEST,
        PerformanceServiceError::UnknownLogin => StatusCode::UNAUTHORIZED,
        PerformanceServiceError::EmployeeNotFound(_) | PerformanceServiceError::PlanNotFound(_) => {
            StatusCode::NOT_FOUND
        }
        PerformanceServiceError::Repository(_) => {
            error!(error = %err, "performance store failure");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    (status, Json(json!({ "error": err.to_string() }))).into_response()
}

trait Rejection {
    fn detail(&self) -> String;
}

impl Rejection for JsonRejection {
    fn detail(&self) -> String {
        self.body_text()
    }
}

impl Rejection for PathRejection {
    fn detail(&self) -> String {
        self.body_text()
    }
}

impl Rejection for QueryRejection {
    fn detail(&self) -> String {
        self.body_text()
    }
}

/// Malformed bodies, ids and query strings are reported like any other
/// validation failure.
fn accept<T, E: Rejection>(extracted: Result<T, E>) -> Result<T, PerformanceServiceError> {
    extracted.map_err(|rejection| PerformanceServiceError::Validation(rejection.detail()))
}

fn respond<T: Serialize>(result: Result<T, PerformanceServiceError>) -> Response {
    match result {
        Ok(data) => success(data),
        Err(err) => failure(err),
    }
}

pub(crate) async fn login_handler<R>(
    State(service): State<Arc<PerformanceService<R>>>,
    request: Result<Json<LoginRequest>, JsonRejection>,
) -> Response
where
    R: PerformanceRepository + 'static,
{
    respond(
        accept(request)
            .and_then(|Json(request)| service.login(request.name.as_deref().unwrap_or_default())),
    )
}

pub(crate) async fn employees_handler<R>(
    State(service): State<Arc<PerformanceService<R>>>,
) -> Response
where
    R: PerformanceRepository + 'static,
{
    respond(service.employees())
}

pub(crate) async fn employee_handler<R>(
    State(service): State<Arc<PerformanceService<R>>>,
    id: Result<Path<i64>, PathRejection>,
) -> Response
where
    R: PerformanceRepository + 'static,
{
    respond(accept(id).and_then(|Path(id)| service.employee(EmployeeId(id))))
}

pub(crate) async fn criteria_handler<R>(
    State(service): State<Arc<PerformanceService<R>>>,
) -> Response
where
    R: PerformanceRepository + 'static,
{
    respond(service.criteria())
}

pub(crate) async fn evaluations_handler<R>(
    State(service): State<Arc<PerformanceService<R>>>,
) -> Response
where
    R: PerformanceRepository + 'static,
{
    respond(service.evaluations())
}

pub(crate) async fn employee_evaluations_handler<R>(
    State(service): State<Arc<PerformanceService<R>>>,
    employee_id: Result<Path<i64>, PathRejection>,
) -> Response
where
    R: PerformanceRepository + 'static,
{
    respond(
        accept(employee_id)
            .and_then(|Path(employee_id)| service.evaluations_for(EmployeeId(employee_id))),
    )
}

pub(crate) async fn record_evaluation_handler<R>(
    State(service): State<Arc<PerformanceService<R>>>,
    submission: Result<Json<EvaluationSubmission>, JsonRejection>,
) -> Response
where
    R: PerformanceRepository + 'static,
{
    let recorded = accept(submission)
        .and_then(|Json(submission)| service.record_evaluation(submission, Utc::now()));
    match recorded {
        Ok(evaluation) => {
            let id = evaluation.id;
            let payload = json!({ "message": "success", "data": evaluation, "id": id });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(err) => failure(err),
    }
}

pub(crate) async fn plans_handler<R>(
    State(service): State<Arc<PerformanceService<R>>>,
    query: Result<Query<PlanQuery>, QueryRejection>,
) -> Response
where
    R: PerformanceRepository + 'static,
{
    respond(
        accept(query).and_then(|Query(query)| service.plans(query.employee_id.map(EmployeeId))),
    )
}

pub(crate) async fn assign_plan_handler<R>(
    State(service): State<Arc<PerformanceService<R>>>,
    plan: Result<Json<NewWorkPlan>, JsonRejection>,
) -> Response
where
    R: PerformanceRepository + 'static,
{
    respond(accept(plan).and_then(|Json(plan)| service.assign_plan(plan)))
}

pub(crate) async fn update_progress_handler<R>(
    State(service): State<Arc<PerformanceService<R>>>,
    id: Result<Path<i64>, PathRejection>,
    update: Result<Json<PlanProgressUpdate>, JsonRejection>,
) -> Response
where
    R: PerformanceRepository + 'static,
{
    respond(accept(id).and_then(|Path(id)| {
        let Json(update) = accept(update)?;
        service.update_progress(WorkPlanId(id), update)
    }))
}

pub(crate) async fn plan_summary_handler<R>(
    State(service): State<Arc<PerformanceService<R>>>,
    query: Result<Query<PlanQuery>, QueryRejection>,
) -> Response
where
    R: PerformanceRepository + 'static,
{
    respond(accept(query).and_then(|Query(query)| match query.employee_id {
        Some(id) => service.plan_summary(EmployeeId(id)),
        None => Err(PerformanceServiceError::Validation(
            "employee_id is required".to_string(),
        )),
    }))
}

pub(crate) async fn kpi_catalog_handler() -> Response {
    success(KPI_CATALOG)
}

pub(crate) async fn auto_evaluate_handler<R>(
    State(service): State<Arc<PerformanceService<R>>>,
    request: Result<Json<AutoEvaluateRequest>, JsonRejection>,
) -> Response
where
    R: PerformanceRepository + 'static,
{
    respond(
        accept(request)
            .and_then(|Json(request)| service.auto_evaluate(request.employee_id, Utc::now())),
    )
}

pub(crate) async fn overview_handler<R>(
    State(service): State<Arc<PerformanceService<R>>>,
) -> Response
where
    R: PerformanceRepository + 'static,
{
    respond(service.overview(Local::now().date_naive()))
}
