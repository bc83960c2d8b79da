use crate::{
    config::Config,
    error::AppError,
    planner::{
        calculator::calculate,
        coefficients::CoefficientTable,
        ds::{PlanResult, RawPlanRequest, ScheduleRequest, WateringSchedule},
        schedule::watering_schedule,
    },
    store::{PlanId, PlanStore, SavedPlan},
    time::TimeProvider,
    utils::display_time,
};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::sync::watch;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, warn};

pub const INTERNAL_ERROR_MSG: &str = "An internal server error occurred.";

pub struct AppState<S: PlanStore, T: TimeProvider> {
    pub coefficients: Arc<CoefficientTable>,
    pub store: Arc<S>,
    pub time_provider: Arc<T>,
    pub cfg: Config,
}

impl<S: PlanStore, T: TimeProvider> AppState<S, T> {
    pub fn new(coefficients: Arc<CoefficientTable>, store: Arc<S>, time_provider: Arc<T>, cfg: Config) -> Arc<Self> {
        Arc::new(AppState { coefficients, store, time_provider, cfg })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, msg) = match self {
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFoundError(id) => {
                (StatusCode::NOT_FOUND, format!("No plan found for id '{}'. The link is invalid or expired.", id))
            }
            e => {
                error!(error = %e, "Request failed.");
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MSG.to_owned())
            }
        };
        (status, Json(ErrorResponse { error: msg })).into_response()
    }
}

fn bad_body(rejection: JsonRejection) -> AppError {
    AppError::ValidationError(format!("Invalid request body: {}", rejection.body_text()))
}

pub async fn health() -> &'static str {
    "Agri-Architect backend is running. POST /api/calculate to compute a plan."
}

pub async fn calculate_plan<S, T>(
    State(app_state): State<Arc<AppState<S, T>>>, body: Result<Json<RawPlanRequest>, JsonRejection>,
) -> Result<Json<PlanResult>, AppError>
where
    S: PlanStore + 'static,
    T: TimeProvider + 'static,
{
    let Json(raw) = body.map_err(bad_body)?;
    match calculate(&raw, &app_state.coefficients) {
        Ok(result) => Ok(Json(result)),
        Err(e) => {
            warn!(error = %e, request = ?raw, "Calculation rejected.");
            Err(e)
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct SavePlanRequest {
    pub form_data: Option<Value>,
    pub results: Option<Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SavePlanResponse {
    pub plan_id: PlanId,
}

fn present(value: Option<Value>, field: &str) -> Result<Value, AppError> {
    match value {
        Some(Value::Null) | None => Err(AppError::missing_field(field)),
        Some(value) => Ok(value),
    }
}

pub async fn save_plan<S, T>(
    State(app_state): State<Arc<AppState<S, T>>>, body: Result<Json<SavePlanRequest>, JsonRejection>,
) -> Result<Json<SavePlanResponse>, AppError>
where
    S: PlanStore + 'static,
    T: TimeProvider + 'static,
{
    let Json(req) = body.map_err(bad_body)?;
    let form_data = present(req.form_data, "formData")?;
    let results = present(req.results, "results")?;

    let created_at = app_state.time_provider.now_utc()?;
    let plan_id = app_state.store.save(form_data, results, created_at).await?;
    info!(plan_id = %plan_id, "Plan saved at {}.", display_time(created_at));
    Ok(Json(SavePlanResponse { plan_id }))
}

pub async fn get_plan<S, T>(
    State(app_state): State<Arc<AppState<S, T>>>, Path(id): Path<String>,
) -> Result<Json<SavedPlan>, AppError>
where
    S: PlanStore + 'static,
    T: TimeProvider + 'static,
{
    let plan = app_state.store.get(&PlanId::from(id)).await?;
    Ok(Json(plan))
}

pub async fn get_watering_schedule<S, T>(
    State(app_state): State<Arc<AppState<S, T>>>, body: Result<Json<ScheduleRequest>, JsonRejection>,
) -> Result<Json<WateringSchedule>, AppError>
where
    S: PlanStore + 'static,
    T: TimeProvider + 'static,
{
    let Json(req) = body.map_err(bad_body)?;
    let today = app_state.time_provider.today()?;
    let schedule = watering_schedule(&req, &app_state.coefficients, app_state.cfg.schedule, today)?;
    Ok(Json(schedule))
}

pub fn router<S, T>(app_state: Arc<AppState<S, T>>) -> Router
where
    S: PlanStore + 'static,
    T: TimeProvider + 'static,
{
    Router::new()
        .route("/", get(health))
        .route("/api/calculate", post(calculate_plan::<S, T>))
        .route("/api/save-plan", post(save_plan::<S, T>))
        .route("/api/plan/:id", get(get_plan::<S, T>))
        .route("/api/watering-schedule", post(get_watering_schedule::<S, T>))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

/// Serves until `shutdown_rx` turns `true`
pub async fn run_web_server<S, T>(
    app_state: Arc<AppState<S, T>>, addr: SocketAddr, mut shutdown_rx: watch::Receiver<bool>,
) -> Result<(), AppError>
where
    S: PlanStore + 'static,
    T: TimeProvider + 'static,
{
    let handle = axum_server::Handle::new();
    let shutdown_handle = handle.clone();
    tokio::spawn(async move {
        while shutdown_rx.changed().await.is_ok() {
            if *shutdown_rx.borrow() {
                break;
            }
        }
        info!("Shutting down HTTP server.");
        shutdown_handle.graceful_shutdown(Some(Duration::from_secs(5)));
    });

    info!("Starting HTTP server on http://{}", addr);
    axum_server::bind(addr).handle(handle).serve(router(app_state).into_make_service()).await?;
    Ok(())
}
