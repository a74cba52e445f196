//! HTTP control API for the dashboard simulation.
//!
//! Start/stop/pause/resume/reset the engine, reconfigure the detector
//! mid-run, and read status, chart, and log feeds. The handler functions
//! are synchronous and framework-agnostic; `router` maps them onto axum
//! routes for the `serve` mode.

use std::sync::{Arc, Mutex};

use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use vigil_core::{list_methods, ConfigError, DetectorSettings, Method};

use crate::engine::{ChartData, DashboardEngine, EngineStatus, TickReport};

/// Shared simulation state: one engine behind one lock. The tick task and
/// the request handlers serialize on it, so the core still sees a single
/// reader/writer.
pub struct SimulationState {
    pub engine: DashboardEngine,
    pub tick_interval_ms: u64,
}

pub type SharedState = Arc<Mutex<SimulationState>>;

pub fn create_shared_state(engine: DashboardEngine, tick_interval_ms: u64) -> SharedState {
    Arc::new(Mutex::new(SimulationState {
        engine,
        tick_interval_ms,
    }))
}

// ============================================================================
// Request/response types
// ============================================================================

/// Generic response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}

impl<T> From<ConfigError> for ApiResponse<T> {
    fn from(err: ConfigError) -> Self {
        Self::error(err.to_string())
    }
}

/// Partial reconfiguration; absent fields keep their current values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigureRequest {
    pub method: Option<Method>,
    pub z_threshold: Option<f64>,
    pub mad_threshold: Option<f64>,
    pub contamination: Option<f64>,
    pub window_capacity: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TickParams {
    /// Number of steps to advance; defaults to 1.
    pub steps: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodInfo {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodsResponse {
    pub methods: Vec<MethodInfo>,
}

/// Everything a renderer needs for one refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub status: EngineStatus,
    pub chart: ChartData,
    pub log: Vec<String>,
}

// ============================================================================
// Handlers
// ============================================================================

pub fn handle_start(state: &SharedState) -> ApiResponse<EngineStatus> {
    let mut state = state.lock().unwrap();
    state.engine.start();
    ApiResponse::success(state.engine.status())
}

pub fn handle_stop(state: &SharedState) -> ApiResponse<EngineStatus> {
    let mut state = state.lock().unwrap();
    state.engine.stop();
    ApiResponse::success(state.engine.status())
}

pub fn handle_pause(state: &SharedState) -> ApiResponse<EngineStatus> {
    let mut state = state.lock().unwrap();
    state.engine.pause();
    ApiResponse::success(state.engine.status())
}

pub fn handle_resume(state: &SharedState) -> ApiResponse<EngineStatus> {
    let mut state = state.lock().unwrap();
    state.engine.resume();
    ApiResponse::success(state.engine.status())
}

pub fn handle_reset(state: &SharedState) -> ApiResponse<EngineStatus> {
    let mut state = state.lock().unwrap();
    state.engine.reset();
    ApiResponse::success(state.engine.status())
}

/// Apply a partial reconfiguration. Detector settings are validated as a
/// whole before anything is applied, so a bad request changes nothing.
pub fn handle_configure(
    state: &SharedState,
    request: ConfigureRequest,
) -> ApiResponse<EngineStatus> {
    let mut state = state.lock().unwrap();

    let current = *state.engine.settings();
    let settings = DetectorSettings {
        method: request.method.unwrap_or(current.method),
        z_threshold: request.z_threshold.unwrap_or(current.z_threshold),
        mad_threshold: request.mad_threshold.unwrap_or(current.mad_threshold),
        contamination: request.contamination.unwrap_or(current.contamination),
    };
    if let Err(err) = settings.validate() {
        return err.into();
    }
    if let Some(capacity) = request.window_capacity {
        if let Err(err) = state.engine.set_window_capacity(capacity) {
            return err.into();
        }
    }
    if let Err(err) = state.engine.set_settings(settings) {
        return err.into();
    }

    ApiResponse::success(state.engine.status())
}

/// Manually advance the simulation; useful for debugging and deterministic
/// clients that drive the tick themselves.
pub fn handle_tick(state: &SharedState, params: TickParams) -> ApiResponse<Vec<TickReport>> {
    let mut state = state.lock().unwrap();
    let steps = params.steps.unwrap_or(1).clamp(1, 10_000);
    let reports: Vec<TickReport> = (0..steps).filter_map(|_| state.engine.tick()).collect();
    ApiResponse::success(reports)
}

pub fn handle_status(state: &SharedState) -> ApiResponse<EngineStatus> {
    let state = state.lock().unwrap();
    ApiResponse::success(state.engine.status())
}

pub fn handle_dashboard(state: &SharedState) -> ApiResponse<DashboardSnapshot> {
    let state = state.lock().unwrap();
    ApiResponse::success(DashboardSnapshot {
        status: state.engine.status(),
        chart: state.engine.chart(),
        log: state.engine.log().to_vec(),
    })
}

pub fn handle_list_methods() -> ApiResponse<MethodsResponse> {
    let methods = list_methods()
        .into_iter()
        .map(|(name, description)| MethodInfo {
            name: name.to_string(),
            description: description.to_string(),
        })
        .collect();
    ApiResponse::success(MethodsResponse { methods })
}

// ============================================================================
// Axum wiring
// ============================================================================

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/methods", get(methods))
        .route("/status", get(status))
        .route("/dashboard", get(dashboard))
        .route("/start", post(start))
        .route("/stop", post(stop))
        .route("/pause", post(pause))
        .route("/resume", post(resume))
        .route("/reset", post(reset))
        .route("/configure", post(configure))
        .route("/tick", post(tick))
        .with_state(state)
}

async fn methods() -> Json<ApiResponse<MethodsResponse>> {
    Json(handle_list_methods())
}

async fn status(State(state): State<SharedState>) -> Json<ApiResponse<EngineStatus>> {
    Json(handle_status(&state))
}

async fn dashboard(State(state): State<SharedState>) -> Json<ApiResponse<DashboardSnapshot>> {
    Json(handle_dashboard(&state))
}

async fn start(State(state): State<SharedState>) -> Json<ApiResponse<EngineStatus>> {
    Json(handle_start(&state))
}

async fn stop(State(state): State<SharedState>) -> Json<ApiResponse<EngineStatus>> {
    Json(handle_stop(&state))
}

async fn pause(State(state): State<SharedState>) -> Json<ApiResponse<EngineStatus>> {
    Json(handle_pause(&state))
}

async fn resume(State(state): State<SharedState>) -> Json<ApiResponse<EngineStatus>> {
    Json(handle_resume(&state))
}

async fn reset(State(state): State<SharedState>) -> Json<ApiResponse<EngineStatus>> {
    Json(handle_reset(&state))
}

async fn configure(
    State(state): State<SharedState>,
    Json(request): Json<ConfigureRequest>,
) -> Json<ApiResponse<EngineStatus>> {
    Json(handle_configure(&state, request))
}

async fn tick(
    State(state): State<SharedState>,
    Query(params): Query<TickParams>,
) -> Json<ApiResponse<Vec<TickReport>>> {
    Json(handle_tick(&state, params))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EngineState;
    use crate::generator::GeneratorConfig;

    fn test_state() -> SharedState {
        let engine = DashboardEngine::new(
            5,
            DetectorSettings::default(),
            GeneratorConfig::default(),
        )
        .unwrap();
        create_shared_state(engine, 100)
    }

    #[test]
    fn start_stop_cycle() {
        let state = test_state();

        let response = handle_start(&state);
        assert!(response.success);
        assert_eq!(response.data.unwrap().state, EngineState::Running);

        let response = handle_stop(&state);
        assert!(response.success);
        assert_eq!(response.data.unwrap().state, EngineState::Stopped);
    }

    #[test]
    fn tick_advances_only_when_running() {
        let state = test_state();

        let response = handle_tick(&state, TickParams { steps: Some(5) });
        assert!(response.success);
        assert!(response.data.unwrap().is_empty(), "stopped engine ignores ticks");

        handle_start(&state);
        let response = handle_tick(&state, TickParams { steps: Some(5) });
        assert_eq!(response.data.unwrap().len(), 5);
    }

    #[test]
    fn configure_switches_method_and_capacity() {
        let state = test_state();

        let response = handle_configure(
            &state,
            ConfigureRequest {
                method: Some(Method::IsolationForest),
                contamination: Some(0.2),
                window_capacity: Some(30),
                ..ConfigureRequest::default()
            },
        );
        assert!(response.success);
        let status = response.data.unwrap();
        assert_eq!(status.settings.method, Method::IsolationForest);
        assert_eq!(status.settings.contamination, 0.2);
        assert_eq!(status.window_capacity, 30);
    }

    #[test]
    fn configure_rejects_invalid_parameters_without_applying() {
        let state = test_state();

        let response = handle_configure(
            &state,
            ConfigureRequest {
                method: Some(Method::Mad),
                mad_threshold: Some(-1.0),
                ..ConfigureRequest::default()
            },
        );
        assert!(!response.success);
        assert!(response.error.unwrap().contains("threshold"));

        let status = handle_status(&state).data.unwrap();
        assert_eq!(status.settings.method, Method::ZScore, "nothing applied");
    }

    #[test]
    fn configure_rejects_zero_capacity() {
        let state = test_state();
        let response = handle_configure(
            &state,
            ConfigureRequest {
                window_capacity: Some(0),
                ..ConfigureRequest::default()
            },
        );
        assert!(!response.success);
    }

    #[test]
    fn reset_clears_dashboard_feed() {
        let state = test_state();
        handle_start(&state);
        handle_tick(&state, TickParams { steps: Some(20) });

        let snapshot = handle_dashboard(&state).data.unwrap();
        assert_eq!(snapshot.chart.values.len(), 20);

        handle_reset(&state);
        let snapshot = handle_dashboard(&state).data.unwrap();
        assert!(snapshot.chart.values.is_empty());
        assert!(snapshot.chart.anomalies.is_empty());
        assert!(snapshot.log.is_empty());
        assert_eq!(snapshot.status.state, EngineState::Stopped);
    }

    #[test]
    fn methods_listing_contains_all_variants() {
        let response = handle_list_methods();
        let methods = response.data.unwrap().methods;
        assert_eq!(methods.len(), 3);
        assert!(methods.iter().any(|m| m.name == "isolation_forest"));
    }
}
