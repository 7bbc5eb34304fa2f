// HTTP request handlers
use crate::domain::chart::ChartBounds;
use crate::domain::measurement::MeasurementForm;
use crate::infrastructure::http_response::{accepts_brotli, json_response, svg_response};
use crate::infrastructure::json_mapper::dashboard_to_view;
use crate::infrastructure::svg_chart::render_svg;
use crate::presentation::app_state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Deserializer};
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Entry form fields; omitted fields fall back to the form's prefilled values
/// and an explicit `null` counts as a blank field.
#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    #[serde(default, deserialize_with = "present")]
    pub sbp: Option<Option<FormField>>,
    #[serde(default, deserialize_with = "present")]
    pub dbp: Option<Option<FormField>>,
    #[serde(default, deserialize_with = "present")]
    pub hr: Option<Option<FormField>>,
    pub timestamp: Option<String>,
}

/// A form value sent either as typed text or as a JSON number
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum FormField {
    Text(String),
    Number(serde_json::Number),
}

impl FormField {
    fn into_text(self) -> String {
        match self {
            FormField::Text(text) => text,
            FormField::Number(number) => number.to_string(),
        }
    }
}

fn present<'de, D>(deserializer: D) -> Result<Option<Option<FormField>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<FormField>::deserialize(deserializer).map(Some)
}

fn field_text(field: Option<Option<FormField>>, default: String) -> String {
    match field {
        None => default,
        Some(None) => String::new(),
        Some(Some(value)) => value.into_text(),
    }
}

#[derive(Debug, Deserialize)]
pub struct ChartQuery {
    pub width: Option<f64>,
    pub height: Option<f64>,
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/dashboard", get(get_dashboard))
        .route("/dashboard/refresh", post(refresh_dashboard))
        .route("/measurements", post(submit_measurement))
        .route("/chart.svg", get(chart_svg))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Current dashboard without contacting the store
pub async fn get_dashboard(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    dashboard_response(&state, accepts_brotli(&headers)).await
}

/// Re-fetch measurements, then return the dashboard
pub async fn refresh_dashboard(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    state.dashboard_service.refresh().await;
    dashboard_response(&state, accepts_brotli(&headers)).await
}

/// Submit a new reading from the entry form
pub async fn submit_measurement(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SubmitRequest>, JsonRejection>,
) -> Response {
    let compress = accepts_brotli(&headers);
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::warn!("Rejected measurement body: {}", rejection.body_text());
            let message = format!("Invalid input: {}", rejection.body_text());
            return error_response(rejection.status(), &message, compress).await;
        }
    };

    let defaults = MeasurementForm::default();
    let form = MeasurementForm {
        sbp: field_text(request.sbp, defaults.sbp),
        dbp: field_text(request.dbp, defaults.dbp),
        hr: field_text(request.hr, defaults.hr),
    };

    match state.dashboard_service.submit(&form, request.timestamp).await {
        Ok(()) => dashboard_response(&state, compress).await,
        Err(e) => error_response(StatusCode::UNPROCESSABLE_ENTITY, &e.to_string(), compress).await,
    }
}

/// Chart of the current window, optionally resized
pub async fn chart_svg(
    Query(query): Query<ChartQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    let defaults = state.dashboard_service.settings().chart;
    let bounds = ChartBounds::new(
        query.width.unwrap_or(defaults.width),
        query.height.unwrap_or(defaults.height),
        defaults.inset,
    );
    if !bounds.is_drawable() {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Invalid input: width and height must be finite and positive",
            accepts_brotli(&headers),
        )
        .await;
    }

    let snapshot = state.dashboard_service.snapshot_with_bounds(bounds).await;
    let svg = render_svg(snapshot.chart.as_ref(), bounds);

    match svg_response(svg, accepts_brotli(&headers)).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

async fn error_response(status: StatusCode, message: &str, compress: bool) -> Response {
    let body = json!({ "error": message });
    match json_response(status, &body, compress).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

async fn dashboard_response(state: &AppState, compress: bool) -> Response {
    let view = dashboard_to_view(state.dashboard_service.snapshot().await);
    match json_response(StatusCode::OK, &view, compress).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}
