//! HTTP routes.
//!
//! | Route                 | Response                                    |
//! |-----------------------|---------------------------------------------|
//! | `GET /`               | form + chart for the query (or defaults)    |
//! | `POST /`              | form + chart for the submitted form         |
//! | `GET /chart.svg`      | the chart alone, `image/svg+xml`            |
//! | `GET /api/languages`  | `[{code, name}]` sorted by name             |
//! | `GET /api/chart-data` | sampled series as JSON                      |
//! | `GET /health`         | uptime and dataset sizes                    |

use crate::error::{ApiError, log_request_error, status_for};
use crate::page::{render_error_page, render_page};
use crate::state::{ServerState, SharedStats, format_uptime};
use axum::extract::{Form, Query, State};
use axum::http::header;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use movie_stats::{ChartData, ChartRequest, LanguageEntry, MovieStatsError};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Chart selection as submitted by the form or a query string.
///
/// Every field is optional; missing fields take the request defaults.
#[derive(Deserialize, Debug, Default)]
pub struct ChartForm {
    pub language: Option<String>,
    pub secondary: Option<String>,
    pub color1: Option<String>,
    pub color2: Option<String>,
}

impl ChartForm {
    pub fn to_request(&self) -> Result<ChartRequest, MovieStatsError> {
        ChartRequest::from_form(
            self.language.as_deref(),
            self.secondary.as_deref(),
            self.color1.as_deref(),
            self.color2.as_deref(),
        )
    }
}

#[derive(Serialize)]
struct HealthResponse {
    uptime: String,
    movies: usize,
    aggregate_rows: usize,
    languages: usize,
    preparation_ms: u64,
}

/// Resolve the language name and render the chart of a request.
fn render_request(
    stats: &SharedStats,
    request: &ChartRequest,
) -> Result<(String, String), MovieStatsError> {
    let code = stats.catalog().resolve(&request.language)?;
    let name = stats.catalog().name(code).unwrap_or(code).to_string();
    let svg = stats.render(request)?;
    Ok((name, svg))
}

fn respond_page(stats: &SharedStats, form: &ChartForm) -> Response {
    debug!("Chart page request: {:?}", form);

    let result = form
        .to_request()
        .and_then(|request| render_request(stats, &request).map(|out| (request, out)));

    match result {
        Ok((request, (name, svg))) => Html(render_page(stats, &request, &name, &svg)).into_response(),
        Err(err) => {
            log_request_error(&err);
            // Unparseable metric or colors fall back to defaults in the form.
            let request = form.to_request().unwrap_or_default();
            (
                status_for(&err),
                Html(render_error_page(stats, &request, &err.to_string())),
            )
                .into_response()
        }
    }
}

async fn index(State(stats): State<SharedStats>, Query(form): Query<ChartForm>) -> Response {
    respond_page(&stats, &form)
}

async fn submit(State(stats): State<SharedStats>, Form(form): Form<ChartForm>) -> Response {
    respond_page(&stats, &form)
}

async fn chart_svg(
    State(stats): State<SharedStats>,
    Query(form): Query<ChartForm>,
) -> Result<Response, ApiError> {
    let request = form.to_request()?;
    let svg = stats.render(&request)?;
    Ok(([(header::CONTENT_TYPE, "image/svg+xml")], svg).into_response())
}

async fn languages(State(stats): State<SharedStats>) -> Json<Vec<LanguageEntry>> {
    Json(stats.catalog().entries())
}

async fn chart_data(
    State(stats): State<SharedStats>,
    Query(form): Query<ChartForm>,
) -> Result<Json<ChartData>, ApiError> {
    let request = form.to_request()?;
    Ok(Json(stats.get_chart_data(&request.language, request.metric)?))
}

async fn health(State(state): State<ServerState>) -> Json<HealthResponse> {
    let summary = state.stats.summary();
    Json(HealthResponse {
        uptime: format_uptime(state.uptime()),
        movies: summary.cleaning.rows_after,
        aggregate_rows: summary.aggregate_rows,
        languages: summary.languages_catalogued,
        preparation_ms: summary.duration_ms,
    })
}

pub fn make_app(state: ServerState) -> Router {
    Router::new()
        .route("/", get(index).post(submit))
        .route("/chart.svg", get(chart_svg))
        .route("/api/languages", get(languages))
        .route("/api/chart-data", get(chart_data))
        .route("/health", get(health))
        .with_state(state)
}
