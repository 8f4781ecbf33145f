use std::time::Instant;

use axum::{
    Router,
    extract::{Json, State, rejection::JsonRejection},
    http::StatusCode,
    response::{Html, Response},
    routing::{get, post},
};
use chrono::Utc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::AppState;
use crate::api::models::AnalyzeRequest;
use crate::api::response::{self, ApiResponse};
use crate::error::{AppError, Result};
use crate::report::Report;

const INDEX_HTML: &str = include_str!("../../static/index.html");

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/api/analyze", post(analyze_handler))
        .route("/api/analyze/csv", post(export_csv_handler))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(app_state)
}

async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn health_handler() -> &'static str {
    "ok"
}

async fn analyze_handler(
    State(state): State<AppState>,
    body: std::result::Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<Report>>)> {
    let Json(req) = body?;
    let report = build_report(&state, &req).await?;
    Ok(response::success(report))
}

async fn export_csv_handler(
    State(state): State<AppState>,
    body: std::result::Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Response> {
    let Json(req) = body?;
    let report = build_report(&state, &req).await?;
    let host = url::Url::parse(&report.fetch.final_url)
        .ok()
        .and_then(|url| url.host_str().map(str::to_string))
        .unwrap_or_else(|| "page".to_string());
    let file_name = format!(
        "seo_report_{}_{}.csv",
        host.replace('.', "_"),
        Utc::now().format("%Y%m%d_%H%M%S")
    );

    Ok(response::csv_attachment(&file_name, report.to_csv()?))
}

async fn build_report(state: &AppState, req: &AnalyzeRequest) -> Result<Report> {
    info!(url = %req.url, "analysis requested");
    let started = Instant::now();

    // Overall deadline for the handler, on top of the client's fetch timeout.
    let outcome = tokio::time::timeout(state.config.request_timeout, state.analyzer.analyze(&req.url))
        .await
        .unwrap_or(Err(AppError::Timeout));

    let elapsed_ms = started.elapsed().as_millis() as u64;
    match outcome {
        Ok(analysis) => {
            let top_n = state.analyzer.options().resolve_top_n(req.top_n);
            info!(url = %req.url, elapsed_ms, top_n, "analysis complete");
            Ok(Report::new(&analysis, top_n))
        }
        Err(err) => {
            warn!(url = %req.url, elapsed_ms, status = err.status_code().as_u16(), error = %err, "analysis failed");
            Err(err)
        }
    }
}
