//! Stateless render/validate endpoint for live preview

use axum::Json;

use crate::models::{PreviewRequest, PreviewResponse};

/// Render a body against an answer map and report completeness. Pure and
/// persistence-free, so it can run on every preview refresh.
pub async fn preview(Json(req): Json<PreviewRequest>) -> Json<PreviewResponse> {
    let report = template_engine::validate(&req.body, &req.answers);
    Json(PreviewResponse {
        rendered: template_engine::render(&req.body, &req.answers),
        complete: report.complete,
        missing: report.missing,
    })
}
