//! Axum route handlers for the Reports API.

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{ApiJson, AppError};
use crate::models::report::Report;
use crate::reports::pagination::PageRequest;
use crate::reports::store::ReportFilter;
use crate::reports::validation::CreateReportRequest;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// Query string for listing. Kept as raw strings so that coercion rules live in one place.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListReportsQuery {
    pub competency: Option<String>,
    pub store_category: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreatedId {
    pub id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct CreateReportResponse {
    pub success: bool,
    pub message: String,
    pub data: CreatedId,
}

#[derive(Debug, Serialize)]
pub struct Pagination {
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub pages: u64,
}

#[derive(Debug, Serialize)]
pub struct ListReportsResponse {
    pub success: bool,
    pub data: Vec<Report>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize)]
pub struct ReportResponse {
    pub success: bool,
    pub data: Report,
}

#[derive(Debug, Serialize)]
pub struct DeleteReportResponse {
    pub success: bool,
    pub message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/reports
pub async fn handle_create_report(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateReportRequest>,
) -> Result<(StatusCode, Json<CreateReportResponse>), AppError> {
    let id = state.store.create(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateReportResponse {
            success: true,
            message: "Report saved".to_string(),
            data: CreatedId { id },
        }),
    ))
}

/// GET /api/reports?competency=&storeCategory=&page=&limit=
pub async fn handle_list_reports(
    State(state): State<AppState>,
    Query(query): Query<ListReportsQuery>,
) -> Result<Json<ListReportsResponse>, AppError> {
    let filter =
        ReportFilter::from_query(query.competency.as_deref(), query.store_category.as_deref())?;
    let page_request = PageRequest::from_query(query.page.as_deref(), query.limit.as_deref());

    let page = state.store.list(&filter, page_request).await?;

    Ok(Json(ListReportsResponse {
        success: true,
        data: page.items,
        pagination: Pagination {
            total: page.total,
            page: page.page,
            limit: page.limit,
            pages: page.pages,
        },
    }))
}

/// GET /api/reports/:id
pub async fn handle_get_report(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ReportResponse>, AppError> {
    let report_id = parse_report_id(&id)?;
    let report = state
        .store
        .get_by_id(report_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Report {id} not found")))?;

    Ok(Json(ReportResponse {
        success: true,
        data: report,
    }))
}

/// GET /api/reports/:id/text
///
/// Plain-text rendering of a report, for pasting into review forms.
pub async fn handle_export_report(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<([(header::HeaderName, &'static str); 1], String), AppError> {
    let report_id = parse_report_id(&id)?;
    let report = state
        .store
        .get_by_id(report_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Report {id} not found")))?;

    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        report.to_plain_text(),
    ))
}

/// DELETE /api/reports/:id
pub async fn handle_delete_report(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteReportResponse>, AppError> {
    let report_id = parse_report_id(&id)?;
    if !state.store.delete(report_id).await? {
        return Err(AppError::NotFound(format!("Report {id} not found")));
    }

    Ok(Json(DeleteReportResponse {
        success: true,
        message: format!("Report {id} deleted"),
    }))
}

/// Ids are opaque to clients; anything that is not one of ours simply does not exist.
fn parse_report_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound(format!("Report {raw} not found")))
}
