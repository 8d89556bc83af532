//! Report Store: pluggable, trait-based persistence for STAR reports.
//!
//! Backends: `PgReportStore` (durable, production) and `InMemoryReportStore` (tests, and the
//! fallback when no database is configured).
//!
//! `AppState` holds an `Arc<dyn ReportStore>`, chosen at startup from config.

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::report::{Competency, NewReport, Report, StoreCategory};
use crate::reports::pagination::{PageRequest, ReportPage};
use crate::reports::validation::CreateReportRequest;

/// Exact-match filter; `None` fields are unconstrained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportFilter {
    pub competency: Option<Competency>,
    pub store_category: Option<StoreCategory>,
}

impl ReportFilter {
    /// Builds a filter from raw query values. Blank values mean "any"; values outside the
    /// enumerations are validation errors.
    pub fn from_query(
        competency: Option<&str>,
        store_category: Option<&str>,
    ) -> Result<Self, AppError> {
        let mut problems = Vec::new();

        let competency = match competency.map(str::trim).filter(|c| !c.is_empty()) {
            None => None,
            Some(code) => code
                .parse::<Competency>()
                .map_err(|e| problems.push(format!("competency filter: {e}")))
                .ok(),
        };
        let store_category = match store_category.map(str::trim).filter(|c| !c.is_empty()) {
            None => None,
            Some(code) => code
                .parse::<StoreCategory>()
                .map_err(|e| problems.push(format!("storeCategory filter: {e}")))
                .ok(),
        };

        if !problems.is_empty() {
            return Err(AppError::invalid_fields(problems.as_slice()));
        }
        Ok(Self {
            competency,
            store_category,
        })
    }

    pub fn matches(&self, report: &Report) -> bool {
        self.competency.map_or(true, |c| c == report.competency)
            && self
                .store_category
                .map_or(true, |s| s == report.store_category)
    }
}

/// The report store trait. Implement this to swap backends without touching handlers.
///
/// Listing order is part of the contract: `created_at` descending, most recent first.
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Persists an already-validated report and returns its new id.
    async fn insert(&self, report: NewReport) -> Result<Uuid, AppError>;

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Report>, AppError>;

    /// Returns `false` when no report had this id.
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;

    async fn list(&self, filter: &ReportFilter, page: PageRequest) -> Result<ReportPage, AppError>;

    /// Validates client fields, then persists. Nothing is written when validation fails.
    async fn create(&self, fields: CreateReportRequest) -> Result<Uuid, AppError> {
        let report = fields.validate()?;
        self.insert(report).await
    }
}
