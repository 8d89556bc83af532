//! In-process report store. Used by tests and when the service runs without a database.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::report::{NewReport, Report};
use crate::reports::pagination::{PageRequest, ReportPage};
use crate::reports::store::{ReportFilter, ReportStore};

#[derive(Default)]
pub struct InMemoryReportStore {
    // Insertion order.
    reports: RwLock<Vec<Report>>,
}

impl InMemoryReportStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReportStore for InMemoryReportStore {
    async fn insert(&self, report: NewReport) -> Result<Uuid, AppError> {
        let id = Uuid::new_v4();
        self.reports
            .write()
            .await
            .push(report.into_report(id, Utc::now()));
        Ok(id)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Report>, AppError> {
        Ok(self
            .reports
            .read()
            .await
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let mut reports = self.reports.write().await;
        let before = reports.len();
        reports.retain(|r| r.id != id);
        Ok(reports.len() < before)
    }

    async fn list(&self, filter: &ReportFilter, page: PageRequest) -> Result<ReportPage, AppError> {
        let reports = self.reports.read().await;

        // Newest insert first, then a stable sort keeps that order among equal timestamps.
        let mut matching: Vec<&Report> = reports.iter().rev().filter(|r| filter.matches(r)).collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = matching.len() as u64;
        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let items = matching
            .into_iter()
            .skip(offset)
            .take(page.limit as usize)
            .cloned()
            .collect();

        Ok(ReportPage::new(items, total, page))
    }
}
