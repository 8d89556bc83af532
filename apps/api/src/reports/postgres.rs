use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::report::{NewReport, Report, ReportRow};
use crate::reports::pagination::{PageRequest, ReportPage};
use crate::reports::store::{ReportFilter, ReportStore};

/// PostgreSQL-backed report store. Reports are INSERTed once and never UPDATEd.
#[derive(Clone)]
pub struct PgReportStore {
    pool: PgPool,
}

impl PgReportStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReportStore for PgReportStore {
    async fn insert(&self, report: NewReport) -> Result<Uuid, AppError> {
        let id = Uuid::new_v4();

        sqlx::query(
            r#"
            INSERT INTO reports
                (id, name, situation, task, action, result,
                 competency, store_category, original_story)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(id)
        .bind(&report.name)
        .bind(&report.situation)
        .bind(&report.task)
        .bind(&report.action)
        .bind(&report.result)
        .bind(report.competency.as_str())
        .bind(report.store_category.as_str())
        .bind(report.original_story.as_deref())
        .execute(&self.pool)
        .await?;

        info!(
            "Saved report {id} ({}, {})",
            report.competency, report.store_category
        );
        Ok(id)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Report>, AppError> {
        let row = sqlx::query_as::<_, ReportRow>("SELECT * FROM reports WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Report::try_from).transpose()?)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM reports WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(&self, filter: &ReportFilter, page: PageRequest) -> Result<ReportPage, AppError> {
        let competency = filter.competency.map(|c| c.as_str());
        let store_category = filter.store_category.map(|s| s.as_str());

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM reports
            WHERE ($1::text IS NULL OR competency = $1)
              AND ($2::text IS NULL OR store_category = $2)
            "#,
        )
        .bind(competency)
        .bind(store_category)
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query_as::<_, ReportRow>(
            r#"
            SELECT *
            FROM reports
            WHERE ($1::text IS NULL OR competency = $1)
              AND ($2::text IS NULL OR store_category = $2)
            ORDER BY created_at DESC, id DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(competency)
        .bind(store_category)
        .bind(page.limit as i64)
        .bind(i64::try_from(page.offset()).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await?;

        let items = rows
            .into_iter()
            .map(Report::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ReportPage::new(items, total.max(0) as u64, page))
    }
}
