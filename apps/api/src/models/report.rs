use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::generation::competencies::{category_label, competency_profile};

/// Display name given to reports saved without one.
pub const DEFAULT_REPORT_NAME: &str = "未命名報告";

/// Core competency a report is written against. Closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Competency {
    Integrity,
    Excellence,
    Innovation,
    Service,
    Teamwork,
}

impl Competency {
    pub const ALL: [Competency; 5] = [
        Competency::Integrity,
        Competency::Excellence,
        Competency::Innovation,
        Competency::Service,
        Competency::Teamwork,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Competency::Integrity => "integrity",
            Competency::Excellence => "excellence",
            Competency::Innovation => "innovation",
            Competency::Service => "service",
            Competency::Teamwork => "teamwork",
        }
    }

    pub fn label(&self) -> &'static str {
        competency_profile(*self).name
    }
}

/// Store department the narrator works in. Closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreCategory {
    Skincare,
    Makeup,
    Fragrance,
    WomenLuxury,
    MenLuxury,
    Digital,
    Toys,
    Home,
    Souvenir,
    TobaccoAlcohol,
}

impl StoreCategory {
    pub const ALL: [StoreCategory; 10] = [
        StoreCategory::Skincare,
        StoreCategory::Makeup,
        StoreCategory::Fragrance,
        StoreCategory::WomenLuxury,
        StoreCategory::MenLuxury,
        StoreCategory::Digital,
        StoreCategory::Toys,
        StoreCategory::Home,
        StoreCategory::Souvenir,
        StoreCategory::TobaccoAlcohol,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StoreCategory::Skincare => "skincare",
            StoreCategory::Makeup => "makeup",
            StoreCategory::Fragrance => "fragrance",
            StoreCategory::WomenLuxury => "women_luxury",
            StoreCategory::MenLuxury => "men_luxury",
            StoreCategory::Digital => "digital",
            StoreCategory::Toys => "toys",
            StoreCategory::Home => "home",
            StoreCategory::Souvenir => "souvenir",
            StoreCategory::TobaccoAlcohol => "tobacco_alcohol",
        }
    }

    pub fn label(&self) -> &'static str {
        category_label(*self)
    }
}

/// Returned when a code is not a member of its enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCode(pub String);

impl fmt::Display for UnknownCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown code '{}'", self.0)
    }
}

impl FromStr for Competency {
    type Err = UnknownCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Competency::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownCode(s.to_string()))
    }
}

impl FromStr for StoreCategory {
    type Err = UnknownCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StoreCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownCode(s.to_string()))
    }
}

impl fmt::Display for Competency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for StoreCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted STAR report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: Uuid,
    pub name: String,
    pub situation: String,
    pub task: String,
    pub action: String,
    pub result: String,
    pub competency: Competency,
    pub store_category: StoreCategory,
    pub original_story: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Report {
    /// Renders the report as the plain-text block users paste into their review forms.
    pub fn to_plain_text(&self) -> String {
        format!(
            "STAR 報告：\n\n\
             情境 (Situation):\n{}\n\n\
             任務 (Task):\n{}\n\n\
             行動 (Action):\n{}\n\n\
             結果 (Result):\n{}\n\n\
             類別: {}\n\
             職能: {}\n\
             生成時間: {}",
            self.situation,
            self.task,
            self.action,
            self.result,
            self.store_category.label(),
            self.competency.label(),
            self.created_at.format("%Y-%m-%d %H:%M"),
        )
    }
}

/// Raw `reports` row. Enum columns come back as text and are checked on conversion.
#[derive(Debug, Clone, FromRow)]
pub struct ReportRow {
    pub id: Uuid,
    pub name: String,
    pub situation: String,
    pub task: String,
    pub action: String,
    pub result: String,
    pub competency: String,
    pub store_category: String,
    pub original_story: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<ReportRow> for Report {
    type Error = anyhow::Error;

    fn try_from(row: ReportRow) -> Result<Self, Self::Error> {
        let competency = row
            .competency
            .parse::<Competency>()
            .map_err(|e| anyhow::anyhow!("report {} has invalid competency: {e}", row.id))?;
        let store_category = row
            .store_category
            .parse::<StoreCategory>()
            .map_err(|e| anyhow::anyhow!("report {} has invalid store_category: {e}", row.id))?;

        Ok(Report {
            id: row.id,
            name: row.name,
            situation: row.situation,
            task: row.task,
            action: row.action,
            result: row.result,
            competency,
            store_category,
            original_story: row.original_story,
            created_at: row.created_at,
        })
    }
}

/// A validated report, ready to be written by a store backend.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReport {
    pub name: String,
    pub situation: String,
    pub task: String,
    pub action: String,
    pub result: String,
    pub competency: Competency,
    pub store_category: StoreCategory,
    pub original_story: Option<String>,
}

impl NewReport {
    pub fn into_report(self, id: Uuid, created_at: DateTime<Utc>) -> Report {
        Report {
            id,
            name: self.name,
            situation: self.situation,
            task: self.task,
            action: self.action,
            result: self.result,
            competency: self.competency,
            store_category: self.store_category,
            original_story: self.original_story,
            created_at,
        }
    }
}
