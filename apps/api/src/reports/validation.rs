use serde::Deserialize;

use crate::errors::AppError;
use crate::models::report::{Competency, NewReport, StoreCategory, DEFAULT_REPORT_NAME};

/// Loosely typed create-report payload, as received from clients.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReportRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub situation: Option<String>,
    #[serde(default)]
    pub task: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub competency: Option<String>,
    #[serde(default)]
    pub store_category: Option<String>,
    #[serde(default)]
    pub original_story: Option<String>,
}

impl CreateReportRequest {
    /// Checks the report invariants and produces a trimmed, typed `NewReport`.
    /// Every offending field is named in the error.
    pub fn validate(self) -> Result<NewReport, AppError> {
        let mut problems: Vec<String> = Vec::new();

        let mut required = |field: &str, value: Option<String>| -> String {
            match non_blank(value) {
                Some(v) => v,
                None => {
                    problems.push(format!("{field} is required"));
                    String::new()
                }
            }
        };
        let situation = required("situation", self.situation);
        let task = required("task", self.task);
        let action = required("action", self.action);
        let result = required("result", self.result);

        let competency = parse_code::<Competency>(
            "competency",
            self.competency,
            &Competency::ALL.map(|c| c.as_str()),
            &mut problems,
        );
        let store_category = parse_code::<StoreCategory>(
            "storeCategory",
            self.store_category,
            &StoreCategory::ALL.map(|c| c.as_str()),
            &mut problems,
        );

        match (competency, store_category) {
            (Some(competency), Some(store_category)) if problems.is_empty() => Ok(NewReport {
                name: non_blank(self.name).unwrap_or_else(|| DEFAULT_REPORT_NAME.to_string()),
                situation,
                task,
                action,
                result,
                competency,
                store_category,
                original_story: non_blank(self.original_story),
            }),
            _ => Err(AppError::invalid_fields(problems.as_slice())),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_code<T: std::str::FromStr>(
    field: &str,
    value: Option<String>,
    allowed: &[&str],
    problems: &mut Vec<String>,
) -> Option<T> {
    let Some(code) = non_blank(value) else {
        problems.push(format!("{field} is required"));
        return None;
    };
    match code.parse::<T>() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            problems.push(format!(
                "{field} '{code}' is not one of: {}",
                allowed.join(", ")
            ));
            None
        }
    }
}
