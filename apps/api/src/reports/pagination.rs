use serde::Serialize;

use crate::models::report::Report;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

/// A 1-indexed page request. Always within bounds once constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// Clamps `page` to ≥ 1 and `limit` to 1..=MAX_PAGE_SIZE.
    pub fn new(page: i64, limit: i64) -> Self {
        Self {
            page: page.clamp(1, u32::MAX as i64) as u32,
            limit: limit.clamp(1, MAX_PAGE_SIZE as i64) as u32,
        }
    }

    /// Coerces raw query-string values. Missing or non-numeric values take the defaults;
    /// numeric values are clamped by `new`.
    pub fn from_query(page: Option<&str>, limit: Option<&str>) -> Self {
        let parse = |raw: Option<&str>, default: u32| -> i64 {
            raw.and_then(|v| v.trim().parse::<i64>().ok())
                .unwrap_or(default as i64)
        };
        Self::new(parse(page, DEFAULT_PAGE), parse(limit, DEFAULT_PAGE_SIZE))
    }

    pub fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.limit as u64
    }
}

/// One page of reports plus the information needed to navigate the rest.
#[derive(Debug, Clone, Serialize)]
pub struct ReportPage {
    pub items: Vec<Report>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub pages: u64,
}

impl ReportPage {
    pub fn new(items: Vec<Report>, total: u64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            page: request.page,
            limit: request.limit,
            pages: page_count(total, request.limit),
        }
    }
}

/// ceil(total / limit)
pub fn page_count(total: u64, limit: u32) -> u64 {
    total.div_ceil(limit.max(1) as u64)
}
