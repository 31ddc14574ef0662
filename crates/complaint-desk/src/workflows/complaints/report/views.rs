use super::super::domain::{ComplaintCategory, ComplaintStatus};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCountEntry {
    pub category: ComplaintCategory,
    pub category_label: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCountEntry {
    pub status: ComplaintStatus,
    pub status_label: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekdayTrendEntry {
    pub day: &'static str,
    pub complaints: usize,
    pub resolved: usize,
}

/// Chart-ready statistics for one snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComplaintReportSummary {
    pub total: usize,
    pub active: usize,
    pub resolved: usize,
    pub closed: usize,
    pub success_rate: u8,
    /// Categories with no complaints are left out.
    pub category_distribution: Vec<CategoryCountEntry>,
    /// Always all four statuses, zeros included.
    pub status_distribution: Vec<StatusCountEntry>,
    /// Sunday through Saturday.
    pub weekly_trend: Vec<WeekdayTrendEntry>,
}
