use super::super::domain::{Complaint, ComplaintCategory, ComplaintStatus};
use super::views::{
    CategoryCountEntry, ComplaintReportSummary, StatusCountEntry, WeekdayTrendEntry,
};
use chrono::{Datelike, Weekday};
use std::collections::HashMap;

pub const RECENT_LIMIT: usize = 10;

pub const WEEK_ORDER: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WeekdayBucket {
    pub complaints: usize,
    pub resolved: usize,
}

/// Raw counts derived from a complaint snapshot.
///
/// Same-weekday complaints from different weeks share a bucket.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ComplaintReport {
    total: usize,
    status_counts: HashMap<ComplaintStatus, usize>,
    category_counts: HashMap<ComplaintCategory, usize>,
    weekly: [WeekdayBucket; 7],
    recent: Vec<Complaint>,
}

impl ComplaintReport {
    pub fn from_complaints(complaints: &[Complaint]) -> Self {
        let mut report = Self {
            total: complaints.len(),
            ..Self::default()
        };

        for complaint in complaints {
            *report.status_counts.entry(complaint.status).or_default() += 1;
            *report.category_counts.entry(complaint.category).or_default() += 1;

            let day = complaint.created_at.weekday().num_days_from_sunday() as usize;
            let bucket = &mut report.weekly[day];
            bucket.complaints += 1;
            if complaint.status == ComplaintStatus::Resolved {
                bucket.resolved += 1;
            }
        }

        report.recent = complaints
            .iter()
            .rev()
            .take(RECENT_LIMIT)
            .cloned()
            .collect();

        report
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn active(&self) -> usize {
        ComplaintStatus::ordered()
            .into_iter()
            .filter(|status| status.is_active())
            .map(|status| self.status_count(status))
            .sum()
    }

    pub fn resolved(&self) -> usize {
        self.status_count(ComplaintStatus::Resolved)
    }

    pub fn closed(&self) -> usize {
        self.status_count(ComplaintStatus::Closed)
    }

    /// Resolved share as a whole percentage, rounded half away from zero.
    pub fn success_rate(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        let rate = (self.resolved() * 200 + self.total) / (self.total * 2);
        rate as u8
    }

    pub fn status_count(&self, status: ComplaintStatus) -> usize {
        self.status_counts.get(&status).copied().unwrap_or(0)
    }

    pub fn category_count(&self, category: ComplaintCategory) -> usize {
        self.category_counts.get(&category).copied().unwrap_or(0)
    }

    pub fn weekday(&self, day: Weekday) -> WeekdayBucket {
        self.weekly[day.num_days_from_sunday() as usize]
    }

    /// Up to ten complaints, latest snapshot position first.
    pub fn recent(&self) -> &[Complaint] {
        &self.recent
    }

    pub fn summary(&self) -> ComplaintReportSummary {
        let category_distribution = ComplaintCategory::ordered()
            .into_iter()
            .filter_map(|category| {
                let count = self.category_count(category);
                (count > 0).then_some(CategoryCountEntry {
                    category,
                    category_label: category.label(),
                    count,
                })
            })
            .collect();

        let status_distribution = ComplaintStatus::ordered()
            .into_iter()
            .map(|status| StatusCountEntry {
                status,
                status_label: status.label(),
                count: self.status_count(status),
            })
            .collect();

        let weekly_trend = WEEK_ORDER
            .into_iter()
            .map(|day| {
                let bucket = self.weekday(day);
                WeekdayTrendEntry {
                    day: weekday_label(day),
                    complaints: bucket.complaints,
                    resolved: bucket.resolved,
                }
            })
            .collect();

        ComplaintReportSummary {
            total: self.total,
            active: self.active(),
            resolved: self.resolved(),
            closed: self.closed(),
            success_rate: self.success_rate(),
            category_distribution,
            status_distribution,
            weekly_trend,
        }
    }
}

const fn weekday_label(day: Weekday) -> &'static str {
    match day {
        Weekday::Sun => "Sun",
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
    }
}
