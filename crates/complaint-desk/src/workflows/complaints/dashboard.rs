use chrono::NaiveDate;
use serde::Serialize;

use super::domain::{Complaint, ComplaintCategory, ComplaintId, ComplaintStatus};
use super::report::views::ComplaintReportSummary;
use super::report::ComplaintReport;
use super::session::SessionContext;
use super::store::ComplaintSnapshot;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusAction {
    pub target: ComplaintStatus,
    pub label: &'static str,
}

/// One complaint as listed under "recent complaints".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComplaintCard {
    pub id: ComplaintId,
    pub name: String,
    pub department: String,
    pub category: ComplaintCategory,
    pub category_label: &'static str,
    pub status: ComplaintStatus,
    pub status_label: &'static str,
    pub description: String,
    pub submitted_on: NaiveDate,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<StatusAction>,
}

impl ComplaintCard {
    fn from_complaint(complaint: &Complaint) -> Self {
        Self {
            id: complaint.id.clone(),
            name: complaint.name.clone(),
            department: complaint.department.clone(),
            category: complaint.category,
            category_label: complaint.category.label(),
            status: complaint.status,
            status_label: complaint.status.label(),
            description: complaint.description.clone(),
            submitted_on: complaint.created_at.date(),
            actions: Vec::new(),
        }
    }

    fn with_staff_actions(mut self) -> Self {
        self.actions = self
            .status
            .staff_actions()
            .iter()
            .map(|target| StatusAction {
                target: *target,
                label: target.label(),
            })
            .collect();
        self
    }
}

/// Self-service view: statistics plus the latest complaints.
#[derive(Debug, Clone, Serialize)]
pub struct StatusDashboard {
    pub viewer: String,
    pub summary: ComplaintReportSummary,
    pub recent: Vec<ComplaintCard>,
    pub skipped_records: usize,
}

impl StatusDashboard {
    pub fn build(session: &SessionContext, snapshot: &ComplaintSnapshot) -> Self {
        let report = snapshot.report();
        Self {
            viewer: session.username().to_string(),
            summary: report.summary(),
            recent: cards(&report).collect(),
            skipped_records: snapshot.skipped(),
        }
    }
}

/// Management view: same statistics, with the status actions staff may take.
#[derive(Debug, Clone, Serialize)]
pub struct AdminDashboard {
    pub viewer: String,
    pub summary: ComplaintReportSummary,
    pub recent: Vec<ComplaintCard>,
    pub skipped_records: usize,
}

impl AdminDashboard {
    pub fn build(session: &SessionContext, snapshot: &ComplaintSnapshot) -> Self {
        let report = snapshot.report();
        Self {
            viewer: session.username().to_string(),
            summary: report.summary(),
            recent: cards(&report).map(ComplaintCard::with_staff_actions).collect(),
            skipped_records: snapshot.skipped(),
        }
    }
}

fn cards(report: &ComplaintReport) -> impl Iterator<Item = ComplaintCard> + '_ {
    report.recent().iter().map(ComplaintCard::from_complaint)
}
