//! Complaint lifecycle and analytics.
//!
//! Complaints live in an external store; this module validates status
//! changes against the lifecycle, aggregates snapshots into dashboard
//! statistics, and composes the two read views offered to members and staff.

pub mod dashboard;
pub mod domain;
pub mod lifecycle;
pub mod report;
pub mod router;
pub mod service;
pub mod session;
pub mod store;

#[cfg(test)]
mod tests;

pub use dashboard::{AdminDashboard, ComplaintCard, StatusAction, StatusDashboard};
pub use domain::{
    Complaint, ComplaintCategory, ComplaintDraft, ComplaintId, ComplaintStatus, DraftError,
};
pub use lifecycle::{apply_transition, InvalidTransition};
pub use report::views::ComplaintReportSummary;
pub use report::ComplaintReport;
pub use router::complaint_router;
pub use service::{ComplaintDeskService, ServiceError};
pub use session::{Role, SessionContext, SessionError};
pub use store::{
    ComplaintSnapshot, ComplaintStore, HttpComplaintStore, StoreError, StoreFailure,
};
