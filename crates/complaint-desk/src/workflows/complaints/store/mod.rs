mod http;

pub use http::HttpComplaintStore;

use async_trait::async_trait;

use super::domain::{Complaint, ComplaintDraft, ComplaintId, ComplaintStatus};
use super::report::ComplaintReport;

/// Boundary to the external complaint service.
///
/// None of the operations are idempotent: repeating `create_complaint`
/// files a duplicate.
#[async_trait]
pub trait ComplaintStore: Send + Sync {
    /// Files a new complaint with status `NEW` and empty resolution notes.
    async fn create_complaint(&self, draft: &ComplaintDraft) -> Result<Complaint, StoreError>;

    /// Fetches the full current collection.
    async fn list_complaints(&self) -> Result<ComplaintSnapshot, StoreError>;

    /// Requests a status change and returns the record as the store now holds it.
    ///
    /// The transition table is not checked here.
    async fn set_status(
        &self,
        id: &ComplaintId,
        status: ComplaintStatus,
    ) -> Result<Complaint, StoreError>;
}

/// Point-in-time, read-only collection of complaints in store order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComplaintSnapshot {
    complaints: Vec<Complaint>,
    skipped: usize,
}

impl ComplaintSnapshot {
    pub fn new(complaints: Vec<Complaint>) -> Self {
        Self {
            complaints,
            skipped: 0,
        }
    }

    /// Snapshot that dropped `skipped` undecodable entries.
    pub fn with_skipped(complaints: Vec<Complaint>, skipped: usize) -> Self {
        Self {
            complaints,
            skipped,
        }
    }

    pub fn complaints(&self) -> &[Complaint] {
        &self.complaints
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn len(&self) -> usize {
        self.complaints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.complaints.is_empty()
    }

    pub fn find(&self, id: &ComplaintId) -> Option<&Complaint> {
        self.complaints.iter().find(|complaint| &complaint.id == id)
    }

    pub fn report(&self) -> ComplaintReport {
        ComplaintReport::from_complaints(&self.complaints)
    }
}

/// Why a store call failed.
#[derive(Debug, thiserror::Error)]
pub enum StoreFailure {
    #[error("store unreachable: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("store responded {status}: {detail}")]
    Rejected { status: u16, detail: String },
    #[error("malformed store response: {0}")]
    Malformed(String),
}

impl StoreFailure {
    pub fn status(&self) -> Option<u16> {
        match self {
            StoreFailure::Rejected { status, .. } => Some(*status),
            StoreFailure::Transport(_) | StoreFailure::Malformed(_) => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to fetch complaints: {0}")]
    Fetch(#[source] StoreFailure),
    #[error("failed to submit complaint: {0}")]
    Submission(#[source] StoreFailure),
    #[error("failed to update complaint {id}: {source}")]
    Update {
        id: ComplaintId,
        #[source]
        source: StoreFailure,
    },
    #[error("failed to build store client: {0}")]
    Client(#[source] reqwest::Error),
}

impl StoreError {
    pub fn failure(&self) -> Option<&StoreFailure> {
        match self {
            StoreError::Fetch(failure) | StoreError::Submission(failure) => Some(failure),
            StoreError::Update { source, .. } => Some(source),
            StoreError::Client(_) => None,
        }
    }
}
