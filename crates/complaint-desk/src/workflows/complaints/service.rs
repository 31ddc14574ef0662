use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use tracing::{info, warn};

use super::dashboard::{AdminDashboard, StatusDashboard};
use super::domain::{Complaint, ComplaintDraft, ComplaintId, ComplaintStatus, DraftError};
use super::lifecycle::{apply_transition, InvalidTransition};
use super::session::{SessionContext, SessionError};
use super::store::{ComplaintSnapshot, ComplaintStore, StoreError};

pub type Clock = Arc<dyn Fn() -> NaiveDateTime + Send + Sync>;

/// Service composing the store client, lifecycle rules, and dashboards.
///
/// Every view fetches a fresh snapshot; nothing is cached between calls.
pub struct ComplaintDeskService<S> {
    store: Arc<S>,
    clock: Clock,
}

impl<S> ComplaintDeskService<S>
where
    S: ComplaintStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self::with_clock(store, Arc::new(|| Local::now().naive_local()))
    }

    pub fn with_clock(store: Arc<S>, clock: Clock) -> Self {
        Self { store, clock }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Self-service status page, open to any signed-in member.
    pub async fn status_view(
        &self,
        session: &SessionContext,
    ) -> Result<StatusDashboard, ServiceError> {
        let snapshot = self.snapshot().await?;
        Ok(StatusDashboard::build(session, &snapshot))
    }

    /// Management page with per-complaint actions. Staff only.
    pub async fn admin_view(
        &self,
        session: &SessionContext,
    ) -> Result<AdminDashboard, ServiceError> {
        session.require_staff()?;
        let snapshot = self.snapshot().await?;
        Ok(AdminDashboard::build(session, &snapshot))
    }

    /// Validate and file a new complaint.
    pub async fn submit(
        &self,
        session: &SessionContext,
        draft: ComplaintDraft,
    ) -> Result<Complaint, ServiceError> {
        draft.validate()?;

        let created = self.store.create_complaint(&draft).await.map_err(|err| {
            warn!(user = session.username(), error = %err, "complaint submission failed");
            err
        })?;

        info!(
            user = session.username(),
            complaint_id = %created.id,
            category = %created.category,
            "complaint submitted"
        );
        Ok(created)
    }

    /// Move a complaint to `target` after checking the lifecycle locally.
    pub async fn transition(
        &self,
        session: &SessionContext,
        id: &ComplaintId,
        target: ComplaintStatus,
    ) -> Result<Complaint, ServiceError> {
        session.require_staff()?;

        let snapshot = self.snapshot().await?;
        let current = snapshot
            .find(id)
            .ok_or_else(|| ServiceError::NotFound(id.clone()))?;
        let expected = apply_transition(current, target, (self.clock)())?;

        let stored = self.store.set_status(id, target).await.map_err(|err| {
            warn!(complaint_id = %id, error = %err, "status update failed");
            err
        })?;

        if stored.status != expected.status {
            warn!(
                complaint_id = %id,
                requested = %target,
                reported = %stored.status,
                "store reported a different status after update"
            );
            return Err(ServiceError::StatusMismatch {
                id: id.clone(),
                requested: target,
                reported: stored.status,
            });
        }

        info!(
            user = session.username(),
            complaint_id = %id,
            from = %current.status,
            to = %stored.status,
            "complaint status updated"
        );
        Ok(stored)
    }

    async fn snapshot(&self) -> Result<ComplaintSnapshot, ServiceError> {
        self.store.list_complaints().await.map_err(|err| {
            warn!(error = %err, "complaint fetch failed");
            ServiceError::Store(err)
        })
    }
}

/// Error raised by the complaint desk service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Draft(#[from] DraftError),
    #[error(transparent)]
    Transition(#[from] InvalidTransition),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("unreadable request body: {0}")]
    BadRequest(String),
    #[error("complaint {0} not found")]
    NotFound(ComplaintId),
    #[error("store reported complaint {id} as {reported} after requesting {requested}")]
    StatusMismatch {
        id: ComplaintId,
        requested: ComplaintStatus,
        reported: ComplaintStatus,
    },
}
