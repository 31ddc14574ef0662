use async_trait::async_trait;
use chrono::{Local, NaiveDateTime};
use complaint_desk::workflows::complaints::{
    Complaint, ComplaintDraft, ComplaintId, ComplaintSnapshot, ComplaintStatus, ComplaintStore,
    StoreError, StoreFailure,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local complaint store for `serve --in-memory` and the demo.
///
/// Mirrors the remote store contract: integer ids, `NEW` on creation, and
/// no lifecycle checks on status updates.
#[derive(Default, Clone)]
pub(crate) struct InMemoryComplaintStore {
    records: Arc<Mutex<Vec<Complaint>>>,
    sequence: Arc<AtomicU64>,
}

impl InMemoryComplaintStore {
    pub(crate) fn seeded(records: Vec<Complaint>) -> Self {
        let highest = records
            .iter()
            .filter_map(|complaint| complaint.id.0.parse::<u64>().ok())
            .max()
            .unwrap_or(0);

        Self {
            records: Arc::new(Mutex::new(records)),
            sequence: Arc::new(AtomicU64::new(highest)),
        }
    }

    fn records(&self) -> MutexGuard<'_, Vec<Complaint>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn now() -> NaiveDateTime {
        Local::now().naive_local()
    }
}

#[async_trait]
impl ComplaintStore for InMemoryComplaintStore {
    async fn create_complaint(&self, draft: &ComplaintDraft) -> Result<Complaint, StoreError> {
        let id = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        let now = Self::now();
        let complaint = Complaint {
            id: ComplaintId(id.to_string()),
            name: draft.name.trim().to_string(),
            department: draft.department.trim().to_string(),
            category: draft.category,
            description: draft.description.trim().to_string(),
            status: ComplaintStatus::New,
            resolution_notes: String::new(),
            photo_reference: draft.photo_reference.clone(),
            created_at: now,
            updated_at: now,
        };

        self.records().push(complaint.clone());
        Ok(complaint)
    }

    async fn list_complaints(&self) -> Result<ComplaintSnapshot, StoreError> {
        Ok(ComplaintSnapshot::new(self.records().clone()))
    }

    async fn set_status(
        &self,
        id: &ComplaintId,
        status: ComplaintStatus,
    ) -> Result<Complaint, StoreError> {
        let mut records = self.records();
        let complaint = records
            .iter_mut()
            .find(|complaint| &complaint.id == id)
            .ok_or_else(|| StoreError::Update {
                id: id.clone(),
                source: StoreFailure::Rejected {
                    status: 404,
                    detail: format!("complaint {id} not found"),
                },
            })?;

        complaint.status = status;
        complaint.updated_at = Self::now().max(complaint.created_at);
        Ok(complaint.clone())
    }
}
