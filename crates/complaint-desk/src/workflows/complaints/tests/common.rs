use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;

use crate::workflows::complaints::domain::{
    Complaint, ComplaintCategory, ComplaintDraft, ComplaintId, ComplaintStatus,
};
use crate::workflows::complaints::service::ComplaintDeskService;
use crate::workflows::complaints::session::{Role, SessionContext};
use crate::workflows::complaints::store::{
    ComplaintSnapshot, ComplaintStore, StoreError, StoreFailure,
};

/// 2025-03-02 is a Sunday.
pub(super) fn at(day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 3, day)
        .and_then(|date| date.and_hms_opt(hour, 0, 0))
        .expect("valid timestamp")
}

pub(super) fn member() -> SessionContext {
    SessionContext::new("asha", Role::Member).expect("valid session")
}

pub(super) fn staff() -> SessionContext {
    SessionContext::new("warden", Role::Staff).expect("valid session")
}

pub(super) fn draft(category: ComplaintCategory) -> ComplaintDraft {
    ComplaintDraft {
        name: "Asha Verma".to_string(),
        department: "Computer Science".to_string(),
        category,
        description: "The hostel Wi-Fi drops every evening.".to_string(),
        photo_reference: None,
    }
}

pub(super) fn complaint(id: &str, status: ComplaintStatus, created_at: NaiveDateTime) -> Complaint {
    Complaint {
        id: ComplaintId(id.to_string()),
        name: format!("Submitter {id}"),
        department: "Electrical".to_string(),
        category: ComplaintCategory::Technical,
        description: "Lab computers will not boot".to_string(),
        status,
        resolution_notes: String::new(),
        photo_reference: None,
        created_at,
        updated_at: created_at,
    }
}

pub(super) fn build_service() -> (ComplaintDeskService<MemoryStore>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::default());
    let service = ComplaintDeskService::with_clock(store.clone(), Arc::new(|| at(9, 12)));
    (service, store)
}

/// Store double that behaves like the reference service.
#[derive(Default)]
pub(super) struct MemoryStore {
    complaints: Mutex<Vec<Complaint>>,
    sequence: AtomicU64,
}

impl MemoryStore {
    pub(super) fn seeded(complaints: Vec<Complaint>) -> Self {
        Self {
            sequence: AtomicU64::new(complaints.len() as u64),
            complaints: Mutex::new(complaints),
        }
    }

    pub(super) fn complaints(&self) -> Vec<Complaint> {
        self.complaints.lock().expect("store mutex poisoned").clone()
    }
}

#[async_trait]
impl ComplaintStore for MemoryStore {
    async fn create_complaint(&self, draft: &ComplaintDraft) -> Result<Complaint, StoreError> {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let created_at = at(2, 8);
        let complaint = Complaint {
            id: ComplaintId(id.to_string()),
            name: draft.name.clone(),
            department: draft.department.clone(),
            category: draft.category,
            description: draft.description.clone(),
            status: ComplaintStatus::New,
            resolution_notes: String::new(),
            photo_reference: draft.photo_reference.clone(),
            created_at,
            updated_at: created_at,
        };
        self.complaints
            .lock()
            .expect("store mutex poisoned")
            .push(complaint.clone());
        Ok(complaint)
    }

    async fn list_complaints(&self) -> Result<ComplaintSnapshot, StoreError> {
        Ok(ComplaintSnapshot::new(self.complaints()))
    }

    async fn set_status(
        &self,
        id: &ComplaintId,
        status: ComplaintStatus,
    ) -> Result<Complaint, StoreError> {
        let mut guard = self.complaints.lock().expect("store mutex poisoned");
        let complaint = guard
            .iter_mut()
            .find(|complaint| &complaint.id == id)
            .ok_or_else(|| StoreError::Update {
                id: id.clone(),
                source: StoreFailure::Rejected {
                    status: 404,
                    detail: "complaint not found".to_string(),
                },
            })?;
        complaint.status = status;
        complaint.updated_at = at(9, 12);
        Ok(complaint.clone())
    }
}

pub(super) struct UnavailableStore;

#[async_trait]
impl ComplaintStore for UnavailableStore {
    async fn create_complaint(&self, _draft: &ComplaintDraft) -> Result<Complaint, StoreError> {
        Err(StoreError::Submission(StoreFailure::Rejected {
            status: 503,
            detail: "maintenance window".to_string(),
        }))
    }

    async fn list_complaints(&self) -> Result<ComplaintSnapshot, StoreError> {
        Err(StoreError::Fetch(StoreFailure::Rejected {
            status: 503,
            detail: "maintenance window".to_string(),
        }))
    }

    async fn set_status(
        &self,
        id: &ComplaintId,
        _status: ComplaintStatus,
    ) -> Result<Complaint, StoreError> {
        Err(StoreError::Update {
            id: id.clone(),
            source: StoreFailure::Rejected {
                status: 503,
                detail: "maintenance window".to_string(),
            },
        })
    }
}

/// Accepts updates but keeps reporting the old status.
pub(super) struct StaleStore {
    pub(super) inner: MemoryStore,
}

#[async_trait]
impl ComplaintStore for StaleStore {
    async fn create_complaint(&self, draft: &ComplaintDraft) -> Result<Complaint, StoreError> {
        self.inner.create_complaint(draft).await
    }

    async fn list_complaints(&self) -> Result<ComplaintSnapshot, StoreError> {
        self.inner.list_complaints().await
    }

    async fn set_status(
        &self,
        id: &ComplaintId,
        _status: ComplaintStatus,
    ) -> Result<Complaint, StoreError> {
        let snapshot = self.inner.list_complaints().await?;
        snapshot.find(id).cloned().ok_or_else(|| StoreError::Update {
            id: id.clone(),
            source: StoreFailure::Malformed("missing record".to_string()),
        })
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
