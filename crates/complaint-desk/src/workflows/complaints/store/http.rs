use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use super::{ComplaintSnapshot, ComplaintStore, StoreError, StoreFailure};
use crate::config::StoreConfig;
use crate::workflows::complaints::domain::{
    Complaint, ComplaintCategory, ComplaintDraft, ComplaintId, ComplaintStatus,
};

/// JSON-over-HTTP client for the complaint service.
#[derive(Debug, Clone)]
pub struct HttpComplaintStore {
    client: Client,
    base_url: String,
}

#[derive(Serialize)]
struct NewComplaintBody<'a> {
    name: &'a str,
    department: &'a str,
    category: ComplaintCategory,
    description: &'a str,
    status: ComplaintStatus,
    resolution_notes: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    photo_path: Option<&'a str>,
}

#[derive(Serialize)]
struct StatusBody {
    status: ComplaintStatus,
}

impl HttpComplaintStore {
    pub fn new(config: &StoreConfig) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(StoreError::Client)?;

        Ok(Self {
            client,
            base_url: config.base_url().to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Non-2xx responses surface their body as the failure detail.
    async fn check(response: Response) -> Result<Response, StoreFailure> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let detail = response
            .text()
            .await
            .unwrap_or_else(|err| format!("unreadable error body ({err})"));
        Err(StoreFailure::Rejected {
            status: status.as_u16(),
            detail,
        })
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, StoreFailure> {
        let body = response.bytes().await.map_err(StoreFailure::Transport)?;
        serde_json::from_slice(&body).map_err(|err| StoreFailure::Malformed(err.to_string()))
    }

    async fn fetch_snapshot(&self) -> Result<ComplaintSnapshot, StoreFailure> {
        let response = self
            .client
            .get(self.url("complaints"))
            .send()
            .await
            .map_err(StoreFailure::Transport)?;
        let response = Self::check(response).await?;
        let entries: Vec<serde_json::Value> = Self::decode(response).await?;

        let mut complaints = Vec::with_capacity(entries.len());
        let mut skipped = 0;
        for (position, entry) in entries.into_iter().enumerate() {
            match serde_json::from_value::<Complaint>(entry) {
                Ok(complaint) => complaints.push(complaint),
                Err(err) => {
                    skipped += 1;
                    warn!(position, error = %err, "skipping undecodable complaint entry");
                }
            }
        }

        debug!(count = complaints.len(), skipped, "fetched complaint snapshot");
        Ok(ComplaintSnapshot::with_skipped(complaints, skipped))
    }

    async fn post_draft(&self, draft: &ComplaintDraft) -> Result<Complaint, StoreFailure> {
        let body = NewComplaintBody {
            name: &draft.name,
            department: &draft.department,
            category: draft.category,
            description: &draft.description,
            status: ComplaintStatus::New,
            resolution_notes: "",
            photo_path: draft.photo_reference.as_deref(),
        };

        let response = self
            .client
            .post(self.url("complaints"))
            .json(&body)
            .send()
            .await
            .map_err(StoreFailure::Transport)?;
        let response = Self::check(response).await?;
        Self::decode(response).await
    }

    async fn put_status(
        &self,
        id: &ComplaintId,
        status: ComplaintStatus,
    ) -> Result<Complaint, StoreFailure> {
        let response = self
            .client
            .put(self.url(&format!("complaints/{}/status", id)))
            .json(&StatusBody { status })
            .send()
            .await
            .map_err(StoreFailure::Transport)?;
        let response = Self::check(response).await?;
        Self::decode(response).await
    }
}

#[async_trait]
impl ComplaintStore for HttpComplaintStore {
    async fn create_complaint(&self, draft: &ComplaintDraft) -> Result<Complaint, StoreError> {
        self.post_draft(draft).await.map_err(StoreError::Submission)
    }

    async fn list_complaints(&self) -> Result<ComplaintSnapshot, StoreError> {
        self.fetch_snapshot().await.map_err(StoreError::Fetch)
    }

    async fn set_status(
        &self,
        id: &ComplaintId,
        status: ComplaintStatus,
    ) -> Result<Complaint, StoreError> {
        self.put_status(id, status)
            .await
            .map_err(|source| StoreError::Update {
                id: id.clone(),
                source,
            })
    }
}
