use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{ComplaintDraft, ComplaintId, ComplaintStatus};
use super::service::{ComplaintDeskService, ServiceError};
use super::session::{SessionContext, SessionError};
use super::store::ComplaintStore;

#[derive(Debug, Deserialize)]
pub struct StatusChangeRequest {
    pub status: ComplaintStatus,
}

/// Router builder exposing the status and management views.
pub fn complaint_router<S>(service: Arc<ComplaintDeskService<S>>) -> Router
where
    S: ComplaintStore + 'static,
{
    Router::new()
        .route("/api/v1/complaints", post(submit_handler::<S>))
        .route("/api/v1/complaints/status", get(status_view_handler::<S>))
        .route("/api/v1/complaints/admin", get(admin_view_handler::<S>))
        .route(
            "/api/v1/complaints/:complaint_id/status",
            put(transition_handler::<S>),
        )
        .with_state(service)
}

pub(crate) async fn status_view_handler<S>(
    State(service): State<Arc<ComplaintDeskService<S>>>,
    headers: HeaderMap,
) -> Response
where
    S: ComplaintStore + 'static,
{
    let session = match SessionContext::from_headers(&headers) {
        Ok(session) => session,
        Err(err) => return ServiceError::from(err).into_response(),
    };

    match service.status_view(&session).await {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn admin_view_handler<S>(
    State(service): State<Arc<ComplaintDeskService<S>>>,
    headers: HeaderMap,
) -> Response
where
    S: ComplaintStore + 'static,
{
    let session = match SessionContext::from_headers(&headers) {
        Ok(session) => session,
        Err(err) => return ServiceError::from(err).into_response(),
    };

    match service.admin_view(&session).await {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn submit_handler<S>(
    State(service): State<Arc<ComplaintDeskService<S>>>,
    headers: HeaderMap,
    body: Result<Json<ComplaintDraft>, JsonRejection>,
) -> Response
where
    S: ComplaintStore + 'static,
{
    let session = match SessionContext::from_headers(&headers) {
        Ok(session) => session,
        Err(err) => return ServiceError::from(err).into_response(),
    };
    let Json(draft) = match body {
        Ok(body) => body,
        Err(rejection) => return bad_request(rejection).into_response(),
    };

    match service.submit(&session, draft).await {
        Ok(complaint) => (StatusCode::CREATED, Json(complaint)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn transition_handler<S>(
    State(service): State<Arc<ComplaintDeskService<S>>>,
    headers: HeaderMap,
    Path(complaint_id): Path<String>,
    body: Result<Json<StatusChangeRequest>, JsonRejection>,
) -> Response
where
    S: ComplaintStore + 'static,
{
    let session = match SessionContext::from_headers(&headers) {
        Ok(session) => session,
        Err(err) => return ServiceError::from(err).into_response(),
    };
    let Json(request) = match body {
        Ok(body) => body,
        Err(rejection) => return bad_request(rejection).into_response(),
    };

    let id = ComplaintId(complaint_id);
    match service.transition(&session, &id, request.status).await {
        Ok(complaint) => (StatusCode::OK, Json(complaint)).into_response(),
        Err(err) => err.into_response(),
    }
}

/// Unreadable JSON bodies still answer with the `{error, notice}` shape.
fn bad_request(rejection: JsonRejection) -> ServiceError {
    ServiceError::BadRequest(rejection.body_text())
}

impl ServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Session(SessionError::Missing | SessionError::InvalidRole(_)) => {
                StatusCode::UNAUTHORIZED
            }
            ServiceError::Session(SessionError::Forbidden { .. }) => StatusCode::FORBIDDEN,
            ServiceError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServiceError::Draft(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ServiceError::Transition(_) => StatusCode::CONFLICT,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Store(_) | ServiceError::StatusMismatch { .. } => StatusCode::BAD_GATEWAY,
        }
    }

    /// Short message suitable for a non-fatal notification.
    pub fn notice(&self) -> &'static str {
        match self {
            ServiceError::Session(SessionError::Forbidden { .. }) => {
                "Only staff can manage complaints."
            }
            ServiceError::Session(_) => "Please sign in to continue.",
            ServiceError::BadRequest(_) => {
                "The request could not be read. Check the field values and try again."
            }
            ServiceError::Draft(_) => "Please correct the highlighted fields and submit again.",
            ServiceError::Transition(_) => "No change was made to the complaint.",
            ServiceError::NotFound(_) => "The complaint no longer exists. Refresh and try again.",
            ServiceError::Store(_) | ServiceError::StatusMismatch { .. } => {
                "The complaint service is unavailable right now. Please try again."
            }
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let payload = json!({
            "error": self.to_string(),
            "notice": self.notice(),
        });
        (self.status_code(), Json(payload)).into_response()
    }
}
