//! `/v1/query/status`: one upstream query on behalf of a handoff client.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use tracing::debug;
use zimg_core::{AuthContext, TaskId, TaskStatus};

use crate::error::HttpError;
use crate::models::StatusQueryRequest;
use crate::state::AppState;

const MISSING_FIELDS: &str = "Missing task_id or auth_context";

/// Query a handed-off task once and project its status.
///
/// Unauthenticated: possession of the `auth_context` is the credential.
pub async fn query(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<TaskStatus>, HttpError> {
    let request: StatusQueryRequest = serde_json::from_slice(&body)
        .map_err(|e| HttpError::BadQuery(format!("Invalid request body: {e}")))?;

    let non_empty = |value: Option<String>| value.filter(|v| !v.trim().is_empty());
    let (Some(task_id), Some(auth_context)) =
        (non_empty(request.task_id), non_empty(request.auth_context))
    else {
        return Err(HttpError::BadQuery(MISSING_FIELDS.to_string()));
    };

    let identity = AuthContext::from(auth_context)
        .decode()
        .map_err(|e| HttpError::BadQuery(e.to_string()))?;

    let task_id = TaskId::from(task_id);
    let status = state.upstream.query(&task_id, &identity).await;
    debug!(task_id = %task_id, status = ?status, "Status query");
    Ok(Json(status))
}
