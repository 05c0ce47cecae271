//! Projection of upstream query replies onto [`TaskStatus`].

use zimg_core::TaskStatus;

use crate::error::{UpstreamError, UpstreamResult};
use crate::models::{QueryReply, UpstreamTask};

const STATUS_FAILED: i64 = -1;
const STATUS_RUNNING: i64 = 1;
const STATUS_SUCCEEDED: i64 = 2;

/// Reason reported for upstream-side failures; the upstream gives none.
pub const GENERATION_FAILED: &str = "upstream reported failure";

/// Map a query reply onto the status of its first task.
///
/// Errors mean the reply could not be interpreted at all; callers treat
/// them as transient.
pub fn project_status(reply: QueryReply) -> UpstreamResult<TaskStatus> {
    if !reply.success {
        return Err(UpstreamError::Refused {
            message: "query reported success=false".to_string(),
        });
    }

    let entry = reply
        .data
        .and_then(|data| data.tasks.into_iter().next())
        .ok_or_else(|| UpstreamError::InvalidResponse {
            message: "query reply carries no task entry".to_string(),
        })?;
    let task: UpstreamTask = serde_json::from_value(entry)?;

    Ok(match status_code(&task.status) {
        // Completed but the URL has not materialized yet: keep waiting.
        Some(STATUS_SUCCEEDED) => task
            .res_data
            .and_then(|res| res.image_url)
            .map(|raw| unescape_url(&raw))
            .filter(|url| !url.is_empty())
            .map_or_else(TaskStatus::queued, TaskStatus::succeeded),
        Some(STATUS_FAILED) => TaskStatus::failed(GENERATION_FAILED),
        Some(STATUS_RUNNING) => TaskStatus::running(),
        _ => TaskStatus::queued(),
    })
}

fn status_code(value: &serde_json::Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
}

/// Undo the extra `\/` escaping the upstream applies to image URLs.
pub fn unescape_url(raw: &str) -> String {
    raw.replace("\\/", "/")
}
