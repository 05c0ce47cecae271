//! Wire types for the upstream `api.php` endpoint.
//!
//! Every request is a POST of one JSON envelope whose `action` field selects
//! the operation.

use serde::{Deserialize, Serialize};

/// `action: "create"` envelope.
#[derive(Debug, Serialize)]
pub struct CreateTaskEnvelope<'a> {
    pub action: &'static str,
    pub task_id: &'a str,
    pub task_type: &'a str,
    pub task_data: TaskData<'a>,
    /// Always 0 (pending) on creation.
    pub status: i32,
}

#[derive(Debug, Serialize)]
pub struct TaskData<'a> {
    pub prompt: &'a str,
    pub size: &'a str,
    pub seed: u64,
    pub steps: u32,
    /// True when the seed was picked by us rather than the caller.
    pub randomized: bool,
}

/// `action: "query"` envelope.
#[derive(Debug, Serialize)]
pub struct QueryTasksEnvelope<'a> {
    pub action: &'static str,
    pub task_ids: [&'a str; 1],
}

/// Reply to a create envelope.
#[derive(Debug, Default, Deserialize)]
pub struct CreateReply {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// Reply to a query envelope.
#[derive(Debug, Default, Deserialize)]
pub struct QueryReply {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Option<QueryData>,
}

#[derive(Debug, Default, Deserialize)]
pub struct QueryData {
    #[serde(default)]
    pub tasks: Vec<serde_json::Value>,
}

/// One entry of `data.tasks`.
///
/// `status` is kept loose: the upstream has been seen sending numbers,
/// numeric strings and nothing at all.
#[derive(Debug, Default, Deserialize)]
pub struct UpstreamTask {
    #[serde(default)]
    pub status: serde_json::Value,
    #[serde(default)]
    pub res_data: Option<ResData>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ResData {
    #[serde(default)]
    pub image_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_envelope_shape() {
        let envelope = CreateTaskEnvelope {
            action: "create",
            task_id: "task_1_2",
            task_type: "text2img-z-image",
            task_data: TaskData {
                prompt: "a red fox",
                size: "1024x1024",
                seed: 42,
                steps: 8,
                randomized: false,
            },
            status: 0,
        };

        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({
                "action": "create",
                "task_id": "task_1_2",
                "task_type": "text2img-z-image",
                "task_data": {
                    "prompt": "a red fox",
                    "size": "1024x1024",
                    "seed": 42,
                    "steps": 8,
                    "randomized": false
                },
                "status": 0
            })
        );
    }

    #[test]
    fn test_query_reply_tolerates_missing_fields() {
        let reply: QueryReply = serde_json::from_value(json!({"success": true})).unwrap();
        assert!(reply.success);
        assert!(reply.data.is_none());

        let task: UpstreamTask = serde_json::from_value(json!({})).unwrap();
        assert!(task.status.is_null());
        assert!(task.res_data.is_none());
    }
}
