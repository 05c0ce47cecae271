//! Domain types shared by the upstream client and the gateway.

mod identity;
mod status;
mod task;

pub use identity::{AuthContext, SessionCookies, SessionIdentity};
pub use status::{QUEUED_PROGRESS, RUNNING_PROGRESS, TaskStatus};
pub use task::{DEFAULT_SIZE, DEFAULT_STEPS, SubmittedTask, Task, TaskId, TaskParams};
