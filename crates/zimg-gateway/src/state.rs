//! Shared application state type.

use std::fmt;
use std::sync::Arc;

use tokio_util::task::TaskTracker;
use zimg_core::{PollSettings, ResultPoller, UpstreamTaskPort};

use crate::config::GatewayConfig;

/// Application state shared across all handlers.
pub type AppState = Arc<GatewayContext>;

/// Everything a request handler needs. Immutable after construction.
pub struct GatewayContext {
    pub(crate) config: GatewayConfig,
    pub(crate) upstream: Arc<dyn UpstreamTaskPort>,
    /// Background streaming work. `serve` waits for it on shutdown.
    pub(crate) tracker: TaskTracker,
}

impl fmt::Debug for GatewayContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayContext")
            .field("upstream", &self.upstream)
            .field("background_tasks", &self.tracker.len())
            .finish_non_exhaustive()
    }
}

impl GatewayContext {
    #[must_use]
    pub fn new(config: GatewayConfig, upstream: Arc<dyn UpstreamTaskPort>) -> Self {
        Self {
            config,
            upstream,
            tracker: TaskTracker::new(),
        }
    }

    #[must_use]
    pub const fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Tracker owning detached streaming tasks.
    #[must_use]
    pub const fn tracker(&self) -> &TaskTracker {
        &self.tracker
    }

    pub(crate) fn poller(&self, settings: PollSettings) -> ResultPoller {
        ResultPoller::new(Arc::clone(&self.upstream), settings)
    }
}
