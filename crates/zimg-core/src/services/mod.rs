//! Stateless services built on top of the ports.

mod identity_forge;
mod poller;

pub use identity_forge::{IdentityForge, UpstreamProfile};
pub use poller::{DEFAULT_POLL_INTERVAL, DEFAULT_POLL_TIMEOUT, PollSettings, ResultPoller};
