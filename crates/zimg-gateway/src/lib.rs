//! OpenAI-compatible HTTP gateway over the upstream image task protocol.
//!
//! Exposes `/v1/images/generations`, `/v1/chat/completions`,
//! `/v1/query/status` and `/v1/models`, translating each generation request
//! into one upstream task and delivering its result synchronously, through
//! a client handoff token, or as an SSE stream.

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

mod auth;
pub mod config;
pub mod delivery;
pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod server;
pub mod state;

pub use config::GatewayConfig;
pub use error::HttpError;
pub use routes::create_router;
pub use server::serve;
pub use state::{AppState, GatewayContext};

// Silence unused dev-dependency warnings
#[cfg(test)]
use http_body_util as _;
#[cfg(test)]
use tokio_test as _;
#[cfg(test)]
use tower as _;
