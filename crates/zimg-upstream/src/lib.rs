//! Reqwest-backed client for the upstream image task endpoint.
//!
//! The upstream exposes a single `api.php` URL accepting JSON envelopes:
//! `create` registers a task, `query` reports its status. Requests must
//! look like they come from a browser session on the upstream site, so
//! every task gets a forged [`SessionIdentity`](zimg_core::SessionIdentity)
//! that is reused for all of its queries.
//!
//! External code should use [`DefaultUpstreamClient`] through the
//! [`UpstreamTaskPort`](zimg_core::UpstreamTaskPort) trait.

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]
// DefaultUpstreamClient is meant to be used through the port trait, not its
// internal generic structure
#![allow(private_interfaces)]

mod client;
mod config;
mod error;
mod http;
mod models;
mod parsing;
mod port;

// ============================================================================
// Public API
// ============================================================================

// Client
pub use client::DefaultUpstreamClient;

// Configuration
pub use config::UpstreamClientConfig;

// Errors raised while building the client
pub use error::{UpstreamError, UpstreamResult};

// Silence unused dev-dependency warnings
#[cfg(test)]
use tokio_test as _;
#[cfg(test)]
use wiremock as _;
