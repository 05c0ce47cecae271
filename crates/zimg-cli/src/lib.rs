//! Composition root for the `zimg` binary.
//!
//! [`parser`] turns flags and environment into a [`Cli`]; [`bootstrap`]
//! wires the upstream client into a gateway context and runs the server.

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

#[cfg(test)]
use tokio_test as _;

// Used by main.rs only
use dotenvy as _;
use tracing_subscriber as _;

pub mod bootstrap;
pub mod parser;

pub use bootstrap::{build_context, run};
pub use parser::Cli;
