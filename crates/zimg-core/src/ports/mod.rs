//! Port definitions (traits) implemented by adapter crates.

pub mod upstream;

pub use upstream::UpstreamTaskPort;
