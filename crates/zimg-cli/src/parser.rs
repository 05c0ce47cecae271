//! Command-line and environment parsing.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

/// OpenAI-compatible gateway in front of the Z-Image web service.
///
/// Every flag can also be set through its `ZIMG_*` environment variable or a
/// `.env` file in the working directory.
#[derive(Debug, Parser)]
#[command(name = "zimg")]
#[command(about = "Serve the Z-Image web generator behind an OpenAI-compatible API")]
#[command(version)]
pub struct Cli {
    /// Address to listen on
    #[arg(long, env = "ZIMG_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "ZIMG_PORT", default_value_t = 8787)]
    pub port: u16,

    /// Bearer token clients must present on generation routes
    #[arg(long = "api-key", env = "ZIMG_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Upstream task endpoint
    #[arg(long = "upstream-url", env = "ZIMG_UPSTREAM_URL")]
    pub upstream_url: Option<String>,

    /// Origin presented to the upstream (also used for the Referer header)
    #[arg(long = "upstream-origin", env = "ZIMG_UPSTREAM_ORIGIN")]
    pub upstream_origin: Option<String>,

    /// Delay between status polls, in milliseconds
    #[arg(long = "poll-interval-ms", env = "ZIMG_POLL_INTERVAL_MS")]
    pub poll_interval_ms: Option<u64>,

    /// Give up waiting for an image after this many seconds
    #[arg(long = "poll-timeout-secs", env = "ZIMG_POLL_TIMEOUT_SECS")]
    pub poll_timeout_secs: Option<u64>,

    /// Models advertised by /v1/models, comma separated. The first is the default.
    #[arg(long, env = "ZIMG_MODELS", value_delimiter = ',')]
    pub models: Vec<String>,

    /// Static directory served for paths no route matches
    #[arg(long = "console-dir", env = "ZIMG_CONSOLE_DIR")]
    pub console_dir: Option<PathBuf>,
}

impl Cli {
    /// Listen address. Accepts IPv4 and IPv6 hosts.
    pub fn bind_addr(&self) -> anyhow::Result<SocketAddr> {
        let host = self.host.trim_start_matches('[').trim_end_matches(']');
        let ip = host
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid host '{}': {e}", self.host))?;
        Ok(SocketAddr::new(ip, self.port))
    }

    pub fn poll_interval(&self) -> Option<Duration> {
        self.poll_interval_ms.map(Duration::from_millis)
    }

    pub fn poll_timeout(&self) -> Option<Duration> {
        self.poll_timeout_secs.map(Duration::from_secs)
    }
}
