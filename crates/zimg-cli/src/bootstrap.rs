//! Wires the upstream client and the gateway together.

use std::sync::Arc;

use anyhow::Context as _;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use zimg_gateway::{GatewayConfig, GatewayContext, serve};
use zimg_upstream::{DefaultUpstreamClient, UpstreamClientConfig};

use crate::parser::Cli;

/// Upstream client settings derived from the command line.
pub fn upstream_config(cli: &Cli) -> UpstreamClientConfig {
    let mut config = UpstreamClientConfig::default();
    if let Some(url) = &cli.upstream_url {
        config = config.with_base_url(url.clone());
    }
    if let Some(origin) = &cli.upstream_origin {
        config = config.with_origin(origin.clone());
    }
    config
}

/// Gateway settings derived from the command line.
pub fn gateway_config(cli: &Cli) -> GatewayConfig {
    let mut config = GatewayConfig::new(cli.api_key.clone()).with_models(
        cli.models
            .iter()
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .collect(),
    );
    if let Some(interval) = cli.poll_interval() {
        config = config.with_poll_interval(interval);
    }
    if let Some(timeout) = cli.poll_timeout() {
        config = config.with_poll_timeout(timeout);
    }
    if let Some(dir) = &cli.console_dir {
        config = config.with_console_dir(dir.clone());
    }
    config
}

/// Build the shared gateway context.
pub fn build_context(cli: &Cli) -> anyhow::Result<GatewayContext> {
    let upstream_config = upstream_config(cli);
    let upstream = DefaultUpstreamClient::new(&upstream_config)
        .with_context(|| format!("invalid upstream endpoint {}", upstream_config.base_url()))?;
    info!(upstream = upstream_config.base_url(), "Upstream client ready");

    Ok(GatewayContext::new(gateway_config(cli), Arc::new(upstream)))
}

/// Bind, serve and shut down gracefully on Ctrl-C.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let ctx = build_context(&cli)?;
    let addr = cli.bind_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "Cannot listen for Ctrl-C, shutting down");
            } else {
                info!("Shutdown requested");
            }
            cancel.cancel();
        }
    });

    serve(listener, ctx, cancel).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::time::Duration;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(["zimg", "--api-key", "sk-local"].iter().chain(args))
    }

    #[test]
    fn test_upstream_overrides() {
        let config = upstream_config(&cli(&[
            "--upstream-url",
            "http://127.0.0.1:9/api.php",
            "--upstream-origin",
            "http://127.0.0.1:9",
        ]));
        assert_eq!(config.base_url(), "http://127.0.0.1:9/api.php");
        assert_eq!(config.profile().origin, "http://127.0.0.1:9");
    }

    #[test]
    fn test_gateway_defaults() {
        let config = gateway_config(&cli(&[]));
        assert_eq!(config.default_model(), "z-image-turbo");
        assert_eq!(config.models().len(), 2);
    }

    #[test]
    fn test_models_override() {
        let config = gateway_config(&cli(&["--models", "flux, z-image-turbo"]));
        assert_eq!(config.default_model(), "flux");
        assert_eq!(config.models(), ["flux", "z-image-turbo"]);
    }

    #[test]
    fn test_build_context() {
        let ctx = build_context(&cli(&["--poll-interval-ms", "100"])).unwrap();
        assert_eq!(ctx.config().default_model(), "z-image-turbo");
    }

    #[test]
    fn test_bad_upstream_url_fails() {
        let result = build_context(&cli(&["--upstream-url", "not a url"]));
        assert!(result.is_err());
    }

    #[test]
    fn test_poll_flags_are_durations() {
        let parsed = cli(&["--poll-timeout-secs", "5"]);
        assert_eq!(parsed.poll_timeout(), Some(Duration::from_secs(5)));
    }
}
