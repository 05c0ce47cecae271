//! Axum HTTP server for the gateway.

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::info;

use crate::routes::create_router;
use crate::state::GatewayContext;

/// Run the gateway on a pre-bound listener until `cancel` fires.
///
/// After the listener stops accepting and in-flight requests finish, waits
/// for every background streaming task before returning.
pub async fn serve(
    listener: TcpListener,
    ctx: GatewayContext,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let addr = listener.local_addr()?;
    let tracker: TaskTracker = ctx.tracker().clone();
    let app = create_router(ctx);

    info!("Gateway listening on {addr}");
    info!("Point OpenAI clients at: http://{addr}/v1");

    axum::serve(listener, app)
        .with_graceful_shutdown(cancel.cancelled_owned())
        .await?;

    tracker.close();
    if !tracker.is_empty() {
        info!(pending = tracker.len(), "Waiting for background streams");
    }
    tracker.wait().await;

    info!("Gateway shut down");
    Ok(())
}
