//! Graceful shutdown handling.

use tokio::signal;

/// Waits for Ctrl-C or, on Unix, SIGTERM.
///
/// If a signal handler cannot be installed the failure is logged and that
/// signal is never reported; the other one still is.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!(%error, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(error) => {
                tracing::error!(%error, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("received Ctrl+C, draining in-flight requests");
        }
        () = terminate => {
            tracing::info!("received SIGTERM, draining in-flight requests");
        }
    }
}
