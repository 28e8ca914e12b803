//! OS signal handling.
//!
//! - SIGINT (Ctrl-C) and, on Unix, SIGTERM resolve [`wait_for_termination`]
//! - SIGHUP triggers a breaker settings reload, not shutdown

/// Wait until the process is asked to terminate.
pub async fn wait_for_termination() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received SIGINT"),
        _ = terminate => tracing::info!("Received SIGTERM"),
    }
}

/// Call `on_reload` for every SIGHUP until shutdown is signalled.
///
/// No-op on platforms without SIGHUP.
pub async fn reload_on_hangup<F>(on_reload: F, mut shutdown: tokio::sync::broadcast::Receiver<()>)
where
    F: Fn() + Send + 'static,
{
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut hangup = match signal(SignalKind::hangup()) {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGHUP");
                return;
            }
        };

        loop {
            tokio::select! {
                _ = hangup.recv() => {
                    tracing::info!("Received SIGHUP, reloading breaker settings");
                    on_reload();
                }
                _ = shutdown.recv() => break,
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = on_reload;
        let _ = shutdown.recv().await;
    }
}
