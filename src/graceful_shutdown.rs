//! Graceful shutdown

use std::future::pending;

use tokio::signal;

/// Resolves once the user asks to leave
///
/// Listens to Ctrl+C and, on Unix, to `SIGTERM`. A signal that can not be
/// listened to is logged and never fires.
pub async fn handler() {
    let interrupt = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!("Could not listen for Ctrl+C: {err}");
            pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
            }
            Err(err) => {
                tracing::error!("Could not listen for SIGTERM: {err}");
                pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = pending::<()>();

    tokio::select! {
        () = interrupt => {},
        () = terminate => {},
    }

    tracing::info!("Leaving the form");
}
