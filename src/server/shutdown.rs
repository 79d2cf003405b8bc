//! Shutdown signalling
//!
//! The server stops on SIGINT, SIGTERM or a [`ShutdownTrigger`]. The panic
//! hook installed by [`install_panic_hook`] fires the trigger for panics
//! outside request handling (background tasks, driver threads); a handler
//! panic is answered with a 500 by the catch-panic layer instead.

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use std::sync::Arc;
use tokio::sync::Notify;

tokio::task_local! {
    static REQUEST_SCOPE: ();
}

/// Middleware marking everything polled inside it as request handling
pub async fn request_scope(request: Request, next: Next) -> Response {
    REQUEST_SCOPE.scope((), next.run(request)).await
}

fn in_request() -> bool {
    REQUEST_SCOPE.try_with(|_| ()).is_ok()
}

/// One-shot request to stop serving. Clones share the same signal.
#[derive(Debug, Clone, Default)]
pub struct ShutdownTrigger(Arc<Notify>);

impl ShutdownTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the server to shut down. Remembered if nobody is waiting yet.
    pub fn trigger(&self) {
        self.0.notify_one();
    }

    pub async fn triggered(&self) {
        self.0.notified().await;
    }
}

/// Panics outside request handling are logged as critical and fire `trigger`.
pub fn install_panic_hook(trigger: ShutdownTrigger) {
    std::panic::set_hook(Box::new(move |info| {
        if in_request() {
            return;
        }
        tracing::error!(panic = %info, "critical error: unhandled panic, shutting down");
        trigger.trigger();
    }));
}

/// Wait for SIGTERM, Ctrl+C or the trigger
pub async fn shutdown_signal(trigger: Option<ShutdownTrigger>) {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let triggered = async {
        match trigger {
            Some(trigger) => trigger.triggered().await,
            None => std::future::pending::<()>().await,
        }
    };

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
        _ = triggered => {
            tracing::warn!("Shutdown requested after an unrecoverable error, draining requests...");
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_trigger_before_wait_is_remembered() {
        let trigger = ShutdownTrigger::new();
        trigger.clone().trigger();

        tokio::time::timeout(Duration::from_secs(1), shutdown_signal(Some(trigger)))
            .await
            .expect("shutdown signal should resolve");
    }

    #[tokio::test]
    async fn test_request_scope_is_visible_inside_only() {
        assert!(!in_request());
        REQUEST_SCOPE.scope((), async { assert!(in_request()) }).await;
    }
}
