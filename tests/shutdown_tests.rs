//! Panic handling: handler panics become 500s, other panics stop the server.
//!
//! The panic hook is process-wide, so everything runs in one test.

use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use axum_test::TestServer;
use saas_admin::server::shutdown::shutdown_signal;
use saas_admin::server::{AppState, ServerBuilder, ShutdownTrigger, install_panic_hook};
use std::time::Duration;

async fn boom() -> &'static str {
    panic!("handler failure")
}

#[tokio::test]
async fn test_only_panics_outside_requests_trigger_shutdown() {
    let trigger = ShutdownTrigger::new();
    install_panic_hook(trigger.clone());

    let app = ServerBuilder::new()
        .with_state(AppState::in_memory())
        .with_custom_routes(Router::new().route("/boom", get(boom)))
        .build()
        .unwrap();
    let server = TestServer::new(app).unwrap();

    server
        .get("/boom")
        .await
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert!(
        tokio::time::timeout(Duration::from_millis(100), trigger.triggered())
            .await
            .is_err(),
        "a handler panic must not stop the server"
    );

    let background = std::thread::spawn(|| panic!("background failure"));
    assert!(background.join().is_err());

    tokio::time::timeout(Duration::from_secs(1), shutdown_signal(Some(trigger)))
        .await
        .expect("a background panic should request shutdown");

    let _ = std::panic::take_hook();
}
