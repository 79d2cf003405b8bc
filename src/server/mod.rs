//! HTTP server assembly
//!
//! `ServerBuilder` mounts every registered entity group under the API
//! prefix and wraps the router with tracing, panic recovery and CORS.
//! Panics outside request handling trigger a graceful shutdown.

pub mod builder;
pub mod cors;
pub mod entity_registry;
pub mod shutdown;
pub mod state;

pub use builder::ServerBuilder;
pub use cors::{OriginPolicy, cors_layer};
pub use entity_registry::{EntityDescriptor, EntityRegistry};
pub use shutdown::{ShutdownTrigger, install_panic_hook};
pub use state::AppState;
