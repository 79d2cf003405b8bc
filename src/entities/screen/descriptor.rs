//! Entity descriptor for Screen

use super::handlers::{create_screen, delete_screen, get_screen, list_screens, update_screen};
use crate::server::entity_registry::EntityDescriptor;
use crate::server::state::AppState;
use axum::{Router, routing::get};

/// Descriptor for the Screen entity
pub struct ScreenDescriptor;

impl EntityDescriptor for ScreenDescriptor {
    fn entity_type(&self) -> &str {
        "screen"
    }

    fn base_path(&self) -> &str {
        "/screens"
    }

    fn build_routes(&self) -> Router<AppState> {
        Router::new()
            .route("/", get(list_screens).post(create_screen))
            .route(
                "/{screenId}",
                get(get_screen).put(update_screen).delete(delete_screen),
            )
    }
}
