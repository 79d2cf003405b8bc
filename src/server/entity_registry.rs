//! Entity registry mapping URL paths to handler groups

use super::state::AppState;
use axum::Router;

/// Trait that describes how to build routes for an entity group
///
/// Each group (roles, tenants, provider users, ...) implements this trait
/// to provide its routes relative to its own base path.
pub trait EntityDescriptor: Send + Sync {
    /// The entity type name (singular, e.g., "role")
    fn entity_type(&self) -> &str;

    /// Path segment the group is mounted at (e.g., "/roles")
    fn base_path(&self) -> &str;

    /// Build the routes for this group
    ///
    /// Routes are relative to [`base_path`](Self::base_path):
    /// - `/` for the collection
    /// - `/{id}` for a single record
    fn build_routes(&self) -> Router<AppState>;
}

struct Registration {
    full_path: String,
    descriptor: Box<dyn EntityDescriptor>,
}

/// Registry for all entity groups in the application
///
/// Groups are mounted at `parent path + base path`. A second registration of
/// an already registered full path is ignored.
#[derive(Default)]
pub struct EntityRegistry {
    registrations: Vec<Registration>,
}

impl EntityRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            registrations: Vec::new(),
        }
    }

    /// Register a descriptor at the top level
    pub fn register(&mut self, descriptor: Box<dyn EntityDescriptor>) -> &mut Self {
        self.register_under("", descriptor)
    }

    /// Register a descriptor nested under `parent` (e.g. "/provider-users")
    pub fn register_under(&mut self, parent: &str, descriptor: Box<dyn EntityDescriptor>) -> &mut Self {
        let full_path = join_paths(parent, descriptor.base_path());

        if self.registrations.iter().any(|r| r.full_path == full_path) {
            tracing::warn!(
                path = %full_path,
                entity = descriptor.entity_type(),
                "path already registered, ignoring"
            );
            return self;
        }

        tracing::debug!(path = %full_path, entity = descriptor.entity_type(), "registered routes");
        self.registrations.push(Registration {
            full_path,
            descriptor,
        });
        self
    }

    /// Build a router with every registered group mounted under `prefix`
    pub fn build_routes(&self, prefix: &str) -> Router<AppState> {
        self.registrations
            .iter()
            .fold(Router::new(), |router, registration| {
                let path = join_paths(prefix, &registration.full_path);
                router.nest(&path, registration.descriptor.build_routes())
            })
    }

    /// Full paths of every registered group, in registration order
    pub fn paths(&self) -> Vec<&str> {
        self.registrations.iter().map(|r| r.full_path.as_str()).collect()
    }

    /// Get all registered entity types
    pub fn entity_types(&self) -> Vec<&str> {
        self.registrations
            .iter()
            .map(|r| r.descriptor.entity_type())
            .collect()
    }
}

/// Join path fragments with exactly one slash between them
fn join_paths(parent: &str, child: &str) -> String {
    let parent = parent.trim_end_matches('/');
    let child = child.trim_matches('/');
    match (parent.is_empty(), child.is_empty()) {
        (true, true) => "/".to_string(),
        (true, false) => format!("/{}", child),
        (false, true) => parent.to_string(),
        (false, false) => format!("{}/{}", parent, child),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::get;

    /// Minimal descriptor for testing
    struct MockDescriptor {
        entity_type: &'static str,
        base_path: &'static str,
        body: &'static str,
    }

    impl EntityDescriptor for MockDescriptor {
        fn entity_type(&self) -> &str {
            self.entity_type
        }

        fn base_path(&self) -> &str {
            self.base_path
        }

        fn build_routes(&self) -> Router<AppState> {
            let body = self.body;
            Router::new().route("/", get(move || async move { body }))
        }
    }

    fn mock(entity_type: &'static str, base_path: &'static str, body: &'static str) -> Box<dyn EntityDescriptor> {
        Box::new(MockDescriptor {
            entity_type,
            base_path,
            body,
        })
    }

    #[test]
    fn test_new_registry_is_empty() {
        let registry = EntityRegistry::new();
        assert!(registry.entity_types().is_empty());
    }

    #[test]
    fn test_nested_paths_compose() {
        let mut registry = EntityRegistry::new();
        registry
            .register(mock("role", "/roles", "roles"))
            .register_under("/provider-users", mock("provider_user", "users", "users"));

        assert_eq!(registry.paths(), vec!["/roles", "/provider-users/users"]);
    }

    #[test]
    fn test_first_registration_wins() {
        let mut registry = EntityRegistry::new();
        registry
            .register(mock("role", "/roles", "first"))
            .register(mock("role_v2", "roles/", "second"));

        assert_eq!(registry.entity_types(), vec!["role"]);
    }

    #[test]
    fn test_join_paths() {
        assert_eq!(join_paths("/api", "/roles"), "/api/roles");
        assert_eq!(join_paths("/api/", "roles"), "/api/roles");
        assert_eq!(join_paths("", "/roles"), "/roles");
        assert_eq!(join_paths("", ""), "/");
    }

    #[tokio::test]
    async fn test_routes_mounted_under_prefix() {
        let mut registry = EntityRegistry::new();
        registry
            .register(mock("role", "/roles", "first"))
            .register(mock("role_v2", "/roles", "second"));

        let app = registry
            .build_routes("/api")
            .with_state(AppState::in_memory());
        let server = axum_test::TestServer::new(app).unwrap();

        let response = server.get("/api/roles").await;
        response.assert_status_ok();
        response.assert_text("first");
    }
}
