//! CORS policy: an exact-origin allow-list plus hostname patterns

use crate::config::CorsConfig;
use axum::http::{HeaderName, HeaderValue, Method, header};
use regex::Regex;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Decides whether a browser origin may call the API
#[derive(Debug, Clone)]
pub struct OriginPolicy {
    exact: Vec<String>,
    patterns: Vec<Regex>,
}

impl OriginPolicy {
    /// Compile the configured patterns. Invalid patterns are logged and skipped.
    pub fn from_config(config: &CorsConfig) -> Self {
        let patterns = config
            .origin_patterns
            .iter()
            .filter_map(|raw| match Regex::new(raw) {
                Ok(re) => Some(re),
                Err(e) => {
                    tracing::warn!(pattern = %raw, error = %e, "ignoring invalid CORS origin pattern");
                    None
                }
            })
            .collect();

        Self {
            exact: config.allowed_origins.clone(),
            patterns,
        }
    }

    pub fn allows(&self, origin: &str) -> bool {
        self.exact.iter().any(|o| o == origin) || self.patterns.iter().any(|re| re.is_match(origin))
    }
}

/// Build the CORS layer.
///
/// Disallowed origins receive no CORS headers; the browser then blocks the
/// response.
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let policy = Arc::new(OriginPolicy::from_config(config));

    let allow_origin = AllowOrigin::predicate(move |origin: &HeaderValue, _parts| {
        let Ok(origin) = origin.to_str() else {
            return false;
        };
        let allowed = policy.allows(origin);
        if !allowed {
            tracing::warn!(origin, "CORS request from disallowed origin");
        }
        allowed
    });

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("subdomain"),
        ])
        .allow_credentials(true)
}
