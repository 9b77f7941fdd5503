//! CORS layer configuration.

use std::time::Duration;

use axum::http::{HeaderName, HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};

use roster_core::config::CorsConfig;

/// Builds a CORS tower layer from configuration.
pub fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    let mut layer = CorsLayer::new();

    let any_origin = config.allowed_origins.iter().any(|o| o == "*");
    let any_header = config.allowed_headers.iter().any(|h| h == "*");

    // Origins
    if any_origin {
        layer = layer.allow_origin(Any);
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        layer = layer.allow_origin(origins);
    }

    // Methods
    let methods: Vec<Method> = config
        .allowed_methods
        .iter()
        .filter_map(|m| m.parse().ok())
        .collect();
    layer = layer.allow_methods(methods);

    // Headers
    if any_header {
        layer = layer.allow_headers(Any);
    } else {
        let headers: Vec<HeaderName> = config
            .allowed_headers
            .iter()
            .filter_map(|h| h.parse().ok())
            .collect();
        layer = layer.allow_headers(headers);
    }

    // Browsers only send the session cookie cross-origin with credentials,
    // which tower-http refuses to combine with wildcards.
    if !any_origin && !any_header {
        layer = layer.allow_credentials(true);
    }

    layer.max_age(Duration::from_secs(config.max_age_seconds))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wildcard_and_explicit_configs_build() {
        let _ = build_cors_layer(&CorsConfig::default());

        let explicit = CorsConfig {
            allowed_origins: vec!["https://app.example.com".to_string()],
            allowed_headers: vec!["content-type".to_string(), "authorization".to_string()],
            ..CorsConfig::default()
        };
        let _ = build_cors_layer(&explicit);
    }
}
