use axum::http::{HeaderValue, Method, header};
use std::io;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::info;

/// Environment variable holding comma-separated allowed origins.
pub const CORS_ALLOWED_ORIGIN: &str = "CORS_ALLOWED_ORIGIN";

/// Creates a CORS layer restricted to the given origins.
///
/// Allows GET, POST, PUT, DELETE, PATCH and OPTIONS with the
/// Content-Type, Authorization and Accept headers. Preflight results
/// are cached for one hour.
pub fn create_cors_layer(allowed_origins: Vec<HeaderValue>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .max_age(Duration::from_secs(3600))
}

/// Creates a CORS layer that accepts any origin, method and header.
pub fn create_permissive_cors_layer() -> CorsLayer {
    CorsLayer::permissive()
}

/// Builds the CORS layer from `CORS_ALLOWED_ORIGIN`.
///
/// When the variable is unset the layer is permissive, so browser clients
/// on any origin can reach the API. When set, it must hold at least one
/// valid comma-separated origin.
///
/// # Errors
/// Returns `InvalidInput` if the variable is set but empty or contains a
/// value that is not a valid header value.
pub fn cors_layer_from_env() -> io::Result<CorsLayer> {
    let Ok(origins_str) = std::env::var(CORS_ALLOWED_ORIGIN) else {
        info!("{} not set, allowing any origin", CORS_ALLOWED_ORIGIN);
        return Ok(create_permissive_cors_layer());
    };

    let allowed_origins = parse_origins(&origins_str)?;
    info!("CORS configured with allowed origins: {}", origins_str);
    Ok(create_cors_layer(allowed_origins))
}

fn parse_origins(origins_str: &str) -> io::Result<Vec<HeaderValue>> {
    let allowed_origins: Vec<HeaderValue> = origins_str
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<HeaderValue>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Invalid {} value: {}", CORS_ALLOWED_ORIGIN, e),
            )
        })?;

    if allowed_origins.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} cannot be empty", CORS_ALLOWED_ORIGIN),
        ));
    }

    Ok(allowed_origins)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_origins_trims_and_skips_blanks() {
        let origins = parse_origins(" http://localhost:3000 , ,https://example.com").unwrap();
        assert_eq!(origins.len(), 2);
        assert_eq!(origins[0], "http://localhost:3000");
        assert_eq!(origins[1], "https://example.com");
    }

    #[test]
    fn test_parse_origins_rejects_empty() {
        let err = parse_origins(" , ").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn test_cors_layer_from_env_unset_is_permissive() {
        temp_env::with_var_unset(CORS_ALLOWED_ORIGIN, || {
            assert!(cors_layer_from_env().is_ok());
        });
    }

    #[test]
    fn test_cors_layer_from_env_rejects_blank_value() {
        temp_env::with_var(CORS_ALLOWED_ORIGIN, Some(""), || {
            assert!(cors_layer_from_env().is_err());
        });
    }
}
