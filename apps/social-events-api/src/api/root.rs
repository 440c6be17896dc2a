use axum::{Router, routing::get};

pub const GREETING: &str = "Hello World!";

pub fn router() -> Router {
    Router::new().route("/", get(|| async { GREETING }))
}
