use axum::{http::Method, middleware, Router};
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};

use crate::{
  domains::inquiry::rest::inquiry_routes, middleware::background::run_background_tasks, state::SharedAppState,
};

pub fn create_app(state: SharedAppState) -> Router {
  Router::new()
    .merge(inquiry_routes())
    .layer(middleware::from_fn(run_background_tasks))
    .layer(cors_layer())
    .with_state(state)
}

/// Any origin and any request header, POST only, with credentials.
///
/// A literal `*` cannot be combined with credentials, so origin and headers are
/// echoed back from the request instead.
pub fn cors_layer() -> CorsLayer {
  CorsLayer::new()
    .allow_origin(AllowOrigin::mirror_request())
    .allow_methods([Method::POST])
    .allow_headers(AllowHeaders::mirror_request())
    .allow_credentials(true)
}
