//! Application router: routes, fallbacks and the middleware stack.
//!
//! Shared by `main` and the handler tests so both exercise the same layers.

use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, CONTENT_TYPE,
};
use axum::extract::State;
use axum::http::{HeaderMap, HeaderName, HeaderValue, Method, Uri};
use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api_doc::ApiDoc;
use crate::auth::{is_admin_path, AdminKey, API_KEY_HEADER};
use crate::error::ApiError;
use crate::handlers;
use crate::routes;
use crate::state::AppState;

const ALLOWED_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";
const ALLOWED_HEADERS: &str = "Content-Type, X-API-Key";

/// Build the full application [`Router`].
///
/// Layers, outermost first:
///
/// 1. CORS (answers every `OPTIONS` request itself, adds `Allow-Origin: *`)
/// 2. `Allow-Methods` / `Allow-Headers` on every other response
/// 3. Request/response tracing
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(routes::ROOT, get(handlers::health_handler))
        .route(routes::HEALTH, get(handlers::health_handler))
        .route(routes::PAGES, get(handlers::list_pages_handler))
        .route(routes::PAGE, get(handlers::get_page_handler))
        .route(routes::CONFIG, get(handlers::get_config_handler))
        .route(routes::ADMIN_CREATE_PAGE, post(handlers::create_page_handler))
        .route(
            routes::ADMIN_PAGE,
            put(handlers::update_page_handler).delete(handlers::delete_page_handler),
        )
        .route(routes::ADMIN_PAGE_SECTION, post(handlers::add_section_handler))
        .route(routes::ADMIN_CONFIG, put(handlers::update_config_handler))
        .route(routes::ADMIN_STATS, get(handlers::stats_handler))
        .merge(SwaggerUi::new(routes::SWAGGER_UI).url(routes::OPENAPI_JSON, ApiDoc::openapi()))
        .fallback(route_not_found)
        .method_not_allowed_fallback(route_not_found)
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOWED_METHODS),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOWED_HEADERS),
        ))
        .layer(cors_layer())
        .with_state(state)
}

/// Permissive CORS: any origin, the five verbs, and the API key header.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, HeaderName::from_static(API_KEY_HEADER)])
}

/// Unmatched path or method. Under the admin prefix the key is checked
/// first, so a call without a valid key gets 401 rather than 404.
async fn route_not_found(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> ApiError {
    if is_admin_path(uri.path()) {
        if let Err(rejection) = AdminKey::check(&headers, &method, uri.path(), &state) {
            return rejection;
        }
    }
    ApiError::RouteNotFound
}
