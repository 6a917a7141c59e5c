use utoipa::OpenApi;

use crate::handlers;
use crate::models::{
    AddSectionRequest, CreatePageRequest, Endpoints, Page, PageMetadata, Section,
    ServiceInfo, Stats,
};
use crate::response::{ErrorResponse, MessageResponse};

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "docs-kv-api",
        version = "1.0.0",
        description = "Documentation pages and site configuration kept in a key-value store. \
                       Routes under /api/admin require the X-API-Key header."
    ),
    paths(
        handlers::health::health_handler,
        handlers::pages::list_pages_handler,
        handlers::pages::get_page_handler,
        handlers::config::get_config_handler,
        handlers::config::update_config_handler,
        handlers::admin::create_page_handler,
        handlers::admin::update_page_handler,
        handlers::admin::delete_page_handler,
        handlers::admin::add_section_handler,
        handlers::admin::stats_handler
    ),
    components(
        schemas(
            Page,
            PageMetadata,
            Section,
            CreatePageRequest,
            AddSectionRequest,
            Stats,
            ServiceInfo,
            Endpoints,
            ErrorResponse,
            MessageResponse
        )
    ),
    tags(
        (name = "health", description = "Service descriptor"),
        (name = "pages", description = "Public page reads"),
        (name = "config", description = "Site configuration"),
        (name = "admin", description = "Authenticated content management")
    )
)]
pub struct ApiDoc;
