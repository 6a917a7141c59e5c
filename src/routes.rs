// Route path constants - single source of truth for all API paths

pub const ROOT: &str = "/";
pub const HEALTH: &str = "/health";

pub const PAGES: &str = "/api/pages";
pub const PAGE: &str = "/api/pages/{id}";
pub const CONFIG: &str = "/api/config";

/// Every path under this prefix requires the admin key, matched or not
pub const ADMIN_PREFIX: &str = "/api/admin";
pub const ADMIN_CREATE_PAGE: &str = "/api/admin/pages/create";
pub const ADMIN_PAGE: &str = "/api/admin/pages/{id}";
pub const ADMIN_PAGE_SECTION: &str = "/api/admin/pages/{id}/section";
pub const ADMIN_CONFIG: &str = "/api/admin/config";
pub const ADMIN_STATS: &str = "/api/admin/stats";

pub const SWAGGER_UI: &str = "/swagger-ui";
pub const OPENAPI_JSON: &str = "/api-docs/openapi.json";
