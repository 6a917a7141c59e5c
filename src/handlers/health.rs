use crate::models::{Endpoints, ServiceInfo};
use crate::routes;
use axum::Json;

/// GET / and GET /health - Static service descriptor
///
/// Lists the public and admin endpoints. Does not touch the store.
#[utoipa::path(
    get,
    path = routes::HEALTH,
    responses(
        (status = 200, description = "Service is online", body = ServiceInfo)
    ),
    tag = "health"
)]
pub async fn health_handler() -> Json<ServiceInfo> {
    tracing::debug!("Serving service descriptor");
    Json(service_info())
}

pub fn service_info() -> ServiceInfo {
    ServiceInfo {
        status: "online".to_string(),
        service: "Manage Admin API".to_string(),
        version: "1.0.0".to_string(),
        endpoints: Endpoints {
            public: to_strings(&[routes::HEALTH, routes::PAGES, routes::CONFIG]),
            admin: to_strings(&[
                "/api/admin/pages",
                routes::ADMIN_CONFIG,
                routes::ADMIN_CREATE_PAGE,
            ]),
        },
    }
}

fn to_strings(paths: &[&str]) -> Vec<String> {
    paths.iter().map(|p| p.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use crate::handlers::test_support::{public, setup_test_app};
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_health_endpoint() {
        let (app, _) = setup_test_app();

        for uri in ["/", "/health"] {
            let (status, body) = public(&app, uri).await;

            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["status"], "online");
            assert_eq!(body["service"], "Manage Admin API");
            assert_eq!(body["version"], "1.0.0");
            assert_eq!(body["endpoints"]["public"][1], "/api/pages");
            assert_eq!(body["endpoints"]["admin"][2], "/api/admin/pages/create");
        }
    }
}
