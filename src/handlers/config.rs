use crate::auth::AdminKey;
use crate::content;
use crate::error::ApiError;
use crate::handlers::parse_body;
use crate::models::SiteConfig;
use crate::response::{Envelope, ErrorResponse};
use crate::routes;
use crate::state::AppState;
use axum::body::Bytes;
use axum::extract::State;
use chrono::Utc;
use serde_json::Value as JsonValue;

/// GET /api/config handler - Public site configuration
#[utoipa::path(
    get,
    path = routes::CONFIG,
    responses(
        (status = 200, description = "Current configuration", body = serde_json::Value),
        (status = 500, description = "Store error", body = ErrorResponse)
    ),
    tag = "config"
)]
pub async fn get_config_handler(
    State(state): State<AppState>,
) -> Result<Envelope<SiteConfig>, ApiError> {
    let config = state.store.load_config().await?;
    Ok(Envelope::data(config))
}

/// PUT /api/admin/config handler - Merge fields into the configuration
///
/// Top-level keys of the body overwrite the stored ones; `lastUpdate` is set
/// to the current time.
#[utoipa::path(
    put,
    path = routes::ADMIN_CONFIG,
    params(
        ("X-API-Key" = String, Header, description = "Admin API key")
    ),
    request_body = serde_json::Value,
    responses(
        (status = 200, description = "Configuration updated", body = serde_json::Value),
        (status = 400, description = "Body is not a JSON object", body = ErrorResponse),
        (status = 401, description = "Missing or invalid API key", body = ErrorResponse),
        (status = 500, description = "Malformed JSON or store error", body = ErrorResponse)
    ),
    tag = "admin"
)]
pub async fn update_config_handler(
    _admin: AdminKey,
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Envelope<SiteConfig>, ApiError> {
    let body: JsonValue = parse_body(&body)?;

    let mut config = state.store.load_config().await?;
    content::merge_config(&mut config, body, Utc::now())?;
    state.store.save_config(&config).await?;

    tracing::info!("Updated configuration ({} keys)", config.len());
    Ok(Envelope::data(config).with_message("Configuration mise à jour"))
}

#[cfg(test)]
mod tests {
    use crate::handlers::test_support::{admin, public, request, send, setup_test_app};
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_get_config_defaults() {
        let (app, _) = setup_test_app();

        let (status, body) = public(&app, "/api/config").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["botName"], "Manage");
        assert_eq!(body["data"]["version"], "1.6");
    }

    #[tokio::test]
    async fn test_update_config_merges_and_stamps() {
        let (app, _) = setup_test_app();

        let (status, body) = admin(
            &app,
            "PUT",
            "/api/admin/config",
            Some(r##"{"primaryColor":"#000000","motd":"salut"}"##),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Configuration mise à jour");
        assert_eq!(body["data"]["primaryColor"], "#000000");
        assert_eq!(body["data"]["botName"], "Manage");
        assert!(body["data"]["lastUpdate"].is_string());

        let (_, body) = public(&app, "/api/config").await;
        assert_eq!(body["data"]["motd"], "salut");
        assert_eq!(body["data"]["primaryColor"], "#000000");
    }

    #[tokio::test]
    async fn test_update_config_requires_key() {
        let (app, memory) = setup_test_app();

        let (status, body) = send(
            &app,
            request("PUT", "/api/admin/config", Some("wrong"), Some(r#"{"botName":"X"}"#)),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Non autorisé - Clé API invalide");
        assert!(memory.get("config").await.is_none());
    }

    #[tokio::test]
    async fn test_update_config_malformed_json() {
        let (app, memory) = setup_test_app();

        let (status, body) = admin(&app, "PUT", "/api/admin/config", Some("{oops")).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["success"], false);
        assert!(!body["error"].as_str().unwrap().is_empty());
        assert!(memory.get("config").await.is_none());
    }
}
