//! Admin page routes. Every handler takes [`AdminKey`] first, so a missing or
//! wrong key is rejected before the body is read or the store is touched.

use crate::auth::AdminKey;
use crate::content;
use crate::error::ApiError;
use crate::handlers::parse_body;
use crate::models::{AddSectionRequest, CreatePageRequest, Page, Stats};
use crate::response::{Envelope, ErrorResponse, MessageResponse};
use crate::routes;
use crate::state::AppState;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use chrono::Utc;
use serde_json::Value as JsonValue;

/// POST /api/admin/pages/create handler - Create a page
#[utoipa::path(
    post,
    path = routes::ADMIN_CREATE_PAGE,
    params(
        ("X-API-Key" = String, Header, description = "Admin API key")
    ),
    request_body = CreatePageRequest,
    responses(
        (status = 201, description = "Page created", body = Envelope<Page>),
        (status = 400, description = "Missing id or title", body = ErrorResponse),
        (status = 401, description = "Missing or invalid API key", body = ErrorResponse),
        (status = 409, description = "A page with this id already exists", body = ErrorResponse),
        (status = 500, description = "Malformed JSON or store error", body = ErrorResponse)
    ),
    tag = "admin"
)]
pub async fn create_page_handler(
    _admin: AdminKey,
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Envelope<Page>), ApiError> {
    let request: CreatePageRequest = parse_body(&body)?;

    let mut pages = state.store.load_pages().await?;
    let page = content::create_page(&mut pages, request, Utc::now())?;
    state.store.save_pages(&pages).await?;

    tracing::info!("Created page with id: {}", page.id);
    Ok((
        StatusCode::CREATED,
        Envelope::data(page).with_message("Page créée avec succès"),
    ))
}

/// PUT /api/admin/pages/{id} handler - Merge fields into a page
///
/// Top-level keys of the body replace the stored ones wholesale. Stored
/// metadata is kept apart from `lastUpdate`.
#[utoipa::path(
    put,
    path = routes::ADMIN_PAGE,
    params(
        ("id" = String, Path, description = "Page id"),
        ("X-API-Key" = String, Header, description = "Admin API key")
    ),
    request_body = serde_json::Value,
    responses(
        (status = 200, description = "Page updated", body = Envelope<Page>),
        (status = 400, description = "Body is not an object or its id is not a string", body = ErrorResponse),
        (status = 401, description = "Missing or invalid API key", body = ErrorResponse),
        (status = 404, description = "Page not found", body = ErrorResponse),
        (status = 409, description = "New id belongs to another page", body = ErrorResponse),
        (status = 500, description = "Malformed JSON or store error", body = ErrorResponse)
    ),
    tag = "admin"
)]
pub async fn update_page_handler(
    _admin: AdminKey,
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Envelope<Page>, ApiError> {
    let body: JsonValue = parse_body(&body)?;

    let mut pages = state.store.load_pages().await?;
    let page = content::update_page(&mut pages, &id, body, Utc::now())?;
    state.store.save_pages(&pages).await?;

    tracing::info!("Updated page with id: {}", id);
    Ok(Envelope::data(page).with_message("Page mise à jour avec succès"))
}

/// DELETE /api/admin/pages/{id} handler - Remove a page
#[utoipa::path(
    delete,
    path = routes::ADMIN_PAGE,
    params(
        ("id" = String, Path, description = "Page id"),
        ("X-API-Key" = String, Header, description = "Admin API key")
    ),
    responses(
        (status = 200, description = "Page deleted", body = MessageResponse),
        (status = 401, description = "Missing or invalid API key", body = ErrorResponse),
        (status = 404, description = "Page not found", body = ErrorResponse),
        (status = 500, description = "Store error", body = ErrorResponse)
    ),
    tag = "admin"
)]
pub async fn delete_page_handler(
    _admin: AdminKey,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<MessageResponse, ApiError> {
    let mut pages = state.store.load_pages().await?;
    content::delete_page(&mut pages, &id)?;
    state.store.save_pages(&pages).await?;

    tracing::info!("Deleted page with id: {}", id);
    Ok(MessageResponse::new("Page supprimée avec succès"))
}

/// POST /api/admin/pages/{id}/section handler - Append a section to a page
#[utoipa::path(
    post,
    path = routes::ADMIN_PAGE_SECTION,
    params(
        ("id" = String, Path, description = "Page id"),
        ("X-API-Key" = String, Header, description = "Admin API key")
    ),
    request_body = AddSectionRequest,
    responses(
        (status = 200, description = "Section added", body = Envelope<Page>),
        (status = 400, description = "Missing section title or content", body = ErrorResponse),
        (status = 401, description = "Missing or invalid API key", body = ErrorResponse),
        (status = 404, description = "Page not found", body = ErrorResponse),
        (status = 500, description = "Malformed JSON or store error", body = ErrorResponse)
    ),
    tag = "admin"
)]
pub async fn add_section_handler(
    _admin: AdminKey,
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Envelope<Page>, ApiError> {
    let request: AddSectionRequest = parse_body(&body)?;

    let mut pages = state.store.load_pages().await?;
    let page = content::add_section(&mut pages, &id, request, Utc::now())?;
    state.store.save_pages(&pages).await?;

    tracing::info!("Added section to page with id: {}", id);
    Ok(Envelope::data(page).with_message("Section ajoutée avec succès"))
}

/// GET /api/admin/stats handler - Page count, version and latest update
#[utoipa::path(
    get,
    path = routes::ADMIN_STATS,
    params(
        ("X-API-Key" = String, Header, description = "Admin API key")
    ),
    responses(
        (status = 200, description = "Statistics", body = Envelope<Stats>),
        (status = 401, description = "Missing or invalid API key", body = ErrorResponse),
        (status = 500, description = "Store error", body = ErrorResponse)
    ),
    tag = "admin"
)]
pub async fn stats_handler(
    _admin: AdminKey,
    State(state): State<AppState>,
) -> Result<Envelope<Stats>, ApiError> {
    let pages = state.store.load_pages().await?;
    let config = state.store.load_config().await?;

    let stats = content::stats(&pages, &config);
    tracing::info!("Computed stats over {} pages", stats.total_pages);
    Ok(Envelope::data(stats))
}

#[cfg(test)]
mod tests {
    use crate::handlers::test_support::{admin, public, request, send, setup_test_app};
    use crate::store::MemoryStore;
    use axum::http::StatusCode;
    use serde_json::json;

    async fn create_faq(app: &axum::Router) {
        let (status, _) = admin(
            app,
            "POST",
            "/api/admin/pages/create",
            Some(r#"{"id":"faq","title":"FAQ"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_create_page_example() {
        let (app, _) = setup_test_app();

        let (status, body) = admin(
            &app,
            "POST",
            "/api/admin/pages/create",
            Some(r#"{"id":"faq","title":"FAQ"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Page créée avec succès");
        assert_eq!(body["data"]["id"], "faq");
        assert_eq!(body["data"]["version"], "1.0");
        assert_eq!(body["data"]["content"], json!({}));
        assert_eq!(
            body["data"]["metadata"]["created"],
            body["data"]["metadata"]["lastUpdate"]
        );
    }

    #[tokio::test]
    async fn test_create_page_keeps_given_version_and_content() {
        let (app, _) = setup_test_app();

        let (status, body) = admin(
            &app,
            "POST",
            "/api/admin/pages/create",
            Some(r#"{"id":"faq","title":"FAQ","version":"2.1","content":{"intro":"Bonjour"}}"#),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["version"], "2.1");
        assert_eq!(body["data"]["content"]["intro"], "Bonjour");
    }

    #[tokio::test]
    async fn test_create_page_keeps_non_string_values() {
        let (app, _) = setup_test_app();

        let (status, body) = admin(
            &app,
            "POST",
            "/api/admin/pages/create",
            Some(r#"{"id":"faq","title":"FAQ","version":3,"content":{"sections":[{"text":"x"}]}}"#),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["version"], 3);
        assert_eq!(body["data"]["content"]["sections"][0]["text"], "x");
    }

    #[tokio::test]
    async fn test_create_page_requires_id_and_title() {
        let (app, memory) = setup_test_app();

        for body in [r#"{"title":"FAQ"}"#, r#"{"id":"faq"}"#, r#"{"id":"","title":"FAQ"}"#] {
            let (status, response) = admin(&app, "POST", "/api/admin/pages/create", Some(body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(response["error"], "ID et titre requis");
        }
        assert!(memory.get("pages").await.is_none());
    }

    #[tokio::test]
    async fn test_create_duplicate_page_leaves_store_unchanged() {
        let (app, memory) = setup_test_app();
        create_faq(&app).await;
        let before = memory.get("pages").await;

        let (status, body) = admin(
            &app,
            "POST",
            "/api/admin/pages/create",
            Some(r#"{"id":"faq","title":"Autre"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "Cette page existe déjà");
        assert_eq!(memory.get("pages").await, before);

        // ids of the default pages count too, not only storage keys
        let (status, _) = admin(
            &app,
            "POST",
            "/api/admin/pages/create",
            Some(r#"{"id":"gen","title":"Général bis"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_create_page_malformed_json() {
        let (app, memory) = setup_test_app();

        let (status, body) = admin(&app, "POST", "/api/admin/pages/create", Some("{\"id\":")).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["success"], false);
        assert!(body["error"].is_string());
        assert!(memory.get("pages").await.is_none());
    }

    #[tokio::test]
    async fn test_update_page_changes_only_title_and_last_update() {
        let (app, _) = setup_test_app();
        create_faq(&app).await;
        let (_, before) = public(&app, "/api/pages/faq").await;

        let (status, body) = admin(&app, "PUT", "/api/admin/pages/faq", Some(r#"{"title":"New"}"#)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Page mise à jour avec succès");
        let after = &body["data"];
        let before = &before["data"];
        assert_eq!(after["title"], "New");
        assert_eq!(after["version"], before["version"]);
        assert_eq!(after["content"], before["content"]);
        assert_eq!(after["metadata"]["created"], before["metadata"]["created"]);
        assert!(after["metadata"]["lastUpdate"].as_str() >= before["metadata"]["lastUpdate"].as_str());
    }

    #[tokio::test]
    async fn test_update_default_page_by_id() {
        let (app, memory) = setup_test_app();

        let (status, body) = admin(&app, "PUT", "/api/admin/pages/gen", Some(r#"{"version":"2.0"}"#)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["version"], "2.0");

        let raw = memory.get("pages").await.unwrap();
        let stored: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(stored["general"]["version"], "2.0");
        assert!(stored.get("gen").is_none());
    }

    #[tokio::test]
    async fn test_update_page_stores_null_version() {
        let (app, memory) = setup_test_app();
        create_faq(&app).await;

        let (status, body) = admin(&app, "PUT", "/api/admin/pages/faq", Some(r#"{"version":null}"#)).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["data"].as_object().unwrap().contains_key("version"));
        assert_eq!(body["data"]["version"], serde_json::Value::Null);

        let raw = memory.get("pages").await.unwrap();
        assert!(raw.contains(r#""version":null"#));
    }

    #[tokio::test]
    async fn test_update_page_replaces_content_with_any_shape() {
        let (app, _) = setup_test_app();
        create_faq(&app).await;

        for body in [
            json!({"content": {"sections": [{"text": "x"}]}, "version": 2}),
            json!({"content": null}),
        ] {
            let (status, response) = admin(
                &app,
                "PUT",
                "/api/admin/pages/faq",
                Some(body.to_string().as_str()),
            )
            .await;
            assert_eq!(status, StatusCode::OK, "{}", body);

            let (_, stored) = public(&app, "/api/pages/faq").await;
            for (field, value) in body.as_object().unwrap() {
                assert_eq!(&stored["data"][field], value);
                assert_eq!(&response["data"][field], value);
            }
        }
    }

    #[tokio::test]
    async fn test_section_on_page_without_content_object() {
        let (app, _) = setup_test_app();
        create_faq(&app).await;
        admin(&app, "PUT", "/api/admin/pages/faq", Some(r#"{"content":null}"#)).await;

        let (status, body) = admin(
            &app,
            "POST",
            "/api/admin/pages/faq/section",
            Some(r#"{"sectionTitle":"A","sectionContent":"a"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["content"]["sections"][0]["title"], "A");
    }

    #[tokio::test]
    async fn test_update_unknown_page() {
        let (app, memory) = setup_test_app();

        let (status, body) = admin(&app, "PUT", "/api/admin/pages/nope", Some(r#"{"title":"X"}"#)).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Page non trouvée");
        assert!(memory.get("pages").await.is_none());
    }

    #[tokio::test]
    async fn test_delete_page() {
        let (app, _) = setup_test_app();
        create_faq(&app).await;

        let (status, body) = admin(&app, "DELETE", "/api/admin/pages/faq", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Page supprimée avec succès");
        assert!(body.get("data").is_none());

        let (status, _) = public(&app, "/api/pages/faq").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_unknown_page_leaves_pages_unchanged() {
        let (app, _) = setup_test_app();
        let (_, before) = public(&app, "/api/pages").await;

        let (status, body) = admin(&app, "DELETE", "/api/admin/pages/nope", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Page non trouvée");

        let (_, after) = public(&app, "/api/pages").await;
        assert_eq!(after, before);
    }

    #[tokio::test]
    async fn test_add_two_sections_in_order() {
        let (app, _) = setup_test_app();
        create_faq(&app).await;

        for (title, kind) in [("Premier", None), ("Second", Some("code"))] {
            let body = match kind {
                Some(kind) => json!({"sectionTitle": title, "sectionContent": "...", "sectionType": kind}),
                None => json!({"sectionTitle": title, "sectionContent": "..."}),
            }
            .to_string();
            let (status, response) = admin(
                &app,
                "POST",
                "/api/admin/pages/faq/section",
                Some(body.as_str()),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(response["message"], "Section ajoutée avec succès");
        }

        let (_, body) = public(&app, "/api/pages/faq").await;
        let sections = body["data"]["content"]["sections"].as_array().unwrap();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0]["title"], "Premier");
        assert_eq!(sections[0]["type"], "text");
        assert_eq!(sections[1]["title"], "Second");
        assert_eq!(sections[1]["type"], "code");
        assert_ne!(sections[0]["id"], sections[1]["id"]);
        assert_eq!(body["data"]["metadata"]["lastUpdate"], sections[1]["created"]);
    }

    #[tokio::test]
    async fn test_add_section_to_unknown_page() {
        let (app, _) = setup_test_app();

        let (status, body) = admin(
            &app,
            "POST",
            "/api/admin/pages/nope/section",
            Some(r#"{"sectionTitle":"A","sectionContent":"a"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Page non trouvée");
    }

    async fn seed_pages(memory: &MemoryStore, pages: serde_json::Value) {
        memory.put("pages", pages.to_string()).await;
    }

    #[tokio::test]
    async fn test_stats_latest_update() {
        let (app, memory) = setup_test_app();
        seed_pages(
            &memory,
            json!({
                "a": {"id": "a", "title": "A", "content": {}, "metadata": {"lastUpdate": "2024-01-01T00:00:00Z"}},
                "b": {"id": "b", "title": "B", "content": {}, "metadata": {"lastUpdate": "2024-06-01T00:00:00Z"}}
            }),
        )
        .await;

        let (status, body) = admin(&app, "GET", "/api/admin/stats", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["totalPages"], 2);
        assert_eq!(body["data"]["version"], "1.6");
        assert_eq!(body["data"]["lastUpdate"], "2024-06-01T00:00:00Z");
    }

    #[tokio::test]
    async fn test_stats_without_pages() {
        let (app, memory) = setup_test_app();
        seed_pages(&memory, json!({})).await;

        let (_, body) = admin(&app, "GET", "/api/admin/stats", None).await;

        assert_eq!(body["data"]["totalPages"], 0);
        assert_eq!(body["data"]["lastUpdate"], "1970-01-01T00:00:00.000Z");
    }

    #[tokio::test]
    async fn test_stats_omits_version_when_config_has_none() {
        let (app, memory) = setup_test_app();
        memory.put("config", json!({"botName": "Manage"}).to_string()).await;

        let (status, body) = admin(&app, "GET", "/api/admin/stats", None).await;

        assert_eq!(status, StatusCode::OK);
        assert!(!body["data"].as_object().unwrap().contains_key("version"));
    }

    #[tokio::test]
    async fn test_admin_routes_reject_missing_or_wrong_key() {
        let (app, memory) = setup_test_app();

        let calls = [
            ("POST", "/api/admin/pages/create", Some(r#"{"id":"faq","title":"FAQ"}"#)),
            ("PUT", "/api/admin/pages/gen", Some(r#"{"title":"X"}"#)),
            ("DELETE", "/api/admin/pages/gen", None),
            ("POST", "/api/admin/pages/gen/section", Some(r#"{"sectionTitle":"A","sectionContent":"a"}"#)),
            ("PUT", "/api/admin/config", Some(r#"{"botName":"X"}"#)),
            ("GET", "/api/admin/stats", None),
        ];

        for (method, uri, body) in calls {
            for key in [None, Some("wrong-key")] {
                let (status, response) = send(&app, request(method, uri, key, body)).await;
                assert_eq!(status, StatusCode::UNAUTHORIZED, "{} {}", method, uri);
                assert_eq!(response["success"], false);
                assert_eq!(response["error"], "Non autorisé - Clé API invalide");
            }
        }

        assert!(memory.get("pages").await.is_none());
        assert!(memory.get("config").await.is_none());
    }

    #[tokio::test]
    async fn test_bad_key_wins_over_malformed_body() {
        let (app, _) = setup_test_app();

        let (status, _) = send(
            &app,
            request("POST", "/api/admin/pages/create", None, Some("{broken")),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
