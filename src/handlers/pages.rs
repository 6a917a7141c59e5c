use crate::content;
use crate::error::ApiError;
use crate::models::{Page, Pages};
use crate::response::{Envelope, ErrorResponse};
use crate::routes;
use crate::state::AppState;
use axum::extract::{Path, State};

/// GET /api/pages handler - All pages keyed by storage name
#[utoipa::path(
    get,
    path = routes::PAGES,
    responses(
        (status = 200, description = "Every page, keyed by storage name", body = serde_json::Value),
        (status = 500, description = "Store error", body = ErrorResponse)
    ),
    tag = "pages"
)]
pub async fn list_pages_handler(
    State(state): State<AppState>,
) -> Result<Envelope<Pages>, ApiError> {
    let pages = state.store.load_pages().await?;

    tracing::info!("Listed {} pages", pages.len());
    Ok(Envelope::data(pages))
}

/// GET /api/pages/{id} handler - A single page by its id
#[utoipa::path(
    get,
    path = routes::PAGE,
    params(
        ("id" = String, Path, description = "Page id (not the storage key)")
    ),
    responses(
        (status = 200, description = "Page found", body = Envelope<Page>),
        (status = 404, description = "Page not found", body = ErrorResponse),
        (status = 500, description = "Store error", body = ErrorResponse)
    ),
    tag = "pages"
)]
pub async fn get_page_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Envelope<Page>, ApiError> {
    let pages = state.store.load_pages().await?;

    let page = content::find_page(&pages, &id)
        .cloned()
        .ok_or(ApiError::PageNotFound(id))?;

    tracing::info!("Retrieved page with id: {}", page.id);
    Ok(Envelope::data(page))
}

#[cfg(test)]
mod tests {
    use crate::handlers::test_support::{admin, public, setup_test_app};
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_list_pages_serves_defaults_on_empty_store() {
        let (app, memory) = setup_test_app();

        let (status, body) = public(&app, "/api/pages").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        let pages = body["data"].as_object().unwrap();
        assert_eq!(pages.len(), 8);
        assert_eq!(pages["general"]["id"], "gen");
        assert!(memory.get("pages").await.is_none());
    }

    #[tokio::test]
    async fn test_get_page_by_id_not_storage_key() {
        let (app, _) = setup_test_app();

        let (status, body) = public(&app, "/api/pages/eco").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["title"], "💰 Économie");

        let (status, body) = public(&app, "/api/pages/economy").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Page non trouvée");
    }

    #[tokio::test]
    async fn test_created_page_is_retrievable() {
        let (app, _) = setup_test_app();

        let (status, _) = admin(
            &app,
            "POST",
            "/api/admin/pages/create",
            Some(r#"{"id":"faq","title":"FAQ"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = public(&app, "/api/pages/faq").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["title"], "FAQ");
        assert_eq!(body["data"]["version"], "1.0");
        assert!(body["data"]["metadata"]["created"].is_string());

        let (_, body) = public(&app, "/api/pages").await;
        assert_eq!(body["data"].as_object().unwrap().len(), 9);
    }
}
