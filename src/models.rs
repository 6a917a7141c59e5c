use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// All pages, keyed by storage name (not necessarily the page id)
pub type Pages = IndexMap<String, Page>;

/// Flat site configuration (bot name, version, colours, ...)
pub type SiteConfig = IndexMap<String, JsonValue>;

/// A documentation page
///
/// Only `id` and `metadata` are interpreted. Every other top-level field
/// (`title`, `version`, `content`, ...) is kept exactly as written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Page {
    pub id: String,
    #[serde(flatten)]
    pub fields: IndexMap<String, JsonValue>,
    #[serde(default)]
    pub metadata: PageMetadata,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(default)]
    pub last_update: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, JsonValue>,
}

/// An ordered fragment of a page's content, appended to `content.sections`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Section {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(rename = "type")]
    pub section_type: String,
    pub created: String,
}

/// Body of `POST /api/admin/pages/create`
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreatePageRequest {
    pub id: Option<JsonValue>,
    pub title: Option<JsonValue>,
    pub content: Option<JsonValue>,
    pub version: Option<JsonValue>,
}

/// Body of `POST /api/admin/pages/{id}/section`
#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddSectionRequest {
    pub section_title: Option<String>,
    pub section_content: Option<String>,
    pub section_type: Option<String>,
}

/// Response payload of `GET /api/admin/stats`
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_pages: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<JsonValue>,
    pub last_update: String,
}

/// Static descriptor returned by `/` and `/health`
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ServiceInfo {
    pub status: String,
    pub service: String,
    pub version: String,
    pub endpoints: Endpoints,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Endpoints {
    pub public: Vec<String>,
    pub admin: Vec<String>,
}
