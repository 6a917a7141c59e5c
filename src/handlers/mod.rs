pub mod admin;
pub mod config;
pub mod health;
pub mod pages;

pub use admin::{
    add_section_handler, create_page_handler, delete_page_handler, stats_handler,
    update_page_handler,
};
pub use config::{get_config_handler, update_config_handler};
pub use health::health_handler;
pub use pages::{get_page_handler, list_pages_handler};

use axum::body::Bytes;
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// Parse a raw request body as JSON.
///
/// Bodies are taken as bytes rather than through `Json` so that malformed
/// input surfaces as a 500 carrying the parser message, like any other fault.
pub(crate) fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, ApiError> {
    Ok(serde_json::from_slice(body)?)
}
