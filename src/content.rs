//! Pure operations over pages and the site configuration.
//!
//! Handlers load a full record from the store, run one of these functions on
//! it, and write the whole record back. Nothing here touches the store.

use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexMap;
use serde_json::{Map, Value as JsonValue};

use crate::error::ApiError;
use crate::models::{
    AddSectionRequest, CreatePageRequest, Page, PageMetadata, Pages, Section, SiteConfig, Stats,
};

pub const DEFAULT_PAGE_VERSION: &str = "1.0";
pub const DEFAULT_SECTION_TYPE: &str = "text";

/// Format a timestamp the way every record stores it: `2024-01-01T00:00:00.000Z`
pub fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn epoch() -> String {
    timestamp(DateTime::<Utc>::UNIX_EPOCH)
}

/// Storage key of the page whose `id` matches, if any.
pub fn find_key<'a>(pages: &'a Pages, id: &str) -> Option<&'a str> {
    pages
        .iter()
        .find(|(_, page)| page.id == id)
        .map(|(key, _)| key.as_str())
}

pub fn find_page<'a>(pages: &'a Pages, id: &str) -> Option<&'a Page> {
    pages.values().find(|page| page.id == id)
}

/// Insert a new page under its own id as storage key.
///
/// `title`, `version` and `content` are stored as given; the last two fall
/// back to `"1.0"` and `{}` when absent or falsy.
pub fn create_page(
    pages: &mut Pages,
    request: CreatePageRequest,
    now: DateTime<Utc>,
) -> Result<Page, ApiError> {
    let id = match request.id {
        Some(JsonValue::String(id)) if !id.is_empty() => Some(id),
        _ => None,
    };
    let (Some(id), Some(title)) = (id, truthy(request.title)) else {
        return Err(ApiError::Validation("ID et titre requis".to_string()));
    };

    if pages.contains_key(&id) || find_page(pages, &id).is_some() {
        return Err(ApiError::Conflict("Cette page existe déjà".to_string()));
    }

    let mut fields = IndexMap::new();
    fields.insert("title".to_string(), title);
    fields.insert(
        "version".to_string(),
        truthy(request.version).unwrap_or_else(|| JsonValue::from(DEFAULT_PAGE_VERSION)),
    );
    fields.insert(
        "content".to_string(),
        truthy(request.content).unwrap_or_else(|| JsonValue::Object(Map::new())),
    );

    let stamp = timestamp(now);
    let page = Page {
        id: id.clone(),
        fields,
        metadata: PageMetadata {
            created: Some(stamp.clone()),
            last_update: stamp,
            ..PageMetadata::default()
        },
    };

    pages.insert(id, page.clone());
    Ok(page)
}

/// Shallow-merge `body` into the page identified by `id`.
///
/// Top-level keys from the body replace the stored ones wholesale, whatever
/// their value. Only a new `id` is checked. The body's `metadata` is ignored:
/// stored metadata is kept and only `lastUpdate` moves.
pub fn update_page(
    pages: &mut Pages,
    id: &str,
    body: JsonValue,
    now: DateTime<Utc>,
) -> Result<Page, ApiError> {
    let key = find_key(pages, id)
        .ok_or_else(|| ApiError::PageNotFound(id.to_string()))?
        .to_string();

    let JsonValue::Object(fields) = body else {
        return Err(ApiError::Validation(
            "Le corps de la requête doit être un objet JSON".to_string(),
        ));
    };

    let mut page = pages[&key].clone();
    for (field, value) in fields {
        match field.as_str() {
            "metadata" => {}
            "id" => {
                let JsonValue::String(new_id) = value else {
                    return Err(ApiError::Validation(
                        "L'identifiant de page doit être une chaîne".to_string(),
                    ));
                };
                page.id = new_id;
            }
            _ => {
                // existing keys keep their position, new ones are appended
                page.fields.insert(field, value);
            }
        }
    }
    page.metadata.last_update = timestamp(now);

    if page.id != id && pages.iter().any(|(other, p)| other != &key && p.id == page.id) {
        return Err(ApiError::Conflict("Cette page existe déjà".to_string()));
    }

    pages.insert(key, page.clone());
    Ok(page)
}

/// Remove the page identified by `id`, returning it.
pub fn delete_page(pages: &mut Pages, id: &str) -> Result<Page, ApiError> {
    let key = find_key(pages, id)
        .ok_or_else(|| ApiError::PageNotFound(id.to_string()))?
        .to_string();

    // shift_remove keeps the remaining pages in insertion order
    pages
        .shift_remove(&key)
        .ok_or_else(|| ApiError::PageNotFound(id.to_string()))
}

/// Append a section to the page identified by `id`.
///
/// A missing or falsy `content` becomes `{}`, a falsy `content.sections`
/// becomes `[]`. Sections already stored are left as they are.
pub fn add_section(
    pages: &mut Pages,
    id: &str,
    request: AddSectionRequest,
    now: DateTime<Utc>,
) -> Result<Page, ApiError> {
    let key = find_key(pages, id)
        .ok_or_else(|| ApiError::PageNotFound(id.to_string()))?
        .to_string();

    let (Some(title), Some(content)) = (request.section_title, request.section_content) else {
        return Err(ApiError::Validation(
            "Titre et contenu de section requis".to_string(),
        ));
    };

    let mut page = pages[&key].clone();
    let page_content = page
        .fields
        .entry("content".to_string())
        .or_insert(JsonValue::Null);
    if !is_truthy(page_content) {
        *page_content = JsonValue::Object(Map::new());
    }
    let JsonValue::Object(page_content) = page_content else {
        return Err(ApiError::Validation(
            "Le contenu de la page doit être un objet".to_string(),
        ));
    };

    let sections = page_content
        .entry("sections")
        .or_insert(JsonValue::Null);
    if !is_truthy(sections) {
        *sections = JsonValue::Array(Vec::new());
    }
    let JsonValue::Array(sections) = sections else {
        return Err(ApiError::Validation(
            "Les sections de la page doivent être une liste".to_string(),
        ));
    };

    let mut millis = now.timestamp_millis();
    let section_id = loop {
        let candidate = millis.to_string();
        let taken = sections
            .iter()
            .any(|s| s.get("id").and_then(JsonValue::as_str) == Some(candidate.as_str()));
        if !taken {
            break candidate;
        }
        millis += 1;
    };

    let stamp = timestamp(now);
    sections.push(serde_json::to_value(Section {
        id: section_id,
        title,
        content,
        section_type: non_empty(request.section_type)
            .unwrap_or_else(|| DEFAULT_SECTION_TYPE.to_string()),
        created: stamp.clone(),
    })?);
    page.metadata.last_update = stamp;

    pages.insert(key, page.clone());
    Ok(page)
}

/// Shallow-merge `body` into the configuration and stamp `lastUpdate`.
pub fn merge_config(
    config: &mut SiteConfig,
    body: JsonValue,
    now: DateTime<Utc>,
) -> Result<(), ApiError> {
    let JsonValue::Object(fields) = body else {
        return Err(ApiError::Validation(
            "Le corps de la requête doit être un objet JSON".to_string(),
        ));
    };

    config.extend(fields);
    config.insert("lastUpdate".to_string(), JsonValue::String(timestamp(now)));
    Ok(())
}

pub fn stats(pages: &Pages, config: &SiteConfig) -> Stats {
    Stats {
        total_pages: pages.len(),
        version: config.get("version").cloned(),
        last_update: latest_update(pages.values().map(|page| &page.metadata)),
    }
}

/// Most recent `lastUpdate` among the given metadata, epoch when none parse.
///
/// Entries are compared as instants; the winning entry's original string is
/// returned unchanged.
pub fn latest_update<'a, I>(metadata: I) -> String
where
    I: IntoIterator<Item = &'a PageMetadata>,
{
    metadata
        .into_iter()
        .filter_map(|meta| {
            DateTime::parse_from_rfc3339(&meta.last_update)
                .ok()
                .map(|at| (at.with_timezone(&Utc), &meta.last_update))
        })
        .max_by_key(|(at, _)| *at)
        .map(|(_, raw)| raw.clone())
        .unwrap_or_else(epoch)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn truthy(value: Option<JsonValue>) -> Option<JsonValue> {
    value.filter(is_truthy)
}

/// `null`, `false`, zero and the empty string count as absent.
fn is_truthy(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => false,
        JsonValue::Bool(b) => *b,
        JsonValue::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        JsonValue::String(s) => !s.is_empty(),
        JsonValue::Array(_) | JsonValue::Object(_) => true,
    }
}
