//! Built-in content served while the store holds no record.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde_json::json;

use crate::content::timestamp;
use crate::models::{Page, PageMetadata, Pages, SiteConfig};

/// Storage key, page id, title, version
const DEFAULT_PAGES: [(&str, &str, &str, Option<&str>); 8] = [
    ("intro", "intro", "📘 Lisez-moi", Some("1.6")),
    ("install", "install", "🛠️ Installation", Some("1.5")),
    ("news", "news", "✨ Nouveautés", Some("1.6")),
    ("general", "gen", "⚙️ Général", None),
    ("infini", "inf", "♾️ Infini", None),
    ("welcome", "wel", "👋 Bienvenue", None),
    ("economy", "eco", "💰 Économie", None),
    ("commands", "cmd", "⌨️ Commandes", None),
];

/// Read-only snapshot handed out whenever a record is missing.
///
/// Built once at startup; callers always receive clones.
#[derive(Debug, Clone)]
pub struct DefaultContent {
    pages: Pages,
    config: SiteConfig,
}

impl DefaultContent {
    pub fn new(pages: Pages, config: SiteConfig) -> Self {
        DefaultContent { pages, config }
    }

    /// The stock pages and configuration, stamped with `now`.
    pub fn seeded(now: DateTime<Utc>) -> Self {
        let stamp = timestamp(now);

        let pages = DEFAULT_PAGES
            .into_iter()
            .map(|(key, id, title, version)| {
                let mut fields = IndexMap::new();
                fields.insert("title".to_string(), json!(title));
                if let Some(version) = version {
                    fields.insert("version".to_string(), json!(version));
                }
                fields.insert("content".to_string(), json!({}));

                let page = Page {
                    id: id.to_string(),
                    fields,
                    metadata: PageMetadata {
                        last_update: stamp.clone(),
                        ..PageMetadata::default()
                    },
                };
                (key.to_string(), page)
            })
            .collect();

        let config = [
            ("botName", json!("Manage")),
            ("version", json!("1.6")),
            ("logoUrl", json!("https://i.postimg.cc/x8kQQ2fq/Manage-2-0.png")),
            (
                "inviteUrl",
                json!("https://discord.com/oauth2/authorize?client_id=1431421654038351942&permissions=8&integration_type=0&scope=bot+applications.commands"),
            ),
            ("primaryColor", json!("#773bef")),
        ]
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect();

        DefaultContent::new(pages, config)
    }

    pub fn pages(&self) -> Pages {
        self.pages.clone()
    }

    pub fn config(&self) -> SiteConfig {
        self.config.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::find_key;

    #[test]
    fn test_seeded_pages() {
        let defaults = DefaultContent::seeded(Utc::now());
        let pages = defaults.pages();

        assert_eq!(pages.len(), 8);
        assert_eq!(pages.keys().next().map(String::as_str), Some("intro"));
        assert_eq!(find_key(&pages, "gen"), Some("general"));
        assert_eq!(pages["install"].fields["version"], json!("1.5"));
        assert!(!pages["commands"].fields.contains_key("version"));
        assert_eq!(pages["general"].fields["title"], json!("⚙️ Général"));
        assert!(pages.values().all(|p| p.metadata.created.is_none()));
    }

    #[test]
    fn test_seeded_config() {
        let config = DefaultContent::seeded(Utc::now()).config();

        assert_eq!(config["botName"], json!("Manage"));
        assert_eq!(config["version"], json!("1.6"));
        assert_eq!(config["primaryColor"], json!("#773bef"));
        assert!(config.get("lastUpdate").is_none());
    }

    #[test]
    fn test_copies_are_independent() {
        let defaults = DefaultContent::seeded(Utc::now());
        let mut pages = defaults.pages();
        pages.clear();

        assert_eq!(defaults.pages().len(), 8);
    }
}
