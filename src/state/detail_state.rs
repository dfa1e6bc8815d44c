//! DetailState - One Configuration and its Surroundings

use chrono::{DateTime, Utc};
use serde_json::{Value, json};

use crate::app::navigation::Route;
use crate::constants::UNKNOWN_USER;
use crate::domain::configuration::{Author, ConfigurationDetail, ConfigurationSummary};

/// Loading status of the main configuration
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadState {
    #[default]
    Loading,
    Loaded,
    /// Retryable failure
    Failed { message: String },
}

/// Related configurations panel; failures only degrade this panel
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RelatedState {
    #[default]
    Pending,
    Loaded(Vec<ConfigurationSummary>),
    Unavailable,
}

/// State of the detail page
#[derive(Debug, Clone, Default)]
pub struct DetailState {
    pub config_id: String,
    pub detail: Option<ConfigurationDetail>,
    pub related: RelatedState,
    pub load: LoadState,
}

impl DetailState {
    pub fn new(config_id: impl Into<String>) -> Self {
        Self {
            config_id: config_id.into(),
            ..Default::default()
        }
    }

    pub fn loaded(&mut self, detail: ConfigurationDetail) {
        self.detail = Some(detail);
        self.load = LoadState::Loaded;
    }

    pub fn failed(&mut self, message: impl Into<String>) {
        self.detail = None;
        self.load = LoadState::Failed {
            message: message.into(),
        };
    }

    /// Lay a fresh server copy over the local one. The server wins on every
    /// field it sends; the author resolved earlier survives when it sends none.
    pub fn merge(&mut self, mut updated: ConfigurationDetail) {
        if updated.author.is_none() {
            updated.author = self.detail.as_ref().and_then(|d| d.author.clone());
        }
        self.loaded(updated);
    }

    pub fn set_author(&mut self, author: Author) {
        if let Some(detail) = self.detail.as_mut() {
            detail.author = Some(author);
        }
    }

    /// Author used when the profile lookup fails
    pub fn placeholder_author() -> Author {
        Author {
            username: UNKNOWN_USER.to_string(),
            email: None,
        }
    }

    /// Derived from `liked_by` on every call, never cached
    pub fn has_liked(&self, user_id: Option<&str>) -> bool {
        match (self.detail.as_ref(), user_id) {
            (Some(detail), Some(id)) => detail.is_liked_by(id),
            _ => false,
        }
    }

    /// Keep at most `limit` configurations other than this one
    pub fn set_related(&mut self, candidates: Vec<ConfigurationSummary>, limit: usize) {
        let related = candidates
            .into_iter()
            .filter(|c| c.id != self.config_id)
            .take(limit)
            .collect();
        self.related = RelatedState::Loaded(related);
    }

    /// Link other people can open
    pub fn share_link(&self, base_url: &str) -> String {
        format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            Route::detail(self.config_id.as_str()).to_link()
        )
    }

    /// Parameters as pretty JSON, `{}` when nothing is loaded
    pub fn parameters_pretty(&self) -> String {
        let parameters = self
            .detail
            .as_ref()
            .map(|d| Value::Object(d.parameters.clone()))
            .unwrap_or_else(|| json!({}));
        serde_json::to_string_pretty(&parameters).unwrap_or_else(|_| "{}".to_string())
    }

    /// Downloadable document describing the configuration
    pub fn export_document(&self, source: &str, now: DateTime<Utc>) -> Option<Value> {
        let detail = self.detail.as_ref()?;
        let summary = &detail.summary;
        Some(json!({
            "title": summary.title,
            "game": summary.game,
            "description": summary.description,
            "tags": summary.tags,
            "parameters": detail.parameters,
            "author": detail
                .author
                .as_ref()
                .map(|a| a.username.clone())
                .unwrap_or_else(|| UNKNOWN_USER.to_string()),
            "created_at": summary.created_at.map(|at| at.to_rfc3339()),
            "downloaded_at": now.to_rfc3339(),
            "source": source,
        }))
    }

    /// File name for the exported document
    pub fn export_file_name(&self) -> String {
        let title = self
            .detail
            .as_ref()
            .map(|d| d.summary.title.trim())
            .filter(|t| !t.is_empty())
            .unwrap_or("configuration");
        let safe: String = title
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        format!("{safe}.json")
    }
}
