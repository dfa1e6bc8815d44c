//! Draft - Autosaved Upload Form Snapshot

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::DRAFT_TTL_HOURS;

/// Which parameter editor is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    #[default]
    Simple,
    Json,
}

/// Snapshot persisted under `upload_autosave`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadDraft {
    pub title: String,
    pub game: String,
    pub description: String,
    pub tags: String,
    pub parameters_json: String,
    pub active_input_mode: InputMode,
    pub saved_at: DateTime<Utc>,
}

impl UploadDraft {
    /// Older than the retention window at `now`
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now - self.saved_at > Duration::hours(DRAFT_TTL_HOURS)
    }

    /// Nothing worth restoring
    pub fn is_blank(&self) -> bool {
        self.title.trim().is_empty()
            && self.game.trim().is_empty()
            && self.description.trim().is_empty()
            && self.tags.trim().is_empty()
            && self.parameters_json.trim().is_empty()
    }
}
