//! Configuration - Canonical Configuration Models
//!
//! Backend payloads differ between services; `services::normalize` maps them
//! onto these types so nothing else has to care.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Row of a list or search view
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConfigurationSummary {
    pub id: String,
    pub title: String,
    pub game: String,
    pub description: String,
    pub tags: Vec<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub user_id: Option<String>,
    /// Only present on enriched (visualizations) payloads
    pub average_rating: Option<f64>,
}

/// Author block shown on the detail page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub username: String,
    pub email: Option<String>,
}

/// A comment on a configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Option<String>,
    pub user_id: Option<String>,
    pub username: Option<String>,
    pub text: String,
    pub created_at: Option<DateTime<Utc>>,
}

/// Enriched configuration as served by the visualizations service
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigurationDetail {
    pub summary: ConfigurationSummary,
    pub parameters: Map<String, Value>,
    pub author: Option<Author>,
    pub views: u64,
    pub likes_count: u64,
    pub liked_by: BTreeSet<String>,
    pub comments: Vec<Comment>,
    pub comments_count: usize,
    pub average_rating: Option<f64>,
    pub ratings_count: u64,
}

impl ConfigurationDetail {
    pub fn id(&self) -> &str {
        &self.summary.id
    }

    /// Whether the given user appears among the likers
    pub fn is_liked_by(&self, user_id: &str) -> bool {
        self.liked_by.contains(user_id)
    }
}

/// Payload for `POST /configs/`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewConfiguration {
    pub title: String,
    pub game: String,
    pub description: String,
    pub tags: Vec<String>,
    pub parameters: Map<String, Value>,
}

/// Split a comma-separated tag list, trimming and dropping empties
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
