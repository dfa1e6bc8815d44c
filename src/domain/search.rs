//! Search - Filter, Sort and Query Types

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::SEARCH_DEFAULT_LIMIT;
use crate::domain::configuration::ConfigurationSummary;
use crate::error::Error;

/// Field a list is ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    CreatedAt,
    Title,
    Game,
    Description,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::CreatedAt => "created_at",
            SortField::Title => "title",
            SortField::Game => "game",
            SortField::Description => "description",
        }
    }
}

impl FromStr for SortField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "created_at" | "date" => Ok(SortField::CreatedAt),
            "title" => Ok(SortField::Title),
            "game" => Ok(SortField::Game),
            "description" => Ok(SortField::Description),
            other => Err(Error::validation(format!("Unknown sort field: {other}"))),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl FromStr for SortOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(Error::validation(format!("Unknown sort order: {other}"))),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Filter state owned by the active list page
#[derive(Debug, Clone, PartialEq)]
pub struct SearchFilterState {
    pub text_query: String,
    pub game: String,
    /// Comma-separated tag list as typed by the user
    pub tags: String,
    pub sort_field: SortField,
    pub sort_order: SortOrder,
    pub min_rating: f64,
    /// Maximum number of server-side search results
    pub limit: usize,
    /// 1-based page index
    pub page: usize,
    pub page_size: usize,
}

impl SearchFilterState {
    pub fn new(page_size: usize) -> Self {
        Self {
            text_query: String::new(),
            game: String::new(),
            tags: String::new(),
            sort_field: SortField::default(),
            sort_order: SortOrder::default(),
            min_rating: 0.0,
            limit: SEARCH_DEFAULT_LIMIT,
            page: 1,
            page_size: page_size.max(1),
        }
    }

    /// Lowercased, trimmed tag criteria
    pub fn tag_terms(&self) -> Vec<String> {
        self.tags
            .split(',')
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect()
    }

    /// Whether any filtering criterion is set (sorting does not count)
    pub fn has_active_criteria(&self) -> bool {
        !self.text_query.trim().is_empty()
            || !self.game.trim().is_empty()
            || !self.tag_terms().is_empty()
            || self.min_rating > 0.0
    }

    /// Back to defaults, keeping the page size
    pub fn reset(&mut self) {
        *self = Self::new(self.page_size);
    }
}

/// Query for `GET /visualizations/search`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdvancedSearchParams {
    pub game: Option<String>,
    pub title: Option<String>,
    pub tags: Vec<String>,
    pub sort_by: Option<SortField>,
    pub sort_order: Option<SortOrder>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl AdvancedSearchParams {
    /// Query pairs in the order the backend documents them; empty values are omitted
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(game) = self.game.as_deref().filter(|g| !g.is_empty()) {
            pairs.push(("game", game.to_string()));
        }
        if let Some(title) = self.title.as_deref().filter(|t| !t.is_empty()) {
            pairs.push(("title", title.to_string()));
        }
        for tag in &self.tags {
            pairs.push(("tags", tag.clone()));
        }
        if let Some(sort_by) = self.sort_by {
            pairs.push(("sort_by", sort_by.as_str().to_string()));
        }
        if let Some(order) = self.sort_order {
            pairs.push(("sort_order", order.as_str().to_string()));
        }
        if let Some(limit) = self.limit.filter(|l| *l > 0) {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(offset) = self.offset.filter(|o| *o > 0) {
            pairs.push(("offset", offset.to_string()));
        }
        pairs
    }
}

/// One page of server-side search results
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResults {
    pub items: Vec<ConfigurationSummary>,
    pub total: usize,
    pub has_more: bool,
}
