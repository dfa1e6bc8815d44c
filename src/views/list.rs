//! Configuration cards, pagination and empty states

use std::fmt::Write;

use super::Render;
use crate::domain::configuration::ConfigurationSummary;
use crate::i18n::{Locale, t};
use crate::state::list_state::{ListStats, PageLink, Suggestions};
use crate::state::{ListOutcome, PageView};
use crate::utils::format::{format_average, format_optional_datetime, truncate};

const DESCRIPTION_PREVIEW: usize = 100;

/// One configuration as a three-line card
pub fn card(item: &ConfigurationSummary, locale: Locale) -> String {
    let description = if item.description.trim().is_empty() {
        t(locale, "no-description").to_string()
    } else {
        truncate(item.description.trim(), DESCRIPTION_PREVIEW)
    };
    let mut out = format!("{} [{}]  ({})\n", item.title, item.game, item.id);
    let _ = writeln!(out, "  {description}");
    let _ = write!(
        out,
        "  {}: {}",
        t(locale, "detail-created"),
        format_optional_datetime(item.created_at.as_ref(), "-")
    );
    if !item.tags.is_empty() {
        let _ = write!(out, "  #{}", item.tags.join(" #"));
    }
    if item.average_rating.is_some() {
        let _ = write!(
            out,
            "  {} {}",
            t(locale, "detail-rating"),
            format_average(item.average_rating)
        );
    }
    out
}

/// Pagination bar, e.g. `< 1 … 4 [5] 6 … 9 >`
pub fn pagination(view: &PageView, locale: Locale) -> String {
    let mut parts = Vec::new();
    if view.has_prev() {
        parts.push(format!("< {}", t(locale, "list-prev")));
    }
    for link in &view.links {
        parts.push(match link {
            PageLink::Page { number, current: true } => format!("[{number}]"),
            PageLink::Page { number, .. } => number.to_string(),
            PageLink::Ellipsis => "…".to_string(),
        });
    }
    if view.has_next() {
        parts.push(format!("{} >", t(locale, "list-next")));
    }
    parts.join(" ")
}

/// Placeholder content when there is nothing to list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyState {
    /// Nothing exists yet
    NoData,
    /// Filters exclude everything
    NoResults,
    /// Search page before the first query
    SearchIdle,
}

impl Render for EmptyState {
    fn render(&self, locale: Locale) -> String {
        match self {
            EmptyState::NoData => format!(
                "{}\n-> {}",
                t(locale, "list-no-data"),
                t(locale, "list-no-data-action")
            ),
            EmptyState::NoResults => format!(
                "{}\n-> {}",
                t(locale, "list-no-results"),
                t(locale, "list-no-results-action")
            ),
            EmptyState::SearchIdle => t(locale, "search-initial").to_string(),
        }
    }
}

/// A list page: optional counters, then cards or an empty state
pub struct ListPage<'a> {
    pub outcome: &'a ListOutcome,
    pub stats: Option<ListStats>,
}

impl Render for ListPage<'_> {
    fn render(&self, locale: Locale) -> String {
        let mut out = String::new();
        if let Some(stats) = self.stats {
            let _ = writeln!(
                out,
                "{}: {}  {}: {}  {}: {}\n",
                t(locale, "stats-total"),
                stats.total,
                t(locale, "stats-games"),
                stats.unique_games,
                t(locale, "stats-recent"),
                stats.recent
            );
        }
        match self.outcome {
            ListOutcome::NoData => out.push_str(&EmptyState::NoData.render(locale)),
            ListOutcome::NoResults => out.push_str(&EmptyState::NoResults.render(locale)),
            ListOutcome::Page(view) => out.push_str(&self.outcome_page(view, locale)),
        }
        out
    }
}

impl ListPage<'_> {
    fn outcome_page(&self, view: &PageView, locale: Locale) -> String {
        let cards: Vec<String> = view.items.iter().map(|item| card(item, locale)).collect();
        let mut out = cards.join("\n\n");
        let _ = write!(
            out,
            "\n\n{} {} {} {} ({} {})",
            t(locale, "list-page"),
            view.page,
            t(locale, "list-of"),
            view.total_pages,
            view.total_items,
            t(locale, "search-results")
        );
        let bar = pagination(view, locale);
        if !bar.is_empty() {
            let _ = write!(out, "\n{bar}");
        }
        out
    }
}

/// Known games and tags, for filling in filters
pub struct SuggestionsView<'a>(pub &'a Suggestions);

impl Render for SuggestionsView<'_> {
    fn render(&self, locale: Locale) -> String {
        let line = |values: &[String]| {
            if values.is_empty() {
                "-".to_string()
            } else {
                values.join(", ")
            }
        };
        format!(
            "{}: {}\n{}: {}",
            t(locale, "suggest-games"),
            line(&self.0.games),
            t(locale, "suggest-tags"),
            line(&self.0.tags)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::list_state::pagination_window;

    fn item(id: &str) -> ConfigurationSummary {
        ConfigurationSummary {
            id: id.to_string(),
            title: "Sharp".to_string(),
            game: "Quake".to_string(),
            tags: vec!["fps".to_string(), "pro".to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn test_card_placeholders() {
        let text = card(&item("q1"), Locale::En);
        assert!(text.starts_with("Sharp [Quake]  (q1)"));
        assert!(text.contains("No description"));
        assert!(text.contains("#fps #pro"));
    }

    #[test]
    fn test_empty_states_differ() {
        let no_data = ListPage {
            outcome: &ListOutcome::NoData,
            stats: None,
        }
        .render(Locale::En);
        let no_results = ListPage {
            outcome: &ListOutcome::NoResults,
            stats: None,
        }
        .render(Locale::En);
        assert!(no_data.contains("Upload the first configuration"));
        assert!(no_results.contains("Clear filters"));
    }

    #[test]
    fn test_suggestions() {
        let suggestions = Suggestions {
            games: vec!["Chess".to_string(), "Quake".to_string()],
            tags: Vec::new(),
        };
        assert_eq!(
            SuggestionsView(&suggestions).render(Locale::En),
            "Games: Chess, Quake\nTags: -"
        );
    }

    #[test]
    fn test_pagination_bar() {
        let view = PageView {
            items: vec![item("a")],
            page: 5,
            total_pages: 9,
            total_items: 50,
            links: pagination_window(5, 9, 2),
        };
        assert_eq!(pagination(&view, Locale::En), "< Previous 1 … 3 4 [5] 6 7 … 9 Next >");
    }
}
