//! ListState - Filter, Sort and Paginate Configuration Lists
//!
//! Pure engine shared by the configurations, search and dashboard pages. Nothing
//! here performs I/O; the controllers feed it whatever the backend returned.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use chrono::{DateTime, Duration, Utc};

use crate::constants::{PAGINATION_WINDOW, RECENT_WINDOW_DAYS};
use crate::domain::configuration::ConfigurationSummary;
use crate::domain::search::{SearchFilterState, SortField, SortOrder};

/// Page-specific filter behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FilterOptions {
    /// The configurations page lets the game box match titles as well
    pub game_matches_title: bool,
}

/// Whether `item` passes every active criterion
pub fn matches(item: &ConfigurationSummary, filters: &SearchFilterState, options: FilterOptions) -> bool {
    let query = filters.text_query.trim().to_lowercase();
    if !query.is_empty() {
        let hit = item.title.to_lowercase().contains(&query)
            || item.description.to_lowercase().contains(&query)
            || item.game.to_lowercase().contains(&query)
            || item.tags.iter().any(|t| t.to_lowercase().contains(&query));
        if !hit {
            return false;
        }
    }

    let game = filters.game.trim().to_lowercase();
    if !game.is_empty() {
        let hit = item.game.to_lowercase().contains(&game)
            || (options.game_matches_title && item.title.to_lowercase().contains(&game));
        if !hit {
            return false;
        }
    }

    let tag_terms = filters.tag_terms();
    if !tag_terms.is_empty() {
        let hit = tag_terms.iter().any(|term| {
            item.tags
                .iter()
                .any(|tag| tag.to_lowercase().contains(term.as_str()))
        });
        if !hit {
            return false;
        }
    }

    // Unrated items never pass a rating floor
    if filters.min_rating > 0.0 {
        match item.average_rating {
            Some(rating) if rating >= filters.min_rating => {}
            _ => return false,
        }
    }

    true
}

/// Keep matching items, preserving input order
pub fn filter_items<'a>(
    items: &'a [ConfigurationSummary],
    filters: &SearchFilterState,
    options: FilterOptions,
) -> Vec<&'a ConfigurationSummary> {
    items
        .iter()
        .filter(|item| matches(item, filters, options))
        .collect()
}

/// Three-way comparison on one field, ascending
pub fn compare(a: &ConfigurationSummary, b: &ConfigurationSummary, field: SortField) -> Ordering {
    match field {
        // Missing dates sort before any real date
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
        SortField::Game => a.game.to_lowercase().cmp(&b.game.to_lowercase()),
        SortField::Description => a
            .description
            .to_lowercase()
            .cmp(&b.description.to_lowercase()),
    }
}

/// Stable sort; `Desc` flips the comparison, so ties keep input order both ways
pub fn sort_items(items: &mut [&ConfigurationSummary], field: SortField, order: SortOrder) {
    items.sort_by(|a, b| directed(compare(a, b, field), order));
}

fn directed(ordering: Ordering, order: SortOrder) -> Ordering {
    match order {
        SortOrder::Asc => ordering,
        SortOrder::Desc => ordering.reverse(),
    }
}

/// `ceil(count / page_size)`; zero when there is nothing to show
pub fn total_pages(count: usize, page_size: usize) -> usize {
    count.div_ceil(page_size.max(1))
}

/// Keep `page` inside `[1, total_pages]`
pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.min(total_pages).max(1)
}

/// One slot of the pagination bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLink {
    Page { number: usize, current: bool },
    Ellipsis,
}

/// First, last and `current ± radius`, with ellipses over the gaps.
/// Empty when everything fits on a single page.
pub fn pagination_window(current: usize, total: usize, radius: usize) -> Vec<PageLink> {
    if total <= 1 {
        return Vec::new();
    }
    let current = clamp_page(current, total);
    let start = current.saturating_sub(radius).max(1);
    let end = (current + radius).min(total);
    let link = |number: usize| PageLink::Page {
        number,
        current: number == current,
    };

    let mut links = Vec::new();
    if start > 1 {
        links.push(link(1));
        if start > 2 {
            links.push(PageLink::Ellipsis);
        }
    }
    links.extend((start..=end).map(link));
    if end < total {
        if end + 1 < total {
            links.push(PageLink::Ellipsis);
        }
        links.push(link(total));
    }
    links
}

/// The visible slice of a filtered, sorted list
#[derive(Debug, Clone, PartialEq)]
pub struct PageView {
    pub items: Vec<ConfigurationSummary>,
    /// 1-based
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub links: Vec<PageLink>,
}

impl PageView {
    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// What a list page should display
#[derive(Debug, Clone, PartialEq)]
pub enum ListOutcome {
    /// Nothing loaded at all; offer to upload the first configuration
    NoData,
    /// Data exists but the filters exclude all of it; offer to clear filters
    NoResults,
    Page(PageView),
}

/// Headline numbers of the configurations page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListStats {
    pub total: usize,
    pub unique_games: usize,
    pub recent: usize,
}

/// Compute the statistics panel over the full, unfiltered list
pub fn list_stats(items: &[ConfigurationSummary], now: DateTime<Utc>) -> ListStats {
    let cutoff = now - Duration::days(RECENT_WINDOW_DAYS);
    ListStats {
        total: items.len(),
        unique_games: items
            .iter()
            .map(|c| c.game.as_str())
            .collect::<BTreeSet<_>>()
            .len(),
        recent: items
            .iter()
            .filter(|c| c.created_at.is_some_and(|at| at > cutoff))
            .count(),
    }
}

/// Autocomplete values for the search filters
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Suggestions {
    pub games: Vec<String>,
    pub tags: Vec<String>,
}

/// Unique, sorted games and tags
pub fn suggestions(items: &[ConfigurationSummary]) -> Suggestions {
    let games: BTreeSet<&str> = items
        .iter()
        .map(|c| c.game.trim())
        .filter(|g| !g.is_empty())
        .collect();
    let tags: BTreeSet<&str> = items
        .iter()
        .flat_map(|c| c.tags.iter().map(|t| t.trim()))
        .filter(|t| !t.is_empty())
        .collect();
    Suggestions {
        games: games.into_iter().map(str::to_string).collect(),
        tags: tags.into_iter().map(str::to_string).collect(),
    }
}

/// A loaded list plus the filters applied to it
#[derive(Debug, Clone)]
pub struct ListState {
    items: Vec<ConfigurationSummary>,
    pub filters: SearchFilterState,
    options: FilterOptions,
    /// Filtered and sorted indices into `items`
    visible: Vec<usize>,
}

impl ListState {
    pub fn new(page_size: usize, options: FilterOptions) -> Self {
        Self {
            items: Vec::new(),
            filters: SearchFilterState::new(page_size),
            options,
            visible: Vec::new(),
        }
    }

    /// Replace the loaded data wholesale
    pub fn set_items(&mut self, items: Vec<ConfigurationSummary>) {
        self.items = items;
        self.visible.clear();
    }

    pub fn items(&self) -> &[ConfigurationSummary] {
        &self.items
    }

    /// Number of items passing the current filters (after the last `apply`)
    pub fn filtered_len(&self) -> usize {
        self.visible.len()
    }

    /// Filter, sort, clamp the page and produce the view. Idempotent.
    pub fn apply(&mut self) -> ListOutcome {
        let (field, order) = (self.filters.sort_field, self.filters.sort_order);
        let mut visible: Vec<usize> = (0..self.items.len())
            .filter(|&i| matches(&self.items[i], &self.filters, self.options))
            .collect();
        visible.sort_by(|&a, &b| directed(compare(&self.items[a], &self.items[b], field), order));
        self.visible = visible;

        let pages = total_pages(self.visible.len(), self.filters.page_size);
        self.filters.page = clamp_page(self.filters.page, pages);
        self.view()
    }

    /// Current outcome without re-filtering
    pub fn view(&self) -> ListOutcome {
        if self.items.is_empty() {
            return ListOutcome::NoData;
        }
        if self.visible.is_empty() {
            return ListOutcome::NoResults;
        }

        let page_size = self.filters.page_size.max(1);
        let pages = total_pages(self.visible.len(), page_size);
        let page = clamp_page(self.filters.page, pages);
        let start = (page - 1) * page_size;
        let items = self
            .visible
            .iter()
            .skip(start)
            .take(page_size)
            .map(|&i| self.items[i].clone())
            .collect();

        ListOutcome::Page(PageView {
            items,
            page,
            total_pages: pages,
            total_items: self.visible.len(),
            links: pagination_window(page, pages, PAGINATION_WINDOW),
        })
    }

    /// Jump to `page`; out-of-range requests are ignored
    pub fn go_to_page(&mut self, page: usize) -> ListOutcome {
        let pages = total_pages(self.visible.len(), self.filters.page_size);
        if (1..=pages).contains(&page) {
            self.filters.page = page;
        }
        self.view()
    }

    /// Reset filters and sorting, back to page 1
    pub fn clear_filters(&mut self) -> ListOutcome {
        self.filters.reset();
        self.apply()
    }

    pub fn stats(&self, now: DateTime<Utc>) -> ListStats {
        list_stats(&self.items, now)
    }

    pub fn suggestions(&self) -> Suggestions {
        suggestions(&self.items)
    }
}
