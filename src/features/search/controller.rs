//! Search Controller
//!
//! Server-side search with a basic-listing fallback, refined locally.
//! Only the latest search may update the results.

use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::app::application::AppContext;
use crate::app::navigation::Route;
use crate::connection::Service;
use crate::constants::{SEARCH_DEBOUNCE, SEARCH_MIN_QUERY_LEN, SEARCH_PAGE_SIZE};
use crate::domain::configuration::{ConfigurationSummary, parse_tags};
use crate::domain::search::{AdvancedSearchParams, SearchFilterState};
use crate::error::{ErrorKind, Result};
use crate::services::{Debouncer, RequestSequencer};
use crate::state::list_state::FilterOptions;
use crate::state::{ListOutcome, ListState};

/// Which backend produced the candidates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchSource {
    Advanced,
    Basic,
}

/// Result of a search attempt
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// No criterion set, the initial screen stays
    Idle,
    /// Typed query too short to search for
    Skipped,
    /// A newer search started meanwhile; this one was dropped
    Superseded,
    Results {
        outcome: ListOutcome,
        total: usize,
        elapsed: Duration,
        source: SearchSource,
    },
    /// Reported as a notification
    Failed,
}

/// Search page controller
pub struct SearchController {
    ctx: AppContext,
    list: Mutex<ListState>,
    sequencer: RequestSequencer,
    debouncer: Debouncer,
}

impl SearchController {
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            list: Mutex::new(ListState::new(SEARCH_PAGE_SIZE, FilterOptions::default())),
            sequencer: RequestSequencer::new(),
            debouncer: Debouncer::new(SEARCH_DEBOUNCE),
        }
    }

    /// Seed the filters from `q`, `game` and `tags`
    pub fn from_route(ctx: AppContext, route: &Route) -> Self {
        let controller = Self::new(ctx);
        controller.update_filters(|filters| {
            filters.text_query = route.query.clone().unwrap_or_default();
            filters.game = route.game.clone().unwrap_or_default();
            filters.tags = route.tags.clone().unwrap_or_default();
        });
        controller
    }

    fn lock(&self) -> MutexGuard<'_, ListState> {
        self.list.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn filters(&self) -> SearchFilterState {
        self.lock().filters.clone()
    }

    /// Edit the filters without searching
    pub fn update_filters(&self, edit: impl FnOnce(&mut SearchFilterState)) {
        edit(&mut self.lock().filters);
    }

    pub fn view(&self) -> ListOutcome {
        self.lock().view()
    }

    pub fn go_to_page(&self, page: usize) -> ListOutcome {
        self.lock().go_to_page(page)
    }

    /// Reset every filter and drop the results
    pub fn clear(&self) -> SearchOutcome {
        // Invalidate anything still in flight
        self.sequencer.begin();
        let mut list = self.lock();
        list.filters.reset();
        list.set_items(Vec::new());
        SearchOutcome::Idle
    }

    /// Run a search with the current filters
    pub async fn search(&self) -> SearchOutcome {
        let filters = self.filters();
        if !filters.has_active_criteria() {
            return SearchOutcome::Idle;
        }

        let ticket = self.sequencer.begin();
        let started = Instant::now();
        let fetched = self.fetch(&filters).await;
        if !self.sequencer.is_current(ticket) {
            debug!(?ticket, "Dropping stale search response");
            return SearchOutcome::Superseded;
        }

        match fetched {
            Ok((items, source)) => {
                let mut list = self.lock();
                list.set_items(items);
                list.filters.page = 1;
                let outcome = list.apply();
                let total = list.filtered_len();
                let elapsed = started.elapsed();
                info!(total, ?source, elapsed_ms = elapsed.as_millis() as u64, "Search finished");
                SearchOutcome::Results {
                    outcome,
                    total,
                    elapsed,
                    source,
                }
            }
            Err(e) => {
                self.ctx.notifier.report(self.ctx.t("search-failed"), &e);
                SearchOutcome::Failed
            }
        }
    }

    /// Search-as-you-type: empty or long-enough queries, after the debounce
    pub async fn type_query(&self, text: &str) -> SearchOutcome {
        self.update_filters(|filters| filters.text_query = text.to_string());
        let len = text.trim().chars().count();
        if len > 0 && len < SEARCH_MIN_QUERY_LEN {
            return SearchOutcome::Skipped;
        }
        if !self.debouncer.settle().await {
            return SearchOutcome::Superseded;
        }
        self.search().await
    }

    async fn fetch(&self, filters: &SearchFilterState) -> Result<(Vec<ConfigurationSummary>, SearchSource)> {
        let game = Some(filters.game.trim().to_string()).filter(|g| !g.is_empty());

        if self.ctx.api.check_service(Service::Visualizations).await {
            let params = AdvancedSearchParams {
                game: game.clone(),
                tags: parse_tags(&filters.tags),
                sort_by: Some(filters.sort_field),
                sort_order: Some(filters.sort_order),
                limit: Some(filters.limit),
                offset: Some(0),
                ..Default::default()
            };
            match self.ctx.api.search_advanced(&params).await {
                Ok(results) => return Ok((results.items, SearchSource::Advanced)),
                Err(e) if e.kind() == ErrorKind::Auth => return Err(e),
                Err(e) => warn!(error = %e, "Advanced search failed, using basic search"),
            }
        }

        let term = game.or_else(|| {
            Some(filters.text_query.trim().to_string()).filter(|q| !q.is_empty())
        });
        let items = self.ctx.api.search_configs(term.as_deref()).await?;
        Ok((items, SearchSource::Basic))
    }
}
