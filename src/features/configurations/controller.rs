//! Configurations Controller
//!
//! The full listing with local filtering, sorting and pagination.

use chrono::{DateTime, Utc};
use tracing::info;

use crate::app::application::AppContext;
use crate::constants::LIST_PAGE_SIZE;
use crate::domain::configuration::ConfigurationDetail;
use crate::domain::search::{SortField, SortOrder};
use crate::state::list_state::{FilterOptions, ListStats, Suggestions};
use crate::state::{ListOutcome, ListState};

/// Configurations page controller
pub struct ConfigurationsController {
    ctx: AppContext,
    list: ListState,
}

impl ConfigurationsController {
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            list: ListState::new(
                LIST_PAGE_SIZE,
                FilterOptions {
                    game_matches_title: true,
                },
            ),
        }
    }

    pub fn list(&self) -> &ListState {
        &self.list
    }

    /// Fetch everything and show the first page. A failed fetch keeps
    /// whatever was loaded before.
    pub async fn load(&mut self) -> ListOutcome {
        match self.ctx.api.search_configs(None).await {
            Ok(items) => {
                info!(count = items.len(), "Configurations loaded");
                self.list.set_items(items);
            }
            Err(e) => self.ctx.notifier.report(self.ctx.t("list-load-failed"), &e),
        }
        self.list.apply()
    }

    pub fn set_query(&mut self, query: &str) -> ListOutcome {
        self.list.filters.text_query = query.to_string();
        self.refilter()
    }

    /// Matches the game or the title
    pub fn set_game(&mut self, game: &str) -> ListOutcome {
        self.list.filters.game = game.to_string();
        self.refilter()
    }

    pub fn set_sort(&mut self, field: SortField, order: SortOrder) -> ListOutcome {
        self.list.filters.sort_field = field;
        self.list.filters.sort_order = order;
        self.refilter()
    }

    pub fn go_to_page(&mut self, page: usize) -> ListOutcome {
        self.list.go_to_page(page)
    }

    pub fn clear_filters(&mut self) -> ListOutcome {
        self.list.clear_filters()
    }

    pub fn stats(&self, now: DateTime<Utc>) -> ListStats {
        self.list.stats(now)
    }

    pub fn suggestions(&self) -> Suggestions {
        self.list.suggestions()
    }

    /// Quick look at one configuration through the configs service
    pub async fn preview(&self, config_id: &str) -> Option<ConfigurationDetail> {
        match self.ctx.api.get_config(config_id).await {
            Ok(detail) => Some(detail),
            Err(e) => {
                self.ctx.notifier.report(self.ctx.t("detail-load-failed"), &e);
                None
            }
        }
    }

    fn refilter(&mut self) -> ListOutcome {
        self.list.filters.page = 1;
        self.list.apply()
    }
}
