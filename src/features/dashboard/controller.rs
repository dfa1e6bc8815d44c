//! Dashboard Controller
//!
//! Service health and the most recent uploads.

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::app::application::AppContext;
use crate::connection::Service;
use crate::constants::DASHBOARD_RECENT_LIMIT;
use crate::domain::configuration::ConfigurationSummary;
use crate::domain::search::{SortField, SortOrder};
use crate::eventing::AppEvent;
use crate::services::ServiceHealth;
use crate::state::list_state::{ListStats, list_stats, sort_items};

/// Everything the home page shows
#[derive(Debug, Clone, Default)]
pub struct DashboardView {
    pub health: ServiceHealth,
    pub recent: Vec<ConfigurationSummary>,
    pub stats: ListStats,
}

/// Home page controller
pub struct DashboardController {
    ctx: AppContext,
}

impl DashboardController {
    pub fn new(ctx: AppContext) -> Self {
        Self { ctx }
    }

    /// Probe every backend and publish one status event per service
    pub async fn refresh_status(&self) -> ServiceHealth {
        let health = self.ctx.api.check_all_services().await;
        for service in Service::all() {
            let online = health.get(service);
            if !online {
                warn!(%service, "Service offline");
            }
            self.ctx
                .notifier
                .send(AppEvent::ServiceStatus { service, online });
        }
        health
    }

    /// Health, newest configurations and counters
    pub async fn load(&self, now: DateTime<Utc>) -> DashboardView {
        let (health, listing) = futures::join!(
            self.refresh_status(),
            self.ctx.api.search_configs(None)
        );
        let all = match listing {
            Ok(items) => items,
            Err(e) => {
                self.ctx.notifier.report(self.ctx.t("list-load-failed"), &e);
                Vec::new()
            }
        };

        let mut newest: Vec<&ConfigurationSummary> = all.iter().collect();
        sort_items(&mut newest, SortField::CreatedAt, SortOrder::Desc);
        let recent = newest
            .into_iter()
            .take(DASHBOARD_RECENT_LIMIT)
            .cloned()
            .collect();

        DashboardView {
            health,
            recent,
            stats: list_stats(&all, now),
        }
    }
}
