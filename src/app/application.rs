//! Application - Dependency Wiring
//!
//! Everything a controller needs is constructed once here and handed down
//! explicitly; nothing is reached through globals.

use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::Receiver;
use tracing::info;

use crate::connection::HubConfig;
use crate::error::Result;
use crate::eventing::{AppEvent, Notifier, channel};
use crate::i18n::{Locale, t};
use crate::services::{ApiClient, ReqwestTransport, Transport};
use crate::state::{ConnectionState, NotificationState, SessionManager};
use crate::utils::config_store::LocalStore;

/// Shared handles injected into every controller
#[derive(Clone)]
pub struct AppContext {
    pub api: ApiClient,
    pub session: SessionManager,
    pub notifier: Notifier,
    pub store: Arc<dyn LocalStore>,
    pub config: HubConfig,
    pub locale: Locale,
}

impl AppContext {
    /// Wire a context around an arbitrary transport
    pub fn new(
        config: HubConfig,
        store: Arc<dyn LocalStore>,
        transport: Arc<dyn Transport>,
        notifier: Notifier,
    ) -> Self {
        let session = SessionManager::restore(store.clone());
        let api = ApiClient::new(transport, config.services.clone(), session.clone());
        let locale = Locale::resolve(config.locale.as_deref());
        Self {
            api,
            session,
            notifier,
            store,
            config,
            locale,
        }
    }

    /// Translate a message key in the configured locale
    pub fn t(&self, key: &'static str) -> &'static str {
        t(self.locale, key)
    }
}

/// A context plus the receiving end of its event stream
pub struct Application {
    pub ctx: AppContext,
    events: Receiver<AppEvent>,
    pub notifications: NotificationState,
    pub connection: ConnectionState,
}

impl Application {
    /// Production wiring: reqwest transport with the configured timeout
    pub fn connect(config: HubConfig, store: Arc<dyn LocalStore>) -> Result<Self> {
        let transport = ReqwestTransport::new(Duration::from_secs(config.request_timeout_secs))?;
        Ok(Self::with_transport(config, store, Arc::new(transport)))
    }

    pub fn with_transport(
        config: HubConfig,
        store: Arc<dyn LocalStore>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        let (notifier, events) = channel();
        let ctx = AppContext::new(config, store, transport, notifier);
        info!(
            locale = ctx.locale.display_name(),
            authenticated = ctx.session.is_authenticated(),
            "Application context ready"
        );
        Self {
            ctx,
            events,
            notifications: NotificationState::default(),
            connection: ConnectionState::default(),
        }
    }

    /// Absorb pending events. Notifications and service statuses are folded
    /// into state; redirects and session changes are handed back.
    pub fn pump_events(&mut self) -> Vec<AppEvent> {
        let mut pending = Vec::new();
        for event in self.notifications.drain(&self.events) {
            match event {
                AppEvent::ServiceStatus { service, online } => {
                    self.connection.set_status(service, online)
                }
                other => pending.push(other),
            }
        }
        pending
    }
}
