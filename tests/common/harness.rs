//! Application wired onto the fake backend

#![allow(dead_code)]

use std::sync::Arc;

use config_hub::app::{AppContext, Application};
use config_hub::connection::HubConfig;
use config_hub::eventing::AppEvent;
use config_hub::features::auth::AuthController;
use config_hub::utils::config_store::{LocalStore, MemoryStore};

use super::backend::FakeBackend;
use super::constants::{OTHER_EMAIL, OTHER_PASS, OTHER_USER, TEST_EMAIL, TEST_PASS, TEST_USER};

pub struct TestApp {
    pub app: Application,
    pub backend: Arc<FakeBackend>,
    pub store: Arc<MemoryStore>,
    /// Id of the seeded `TEST_USER` account
    pub user_id: String,
    /// Id of the seeded `OTHER_USER` account
    pub other_id: String,
}

impl TestApp {
    /// Fresh backend with two accounts, nobody signed in
    pub fn spawn() -> Self {
        let backend = Arc::new(FakeBackend::new());
        let user_id = backend.seed_user(TEST_USER, TEST_EMAIL, TEST_PASS);
        let other_id = backend.seed_user(OTHER_USER, OTHER_EMAIL, OTHER_PASS);
        Self::attach(backend, Arc::new(MemoryStore::new()), user_id, other_id)
    }

    /// Signed in as `TEST_USER`
    pub async fn signed_in() -> Self {
        let mut test = Self::spawn();
        let user = AuthController::new(test.ctx()).login(TEST_EMAIL, TEST_PASS).await;
        assert!(user.is_some(), "login failed: {:?}", test.messages());
        test.messages();
        test
    }

    /// A second application sharing this backend and store, as after a restart
    pub fn restart(&self) -> Self {
        Self::attach(
            self.backend.clone(),
            self.store.clone(),
            self.user_id.clone(),
            self.other_id.clone(),
        )
    }

    fn attach(
        backend: Arc<FakeBackend>,
        store: Arc<MemoryStore>,
        user_id: String,
        other_id: String,
    ) -> Self {
        let shared: Arc<dyn LocalStore> = store.clone();
        let app = Application::with_transport(HubConfig::default(), shared, backend.clone());
        Self {
            app,
            backend,
            store,
            user_id,
            other_id,
        }
    }

    pub fn ctx(&self) -> AppContext {
        self.app.ctx.clone()
    }

    /// Drain notifications, returning their messages oldest first
    pub fn messages(&mut self) -> Vec<String> {
        self.app.pump_events();
        let messages = self
            .app
            .notifications
            .entries()
            .map(|n| n.message.clone())
            .collect();
        self.app.notifications.clear();
        messages
    }

    /// Drain events, returning everything that is not a notification
    pub fn events(&mut self) -> Vec<AppEvent> {
        self.app.pump_events()
    }
}
