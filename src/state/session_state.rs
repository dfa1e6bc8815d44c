//! SessionState - Authentication Token and Cached Profile
//!
//! Two states, anonymous and authenticated. The session is shared between the
//! API client (which reads the token and clears it on 401) and the controllers.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use tracing::{info, warn};

use crate::app::navigation::Page;
use crate::constants::{AUTH_REDIRECT_DELAY, STORAGE_AUTH_TOKEN, STORAGE_USER_DATA};
use crate::domain::user::UserProfile;
use crate::error::Result;
use crate::helpers::{decrypt, encrypt};
use crate::utils::config_store::{LocalStore, load_json, save_json};

/// Snapshot of the session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub token: Option<String>,
    pub user: Option<UserProfile>,
}

impl Session {
    /// Both a token and a profile are required
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some() && self.user.is_some()
    }
}

/// Outcome of the page guard
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    /// Show `warning_key`, then navigate to `to` once `after` has elapsed
    Redirect {
        to: Page,
        after: Duration,
        warning_key: &'static str,
    },
}

/// One entry of the navigation menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavAction {
    Profile,
    Upload,
    Logout,
    Login,
    Register,
}

impl NavAction {
    pub fn label_key(&self) -> &'static str {
        match self {
            NavAction::Profile => "menu-profile",
            NavAction::Upload => "menu-upload",
            NavAction::Logout => "menu-logout",
            NavAction::Login => "menu-login",
            NavAction::Register => "menu-register",
        }
    }
}

/// Authenticated or anonymous variant of the user menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavMenu {
    Authenticated {
        username: String,
        actions: Vec<NavAction>,
    },
    Anonymous {
        actions: Vec<NavAction>,
    },
}

/// Shared session handle
#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<RwLock<Session>>,
    store: Arc<dyn LocalStore>,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let session = self.snapshot();
        f.debug_struct("SessionManager")
            .field("authenticated", &session.is_authenticated())
            .field("user", &session.user.map(|u| u.username))
            .finish()
    }
}

impl SessionManager {
    /// Restore whatever the store holds from a previous run
    pub fn restore(store: Arc<dyn LocalStore>) -> Self {
        let token = store
            .get(STORAGE_AUTH_TOKEN)
            .and_then(|stored| match decrypt(&stored) {
                Ok(token) => Some(token),
                Err(e) => {
                    warn!(error = %e, "Ignoring unreadable stored token");
                    None
                }
            })
            .filter(|t| !t.is_empty());
        let user: Option<UserProfile> = load_json(store.as_ref(), STORAGE_USER_DATA);

        if token.is_some() && user.is_none() {
            warn!("Stored token has no cached profile, session stays anonymous");
        }

        Self {
            inner: Arc::new(RwLock::new(Session { token, user })),
            store,
        }
    }

    pub fn snapshot(&self) -> Session {
        self.inner.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .is_authenticated()
    }

    pub fn current_user(&self) -> Option<UserProfile> {
        self.inner.read().unwrap_or_else(|e| e.into_inner()).user.clone()
    }

    /// Token to attach to requests, present even while the profile is still loading
    pub fn current_token(&self) -> Option<String> {
        self.inner.read().unwrap_or_else(|e| e.into_inner()).token.clone()
    }

    /// Switch to authenticated; token and profile are persisted together
    pub fn establish(&self, token: String, user: UserProfile) -> Result<()> {
        self.store.set(STORAGE_AUTH_TOKEN, &encrypt(&token)?)?;
        save_json(self.store.as_ref(), STORAGE_USER_DATA, &user)?;

        info!(user = %user.username, "Session established");
        let mut session = self.inner.write().unwrap_or_else(|e| e.into_inner());
        *session = Session {
            token: Some(token),
            user: Some(user),
        };
        Ok(())
    }

    /// Back to anonymous. Returns whether a session was actually dropped.
    pub fn clear(&self) -> bool {
        let was_present = {
            let mut session = self.inner.write().unwrap_or_else(|e| e.into_inner());
            let present = session.token.is_some() || session.user.is_some();
            *session = Session::default();
            present
        };

        for key in [STORAGE_AUTH_TOKEN, STORAGE_USER_DATA] {
            if let Err(e) = self.store.remove(key) {
                warn!(key, error = %e, "Failed to remove stored session entry");
            }
        }

        if was_present {
            info!("Session cleared");
        }
        was_present
    }

    /// Decide whether `page` may be shown
    pub fn guard(&self, page: Page) -> GuardDecision {
        if page.requires_auth() && !self.is_authenticated() {
            GuardDecision::Redirect {
                to: Page::Home,
                after: AUTH_REDIRECT_DELAY,
                warning_key: "guard-login-required",
            }
        } else {
            GuardDecision::Allow
        }
    }

    pub fn nav_menu(&self) -> NavMenu {
        match self.snapshot() {
            Session {
                token: Some(_),
                user: Some(user),
            } => NavMenu::Authenticated {
                username: user.username,
                actions: vec![NavAction::Profile, NavAction::Upload, NavAction::Logout],
            },
            _ => NavMenu::Anonymous {
                actions: vec![NavAction::Login, NavAction::Register],
            },
        }
    }
}
