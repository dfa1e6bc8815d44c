//! Auth Controller
//!
//! Login, registration, logout and the page guard.

use tracing::info;

use crate::app::application::AppContext;
use crate::app::navigation::{Page, Route};
use crate::domain::user::{Credentials, Registration, UserProfile};
use crate::eventing::AppEvent;
use crate::state::{GuardDecision, NavMenu};

/// Session-related user actions
pub struct AuthController {
    ctx: AppContext,
}

impl AuthController {
    pub fn new(ctx: AppContext) -> Self {
        Self { ctx }
    }

    /// Returns the profile on success; failures become notifications
    pub async fn login(&self, email: &str, password: &str) -> Option<UserProfile> {
        let credentials = Credentials {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        match self.ctx.api.login(&credentials).await {
            Ok(user) => {
                self.ctx.notifier.success(self.ctx.t("auth-login-success"));
                self.ctx.notifier.send(AppEvent::SessionChanged {
                    authenticated: true,
                });
                Some(user)
            }
            Err(e) => {
                self.ctx.notifier.report(self.ctx.t("auth-login-failed"), &e);
                None
            }
        }
    }

    pub async fn register(&self, username: &str, email: &str, password: &str) -> bool {
        let registration = Registration {
            username: username.trim().to_string(),
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        match self.ctx.api.register(&registration).await {
            Ok(_) => {
                self.ctx.notifier.success(self.ctx.t("auth-register-success"));
                true
            }
            Err(e) => {
                self.ctx.notifier.report(self.ctx.t("auth-register-failed"), &e);
                false
            }
        }
    }

    /// Drop the session and go back home
    pub fn logout(&self) -> bool {
        let dropped = self.ctx.session.clear();
        if dropped {
            info!("User logged out");
            self.ctx.notifier.info(self.ctx.t("auth-logout"));
            self.ctx.notifier.send(AppEvent::SessionChanged {
                authenticated: false,
            });
        }
        self.ctx.notifier.send(AppEvent::redirect(
            Route::new(Page::Home),
            std::time::Duration::ZERO,
        ));
        dropped
    }

    pub fn profile(&self) -> Option<UserProfile> {
        self.ctx.session.current_user()
    }

    pub fn nav_menu(&self) -> NavMenu {
        self.ctx.session.nav_menu()
    }

    /// Check `page`; on refusal warn now and schedule the redirect
    pub fn enforce(&self, page: Page) -> GuardDecision {
        let decision = self.ctx.session.guard(page);
        if let GuardDecision::Redirect {
            to,
            after,
            warning_key,
        } = &decision
        {
            self.ctx.notifier.warn(self.ctx.t(*warning_key));
            self.ctx
                .notifier
                .send(AppEvent::redirect(Route::new(*to), *after));
        }
        decision
    }
}
