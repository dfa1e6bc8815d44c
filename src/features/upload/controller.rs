//! Upload Controller
//!
//! Guarded upload form with periodic draft autosave.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::app::application::AppContext;
use crate::app::navigation::{Page, Route};
use crate::constants::{AUTOSAVE_INTERVAL, STORAGE_UPLOAD_AUTOSAVE, UPLOAD_REDIRECT_DELAY};
use crate::domain::configuration::NewConfiguration;
use crate::domain::draft::{InputMode, UploadDraft};
use crate::error::{Error, Result};
use crate::eventing::AppEvent;
use crate::services::spawn_named;
use crate::state::session_state::SessionManager;
use crate::state::{DraftCheck, GuardDecision, UploadForm};
use crate::utils::config_store::{LocalStore, save_json};

/// What opening the upload page led to
#[derive(Debug, Clone, PartialEq)]
pub enum UploadEntry {
    /// Anonymous user, a redirect home has been scheduled
    Redirected,
    /// Form ready; `draft` asks for a restore/discard decision
    Ready { draft: Option<UploadDraft> },
}

/// Upload page controller
pub struct UploadController {
    ctx: AppContext,
    form: UploadForm,
    snapshots: watch::Sender<UploadForm>,
    autosave: Option<JoinHandle<()>>,
}

impl UploadController {
    pub fn new(ctx: AppContext) -> Self {
        let form = UploadForm::new();
        let (snapshots, _) = watch::channel(form.clone());
        Self {
            ctx,
            form,
            snapshots,
            autosave: None,
        }
    }

    pub fn form(&self) -> &UploadForm {
        &self.form
    }

    /// Run the guard, then look for a stored draft
    pub fn open(&mut self, now: DateTime<Utc>) -> UploadEntry {
        if let GuardDecision::Redirect {
            to,
            after,
            warning_key,
        } = self.ctx.session.guard(Page::Upload)
        {
            self.ctx.notifier.warn(self.ctx.t(warning_key));
            self.ctx.notifier.send(AppEvent::redirect(Route::new(to), after));
            return UploadEntry::Redirected;
        }

        match self.check_draft(now) {
            DraftCheck::Prompt(draft) => UploadEntry::Ready { draft: Some(draft) },
            DraftCheck::Expired | DraftCheck::None => UploadEntry::Ready { draft: None },
        }
    }

    /// Expired and unreadable drafts are removed without asking
    pub fn check_draft(&self, now: DateTime<Utc>) -> DraftCheck {
        let Some(raw) = self.ctx.store.get(STORAGE_UPLOAD_AUTOSAVE) else {
            return DraftCheck::None;
        };
        let draft = match serde_json::from_str::<UploadDraft>(&raw) {
            Ok(draft) => draft,
            Err(e) => {
                warn!(error = %e, "Removing unreadable draft");
                self.remove_draft();
                return DraftCheck::None;
            }
        };

        let check = DraftCheck::classify(Some(draft), now);
        if check == DraftCheck::Expired {
            info!("Removing expired draft");
            self.remove_draft();
        }
        check
    }

    pub fn restore_draft(&mut self, draft: &UploadDraft) {
        self.form.restore(draft);
        self.publish();
        self.ctx.notifier.info(self.ctx.t("upload-draft-restored"));
    }

    pub fn discard_draft(&self) {
        self.remove_draft();
        self.ctx.notifier.info(self.ctx.t("upload-draft-discarded"));
    }

    fn remove_draft(&self) {
        if let Err(e) = self.ctx.store.remove(STORAGE_UPLOAD_AUTOSAVE) {
            warn!(error = %e, "Failed to remove draft");
        }
    }

    /// Change the form; the autosave task sees the new content
    pub fn edit(&mut self, change: impl FnOnce(&mut UploadForm)) {
        change(&mut self.form);
        self.publish();
    }

    /// Switch editor; a rejected row under a strict policy is reported
    pub fn switch_mode(&mut self, mode: InputMode) -> bool {
        match self.form.switch_mode(mode, self.ctx.config.object_parse_policy) {
            Ok(()) => {
                self.publish();
                true
            }
            Err(e) => {
                self.ctx.notifier.report("", &e);
                false
            }
        }
    }

    /// The payload as it would be submitted
    pub fn preview(&self) -> Result<NewConfiguration> {
        self.form.build(self.ctx.config.object_parse_policy)
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.form.clone());
    }

    /// Start the periodic autosave. Calling it twice keeps the first task.
    pub fn start_autosave(&mut self) {
        self.start_autosave_every(AUTOSAVE_INTERVAL);
    }

    fn start_autosave_every(&mut self, period: Duration) {
        if self.autosave.is_some() {
            return;
        }
        let rx = self.snapshots.subscribe();
        let store = self.ctx.store.clone();
        let session = self.ctx.session.clone();
        self.autosave = Some(spawn_named(
            "upload-autosave",
            autosave_loop(rx, store, session, period),
        ));
    }

    pub fn stop_autosave(&mut self) {
        if let Some(handle) = self.autosave.take() {
            handle.abort();
        }
    }

    /// Save the current form right away
    pub fn save_draft_now(&self, now: DateTime<Utc>) -> Result<bool> {
        save_draft(self.ctx.store.as_ref(), &self.ctx.session, &self.form, now)
    }

    /// Validate and upload. On success the form and draft are cleared and
    /// the new configuration's page is returned.
    pub async fn submit(&mut self) -> Option<Route> {
        match self.try_submit().await {
            Ok(route) => {
                self.ctx.notifier.success(self.ctx.t("upload-success"));
                self.ctx
                    .notifier
                    .send(AppEvent::redirect(route.clone(), UPLOAD_REDIRECT_DELAY));
                Some(route)
            }
            Err(e) => {
                self.ctx.notifier.report(self.ctx.t("upload-failed"), &e);
                None
            }
        }
    }

    async fn try_submit(&mut self) -> Result<Route> {
        if !self.ctx.session.is_authenticated() {
            return Err(Error::validation(self.ctx.t("auth-required")));
        }
        let payload = self.form.build(self.ctx.config.object_parse_policy)?;
        let created = self.ctx.api.upload_config(&payload).await?;

        self.form.reset();
        self.publish();
        self.remove_draft();

        Ok(if created.id.is_empty() {
            Route::new(Page::Configurations)
        } else {
            Route::detail(created.id)
        })
    }
}

impl Drop for UploadController {
    fn drop(&mut self) {
        self.stop_autosave();
    }
}

/// Persist `form` as the draft when there is a session and something to keep
pub fn save_draft(
    store: &dyn LocalStore,
    session: &SessionManager,
    form: &UploadForm,
    now: DateTime<Utc>,
) -> Result<bool> {
    if !session.is_authenticated() || form.is_blank() {
        return Ok(false);
    }
    save_json(store, STORAGE_UPLOAD_AUTOSAVE, &form.snapshot(now))?;
    debug!("Draft saved");
    Ok(true)
}

async fn autosave_loop(
    mut rx: watch::Receiver<UploadForm>,
    store: Arc<dyn LocalStore>,
    session: SessionManager,
    period: Duration,
) {
    let mut ticker = tokio::time::interval(period);
    // The first tick completes immediately
    ticker.tick().await;
    loop {
        ticker.tick().await;
        // The controller is gone
        if rx.has_changed().is_err() {
            break;
        }
        let form = rx.borrow_and_update().clone();
        if let Err(e) = save_draft(store.as_ref(), &session, &form, Utc::now()) {
            warn!(error = %e, "Autosave failed");
        }
    }
}
