//! Detail Controller
//!
//! One configuration with its author, statistics, comments and related
//! configurations. Every mutation is followed by a fresh fetch of the detail.

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{info, warn};

use crate::app::application::AppContext;
use crate::constants::RELATED_LIMIT;
use crate::domain::configuration::Author;
use crate::error::{Error, Result};
use crate::state::{DetailState, LoadState, RelatedState};

/// Detail page controller
pub struct DetailController {
    ctx: AppContext,
    state: DetailState,
}

impl DetailController {
    pub fn new(ctx: AppContext, config_id: impl Into<String>) -> Self {
        Self {
            ctx,
            state: DetailState::new(config_id),
        }
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    /// Whether the signed-in user appears among the likers
    pub fn has_liked(&self) -> bool {
        let user = self.ctx.session.current_user();
        self.state.has_liked(user.as_ref().map(|u| u.id.as_str()))
    }

    /// Load the configuration, then its author and related list. Only the
    /// main fetch can fail the page.
    pub async fn load(&mut self) -> &DetailState {
        self.state.load = LoadState::Loading;
        match self.ctx.api.configuration_details(&self.state.config_id).await {
            Ok(detail) => self.state.loaded(detail),
            Err(e) => {
                self.ctx.notifier.report(self.ctx.t("detail-load-failed"), &e);
                self.state.failed(e.to_string());
                return &self.state;
            }
        }

        self.resolve_author().await;
        self.load_related().await;
        &self.state
    }

    pub async fn retry(&mut self) -> &DetailState {
        self.load().await
    }

    async fn resolve_author(&mut self) {
        let Some(detail) = self.state.detail.as_ref() else {
            return;
        };
        if detail.author.is_some() {
            return;
        }
        let author = match detail.summary.user_id.clone() {
            Some(user_id) => match self.ctx.api.user_by_id(&user_id).await {
                Ok(user) => Author {
                    username: user.username,
                    email: Some(user.email).filter(|e| !e.is_empty()),
                },
                Err(e) => {
                    warn!(%user_id, error = %e, "Author lookup failed");
                    DetailState::placeholder_author()
                }
            },
            None => DetailState::placeholder_author(),
        };
        self.state.set_author(author);
    }

    async fn load_related(&mut self) {
        let Some(game) = self.state.detail.as_ref().map(|d| d.summary.game.trim().to_string()) else {
            return;
        };
        if game.is_empty() {
            self.state.related = RelatedState::Loaded(Vec::new());
            return;
        }
        match self.ctx.api.search_configs(Some(&game)).await {
            Ok(candidates) => self.state.set_related(candidates, RELATED_LIMIT),
            Err(e) => {
                warn!(%game, error = %e, "Related configurations unavailable");
                self.state.related = RelatedState::Unavailable;
            }
        }
    }

    /// Re-fetch and merge over the local copy
    async fn refresh(&mut self) -> Result<()> {
        let updated = self
            .ctx
            .api
            .configuration_details(&self.state.config_id)
            .await?;
        self.state.merge(updated);
        Ok(())
    }

    fn require_session(&self) -> Result<()> {
        if self.ctx.session.is_authenticated() {
            Ok(())
        } else {
            Err(Error::validation(self.ctx.t("auth-required")))
        }
    }

    /// Announce a finished mutation, then re-fetch. A failed re-fetch keeps
    /// the local copy and is reported on its own; the mutation still counts.
    async fn finish(
        &mut self,
        result: Result<()>,
        success_key: &'static str,
        failure_key: &'static str,
    ) -> bool {
        if let Err(e) = result {
            self.ctx.notifier.report(self.ctx.t(failure_key), &e);
            return false;
        }
        self.ctx.notifier.success(self.ctx.t(success_key));
        self.refresh_or_report().await;
        true
    }

    async fn refresh_or_report(&mut self) {
        if let Err(e) = self.refresh().await {
            self.ctx.notifier.report(self.ctx.t("detail-refresh-failed"), &e);
        }
    }

    pub async fn add_comment(&mut self, text: &str) -> bool {
        let result = self.try_add_comment(text).await;
        self.finish(result, "comment-added", "comment-failed").await
    }

    async fn try_add_comment(&self, text: &str) -> Result<()> {
        self.require_session()?;
        self.ctx.api.add_comment(&self.state.config_id, text).await?;
        Ok(())
    }

    pub async fn edit_comment(&mut self, comment_id: &str, text: &str) -> bool {
        let result = self.try_edit_comment(comment_id, text).await;
        self.finish(result, "comment-updated", "comment-failed").await
    }

    async fn try_edit_comment(&self, comment_id: &str, text: &str) -> Result<()> {
        self.require_session()?;
        self.ctx.api.edit_comment(comment_id, text).await?;
        Ok(())
    }

    pub async fn delete_comment(&mut self, comment_id: &str) -> bool {
        let result = self.try_delete_comment(comment_id).await;
        self.finish(result, "comment-deleted", "comment-failed").await
    }

    async fn try_delete_comment(&self, comment_id: &str) -> Result<()> {
        self.require_session()?;
        self.ctx.api.delete_comment(comment_id).await?;
        Ok(())
    }

    pub async fn rate(&mut self, rating: u8) -> bool {
        let result = self.try_rate(rating).await;
        self.finish(result, "rating-saved", "rating-failed").await
    }

    async fn try_rate(&self, rating: u8) -> Result<()> {
        self.require_session()?;
        self.ctx.api.add_rating(&self.state.config_id, rating).await?;
        Ok(())
    }

    /// Like or unlike. The message follows the refreshed like state, or the
    /// backend's answer when the re-fetch fails.
    pub async fn toggle_like(&mut self) -> bool {
        let was_liked = self.has_liked();
        let answer = match self.try_toggle_like().await {
            Ok(answer) => answer,
            Err(e) => {
                self.ctx.notifier.report(self.ctx.t("like-failed"), &e);
                return false;
            }
        };

        let refreshed = self.refresh().await;
        let liked = match refreshed {
            Ok(()) => self.has_liked(),
            Err(_) => answer
                .get("liked")
                .and_then(Value::as_bool)
                .unwrap_or(!was_liked),
        };
        info!(config = %self.state.config_id, liked, "Like toggled");
        let key = if liked { "like-added" } else { "like-removed" };
        self.ctx.notifier.success(self.ctx.t(key));
        if let Err(e) = refreshed {
            self.ctx.notifier.report(self.ctx.t("detail-refresh-failed"), &e);
        }
        true
    }

    async fn try_toggle_like(&self) -> Result<Value> {
        self.require_session()?;
        self.ctx.api.toggle_like(&self.state.config_id).await
    }

    pub fn share_link(&self) -> String {
        self.state.share_link(&self.ctx.config.share_base_url)
    }

    pub fn parameters_json(&self) -> String {
        self.state.parameters_pretty()
    }

    /// Export document plus a suggested file name
    pub fn export(&self, now: DateTime<Utc>) -> Option<(String, Value)> {
        let source = self.share_link();
        let document = self.state.export_document(&source, now)?;
        Some((self.state.export_file_name(), document))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::connection::HubConfig;
    use crate::constants::UNKNOWN_USER;
    use crate::domain::user::UserProfile;
    use crate::eventing::channel;
    use crate::services::Method;
    use crate::services::scripted::ScriptedTransport;
    use crate::utils::config_store::MemoryStore;

    fn context(transport: Arc<ScriptedTransport>, logged_in: bool) -> AppContext {
        let (notifier, _rx) = channel();
        let ctx = AppContext::new(
            HubConfig::default(),
            Arc::new(MemoryStore::new()),
            transport,
            notifier,
        );
        if logged_in {
            ctx.session
                .establish(
                    "tok".to_string(),
                    UserProfile {
                        id: "u1".to_string(),
                        username: "mario".to_string(),
                        email: "m@x".to_string(),
                    },
                )
                .expect("establish");
        }
        ctx
    }

    fn detail_body(likes: &[&str], comments: usize) -> serde_json::Value {
        json!({
            "_id": "c1",
            "title": "Tournament",
            "game": "Chess",
            "user_id": "author-1",
            "parameters": {"clock": 300},
            "likes": likes.iter().map(|u| json!({"user_id": u})).collect::<Vec<_>>(),
            "comments": (0..comments).map(|i| json!({"id": i.to_string(), "comment": "nice"})).collect::<Vec<_>>(),
        })
    }

    #[tokio::test]
    async fn test_partial_failures_degrade() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.on(Method::Get, "/visualizations/configs/c1", 200, detail_body(&[], 0));
        transport.on(Method::Get, "/users/author-1", 500, json!({"detail": "down"}));
        transport.unreachable(Method::Get, "/configs/?game=Chess");
        let mut page = DetailController::new(context(transport, false), "c1");

        let state = page.load().await;
        assert_eq!(state.load, LoadState::Loaded);
        assert_eq!(state.related, RelatedState::Unavailable);
        let author = state.detail.as_ref().and_then(|d| d.author.clone()).expect("author");
        assert_eq!(author.username, UNKNOWN_USER);
    }

    #[tokio::test]
    async fn test_blank_game_has_no_related() {
        let transport = Arc::new(ScriptedTransport::new());
        let mut body = detail_body(&[], 0);
        body["game"] = json!("  ");
        transport.on(Method::Get, "/visualizations/configs/c1", 200, body);
        transport.on(Method::Get, "/configs/", 200, json!([{"_id": "c2", "title": "Other", "game": "Quake"}]));
        let mut page = DetailController::new(context(transport.clone(), false), "c1");

        let state = page.load().await;
        assert_eq!(state.related, RelatedState::Loaded(Vec::new()));
        assert_eq!(transport.count(Method::Get, "/configs/"), 0);
    }

    #[tokio::test]
    async fn test_failed_load_is_retryable() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.on(Method::Get, "/visualizations/configs/c1", 404, json!({"detail": "Configuration not found"}));
        transport.on(Method::Get, "/visualizations/configs/c1", 200, detail_body(&[], 0));
        let mut page = DetailController::new(context(transport, false), "c1");

        assert_eq!(
            page.load().await.load,
            LoadState::Failed {
                message: "Configuration not found".to_string()
            }
        );
        assert_eq!(page.retry().await.load, LoadState::Loaded);
    }

    #[tokio::test]
    async fn test_mutations_need_a_session() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.on(Method::Get, "/visualizations/configs/c1", 200, detail_body(&[], 0));
        let mut page = DetailController::new(context(transport.clone(), false), "c1");
        page.load().await;

        assert!(!page.add_comment("hello").await);
        assert!(!page.toggle_like().await);
        assert_eq!(transport.count(Method::Post, "/valutations/"), 0);
    }

    #[tokio::test]
    async fn test_like_toggles_through_refetch() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.on(Method::Get, "/visualizations/configs/c1", 200, detail_body(&[], 0));
        transport.on(Method::Get, "/visualizations/configs/c1", 200, detail_body(&["u1"], 0));
        transport.on(Method::Get, "/visualizations/configs/c1", 200, detail_body(&[], 0));
        transport.on(Method::Post, "/like", 200, json!({"liked": true}));
        let mut page = DetailController::new(context(transport, true), "c1");
        page.load().await;
        assert!(!page.has_liked());

        assert!(page.toggle_like().await);
        assert!(page.has_liked());
        assert!(page.toggle_like().await);
        assert!(!page.has_liked());
    }

    #[tokio::test]
    async fn test_rating_out_of_range_never_reaches_network() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.on(Method::Get, "/visualizations/configs/c1", 200, detail_body(&[], 0));
        let mut page = DetailController::new(context(transport.clone(), true), "c1");
        page.load().await;

        assert!(!page.rate(6).await);
        assert_eq!(transport.count(Method::Post, "/rating"), 0);
    }

    #[tokio::test]
    async fn test_export_uses_share_link_as_source() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.on(Method::Get, "/visualizations/configs/c1", 200, detail_body(&[], 0));
        transport.on(Method::Get, "/users/author-1", 200, json!({"user_id": "author-1", "username": "anand"}));
        let mut page = DetailController::new(context(transport, false), "c1");
        page.load().await;

        let (file, document) = page.export(Utc::now()).expect("export");
        assert_eq!(file, "Tournament.json");
        assert_eq!(document["author"], "anand");
        assert_eq!(document["source"], "http://localhost:8080/configuration.html?id=c1");
        assert_eq!(document["parameters"], json!({"clock": 300}));
    }
}
