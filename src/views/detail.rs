//! Detail page

use std::fmt::Write;

use super::{Render, heading, list::card};
use crate::i18n::{Locale, t};
use crate::state::{DetailState, LoadState, RelatedState};
use crate::utils::format::{format_average, format_optional_datetime, star_rating};

/// Detail page as seen by the current user
pub struct DetailView<'a> {
    pub state: &'a DetailState,
    pub liked: bool,
    pub share_link: String,
}

impl Render for DetailView<'_> {
    fn render(&self, locale: Locale) -> String {
        let detail = match (&self.state.load, &self.state.detail) {
            (LoadState::Loading, _) => return t(locale, "detail-loading").to_string(),
            (LoadState::Failed { message }, _) => {
                return format!(
                    "{}: {message}\n-> {}",
                    t(locale, "detail-error"),
                    t(locale, "detail-retry")
                );
            }
            (LoadState::Loaded, None) => return t(locale, "detail-loading").to_string(),
            (LoadState::Loaded, Some(detail)) => detail,
        };
        let summary = &detail.summary;

        let mut out = heading(&summary.title);
        let author = detail
            .author
            .as_ref()
            .map(|a| a.username.as_str())
            .unwrap_or("-");
        let _ = writeln!(out, "{}: {}", t(locale, "detail-game"), summary.game);
        let _ = writeln!(out, "{}: {author}", t(locale, "detail-author"));
        let _ = writeln!(
            out,
            "{}: {}",
            t(locale, "detail-created"),
            format_optional_datetime(summary.created_at.as_ref(), "-")
        );
        if !summary.tags.is_empty() {
            let _ = writeln!(out, "{}: {}", t(locale, "detail-tags"), summary.tags.join(", "));
        }
        if !summary.description.trim().is_empty() {
            let _ = writeln!(out, "\n{}", summary.description.trim());
        }

        // Stats
        let like_label = if self.liked {
            t(locale, "detail-liked")
        } else {
            t(locale, "detail-not-liked")
        };
        let _ = writeln!(
            out,
            "\n{}: {}  {}: {} ({like_label})  {}: {} {} ({})",
            t(locale, "detail-views"),
            detail.views,
            t(locale, "detail-likes"),
            detail.likes_count,
            t(locale, "detail-rating"),
            star_rating(detail.average_rating.unwrap_or(0.0), 5),
            format_average(detail.average_rating),
            detail.ratings_count
        );

        let _ = writeln!(out, "\n{}", t(locale, "detail-parameters"));
        let _ = writeln!(out, "{}", self.state.parameters_pretty());

        let _ = writeln!(
            out,
            "\n{} ({})",
            t(locale, "detail-comments"),
            detail.comments_count
        );
        if detail.comments.is_empty() {
            let _ = writeln!(out, "  {}", t(locale, "detail-no-comments"));
        }
        for comment in &detail.comments {
            let _ = writeln!(
                out,
                "  - {} ({}): {}",
                comment.username.as_deref().unwrap_or("-"),
                format_optional_datetime(comment.created_at.as_ref(), "-"),
                comment.text
            );
        }

        let _ = writeln!(out, "\n{}", t(locale, "detail-related"));
        match &self.state.related {
            RelatedState::Pending => {}
            RelatedState::Unavailable => {
                let _ = writeln!(out, "  {}", t(locale, "detail-related-unavailable"));
            }
            RelatedState::Loaded(related) if related.is_empty() => {
                let _ = writeln!(out, "  {}", t(locale, "detail-related-empty"));
            }
            RelatedState::Loaded(related) => {
                for item in related {
                    let _ = writeln!(out, "{}", card(item, locale));
                }
            }
        }

        let _ = write!(out, "\n{}: {}", t(locale, "detail-share"), self.share_link);
        out
    }
}
