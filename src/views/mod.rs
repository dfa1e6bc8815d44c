//! Views - Text Rendering
//!
//! Renderers turn page state into plain text. They never fetch anything, so
//! the controllers and list engine stay testable on their own.

mod detail;
mod list;
mod menu;
mod status;

pub use detail::DetailView;
pub use list::{EmptyState, ListPage, SuggestionsView, card};
pub use menu::ProfileView;
pub use status::{NotificationsView, StatusView};

use crate::i18n::Locale;

/// Something that can be shown to the user
pub trait Render {
    fn render(&self, locale: Locale) -> String;
}

/// Underlined section heading
pub(crate) fn heading(title: &str) -> String {
    format!("{title}\n{}\n", "=".repeat(title.chars().count()))
}
