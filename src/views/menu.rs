//! Navigation menu and profile

use std::fmt::Write;

use super::{Render, heading};
use crate::domain::user::UserProfile;
use crate::i18n::{Locale, t};
use crate::state::NavMenu;

impl Render for NavMenu {
    fn render(&self, locale: Locale) -> String {
        let (prefix, actions) = match self {
            NavMenu::Authenticated { username, actions } => (format!("[{username}] "), actions),
            NavMenu::Anonymous { actions } => (String::new(), actions),
        };
        let labels: Vec<&str> = actions.iter().map(|a| t(locale, a.label_key())).collect();
        format!("{prefix}{}", labels.join(" | "))
    }
}

/// The cached profile of the signed-in user
pub struct ProfileView<'a>(pub Option<&'a UserProfile>);

impl Render for ProfileView<'_> {
    fn render(&self, locale: Locale) -> String {
        let mut out = heading(t(locale, "profile-title"));
        match self.0 {
            Some(user) => {
                let _ = writeln!(out, "{}: {}", t(locale, "profile-username"), user.username);
                let _ = writeln!(out, "{}: {}", t(locale, "profile-email"), user.email);
                let _ = writeln!(out, "{}: {}", t(locale, "profile-id"), user.id);
            }
            None => out.push_str(t(locale, "profile-anonymous")),
        }
        out
    }
}
