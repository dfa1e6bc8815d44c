//! Service status and notifications

use std::fmt::Write;

use super::{Render, heading};
use crate::connection::Service;
use crate::i18n::{Locale, t};
use crate::services::ServiceHealth;
use crate::state::NotificationState;

/// One line per backend service
pub struct StatusView(pub ServiceHealth);

impl Render for StatusView {
    fn render(&self, locale: Locale) -> String {
        let mut out = heading(t(locale, "status-title"));
        for service in Service::all() {
            let (mark, label) = if self.0.get(service) {
                ("●", t(locale, "status-online"))
            } else {
                ("○", t(locale, "status-offline"))
            };
            let _ = writeln!(out, "{mark} {:<15} {label}", service.label());
        }
        out
    }
}

/// Pending notifications, oldest first
pub struct NotificationsView<'a>(pub &'a NotificationState);

impl Render for NotificationsView<'_> {
    fn render(&self, locale: Locale) -> String {
        if self.0.is_empty() {
            return t(locale, "notifications-empty").to_string();
        }
        self.0
            .entries()
            .map(|n| {
                format!(
                    "{} [{}] {}",
                    n.timestamp.format("%H:%M:%S"),
                    n.level.label(),
                    n.message
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
