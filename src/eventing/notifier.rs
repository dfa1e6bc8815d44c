//! Notifier - Sending Side of the Event Channel

use crossbeam_channel::{Receiver, Sender, unbounded};
use tracing::{debug, warn};

use super::app_event::AppEvent;
use crate::error::{Error, ErrorKind};

/// Cloneable handle controllers use to publish [`AppEvent`]s
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: Sender<AppEvent>,
}

/// Create a connected notifier / receiver pair
pub fn channel() -> (Notifier, Receiver<AppEvent>) {
    let (tx, rx) = unbounded();
    (Notifier { tx }, rx)
}

impl Notifier {
    pub fn send(&self, event: AppEvent) {
        // A dropped receiver only means nobody is listening anymore
        if self.tx.send(event).is_err() {
            debug!("Event receiver dropped");
        }
    }

    pub fn info(&self, message: impl Into<String>) {
        self.send(AppEvent::info(message));
    }

    pub fn success(&self, message: impl Into<String>) {
        self.send(AppEvent::success(message));
    }

    pub fn warn(&self, message: impl Into<String>) {
        self.send(AppEvent::warn(message));
    }

    pub fn error(&self, message: impl Into<String>) {
        self.send(AppEvent::error(message));
    }

    /// Turn an error into a notification, prefixed with the failing action
    pub fn report(&self, action: &str, err: &Error) {
        warn!(action, kind = ?err.kind(), error = %err, "Action failed");
        let message = match err.kind() {
            // Validation and session messages stand on their own
            ErrorKind::Validation | ErrorKind::Auth => err.to_string(),
            _ if action.is_empty() => err.to_string(),
            _ => format!("{action}: {err}"),
        };
        self.error(message);
        if err.kind() == ErrorKind::Auth {
            self.send(AppEvent::SessionChanged {
                authenticated: false,
            });
        }
    }
}
