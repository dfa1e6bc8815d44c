//! NotificationState - Dismissible Notifications with Ring Buffer

use chrono::{DateTime, Local};
use crossbeam_channel::Receiver;

use crate::constants::NOTIFICATION_CAPACITY;
use crate::eventing::{AppEvent, NotifyLevel};
use crate::helpers::BoundedDeque;

/// A single notification
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: u64,
    pub level: NotifyLevel,
    pub message: String,
    pub timestamp: DateTime<Local>,
}

/// Notifications waiting to be shown or dismissed
#[derive(Debug)]
pub struct NotificationState {
    entries: BoundedDeque<Notification>,
    next_id: u64,
}

impl NotificationState {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: BoundedDeque::new(capacity),
            next_id: 1,
        }
    }

    pub fn push(&mut self, level: NotifyLevel, message: impl Into<String>, timestamp: DateTime<Local>) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push(Notification {
            id,
            level,
            message: message.into(),
            timestamp,
        });
        id
    }

    /// Absorb pending events; non-notification events are handed back
    pub fn drain(&mut self, rx: &Receiver<AppEvent>) -> Vec<AppEvent> {
        let mut others = Vec::new();
        for event in rx.try_iter() {
            match event {
                AppEvent::Notify {
                    level,
                    message,
                    timestamp,
                } => {
                    self.push(level, message, timestamp);
                }
                other => others.push(other),
            }
        }
        others
    }

    pub fn dismiss(&mut self, id: u64) {
        self.entries.retain(|n| n.id != id);
    }

    pub fn entries(&self) -> impl Iterator<Item = &Notification> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn has_errors(&self) -> bool {
        self.entries.iter().any(|n| n.level == NotifyLevel::Error)
    }
}

impl Default for NotificationState {
    fn default() -> Self {
        Self::new(NOTIFICATION_CAPACITY)
    }
}
