//! Eventing - Application Events and Notifications

pub mod app_event;
pub mod notifier;

pub use app_event::{AppEvent, NotifyLevel};
pub use notifier::{Notifier, channel};
