//! AppEvent - Application Event Enum
//!
//! Events sent from controllers and services to whatever front end is attached.

use std::time::Duration;

use chrono::{DateTime, Local};

use crate::app::navigation::Route;
use crate::connection::Service;

/// Severity of a user-facing notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyLevel {
    Info,
    Success,
    Warn,
    Error,
}

impl NotifyLevel {
    pub fn label(&self) -> &'static str {
        match self {
            NotifyLevel::Info => "INFO",
            NotifyLevel::Success => "OK",
            NotifyLevel::Warn => "WARN",
            NotifyLevel::Error => "ERROR",
        }
    }
}

/// Application events for controller -> front end communication
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// Transient, dismissible notification
    Notify {
        level: NotifyLevel,
        message: String,
        timestamp: DateTime<Local>,
    },

    /// Session switched between anonymous and authenticated
    SessionChanged { authenticated: bool },

    /// Health check result for one backend
    ServiceStatus { service: Service, online: bool },

    /// Navigate to `to` once `after` has elapsed
    Redirect { to: Route, after: Duration },
}

impl AppEvent {
    /// Create a notification with current timestamp
    pub fn notify(level: NotifyLevel, message: impl Into<String>) -> Self {
        Self::Notify {
            level,
            message: message.into(),
            timestamp: Local::now(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::notify(NotifyLevel::Info, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::notify(NotifyLevel::Success, message)
    }

    pub fn warn(message: impl Into<String>) -> Self {
        Self::notify(NotifyLevel::Warn, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::notify(NotifyLevel::Error, message)
    }

    pub fn redirect(to: Route, after: Duration) -> Self {
        Self::Redirect { to, after }
    }
}
