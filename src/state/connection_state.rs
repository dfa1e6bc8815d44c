//! ConnectionState - Health of the Backend Services

use std::collections::HashMap;

use chrono::{DateTime, Local};

use crate::connection::Service;

/// Status of a single service
#[derive(Debug, Clone, Default)]
pub struct ConnectionStatus {
    pub online: bool,
    pub checked_at: Option<DateTime<Local>>,
}

/// State for all backend services
#[derive(Debug, Clone, Default)]
pub struct ConnectionState {
    statuses: HashMap<Service, ConnectionStatus>,
}

impl ConnectionState {
    pub fn set_status(&mut self, service: Service, online: bool) {
        self.statuses.insert(
            service,
            ConnectionStatus {
                online,
                checked_at: Some(Local::now()),
            },
        );
    }

    /// Unknown services count as offline
    pub fn is_online(&self, service: Service) -> bool {
        self.statuses
            .get(&service)
            .map(|s| s.online)
            .unwrap_or(false)
    }
}
