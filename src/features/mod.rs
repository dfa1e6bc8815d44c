//! Features - Vertical Feature Slices
//!
//! One controller per page. Controllers own page state, talk to the API
//! through the injected context and turn every failure into a notification.

pub mod auth;
pub mod configurations;
pub mod dashboard;
pub mod detail;
pub mod search;
pub mod upload;
