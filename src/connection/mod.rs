//! Connection Management
//!
//! Backend service addresses and client configuration.

mod config;

pub use config::*;
