//! Domain - Pure Data Structures and Protocol Types
//!
//! These types carry no I/O and represent the configuration hub's business domain.

pub mod configuration;
pub mod draft;
pub mod parameter;
pub mod search;
pub mod user;
