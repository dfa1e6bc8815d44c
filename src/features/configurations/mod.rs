//! Configurations feature

mod controller;

pub use controller::{ConfigurationsController};
