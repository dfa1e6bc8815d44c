//! Dashboard feature

mod controller;

pub use controller::{DashboardController, DashboardView};
