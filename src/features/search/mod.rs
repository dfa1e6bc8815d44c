//! Search feature

mod controller;

pub use controller::{SearchController, SearchOutcome};
