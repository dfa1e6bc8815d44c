//! Detail feature

mod controller;

pub use controller::{DetailController};
