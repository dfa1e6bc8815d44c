//! Auth feature

mod controller;

pub use controller::{AuthController};
