//! Application Layer
//!
//! Dependency wiring and page navigation.

pub mod application;
pub mod navigation;

pub use application::{AppContext, Application};
