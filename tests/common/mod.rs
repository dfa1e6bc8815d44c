//! Common test infrastructure
//!
//! An in-memory backend speaking the four services' HTTP contracts, and a
//! harness wiring an [`Application`](config_hub::app::Application) onto it.
//! Tests should only import from this module.

mod backend;
mod constants;
mod harness;

#[allow(unused_imports)]
pub use backend::FakeBackend;
#[allow(unused_imports)]
pub use constants::*;
#[allow(unused_imports)]
pub use harness::TestApp;
