//! Service Layer
//!
//! HTTP plumbing towards the four backends and the async helpers around it.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        ApiClient                             │
//! │  ┌─────────────┐  ┌─────────────┐  ┌──────────────────┐    │
//! │  │  Transport  │  │  normalize  │  │  SessionManager  │    │
//! │  │  (reqwest)  │  │  (payloads) │  │  (bearer / 401)  │    │
//! │  └─────────────┘  └─────────────┘  └──────────────────┘    │
//! └─────────────────────────────────────────────────────────────┘
//!                            │
//!                            ▼ canonical domain types
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Feature controllers                          │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod api;
pub mod normalize;
mod runtime;
mod sequencer;
mod transport;

pub use api::*;
pub use runtime::*;
pub use sequencer::*;
pub use transport::*;

#[cfg(test)]
pub(crate) use transport::scripted;
