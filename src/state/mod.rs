//! State - Page and Session State
//!
//! Plain data owned by the controllers. Nothing here performs I/O except the
//! session, which persists itself through the injected [`LocalStore`].
//!
//! [`LocalStore`]: crate::utils::config_store::LocalStore

pub mod connection_state;
pub mod detail_state;
pub mod list_state;
pub mod notification_state;
pub mod session_state;
pub mod upload_state;

pub use connection_state::ConnectionState;
pub use detail_state::{DetailState, LoadState, RelatedState};
pub use list_state::{ListOutcome, ListState, PageView};
pub use notification_state::NotificationState;
pub use session_state::{GuardDecision, NavMenu, Session, SessionManager};
pub use upload_state::{DraftCheck, UploadForm};
