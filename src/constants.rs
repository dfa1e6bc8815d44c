//! Client Constants
//!
//! Centralized constants for paging, persistence keys and timings.

use std::time::Duration;

/// Items per page on the configurations list
pub const LIST_PAGE_SIZE: usize = 6;

/// Items per page on the search results
pub const SEARCH_PAGE_SIZE: usize = 20;

/// Default `limit` sent to the advanced search endpoint
pub const SEARCH_DEFAULT_LIMIT: usize = 50;

/// Pages shown on each side of the current one in the pagination bar
pub const PAGINATION_WINDOW: usize = 2;

/// Maximum related configurations shown on the detail page
pub const RELATED_LIMIT: usize = 5;

/// Configurations shown in the dashboard "recent" panel
pub const DASHBOARD_RECENT_LIMIT: usize = 6;

/// Window for the "created recently" statistic
pub const RECENT_WINDOW_DAYS: i64 = 7;

/// Minimum query length that triggers search-as-you-type
pub const SEARCH_MIN_QUERY_LEN: usize = 3;

/// Debounce before a typed query is sent
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

/// Delay before an anonymous user is redirected off a protected page
pub const AUTH_REDIRECT_DELAY: Duration = Duration::from_secs(2);

/// Delay before moving to a freshly uploaded configuration
pub const UPLOAD_REDIRECT_DELAY: Duration = Duration::from_millis(1500);

/// Autosave period of the upload form
pub const AUTOSAVE_INTERVAL: Duration = Duration::from_secs(30);

/// Age after which an autosaved draft is discarded
pub const DRAFT_TTL_HOURS: i64 = 24;

/// Minimum accepted password length at registration
pub const MIN_PASSWORD_LEN: usize = 6;

/// Notification buffer capacity
pub const NOTIFICATION_CAPACITY: usize = 50;

/// Persisted storage keys
pub const STORAGE_AUTH_TOKEN: &str = "authToken";
pub const STORAGE_USER_DATA: &str = "userData";
pub const STORAGE_UPLOAD_AUTOSAVE: &str = "upload_autosave";

/// Default request timeout
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Placeholder author shown when the profile lookup fails
pub const UNKNOWN_USER: &str = "Unknown User";
