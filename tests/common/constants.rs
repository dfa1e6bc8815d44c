//! Accounts and fixtures shared by the end-to-end tests

pub const TEST_USER: &str = "mario";
pub const TEST_EMAIL: &str = "mario@example.com";
pub const TEST_PASS: &str = "secret123";

pub const OTHER_USER: &str = "luigi";
pub const OTHER_EMAIL: &str = "luigi@example.com";
pub const OTHER_PASS: &str = "password456";
