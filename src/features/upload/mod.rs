//! Upload feature

mod controller;

pub use controller::{UploadController, UploadEntry};
