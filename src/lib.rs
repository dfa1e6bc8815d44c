//! Config Hub Client Library
//!
//! Native client for a configuration-sharing hub: four HTTP backends (users,
//! configs, visualizations, valuations) behind one typed API, with session
//! handling, list/search engines and page controllers a front end drives.

pub mod app;
pub mod connection;
pub mod constants;
pub mod domain;
pub mod error;
pub mod eventing;
pub mod features;
pub mod helpers;
pub mod i18n;
pub mod services;
pub mod state;
pub mod utils;
pub mod views;
