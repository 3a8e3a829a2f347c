//! songreviews - Song review API with token authentication
//!
//! This is the library interface for songreviews: the data store, the
//! authentication core and the axum application built on them.

pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod store;

pub use config::Config;
pub use error::{AuthFailure, Error};
