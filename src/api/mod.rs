//! HTTP API server

pub mod auth;
pub mod routes;
pub mod server;

pub use server::*;
