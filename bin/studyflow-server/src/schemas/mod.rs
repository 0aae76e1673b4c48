//! Request and response bodies of the HTTP API.

pub mod auth;
pub mod event;
pub mod task;
