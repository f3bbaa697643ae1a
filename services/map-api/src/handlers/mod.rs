//! HTTP request handlers for the map API.

pub mod health;
pub mod preview;
pub mod query;
