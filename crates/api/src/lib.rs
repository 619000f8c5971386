//! `scribe-api` — HTTP surface for the notes service.

pub mod app;
pub mod context;
pub mod middleware;
