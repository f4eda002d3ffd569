//! podcast-wizard: a guided, four-step terminal workflow that turns news
//! content into a two-host podcast through a generation backend.
//!
//! The `podwiz` binary drives these modules; they are public so the
//! integration tests can exercise the client and controller directly.

pub mod api;
pub mod config;
pub mod script;
pub mod session;
pub mod ui;
pub mod wizard;
