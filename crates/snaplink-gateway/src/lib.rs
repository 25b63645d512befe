//! HTTP surface of snaplink.
//!
//! Wires the shortener and redirector services behind an axum router and
//! owns the process-level concerns: command line configuration, logging
//! setup and startup validation.

pub mod app;
pub mod cli;
pub mod error;
pub mod handlers;
pub mod model;
pub mod state;
pub mod telemetry;

pub use app::App;
pub use state::AppState;
