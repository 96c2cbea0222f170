//! Synthetic network telemetry for a live monitoring dashboard.
//!
//! Generators in [`generator`] produce packets, alerts, traffic samples,
//! top talkers and protocol shares. [`dashboard::TelemetryController`] keeps
//! the rolling state they feed, and [`dashboard::DashboardService`] drives it
//! from two timers on a single task. [`api`] serves the result over HTTP and
//! WebSocket.

pub mod api;
pub mod dashboard;
pub mod generator;
pub mod models;
pub mod utils;
