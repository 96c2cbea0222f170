pub mod controller;
pub mod service;

pub use controller::{TelemetryController, TickOutcome};
pub use service::{DashboardHandle, DashboardService};
