use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::generator::traffic::MAX_WINDOW_MINUTES;
use crate::utils::error::{AppError, AppResult};

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Port for the dashboard API server
    pub port: u16,

    /// Packet timer period in milliseconds
    pub tick_interval_ms: u64,

    /// Snapshot refresh timer period in seconds
    pub refresh_interval_secs: u64,

    /// Capacity of the live packet buffer
    pub buffer_size: usize,

    /// Lookback window of the traffic chart, in minutes
    pub window_minutes: u32,

    /// Seed for a reproducible session; entropy when unset
    pub seed: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            tick_interval_ms: 1000,
            refresh_interval_secs: 30,
            buffer_size: 100,
            window_minutes: 30,
            seed: None,
        }
    }
}

impl AppConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    /// Reject values the controller or timers cannot run with
    pub fn validate(&self) -> AppResult<()> {
        if self.tick_interval_ms == 0 {
            return Err(AppError::InvalidConfig(
                "tick interval must be at least 1ms".to_string(),
            ));
        }
        if self.refresh_interval_secs == 0 {
            return Err(AppError::InvalidConfig(
                "refresh interval must be at least 1s".to_string(),
            ));
        }
        if self.buffer_size == 0 {
            return Err(AppError::InvalidConfig(
                "packet buffer size must be at least 1".to_string(),
            ));
        }
        if self.window_minutes > MAX_WINDOW_MINUTES {
            return Err(AppError::InvalidWindow(self.window_minutes, MAX_WINDOW_MINUTES));
        }
        Ok(())
    }
}
