use serde::{Deserialize, Serialize};

/// One-minute aggregate of simulated traffic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrafficSample {
    /// Local wall-clock minute, `HH:mm`
    pub timestamp: String,

    pub packets_per_second: u32,

    /// `packets_per_second` scaled by a per-sample average packet size
    pub bytes_per_second: f64,

    pub anomalies: u32,
}
