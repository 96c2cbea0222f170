use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;

use crate::utils::format;

/// Traffic volume attributed to one source address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopIpRecord {
    pub ip: Ipv4Addr,

    /// Packets seen from this address
    pub packets: u64,

    /// Bytes seen from this address
    pub bytes: u64,

    /// Country the address geolocates to
    pub country: String,
}

/// Share of packets carried by one protocol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtocolStat {
    pub protocol: String,

    pub packets: u64,

    /// Rounded share of the total, 0 to 100
    pub percentage: u8,

    /// Chart color token, e.g. `#3b82f6`
    pub color: String,
}

/// Threat level chosen once per session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThreatLevel {
    Low,
    Medium,
    High,
}

impl ThreatLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            ThreatLevel::Low => "low",
            ThreatLevel::Medium => "medium",
            ThreatLevel::High => "high",
        }
    }
}

/// Overall network health shown in the header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkStatus {
    Healthy,
    Warning,
    Critical,
}

impl From<ThreatLevel> for NetworkStatus {
    fn from(level: ThreatLevel) -> Self {
        match level {
            ThreatLevel::High => NetworkStatus::Critical,
            ThreatLevel::Medium => NetworkStatus::Warning,
            ThreatLevel::Low => NetworkStatus::Healthy,
        }
    }
}

/// Headline figures fixed for the lifetime of a session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStats {
    pub active_connections: u32,
    pub threat_level: ThreatLevel,
    pub avg_latency_ms: u32,
    pub uptime_percentage: f64,
}

/// Running totals accumulated by the packet timer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub total_packets: u64,
    pub total_bytes: u64,
}

/// Totals and session figures rendered for the stats cards
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedTotals {
    pub total_packets: String,
    pub data_processed: String,
    pub active_connections: String,
    pub threat_level: String,
    pub avg_latency: String,
    pub latency_rating: String,
    pub uptime: String,
    pub uptime_hours: String,
}

impl FormattedTotals {
    pub fn new(totals: &Totals, session: &SessionStats) -> Self {
        Self {
            total_packets: format::format_count(totals.total_packets),
            data_processed: format::format_bytes(totals.total_bytes),
            active_connections: format::format_count(u64::from(session.active_connections)),
            threat_level: format::capitalize(session.threat_level.as_str()),
            avg_latency: format!("{}ms", session.avg_latency_ms),
            latency_rating: format::latency_rating(session.avg_latency_ms).to_string(),
            uptime: format!("{:.2}%", session.uptime_percentage),
            uptime_hours: format::uptime_hours(session.uptime_percentage),
        }
    }
}
