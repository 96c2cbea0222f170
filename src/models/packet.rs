use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv4Addr;

/// Transport or application protocol of a simulated packet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Protocol {
    Tcp,
    Udp,
    Icmp,
    Http,
    Https,
}

impl Protocol {
    /// Every protocol, in the order the packet generator draws from
    pub const ALL: [Protocol; 5] = [
        Protocol::Tcp,
        Protocol::Udp,
        Protocol::Icmp,
        Protocol::Http,
        Protocol::Https,
    ];

    /// Base size ceiling in bytes. Generated sizes fall in `[50, base + 50)`.
    pub fn base_size(self) -> u32 {
        match self {
            Protocol::Http | Protocol::Https => 1500,
            Protocol::Tcp => 800,
            Protocol::Udp => 500,
            Protocol::Icmp => 200,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Protocol::Tcp => "TCP",
            Protocol::Udp => "UDP",
            Protocol::Icmp => "ICMP",
            Protocol::Http => "HTTP",
            Protocol::Https => "HTTPS",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity shared by packets and alerts, ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Low,
        Severity::Medium,
        Severity::High,
        Severity::Critical,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A simulated network packet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Packet {
    /// Unique identifier, `pkt_<unix millis>_<random suffix>`
    pub id: String,

    /// Time the packet was generated
    pub timestamp: DateTime<Utc>,

    #[serde(rename = "sourceIP")]
    pub source_ip: Ipv4Addr,

    #[serde(rename = "destinationIP")]
    pub destination_ip: Ipv4Addr,

    pub protocol: Protocol,

    /// Size in bytes
    pub size: u32,

    /// Destination port, 1 to 65535
    pub port: u16,

    pub is_anomaly: bool,

    /// Always `Low` unless `is_anomaly` is set
    pub severity: Severity,
}

impl Packet {
    /// Whether the free-text search term matches this packet.
    ///
    /// Addresses match on substring, protocol case-insensitively. An empty
    /// term matches every packet.
    pub fn matches_search(&self, term: &str) -> bool {
        if term.is_empty() {
            return true;
        }

        self.source_ip.to_string().contains(term)
            || self.destination_ip.to_string().contains(term)
            || self
                .protocol
                .as_str()
                .to_lowercase()
                .contains(&term.to_lowercase())
    }
}
