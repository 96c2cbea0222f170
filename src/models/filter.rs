use serde::{Deserialize, Serialize};

use crate::models::packet::Packet;

/// Which packets the live view shows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    #[default]
    All,
    Anomalies,
}

/// Filter criteria for the live packet view
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PacketFilter {
    /// Show every packet or only anomalies
    #[serde(default)]
    pub mode: FilterMode,

    /// Free-text search over addresses and protocol
    #[serde(default)]
    pub search: Option<String>,
}

impl PacketFilter {
    pub fn new(mode: FilterMode, search: Option<String>) -> Self {
        Self { mode, search }
    }

    /// Whether `packet` passes both the mode and the search term
    pub fn matches(&self, packet: &Packet) -> bool {
        let mode_ok = match self.mode {
            FilterMode::All => true,
            FilterMode::Anomalies => packet.is_anomaly,
        };

        mode_ok && packet.matches_search(self.search.as_deref().unwrap_or(""))
    }

    /// Matching packets in input order, at most `limit` of them
    pub fn apply<'a>(&self, packets: impl IntoIterator<Item = &'a Packet>, limit: usize) -> Vec<Packet> {
        packets
            .into_iter()
            .filter(|packet| self.matches(packet))
            .take(limit)
            .cloned()
            .collect()
    }
}
