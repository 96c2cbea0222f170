use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::alert::{Alert, SeverityBreakdown};
use crate::models::packet::Packet;
use crate::models::stats::{
    FormattedTotals, NetworkStatus, ProtocolStat, SessionStats, TopIpRecord, Totals,
};
use crate::models::traffic::TrafficSample;

/// Header figures: alert pressure and overall health
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStatus {
    pub active_alerts: usize,
    pub network_status: NetworkStatus,
    pub severity_breakdown: SeverityBreakdown,
}

/// Immutable copy of everything the dashboard renders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub generated_at: DateTime<Utc>,

    /// Live packets, newest first
    pub packets: Vec<Packet>,

    /// All alerts, newest first, resolved ones included
    pub alerts: Vec<Alert>,

    pub traffic: Vec<TrafficSample>,

    pub top_ips: Vec<TopIpRecord>,

    pub protocol_stats: Vec<ProtocolStat>,

    pub totals: Totals,

    pub formatted_totals: FormattedTotals,

    pub session: SessionStats,

    pub status: DashboardStatus,
}
