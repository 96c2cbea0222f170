use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv4Addr;

use crate::models::packet::Severity;

/// Category an alert was raised under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertType {
    Anomaly,
    Security,
    Performance,
}

impl AlertType {
    pub const ALL: [AlertType; 3] = [
        AlertType::Anomaly,
        AlertType::Security,
        AlertType::Performance,
    ];

    /// Fixed message catalog for this alert type
    pub fn messages(self) -> &'static [&'static str; 4] {
        match self {
            AlertType::Anomaly => &[
                "Unusual packet size detected",
                "Suspicious traffic pattern identified",
                "Abnormal connection frequency",
                "Unexpected protocol usage",
            ],
            AlertType::Security => &[
                "Potential DDoS attack detected",
                "Unauthorized access attempt",
                "Malicious IP identified",
                "Port scanning detected",
            ],
            AlertType::Performance => &[
                "High bandwidth utilization",
                "Network congestion detected",
                "Latency threshold exceeded",
                "Connection timeout increase",
            ],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AlertType::Anomaly => "anomaly",
            AlertType::Security => "security",
            AlertType::Performance => "performance",
        }
    }
}

impl fmt::Display for AlertType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user-resolvable notification
///
/// Fields other than `resolved` are fixed at creation; the controller only
/// ever flips `resolved` from false to true.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: String,

    #[serde(rename = "type")]
    pub alert_type: AlertType,

    pub severity: Severity,

    pub message: String,

    pub timestamp: DateTime<Utc>,

    #[serde(rename = "sourceIP", skip_serializing_if = "Option::is_none", default)]
    pub source_ip: Option<Ipv4Addr>,

    #[serde(default)]
    pub resolved: bool,
}

/// Count of unresolved alerts at the two severities the header calls out
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityBreakdown {
    pub critical: usize,
    pub high: usize,
}

impl SeverityBreakdown {
    /// Tally the unresolved alerts in `alerts`
    pub fn from_alerts<'a>(alerts: impl IntoIterator<Item = &'a Alert>) -> Self {
        alerts
            .into_iter()
            .filter(|alert| !alert.resolved)
            .fold(Self::default(), |mut acc, alert| {
                match alert.severity {
                    Severity::Critical => acc.critical += 1,
                    Severity::High => acc.high += 1,
                    _ => {}
                }
                acc
            })
    }
}
