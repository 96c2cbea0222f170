use crate::generator::source::RandomSource;
use crate::models::stats::{SessionStats, ThreatLevel};

/// Draw the headline figures that stay fixed for a whole session.
///
/// Threat level is low 70% of the time; otherwise a second draw picks medium
/// (below 0.9) or high.
pub fn generate_session_stats<S: RandomSource>(rng: &mut S) -> SessionStats {
    let active_connections = rng.range(100, 600) as u32;
    let threat_level = if rng.chance(0.7) {
        ThreatLevel::Low
    } else if rng.chance(0.9) {
        ThreatLevel::Medium
    } else {
        ThreatLevel::High
    };
    let avg_latency_ms = rng.range(20, 120) as u32;
    let uptime_percentage = rng.uniform(99.2, 100.0);

    SessionStats {
        active_connections,
        threat_level,
        avg_latency_ms,
        uptime_percentage,
    }
}
