use crate::generator::clock::Clock;
use crate::generator::source::RandomSource;
use crate::generator::{random_id, random_ipv4};
use crate::models::packet::{Packet, Protocol, Severity};

/// Smallest generated packet size in bytes
pub const MIN_PACKET_SIZE: u32 = 50;

/// Probability that an otherwise normal packet is flagged anyway
pub const BASELINE_ANOMALY_RATE: f64 = 0.05;

/// Whether `size` is past 80% of the protocol's base size
pub fn is_oversized(protocol: Protocol, size: u32) -> bool {
    size * 5 > protocol.base_size() * 4
}

/// Severity of an anomalous packet from one draw: 30% high, 20% medium, 50% low
pub fn anomaly_severity(r: f64) -> Severity {
    if r < 0.3 {
        Severity::High
    } else if r < 0.5 {
        Severity::Medium
    } else {
        Severity::Low
    }
}

/// Generate one simulated packet.
///
/// Draw order: protocol, size, baseline anomaly flag, severity (anomalies
/// only), source address, destination address, port, id suffix.
pub fn generate_packet<S: RandomSource>(rng: &mut S, clock: &dyn Clock) -> Packet {
    let protocol = *rng.pick(&Protocol::ALL);
    let base = protocol.base_size();
    let size = rng.range(u64::from(MIN_PACKET_SIZE), u64::from(base + MIN_PACKET_SIZE)) as u32;

    let flagged = rng.chance(BASELINE_ANOMALY_RATE);
    let is_anomaly = is_oversized(protocol, size) || flagged;
    let severity = if is_anomaly {
        anomaly_severity(rng.next_f64())
    } else {
        Severity::Low
    };

    let source_ip = random_ipv4(rng);
    let destination_ip = random_ipv4(rng);
    let port = rng.range(1, 65536) as u16;

    let timestamp = clock.now();
    Packet {
        id: random_id(rng, "pkt", timestamp),
        timestamp,
        source_ip,
        destination_ip,
        protocol,
        size,
        port,
        is_anomaly,
        severity,
    }
}
