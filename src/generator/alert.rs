use crate::generator::clock::Clock;
use crate::generator::source::RandomSource;
use crate::generator::{random_id, random_ipv4};
use crate::models::alert::{Alert, AlertType};
use crate::models::packet::Severity;

/// Probability that a generated alert carries a source address
pub const SOURCE_IP_RATE: f64 = 0.7;

/// Generate one unresolved alert.
///
/// Draw order: type, severity, message, source address presence, the
/// address octets when present, id suffix.
pub fn generate_alert<S: RandomSource>(rng: &mut S, clock: &dyn Clock) -> Alert {
    let alert_type = *rng.pick(&AlertType::ALL);
    let severity = *rng.pick(&Severity::ALL);
    let message = rng.pick(alert_type.messages()).to_string();
    let source_ip = if rng.chance(SOURCE_IP_RATE) {
        Some(random_ipv4(rng))
    } else {
        None
    };

    let timestamp = clock.now();
    Alert {
        id: random_id(rng, "alert", timestamp),
        alert_type,
        severity,
        message,
        timestamp,
        source_ip,
        resolved: false,
    }
}
