//! Synthetic telemetry generators.
//!
//! Each generator is a plain function over a [`RandomSource`] (and a
//! [`Clock`] where it stamps times). None of them keep state between calls.

pub mod alert;
pub mod clock;
pub mod packet;
pub mod ranking;
pub mod session;
pub mod source;
pub mod traffic;

use chrono::{DateTime, Utc};
use std::net::Ipv4Addr;

pub use alert::generate_alert;
pub use clock::{Clock, FixedClock, SystemClock};
pub use packet::generate_packet;
pub use ranking::{generate_protocol_stats, generate_top_ips};
pub use session::generate_session_stats;
pub use source::{RandomSource, RngSource, ScriptedSource};
pub use traffic::generate_traffic_data;

const ID_SUFFIX_LEN: usize = 9;
const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Random IPv4 address, each octet drawn independently from 0 to 255
pub fn random_ipv4<S: RandomSource>(rng: &mut S) -> Ipv4Addr {
    let mut octets = [0u8; 4];
    for octet in octets.iter_mut() {
        *octet = rng.below(256) as u8;
    }
    Ipv4Addr::from(octets)
}

/// Identifier of the form `<prefix>_<unix millis>_<9 base36 chars>`
pub fn random_id<S: RandomSource>(rng: &mut S, prefix: &str, now: DateTime<Utc>) -> String {
    let suffix: String = (0..ID_SUFFIX_LEN)
        .map(|_| BASE36[rng.below(36) as usize] as char)
        .collect();
    format!("{}_{}_{}", prefix, now.timestamp_millis(), suffix)
}
