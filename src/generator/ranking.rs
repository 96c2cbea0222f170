use crate::generator::random_ipv4;
use crate::generator::source::RandomSource;
use crate::models::stats::{ProtocolStat, TopIpRecord};

/// Number of records in a top-talkers snapshot
pub const TOP_IP_COUNT: usize = 10;

pub const COUNTRIES: [&str; 8] = [
    "USA",
    "Canada",
    "UK",
    "Germany",
    "France",
    "Japan",
    "Australia",
    "Brazil",
];

/// Protocol name, packet range `[low, high)` and chart color
const PROTOCOL_PROFILES: [(&str, u64, u64, &str); 5] = [
    ("HTTP", 2000, 5000, "#3b82f6"),
    ("HTTPS", 1500, 3500, "#10b981"),
    ("TCP", 1000, 3000, "#f59e0b"),
    ("UDP", 500, 2000, "#ef4444"),
    ("ICMP", 100, 600, "#8b5cf6"),
];

/// Generate the top source addresses, busiest first
pub fn generate_top_ips<S: RandomSource>(rng: &mut S) -> Vec<TopIpRecord> {
    let mut records: Vec<TopIpRecord> = (0..TOP_IP_COUNT)
        .map(|_| TopIpRecord {
            ip: random_ipv4(rng),
            packets: rng.range(100, 10_100),
            bytes: rng.range(50_000, 1_050_000),
            country: rng.pick(&COUNTRIES).to_string(),
        })
        .collect();

    records.sort_by(|a, b| b.packets.cmp(&a.packets));
    records
}

/// Generate per-protocol packet counts with percentages of the actual total
pub fn generate_protocol_stats<S: RandomSource>(rng: &mut S) -> Vec<ProtocolStat> {
    let counts: Vec<u64> = PROTOCOL_PROFILES
        .iter()
        .map(|&(_, low, high, _)| rng.range(low, high))
        .collect();
    let total: u64 = counts.iter().sum();

    PROTOCOL_PROFILES
        .iter()
        .zip(counts)
        .map(|(&(protocol, _, _, color), packets)| ProtocolStat {
            protocol: protocol.to_string(),
            packets,
            percentage: percentage_of(packets, total),
            color: color.to_string(),
        })
        .collect()
}

/// `round(part / total * 100)`, zero when `total` is zero
pub fn percentage_of(part: u64, total: u64) -> u8 {
    if total == 0 {
        return 0;
    }
    (part as f64 / total as f64 * 100.0).round() as u8
}
