//! Display helpers for the dashboard's headline figures.

const BYTE_UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Hours in the 30-day month the uptime card reports against
const HOURS_PER_MONTH: f64 = 730.0;

/// Format a byte count with 1024-based units and at most one decimal.
///
/// A trailing `.0` is dropped, so `1024` renders as `1 KB` and `1536` as
/// `1.5 KB`.
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut unit = 0;
    let mut scale = 1u64;
    while unit < BYTE_UNITS.len() - 1 && bytes >= scale.saturating_mul(1024) {
        scale *= 1024;
        unit += 1;
    }

    let value = format!("{:.1}", bytes as f64 / scale as f64);
    let value = value.strip_suffix(".0").unwrap_or(&value);
    format!("{} {}", value, BYTE_UNITS[unit])
}

/// Format an integer with comma thousands separators
pub fn format_count(count: u64) -> String {
    let digits = count.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Qualitative rating shown under the latency card
pub fn latency_rating(avg_latency_ms: u32) -> &'static str {
    if avg_latency_ms < 50 {
        "Excellent"
    } else if avg_latency_ms < 100 {
        "Good"
    } else {
        "Poor"
    }
}

/// Hours of uptime over a month for the given uptime percentage, e.g. `729.4h`
pub fn uptime_hours(uptime_percentage: f64) -> String {
    let hours = HOURS_PER_MONTH - HOURS_PER_MONTH * (100.0 - uptime_percentage) / 100.0;
    format!("{:.1}h", hours)
}

/// Upper-case the first character of a display token
pub fn capitalize(token: &str) -> String {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
