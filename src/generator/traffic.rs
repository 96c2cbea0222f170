use chrono::{DateTime, Duration, Local, Utc};

use crate::generator::source::RandomSource;
use crate::models::traffic::TrafficSample;
use crate::utils::error::{AppError, AppResult};

/// Longest lookback window the traffic chart supports: one day
pub const MAX_WINDOW_MINUTES: u32 = 24 * 60;

const BASE_PACKET_RATE: f64 = 50.0;
const RATE_AMPLITUDE: f64 = 20.0;
const RATE_FREQUENCY: f64 = 0.1;
const RATE_NOISE: f64 = 20.0;
const QUIET_MINUTE_RATE: f64 = 0.8;

/// Generate `window_minutes + 1` per-minute samples ending at `now`, oldest first.
///
/// Draw order per sample: rate noise, byte multiplier, quiet-minute check,
/// anomaly count (noisy minutes only).
pub fn generate_traffic_data<S: RandomSource>(
    rng: &mut S,
    now: DateTime<Utc>,
    window_minutes: u32,
) -> AppResult<Vec<TrafficSample>> {
    if window_minutes > MAX_WINDOW_MINUTES {
        return Err(AppError::InvalidWindow(window_minutes, MAX_WINDOW_MINUTES));
    }

    let samples = (0..=window_minutes)
        .rev()
        .map(|minutes_ago| {
            let at = now - Duration::minutes(i64::from(minutes_ago));
            sample_at(rng, at, minutes_ago)
        })
        .collect();

    Ok(samples)
}

fn sample_at<S: RandomSource>(rng: &mut S, at: DateTime<Utc>, minutes_ago: u32) -> TrafficSample {
    let base = BASE_PACKET_RATE + (f64::from(minutes_ago) * RATE_FREQUENCY).sin() * RATE_AMPLITUDE;
    let noise = rng.uniform(-RATE_NOISE, RATE_NOISE);
    let packets_per_second = (base + noise).floor().max(0.0) as u32;
    let bytes_per_second = f64::from(packets_per_second) * rng.uniform(500.0, 1500.0);
    let anomalies = if rng.chance(QUIET_MINUTE_RATE) {
        0
    } else {
        rng.below(5) as u32
    };

    TrafficSample {
        timestamp: minute_label(at),
        packets_per_second,
        bytes_per_second,
        anomalies,
    }
}

/// `HH:mm` in the local time zone
pub fn minute_label(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%H:%M").to_string()
}
