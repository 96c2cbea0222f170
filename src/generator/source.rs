//! Random source abstraction for the telemetry generators.
//!
//! Generators draw only through [`RandomSource`]. [`RngSource`] forwards to
//! `rand`'s range and bernoulli sampling; [`ScriptedSource`] derives every
//! helper from a unit float so a test can force any branch (the 5% anomaly
//! flag, a size on the anomaly boundary, a particular severity).

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

/// Source of uniform draws in `[0, 1)`.
pub trait RandomSource {
    /// Next uniform draw in `[0, 1)`.
    fn next_f64(&mut self) -> f64;

    /// Uniform integer in `[0, n)`. `n` must be non-zero.
    fn below(&mut self, n: u64) -> u64 {
        let value = (self.next_f64() * n as f64).floor() as u64;
        value.min(n.saturating_sub(1))
    }

    /// Uniform integer in `[low, high)`.
    fn range(&mut self, low: u64, high: u64) -> u64 {
        low + self.below(high - low)
    }

    /// Uniform real in `[low, high)`.
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        low + self.next_f64() * (high - low)
    }

    /// True with probability `p`.
    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Uniformly chosen element of a non-empty slice.
    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T
    where
        Self: Sized,
    {
        &items[self.below(items.len() as u64) as usize]
    }
}

/// Production source backed by a `rand` generator.
#[derive(Debug, Clone)]
pub struct RngSource<R> {
    rng: R,
}

impl<R: Rng> RngSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngSource<StdRng> {
    /// Source seeded from operating system entropy.
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    /// Deterministic source; the same seed replays the same session.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn next_f64(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    fn below(&mut self, n: u64) -> u64 {
        if n == 0 {
            return 0;
        }
        self.rng.gen_range(0..n)
    }

    fn range(&mut self, low: u64, high: u64) -> u64 {
        if high <= low {
            return low;
        }
        self.rng.gen_range(low..high)
    }

    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        if high <= low {
            return low;
        }
        self.rng.gen_range(low..high)
    }

    fn chance(&mut self, p: f64) -> bool {
        self.rng.gen_bool(p.clamp(0.0, 1.0))
    }
}

/// Replays a fixed list of draws, then repeats a fallback value forever.
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    draws: VecDeque<f64>,
    fallback: f64,
}

impl ScriptedSource {
    /// `draws` are returned in order; afterwards every draw is `fallback`.
    ///
    /// Values are clamped into `[0, 1)`.
    pub fn new(draws: impl IntoIterator<Item = f64>, fallback: f64) -> Self {
        Self {
            draws: draws.into_iter().map(clamp_unit).collect(),
            fallback: clamp_unit(fallback),
        }
    }

    /// Source that always returns `value`.
    pub fn constant(value: f64) -> Self {
        Self::new(Vec::new(), value)
    }

    /// Queue more draws behind the ones not yet consumed.
    pub fn push(&mut self, draws: impl IntoIterator<Item = f64>) {
        self.draws.extend(draws.into_iter().map(clamp_unit));
    }
}

impl RandomSource for ScriptedSource {
    fn next_f64(&mut self) -> f64 {
        self.draws.pop_front().unwrap_or(self.fallback)
    }
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() || value < 0.0 {
        0.0
    } else if value >= 1.0 {
        1.0 - f64::EPSILON
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_source_replays_then_falls_back() {
        let mut source = ScriptedSource::new([0.1, 0.2], 0.9);
        assert_eq!(source.next_f64(), 0.1);
        assert_eq!(source.next_f64(), 0.2);
        assert_eq!(source.next_f64(), 0.9);
        assert_eq!(source.next_f64(), 0.9);
    }

    #[test]
    fn test_scripted_source_clamps() {
        let mut source = ScriptedSource::new([-1.0, 1.0, f64::NAN], 0.0);
        assert_eq!(source.next_f64(), 0.0);
        assert!(source.next_f64() < 1.0);
        assert_eq!(source.next_f64(), 0.0);
    }

    #[test]
    fn test_below_stays_in_range_at_the_top() {
        let mut source = ScriptedSource::constant(1.0);
        assert_eq!(source.below(10), 9);
        assert_eq!(source.range(50, 250), 249);
    }

    #[test]
    fn test_range_and_pick() {
        let mut source = ScriptedSource::new([0.0, 0.5, 0.0, 0.99], 0.0);
        assert_eq!(source.range(100, 200), 100);
        assert_eq!(source.range(100, 200), 150);
        let items = ["a", "b", "c"];
        assert_eq!(*source.pick(&items), "a");
        assert_eq!(*source.pick(&items), "c");
    }

    #[test]
    fn test_seeded_sources_agree() {
        let mut a = RngSource::seeded(42);
        let mut b = RngSource::seeded(42);
        for _ in 0..16 {
            let draw = a.next_f64();
            assert_eq!(draw, b.next_f64());
            assert!((0.0..1.0).contains(&draw));
        }
    }

    #[test]
    fn test_rng_source_forwards_to_rand() {
        let mut source = RngSource::seeded(7);
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(source.below(10), rng.gen_range(0..10));
        assert_eq!(source.range(50, 850), rng.gen_range(50..850));
        assert_eq!(source.uniform(-20.0, 20.0), rng.gen_range(-20.0..20.0));
        assert_eq!(source.chance(0.3), rng.gen_bool(0.3));
    }

    #[test]
    fn test_rng_source_degenerate_bounds() {
        let mut source = RngSource::seeded(3);
        assert_eq!(source.below(0), 0);
        assert_eq!(source.range(5, 5), 5);
        assert_eq!(source.uniform(2.5, 2.5), 2.5);
        assert!(!source.chance(0.0));
        assert!(source.chance(1.0));
        assert!(source.chance(1.5));
    }

    #[test]
    fn test_rng_source_helpers_stay_in_bounds() {
        let mut source = RngSource::seeded(11);
        for _ in 0..1000 {
            assert!(source.below(256) < 256);
            let port = source.range(1, 65536);
            assert!((1..65536).contains(&port));
            let uptime = source.uniform(99.2, 100.0);
            assert!((99.2..100.0).contains(&uptime));
        }
    }
}
