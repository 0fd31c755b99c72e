//! Randomized delays used to spread traffic across accounts and time.

use std::time::Duration;

use gf_config::DelayConfig;
use rand::Rng;

/// Uniform wait in `[min_delay, max_delay]`, drawn after every iteration.
pub fn pacing_delay(delays: &DelayConfig, rng: &mut impl Rng) -> Duration {
    Duration::from_millis(rng.gen_range(delays.min_delay_ms..=delays.max_delay_ms))
}

/// Uniform startup jitter in `[0, initial_delay_max]`, drawn once per
/// account before its worker starts.
pub fn startup_jitter(delays: &DelayConfig, rng: &mut impl Rng) -> Duration {
    Duration::from_millis(rng.gen_range(0..=delays.initial_delay_max_ms))
}
