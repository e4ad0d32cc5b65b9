use std::time::Duration;

use crate::constants::{CLOCK_SPEED, TIMER_FREQUENCY};

/// Behaviours that differ between CHIP-8 interpreters and that some programs depend on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Quirks {
    /// `Cxkk` loads `rand & kk` instead of an unmasked random byte
    pub mask_random: bool,
}

/// # Config
/// Tunables for a `Machine`.
///
/// - `cycle_interval` pause between instruction cycles
/// - `timer_interval` pause between delay/sound timer decrements
/// - `quirks` interpreter behaviour switches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub cycle_interval: Duration,
    pub timer_interval: Duration,
    pub quirks: Quirks,
}

impl Config {
    /// Timer interval for a countdown running at `hz` ticks per second
    pub fn timer_interval_for(hz: u32) -> Duration {
        Duration::from_nanos(1_000_000_000 / u64::from(hz.max(1)))
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            cycle_interval: CLOCK_SPEED,
            timer_interval: Config::timer_interval_for(TIMER_FREQUENCY),
            quirks: Quirks::default(),
        }
    }
}
