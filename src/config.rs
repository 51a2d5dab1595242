//! Beacon configuration.
//!
//! One immutable struct constructed at startup and passed by reference into
//! the monitor and transmitter. There is no global mutable state; every
//! fixed constant of the system lives here.

use crate::frame::{SYNC_END, SYNC_START};

/// Fixed configuration for one beacon instance.
///
/// All timing values are in milliseconds and match the receiver's tuning;
/// changing `dwell_ms` breaks bit-timing compatibility with any receiver
/// calibrated to the original symbol time.
#[derive(Clone, Copy, Debug)]
pub struct BeaconConfig {
    /// The secret transmitted in every frame.
    ///
    /// Held in plain form for the process lifetime and never cleared.
    /// This is a known property of the system, kept as-is: the beacon is a
    /// demonstration artifact and deliberately does not obscure its payload.
    pub secret: &'static str,

    /// Per-bit hold time on the output pin.
    pub dwell_ms: u16,

    /// Interval between analog polls inside the observation window.
    pub poll_interval_ms: u16,

    /// Total observation window for one rate sample.
    pub window_ms: u32,

    /// Multiplier applied to the active-poll count to derive the rate.
    pub rate_scale: u32,

    /// Rate must be strictly above this to trigger a transmission.
    pub rate_threshold: u32,

    /// Serial byte that forces a transmission regardless of sensed rate.
    pub command_trigger: u8,
}

impl Default for BeaconConfig {
    fn default() -> Self {
        Self {
            secret: "F",
            dwell_ms: 100,
            poll_interval_ms: 200,
            window_ms: 5000,
            rate_scale: 12,
            rate_threshold: 60,
            command_trigger: b'X',
        }
    }
}

impl BeaconConfig {
    /// Create a config with a different secret and default timing.
    pub fn with_secret(secret: &'static str) -> Self {
        Self {
            secret,
            ..Default::default()
        }
    }

    /// Number of analog polls in one observation window.
    #[inline]
    pub fn polls_per_window(&self) -> u32 {
        self.window_ms / self.poll_interval_ms as u32
    }

    /// Highest rate the monitor can report for one window.
    #[inline]
    pub fn max_rate(&self) -> u32 {
        self.polls_per_window() * self.rate_scale
    }

    /// Total number of bit characters in one frame of this config's secret.
    #[inline]
    pub fn frame_bits(&self) -> usize {
        SYNC_START.len() + self.secret.len() * 8 + SYNC_END.len()
    }

    /// Wall-clock duration of one complete frame transmission.
    #[inline]
    pub fn frame_duration_ms(&self) -> u32 {
        self.frame_bits() as u32 * self.dwell_ms as u32
    }
}
