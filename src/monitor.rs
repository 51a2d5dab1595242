//! Heartbeat monitor: decides whether a transmission should begin.
//!
//! The monitor owns the analog sensor, the serial command input and its
//! delay provider. Both operations block by design; a trigger can never
//! be observed while a window is being sampled.

use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::serial::Read;

use crate::config::BeaconConfig;
use crate::diag::DiagStream;
use crate::hal::AnalogSource;

/// Why a transmission was triggered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Trigger {
    /// Derived pulse rate exceeded the threshold.
    Rate(u32),
    /// The serial override byte was received.
    Command(u8),
}

/// Polls an analog pulse source and a serial command stream.
pub struct HeartbeatMonitor<A, R, D> {
    sensor: A,
    serial: R,
    delay: D,
    elapsed_ms: u32,
}

impl<A, R, D> HeartbeatMonitor<A, R, D>
where
    A: AnalogSource,
    R: Read<u8>,
    D: DelayMs<u16>,
{
    pub fn new(sensor: A, serial: R, delay: D) -> Self {
        Self {
            sensor,
            serial,
            delay,
            elapsed_ms: 0,
        }
    }

    /// Milliseconds this monitor has spent in timed waits.
    #[inline]
    pub fn elapsed_ms(&self) -> u32 {
        self.elapsed_ms
    }

    /// Sample the pulse rate over one full observation window.
    ///
    /// Blocking: polls the sensor every `poll_interval_ms` for `window_ms`
    /// total, counts readings above zero, and returns the count scaled by
    /// `rate_scale`. Occupies the whole window before returning; no other
    /// trigger detection happens meanwhile.
    pub fn sample_rate(&mut self, cfg: &BeaconConfig) -> u32 {
        let mut active = 0u32;

        for _ in 0..cfg.polls_per_window() {
            if self.sensor.read() > 0 {
                active += 1;
            }
            self.delay.delay_ms(cfg.poll_interval_ms);
            self.elapsed_ms = self.elapsed_ms.wrapping_add(cfg.poll_interval_ms as u32);
        }

        active * cfg.rate_scale
    }

    /// Check for a trigger condition.
    ///
    /// Reads the raw analog input and consumes one serial byte if available
    /// (whether or not it is the override byte). If neither shows activity
    /// this returns immediately without sampling. Otherwise a full rate
    /// window is sampled; the trigger fires when the derived rate is
    /// strictly above `rate_threshold`, or the consumed byte equals
    /// `command_trigger`.
    ///
    /// There are no error conditions: a dead sensor reads zero and never
    /// rate-triggers, and serial errors count as "no byte". The command
    /// path remains available as an override either way.
    pub fn poll_trigger(&mut self, cfg: &BeaconConfig, diag: &DiagStream) -> Option<Trigger> {
        let raw = self.sensor.read();
        let command = match self.serial.read() {
            Ok(byte) => Some(byte),
            Err(_) => None,
        };

        if raw == 0 && command.is_none() {
            return None;
        }

        let rate = self.sample_rate(cfg);
        crate::diag_info!(diag, self.elapsed_ms, "rate {}", rate);

        if rate > cfg.rate_threshold {
            return Some(Trigger::Rate(rate));
        }

        match command {
            Some(byte) if byte == cfg.command_trigger => Some(Trigger::Command(byte)),
            _ => None,
        }
    }

    /// Tear down into the owned hardware pieces.
    pub fn release(self) -> (A, R, D) {
        (self.sensor, self.serial, self.delay)
    }
}
