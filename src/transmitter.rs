//! Frame transmitter: the timing-critical bit-banger.
//!
//! Inverted on-off keying: a `'0'` character drives the pin HIGH (channel
//! blocked/unreadable), anything else drives it LOW (channel idle/readable).
//! Each level is held for exactly one dwell time. After every frame the pin
//! is forced LOW regardless of the final bit.

use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::digital::v2::OutputPin;

use crate::config::BeaconConfig;
use crate::diag::DiagStream;
use crate::frame::BitFrame;

/// Drives one digital output pin in lock-step with the fixed time base.
pub struct FrameTransmitter<P, D> {
    pin: P,
    delay: D,
    elapsed_ms: u32,
}

impl<P, D> FrameTransmitter<P, D>
where
    P: OutputPin,
    D: DelayMs<u16>,
{
    pub fn new(pin: P, delay: D) -> Self {
        Self {
            pin,
            delay,
            elapsed_ms: 0,
        }
    }

    /// Milliseconds this transmitter has spent holding bit levels.
    #[inline]
    pub fn elapsed_ms(&self) -> u32 {
        self.elapsed_ms
    }

    /// The output pin (for inspection in host tests).
    pub fn pin(&self) -> &P {
        &self.pin
    }

    /// Drive one sequence of ASCII bit characters onto the pin.
    ///
    /// The single timing-critical primitive. Each character sets the level
    /// (`'0'` = HIGH, otherwise LOW) and holds it for `dwell_ms` before the
    /// next character. The unit of atomicity is the single bit.
    pub fn send_bits(
        &mut self,
        cfg: &BeaconConfig,
        bits: &[u8],
        diag: &DiagStream,
    ) -> Result<(), P::Error> {
        for &bit in bits {
            if bit == b'0' {
                self.pin.set_high()?;
            } else {
                self.pin.set_low()?;
            }
            self.delay.delay_ms(cfg.dwell_ms);
            self.elapsed_ms = self.elapsed_ms.wrapping_add(cfg.dwell_ms as u32);
            crate::diag_trace!(diag, self.elapsed_ms, "bit {}", bit as char);
        }
        Ok(())
    }

    /// Transmit one complete frame, then return the pin to idle.
    ///
    /// Open-loop broadcast: no retries, no acknowledgement, no handshake.
    /// The terminal LOW is unconditional; the line always ends readable.
    pub fn transmit(
        &mut self,
        cfg: &BeaconConfig,
        frame: &BitFrame,
        diag: &DiagStream,
    ) -> Result<(), P::Error> {
        self.send_bits(cfg, frame.bits(), diag)?;
        self.pin.set_low()
    }

    /// Tear down into the owned hardware pieces.
    pub fn release(self) -> (P, D) {
        (self.pin, self.delay)
    }
}
