//! Host-side hardware doubles.
//!
//! Fixed-buffer, no_std implementations of the hardware traits so the whole
//! beacon can run on the host: pins record every level they are driven to,
//! sensors and serial ports replay scripts, delays count instead of sleeping.

use core::convert::Infallible;

use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::digital::v2::OutputPin;
use embedded_hal::serial::{Read, Write};

use super::AnalogSource;

/// Capacity of the recording buffers.
pub const RECORD_CAP: usize = 1024;

/// Output pin that records every level transition it is driven to.
///
/// `true` = HIGH, `false` = LOW. Recording saturates at [`RECORD_CAP`].
pub struct RecordingPin {
    levels: [bool; RECORD_CAP],
    len: usize,
}

impl RecordingPin {
    pub const fn new() -> Self {
        Self {
            levels: [false; RECORD_CAP],
            len: 0,
        }
    }

    /// Every level driven onto the pin, in order.
    pub fn levels(&self) -> &[bool] {
        &self.levels[..self.len]
    }

    /// The most recent level, if any write happened.
    pub fn last(&self) -> Option<bool> {
        self.len.checked_sub(1).map(|i| self.levels[i])
    }

    fn record(&mut self, level: bool) {
        if self.len < RECORD_CAP {
            self.levels[self.len] = level;
            self.len += 1;
        }
    }
}

impl Default for RecordingPin {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputPin for RecordingPin {
    type Error = Infallible;

    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.record(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.record(true);
        Ok(())
    }
}

/// Analog source replaying a scripted sequence of readings.
///
/// Reads past the end of the script return zero (sensor gone quiet).
pub struct ScriptedAnalog<'a> {
    samples: &'a [u16],
    idx: usize,
}

impl<'a> ScriptedAnalog<'a> {
    pub const fn new(samples: &'a [u16]) -> Self {
        Self { samples, idx: 0 }
    }

    /// Number of readings consumed so far.
    pub fn reads(&self) -> usize {
        self.idx
    }
}

impl AnalogSource for ScriptedAnalog<'_> {
    fn read(&mut self) -> u16 {
        let sample = self.samples.get(self.idx).copied().unwrap_or(0);
        self.idx += 1;
        sample
    }
}

/// Serial input replaying a scripted byte sequence.
///
/// Returns `nb::Error::WouldBlock` once the script is exhausted.
pub struct ScriptedSerial<'a> {
    bytes: &'a [u8],
    idx: usize,
}

impl<'a> ScriptedSerial<'a> {
    pub const fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, idx: 0 }
    }
}

impl Read<u8> for ScriptedSerial<'_> {
    type Error = Infallible;

    fn read(&mut self) -> nb::Result<u8, Self::Error> {
        match self.bytes.get(self.idx) {
            Some(&byte) => {
                self.idx += 1;
                Ok(byte)
            }
            None => Err(nb::Error::WouldBlock),
        }
    }
}

/// Delay provider that records every requested wait instead of sleeping.
pub struct CountingDelay {
    calls: [u16; RECORD_CAP],
    len: usize,
    total_ms: u32,
}

impl CountingDelay {
    pub const fn new() -> Self {
        Self {
            calls: [0; RECORD_CAP],
            len: 0,
            total_ms: 0,
        }
    }

    /// Every requested delay, in call order.
    pub fn delays(&self) -> &[u16] {
        &self.calls[..self.len]
    }

    /// Sum of all requested delays.
    pub fn total_ms(&self) -> u32 {
        self.total_ms
    }
}

impl Default for CountingDelay {
    fn default() -> Self {
        Self::new()
    }
}

impl DelayMs<u16> for CountingDelay {
    fn delay_ms(&mut self, ms: u16) {
        if self.len < RECORD_CAP {
            self.calls[self.len] = ms;
            self.len += 1;
        }
        self.total_ms = self.total_ms.wrapping_add(ms as u32);
    }
}

/// Serial output capturing everything written to it.
pub struct CaptureSerial {
    buf: [u8; 2048],
    len: usize,
}

impl CaptureSerial {
    pub const fn new() -> Self {
        Self {
            buf: [0; 2048],
            len: 0,
        }
    }

    /// Captured bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// Captured bytes as text.
    pub fn as_str(&self) -> &str {
        core::str::from_utf8(self.bytes()).unwrap_or("")
    }
}

impl Default for CaptureSerial {
    fn default() -> Self {
        Self::new()
    }
}

impl Write<u8> for CaptureSerial {
    type Error = Infallible;

    fn write(&mut self, word: u8) -> nb::Result<(), Self::Error> {
        if self.len < self.buf.len() {
            self.buf[self.len] = word;
            self.len += 1;
        }
        Ok(())
    }

    fn flush(&mut self) -> nb::Result<(), Self::Error> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_pin_orders_levels() {
        let mut pin = RecordingPin::new();
        pin.set_high().unwrap();
        pin.set_low().unwrap();
        pin.set_low().unwrap();

        assert_eq!(pin.levels(), &[true, false, false]);
        assert_eq!(pin.last(), Some(false));
    }

    #[test]
    fn test_scripted_analog_returns_zero_after_script() {
        let mut adc = ScriptedAnalog::new(&[7, 0]);
        assert_eq!(adc.read(), 7);
        assert_eq!(adc.read(), 0);
        assert_eq!(adc.read(), 0);
        assert_eq!(adc.reads(), 3);
    }

    #[test]
    fn test_scripted_serial_blocks_when_empty() {
        let mut serial = ScriptedSerial::new(b"X");
        assert_eq!(serial.read(), Ok(b'X'));
        assert_eq!(serial.read(), Err(nb::Error::WouldBlock));
    }

    #[test]
    fn test_counting_delay_accumulates() {
        let mut delay = CountingDelay::new();
        delay.delay_ms(100u16);
        delay.delay_ms(200u16);
        assert_eq!(delay.delays(), &[100, 200]);
        assert_eq!(delay.total_ms(), 300);
    }
}
