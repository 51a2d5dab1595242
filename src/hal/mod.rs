//! Hardware seam.
//!
//! The beacon reaches hardware only through `embedded-hal` traits
//! (`digital::v2::OutputPin`, `blocking::delay::DelayMs`, `serial::Read`/
//! `serial::Write`) plus the [`AnalogSource`] trait below. Board crates
//! supply the real implementations; [`host`] supplies recording/scripted
//! doubles for host-side tests.

pub mod host;

/// A read-only analog input.
///
/// Returns an implementation-defined magnitude; zero means "no signal".
/// A disconnected sensor that floats at zero simply never triggers the
/// rate path, which is the intended failure mode.
pub trait AnalogSource {
    fn read(&mut self) -> u16;
}

/// Fixed pin assignment for one board.
#[derive(Clone, Copy, Debug)]
pub struct PinAssignment {
    /// Digital output pin driven by the transmitter.
    pub tx_pin: i32,
    /// Analog input pin sampled by the monitor.
    pub sense_pin: i32,
}

impl Default for PinAssignment {
    fn default() -> Self {
        Self {
            tx_pin: 13,
            sense_pin: 0,
        }
    }
}
