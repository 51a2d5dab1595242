//! The beacon control loop.
//!
//! Single logical thread, fully cooperative: monitor completes before the
//! transmitter begins, a new trigger cannot interrupt an in-progress frame,
//! and there is no cancellation beyond the fixed durations.

use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::digital::v2::OutputPin;
use embedded_hal::serial::Read;

use crate::config::BeaconConfig;
use crate::diag::DiagStream;
use crate::frame::{self, FrameError};
use crate::hal::AnalogSource;
use crate::monitor::{HeartbeatMonitor, Trigger};
use crate::transmitter::FrameTransmitter;

/// Beacon failure.
///
/// Plumbing only: at the system level a failed transmission is
/// indistinguishable from a successful one, there is no feedback path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeaconError<E> {
    /// Frame construction failed (secret exceeds capacity).
    Frame(FrameError),
    /// The output pin reported an error.
    Pin(E),
}

impl<E> From<FrameError> for BeaconError<E> {
    fn from(err: FrameError) -> Self {
        BeaconError::Frame(err)
    }
}

/// Monitor and transmitter wired into one polling loop.
pub struct Beacon<A, R, P, DM, DT> {
    config: BeaconConfig,
    monitor: HeartbeatMonitor<A, R, DM>,
    transmitter: FrameTransmitter<P, DT>,
}

impl<A, R, P, DM, DT> Beacon<A, R, P, DM, DT>
where
    A: AnalogSource,
    R: Read<u8>,
    P: OutputPin,
    DM: DelayMs<u16>,
    DT: DelayMs<u16>,
{
    pub fn new(
        config: BeaconConfig,
        monitor: HeartbeatMonitor<A, R, DM>,
        transmitter: FrameTransmitter<P, DT>,
    ) -> Self {
        Self {
            config,
            monitor,
            transmitter,
        }
    }

    pub fn config(&self) -> &BeaconConfig {
        &self.config
    }

    /// Total milliseconds spent in timed waits across both components.
    pub fn uptime_ms(&self) -> u32 {
        self.monitor
            .elapsed_ms()
            .wrapping_add(self.transmitter.elapsed_ms())
    }

    /// One loop iteration: poll for a trigger, transmit one frame on fire.
    ///
    /// The frame is built fresh per trigger and discarded after the send.
    /// Returns the trigger that fired, or `None` for an idle iteration.
    pub fn run_once(
        &mut self,
        diag: &DiagStream,
    ) -> Result<Option<Trigger>, BeaconError<P::Error>> {
        let trigger = match self.monitor.poll_trigger(&self.config, diag) {
            Some(trigger) => trigger,
            None => return Ok(None),
        };

        let frame = frame::build_frame(self.config.secret)?;
        crate::diag_info!(
            diag,
            self.uptime_ms(),
            "trigger {:?}, sending {} bits",
            trigger,
            frame.len()
        );

        self.transmitter
            .transmit(&self.config, &frame, diag)
            .map_err(BeaconError::Pin)?;

        Ok(Some(trigger))
    }

    /// The bare polling loop.
    ///
    /// Failures are logged and the loop continues; a failed transmission
    /// looks identical to a successful one from the device's perspective.
    pub fn run_forever(&mut self, diag: &DiagStream) -> ! {
        loop {
            match self.run_once(diag) {
                Ok(_) => {}
                Err(BeaconError::Frame(err)) => {
                    crate::diag_error!(diag, self.uptime_ms(), "frame: {}", err);
                }
                Err(BeaconError::Pin(_)) => {
                    crate::diag_error!(diag, self.uptime_ms(), "output pin write failed");
                }
            }
        }
    }

    /// Tear down into the composed parts.
    pub fn release(self) -> (BeaconConfig, HeartbeatMonitor<A, R, DM>, FrameTransmitter<P, DT>) {
        (self.config, self.monitor, self.transmitter)
    }
}
