//! # PulseBeacon
//!
//! Heartbeat-triggered covert channel beacon.
//!
//! A biometric-like analog signal is sampled over a fixed window; when the
//! derived pulse rate crosses a threshold (or a serial override byte arrives)
//! a fixed secret is bit-banged onto a single output pin as an on-off keyed
//! frame with fixed start/end sync patterns.
//!
//! ## Architecture
//!
//! - Protocol and trigger logic are pure and hardware-free, fully testable
//!   on the host
//! - Hardware is reached only through `embedded-hal` traits plus the small
//!   [`hal`] seam
//! - Strict sequencing: the monitor always completes before the transmitter
//!   starts, an in-progress frame is never interrupted
//! - Diagnostics flow through a lock-free ring and never touch the protocol

#![cfg_attr(not(test), no_std)]

pub mod beacon;
pub mod config;
pub mod diag;
pub mod frame;
pub mod hal;
pub mod monitor;
pub mod serial_log;
pub mod transmitter;

pub use beacon::{Beacon, BeaconError};
pub use config::BeaconConfig;
pub use diag::{DiagLevel, DiagStream};
pub use frame::{build_frame, encode_byte, BitFrame, FrameError, SYNC_END, SYNC_START};
pub use monitor::{HeartbeatMonitor, Trigger};
pub use transmitter::FrameTransmitter;
