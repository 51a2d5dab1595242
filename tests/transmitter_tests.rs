//! Frame transmitter tests: on-off keying, dwell timing, terminal idle.

use rust_pulse_beacon::diag::DiagStream;
use rust_pulse_beacon::frame::build_frame;
use rust_pulse_beacon::hal::host::{CountingDelay, RecordingPin};
use rust_pulse_beacon::{BeaconConfig, FrameTransmitter};

fn expected_levels(bits: &str) -> Vec<bool> {
    // Inverted keying: '0' drives HIGH, '1' drives LOW
    bits.bytes().map(|b| b == b'0').collect()
}

#[test]
fn test_wire_levels_for_original_secret() {
    let cfg = BeaconConfig::default();
    let diag = DiagStream::new();
    let frame = build_frame("F").unwrap();
    let mut tx = FrameTransmitter::new(RecordingPin::new(), CountingDelay::new());

    tx.transmit(&cfg, &frame, &diag).unwrap();

    let mut expected = expected_levels(frame.as_str());
    expected.push(false); // terminal idle
    let (pin, _) = tx.release();
    assert_eq!(pin.levels(), expected.as_slice());
}

#[test]
fn test_every_bit_held_one_dwell() {
    let cfg = BeaconConfig::default();
    let diag = DiagStream::new();
    let frame = build_frame("AB").unwrap();
    let mut tx = FrameTransmitter::new(RecordingPin::new(), CountingDelay::new());

    tx.transmit(&cfg, &frame, &diag).unwrap();

    let (_, delay) = tx.release();
    assert_eq!(delay.delays().len(), frame.len());
    assert!(delay.delays().iter().all(|&ms| ms == cfg.dwell_ms));
}

#[test]
fn test_pin_idles_low_after_every_frame() {
    let cfg = BeaconConfig::default();
    let diag = DiagStream::new();

    for secret in ["", "F", "\0"] {
        let frame = build_frame(secret).unwrap();
        let mut tx = FrameTransmitter::new(RecordingPin::new(), CountingDelay::new());
        tx.transmit(&cfg, &frame, &diag).unwrap();

        let (pin, _) = tx.release();
        assert_eq!(pin.last(), Some(false), "secret {:?}", secret);
    }
}

#[test]
fn test_bit_trace_is_observational() {
    let cfg = BeaconConfig::default();
    let frame = build_frame("F").unwrap();

    // Same frame with a diag ring too small to hold the trace: the wire
    // output must be identical.
    let traced = DiagStream::new();
    let mut tx_a = FrameTransmitter::new(RecordingPin::new(), CountingDelay::new());
    tx_a.transmit(&cfg, &frame, &traced).unwrap();

    let starved: DiagStream = DiagStream::new();
    while starved.push(0, rust_pulse_beacon::DiagLevel::Trace, b"fill") {}
    let mut tx_b = FrameTransmitter::new(RecordingPin::new(), CountingDelay::new());
    tx_b.transmit(&cfg, &frame, &starved).unwrap();

    let (pin_a, _) = tx_a.release();
    let (pin_b, _) = tx_b.release();
    assert_eq!(pin_a.levels(), pin_b.levels());
}

#[test]
fn test_send_bits_sequence_by_sequence_matches_whole_frame() {
    // Framing by three send_bits calls in fixed order is protocol-equivalent
    // to one call on the concatenation.
    use rust_pulse_beacon::frame::{SYNC_END, SYNC_START};

    let cfg = BeaconConfig::with_secret("A");
    let diag = DiagStream::new();
    let frame = build_frame(cfg.secret).unwrap();

    let mut whole = FrameTransmitter::new(RecordingPin::new(), CountingDelay::new());
    whole.transmit(&cfg, &frame, &diag).unwrap();

    let mut piecewise = FrameTransmitter::new(RecordingPin::new(), CountingDelay::new());
    piecewise.send_bits(&cfg, SYNC_START.as_bytes(), &diag).unwrap();
    piecewise.send_bits(&cfg, b"01000001", &diag).unwrap();
    piecewise.send_bits(&cfg, SYNC_END.as_bytes(), &diag).unwrap();
    let (mut pin, delay) = piecewise.release();
    use embedded_hal::digital::v2::OutputPin;
    pin.set_low().unwrap();

    let (whole_pin, whole_delay) = whole.release();
    assert_eq!(whole_pin.levels(), pin.levels());
    assert_eq!(whole_delay.delays(), delay.delays());
}
