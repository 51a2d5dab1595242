//! Diagnostic stream and serial drain tests.

use rust_pulse_beacon::diag::{DiagLevel, DiagStream};
use rust_pulse_beacon::hal::host::CaptureSerial;
use rust_pulse_beacon::serial_log::{drain_to_serial, report_dropped};
use rust_pulse_beacon::{diag_info, diag_trace};

#[test]
fn test_drain_to_serial_formats_lines() {
    let diag = DiagStream::new();
    diag_info!(diag, 5000, "rate {}", 72);
    diag_trace!(diag, 5100, "bit {}", '0');

    let mut serial = CaptureSerial::new();
    assert_eq!(drain_to_serial(&diag, &mut serial), 2);

    let text = serial.as_str();
    let mut lines = text.lines();
    let first = lines.next().unwrap();
    let second = lines.next().unwrap();
    assert!(first.contains("INFO") && first.contains("rate 72"));
    assert!(second.contains("TRACE") && second.contains("bit 0"));
}

#[test]
fn test_drain_empty_stream_writes_nothing() {
    let diag = DiagStream::new();
    let mut serial = CaptureSerial::new();

    assert_eq!(drain_to_serial(&diag, &mut serial), 0);
    assert!(serial.bytes().is_empty());
}

#[test]
fn test_report_dropped_once() {
    let diag: DiagStream = DiagStream::new();
    while diag.push(0, DiagLevel::Trace, b"fill") {}
    assert!(diag.dropped() > 0);

    let mut serial = CaptureSerial::new();
    report_dropped(&diag, &mut serial);
    assert!(serial.as_str().contains("diag dropped"));

    // Counter reset: a second report is silent
    let mut serial2 = CaptureSerial::new();
    report_dropped(&diag, &mut serial2);
    assert!(serial2.bytes().is_empty());
}
