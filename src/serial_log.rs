//! Serial drain for the diagnostic stream.
//!
//! Formats entries as `[{at_ms}] LEVEL: message` lines and writes them
//! through any `embedded-hal` serial writer. Runs outside the timing
//! critical path; write errors are swallowed (diagnostics are best-effort
//! by contract).

use embedded_hal::serial::Write;

use crate::diag::{DiagEntry, DiagStream};

/// Formatted line buffer size: message plus prefix.
const LINE_BUF_LEN: usize = 128;

/// Format one entry into `buf`.
///
/// Format: `[{at_ms:8}] LEVEL: message\n`. Returns the bytes written.
pub fn format_entry(entry: &DiagEntry, buf: &mut [u8]) -> usize {
    use core::fmt::Write as FmtWrite;

    struct BufWriter<'a> {
        buf: &'a mut [u8],
        pos: usize,
    }

    impl<'a> FmtWrite for BufWriter<'a> {
        fn write_str(&mut self, s: &str) -> core::fmt::Result {
            let bytes = s.as_bytes();
            let remaining = self.buf.len() - self.pos;
            let to_write = bytes.len().min(remaining);
            self.buf[self.pos..self.pos + to_write].copy_from_slice(&bytes[..to_write]);
            self.pos += to_write;
            Ok(())
        }
    }

    let mut writer = BufWriter { buf, pos: 0 };
    let _ = write!(
        writer,
        "[{:8}] {}: {}\n",
        entry.at_ms,
        entry.level.as_str(),
        core::str::from_utf8(&entry.msg[..entry.len as usize]).unwrap_or("<invalid utf8>")
    );
    writer.pos
}

/// Drain all pending entries to a serial writer.
///
/// Returns the number of entries written. Call repeatedly from the idle
/// part of the host loop.
pub fn drain_to_serial<W: Write<u8>>(stream: &DiagStream, serial: &mut W) -> usize {
    let mut line = [0u8; LINE_BUF_LEN];
    let mut written = 0;

    while let Some(entry) = stream.drain() {
        let len = format_entry(&entry, &mut line);
        for &byte in &line[..len] {
            let _ = nb::block!(serial.write(byte));
        }
        written += 1;
    }

    written
}

/// Report and reset the dropped-entry counter, if nonzero.
pub fn report_dropped<W: Write<u8>>(stream: &DiagStream, serial: &mut W) {
    let dropped = stream.dropped();
    if dropped == 0 {
        return;
    }

    use core::fmt::Write as FmtWrite;
    let mut line = [0u8; 48];
    let len = {
        struct BufWriter<'a> {
            buf: &'a mut [u8],
            pos: usize,
        }
        impl<'a> FmtWrite for BufWriter<'a> {
            fn write_str(&mut self, s: &str) -> core::fmt::Result {
                let bytes = s.as_bytes();
                let to_write = bytes.len().min(self.buf.len() - self.pos);
                self.buf[self.pos..self.pos + to_write].copy_from_slice(&bytes[..to_write]);
                self.pos += to_write;
                Ok(())
            }
        }
        let mut writer = BufWriter {
            buf: &mut line,
            pos: 0,
        };
        let _ = write!(writer, "[WARN] diag dropped: {}\n", dropped);
        writer.pos
    };

    for &byte in &line[..len] {
        let _ = nb::block!(serial.write(byte));
    }
    stream.reset_dropped();
}
