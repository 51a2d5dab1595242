//! Lock-free diagnostic stream.
//!
//! Observational output only: the derived rate and the individual bit
//! characters are reported here as human-readable text. Removing every
//! diag call must not change what is driven onto the pin.
//!
//! Push never blocks and never allocates; entries are dropped (and counted)
//! when the ring is full. Draining happens outside the timing-critical
//! path, see [`crate::serial_log`].

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicU32, Ordering};

/// Maximum message length in bytes.
pub const MAX_MSG_LEN: usize = 80;

/// Default ring size (number of entries). Must be a power of 2.
pub const DIAG_BUFFER_SIZE: usize = 128;

/// Diagnostic severity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum DiagLevel {
    Error = 0,
    Warn = 1,
    Info = 2,
    Debug = 3,
    Trace = 4,
}

impl DiagLevel {
    /// Convert to string for output.
    pub fn as_str(self) -> &'static str {
        match self {
            DiagLevel::Error => "ERROR",
            DiagLevel::Warn => "WARN",
            DiagLevel::Info => "INFO",
            DiagLevel::Debug => "DEBUG",
            DiagLevel::Trace => "TRACE",
        }
    }
}

/// A single diagnostic entry.
#[derive(Clone, Copy)]
pub struct DiagEntry {
    /// Milliseconds of accumulated wait time when the entry was pushed.
    pub at_ms: u32,
    /// Severity.
    pub level: DiagLevel,
    /// Message length.
    pub len: u8,
    /// Message bytes (not null-terminated).
    pub msg: [u8; MAX_MSG_LEN],
}

const EMPTY_ENTRY: DiagEntry = DiagEntry {
    at_ms: 0,
    level: DiagLevel::Info,
    len: 0,
    msg: [0; MAX_MSG_LEN],
};

/// Lock-free diagnostic ring.
///
/// Multiple producers coordinate through an atomic `fetch_add` on the write
/// index; a single drain consumer advances the read index. Push is O(1) and
/// drop-on-full.
pub struct DiagStream<const N: usize = DIAG_BUFFER_SIZE> {
    entries: UnsafeCell<[DiagEntry; N]>,
    write_idx: AtomicU32,
    read_idx: AtomicU32,
    dropped: AtomicU32,
}

// SAFETY: Producers are coordinated via atomic fetch_add (each gets a unique
// slot), the single consumer only reads slots behind the write index.
unsafe impl<const N: usize> Sync for DiagStream<N> {}
unsafe impl<const N: usize> Send for DiagStream<N> {}

impl<const N: usize> DiagStream<N> {
    const MASK: usize = N - 1;

    /// Create a new empty stream.
    pub const fn new() -> Self {
        assert!(N.is_power_of_two(), "diag ring size must be power of 2");

        Self {
            entries: UnsafeCell::new([EMPTY_ENTRY; N]),
            write_idx: AtomicU32::new(0),
            read_idx: AtomicU32::new(0),
            dropped: AtomicU32::new(0),
        }
    }

    /// Push an entry. Never blocks.
    ///
    /// Returns `true` if queued, `false` if dropped because the ring is full.
    #[inline]
    pub fn push(&self, at_ms: u32, level: DiagLevel, msg: &[u8]) -> bool {
        // Claim a slot index with CAS so a dropped message does not burn
        // an index the consumer would then treat as written.
        let write = loop {
            let write = self.write_idx.load(Ordering::Relaxed);
            let read = self.read_idx.load(Ordering::Acquire);

            if write.wrapping_sub(read) >= N as u32 {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                return false;
            }

            match self.write_idx.compare_exchange_weak(
                write,
                write.wrapping_add(1),
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => break write,
                Err(_) => continue,
            }
        };

        let idx = (write as usize) & Self::MASK;

        // SAFETY: the CAS hands each producer a unique slot index.
        unsafe {
            let entry = &mut (*self.entries.get())[idx];
            entry.at_ms = at_ms;
            entry.level = level;
            entry.len = msg.len().min(MAX_MSG_LEN) as u8;
            entry.msg[..entry.len as usize].copy_from_slice(&msg[..entry.len as usize]);
        }

        true
    }

    /// Drain the next entry, if any.
    #[inline]
    pub fn drain(&self) -> Option<DiagEntry> {
        let read = self.read_idx.load(Ordering::Relaxed);
        let write = self.write_idx.load(Ordering::Acquire);

        if read == write {
            return None;
        }

        let idx = (read as usize) & Self::MASK;

        // SAFETY: single consumer, slot is behind the write index.
        let entry = unsafe { (*self.entries.get())[idx] };

        self.read_idx.store(read.wrapping_add(1), Ordering::Release);
        Some(entry)
    }

    /// Count of entries dropped because the ring was full.
    #[inline]
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Reset the dropped counter (after reporting).
    #[inline]
    pub fn reset_dropped(&self) {
        self.dropped.store(0, Ordering::Relaxed);
    }

    /// True if there are entries waiting to be drained.
    #[inline]
    pub fn has_entries(&self) -> bool {
        self.pending() != 0
    }

    /// Number of entries waiting to be drained.
    #[inline]
    pub fn pending(&self) -> u32 {
        let read = self.read_idx.load(Ordering::Relaxed);
        let write = self.write_idx.load(Ordering::Acquire);
        write.wrapping_sub(read)
    }
}

impl<const N: usize> Default for DiagStream<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Format a message into a buffer, truncating on overflow.
///
/// Returns the number of bytes written.
#[inline]
pub fn format_to_buffer(buf: &mut [u8], args: core::fmt::Arguments<'_>) -> usize {
    use core::fmt::Write;

    struct BufWriter<'a> {
        buf: &'a mut [u8],
        pos: usize,
    }

    impl<'a> Write for BufWriter<'a> {
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
    let _ = core::fmt::write(&mut writer, args);
    writer.pos
}

/// Push a formatted diagnostic entry.
#[macro_export]
macro_rules! diag_log {
    ($level:expr, $stream:expr, $at_ms:expr, $($arg:tt)*) => {{
        let mut buf = [0u8; $crate::diag::MAX_MSG_LEN];
        let len = $crate::diag::format_to_buffer(&mut buf, format_args!($($arg)*));
        $stream.push($at_ms, $level, &buf[..len]);
    }};
}

/// Push an error-level diagnostic.
#[macro_export]
macro_rules! diag_error {
    ($stream:expr, $at_ms:expr, $($arg:tt)*) => {
        $crate::diag_log!($crate::diag::DiagLevel::Error, $stream, $at_ms, $($arg)*)
    };
}

/// Push a warn-level diagnostic.
#[macro_export]
macro_rules! diag_warn {
    ($stream:expr, $at_ms:expr, $($arg:tt)*) => {
        $crate::diag_log!($crate::diag::DiagLevel::Warn, $stream, $at_ms, $($arg)*)
    };
}

/// Push an info-level diagnostic.
#[macro_export]
macro_rules! diag_info {
    ($stream:expr, $at_ms:expr, $($arg:tt)*) => {
        $crate::diag_log!($crate::diag::DiagLevel::Info, $stream, $at_ms, $($arg)*)
    };
}

/// Push a debug-level diagnostic.
#[macro_export]
macro_rules! diag_debug {
    ($stream:expr, $at_ms:expr, $($arg:tt)*) => {
        $crate::diag_log!($crate::diag::DiagLevel::Debug, $stream, $at_ms, $($arg)*)
    };
}

/// Push a trace-level diagnostic (per-bit verbosity).
#[macro_export]
macro_rules! diag_trace {
    ($stream:expr, $at_ms:expr, $($arg:tt)*) => {
        $crate::diag_log!($crate::diag::DiagLevel::Trace, $stream, $at_ms, $($arg)*)
    };
}
