//! Diagnostic logging on the debug channel.
//!
//! # Architecture
//!
//! ```text
//! Console                DebugLog              LineIo
//! ───────                ────────              ──────
//!
//! diag_warn!() ───────▶ level filter ───────▶ debug_write("[WARN] ...\n")
//!                        stack buffer
//!                        no heap
//! ```
//!
//! # Rules
//!
//! - Diagnostics never reach the wire channel
//! - Messages longer than [`MAX_MSG_LEN`] are truncated on a UTF-8 boundary
//! - Formatting never allocates

use core::fmt;

use crate::io::LineIo;

/// Maximum message length.
pub const MAX_MSG_LEN: usize = 120;

/// Room for `[LEVEL] ` and the trailing newline.
const LINE_OVERHEAD: usize = 16;

/// Log level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum LogLevel {
    Error = 0,
    Warn = 1,
    Info = 2,
    Debug = 3,
    Trace = 4,
}

impl LogLevel {
    /// Convert to string for output.
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warn => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
            LogLevel::Trace => "TRACE",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Level-filtered writer for the debug channel.
#[derive(Clone, Copy, Debug)]
pub struct DebugLog {
    threshold: LogLevel,
}

impl DebugLog {
    /// Create a log that passes `threshold` and everything more severe.
    pub const fn new(threshold: LogLevel) -> Self {
        Self { threshold }
    }

    /// Most verbose level that is written.
    pub fn threshold(&self) -> LogLevel {
        self.threshold
    }

    /// Check whether `level` passes the filter.
    #[inline]
    pub fn enabled(&self, level: LogLevel) -> bool {
        level <= self.threshold
    }

    /// Write one formatted entry: `[LEVEL] message\n`.
    pub fn write<I: LineIo + ?Sized>(&self, io: &mut I, level: LogLevel, msg: &[u8]) {
        let mut line = [0u8; MAX_MSG_LEN + LINE_OVERHEAD];
        let len = format_to_buffer(
            &mut line,
            format_args!("[{}] {}\n", level.as_str(), utf8_prefix(msg)),
        );
        io.debug_write(utf8_prefix(&line[..len]));
    }
}

impl Default for DebugLog {
    fn default() -> Self {
        Self::new(LogLevel::Info)
    }
}

/// Longest valid UTF-8 prefix of `bytes`.
///
/// Truncation in [`format_to_buffer`] may cut a multi-byte character.
pub fn utf8_prefix(bytes: &[u8]) -> &str {
    match core::str::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => core::str::from_utf8(&bytes[..e.valid_up_to()]).unwrap_or(""),
    }
}

/// Format a message into a buffer.
///
/// Returns the number of bytes written.
#[inline]
pub fn format_to_buffer(buf: &mut [u8], args: fmt::Arguments<'_>) -> usize {
    use core::fmt::Write;

    struct BufWriter<'a> {
        buf: &'a mut [u8],
        pos: usize,
    }

    impl<'a> Write for BufWriter<'a> {
        fn write_str(&mut self, s: &str) -> fmt::Result {
            let bytes = s.as_bytes();
            let remaining = self.buf.len() - self.pos;
            let to_write = bytes.len().min(remaining);
            self.buf[self.pos..self.pos + to_write].copy_from_slice(&bytes[..to_write]);
            self.pos += to_write;
            Ok(())
        }
    }

    let mut writer = BufWriter { buf, pos: 0 };
    let _ = fmt::write(&mut writer, args);
    writer.pos
}

/// Diagnostic log macro.
///
/// # Example
///
/// ```ignore
/// diag_log!(LogLevel::Info, self.log, &mut self.io, "Command {} registered", name);
/// ```
#[macro_export]
macro_rules! diag_log {
    ($level:expr, $log:expr, $io:expr, $($arg:tt)*) => {{
        let level = $level;
        if $log.enabled(level) {
            let mut buf = [0u8; $crate::logging::MAX_MSG_LEN];
            let len = $crate::logging::format_to_buffer(&mut buf, format_args!($($arg)*));
            $log.write($io, level, &buf[..len]);
        }
    }};
}

/// Error diagnostic.
#[macro_export]
macro_rules! diag_error {
    ($log:expr, $io:expr, $($arg:tt)*) => {
        $crate::diag_log!($crate::logging::LogLevel::Error, $log, $io, $($arg)*)
    };
}

/// Warning diagnostic.
#[macro_export]
macro_rules! diag_warn {
    ($log:expr, $io:expr, $($arg:tt)*) => {
        $crate::diag_log!($crate::logging::LogLevel::Warn, $log, $io, $($arg)*)
    };
}

/// Info diagnostic.
#[macro_export]
macro_rules! diag_info {
    ($log:expr, $io:expr, $($arg:tt)*) => {
        $crate::diag_log!($crate::logging::LogLevel::Info, $log, $io, $($arg)*)
    };
}

/// Debug diagnostic.
#[macro_export]
macro_rules! diag_debug {
    ($log:expr, $io:expr, $($arg:tt)*) => {
        $crate::diag_log!($crate::logging::LogLevel::Debug, $log, $io, $($arg)*)
    };
}

/// Trace diagnostic (maximum verbosity).
#[macro_export]
macro_rules! diag_trace {
    ($log:expr, $io:expr, $($arg:tt)*) => {
        $crate::diag_log!($crate::logging::LogLevel::Trace, $log, $io, $($arg)*)
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::line_buffer::LineBuffer;

    struct DebugCapture {
        text: std::string::String,
    }

    impl LineIo for DebugCapture {
        fn poll_line(&mut self, _terminator: u8, _line: &mut LineBuffer) -> bool {
            false
        }

        fn write_line(&mut self, _payload: &[u8], _terminator: &[u8]) {}

        fn debug_write(&mut self, text: &str) {
            self.text.push_str(text);
        }
    }

    #[test]
    fn test_format_to_buffer() {
        let mut buf = [0u8; 32];
        let len = format_to_buffer(&mut buf, format_args!("Hello {}", 42));
        assert_eq!(&buf[..len], b"Hello 42");
    }

    #[test]
    fn test_format_to_buffer_truncates() {
        let mut buf = [0u8; 4];
        let len = format_to_buffer(&mut buf, format_args!("{}", "truncated"));
        assert_eq!(&buf[..len], b"trun");
    }

    #[test]
    fn test_utf8_prefix_drops_split_character() {
        // "é" is two bytes; keep only the first one
        let bytes = "aé".as_bytes();
        assert_eq!(utf8_prefix(&bytes[..2]), "a");
    }

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Error < LogLevel::Warn);
        assert!(LogLevel::Warn < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Debug);
        assert!(LogLevel::Debug < LogLevel::Trace);
    }

    #[test]
    fn test_macro_writes_tagged_line() {
        let log = DebugLog::new(LogLevel::Info);
        let mut io = DebugCapture { text: std::string::String::new() };

        crate::diag_warn!(log, &mut io, "Command {} has no callback", "SENSORS");

        assert_eq!(io.text, "[WARN] Command SENSORS has no callback\n");
    }

    #[test]
    fn test_threshold_filters_verbose_levels() {
        let log = DebugLog::new(LogLevel::Warn);
        let mut io = DebugCapture { text: std::string::String::new() };

        crate::diag_info!(log, &mut io, "dropped");
        crate::diag_error!(log, &mut io, "kept");

        assert_eq!(log.threshold(), LogLevel::Warn);
        assert_eq!(io.text, "[ERROR] kept\n");
    }

    #[test]
    fn test_trace_needs_trace_threshold() {
        let mut io = DebugCapture { text: std::string::String::new() };

        crate::diag_trace!(DebugLog::default(), &mut io, "<< {}", "AT+INFO?");
        assert!(io.text.is_empty());

        crate::diag_trace!(DebugLog::new(LogLevel::Trace), &mut io, "<< {}", "AT+INFO?");
        assert_eq!(io.text, "[TRACE] << AT+INFO?\n");
    }
}
