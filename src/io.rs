//! Serial I/O collaborator.
//!
//! The console never touches hardware directly. Platform code implements
//! [`LineIo`] (see `uart_io` on ESP-IDF targets), tests use an in-memory double.

use crate::command::line_buffer::LineBuffer;

/// Line-oriented byte stream with a separate diagnostic channel.
pub trait LineIo {
    /// Move available input bytes into `line` without blocking.
    ///
    /// Returns `true` once `terminator` has been received; the terminator is not
    /// stored. Returns `false` if no complete line is available yet, in which case
    /// bytes already collected stay in `line` for the next call.
    fn poll_line(&mut self, terminator: u8, line: &mut LineBuffer) -> bool;

    /// Write `payload` followed by `terminator` to the wire.
    fn write_line(&mut self, payload: &[u8], terminator: &[u8]);

    /// Write human-readable diagnostics. Never parsed by a peer.
    fn debug_write(&mut self, text: &str);
}

impl<T: LineIo + ?Sized> LineIo for &mut T {
    fn poll_line(&mut self, terminator: u8, line: &mut LineBuffer) -> bool {
        (**self).poll_line(terminator, line)
    }

    fn write_line(&mut self, payload: &[u8], terminator: &[u8]) {
        (**self).write_line(payload, terminator)
    }

    fn debug_write(&mut self, text: &str) {
        (**self).debug_write(text)
    }
}
