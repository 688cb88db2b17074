//! Timestamped diagnostic lines for networked sessions.
//!
//! Lines are written in the `info string ...` form the command loop also
//! uses. Detail lines go out only when debug output is switched on.

use std::io::{self, Write};
use std::sync::Mutex;

use chrono::Local;

pub struct SessionLog {
    sink: Mutex<Box<dyn Write + Send>>,
    debug: bool,
}

impl SessionLog {
    pub fn new(sink: Box<dyn Write + Send>, debug: bool) -> Self {
        Self {
            sink: Mutex::new(sink),
            debug,
        }
    }

    pub fn stderr(debug: bool) -> Self {
        Self::new(Box::new(io::stderr()), debug)
    }

    /// Discards everything.
    pub fn silent() -> Self {
        Self::new(Box::new(io::sink()), false)
    }

    #[inline]
    pub fn debug_enabled(&self) -> bool {
        self.debug
    }

    pub fn info(&self, message: &str) {
        self.write_line(message);
    }

    pub fn debug(&self, message: &str) {
        if self.debug {
            self.write_line(message);
        }
    }

    fn write_line(&self, message: &str) {
        let stamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        if let Ok(mut sink) = self.sink.lock() {
            // Logging never interrupts play.
            let _ = writeln!(sink, "info string [{stamp}] {message}");
            let _ = sink.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().expect("buffer lock").extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuffer {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().expect("buffer lock").clone()).expect("utf8 log")
        }
    }

    #[test]
    fn debug_lines_are_gated() {
        let buffer = SharedBuffer::default();
        let log = SessionLog::new(Box::new(buffer.clone()), false);
        log.info("session started");
        log.debug("heartbeat sent");
        let text = buffer.text();
        assert!(text.starts_with("info string ["));
        assert!(text.contains("session started"));
        assert!(!text.contains("heartbeat"));
    }

    #[test]
    fn debug_lines_appear_when_enabled() {
        let buffer = SharedBuffer::default();
        let log = SessionLog::new(Box::new(buffer.clone()), true);
        log.debug("heartbeat sent");
        assert_eq!(buffer.text().lines().count(), 1);
    }
}
