//! `tracing` output routed to the browser console.
//!
//! The fmt layer formats each event into a buffer; the buffer is flushed to
//! `console.log`, `console.warn` or `console.error` depending on the event level.
//! Timestamps are disabled because `SystemTime` is unavailable on wasm32.

use std::io;

use tracing::{Level, Metadata};
use tracing_subscriber::fmt::MakeWriter;

/// Install the console subscriber. Safe to call more than once.
pub fn init(max_level: Level) {
    let installed = tracing_subscriber::fmt()
        .with_writer(ConsoleMakeWriter)
        .with_max_level(max_level)
        .with_ansi(false)
        .without_time()
        .with_target(false)
        .try_init()
        .is_ok();
    if installed {
        tracing::debug!("console logging ready");
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ConsoleLevel {
    Log,
    Warn,
    Error,
}

impl ConsoleLevel {
    fn for_level(level: &Level) -> Self {
        match *level {
            Level::ERROR => ConsoleLevel::Error,
            Level::WARN => ConsoleLevel::Warn,
            _ => ConsoleLevel::Log,
        }
    }
}

struct ConsoleMakeWriter;

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter::new(ConsoleLevel::Log)
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleWriter::new(ConsoleLevel::for_level(meta.level()))
    }
}

/// Buffers one formatted event; emitted on flush or drop.
struct ConsoleWriter {
    level: ConsoleLevel,
    buf: Vec<u8>,
}

impl ConsoleWriter {
    fn new(level: ConsoleLevel) -> Self {
        Self { level, buf: Vec::new() }
    }

    fn take_line(&mut self) -> Option<String> {
        if self.buf.is_empty() {
            return None;
        }
        let line = String::from_utf8_lossy(&self.buf).trim_end().to_string();
        self.buf.clear();
        Some(line)
    }
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if let Some(line) = self.take_line() {
            emit(self.level, &line);
        }
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        if let Some(line) = self.take_line() {
            emit(self.level, &line);
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn emit(level: ConsoleLevel, line: &str) {
    let msg = wasm_bindgen::JsValue::from_str(line);
    match level {
        ConsoleLevel::Log => web_sys::console::log_1(&msg),
        ConsoleLevel::Warn => web_sys::console::warn_1(&msg),
        ConsoleLevel::Error => web_sys::console::error_1(&msg),
    }
}

// Native builds (tests, tooling) have no console object.
#[cfg(not(target_arch = "wasm32"))]
fn emit(level: ConsoleLevel, line: &str) {
    match level {
        ConsoleLevel::Log => println!("{line}"),
        ConsoleLevel::Warn | ConsoleLevel::Error => eprintln!("{line}"),
    }
}
