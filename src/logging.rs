//! `tracing` output routed to the browser console.
//!
//! Each event is formatted by `tracing-subscriber`'s `fmt` layer into a
//! [`ConsoleWriter`], which hands the finished line to the console method
//! matching the event level when it is dropped.

use std::io::{self, Write};
use std::str::FromStr;

use tracing::{Level, Metadata};
use tracing_subscriber::fmt::MakeWriter;

/// Buffers one formatted event and flushes it to the console on drop.
pub struct ConsoleWriter {
    level: Level,
    buf: Vec<u8>,
}

impl ConsoleWriter {
    fn new(level: Level) -> Self {
        Self {
            level,
            buf: Vec::new(),
        }
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

impl Write for ConsoleWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
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
fn emit(level: Level, line: &str) {
    let value = wasm_bindgen::JsValue::from_str(line);
    match level {
        Level::ERROR => web_sys::console::error_1(&value),
        Level::WARN => web_sys::console::warn_1(&value),
        Level::INFO => web_sys::console::log_1(&value),
        _ => web_sys::console::debug_1(&value),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn emit(_level: Level, line: &str) {
    eprintln!("{}", line);
}

/// `MakeWriter` that picks the console method from the event's level.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeConsoleWriter;

impl<'a> MakeWriter<'a> for MakeConsoleWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter::new(Level::INFO)
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleWriter::new(*meta.level())
    }
}

/// Parse a level name, defaulting to INFO for anything unrecognized.
pub fn parse_level(name: &str) -> Level {
    Level::from_str(name.trim()).unwrap_or(Level::INFO)
}

/// Install the console subscriber. Calling this more than once is harmless.
pub fn init(level: &str) {
    let _ = tracing_subscriber::fmt()
        .with_writer(MakeConsoleWriter)
        .with_max_level(parse_level(level))
        .with_ansi(false)
        .without_time()
        .with_target(false)
        .try_init();
}
