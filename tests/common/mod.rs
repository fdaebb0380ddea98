#![allow(dead_code)]

use std::{
    io,
    sync::{Arc, Mutex},
};

use tracing::subscriber::DefaultGuard;
use tracing_subscriber::fmt::MakeWriter;

/// In-memory sink for formatted log output.
#[derive(Clone, Default)]
pub struct LogCapture {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    /// Installs a thread-local subscriber writing into a fresh capture.
    ///
    /// Tests must run on a current-thread runtime so every event lands here.
    pub fn install() -> (Self, DefaultGuard) {
        let capture = Self::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(capture.clone())
            .with_max_level(tracing::Level::INFO)
            .with_ansi(false)
            .with_target(false)
            .without_time()
            .finish();
        let guard = tracing::subscriber::set_default(subscriber);
        (capture, guard)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock().unwrap()).into_owned()
    }

    /// Only the interceptor's start and end lines, level prefix stripped.
    pub fn request_lines(&self) -> Vec<String> {
        self.contents()
            .lines()
            .filter_map(|line| {
                line.find("request start, ")
                    .or_else(|| line.find("request end, "))
                    .map(|at| line[at..].to_string())
            })
            .collect()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = LogCapture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Extracts the request id from a start or end line.
pub fn request_id(line: &str) -> &str {
    let rest = &line[line.find("id: ").expect("line has an id") + 4..];
    rest.split(',').next().unwrap().trim()
}

/// Extracts the `cost` value in milliseconds from an end line.
pub fn cost_ms(line: &str) -> u128 {
    let rest = &line[line.find("cost: ").expect("line has a cost") + 6..];
    rest.trim_end_matches("ms").trim().parse().unwrap()
}
