//! Logging initialization: logs go only to file (or are dropped), never to the console.
//!
//! Reads `RUST_LOG` (level) and `LOG_FILE` (path) from env (e.g. via .env). When
//! `LOG_FILE` is set, logs are appended to that file; otherwise they are dropped so stdout
//! carries only the plan.

use std::io::Write;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

use crate::log_format::RunTaggedFormat;

const DEFAULT_FILTER: &str = "info,hyper_util=off,reqwest=warn";

/// Installs the global subscriber.
///
/// - **RUST_LOG**: filter, e.g. `info`, `wayfarer=debug`. Default: `info`.
/// - **LOG_FILE**: append plain-text logs (no ANSI) to this file.
///
/// The returned guard flushes the background writer on drop; hold it until exit.
pub fn init() -> Result<Option<WorkerGuard>, Box<dyn std::error::Error>> {
    let filter = config::tracing_init::env_filter(DEFAULT_FILTER);

    if let Some(path) = config::tracing_init::log_file_path() {
        let (writer, guard) = config::tracing_init::file_writer(&path)?;
        let writer = std::sync::Mutex::new(StripAnsiWriter::new(writer));
        let file_layer = tracing_subscriber::fmt::layer()
            .event_format(RunTaggedFormat::new())
            .with_writer(writer)
            .with_ansi(false)
            .with_filter(filter);
        tracing_subscriber::registry().with(file_layer).try_init()?;
        tracing::info!(path = %path.display(), "wayfarer logging to file");
        Ok(Some(guard))
    } else {
        let sink_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::sink)
            .with_filter(filter);
        tracing_subscriber::registry().with(sink_layer).try_init()?;
        Ok(None)
    }
}

/// Strips ANSI escape sequences so file logs are plain text.
struct StripAnsiWriter<W> {
    inner: W,
    state: Vec<u8>,
}

impl<W: Write> StripAnsiWriter<W> {
    fn new(inner: W) -> Self {
        Self {
            inner,
            state: Vec::with_capacity(16),
        }
    }
}

impl<W: Write> Write for StripAnsiWriter<W> {
    fn write(&mut self, mut buf: &[u8]) -> std::io::Result<usize> {
        let len = buf.len();
        while let Some((&b, rest)) = buf.split_first() {
            match self.state.len() {
                0 => match buf.iter().position(|&c| c == 0x1b) {
                    Some(i) => {
                        self.inner.write_all(&buf[..i])?;
                        self.state.push(0x1b);
                        buf = &buf[i + 1..];
                    }
                    None => {
                        self.inner.write_all(buf)?;
                        break;
                    }
                },
                1 => {
                    buf = rest;
                    self.state.push(b);
                    if b != b'[' {
                        self.inner.write_all(&self.state)?;
                        self.state.clear();
                    }
                }
                _ => {
                    buf = rest;
                    let is_final = (0x40..=0x7e).contains(&b);
                    let is_param = b.is_ascii_digit() || matches!(b, b'[' | b'?' | b';' | b':');
                    if is_final {
                        self.state.clear();
                    } else if is_param {
                        self.state.push(b);
                        if self.state.len() > 64 {
                            self.inner.write_all(&self.state)?;
                            self.state.clear();
                        }
                    } else {
                        self.inner.write_all(&self.state)?;
                        self.state.clear();
                        self.inner.write_all(&[b])?;
                    }
                }
            }
        }
        Ok(len)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        if !self.state.is_empty() {
            self.inner.write_all(&self.state)?;
            self.state.clear();
        }
        self.inner.flush()
    }
}
