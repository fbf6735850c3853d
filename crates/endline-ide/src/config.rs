//! Host-supplied settings and `tracing` setup.
//!
//! Nothing here reads files: hosts deserialize [`IdeConfig`] from wherever they keep their
//! settings and pass it in.

use std::collections::VecDeque;
use std::io::{self, Write};
use std::sync::{Arc, Once, OnceLock};

use endline_format::FormatConfig;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt, TestWriter};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, Layer};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdeConfig {
    /// Project-default options used when re-formatting a completed statement.
    #[serde(default)]
    pub format: FormatConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Either a plain level (`info`, `debug`, ...) or an `EnvFilter` directive string.
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,

    /// Emit logs in JSON format.
    #[serde(default)]
    pub json: bool,

    /// Mirror logs to stderr in addition to the in-memory buffer.
    #[serde(default = "LoggingConfig::default_stderr")]
    pub stderr: bool,

    /// Number of log lines kept in memory.
    #[serde(default = "LoggingConfig::default_buffer_lines")]
    pub buffer_lines: usize,
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_owned()
    }

    fn default_stderr() -> bool {
        true
    }

    fn default_buffer_lines() -> usize {
        1_000
    }

    /// `Warning` and ` DEBUG ` become `warn` and `debug`; anything that is not a bare level
    /// is passed through as a directive string.
    pub(crate) fn directives(&self) -> String {
        let level = self.level.trim();
        if level.is_empty() {
            return Self::default_level();
        }
        let lowered = level.to_ascii_lowercase();
        match lowered.as_str() {
            "warning" => "warn".to_owned(),
            "trace" | "debug" | "info" | "warn" | "error" | "off" => lowered,
            _ => level.to_owned(),
        }
    }

    fn configured_filter(&self) -> EnvFilter {
        EnvFilter::try_new(self.directives())
            .unwrap_or_else(|_| EnvFilter::default().add_directive(LevelFilter::INFO.into()))
    }

    /// The configured level, with `RUST_LOG` appended when it is set.
    pub fn env_filter(&self) -> EnvFilter {
        let Some(from_env) = std::env::var("RUST_LOG")
            .ok()
            .filter(|value| !value.trim().is_empty())
        else {
            return self.configured_filter();
        };
        let from_env = from_env.trim();

        EnvFilter::try_new(format!("{},{from_env}", self.directives()))
            .or_else(|_| EnvFilter::try_new(from_env))
            .unwrap_or_else(|_| self.configured_filter())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
            json: false,
            stderr: Self::default_stderr(),
            buffer_lines: Self::default_buffer_lines(),
        }
    }
}

/// Ring buffer of formatted log lines.
#[derive(Debug)]
pub struct LogBuffer {
    capacity: usize,
    lines: Mutex<VecDeque<String>>,
}

impl LogBuffer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            lines: Mutex::new(VecDeque::new()),
        }
    }

    pub fn push_line(&self, line: String) {
        let mut lines = self.lines.lock();
        while lines.len() >= self.capacity {
            lines.pop_front();
        }
        lines.push_back(line);
    }

    /// Up to `n` of the newest lines, oldest first.
    pub fn last_lines(&self, n: usize) -> Vec<String> {
        let lines = self.lines.lock();
        let skip = lines.len().saturating_sub(n);
        lines.iter().skip(skip).cloned().collect()
    }
}

/// Feeds formatted events into a shared [`LogBuffer`].
#[derive(Clone)]
pub(crate) struct BufferSink(pub(crate) Arc<LogBuffer>);

impl<'a> MakeWriter<'a> for BufferSink {
    type Writer = PendingLines;

    fn make_writer(&'a self) -> Self::Writer {
        PendingLines {
            buffer: Arc::clone(&self.0),
            pending: Vec::new(),
        }
    }
}

/// Collects one event's output and hands it to the buffer line by line when dropped.
pub(crate) struct PendingLines {
    buffer: Arc<LogBuffer>,
    pending: Vec<u8>,
}

impl Write for PendingLines {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for PendingLines {
    fn drop(&mut self) {
        let text = String::from_utf8_lossy(&self.pending);
        text.lines()
            .filter(|line| !line.is_empty())
            .for_each(|line| self.buffer.push_line(line.to_owned()));
    }
}

static TRACING_INIT: Once = Once::new();
static GLOBAL_LOG_BUFFER: OnceLock<Arc<LogBuffer>> = OnceLock::new();

pub fn global_log_buffer() -> Arc<LogBuffer> {
    GLOBAL_LOG_BUFFER
        .get_or_init(|| Arc::new(LogBuffer::new(LoggingConfig::default_buffer_lines())))
        .clone()
}

/// Installs the global `tracing` subscriber.
///
/// Safe to call more than once: only the first call installs a subscriber, later calls just
/// return the shared log buffer.
pub fn init_tracing(config: &LoggingConfig) -> Arc<LogBuffer> {
    let buffer = GLOBAL_LOG_BUFFER
        .get_or_init(|| Arc::new(LogBuffer::new(config.buffer_lines)))
        .clone();

    TRACING_INIT.call_once(|| {
        let filter = config.env_filter();
        let sink = BufferSink(Arc::clone(&buffer));
        let writer = match (config.stderr, cfg!(debug_assertions)) {
            (false, _) => BoxMakeWriter::new(sink),
            // Debug builds go through `TestWriter` so the test harness captures stderr.
            (true, true) => BoxMakeWriter::new(sink.and(TestWriter::with_stderr)),
            (true, false) => BoxMakeWriter::new(sink.and(io::stderr)),
        };

        let fmt = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(writer);
        let layer: Box<dyn Layer<_> + Send + Sync> = if config.json {
            fmt.json().boxed()
        } else {
            fmt.boxed()
        };

        let subscriber = tracing_subscriber::registry().with(filter).with(layer);
        if tracing::subscriber::set_global_default(subscriber).is_ok() {
            tracing::debug!(
                target = "endline.config",
                json = config.json,
                "tracing initialized"
            );
        }
    });

    buffer
}
