//! Debug-gated diagnostic output.
//!
//! The sink is chosen once, right after resolution: with `--debug` it writes
//! to the error stream, otherwise every write is dropped. Callers never
//! check the flag themselves; they write through a [`Logger`] or emit
//! `tracing` events inside [`scope`], and the sink decides.
//!
//! Lines are written verbatim: no timestamp, no level, no target.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::MakeWriter;

type SharedWriter = Arc<Mutex<Box<dyn Write + Send>>>;

/// Cloneable handle to the diagnostic sink.
#[derive(Clone, Default)]
pub struct Logger {
    inner: Option<SharedWriter>,
}

impl Logger {
    /// Active sink writing to `writer`.
    pub fn to_writer(writer: impl Write + Send + 'static) -> Self {
        Self {
            inner: Some(Arc::new(Mutex::new(Box::new(writer)))),
        }
    }

    /// Sink that discards everything.
    pub fn discard() -> Self {
        Self { inner: None }
    }

    /// `writer` when `debug` is set, a discarding sink otherwise.
    pub fn select(debug: bool, writer: impl Write + Send + 'static) -> Self {
        if debug {
            Self::to_writer(writer)
        } else {
            Self::discard()
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.is_some()
    }

    /// Write one line. I/O errors are ignored.
    pub fn line(&self, args: std::fmt::Arguments<'_>) {
        let mut handle = self.clone();
        let _ = handle.write_all(format!("{}\n", args).as_bytes());
        let _ = handle.flush();
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

impl Write for Logger {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &self.inner {
            Some(writer) => writer
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .write(buf),
            None => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &self.inner {
            Some(writer) => writer
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .flush(),
            None => Ok(()),
        }
    }
}

impl<'a> MakeWriter<'a> for Logger {
    type Writer = Logger;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Build the `tracing` subscriber that formats events into `logger`.
pub fn subscriber(logger: &Logger) -> impl tracing::Subscriber + Send + Sync + use<> {
    let level = if logger.is_enabled() {
        LevelFilter::DEBUG
    } else {
        LevelFilter::OFF
    };
    tracing_subscriber::fmt()
        .with_writer(logger.clone())
        .with_max_level(level)
        .without_time()
        .with_level(false)
        .with_target(false)
        .with_ansi(false)
        .finish()
}

/// Run `f` with `tracing` events routed to `logger`.
pub fn scope<T>(logger: &Logger, f: impl FnOnce() -> T) -> T {
    tracing::subscriber::with_default(subscriber(logger), f)
}
