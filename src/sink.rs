//! Process-wide fallback for request error and close callbacks.
//!
//! A Request built without an `on_error` callback borrows the default sink.
//! The sink is configured at most once, before requests are created; when
//! nothing was configured it writes to stderr.

use std::io::Write;
use std::sync::Arc;

use once_cell::sync::OnceCell;

pub type ErrorHandler = Arc<dyn Fn(&str) + Send + Sync>;
pub type CloseHandler = Arc<dyn Fn() + Send + Sync>;

#[derive(Clone)]
pub enum DefaultSink {
    Stderr,
    /// Routes messages to `log::error!`.
    Log,
    Custom(ErrorHandler),
    /// No fallback: requests must carry their own error handler.
    Disabled,
}

impl std::fmt::Debug for DefaultSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DefaultSink::Stderr => f.write_str("Stderr"),
            DefaultSink::Log => f.write_str("Log"),
            DefaultSink::Custom(_) => f.write_str("Custom"),
            DefaultSink::Disabled => f.write_str("Disabled"),
        }
    }
}

static DEFAULT_SINK: OnceCell<DefaultSink> = OnceCell::new();

/// Sets the process-wide sink. Returns `false` if one was already set.
pub fn configure(sink: DefaultSink) -> bool {
    DEFAULT_SINK.set(sink).is_ok()
}

pub fn configured() -> Option<&'static DefaultSink> {
    DEFAULT_SINK.get()
}

fn stderr_handler() -> ErrorHandler {
    Arc::new(|msg: &str| {
        let mut stderr = std::io::stderr().lock();
        let _ = stderr.write_all(msg.as_bytes());
        let _ = stderr.write_all(b"\n");
    })
}

fn log_handler() -> ErrorHandler {
    Arc::new(|msg: &str| {
        log::error!("{}", msg);
    })
}

pub(crate) fn resolve_error_handler(sink: Option<&DefaultSink>) -> Option<ErrorHandler> {
    match sink.unwrap_or(&DefaultSink::Stderr) {
        DefaultSink::Stderr => Some(stderr_handler()),
        DefaultSink::Log => Some(log_handler()),
        DefaultSink::Custom(f) => Some(f.clone()),
        DefaultSink::Disabled => None,
    }
}

/// The error handler a Request falls back to, `None` when the sink is disabled.
pub fn default_error_handler() -> Option<ErrorHandler> {
    resolve_error_handler(configured())
}

pub fn default_close_handler() -> CloseHandler {
    Arc::new(|| {})
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::{resolve_error_handler, DefaultSink};

    #[test]
    fn fallback_chain() {
        assert!(resolve_error_handler(None).is_some());
        assert!(resolve_error_handler(Some(&DefaultSink::Log)).is_some());
        assert!(resolve_error_handler(Some(&DefaultSink::Disabled)).is_none());

        let seen = Arc::new(Mutex::new(vec![]));
        let s = seen.clone();
        let sink = DefaultSink::Custom(Arc::new(move |msg: &str| s.lock().unwrap().push(msg.to_string())));
        let handler = resolve_error_handler(Some(&sink)).unwrap();
        handler("boom");
        assert_eq!(*seen.lock().unwrap(), vec!["boom".to_string()]);
    }
}
