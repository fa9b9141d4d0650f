//! A small `log` backend writing one rendered line per record to stderr.

mod color;
mod item;
mod renderer;

use std::io::Write;

pub use color::{Color, ColorScheme, LevelColors};
pub use item::Item;
pub use renderer::{ColorfulLineRenderer, Renderer};

pub struct ConsoleLogger {
    level: log::LevelFilter,
    renderer: Box<dyn Renderer>,
}

impl ConsoleLogger {
    pub fn new(level: log::LevelFilter, renderer: Box<dyn Renderer>) -> Self {
        Self { level, renderer }
    }
}

impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let mut buf = Vec::with_capacity(128);
        self.renderer.render(&Item::from(record), &mut buf);
        _ = std::io::stderr().lock().write_all(&buf);
    }

    fn flush(&self) {
        _ = std::io::stderr().flush();
    }
}

/// Installs a colorful console logger as the `log` backend.
pub fn init(level: log::LevelFilter) -> Result<(), log::SetLoggerError> {
    let logger = ConsoleLogger::new(level, Box::new(ColorfulLineRenderer::default()));
    log::set_boxed_logger(Box::new(logger))?;
    log::set_max_level(level);
    Ok(())
}

fn panic_line(payload: &(dyn std::any::Any + Send), location: Option<&std::panic::Location<'_>>) -> String {
    let msg = crate::error::panic_message(payload);
    match location {
        Some(loc) => format!("panicked at {}:{}: {}", loc.file(), loc.line(), msg),
        None => format!("panicked: {}", msg),
    }
}

/// Sends panic reports through `log` instead of stderr. Handler panics reach
/// the request's error callback as well, so they are logged at debug level.
pub fn route_panics() {
    std::panic::set_hook(Box::new(|info| {
        log::debug!(target: "httpipe::panic", "{}", panic_line(info.payload(), info.location()));
    }));
}
