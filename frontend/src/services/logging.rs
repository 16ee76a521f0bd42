use log::{Level, LevelFilter, Log, Metadata, Record};

/// Browser console backend for the `log` facade.
///
/// Records from the `shared` crate and from the components end up in the
/// devtools console, prefixed with their level and target.
pub struct Logger;

static LOGGER: Logger = Logger;

impl Logger {
    /// Install the logger. Calling it again is harmless; the first
    /// installation wins.
    pub fn init(level: LevelFilter) {
        if log::set_logger(&LOGGER).is_ok() {
            log::set_max_level(level);
        }
    }

    pub fn debug_with_component(component: &str, message: &str) {
        log::debug!(target: component, "{}", message);
    }

    pub fn info_with_component(component: &str, message: &str) {
        log::info!(target: component, "{}", message);
    }

    pub fn warn_with_component(component: &str, message: &str) {
        log::warn!(target: component, "{}", message);
    }
}

fn format_record(level: Level, target: &str, message: &std::fmt::Arguments<'_>) -> String {
    format!("[{}] {}: {}", level, target, message)
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let line = format_record(record.level(), record.target(), record.args());
        match record.level() {
            Level::Error => gloo::console::error!(line),
            Level::Warn => gloo::console::warn!(line),
            Level::Info => gloo::console::info!(line),
            Level::Debug | Level::Trace => gloo::console::debug!(line),
        }
    }

    fn flush(&self) {}
}
