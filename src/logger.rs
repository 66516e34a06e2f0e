//! Terminal logger for the `log` facade.
//!
//! Messages go to stderr so that stdout stays clean for the JSON the driver
//! consumes. Levels are tagged with a coloured prefix.

use console::style;
use log::{Level, LevelFilter, Log, Metadata, Record};

struct ConsoleLogger {
    level: LevelFilter,
}

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let prefix = match record.level() {
            Level::Error => style("error").red().bold(),
            Level::Warn => style("warning").yellow().bold(),
            Level::Info => style("info").green(),
            Level::Debug => style("debug").cyan(),
            Level::Trace => style("trace").dim(),
        };
        eprintln!("{prefix}: {}", record.args());
    }

    fn flush(&self) {}
}

/// Install the logger. `verbose` enables debug output.
pub fn init(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    // a logger may already be installed when running under a test harness
    if log::set_boxed_logger(Box::new(ConsoleLogger { level })).is_ok() {
        log::set_max_level(level);
    }
}
