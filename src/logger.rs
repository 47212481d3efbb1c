//! Terminal logger used by the command line tools

use colored::{ColoredString, Colorize};
use log::{Level, LevelFilter, Metadata, Record, SetLoggerError};

/// Writes log records to stderr with a coloured level label
pub struct Logger;

static LOGGER: Logger = Logger;

/// Install [`Logger`] as the global logger with the given maximum level
pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
    log::set_logger(&LOGGER)?;
    log::set_max_level(level);
    Ok(())
}

impl log::Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        match log::max_level() {
            LevelFilter::Debug | LevelFilter::Trace => {
                eprintln!(
                    "{} {} {}",
                    label(record.level()),
                    record.target().dimmed(),
                    record.args()
                );
            }
            _ => match record.level() {
                Level::Info => eprintln!("{}", record.args()),
                level => eprintln!("{} {}", label(level), record.args()),
            },
        }
    }

    fn flush(&self) {}
}

fn label(level: Level) -> ColoredString {
    match level {
        Level::Debug => "[DEBUG]".bold().blue(),
        Level::Error => "[ERROR]".bold().red(),
        Level::Info => "[INFO]".bold().green(),
        Level::Trace => "[TRACE]".bold().purple(),
        Level::Warn => "[WARN]".bold().yellow(),
    }
}

/// Map `-v`/`-q` counts onto a level, starting from `Info`
pub fn level_from_flags(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Error;
    }
    match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}
