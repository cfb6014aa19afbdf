//! Minimal stderr sink for the `log` facade
//!
//! Lines are written as `hieromatch: <level>: <message>`. The level comes
//! from the command line, or from `HIEROMATCH_LOG` when set.

use log::{Level, LevelFilter, Log, Metadata, Record};
use std::io::Write;

/// Environment variable overriding the log level
pub const LOG_ENV: &str = "HIEROMATCH_LOG";

struct StderrLogger;

static LOGGER: StderrLogger = StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let mut stderr = std::io::stderr().lock();
        let _ = writeln!(stderr, "{}", format_record(record.level(), record.args()));
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn format_record(level: Level, args: &std::fmt::Arguments<'_>) -> String {
    format!("hieromatch: {}: {}", level.as_str().to_lowercase(), args)
}

/// Level for `-v` repeated `verbosity` times
pub fn level_for_verbosity(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Parse a level name such as `debug` or `off`
pub fn parse_level(name: &str) -> Option<LevelFilter> {
    name.trim().parse().ok()
}

/// Install the stderr logger
///
/// Safe to call more than once; later calls only adjust the level.
pub fn init(verbosity: u8) {
    let level = std::env::var(LOG_ENV)
        .ok()
        .and_then(|value| parse_level(&value))
        .unwrap_or_else(|| level_for_verbosity(verbosity));
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(level);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(level_for_verbosity(0), LevelFilter::Warn);
        assert_eq!(level_for_verbosity(1), LevelFilter::Info);
        assert_eq!(level_for_verbosity(2), LevelFilter::Debug);
        assert_eq!(level_for_verbosity(9), LevelFilter::Trace);
    }

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug"), Some(LevelFilter::Debug));
        assert_eq!(parse_level(" OFF "), Some(LevelFilter::Off));
        assert_eq!(parse_level("loud"), None);
    }

    #[test]
    fn test_format_record() {
        let line = format_record(Level::Info, &format_args!("loaded {} tokens", 18));
        assert_eq!(line, "hieromatch: info: loaded 18 tokens");
    }
}
