use std::io::Write;

use log::{Level, LevelFilter, Log, Metadata, Record};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Writes level-tagged, coloured lines to stderr.
struct Logger {
    level: LevelFilter,
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let mut stderr = StandardStream::stderr(ColorChoice::Auto);
        let mut spec = ColorSpec::new();
        match record.level() {
            Level::Error => spec.set_fg(Some(Color::Red)).set_bold(true),
            Level::Warn => spec.set_fg(Some(Color::Yellow)).set_bold(true),
            Level::Info => spec.set_fg(Some(Color::Green)),
            Level::Debug => spec.set_fg(Some(Color::Cyan)),
            Level::Trace => spec.set_dimmed(true),
        };
        // nowhere left to report a failed write to stderr
        let _ = stderr.set_color(&spec);
        let _ = write!(stderr, "[{:5}] ", record.level());
        let _ = stderr.reset();
        let _ = writeln!(stderr, "{}: {}", record.target(), record.args());
    }

    fn flush(&self) {}
}

/// Maps `-v`/`-q` counts onto a level; warnings and errors show by default.
pub fn level_for(verbose: u8, quiet: u8) -> LevelFilter {
    const LEVELS: [LevelFilter; 6] = [
        LevelFilter::Off,
        LevelFilter::Error,
        LevelFilter::Warn,
        LevelFilter::Info,
        LevelFilter::Debug,
        LevelFilter::Trace,
    ];
    let index = (2 + i16::from(verbose) - i16::from(quiet)).clamp(0, 5);
    LEVELS[index as usize]
}

/// Installs the logger for the rest of the process.
pub fn init(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    log::set_boxed_logger(Box::new(Logger { level }))?;
    log::set_max_level(level);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for_counts_flags() {
        assert_eq!(level_for(0, 0), LevelFilter::Warn);
        assert_eq!(level_for(1, 0), LevelFilter::Info);
        assert_eq!(level_for(3, 0), LevelFilter::Trace);
        assert_eq!(level_for(9, 0), LevelFilter::Trace);
        assert_eq!(level_for(0, 2), LevelFilter::Off);
        assert_eq!(level_for(1, 1), LevelFilter::Warn);
    }
}
