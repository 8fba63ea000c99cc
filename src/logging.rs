use chrono::Local;
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::fs::{File, OpenOptions};
use std::io::{self, LineWriter, Write};
use std::sync::Mutex;

use crate::config::{ConfigError, LogConfig};

fn map_level_to_str(level: Level) -> &'static str {
    match level {
        Level::Error => "ERROR",
        Level::Warn => "WARN",
        Level::Info => "INFO",
        Level::Debug => "DEBUG",
        Level::Trace => "TRACE",
    }
}

fn open_log_file(file_name: &str) -> io::Result<Mutex<LineWriter<File>>> {
    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(file_name)?;
    Ok(Mutex::new(LineWriter::new(file)))
}

/// Console logger on stderr, optionally mirrored to a file with module paths.
struct SesLogger {
    level: LevelFilter,
    console: bool,
    file: Option<Mutex<LineWriter<File>>>,
}

impl SesLogger {
    fn console(level: LevelFilter) -> Self {
        Self {
            level,
            console: true,
            file: None,
        }
    }

    fn with_file(mut self, file_name: &str) -> io::Result<Self> {
        self.file = Some(open_log_file(file_name)?);
        Ok(self)
    }

    fn file_only(level: LevelFilter, file_name: &str) -> io::Result<Self> {
        Self {
            level,
            console: false,
            file: None,
        }
        .with_file(file_name)
    }
}

impl Log for SesLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let now = Local::now();
        let level = map_level_to_str(record.level());
        if let Some(file) = &self.file {
            if let Ok(mut writer) = file.lock() {
                let _ = writeln!(
                    writer,
                    "[{:<5} {} {}] {}",
                    level,
                    now.format("%H:%M:%S%.6f"),
                    record.module_path().unwrap_or("???"),
                    record.args()
                );
            }
        }
        if self.console {
            eprintln!("[{:<5} {}] {}", level, now.format("%H:%M:%S%.3f"), record.args());
        }
    }

    fn flush(&self) {
        if let Some(file) = &self.file {
            if let Ok(mut writer) = file.lock() {
                let _ = writer.flush();
            }
        }
    }
}

impl Drop for SesLogger {
    fn drop(&mut self) {
        self.flush();
    }
}

fn install(logger: SesLogger) -> Result<(), ConfigError> {
    let level = logger.level;
    log::set_boxed_logger(Box::new(logger))?;
    log::set_max_level(level);
    Ok(())
}

/// `-v` info, `-vv` debug, `-vvv` debug mirrored to `debug.log`, more than
/// that traces every middle snake into `trace.log`.
pub fn init_log(config: &LogConfig) -> Result<(), ConfigError> {
    match config {
        LogConfig::NoLog => Ok(()),
        LogConfig::Verbose(verbose) => match *verbose {
            0 => Ok(()),
            1 => install(SesLogger::console(LevelFilter::Info)),
            2 => install(SesLogger::console(LevelFilter::Debug)),
            3 => install(SesLogger::console(LevelFilter::Debug).with_file("debug.log")?),
            4..=u8::MAX => install(SesLogger::file_only(LevelFilter::Trace, "trace.log")?),
        },
    }
}
