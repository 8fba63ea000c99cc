use std::sync::OnceLock;

use thiserror::Error;

use crate::logging::init_log;

pub struct Config {
    pub log_config: LogConfig,
    /// Worker threads for batch diffing; `0` keeps rayon's default.
    pub threads: usize,
}

pub enum LogConfig {
    NoLog,
    /// `-v` count from the command line.
    Verbose(u8),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config is already initialized")]
    AlreadyInitialized,
    #[error("cannot install logger: {0}")]
    Logger(#[from] log::SetLoggerError),
    #[error("cannot open log file: {0}")]
    LogFile(#[from] std::io::Error),
    #[error("cannot build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

static INITIALIZED: OnceLock<()> = OnceLock::new();

/// Installs the process logger and sizes the rayon pool used by
/// [`crate::batch`]. Only the first call per process succeeds.
pub fn init_config(config: Config) -> Result<(), ConfigError> {
    INITIALIZED
        .set(())
        .map_err(|_| ConfigError::AlreadyInitialized)?;
    init_log(&config.log_config)?;
    if config.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(config.threads)
            .build_global()?;
    }
    log::debug!("using {} worker threads", rayon::current_num_threads());
    Ok(())
}
