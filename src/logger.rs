//! # Logging
//! src/logger.rs
//!
//! El resto del crate loguea a través de la fachada `log`; acá se instala
//! el sink una sola vez, desde `main`: stderr o un archivo en modo append.

use std::fs::OpenOptions;
use std::io;

use log::SetLoggerError;
use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode, WriteLogger};

use crate::config::Config;

/// Errores al instalar el logger
#[derive(Debug)]
pub enum LoggerError {
    /// No se pudo abrir el archivo de log
    Io(io::Error),

    /// Ya había un logger instalado
    SetLogger(SetLoggerError),
}

impl std::fmt::Display for LoggerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoggerError::Io(e) => write!(f, "Cannot open log file: {}", e),
            LoggerError::SetLogger(e) => write!(f, "Cannot install logger: {}", e),
        }
    }
}

impl std::error::Error for LoggerError {}

impl From<io::Error> for LoggerError {
    fn from(e: io::Error) -> Self {
        LoggerError::Io(e)
    }
}

impl From<SetLoggerError> for LoggerError {
    fn from(e: SetLoggerError) -> Self {
        LoggerError::SetLogger(e)
    }
}

/// Instala el logger según `log_file` y `log_level`
pub fn init_logger(cfg: &Config) -> Result<(), LoggerError> {
    match &cfg.log_file {
        Some(file) => init_file_logger(cfg.log_level, file),
        None => init_term_logger(cfg.log_level),
    }
}

fn prepare_logger_config() -> simplelog::Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_thread_level(LevelFilter::Debug)
        .build()
}

fn init_term_logger(level: LevelFilter) -> Result<(), LoggerError> {
    TermLogger::init(
        level,
        prepare_logger_config(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )?;
    Ok(())
}

fn init_file_logger(level: LevelFilter, filename: &str) -> Result<(), LoggerError> {
    let file = OpenOptions::new().create(true).append(true).open(filename)?;
    WriteLogger::init(level, prepare_logger_config(), file)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_logger_bad_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut cfg = Config::default();
        cfg.log_file = Some(dir.path().join("no/such/dir/log.txt").display().to_string());

        // Falla antes de tocar el logger global
        assert!(matches!(init_logger(&cfg), Err(LoggerError::Io(_))));
    }
}
