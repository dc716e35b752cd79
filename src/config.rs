//! # Configuración del Servidor
//! src/config.rs
//!
//! Este módulo define la configuración del servidor con soporte para
//! argumentos CLI y variables de entorno. Se construye una sola vez al
//! arrancar y después solo se lee.
//!
//! ## Ejemplos de uso
//!
//! ### CLI
//! ```bash
//! ./mini_http_server --directory /tmp/files --address 127.0.0.1:4221
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! HTTP_DIRECTORY=/tmp/files LOG_LEVEL=debug ./mini_http_server
//! ```

use std::net::SocketAddr;
use std::path::Path;

use clap::Parser;
use log::{info, LevelFilter};

/// Configuración del servidor HTTP/1.1
#[derive(Debug, Clone, Parser)]
#[command(name = "mini_http_server")]
#[command(about = "Servidor HTTP/1.1 minimo: echo, user-agent y archivos")]
#[command(version = "0.1.0")]
pub struct Config {
    /// Dirección host:puerto en la que escucha
    #[arg(long, default_value = "0.0.0.0:4221", env = "HTTP_ADDRESS")]
    pub address: String,

    /// Directorio raíz para las rutas /files/
    #[arg(long, default_value = ".", env = "HTTP_DIRECTORY")]
    pub directory: String,

    /// Nivel de log (off, error, warn, info, debug, trace)
    #[arg(long = "log-level", default_value = "info", env = "LOG_LEVEL")]
    pub log_level: LevelFilter,

    /// Archivo de log; si no se indica se loguea a stderr
    #[arg(long = "log-file", env = "LOG_FILE")]
    pub log_file: Option<String>,
}

impl Config {
    /// Crea una nueva configuración parseando argumentos CLI
    pub fn new() -> Self {
        Config::parse()
    }

    /// Valida la configuración
    ///
    /// Retorna errores si hay valores inválidos
    pub fn validate(&self) -> Result<(), String> {
        if self.address.trim().is_empty() {
            return Err("Address must not be empty".to_string());
        }
        if self.address.parse::<SocketAddr>().is_err() {
            return Err(format!("Address is not a valid host:port: {}", self.address));
        }

        let directory = Path::new(&self.directory);
        if !directory.exists() {
            return Err(format!("Directory does not exist: {}", self.directory));
        }
        if !directory.is_dir() {
            return Err(format!("Directory is not a directory: {}", self.directory));
        }

        Ok(())
    }

    /// Loguea un resumen de la configuración efectiva
    pub fn print_summary(&self) {
        info!("Configuration:");
        info!("   Address:    {}", self.address);
        info!("   Directory:  {}", self.directory);
        info!("   Log level:  {}", self.log_level);
        match &self.log_file {
            Some(file) => info!("   Log file:   {}", file),
            None => info!("   Log file:   stderr"),
        }
    }
}

impl Default for Config {
    /// Configuración por defecto
    fn default() -> Self {
        Self {
            address: "0.0.0.0:4221".to_string(),
            directory: ".".to_string(),
            log_level: LevelFilter::Info,
            log_file: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.address, "0.0.0.0:4221");
        assert_eq!(config.directory, ".");
        assert_eq!(config.log_level, LevelFilter::Info);
        assert!(config.log_file.is_none());
    }

    #[test]
    fn test_validate_success() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_parse_cli_args() {
        let config = Config::try_parse_from([
            "mini_http_server",
            "--directory",
            "/tmp",
            "--address",
            "127.0.0.1:9000",
            "--log-level",
            "debug",
        ])
        .unwrap();

        assert_eq!(config.directory, "/tmp");
        assert_eq!(config.address, "127.0.0.1:9000");
        assert_eq!(config.log_level, LevelFilter::Debug);
    }

    #[test]
    fn test_parse_rejects_bad_log_level() {
        let result = Config::try_parse_from(["mini_http_server", "--log-level", "loud"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_invalid_address() {
        let mut config = Config::default();
        config.address = "localhost".to_string();
        let result = config.validate();
        assert!(result.unwrap_err().contains("host:port"));

        config.address = "  ".to_string();
        let result = config.validate();
        assert!(result.unwrap_err().contains("must not be empty"));
    }

    #[test]
    fn test_validate_missing_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut config = Config::default();
        config.directory = dir.path().join("missing").display().to_string();

        let result = config.validate();
        assert!(result.unwrap_err().contains("does not exist"));
    }

    #[test]
    fn test_validate_directory_is_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let mut config = Config::default();
        config.directory = file.path().display().to_string();

        let result = config.validate();
        assert!(result.unwrap_err().contains("is not a directory"));
    }

    #[test]
    fn test_config_print_summary() {
        // Sin logger instalado no hace nada, pero no debe hacer panic
        Config::default().print_summary();
    }
}
