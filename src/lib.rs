//! # Mini HTTP Server
//! src/lib.rs
//!
//! Servidor HTTP/1.1 mínimo: acepta conexiones TCP, parsea un request por
//! conexión, lo despacha a un conjunto fijo de handlers y responde.
//!
//! ## Arquitectura
//!
//! El servidor está dividido en módulos especializados:
//! - `http`: Parsing de requests y formateo de responses
//! - `router`: Despacho por path y método
//! - `files`: Lectura/escritura de archivos bajo el directorio raíz
//! - `server`: Socket de escucha y manejo de conexiones
//! - `config`: Configuración por CLI y variables de entorno
//! - `logger`: Instalación del sink de logging
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use mini_http_server::config::Config;
//! use mini_http_server::server::Server;
//!
//! let mut config = Config::default();
//! config.address = "127.0.0.1:4221".to_string();
//! let server = Server::bind(&config).expect("Error al iniciar servidor");
//! server.run();
//! ```

pub mod config;
pub mod files;
pub mod http;
pub mod logger;
pub mod router;
pub mod server;
