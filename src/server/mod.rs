//! # Módulo del Servidor HTTP
//! src/server/mod.rs
//!
//! Este módulo implementa el servidor TCP que:
//! 1. Escucha en una dirección
//! 2. Acepta conexiones entrantes, un thread por conexión
//! 3. Lee y parsea un request HTTP
//! 4. Genera y envía la response y cierra la conexión

pub mod tcp;

// Re-exportar para facilitar el uso
pub use tcp::{handle_connection, Server, ServerError, MAX_REQUEST_BYTES};
