//! # Mini HTTP Server - Entry Point
//! src/main.rs
//!
//! Punto de entrada: configuración, logging, bind y loop de aceptación.

use log::error;
use mini_http_server::config::Config;
use mini_http_server::logger;
use mini_http_server::server::Server;

fn main() {
    // Crear configuración (CLI o env)
    let config = Config::new();

    if let Err(e) = config.validate() {
        eprintln!("Invalid configuration: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = logger::init_logger(&config) {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    config.print_summary();

    // Sin socket de escucha no hay nada que hacer
    let server = match Server::bind(&config) {
        Ok(server) => server,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    // Iniciar el servidor (esto bloquea el thread para siempre)
    server.run();
}
