//! # Servidor TCP Concurrente
//! src/server/tcp.rs
//!
//! Implementacion del servidor TCP que maneja multiples conexiones simultaneas
//! usando threads. Cada conexión se procesa en su propio thread: se lee un
//! request, se responde y se cierra.

use crate::config::Config;
use crate::files::{FileError, FileStore};
use crate::http::{ParseError, Request, Response, StatusCode};
use crate::router::Router;
use log::{debug, error, info, log, warn, Level};
use std::io::{self, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

/// Tamaño máximo de un request (headers + body)
pub const MAX_REQUEST_BYTES: usize = 1024 * 1024;

const READ_CHUNK: usize = 4096;

/// Errores del servidor
#[derive(Debug)]
pub enum ServerError {
    /// No se pudo abrir el socket de escucha (fatal)
    Bind { address: String, source: io::Error },

    /// El directorio raíz no es utilizable (fatal)
    Files(FileError),

    /// Falla de I/O en una conexión; solo afecta a esa conexión
    Io(io::Error),
}

impl std::fmt::Display for ServerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServerError::Bind { address, source } => {
                write!(f, "Failed to bind to {}: {}", address, source)
            }
            ServerError::Files(e) => write!(f, "Unusable root directory: {}", e),
            ServerError::Io(e) => write!(f, "Connection I/O error: {}", e),
        }
    }
}

impl std::error::Error for ServerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ServerError::Bind { source, .. } => Some(source),
            ServerError::Files(e) => Some(e),
            ServerError::Io(e) => Some(e),
        }
    }
}

impl From<io::Error> for ServerError {
    fn from(e: io::Error) -> Self {
        ServerError::Io(e)
    }
}

/// Resultado de leer el socket
enum Incoming {
    /// Bytes de un request completo (o de todo lo que mandó el peer)
    Request(Vec<u8>),

    /// Se cortó la lectura por un error de framing
    Rejected(ParseError),

    /// El peer cerró sin mandar nada
    Closed,
}

/// Servidor HTTP/1.1 concurrente
pub struct Server {
    router: Arc<Router>,
    listener: TcpListener,
}

impl Server {
    /// Abre el socket de escucha y prepara el router
    ///
    /// Falla si la dirección está en uso o el directorio raíz no existe.
    pub fn bind(config: &Config) -> Result<Self, ServerError> {
        let files = FileStore::new(&config.directory).map_err(ServerError::Files)?;

        let listener = TcpListener::bind(&config.address).map_err(|source| ServerError::Bind {
            address: config.address.clone(),
            source,
        })?;

        info!(
            "Listening on {} (serving files from {})",
            listener.local_addr()?,
            files.root().display()
        );

        Ok(Self {
            router: Arc::new(Router::new(Arc::new(files))),
            listener,
        })
    }

    /// Dirección real del socket (útil cuando se bindea al puerto 0)
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Loop de aceptación: un thread por conexión, no termina nunca
    ///
    /// Un error al aceptar se loguea y el loop sigue.
    pub fn run(&self) {
        info!("Concurrent mode: one thread per connection");

        for stream in self.listener.incoming() {
            match stream {
                Ok(stream) => {
                    let router = Arc::clone(&self.router);

                    let peer_addr = stream
                        .peer_addr()
                        .map(|addr| addr.to_string())
                        .unwrap_or_else(|_| "unknown".to_string());

                    debug!("New connection from {}", peer_addr);

                    let spawned = thread::Builder::new()
                        .name(format!("conn-{}", peer_addr))
                        .spawn(move || {
                            if let Err(e) = handle_connection(stream, &router) {
                                error!("Connection {} failed: {}", peer_addr, e);
                            }
                        });

                    if let Err(e) = spawned {
                        error!("Failed to spawn connection thread: {}", e);
                    }
                }
                Err(e) => {
                    warn!("Error accepting connection: {}", e);
                }
            }
        }
    }
}

/// Atiende una conexión completa: lee, parsea, despacha y responde
///
/// Los errores de parsing terminan en 400; solo las fallas de I/O del
/// socket se propagan como `Err`.
pub fn handle_connection(mut stream: TcpStream, router: &Router) -> Result<(), ServerError> {
    let start = Instant::now();

    let response = match read_request(&mut stream)? {
        Incoming::Closed => {
            debug!("Connection closed before sending a request");
            return Ok(());
        }
        Incoming::Rejected(e) => {
            warn!("Rejected request: {}", e);
            Response::empty(StatusCode::BadRequest)
        }
        Incoming::Request(buffer) => match Request::parse(&buffer) {
            Ok(request) => {
                info!("{} {}", request.method().as_str(), request.path());
                router.route(&request)
            }
            Err(e) => {
                warn!("Parse error: {}", e);
                Response::empty(StatusCode::BadRequest)
            }
        },
    };

    stream.write_all(&response.to_bytes())?;
    stream.flush()?;

    let status = response.status();
    let level = if status.is_server_error() {
        Level::Error
    } else if status.is_success() {
        Level::Info
    } else {
        Level::Warn
    };
    log!(level, "{} ({:.2}ms)", status, start.elapsed().as_secs_f64() * 1000.0);

    Ok(())
}

/// Lee hasta tener headers + `Content-Length` bytes de body, o hasta EOF
fn read_request<R: Read>(reader: &mut R) -> io::Result<Incoming> {
    let mut buffer = Vec::new();
    let mut chunk = [0u8; READ_CHUNK];

    loop {
        let bytes_read = reader.read(&mut chunk)?;
        if bytes_read == 0 {
            break;
        }
        buffer.extend_from_slice(&chunk[..bytes_read]);

        if buffer.len() > MAX_REQUEST_BYTES {
            return Ok(Incoming::Rejected(ParseError::RequestTooLarge(MAX_REQUEST_BYTES)));
        }

        match Request::expected_len(&buffer) {
            Ok(Some(total)) if total > MAX_REQUEST_BYTES => {
                return Ok(Incoming::Rejected(ParseError::RequestTooLarge(MAX_REQUEST_BYTES)));
            }
            Ok(Some(total)) if buffer.len() >= total => break,
            Ok(_) => continue,
            Err(e) => return Ok(Incoming::Rejected(e)),
        }
    }

    if buffer.is_empty() {
        Ok(Incoming::Closed)
    } else {
        Ok(Incoming::Request(buffer))
    }
}
