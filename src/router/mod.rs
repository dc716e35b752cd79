//! # Sistema de Routing
//! src/router/mod.rs
//!
//! Este módulo mapea cada request al handler que le corresponde.
//!
//! ## Arquitectura
//!
//! ```text
//! Request → Router → Handler → Response
//! ```
//!
//! Las rutas son fijas y pocas, así que no hay tabla: son reglas que se
//! evalúan en orden y gana la primera que coincide.
//!
//! | Path            | Método   | Respuesta                              |
//! |-----------------|----------|----------------------------------------|
//! | `/`             | cualquier| 200 sin body                           |
//! | `/echo/{text}`  | cualquier| 200 `text/plain` con `{text}`          |
//! | `/user-agent`   | cualquier| 200 `text/plain` con el User-Agent     |
//! | `/files/{name}` | GET      | 200 `application/octet-stream` o 404   |
//! | `/files/{name}` | POST     | 201, 400 si el nombre es inválido, 500 |
//! | otro            | cualquier| 404 sin body                           |

use std::sync::Arc;

use log::{debug, error, warn};

use crate::files::{FileError, FileStore};
use crate::http::{Method, Request, Response, StatusCode};

const ECHO_PREFIX: &str = "/echo/";
const FILES_PREFIX: &str = "/files/";

/// Router que despacha requests a los handlers fijos
#[derive(Debug, Clone)]
pub struct Router {
    /// Archivos servidos por `/files/`
    files: Arc<FileStore>,
}

impl Router {
    /// Crea un router que sirve archivos desde `files`
    pub fn new(files: Arc<FileStore>) -> Self {
        Self { files }
    }

    /// Encuentra y ejecuta el handler apropiado para un request
    ///
    /// # Ejemplo
    /// ```
    /// use std::sync::Arc;
    /// use mini_http_server::files::FileStore;
    /// use mini_http_server::http::{Request, StatusCode};
    /// use mini_http_server::router::Router;
    ///
    /// let router = Router::new(Arc::new(FileStore::new(".").unwrap()));
    ///
    /// let request = Request::parse(b"GET /echo/abc HTTP/1.1\r\n\r\n").unwrap();
    /// let response = router.route(&request);
    ///
    /// assert_eq!(response.status(), StatusCode::Ok);
    /// assert_eq!(response.body(), b"abc");
    /// ```
    pub fn route(&self, request: &Request) -> Response {
        let path = request.path();

        if path == "/" {
            return root_handler();
        }

        if let Some(text) = path.strip_prefix(ECHO_PREFIX) {
            return echo_handler(text);
        }

        if path == "/user-agent" {
            return user_agent_handler(request);
        }

        if let Some(name) = path.strip_prefix(FILES_PREFIX) {
            match request.method() {
                Method::GET => return self.read_file_handler(name),
                Method::POST => return self.write_file_handler(name, request.body()),
                _ => {}
            }
        }

        debug!("No route for {} {}", request.method().as_str(), path);
        Response::empty(StatusCode::NotFound)
    }

    /// GET /files/{name}
    fn read_file_handler(&self, name: &str) -> Response {
        match self.files.read_file(name) {
            Ok(content) => Response::octet_stream(content),
            Err(FileError::NotFound) => Response::empty(StatusCode::NotFound),
            Err(e) => {
                warn!("Failed to read file {:?}: {}", name, e);
                Response::empty(StatusCode::NotFound)
            }
        }
    }

    /// POST /files/{name}
    fn write_file_handler(&self, name: &str, content: &[u8]) -> Response {
        match self.files.write_file(name, content) {
            Ok(()) => {
                debug!("Wrote {} bytes to {:?}", content.len(), name);
                Response::empty(StatusCode::Created)
            }
            Err(FileError::InvalidPath(p)) => {
                warn!("Rejected file path {:?}", p);
                Response::empty(StatusCode::BadRequest)
            }
            Err(e) => {
                error!("Failed to write file {:?}: {}", name, e);
                Response::empty(StatusCode::InternalServerError)
            }
        }
    }
}

/// GET /
fn root_handler() -> Response {
    Response::empty(StatusCode::Ok)
}

/// /echo/{text}: devuelve el sufijo tal cual, sin decodificar
fn echo_handler(text: &str) -> Response {
    Response::text(text)
}

/// /user-agent: refleja el header User-Agent (vacío si no vino)
fn user_agent_handler(request: &Request) -> Response {
    Response::text(request.header("User-Agent").unwrap_or(""))
}
