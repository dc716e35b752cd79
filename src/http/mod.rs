//! # Módulo HTTP
//!
//! Este módulo implementa el subconjunto de HTTP/1.1 que habla el servidor,
//! sin usar librerías de alto nivel. Incluye:
//!
//! - Parsing de requests (request line, headers, body)
//! - Construcción de responses con `Content-Length` exacto
//! - Manejo de status codes
//!
//! ## Subconjunto soportado
//!
//! - Un request por conexión: no hay keep-alive
//! - Sin chunked transfer encoding ni compresión
//! - Solo GET y POST tienen semántica propia
//!
//! ### Formato de Request
//!
//! ```text
//! GET /echo/abc HTTP/1.1\r\n
//! User-Agent: curl/8.0\r\n
//! \r\n
//! ```
//!
//! ### Formato de Response
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! Content-Type: text/plain\r\n
//! Content-Length: 3\r\n
//! \r\n
//! abc
//! ```

pub mod request;   // Parsing de HTTP requests
pub mod response;  // Construcción de HTTP responses
pub mod status;    // Códigos de estado HTTP

// Re-exportamos los tipos principales para facilitar su uso
pub use request::{Method, ParseError, Request};
pub use response::Response;
pub use status::StatusCode;
