//! # Parsing de Requests HTTP/1.1
//! src/http/request.rs
//!
//! Este módulo implementa un parser HTTP/1.1 mínimo desde cero.
//!
//! ## Formato de un Request HTTP/1.1
//!
//! ```text
//! POST /files/notes.txt HTTP/1.1\r\n
//! Host: localhost:4221\r\n
//! Content-Length: 5\r\n
//! \r\n
//! hello
//! ```
//!
//! ## Componentes
//!
//! 1. **Request Line**: `METHOD /path HTTP/1.1`
//! 2. **Headers**: Pares `Name: Value` (uno por línea)
//! 3. **Empty Line**: `\r\n` que separa headers del body
//! 4. **Body**: bytes crudos después de la línea vacía

/// Separador entre la cabecera (request line + headers) y el body
pub const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";

/// Métodos HTTP
///
/// Solo GET y POST tienen semántica propia (rutas `/files/`); cualquier
/// otro token se conserva tal cual porque `/`, `/echo/` y `/user-agent`
/// responden a cualquier método.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    /// GET - Obtener un recurso
    GET,

    /// POST - Enviar datos a un recurso
    POST,

    /// Cualquier otro método, tal como llegó
    Other(String),
}

impl Method {
    fn from_token(s: &str) -> Self {
        match s {
            "GET" => Method::GET,
            "POST" => Method::POST,
            other => Method::Other(other.to_string()),
        }
    }

    /// Convierte el método a string
    pub fn as_str(&self) -> &str {
        match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::Other(m) => m,
        }
    }
}

/// Representa un request HTTP/1.1 parseado
#[derive(Debug, Clone)]
pub struct Request {
    /// Método HTTP
    method: Method,

    /// Path de la petición, sin decodificar (ej: "/echo/abc")
    path: String,

    /// Headers en orden de llegada, con el case original
    headers: Vec<(String, String)>,

    /// Versión HTTP ("HTTP/1.0" o "HTTP/1.1")
    version: String,

    /// Body del request
    body: Vec<u8>,
}

/// Errores que pueden ocurrir durante el parsing
///
/// Todos terminan en una respuesta 400 Bad Request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Request vacío
    EmptyRequest,

    /// El body es más corto que el Content-Length declarado
    IncompleteRequest,

    /// Request line o headers que no son UTF-8
    InvalidEncoding,

    /// La request line no tiene exactamente tres tokens no vacíos
    MalformedRequestLine,

    /// Versión HTTP distinta de HTTP/1.0 o HTTP/1.1
    InvalidHttpVersion(String),

    /// Content-Length que no es un entero no negativo
    InvalidContentLength(String),

    /// El request supera el tamaño máximo aceptado
    RequestTooLarge(usize),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::EmptyRequest => write!(f, "Empty request"),
            ParseError::IncompleteRequest => write!(f, "Incomplete HTTP request"),
            ParseError::InvalidEncoding => write!(f, "Request head is not valid UTF-8"),
            ParseError::MalformedRequestLine => write!(f, "Malformed request line"),
            ParseError::InvalidHttpVersion(v) => write!(f, "Invalid HTTP version: {}", v),
            ParseError::InvalidContentLength(v) => write!(f, "Invalid Content-Length: {}", v),
            ParseError::RequestTooLarge(max) => {
                write!(f, "Request exceeds the maximum size of {} bytes", max)
            }
        }
    }
}

impl std::error::Error for ParseError {}

impl Request {
    /// Parsea un request HTTP/1.1 desde bytes
    ///
    /// La cabecera debe ser UTF-8; el body se toma como bytes crudos
    /// después del primer `\r\n\r\n`. Sin línea vacía no hay body.
    ///
    /// # Ejemplo
    ///
    /// ```
    /// use mini_http_server::http::Request;
    ///
    /// let raw = b"GET /echo/abc HTTP/1.1\r\nUser-Agent: curl\r\n\r\n";
    /// let request = Request::parse(raw).unwrap();
    ///
    /// assert_eq!(request.path(), "/echo/abc");
    /// assert_eq!(request.header("user-agent"), Some("curl"));
    /// ```
    pub fn parse(buffer: &[u8]) -> Result<Self, ParseError> {
        if buffer.iter().all(|b| b.is_ascii_whitespace()) {
            return Err(ParseError::EmptyRequest);
        }

        let (head, rest) = split_head(buffer);
        let head = std::str::from_utf8(head).map_err(|_| ParseError::InvalidEncoding)?;

        // split siempre produce al menos un elemento
        let mut lines = head.split("\r\n");
        let request_line = lines.next().unwrap_or_default();

        // 1. Request line
        let (method, path, version) = Self::parse_request_line(request_line)?;

        // 2. Headers
        let headers = Self::parse_headers(lines);

        // 3. Body, recortado al Content-Length si viene declarado
        let body = match find_header(&headers, "Content-Length") {
            Some(value) => {
                let length = parse_content_length(value)?;
                if rest.len() < length {
                    return Err(ParseError::IncompleteRequest);
                }
                rest[..length].to_vec()
            }
            None => rest.to_vec(),
        };

        Ok(Request {
            method,
            path,
            headers,
            version,
            body,
        })
    }

    /// Calcula cuántos bytes ocupa el request completo a partir de lo leído
    ///
    /// Retorna `Ok(None)` mientras no se haya recibido la línea vacía que
    /// cierra los headers. Lo usa el servidor para saber cuándo dejar de leer.
    pub fn expected_len(buffer: &[u8]) -> Result<Option<usize>, ParseError> {
        let head_end = match find_subsequence(buffer, HEADER_TERMINATOR) {
            Some(pos) => pos,
            None => return Ok(None),
        };

        let head = std::str::from_utf8(&buffer[..head_end])
            .map_err(|_| ParseError::InvalidEncoding)?;

        let content_length = head
            .split("\r\n")
            .skip(1)
            .filter_map(|line| line.split_once(": "))
            .find(|(name, _)| name.eq_ignore_ascii_case("Content-Length"))
            .map(|(_, value)| value);

        let body_len = match content_length {
            Some(value) => parse_content_length(value)?,
            None => 0,
        };

        // Content-Length lo controla el cliente: la suma puede desbordar
        head_end
            .checked_add(HEADER_TERMINATOR.len())
            .and_then(|len| len.checked_add(body_len))
            .map(Some)
            .ok_or_else(|| {
                ParseError::InvalidContentLength(content_length.unwrap_or_default().to_string())
            })
    }

    /// Parsea la request line (primera línea del request)
    ///
    /// Formato: `GET /path HTTP/1.1`, separado por espacios simples.
    fn parse_request_line(line: &str) -> Result<(Method, String, String), ParseError> {
        let parts: Vec<&str> = line.split(' ').collect();

        // Exactamente 3 partes: METHOD PATH VERSION
        if parts.len() != 3 || parts.iter().any(|p| p.is_empty()) {
            return Err(ParseError::MalformedRequestLine);
        }

        let version = parts[2].to_string();
        if version != "HTTP/1.0" && version != "HTTP/1.1" {
            return Err(ParseError::InvalidHttpVersion(version));
        }

        Ok((Method::from_token(parts[0]), parts[1].to_string(), version))
    }

    /// Parsea los headers HTTP
    ///
    /// Cada header tiene formato "Name: Value". Las líneas sin el
    /// separador `": "` se ignoran.
    fn parse_headers<'a>(lines: impl Iterator<Item = &'a str>) -> Vec<(String, String)> {
        lines
            .filter_map(|line| line.split_once(": "))
            .map(|(name, value)| (name.to_string(), value.trim().to_string()))
            .collect()
    }

    // === Métodos públicos para acceder a los campos ===

    /// Obtiene el método HTTP del request
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Obtiene el path del request
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Obtiene todos los headers, en orden de llegada
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Obtiene un header específico (sin distinguir mayúsculas)
    ///
    /// Si el header aparece repetido gana la primera aparición.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// Obtiene la versión HTTP
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Obtiene el body del request
    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

fn split_head(buffer: &[u8]) -> (&[u8], &[u8]) {
    match find_subsequence(buffer, HEADER_TERMINATOR) {
        Some(pos) => (&buffer[..pos], &buffer[pos + HEADER_TERMINATOR.len()..]),
        None => (buffer, &[]),
    }
}

fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|window| window == needle)
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

/// Solo dígitos ASCII: `usize::from_str` aceptaría también un `+` inicial
fn parse_content_length(value: &str) -> Result<usize, ParseError> {
    let digits = value.trim();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseError::InvalidContentLength(value.to_string()));
    }
    digits
        .parse::<usize>()
        .map_err(|_| ParseError::InvalidContentLength(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_get() {
        let raw = b"GET / HTTP/1.1\r\n\r\n";
        let request = Request::parse(raw).unwrap();

        assert_eq!(request.method(), &Method::GET);
        assert_eq!(request.path(), "/");
        assert_eq!(request.version(), "HTTP/1.1");
        assert!(request.headers().is_empty());
        assert!(request.body().is_empty());
    }

    #[test]
    fn test_parse_keeps_path_verbatim() {
        let raw = b"GET /echo/hello%20world?x=1 HTTP/1.1\r\n\r\n";
        let request = Request::parse(raw).unwrap();

        assert_eq!(request.path(), "/echo/hello%20world?x=1");
    }

    #[test]
    fn test_parse_with_headers_in_order() {
        let raw = b"GET / HTTP/1.1\r\nHost: localhost:4221\r\nUser-Agent:  foo/1.2  \r\n\r\n";
        let request = Request::parse(raw).unwrap();

        assert_eq!(
            request.headers(),
            &[
                ("Host".to_string(), "localhost:4221".to_string()),
                ("User-Agent".to_string(), "foo/1.2".to_string()),
            ]
        );
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let raw = b"GET / HTTP/1.1\r\nuser-agent: abc\r\nUser-Agent: second\r\n\r\n";
        let request = Request::parse(raw).unwrap();

        assert_eq!(request.header("User-Agent"), Some("abc"));
        assert_eq!(request.header("USER-AGENT"), Some("abc"));
        assert_eq!(request.header("Accept"), None);
    }

    #[test]
    fn test_header_without_separator_is_ignored() {
        let raw = b"GET / HTTP/1.1\r\nGarbage\r\nHost:nospace\r\nAccept: */*\r\n\r\n";
        let request = Request::parse(raw).unwrap();

        assert_eq!(request.headers().len(), 1);
        assert_eq!(request.header("Accept"), Some("*/*"));
    }

    #[test]
    fn test_parse_post_body() {
        let raw = b"POST /files/a HTTP/1.1\r\nContent-Length: 5\r\n\r\nhello";
        let request = Request::parse(raw).unwrap();

        assert_eq!(request.method(), &Method::POST);
        assert_eq!(request.body(), b"hello");
    }

    #[test]
    fn test_body_is_binary_safe() {
        let mut raw = b"POST /files/bin HTTP/1.1\r\nContent-Length: 4\r\n\r\n".to_vec();
        raw.extend_from_slice(&[0xff, 0x00, b'\r', b'\n']);
        let request = Request::parse(&raw).unwrap();

        assert_eq!(request.body(), &[0xff, 0x00, b'\r', b'\n']);
    }

    #[test]
    fn test_body_truncated_to_content_length() {
        let raw = b"POST /files/a HTTP/1.1\r\nContent-Length: 3\r\n\r\nabcdef";
        let request = Request::parse(raw).unwrap();

        assert_eq!(request.body(), b"abc");
    }

    #[test]
    fn test_body_shorter_than_content_length() {
        let raw = b"POST /files/a HTTP/1.1\r\nContent-Length: 10\r\n\r\nabc";

        assert_eq!(Request::parse(raw).unwrap_err(), ParseError::IncompleteRequest);
    }

    #[test]
    fn test_invalid_content_length() {
        let raw = b"POST /files/a HTTP/1.1\r\nContent-Length: -1\r\n\r\n";

        assert!(matches!(
            Request::parse(raw),
            Err(ParseError::InvalidContentLength(_))
        ));
    }

    #[test]
    fn test_no_blank_line_means_no_body() {
        let raw = b"POST /files/a HTTP/1.1\r\nHost: x\r\ntrailing";
        let request = Request::parse(raw).unwrap();

        assert!(request.body().is_empty());
        assert_eq!(request.header("Host"), Some("x"));
    }

    #[test]
    fn test_other_method_is_kept() {
        let raw = b"DELETE / HTTP/1.1\r\n\r\n";
        let request = Request::parse(raw).unwrap();

        assert_eq!(request.method(), &Method::Other("DELETE".to_string()));
        assert_eq!(request.method().as_str(), "DELETE");
    }

    #[test]
    fn test_invalid_version() {
        let raw = b"GET / HTTP/2.0\r\n\r\n";

        assert!(matches!(
            Request::parse(raw),
            Err(ParseError::InvalidHttpVersion(_))
        ));
    }

    #[test]
    fn test_empty_request() {
        assert_eq!(Request::parse(b"").unwrap_err(), ParseError::EmptyRequest);
        assert_eq!(Request::parse(b"\r\n\r\n").unwrap_err(), ParseError::EmptyRequest);
    }

    #[test]
    fn test_malformed_request_line() {
        for raw in [
            &b"GET\r\n\r\n"[..],
            b"GET /\r\n\r\n",
            b"GET / HTTP/1.1 extra\r\n\r\n",
            b"GET  / HTTP/1.1\r\n\r\n",
            b" / HTTP/1.1\r\n\r\n",
        ] {
            assert_eq!(
                Request::parse(raw).unwrap_err(),
                ParseError::MalformedRequestLine,
                "input: {:?}",
                String::from_utf8_lossy(raw)
            );
        }
    }

    #[test]
    fn test_invalid_encoding() {
        let raw = b"GET /\xff\xfe HTTP/1.1\r\n\r\n";

        assert_eq!(Request::parse(raw).unwrap_err(), ParseError::InvalidEncoding);
    }

    #[test]
    fn test_expected_len() {
        assert_eq!(Request::expected_len(b"GET / HTTP/1.1\r\nHost: x").unwrap(), None);

        let head = b"GET / HTTP/1.1\r\n\r\n";
        assert_eq!(Request::expected_len(head).unwrap(), Some(head.len()));

        let raw = b"POST /files/a HTTP/1.1\r\ncontent-length: 5\r\n\r\nhe";
        assert_eq!(Request::expected_len(raw).unwrap(), Some(raw.len() - 2 + 5));
    }

    #[test]
    fn test_expected_len_content_length_overflow() {
        let raw = format!(
            "POST /files/a HTTP/1.1\r\nContent-Length: {}\r\n\r\n",
            usize::MAX
        );

        assert!(matches!(
            Request::expected_len(raw.as_bytes()),
            Err(ParseError::InvalidContentLength(_))
        ));
    }

    #[test]
    fn test_content_length_must_be_plain_digits() {
        for value in ["+5", " ", "5 5", "0x5", "5.0"] {
            let raw = format!("POST /files/a HTTP/1.1\r\nContent-Length: {}\r\n\r\nhello", value);

            assert!(
                matches!(
                    Request::parse(raw.as_bytes()),
                    Err(ParseError::InvalidContentLength(_))
                ),
                "parse accepted {:?}",
                value
            );
            assert!(
                matches!(
                    Request::expected_len(raw.as_bytes()),
                    Err(ParseError::InvalidContentLength(_))
                ),
                "expected_len accepted {:?}",
                value
            );
        }
    }

    #[test]
    fn test_expected_len_rejects_bad_content_length() {
        let raw = b"POST /files/a HTTP/1.1\r\nContent-Length: lots\r\n\r\n";

        assert!(matches!(
            Request::expected_len(raw),
            Err(ParseError::InvalidContentLength(_))
        ));
    }
}
