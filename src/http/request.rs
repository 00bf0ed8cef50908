//! # Parsing de Requests HTTP/1.1
//! src/http/request.rs
//!
//! Parser orientado a líneas que trabaja sobre cualquier `BufRead`
//! (normalmente un `BufReader<TcpStream>`).
//!
//! ## Formato de un Request
//!
//! ```text
//! POST /files/a.txt HTTP/1.1\r\n
//! Host: localhost:4221\r\n
//! Content-Length: 5\r\n
//! \r\n
//! hello
//! ```
//!
//! ## Componentes
//!
//! 1. **Request Line**: `METHOD /path VERSION`
//! 2. **Headers**: líneas `Name: Value` guardadas tal cual, en orden
//! 3. **Empty Line**: `\r\n` que separa headers del body
//! 4. **Body**: exactamente `Content-Length` bytes (vacío si no hay header)

use std::io::{BufRead, Read};
use thiserror::Error;

/// Prefijo literal del header User-Agent
pub const USER_AGENT_HEADER: &str = "User-Agent: ";

/// Prefijo literal del header Accept-Encoding
pub const ACCEPT_ENCODING_HEADER: &str = "Accept-Encoding: ";

/// Prefijo literal del header Content-Length
pub const CONTENT_LENGTH_HEADER: &str = "Content-Length: ";

/// Límite de body por defecto (10 MiB)
pub const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Límite por defecto para request line + headers (8 KiB)
pub const DEFAULT_MAX_HEAD_BYTES: usize = 8 * 1024;

/// Tamaños máximos que se aceptan al leer un request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Bytes de request line + headers, terminadores incluidos
    pub max_head_bytes: usize,

    pub max_body_bytes: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_head_bytes: DEFAULT_MAX_HEAD_BYTES,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

/// Métodos HTTP reconocidos
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET - Obtener un recurso
    GET,

    /// POST - Enviar datos a un recurso
    POST,

    PUT,

    DELETE,

    HEAD,
}

impl Method {
    /// Parsea un método HTTP desde un string
    ///
    /// # Errores
    ///
    /// Retorna error si el método no pertenece al conjunto reconocido
    fn from_str(s: &str) -> Result<Self, ParseError> {
        match s {
            "GET" => Ok(Method::GET),
            "POST" => Ok(Method::POST),
            "PUT" => Ok(Method::PUT),
            "DELETE" => Ok(Method::DELETE),
            "HEAD" => Ok(Method::HEAD),
            _ => Err(ParseError::UnsupportedMethod(s.to_string())),
        }
    }

    /// Convierte el método a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::DELETE => "DELETE",
            Method::HEAD => "HEAD",
        }
    }
}

/// Errores que pueden ocurrir durante el parsing
#[derive(Debug, Error)]
pub enum ParseError {
    /// El cliente cerró la conexión sin enviar nada
    #[error("Empty request")]
    EmptyRequest,

    /// La request line tiene menos de dos tokens
    #[error("Invalid request line: {0:?}")]
    InvalidRequestLine(String),

    #[error("Unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    #[error("Request line or header is not valid UTF-8")]
    InvalidUtf8,

    #[error("Invalid Content-Length: {0:?}")]
    InvalidContentLength(String),

    /// El stream terminó antes de completar el body anunciado
    #[error("Incomplete body: expected {expected} bytes, received {received}")]
    IncompleteBody { expected: usize, received: usize },

    /// Request line + headers no caben en el límite
    #[error("Request head too large (limit {limit} bytes)")]
    HeadTooLarge { limit: usize },

    #[error("Body too large: {length} bytes (limit {limit})")]
    BodyTooLarge { length: usize, limit: usize },

    #[error("I/O error while reading request: {0}")]
    Io(#[from] std::io::Error),
}

/// Representa un request HTTP parseado
#[derive(Debug, Clone)]
pub struct Request {
    /// Método HTTP
    method: Method,

    /// Path tal cual llegó, sin decodificar (ej: "/echo/abc")
    path: String,

    /// Versión del protocolo (vacía si la request line solo tenía dos tokens)
    version: String,

    /// Líneas de header en el orden recibido, sin fusionar duplicados
    headers: Vec<String>,

    /// Body crudo
    body: Vec<u8>,
}

impl Request {
    /// Parsea un request completo desde bytes en memoria
    ///
    /// # Ejemplo
    ///
    /// ```
    /// use tiny_httpd::http::Request;
    ///
    /// let raw = b"GET /echo/abc HTTP/1.1\r\nUser-Agent: curl/8.0\r\n\r\n";
    /// let request = Request::parse(raw).unwrap();
    ///
    /// assert_eq!(request.path(), "/echo/abc");
    /// assert_eq!(request.header("User-Agent: "), Some("curl/8.0"));
    /// ```
    pub fn parse(buffer: &[u8]) -> Result<Self, ParseError> {
        let mut reader = buffer;
        Self::read_from(&mut reader, Limits::default())
    }

    /// Lee un request desde un reader orientado a líneas
    ///
    /// Los headers se leen hasta la primera línea en blanco o el fin del
    /// stream. El body se lee solo si hay un header `Content-Length`, y en ese
    /// caso se leen exactamente esos bytes.
    ///
    /// Request line y headers comparten un presupuesto de
    /// `limits.max_head_bytes`; nunca se lee más que eso antes del body.
    pub fn read_from<R: BufRead>(reader: &mut R, limits: Limits) -> Result<Self, ParseError> {
        let mut head = HeadBudget::new(limits.max_head_bytes);

        // 1. Request line
        let line = match head.read_line(reader)? {
            Some(line) => line,
            None => return Err(ParseError::EmptyRequest),
        };
        let (method, path, version) = Self::parse_request_line(&line)?;

        // 2. Headers
        let mut headers = Vec::new();
        while let Some(line) = head.read_line(reader)? {
            if line.trim().is_empty() {
                break;
            }
            headers.push(line);
        }

        let mut request = Request {
            method,
            path,
            version,
            headers,
            body: Vec::new(),
        };

        // 3. Body
        if let Some(length) = request.content_length()? {
            if length > limits.max_body_bytes {
                return Err(ParseError::BodyTooLarge {
                    length,
                    limit: limits.max_body_bytes,
                });
            }

            let mut body = Vec::with_capacity(length);
            reader.by_ref().take(length as u64).read_to_end(&mut body)?;
            if body.len() < length {
                return Err(ParseError::IncompleteBody {
                    expected: length,
                    received: body.len(),
                });
            }
            request.body = body;
        }

        Ok(request)
    }

    /// Parsea la request line
    ///
    /// Formato: `GET /path HTTP/1.1`. Se separa por los dos primeros
    /// espacios; la versión puede faltar.
    fn parse_request_line(line: &str) -> Result<(Method, String, String), ParseError> {
        let mut parts = line.splitn(3, ' ');

        let method = parts.next().unwrap_or_default();
        let path = match parts.next() {
            Some(path) => path,
            None => return Err(ParseError::InvalidRequestLine(line.to_string())),
        };
        let version = parts.next().unwrap_or_default();

        let method = Method::from_str(method)?;

        Ok((method, path.to_string(), version.to_string()))
    }

    fn content_length(&self) -> Result<Option<usize>, ParseError> {
        match self.header(CONTENT_LENGTH_HEADER) {
            Some(value) => value
                .trim()
                .parse::<usize>()
                .map(Some)
                .map_err(|_| ParseError::InvalidContentLength(value.to_string())),
            None => Ok(None),
        }
    }

    // === Métodos públicos para acceder a los campos ===

    /// Obtiene el método HTTP del request
    pub fn method(&self) -> Method {
        self.method
    }

    /// Obtiene el path del request
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Obtiene la versión HTTP
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Obtiene todas las líneas de header
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Busca el primer header que empiece con `prefix` (sensible a mayúsculas)
    /// y retorna lo que sigue al prefijo
    ///
    /// # Ejemplo
    /// ```
    /// use tiny_httpd::http::Request;
    ///
    /// let raw = b"GET / HTTP/1.1\r\nAccept-Encoding: gzip\r\n\r\n";
    /// let request = Request::parse(raw).unwrap();
    ///
    /// assert_eq!(request.header("Accept-Encoding: "), Some("gzip"));
    /// assert_eq!(request.header("accept-encoding: "), None);
    /// ```
    pub fn header(&self, prefix: &str) -> Option<&str> {
        self.headers
            .iter()
            .find_map(|line| line.strip_prefix(prefix))
    }

    /// Obtiene el body del request
    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

/// Bytes de cabecera que todavía se pueden leer
struct HeadBudget {
    limit: usize,
    remaining: usize,
}

impl HeadBudget {
    fn new(limit: usize) -> Self {
        Self {
            limit,
            remaining: limit,
        }
    }

    /// Lee una línea sin el terminador `\r\n` (o `\n`)
    ///
    /// Retorna `None` si el stream ya terminó y `HeadTooLarge` si la línea
    /// no termina dentro del presupuesto restante.
    fn read_line<R: BufRead>(&mut self, reader: &mut R) -> Result<Option<String>, ParseError> {
        if self.remaining == 0 {
            return Err(ParseError::HeadTooLarge { limit: self.limit });
        }

        let mut raw = Vec::new();
        let read = reader
            .by_ref()
            .take(self.remaining as u64)
            .read_until(b'\n', &mut raw)?;
        if read == 0 {
            return Ok(None);
        }
        self.remaining -= read;

        if raw.ends_with(b"\n") {
            raw.pop();
            if raw.ends_with(b"\r") {
                raw.pop();
            }
        } else if self.remaining == 0 {
            return Err(ParseError::HeadTooLarge { limit: self.limit });
        }

        String::from_utf8(raw)
            .map(Some)
            .map_err(|_| ParseError::InvalidUtf8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_get() {
        let raw = b"GET / HTTP/1.1\r\n\r\n";
        let request = Request::parse(raw).unwrap();

        assert_eq!(request.method(), Method::GET);
        assert_eq!(request.path(), "/");
        assert_eq!(request.version(), "HTTP/1.1");
        assert!(request.headers().is_empty());
        assert!(request.body().is_empty());
    }

    #[test]
    fn test_parse_keeps_path_undecoded() {
        let raw = b"GET /echo/hello%20world/again HTTP/1.1\r\n\r\n";
        let request = Request::parse(raw).unwrap();

        assert_eq!(request.path(), "/echo/hello%20world/again");
    }

    #[test]
    fn test_parse_two_token_request_line() {
        let raw = b"GET /user-agent\r\n\r\n";
        let request = Request::parse(raw).unwrap();

        assert_eq!(request.path(), "/user-agent");
        assert_eq!(request.version(), "");
    }

    #[test]
    fn test_parse_blank_path() {
        let raw = b"GET  HTTP/1.1\r\n\r\n";
        let request = Request::parse(raw).unwrap();

        assert_eq!(request.path(), "");
        assert_eq!(request.version(), "HTTP/1.1");
    }

    #[test]
    fn test_headers_keep_order_and_duplicates() {
        let raw = b"GET / HTTP/1.1\r\nX-A: 1\r\nHost: localhost\r\nX-A: 2\r\n\r\n";
        let request = Request::parse(raw).unwrap();

        assert_eq!(request.headers(), &["X-A: 1", "Host: localhost", "X-A: 2"]);
        assert_eq!(request.header("X-A: "), Some("1"));
    }

    #[test]
    fn test_header_lookup_is_case_sensitive() {
        let raw = b"GET / HTTP/1.1\r\nuser-agent: lower\r\n\r\n";
        let request = Request::parse(raw).unwrap();

        assert_eq!(request.header(USER_AGENT_HEADER), None);
    }

    #[test]
    fn test_headers_end_at_end_of_stream() {
        let raw = b"GET / HTTP/1.1\r\nHost: localhost\r\n";
        let request = Request::parse(raw).unwrap();

        assert_eq!(request.headers(), &["Host: localhost"]);
    }

    #[test]
    fn test_bare_lf_line_endings() {
        let raw = b"GET /echo/x HTTP/1.1\nUser-Agent: lf\n\n";
        let request = Request::parse(raw).unwrap();

        assert_eq!(request.path(), "/echo/x");
        assert_eq!(request.header(USER_AGENT_HEADER), Some("lf"));
    }

    #[test]
    fn test_parse_body_with_content_length() {
        let raw = b"POST /files/a.txt HTTP/1.1\r\nContent-Length: 5\r\n\r\nhello";
        let request = Request::parse(raw).unwrap();

        assert_eq!(request.method(), Method::POST);
        assert_eq!(request.body(), b"hello");
    }

    #[test]
    fn test_body_reads_exactly_content_length() {
        let raw = b"POST /files/a.txt HTTP/1.1\r\nContent-Length: 3\r\n\r\nhello";
        let request = Request::parse(raw).unwrap();

        assert_eq!(request.body(), b"hel");
    }

    #[test]
    fn test_body_without_content_length_is_empty() {
        let raw = b"POST /files/a.txt HTTP/1.1\r\n\r\nhello";
        let request = Request::parse(raw).unwrap();

        assert!(request.body().is_empty());
    }

    #[test]
    fn test_incomplete_body() {
        let raw = b"POST /files/a.txt HTTP/1.1\r\nContent-Length: 10\r\n\r\nhello";
        let result = Request::parse(raw);

        assert!(matches!(
            result,
            Err(ParseError::IncompleteBody { expected: 10, received: 5 })
        ));
    }

    #[test]
    fn test_invalid_content_length() {
        let raw = b"POST /files/a.txt HTTP/1.1\r\nContent-Length: abc\r\n\r\n";
        let result = Request::parse(raw);

        assert!(matches!(result, Err(ParseError::InvalidContentLength(_))));
    }

    #[test]
    fn test_body_too_large() {
        let raw = b"POST /files/a.txt HTTP/1.1\r\nContent-Length: 6\r\n\r\n123456";
        let mut reader = &raw[..];
        let limits = Limits {
            max_body_bytes: 4,
            ..Limits::default()
        };
        let result = Request::read_from(&mut reader, limits);

        assert!(matches!(
            result,
            Err(ParseError::BodyTooLarge { length: 6, limit: 4 })
        ));
    }

    #[test]
    fn test_head_too_large() {
        let mut raw = b"GET / HTTP/1.1\r\nX-Big: ".to_vec();
        raw.extend(std::iter::repeat(b'a').take(64 * 1024));
        raw.extend_from_slice(b"\r\n\r\n");

        let limits = Limits {
            max_head_bytes: 1024,
            max_body_bytes: 16,
        };
        let mut reader = &raw[..];
        let result = Request::read_from(&mut reader, limits);

        assert!(matches!(result, Err(ParseError::HeadTooLarge { limit: 1024 })));
        // No se consumió más que el límite
        assert_eq!(reader.len(), raw.len() - 1024);
    }

    #[test]
    fn test_request_line_too_large() {
        let mut raw = b"GET /echo/".to_vec();
        raw.extend(std::iter::repeat(b'x').take(4096));

        let limits = Limits {
            max_head_bytes: 128,
            ..Limits::default()
        };
        let mut reader = &raw[..];

        assert!(matches!(
            Request::read_from(&mut reader, limits),
            Err(ParseError::HeadTooLarge { limit: 128 })
        ));
    }

    #[test]
    fn test_head_exactly_at_limit() {
        let raw = b"GET / HTTP/1.1\r\n\r\n";

        let fits = Limits {
            max_head_bytes: raw.len(),
            ..Limits::default()
        };
        let mut reader = &raw[..];
        assert!(Request::read_from(&mut reader, fits).is_ok());

        let short = Limits {
            max_head_bytes: raw.len() - 1,
            ..Limits::default()
        };
        let mut reader = &raw[..];
        assert!(matches!(
            Request::read_from(&mut reader, short),
            Err(ParseError::HeadTooLarge { .. })
        ));
    }

    #[test]
    fn test_empty_request() {
        let raw = b"";
        let result = Request::parse(raw);

        assert!(matches!(result, Err(ParseError::EmptyRequest)));
    }

    #[test]
    fn test_invalid_request_line() {
        let raw = b"GET\r\n\r\n"; // Falta path y version
        let result = Request::parse(raw);

        assert!(matches!(result, Err(ParseError::InvalidRequestLine(_))));
    }

    #[test]
    fn test_blank_request_line() {
        let raw = b"\r\n\r\n";
        let result = Request::parse(raw);

        assert!(matches!(result, Err(ParseError::InvalidRequestLine(_))));
    }

    #[test]
    fn test_unsupported_method() {
        let raw = b"BREW /pot HTTP/1.1\r\n\r\n";
        let result = Request::parse(raw);

        assert!(matches!(result, Err(ParseError::UnsupportedMethod(m)) if m == "BREW"));
    }

    #[test]
    fn test_invalid_utf8() {
        let raw = b"GET /\xff\xfe HTTP/1.1\r\n\r\n";
        let result = Request::parse(raw);

        assert!(matches!(result, Err(ParseError::InvalidUtf8)));
    }
}
