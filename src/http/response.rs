//! # Construcción de Respuestas HTTP
//! src/http/response.rs
//!
//! Este módulo proporciona una API para construir respuestas HTTP/1.1
//! y serializarlas byte a byte.
//!
//! ## Formato de una respuesta
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! Content-Type: text/plain\r\n
//! Content-Encoding: gzip\r\n
//! Content-Length: 23\r\n
//! \r\n
//! <body>
//! ```
//!
//! Los headers siempre salen en el mismo orden (Content-Type,
//! Content-Encoding, Content-Length) para que la respuesta sea idéntica
//! entre ejecuciones. Una respuesta sin Content-Type no lleva headers:
//! solo la línea vacía.
//!
//! ## Ejemplo de uso
//!
//! ```
//! use tiny_httpd::http::{Response, StatusCode};
//!
//! let response = Response::text("abc");
//!
//! assert_eq!(response.status(), StatusCode::Ok);
//! assert_eq!(
//!     response.to_bytes(),
//!     b"HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: 3\r\n\r\nabc"
//! );
//! ```

use super::StatusCode;

/// Versión del protocolo usada en todas las status lines
pub const HTTP_VERSION: &str = "HTTP/1.1";

/// Fin de línea HTTP
pub const CRLF: &str = "\r\n";

pub const CONTENT_TYPE_TEXT_PLAIN: &str = "text/plain";
pub const CONTENT_TYPE_OCTET_STREAM: &str = "application/octet-stream";

/// Representa una respuesta HTTP completa
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Código de estado HTTP
    status: StatusCode,

    /// Content-Type; si es `None` no se emite ningún header
    content_type: Option<String>,

    /// Content-Encoding aplicado al body (ej: "gzip")
    content_encoding: Option<String>,

    /// Cuerpo de la respuesta, ya codificado si corresponde
    body: Vec<u8>,

    /// Si el paso de codificación puede comprimir este body
    compressible: bool,
}

impl Response {
    /// Crea una respuesta sin headers ni body
    ///
    /// # Ejemplo
    /// ```
    /// use tiny_httpd::http::{Response, StatusCode};
    ///
    /// let response = Response::new(StatusCode::Created);
    /// assert_eq!(response.to_bytes(), b"HTTP/1.1 201 Created\r\n\r\n");
    /// ```
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            content_type: None,
            content_encoding: None,
            body: Vec::new(),
            compressible: false,
        }
    }

    /// Respuesta 404 vacía
    pub fn not_found() -> Self {
        Self::new(StatusCode::NotFound)
    }

    /// Respuesta 200 `text/plain`
    pub fn text(body: &str) -> Self {
        Self::new(StatusCode::Ok)
            .with_content_type(CONTENT_TYPE_TEXT_PLAIN)
            .with_body(body)
    }

    /// Respuesta 200 `application/octet-stream`
    pub fn octet_stream(body: Vec<u8>) -> Self {
        Self::new(StatusCode::Ok)
            .with_content_type(CONTENT_TYPE_OCTET_STREAM)
            .with_body_bytes(body)
    }

    /// Respuesta de error con el mensaje como body `text/plain`
    ///
    /// # Ejemplo
    /// ```
    /// use tiny_httpd::http::{Response, StatusCode};
    ///
    /// let response = Response::error(StatusCode::InternalError, "boom");
    /// assert_eq!(response.body(), b"boom");
    /// ```
    pub fn error(status: StatusCode, message: &str) -> Self {
        Self::new(status)
            .with_content_type(CONTENT_TYPE_TEXT_PLAIN)
            .with_body(message)
    }

    /// Establece el Content-Type (habilita el bloque de headers)
    pub fn with_content_type(mut self, content_type: &str) -> Self {
        self.content_type = Some(content_type.to_string());
        self
    }

    /// Establece el cuerpo de la respuesta desde un string
    pub fn with_body(mut self, body: &str) -> Self {
        self.body = body.as_bytes().to_vec();
        self
    }

    /// Establece el cuerpo de la respuesta desde bytes
    pub fn with_body_bytes(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    /// Marca el body como candidato a compresión
    pub fn compressible(mut self) -> Self {
        self.compressible = true;
        self
    }

    /// Reemplaza el body por su versión codificada y registra el encoding
    pub fn set_encoded_body(&mut self, encoding: &str, body: Vec<u8>) {
        self.content_encoding = Some(encoding.to_string());
        self.body = body;
    }

    /// Status line: `HTTP/1.1 200 OK\r\n`
    pub fn status_line(&self) -> Vec<u8> {
        format!("{} {}{}", HTTP_VERSION, self.status, CRLF).into_bytes()
    }

    /// Bloque de headers terminado en línea vacía
    ///
    /// Content-Length se calcula aquí, sobre el body final, para que
    /// siempre coincida con los bytes que se escriben.
    pub fn headers_block(&self) -> Vec<u8> {
        let mut block = String::new();

        if let Some(content_type) = &self.content_type {
            block.push_str(&format!("Content-Type: {}{}", content_type, CRLF));
            if let Some(encoding) = &self.content_encoding {
                block.push_str(&format!("Content-Encoding: {}{}", encoding, CRLF));
            }
            block.push_str(&format!("Content-Length: {}{}", self.body.len(), CRLF));
        }

        block.push_str(CRLF);
        block.into_bytes()
    }

    /// Convierte la respuesta a bytes listos para enviar por el socket
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut result = self.status_line();
        result.extend_from_slice(&self.headers_block());
        result.extend_from_slice(&self.body);
        result
    }

    /// Obtiene el código de estado de la respuesta
    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn content_encoding(&self) -> Option<&str> {
        self.content_encoding.as_deref()
    }

    pub fn is_compressible(&self) -> bool {
        self.compressible
    }

    /// Obtiene una referencia al body
    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_response_has_only_blank_header_line() {
        let response = Response::new(StatusCode::Ok);

        assert_eq!(response.status_line(), b"HTTP/1.1 200 OK\r\n");
        assert_eq!(response.headers_block(), b"\r\n");
        assert!(response.body().is_empty());
        assert_eq!(response.to_bytes(), b"HTTP/1.1 200 OK\r\n\r\n");
    }

    #[test]
    fn test_not_found() {
        let response = Response::not_found();
        assert_eq!(response.to_bytes(), b"HTTP/1.1 404 Not Found\r\n\r\n");
    }

    #[test]
    fn test_text_response() {
        let response = Response::text("abc");

        assert_eq!(response.content_type(), Some("text/plain"));
        assert_eq!(
            response.headers_block(),
            b"Content-Type: text/plain\r\nContent-Length: 3\r\n\r\n"
        );
    }

    #[test]
    fn test_empty_text_response_has_zero_length() {
        let response = Response::text("");
        let text = String::from_utf8(response.to_bytes()).unwrap();

        assert!(text.ends_with("Content-Length: 0\r\n\r\n"));
    }

    #[test]
    fn test_header_order_with_encoding() {
        let mut response = Response::text("abc");
        response.set_encoded_body("gzip", vec![1, 2, 3, 4, 5]);

        assert_eq!(
            response.headers_block(),
            b"Content-Type: text/plain\r\nContent-Encoding: gzip\r\nContent-Length: 5\r\n\r\n"
        );
        assert_eq!(response.body(), &[1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_octet_stream_binary_body() {
        let binary_data = vec![0x00, 0x01, 0x02, 0xFF];
        let response = Response::octet_stream(binary_data.clone());

        let mut expected =
            b"HTTP/1.1 200 OK\r\nContent-Type: application/octet-stream\r\nContent-Length: 4\r\n\r\n"
                .to_vec();
        expected.extend_from_slice(&binary_data);
        assert_eq!(response.to_bytes(), expected);
    }

    #[test]
    fn test_error_response() {
        let response = Response::error(StatusCode::InternalError, "Invalid request line");
        let text = String::from_utf8(response.to_bytes()).unwrap();

        assert!(text.starts_with("HTTP/1.1 500 Internal Error\r\n"));
        assert!(text.ends_with("\r\n\r\nInvalid request line"));
    }

    #[test]
    fn test_compressible_flag() {
        assert!(!Response::text("x").is_compressible());
        assert!(Response::text("x").compressible().is_compressible());
    }
}
