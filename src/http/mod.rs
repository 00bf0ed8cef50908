//! # Módulo HTTP
//! src/http/mod.rs
//!
//! Implementa el subconjunto de HTTP/1.1 que necesita el servidor:
//!
//! - Parsing de requests (request line, headers, body por Content-Length)
//! - Construcción de responses byte a byte
//! - Códigos de estado
//!
//! No hay keep-alive ni chunked transfer encoding: un request por conexión.

pub mod request;   // Parsing de HTTP requests
pub mod response;  // Construcción de HTTP responses
pub mod status;    // Códigos de estado HTTP

// Re-exportamos los tipos principales para facilitar su uso
pub use request::{Limits, Method, ParseError, Request};
pub use response::Response;
pub use status::StatusCode;
