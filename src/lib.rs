//! # tiny_httpd
//! src/lib.rs
//!
//! Servidor HTTP/1.1 mínimo: un request por conexión, un conjunto fijo de
//! rutas y compresión gzip opcional.
//!
//! ## Arquitectura
//!
//! ```text
//! Acceptor → WorkerPool → Request::read_from → Router → Handler → encoding::apply → Response::to_bytes
//! ```
//!
//! - `http`: parsing de requests, construcción de responses, status codes
//! - `router`: tabla de rutas y contexto inmutable (directorio base)
//! - `handlers`: root, echo, user-agent y archivos
//! - `encoding`: negociación de Accept-Encoding y gzip
//! - `server`: listener TCP y pool de workers con cola acotada
//! - `config`: argumentos CLI / variables de entorno
//! - `logging`: inicialización de tracing
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use tiny_httpd::config::Config;
//! use tiny_httpd::server::Server;
//!
//! let config = Config::default();
//! let server = Server::bind(&config).expect("Error al iniciar servidor");
//! server.run().expect("accept loop failed");
//! ```

pub mod config;
pub mod encoding;
pub mod error;
pub mod handlers;
pub mod http;
pub mod logging;
pub mod router;
pub mod server;

pub use error::{Error, Result};
