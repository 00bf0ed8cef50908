//! # Módulo del Servidor HTTP
//! src/server/mod.rs
//!
//! 1. Escucha en un puerto (con SO_REUSEADDR)
//! 2. Acepta conexiones entrantes y las encola en el pool
//! 3. Un worker lee y parsea el request, lo enruta y escribe la respuesta
//!
//! Si la cola del pool está llena, la conexión recibe un 503.

pub mod pool;
pub mod tcp;

// Re-exportar para facilitar el uso
pub use pool::{PoolError, WorkerPool};
pub use tcp::{handle_connection, Server};
