//! # Configuración del Servidor
//! src/config.rs
//!
//! Configuración del servidor con soporte para argumentos CLI y variables
//! de entorno. Se construye una sola vez al arrancar y no cambia después.
//!
//! ## Ejemplos de uso
//!
//! ### CLI
//! ```bash
//! ./tiny_httpd --port 4221 --directory /tmp/files --workers 8 --queue-capacity 128
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! HTTP_PORT=4221 FILES_DIR=/tmp/files ./tiny_httpd
//! ```

use crate::http::request::{Limits, DEFAULT_MAX_BODY_BYTES, DEFAULT_MAX_HEAD_BYTES};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

/// Configuración del servidor HTTP/1.1
#[derive(Debug, Clone, Parser)]
#[command(name = "tiny_httpd")]
#[command(about = "Servidor HTTP/1.1 minimo: echo, user-agent y archivos")]
#[command(version = "0.1.0")]
pub struct Config {
    /// Puerto en el que escucha el servidor
    #[arg(short, long, default_value = "4221", env = "HTTP_PORT")]
    pub port: u16,

    /// Host/IP en el que escucha
    #[arg(long, default_value = "127.0.0.1", env = "HTTP_HOST")]
    pub host: String,

    /// Directorio base para las rutas /files/
    #[arg(short, long, default_value = ".", env = "FILES_DIR")]
    pub directory: PathBuf,

    // === Workers ===

    /// Número de workers que atienden conexiones
    #[arg(short, long, default_value = "4", env = "WORKERS")]
    pub workers: usize,

    /// Conexiones en espera antes de responder 503
    #[arg(long = "queue-capacity", default_value = "64", env = "QUEUE_CAPACITY")]
    pub queue_capacity: usize,

    // === Límites ===

    /// Tamaño máximo del body de un request (bytes)
    #[arg(long = "max-body-bytes", default_value = "10485760", env = "MAX_BODY_BYTES")]
    pub max_body_bytes: usize,

    /// Tamaño máximo de request line + headers (bytes)
    #[arg(long = "max-head-bytes", default_value = "8192", env = "MAX_HEAD_BYTES")]
    pub max_head_bytes: usize,

    // === Logging ===

    /// Filtro de logs por defecto si RUST_LOG no está definida
    #[arg(long = "log-level", default_value = "info", env = "LOG_LEVEL")]
    pub log_level: String,
}

impl Config {
    /// Crea una nueva configuración parseando argumentos CLI
    pub fn new() -> Self {
        Config::parse()
    }

    /// Obtiene la dirección completa para bind (host:port)
    ///
    /// # Ejemplo
    /// ```rust
    /// use tiny_httpd::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.address(), "127.0.0.1:4221");
    /// ```
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Valida la configuración
    ///
    /// Retorna errores si hay valores inválidos
    pub fn validate(&self) -> Result<(), String> {
        if self.workers == 0 {
            return Err("Workers must be >= 1".to_string());
        }
        if self.queue_capacity == 0 {
            return Err("Queue capacity must be >= 1".to_string());
        }
        if self.max_head_bytes == 0 {
            return Err("Max head bytes must be >= 1".to_string());
        }

        // Si el directorio no existe se deja pasar: un GET dará 404 y un
        // POST dará 500, igual que con cualquier archivo inexistente
        if self.directory.exists() && !self.directory.is_dir() {
            return Err(format!(
                "Directory {} is not a directory",
                self.directory.display()
            ));
        }

        Ok(())
    }

    /// Límites de lectura de cada request
    pub fn limits(&self) -> Limits {
        Limits {
            max_head_bytes: self.max_head_bytes,
            max_body_bytes: self.max_body_bytes,
        }
    }

    /// Registra un resumen de la configuración
    pub fn log_summary(&self) {
        info!(
            address = %self.address(),
            directory = %self.directory.display(),
            workers = self.workers,
            queue_capacity = self.queue_capacity,
            max_body_bytes = self.max_body_bytes,
            max_head_bytes = self.max_head_bytes,
            "configuration loaded"
        );
    }
}

impl Default for Config {
    /// Configuración por defecto
    fn default() -> Self {
        Self {
            port: 4221,
            host: "127.0.0.1".to_string(),
            directory: PathBuf::from("."),
            workers: 4,
            queue_capacity: 64,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            max_head_bytes: DEFAULT_MAX_HEAD_BYTES,
            log_level: "info".to_string(),
        }
    }
}
