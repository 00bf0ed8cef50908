//! # Errores del servidor
//! src/error.rs
//!
//! Un único tipo de error para todo el pipeline, de modo que quien llame
//! pueda distinguir errores de parsing, de I/O y de codificación.

use crate::encoding::EncodingError;
use crate::http::ParseError;
use crate::server::pool::PoolError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Fallo de lectura/escritura sobre un archivo del directorio base
    #[error("File operation failed on {}: {source}", .path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Encoding(#[from] EncodingError),

    #[error(transparent)]
    Pool(#[from] PoolError),

    /// Configuración inválida detectada al arrancar
    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
