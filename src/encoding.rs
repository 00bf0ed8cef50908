//! # Negociación de Content-Encoding
//! src/encoding.rs
//!
//! El servidor soporta un único esquema de compresión: gzip. El cliente lo
//! pide con `Accept-Encoding: gzip` (lista separada por `", "`); cualquier
//! otro token se ignora.

use crate::http::request::ACCEPT_ENCODING_HEADER;
use crate::http::{Request, Response};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::{Read, Write};
use thiserror::Error;

/// Esquemas de compresión soportados
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Gzip,
}

impl Encoding {
    /// Token usado en Accept-Encoding / Content-Encoding
    pub fn as_str(&self) -> &'static str {
        match self {
            Encoding::Gzip => "gzip",
        }
    }
}

#[derive(Debug, Error)]
pub enum EncodingError {
    #[error("Compression failed: {0}")]
    Compress(#[source] std::io::Error),

    #[error("Decompression failed: {0}")]
    Decompress(#[source] std::io::Error),
}

/// Elige el encoding a partir del valor de Accept-Encoding
///
/// # Ejemplo
/// ```
/// use tiny_httpd::encoding::{negotiate, Encoding};
///
/// assert_eq!(negotiate("deflate, gzip"), Some(Encoding::Gzip));
/// assert_eq!(negotiate("deflate,gzip"), None);
/// assert_eq!(negotiate("br"), None);
/// ```
pub fn negotiate(accept_encoding: &str) -> Option<Encoding> {
    accept_encoding
        .split(", ")
        .any(|token| token == Encoding::Gzip.as_str())
        .then_some(Encoding::Gzip)
}

/// Comprime `body` con el encoding indicado
pub fn compress(body: &[u8], encoding: Encoding) -> Result<Vec<u8>, EncodingError> {
    match encoding {
        Encoding::Gzip => {
            let mut encoder = GzEncoder::new(Vec::with_capacity(body.len()), Compression::default());
            encoder.write_all(body).map_err(EncodingError::Compress)?;
            encoder.finish().map_err(EncodingError::Compress)
        }
    }
}

/// Operación inversa de [`compress`]
pub fn decompress(body: &[u8], encoding: Encoding) -> Result<Vec<u8>, EncodingError> {
    match encoding {
        Encoding::Gzip => {
            let mut decoded = Vec::new();
            GzDecoder::new(body)
                .read_to_end(&mut decoded)
                .map_err(EncodingError::Decompress)?;
            Ok(decoded)
        }
    }
}

/// Aplica la compresión negociada a una respuesta
///
/// Solo se comprimen las respuestas marcadas como `compressible` y solo si
/// el request trae un `Accept-Encoding` que incluya gzip.
pub fn apply(request: &Request, response: &mut Response) -> Result<(), EncodingError> {
    if !response.is_compressible() {
        return Ok(());
    }

    let encoding = match request.header(ACCEPT_ENCODING_HEADER).and_then(negotiate) {
        Some(encoding) => encoding,
        None => return Ok(()),
    };

    let compressed = compress(response.body(), encoding)?;
    response.set_encoded_body(encoding.as_str(), compressed);
    Ok(())
}
