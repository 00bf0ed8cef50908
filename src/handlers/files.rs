//! # Handlers de archivos
//! src/handlers/files.rs
//!
//! `/files/<nombre>` lee (GET) o escribe (POST) un archivo dentro del
//! directorio base configurado al arrancar.

use super::FILES_PREFIX;
use crate::error::{Error, Result};
use crate::http::{Request, Response, StatusCode};
use crate::router::RouteContext;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Resuelve `/files/<nombre>` a una ruta dentro del directorio base
///
/// Retorna `None` si el nombre está vacío, es absoluto o intenta salir del
/// directorio base con `..`.
pub fn resolve_path(req: &Request, ctx: &RouteContext) -> Option<PathBuf> {
    let name = req.path().strip_prefix(FILES_PREFIX)?;
    if name.is_empty() {
        return None;
    }

    let relative = Path::new(name);
    let escapes = relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes {
        return None;
    }

    Some(ctx.base_dir().join(relative))
}

/// Handler para `GET /files/<nombre>`
///
/// Un archivo inexistente o ilegible responde 404. Un archivo vacío existe:
/// responde 200 con `Content-Length: 0`.
pub fn file_get_handler(req: &Request, ctx: &RouteContext) -> Result<Response> {
    let path = match resolve_path(req, ctx) {
        Some(path) => path,
        None => return Ok(Response::not_found()),
    };

    match fs::read(&path) {
        Ok(contents) => Ok(Response::octet_stream(contents)),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "file not readable");
            Ok(Response::not_found())
        }
    }
}

/// Handler para `POST /files/<nombre>`
///
/// Escribe el body tal cual (sobrescribiendo si ya existe) y responde
/// `201 Created` sin headers. Un fallo de escritura se propaga como error.
pub fn file_post_handler(req: &Request, ctx: &RouteContext) -> Result<Response> {
    let path = match resolve_path(req, ctx) {
        Some(path) => path,
        None => return Ok(Response::not_found()),
    };

    fs::write(&path, req.body()).map_err(|source| Error::File {
        path: path.clone(),
        source,
    })?;
    debug!(path = %path.display(), bytes = req.body().len(), "file written");

    Ok(Response::new(StatusCode::Created))
}
