//! # Handlers básicos
//! src/handlers/basic.rs
//!
//! - `/`: respuesta vacía 200
//! - `/echo/<texto>`: devuelve `<texto>` tal cual
//! - `/user-agent`: devuelve el header User-Agent del cliente
//! - cualquier otra ruta: 404 vacío

use super::ECHO_PREFIX;
use crate::error::Result;
use crate::http::request::USER_AGENT_HEADER;
use crate::http::{Request, Response, StatusCode};
use crate::router::RouteContext;

/// Handler para `/` (o path vacío)
pub fn root_handler(_req: &Request, _ctx: &RouteContext) -> Result<Response> {
    Ok(Response::new(StatusCode::Ok))
}

/// Handler para `/echo/<texto>`
///
/// El texto es el resto del path después de `/echo/`, sin decodificar y
/// con todos sus segmentos. La respuesta es comprimible.
///
/// # Ejemplo de response
/// ```text
/// HTTP/1.1 200 OK
/// Content-Type: text/plain
/// Content-Length: 3
///
/// abc
/// ```
pub fn echo_handler(req: &Request, _ctx: &RouteContext) -> Result<Response> {
    let text = req.path().strip_prefix(ECHO_PREFIX).unwrap_or_default();
    Ok(Response::text(text).compressible())
}

/// Handler para `/user-agent`
///
/// Usa el primer header que empiece literalmente con `User-Agent: `;
/// si no existe, el body es vacío.
pub fn user_agent_handler(req: &Request, _ctx: &RouteContext) -> Result<Response> {
    let agent = req.header(USER_AGENT_HEADER).unwrap_or_default();
    Ok(Response::text(agent))
}

/// Respuesta por defecto cuando ninguna ruta coincide
pub fn not_found() -> Response {
    Response::not_found()
}
