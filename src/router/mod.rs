//! # Sistema de Routing
//! src/router/mod.rs
//!
//! Este módulo implementa el router que mapea requests a handlers.
//!
//! ## Arquitectura
//!
//! ```text
//! Request → Router → Handler → Encoding → Response
//! ```
//!
//! Las rutas se evalúan en orden de registro y gana la primera que
//! coincida. Si ninguna coincide se responde 404 vacío.

use crate::encoding;
use crate::error::Result;
use crate::handlers::{self, ECHO_PREFIX, FILES_PREFIX, USER_AGENT_PATH};
use crate::http::{Method, Request, Response};
use std::path::{Path, PathBuf};

/// Tipo de función handler
///
/// Un handler recibe el Request y el contexto de rutas y retorna una
/// Response (o un error que el servidor convierte en 500).
pub type Handler = fn(&Request, &RouteContext) -> Result<Response>;

/// Contexto inmutable compartido por todos los handlers
///
/// Se construye una sola vez al arrancar y no cambia mientras el
/// servidor acepta conexiones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteContext {
    base_dir: PathBuf,
}

impl RouteContext {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Directorio raíz de las rutas `/files/`
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

/// Criterio de coincidencia de una ruta
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteMatcher {
    /// `/` o path vacío
    Root,

    /// Path exactamente igual
    Exact(&'static str),

    /// Path que empieza con el prefijo, cualquier método
    Prefix(&'static str),

    /// Path que empieza con el prefijo y método específico
    PrefixWithMethod(&'static str, Method),
}

impl RouteMatcher {
    pub fn matches(&self, request: &Request) -> bool {
        let path = request.path();
        match self {
            RouteMatcher::Root => path == "/" || path.trim().is_empty(),
            RouteMatcher::Exact(expected) => path == *expected,
            RouteMatcher::Prefix(prefix) => path.starts_with(prefix),
            RouteMatcher::PrefixWithMethod(prefix, method) => {
                request.method() == *method && path.starts_with(prefix)
            }
        }
    }
}

/// Router que mapea requests a handlers
pub struct Router {
    routes: Vec<(RouteMatcher, Handler)>,
    context: RouteContext,
}

impl Router {
    /// Crea un router vacío
    pub fn new(context: RouteContext) -> Self {
        Self {
            routes: Vec::new(),
            context,
        }
    }

    /// Crea un router con la tabla de rutas del servidor
    ///
    /// | Ruta | Handler |
    /// |---|---|
    /// | `/` | root |
    /// | `/echo/*` | echo |
    /// | `/user-agent` | user-agent |
    /// | `GET /files/*` | file-get |
    /// | `POST /files/*` | file-post |
    pub fn with_default_routes(context: RouteContext) -> Self {
        let mut router = Self::new(context);
        router.register(RouteMatcher::Root, handlers::root_handler);
        router.register(RouteMatcher::Prefix(ECHO_PREFIX), handlers::echo_handler);
        router.register(RouteMatcher::Exact(USER_AGENT_PATH), handlers::user_agent_handler);
        router.register(
            RouteMatcher::PrefixWithMethod(FILES_PREFIX, Method::GET),
            handlers::file_get_handler,
        );
        router.register(
            RouteMatcher::PrefixWithMethod(FILES_PREFIX, Method::POST),
            handlers::file_post_handler,
        );
        router
    }

    /// Registra una ruta con su handler
    pub fn register(&mut self, matcher: RouteMatcher, handler: Handler) {
        self.routes.push((matcher, handler));
    }

    /// Encuentra y ejecuta el handler apropiado para un request
    ///
    /// Después del handler se aplica la negociación de Content-Encoding.
    ///
    /// # Ejemplo
    /// ```
    /// use tiny_httpd::router::{RouteContext, Router};
    /// use tiny_httpd::http::{Request, StatusCode};
    ///
    /// let router = Router::with_default_routes(RouteContext::new("."));
    ///
    /// let request = Request::parse(b"GET /echo/abc HTTP/1.1\r\n\r\n").unwrap();
    /// let response = router.route(&request).unwrap();
    /// assert_eq!(response.body(), b"abc");
    ///
    /// let request = Request::parse(b"GET /nope HTTP/1.1\r\n\r\n").unwrap();
    /// assert_eq!(router.route(&request).unwrap().status(), StatusCode::NotFound);
    /// ```
    pub fn route(&self, request: &Request) -> Result<Response> {
        let handler = self
            .routes
            .iter()
            .find(|(matcher, _)| matcher.matches(request))
            .map(|(_, handler)| *handler);

        let mut response = match handler {
            Some(handler) => handler(request, &self.context)?,
            None => return Ok(handlers::not_found()),
        };

        encoding::apply(request, &mut response)?;
        Ok(response)
    }

    pub fn context(&self) -> &RouteContext {
        &self.context
    }
}
