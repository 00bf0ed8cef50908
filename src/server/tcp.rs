//! # Servidor TCP
//! src/server/tcp.rs
//!
//! Acepta conexiones y las entrega al pool de workers. Cada conexión
//! atiende un único request y se cierra después de escribir la respuesta.

use super::pool::{Rejected, WorkerPool};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::http::{Limits, ParseError, Request, Response, StatusCode};
use crate::router::{RouteContext, Router};
use socket2::{Domain, Protocol, Socket, Type};
use std::io::{self, BufReader, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpListener, TcpStream, ToSocketAddrs};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Conexiones pendientes en el backlog del socket
const LISTEN_BACKLOG: i32 = 128;

/// Máximo de bytes sin leer que se descartan antes de cerrar tras un error
const DRAIN_LIMIT: u64 = 64 * 1024;

/// Espera máxima por esos bytes
const DRAIN_TIMEOUT: Duration = Duration::from_millis(200);

/// Trabajo que viaja por la cola del pool
type Connection = (TcpStream, SocketAddr);

/// Servidor HTTP/1.1 con pool de workers acotado
pub struct Server {
    listener: TcpListener,
    pool: WorkerPool<Connection>,
}

impl Server {
    /// Valida la configuración, abre el socket e inicia los workers
    ///
    /// El contexto de rutas (directorio base) queda fijo desde aquí.
    pub fn bind(config: &Config) -> Result<Self> {
        config.validate().map_err(Error::Config)?;

        let listener = bind_listener(&config.address())?;
        info!(address = %listener.local_addr()?, "listening");

        let router = Arc::new(Router::with_default_routes(RouteContext::new(
            config.directory.clone(),
        )));
        let limits = config.limits();

        let pool = WorkerPool::new(
            config.workers,
            config.queue_capacity,
            move |(stream, peer): Connection| {
                if let Err(e) = handle_connection(stream, &router, limits) {
                    warn!(%peer, error = %e, "request failed");
                }
            },
        )?;
        info!(
            workers = pool.workers(),
            queue_capacity = pool.capacity(),
            "worker pool started"
        );

        Ok(Self { listener, pool })
    }

    /// Dirección real del socket (útil con puerto 0)
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Loop de aceptación
    ///
    /// Solo retorna si `accept` falla: sin socket no hay servidor.
    pub fn run(&self) -> Result<()> {
        loop {
            let (stream, peer) = match self.listener.accept() {
                Ok(accepted) => accepted,
                Err(e) => {
                    error!(error = %e, "accept failed; stopping server");
                    return Err(e.into());
                }
            };
            debug!(%peer, "accepted new connection");

            if let Err(Rejected { job: (stream, peer), reason }) = self.pool.submit((stream, peer)) {
                warn!(%peer, %reason, "connection rejected");
                reject(stream);
            }
        }
    }
}

/// Abre el listener con SO_REUSEADDR
fn bind_listener(address: &str) -> Result<TcpListener> {
    let addr = address
        .to_socket_addrs()?
        .next()
        .ok_or_else(|| Error::Config(format!("Address {} did not resolve", address)))?;

    let socket = Socket::new(Domain::for_address(addr), Type::STREAM, Some(Protocol::TCP))?;
    socket.set_reuse_address(true)?;
    socket.bind(&addr.into())?;
    socket.listen(LISTEN_BACKLOG)?;

    Ok(socket.into())
}

/// Responde 503 a una conexión que no cabe en la cola
fn reject(stream: TcpStream) {
    let response = Response::new(StatusCode::ServiceUnavailable);
    if let Err(e) = write_response(&stream, &response) {
        debug!(error = %e, "failed to write 503");
    }
}

/// Atiende una conexión completa: parsea, enruta y responde
///
/// Un error de parsing o de un handler se responde con 500 y el mensaje
/// del error como body; el error se retorna igualmente para que el
/// llamador lo registre. Si el cliente cierra sin enviar nada, no se
/// escribe nada.
pub fn handle_connection(stream: TcpStream, router: &Router, limits: Limits) -> Result<()> {
    let mut reader = BufReader::new(&stream);

    let request = match Request::read_from(&mut reader, limits) {
        Ok(request) => request,
        Err(ParseError::EmptyRequest) => {
            debug!("connection closed without a request");
            return Ok(());
        }
        Err(e) => {
            write_response(&stream, &internal_error(&e.to_string()))?;
            discard_unread(&mut reader, &stream);
            return Err(e.into());
        }
    };

    debug!(
        method = request.method().as_str(),
        path = request.path(),
        headers = ?request.headers(),
        body_bytes = request.body().len(),
        "request parsed"
    );

    let (response, result) = match router.route(&request) {
        Ok(response) => (response, Ok(())),
        Err(e) => (internal_error(&e.to_string()), Err(e)),
    };

    write_response(&stream, &response)?;
    if response.status().is_server_error() {
        warn!(
            method = request.method().as_str(),
            path = request.path(),
            status = response.status().as_u16(),
            "request served with error"
        );
    } else {
        info!(
            method = request.method().as_str(),
            path = request.path(),
            status = response.status().as_u16(),
            "request served"
        );
    }

    result
}

fn internal_error(message: &str) -> Response {
    Response::error(StatusCode::InternalError, message)
}

/// Consume, con límite de bytes y de tiempo, lo que el cliente siguió
/// enviando después de un request rechazado
///
/// Cerrar un socket con datos sin leer hace que el kernel mande RST, y el
/// cliente puede perder la respuesta que ya estaba en camino.
fn discard_unread<R: Read>(reader: R, stream: &TcpStream) {
    if stream.set_read_timeout(Some(DRAIN_TIMEOUT)).is_err() {
        return;
    }
    let _ = io::copy(&mut reader.take(DRAIN_LIMIT), &mut io::sink());
}

/// Escribe la respuesta y cierra la mitad de escritura
fn write_response(mut stream: &TcpStream, response: &Response) -> std::io::Result<()> {
    stream.write_all(&response.to_bytes())?;
    stream.flush()?;
    // El cliente ve EOF aunque el socket siga abierto en otro lado
    let _ = stream.shutdown(Shutdown::Write);
    Ok(())
}
