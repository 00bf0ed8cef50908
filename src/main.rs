//! # tiny_httpd - Entry Point
//! src/main.rs
//!
//! Lee la configuración (CLI + entorno), inicializa el logging y arranca
//! el servidor. Cualquier error al arrancar termina el proceso.

use anyhow::Context;
use tiny_httpd::config::Config;
use tiny_httpd::logging;
use tiny_httpd::server::Server;

fn main() -> anyhow::Result<()> {
    let config = Config::new();

    logging::init(&config.log_level);
    config.log_summary();

    let server = Server::bind(&config)
        .with_context(|| format!("failed to start server on {}", config.address()))?;

    // Solo retorna si el listener falla
    server.run().context("server stopped")?;

    Ok(())
}
