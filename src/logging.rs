//! # Logging
//! src/logging.rs
//!
//! Inicializa `tracing-subscriber`. El filtro sale de `RUST_LOG` y, si no
//! está definida, del nivel configurado (`--log-level`).

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Instala el subscriber global
///
/// Retorna `false` si ya había uno instalado (por ejemplo en tests).
pub fn init(default_level: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init("debug");
        assert!(!init("info"));
    }
}
