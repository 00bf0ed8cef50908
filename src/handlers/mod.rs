//! # Handlers de rutas
//! src/handlers/mod.rs
//!
//! Todos los handlers tienen la misma forma: reciben el request y el
//! contexto de rutas y producen una `Response`. La compresión y la
//! serialización las hace la infraestructura común (router + response).
//!
//! - **basic**: root, echo, user-agent, not-found
//! - **files**: lectura y escritura bajo el directorio base

pub mod basic;
pub mod files;

pub use basic::*;
pub use files::*;

pub const ECHO_PREFIX: &str = "/echo/";
pub const USER_AGENT_PATH: &str = "/user-agent";
pub const FILES_PREFIX: &str = "/files/";
