//! alertmanager-relay: AlertManager notification dispatcher
//!
//! A library for forwarding alert events to an AlertManager-compatible
//! endpoint, staging payloads that could not be delivered in a retry folder.

pub mod config;
pub mod event;
pub mod handler;
pub mod service;
pub mod spool;
pub mod transport;
pub mod wire;
