//! stockpulse - an in-memory product catalog with change delivery
//!
//! Clients observe catalog changes by short poll, long poll, or an
//! incremental Server-Sent Events stream. A single change publisher owns the
//! catalog and its revision marker; every delivery mode is a pure reader.

pub mod catalog;
pub mod cli;
pub mod delivery;
pub mod http_server;
