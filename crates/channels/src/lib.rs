//! Gateway boundary for the message pipeline.
//!
//! Defines the inbound event shape, the client traits the pipeline calls
//! through (history fetch, reply send, audit log), and the admission gate.
//! Concrete connectors (Discord) live in their own crates.

pub mod audit;
pub mod error;
pub mod gateway;
pub mod gating;

pub use {
    audit::{AuditLog, AuditRecord},
    error::{Error, Result},
    gateway::{GatewayClient, MAX_MESSAGE_LEN, MessageEvent, truncate_reply},
    gating::is_admitted,
};
