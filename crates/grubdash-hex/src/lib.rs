//! grubdash-hex: GrubDash core (validation chains + handlers) and its inbound HTTP adapter.

pub mod config;
pub mod errors;

pub mod application;

pub use grubdash_types::{domain, ports};

pub mod inbound; // HTTP adapter (server + routes)
