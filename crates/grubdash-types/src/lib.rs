//! grubdash-types: domain records and ports shared by the GrubDash crates.

pub mod domain;
pub mod envelope;
pub mod ports;
