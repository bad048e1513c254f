//! Core library for the candidate enrollment intake service.

pub mod config;
pub mod error;
pub mod intake;
pub mod session;
pub mod telemetry;
