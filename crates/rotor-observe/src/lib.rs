//! Process-wide `tracing` setup for rotor binaries.

mod logger;
pub use logger::*;
