//! Small pure helpers shared by the tracing core

pub mod bitfield;
mod hex;

pub use hex::build_hex;
