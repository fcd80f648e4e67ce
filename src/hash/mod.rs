//! Hash algorithms exposed by the crate.
//!
//! Currently includes BLAKE2b with a pure-Rust implementation, together
//! with the variable-length construction Argon2 builds on.

pub mod blake2b;

/// Re-export of the BLAKE2b convenience functions.
pub use blake2b::{blake2b, blake2b_long};
