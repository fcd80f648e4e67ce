//! Password hashing and key derivation.
//!
//! - `argon2`: the Argon2 memory-hard function with its encoded-string
//!   format and verification.
//! - `password`: category-scoped password storage on top of Argon2id.

pub mod argon2;
pub mod password;
