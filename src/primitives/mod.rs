//! Primitive types
//!
//! This module defines the low-level building blocks shared by the hash,
//! derivation and access modules.
//!
//! Current primitives include:
//! - `ZeroedBuffer`: a heap buffer wiped on release and on drop
//! - `ConstantTimeEq`: equality whose running time does not depend on where
//!   two byte strings differ

mod ct;
mod zeroed;

pub use ct::ConstantTimeEq;
pub use zeroed::ZeroedBuffer;
