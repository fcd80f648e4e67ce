//! Password hashing and access control primitives for Warden
//!
//! This crate provides the security core behind Warden's authentication
//! and authorization layers: how passwords are stored and checked, and how
//! ordered permission rules collapse into a per-identity decision.
//!
//! The focus is on **clarity, predictability, and auditability**. Sensitive
//! material lives in buffers that are wiped on release, verification runs
//! in constant time, and no error or log line ever carries secret bytes.
//!
//! # Module overview
//!
//! - `primitives`
//!   `ZeroedBuffer`, the zero-on-release storage used for every password,
//!   key, digest and working-memory block, and constant-time comparison.
//!
//! - `hash`
//!   BLAKE2b (RFC 7693): an incremental core state machine, a configurable
//!   hasher with keying, salt, personalization and tree parameters, and the
//!   variable-length H' construction used by Argon2.
//!
//! - `derivation`
//!   Argon2d, Argon2i and Argon2id (RFC 9106) with multi-threaded lane
//!   filling, chunked working memory and the `$argon2id$v=19$…` encoded
//!   form, plus a category-scoped password hasher built on top.
//!
//! - `access`
//!   Access control lists folded from ordered allow / deny /
//!   allow-all-except / deny-all-except rules, evaluated per identity.
//!
//! # Logging
//!
//! Diagnostics go through [`tracing`]. The crate never installs a
//! subscriber; applications decide where events end up.

pub mod access;
pub mod derivation;
pub mod hash;
pub mod primitives;
