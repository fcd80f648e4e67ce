//! Encoded Argon2 hash strings.
//!
//! The encoded form carries everything needed to verify a password except
//! the password itself:
//!
//! ```text
//! $argon2id$v=19$m=65536,t=3,p=4$<salt>$<tag>
//! ```
//!
//! Salt and tag are standard base64 without padding. The `v=` field may be
//! absent, in which case the hash is taken to be version 1.0 (`0x10`).

use std::fmt;
use std::str::FromStr;

use base64::Engine;
use base64::engine::general_purpose::STANDARD_NO_PAD;
use thiserror::Error;
use tracing::debug;

use super::params::{Variant, Version};

/// Errors that can occur while decoding an encoded hash.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("encoded hash must start with '$'")]
    MissingPrefix,

    #[error("unknown algorithm identifier")]
    UnknownVariant,

    #[error("unsupported version")]
    UnsupportedVersion,

    #[error("missing or malformed field `{0}`")]
    MalformedField(&'static str),

    #[error("invalid base64 in {0}")]
    InvalidBase64(&'static str),

    #[error("empty tag")]
    EmptyTag,

    #[error("unexpected trailing data")]
    TrailingData,
}

/// Decoded parameters, salt and tag of an Argon2 hash.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedHash {
    pub variant: Variant,
    pub version: Version,
    /// Requested memory cost in KiB, as hashed into H0.
    pub memory_cost: u32,
    pub time_cost: u32,
    pub lanes: u32,
    pub salt: Vec<u8>,
    pub tag: Vec<u8>,
}

impl fmt::Display for EncodedHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "${}$v={}$m={},t={},p={}${}${}",
            self.variant.name(),
            self.version.as_u32(),
            self.memory_cost,
            self.time_cost,
            self.lanes,
            STANDARD_NO_PAD.encode(&self.salt),
            STANDARD_NO_PAD.encode(&self.tag),
        )
    }
}

impl FromStr for EncodedHash {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode(s).inspect_err(|err| debug!(error = %err, "failed to decode argon2 hash"))
    }
}

fn decode(s: &str) -> Result<EncodedHash, DecodeError> {
    let rest = s.strip_prefix('$').ok_or(DecodeError::MissingPrefix)?;
    let mut fields = rest.split('$').peekable();

    let variant = fields
        .next()
        .and_then(Variant::from_name)
        .ok_or(DecodeError::UnknownVariant)?;

    let version = match fields.next_if(|field| field.starts_with("v=")) {
        Some(field) => {
            let value = parse_u32(&field[2..], "v")?;
            Version::from_u32(value).ok_or(DecodeError::UnsupportedVersion)?
        }
        None => Version::V0x10,
    };

    let params = fields.next().ok_or(DecodeError::MalformedField("m"))?;
    let (memory_cost, time_cost, lanes) = parse_params(params)?;

    let salt = fields.next().ok_or(DecodeError::MalformedField("salt"))?;
    let salt = STANDARD_NO_PAD
        .decode(salt)
        .map_err(|_| DecodeError::InvalidBase64("salt"))?;

    let tag = fields.next().ok_or(DecodeError::MalformedField("tag"))?;
    let tag = STANDARD_NO_PAD
        .decode(tag)
        .map_err(|_| DecodeError::InvalidBase64("tag"))?;
    if tag.is_empty() {
        return Err(DecodeError::EmptyTag);
    }

    if fields.next().is_some() {
        return Err(DecodeError::TrailingData);
    }

    Ok(EncodedHash {
        variant,
        version,
        memory_cost,
        time_cost,
        lanes,
        salt,
        tag,
    })
}

/// Parses `m=<m>,t=<t>,p=<p>` in that order.
fn parse_params(field: &str) -> Result<(u32, u32, u32), DecodeError> {
    let mut parts = field.split(',');
    let mut next = |key: &'static str| {
        parts
            .next()
            .and_then(|part| part.strip_prefix(key))
            .and_then(|part| part.strip_prefix('='))
            .ok_or(DecodeError::MalformedField(key))
            .and_then(|value| parse_u32(value, key))
    };

    let memory_cost = next("m")?;
    let time_cost = next("t")?;
    let lanes = next("p")?;

    if parts.next().is_some() {
        return Err(DecodeError::TrailingData);
    }

    Ok((memory_cost, time_cost, lanes))
}

fn parse_u32(value: &str, field: &'static str) -> Result<u32, DecodeError> {
    // Digits only: `u32::from_str` would also accept a leading '+'.
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DecodeError::MalformedField(field));
    }
    value.parse().map_err(|_| DecodeError::MalformedField(field))
}
