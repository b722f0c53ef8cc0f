//! Compact binary serialization of the minimal schema.
//!
//! The byte layout is private to this crate; links are only ever decoded by
//! the same build that produced them.

use bincode::Options;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::codec::error::CodecError;

/// Upper bound on a packed payload, in bytes
pub const MAX_PACKED_LEN: u64 = 8 * 1024 * 1024;

fn options() -> impl Options {
    bincode::DefaultOptions::new().with_limit(MAX_PACKED_LEN)
}

/// Serialize a value to bytes
pub fn pack<T: Serialize>(value: &T) -> Result<Vec<u8>, CodecError> {
    options().serialize(value).map_err(CodecError::Pack)
}

/// Parse bytes produced by [`pack`]
pub fn unpack<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, CodecError> {
    options().deserialize(bytes).map_err(CodecError::Unpack)
}
