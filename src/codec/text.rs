//! Base64 helpers and the string compressor used for link payloads.
//!
//! [`compress`] deflates its input and spreads the compressed bits over
//! characters, 15 bits each, offset into `U+0020..=U+801F`. The last
//! character records how many padding bytes the decoder must drop. None of
//! the characters are surrogates or controls, so the output percent-encodes
//! without loss.

use std::io::{self, Read, Write};

use base64::{engine::general_purpose, Engine as _};
use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use flate2::Compression;
use tracing::debug;

use crate::codec::error::CodecError;

/// Upper bound on decompressed output, in bytes
pub const MAX_INFLATED_LEN: u64 = 16 * 1024 * 1024;

const CHAR_OFFSET: u32 = 32;
const BITS_PER_CHAR: u32 = 15;
const CHAR_MASK: u32 = (1 << BITS_PER_CHAR) - 1;

/// Encode bytes as standard base64
pub fn to_base64(bytes: &[u8]) -> String {
    general_purpose::STANDARD.encode(bytes)
}

/// Decode standard base64
pub fn from_base64(text: &str) -> Result<Vec<u8>, CodecError> {
    Ok(general_purpose::STANDARD.decode(text)?)
}

/// Compress a string into dense text
pub fn compress(input: &str) -> Result<String, CodecError> {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(input.as_bytes())?;
    let deflated = encoder.finish()?;

    let mut out = String::with_capacity(deflated.len() * 8 / BITS_PER_CHAR as usize + 2);
    let mut buffer: u32 = 0;
    let mut bits: u32 = 0;
    for byte in &deflated {
        buffer = (buffer << 8) | u32::from(*byte);
        bits += 8;
        if bits >= BITS_PER_CHAR {
            bits -= BITS_PER_CHAR;
            out.push(to_char((buffer >> bits) & CHAR_MASK)?);
            buffer &= (1 << bits) - 1;
        }
    }
    let mut chars = out.chars().count() as u32;
    if bits > 0 {
        out.push(to_char((buffer << (BITS_PER_CHAR - bits)) & CHAR_MASK)?);
        chars += 1;
    }

    // A decoder reading every full byte from the padded bit stream sees this many extra
    let padding = (chars * BITS_PER_CHAR / 8) as usize - deflated.len();
    out.push(to_char(padding as u32)?);

    debug!(
        input_len = input.len(),
        deflated_len = deflated.len(),
        output_chars = chars + 1,
        "compressed payload"
    );
    Ok(out)
}

fn to_char(value: u32) -> Result<char, CodecError> {
    char::from_u32(CHAR_OFFSET + value).ok_or_else(|| {
        CodecError::Compress(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("value {} has no character", value),
        ))
    })
}

/// Reverse [`compress`]. Returns `None` for anything it did not produce.
pub fn decompress(input: &str) -> Option<String> {
    let mut values = input
        .chars()
        .map(|c| {
            let code = u32::from(c);
            (CHAR_OFFSET..=CHAR_OFFSET + CHAR_MASK)
                .contains(&code)
                .then(|| code - CHAR_OFFSET)
        })
        .collect::<Option<Vec<u32>>>()?;

    let padding = values.pop()? as usize;
    if values.is_empty() || padding > 1 {
        return None;
    }

    let mut bytes = Vec::with_capacity(values.len() * BITS_PER_CHAR as usize / 8);
    let mut buffer: u32 = 0;
    let mut bits: u32 = 0;
    for value in values {
        buffer = (buffer << BITS_PER_CHAR) | value;
        bits += BITS_PER_CHAR;
        while bits >= 8 {
            bits -= 8;
            bytes.push(((buffer >> bits) & 0xFF) as u8);
        }
        buffer &= (1 << bits) - 1;
    }

    let kept = bytes.len().checked_sub(padding)?;
    if bytes[kept..].iter().any(|b| *b != 0) {
        return None;
    }
    bytes.truncate(kept);

    let mut inflated = Vec::new();
    DeflateDecoder::new(bytes.as_slice())
        .take(MAX_INFLATED_LEN + 1)
        .read_to_end(&mut inflated)
        .ok()?;
    if inflated.len() as u64 > MAX_INFLATED_LEN {
        debug!("decompressed payload exceeds limit");
        return None;
    }

    String::from_utf8(inflated).ok()
}
