//! Share-link encoding: diagram to URL path segment and back.

use tracing::{debug, error, warn};

use crate::codec::error::{CodecError, ShareError};
use crate::codec::{minimize, packer, text};
use crate::types::Diagram;

/// Route prefix the browser application serves shared diagrams under
pub const SHARE_PREFIX: &str = "/share/";

/// Encode a diagram into a percent-encoded path segment
pub fn encode(diagram: &Diagram) -> Result<String, ShareError> {
    encode_steps(diagram).map_err(|e| {
        error!(error = %e, "failed to encode diagram");
        ShareError::Encode(e)
    })
}

fn encode_steps(diagram: &Diagram) -> Result<String, CodecError> {
    let schema = minimize::minimize(diagram)?;
    let packed = packer::pack(&schema)?;
    let base64 = text::to_base64(&packed);
    let compressed = text::compress(&base64)?;
    let encoded = urlencoding::encode(&compressed).into_owned();

    debug!(
        packed_len = packed.len(),
        base64_len = base64.len(),
        encoded_len = encoded.len(),
        "encoded share link"
    );
    Ok(encoded)
}

/// Decode a path segment produced by [`encode`]
///
/// Any malformed, truncated or foreign input yields `None`.
pub fn decode(segment: &str) -> Option<Diagram> {
    let compressed = match urlencoding::decode(segment) {
        Ok(compressed) => compressed,
        Err(e) => {
            warn!(error = %e, "share link is not valid percent-encoding");
            return None;
        }
    };

    let base64 = match text::decompress(&compressed) {
        Some(base64) if !base64.is_empty() => base64,
        _ => {
            debug!("share link payload did not decompress");
            return None;
        }
    };

    match decode_steps(&base64) {
        Ok(diagram) => Some(diagram),
        Err(e) => {
            warn!(error = %e, "failed to decode share link");
            None
        }
    }
}

fn decode_steps(base64: &str) -> Result<Diagram, CodecError> {
    let packed = text::from_base64(base64)?;
    let schema: minimize::MinimalSchema = packer::unpack(&packed)?;
    minimize::restore(schema)
}

/// Path under which the browser application opens an encoded diagram
pub fn share_path(encoded: &str) -> String {
    format!("{}{}", SHARE_PREFIX, encoded)
}

/// Full share URL for a diagram below `base`
pub fn share_url(base: &str, diagram: &Diagram) -> Result<String, ShareError> {
    let encoded = encode(diagram)?;
    Ok(format!("{}{}", base.trim_end_matches('/'), share_path(&encoded)))
}

/// Extract the still-encoded segment from a share URL, a `/share/...` path or a bare segment
pub fn segment_from_link(link: &str) -> Option<String> {
    let link = link.trim();
    if link.is_empty() {
        return None;
    }

    if let Ok(parsed) = ::url::Url::parse(link) {
        let mut segments = parsed.path_segments()?;
        segments.find(|s| *s == "share")?;
        return segments.next().filter(|s| !s.is_empty()).map(str::to_string);
    }

    match link.find(SHARE_PREFIX) {
        Some(start) => {
            let rest = &link[start + SHARE_PREFIX.len()..];
            let end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
            Some(rest[..end].to_string()).filter(|s| !s.is_empty())
        }
        None => Some(link.to_string()),
    }
}
