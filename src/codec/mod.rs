//! Compact, URL-embeddable encoding of diagrams.
//!
//! Encoding runs minimize, pack, base64, compress and percent-encode in that
//! order; decoding runs the same steps backwards. All of it is pure and
//! synchronous.

pub mod columns;
mod error;
pub mod link;
pub mod minimize;
pub mod packer;
pub mod text;

pub use error::{CodecError, ShareError};
pub use link::{decode, encode, segment_from_link, share_path, share_url, SHARE_PREFIX};
pub use minimize::{minimize, restore, MinEdge, MinNode, MinimalSchema};
