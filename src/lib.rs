//! Shareable links for entity-relationship diagrams.
//!
//! [`codec`] turns a [`types::Diagram`] into a short, percent-encoded path
//! segment and back. [`import`], [`export`] and [`views`] cover getting
//! diagrams in and out of the tool.

pub mod codec;
pub mod export;
pub mod import;
pub mod types;
pub mod views;

pub use codec::{decode, encode, ShareError};
pub use types::{Column, Diagram, DisplaySettings, Position, RelationshipEdge, TableNode};
