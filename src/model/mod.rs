//! Documentation tree types consumed by the generator backends.
//!
//! The tree is produced elsewhere (by the comment scanner and tree
//! builder) and is treated as immutable while rendering. A document owns
//! its headers in document order; headers own items; items own blocks.
//! Nesting of headers is expressed through [`Header::depth`] rather than
//! parent pointers.

mod document;
mod item;
mod json;

pub use document::{Document, Header, MAX_SECTION_DEPTH};
pub use item::{Block, Inline, Item, Link, ListItem};
pub use json::{to_json, JsonFormat};
