//! Rendering of documents through a backend.
//!
//! [`DocumentWriter`] validates the structure of one document and drives a
//! [`Backend`](crate::backend::Backend); [`render_document`] walks a whole
//! [`Document`](crate::model::Document) through it. The helpers here
//! (escaping, label encoding, relative paths) are shared by all backends.

pub mod escape;
mod label;
mod options;
mod path;
mod walker;
mod writer;

pub use escape::Transcoder;
pub use label::encode_label;
pub use options::{RenderOptions, DEFAULT_TITLE};
pub use path::{relative_path, resolve};
pub use walker::render_document;
pub use writer::{DocumentWriter, EnvelopeState};
