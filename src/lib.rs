//! # robogen
//!
//! Output backends for an API documentation generator.
//!
//! A documentation tree ([`Document`]) of headers, items and blocks is
//! rendered to one of several markup formats through a common
//! [`Backend`] contract. The crate owns escaping, anchor label encoding,
//! relative cross-file links and the document envelope (head, foot, table
//! of contents, index); scanning source comments and building the tree
//! happen elsewhere.
//!
//! ## Quick Start
//!
//! ```
//! use robogen::{render_to_string, Document, Header, Item, RenderOptions};
//!
//! fn main() -> robogen::Result<()> {
//!     let mut doc = Document::new();
//!     doc.add_header(Header::new("Foo/Bar").with_item(Item::new("NAME").with_paragraph("hello")));
//!
//!     let xml = render_to_string(&doc, "docbook", &RenderOptions::default())?;
//!     assert!(xml.contains("<section><title>Foo/Bar</title>"));
//!     assert!(xml.contains("<para>hello</para>"));
//!     Ok(())
//! }
//! ```
//!
//! ## Backends
//!
//! - **test**: scanable tag set for system tests
//! - **docbook**: DocBook XML `article`
//! - **html**: XHTML pages with relative cross-file links
//! - **ascii**: plain text

pub mod backend;
pub mod error;
pub mod model;
pub mod render;

// Re-export commonly used types
pub use backend::{
    AsciiBackend, Backend, BackendRegistry, DocBookBackend, HtmlBackend, TestBackend,
};
pub use error::{Error, Result};
pub use model::{Block, Document, Header, Inline, Item, JsonFormat, Link, ListItem};
pub use render::{encode_label, relative_path, DocumentWriter, RenderOptions};

use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

/// Render a document to an open stream and hand the stream back.
///
/// # Example
///
/// ```
/// use robogen::{render_to_writer, Document, RenderOptions, TestBackend};
///
/// let out = render_to_writer(&TestBackend::new(), &Document::new(), &RenderOptions::default(), Vec::new())?;
/// assert_eq!(
///     String::from_utf8(out).unwrap(),
///     "<doc_start src_name=\"\" name=\"API Reference\">\n</doc_start>\n"
/// );
/// # Ok::<(), robogen::Error>(())
/// ```
pub fn render_to_writer<W: Write>(
    backend: &dyn Backend,
    doc: &Document,
    options: &RenderOptions,
    out: W,
) -> Result<W> {
    render::render_document(backend, doc, options, out)
}

/// Render a document with the backend named by `selector` (a name, alias
/// or file extension).
pub fn render_to_string(doc: &Document, selector: &str, options: &RenderOptions) -> Result<String> {
    Generator::new()
        .with_backend(selector)?
        .with_options(options.clone())
        .render_to_string(doc)
}

/// Render a document into a file.
///
/// Output goes to a temporary file next to `path`, which replaces `path`
/// only once the document is complete. On any error the target is left
/// untouched.
pub fn render_to_path<P: AsRef<Path>>(
    backend: &dyn Backend,
    doc: &Document,
    options: &RenderOptions,
    path: P,
) -> Result<()> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let tmp = tempfile::NamedTempFile::new_in(dir)?;
    let writer = render_to_writer(backend, doc, options, BufWriter::new(tmp))?;
    let tmp = writer.into_inner().map_err(|e| e.into_error())?;
    tmp.persist(path).map_err(|e| e.error)?;

    log::debug!("wrote {}", path.display());
    Ok(())
}

/// Convert a document to JSON.
pub fn to_json(doc: &Document, format: JsonFormat) -> Result<String> {
    model::to_json(doc, format)
}

/// Builder for rendering documents.
///
/// # Example
///
/// ```
/// use robogen::{Document, Generator, Header};
///
/// let mut doc = Document::new().with_title("My Project");
/// doc.add_header(Header::new("lib/parse"));
///
/// let html = Generator::new()
///     .with_backend("html")?
///     .with_toc(true)
///     .without_timestamp()
///     .render_to_string(&doc)?;
/// assert!(html.contains("<title>My Project</title>"));
/// assert!(html.contains("TABLE OF CONTENTS"));
/// # Ok::<(), robogen::Error>(())
/// ```
pub struct Generator {
    registry: BackendRegistry,
    backend: Arc<dyn Backend>,
    options: RenderOptions,
}

impl Generator {
    /// Create a generator with the built-in backends, rendering HTML.
    pub fn new() -> Self {
        Self {
            registry: BackendRegistry::with_defaults(),
            backend: Arc::new(HtmlBackend::new()),
            options: RenderOptions::default(),
        }
    }

    /// Register an additional backend.
    pub fn with_registered(mut self, backend: Arc<dyn Backend>) -> Self {
        self.registry.register(backend);
        self
    }

    /// Select the backend by name, alias or file extension.
    pub fn with_backend(mut self, selector: &str) -> Result<Self> {
        self.backend = self.registry.get(selector)?;
        Ok(self)
    }

    /// Replace the render options.
    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    /// Render as nested sections.
    pub fn with_sections(mut self, sections: bool) -> Self {
        self.options = self.options.with_sections(sections);
        self
    }

    /// Emit a table of contents.
    pub fn with_toc(mut self, toc: bool) -> Self {
        self.options = self.options.with_toc(toc);
        self
    }

    /// Emit an index.
    pub fn with_index(mut self, index: bool) -> Self {
        self.options = self.options.with_index(index);
        self
    }

    /// Leave generation timestamps out of footers.
    pub fn without_timestamp(mut self) -> Self {
        self.options = self.options.with_timestamp(false);
        self
    }

    /// Get the selected backend.
    pub fn backend(&self) -> &dyn Backend {
        self.backend.as_ref()
    }

    /// Get the render options.
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Render a document to a string.
    pub fn render_to_string(&self, doc: &Document) -> Result<String> {
        let out = render_to_writer(self.backend.as_ref(), doc, &self.options, Vec::new())?;
        Ok(render::escape::into_string(out))
    }

    /// Render a document to an open stream.
    pub fn render_to_writer<W: Write>(&self, doc: &Document, out: W) -> Result<W> {
        render_to_writer(self.backend.as_ref(), doc, &self.options, out)
    }

    /// Render a document into a file, replacing it atomically.
    pub fn render_to_path<P: AsRef<Path>>(&self, doc: &Document, path: P) -> Result<()> {
        render_to_path(self.backend.as_ref(), doc, &self.options, path)
    }

    /// Output file name for a base name, using the backend's extension.
    pub fn output_name(&self, base: &str) -> String {
        self.backend.output_name(base)
    }
}

impl Default for Generator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generator_defaults_to_html() {
        let generator = Generator::new();
        assert_eq!(generator.backend().name(), "html");
        assert_eq!(generator.output_name("index"), "index.html");
    }

    #[test]
    fn test_generator_unknown_backend() {
        assert!(matches!(
            Generator::new().with_backend("troff"),
            Err(Error::UnknownBackend(_))
        ));
    }

    #[test]
    fn test_render_to_string_by_extension() {
        let doc = Document::new().with_title("T");
        let out = render_to_string(&doc, ".txt", &RenderOptions::default()).unwrap();
        assert_eq!(out, "T\n=\n\n");
    }
}
