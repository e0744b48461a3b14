//! Generator backends and the registry that selects them.
//!
//! Every output format implements the whole [`Backend`] trait: escaping,
//! anchor syntax, the document envelope and every block operation. The
//! driver assumes all of them exist, so there are no optional structural
//! operations. Backends are stateless; per-document state such as open
//! blocks and section counters lives in
//! [`DocumentWriter`](crate::render::DocumentWriter).
//!
//! # Example
//!
//! ```
//! use robogen::backend::BackendRegistry;
//!
//! let registry = BackendRegistry::with_defaults();
//! let backend = registry.get("docbook").unwrap();
//! assert_eq!(backend.escape_string("<a & b>"), "&lt;a &amp; b&gt;");
//! assert_eq!(registry.get(".html").unwrap().name(), "html");
//! ```

mod ascii;
mod docbook;
mod html;
mod test_output;

pub use ascii::AsciiBackend;
pub use docbook::DocBookBackend;
pub use html::HtmlBackend;
pub use test_output::TestBackend;

use crate::error::{Error, Result};
use crate::model::{Document, Header, Link};
use crate::render::escape::into_string;
use crate::render::RenderOptions;
use std::collections::HashMap;
use std::io::{self, Write};
use std::sync::Arc;

/// Resolved document-level values handed to the envelope operations.
#[derive(Debug, Clone, Copy)]
pub struct Envelope<'a> {
    /// The document being rendered
    pub document: &'a Document,
    /// Title after falling back to the configured default
    pub title: &'a str,
    /// Charset after falling back to the configured default
    pub charset: &'a str,
    /// Options of this render
    pub options: &'a RenderOptions,
}

/// A section being opened.
#[derive(Debug, Clone, Copy)]
pub struct Section<'a> {
    /// Nesting depth, in `[0, MAX_SECTION_DEPTH)`
    pub depth: usize,
    /// Hierarchical number, one counter per open section (`[1, 2]` is 1.2.)
    pub number: &'a [usize],
    /// Title of the section, not yet escaped
    pub name: &'a str,
    /// Header the section documents
    pub header: &'a Header,
    /// Omit numbering and header type from the title
    pub name_only: bool,
}

/// Format a hierarchical section number, `[1, 2]` as `1.2.`.
pub(crate) fn section_number(number: &[usize]) -> String {
    number.iter().map(|n| format!("{n}.")).collect()
}

/// Format a line number right-aligned to the width of `max`, plus a space.
pub(crate) fn padded_line_number(number: usize, max: usize) -> String {
    let width = max.max(number).to_string().len();
    format!("{number:>width$} ")
}

/// Trait for output formats.
///
/// Implement this trait to add a new output format. All write methods
/// receive the open output stream of the document being rendered.
pub trait Backend: Send + Sync {
    /// Get the name of this backend (its primary selector).
    fn name(&self) -> &str;

    /// Get additional selectors for this backend.
    fn aliases(&self) -> &[&str] {
        &[]
    }

    /// Get the target file extensions this backend is selected by.
    ///
    /// Extensions should be lowercase without the leading dot.
    fn supported_extensions(&self) -> &[&str];

    /// Get the default extension of output files, with the leading dot.
    fn default_extension(&self) -> &str;

    /// Get the charset declared when neither document nor options set one.
    fn default_charset(&self) -> &str;

    /// Append the output fragment for one input byte.
    ///
    /// # Panics
    ///
    /// Markup backends panic on `\n` and `\t`: line structure must be
    /// turned into block boundaries before text reaches the escaper.
    fn escape_char(&self, c: u8, out: &mut Vec<u8>);

    /// Escape a string byte by byte.
    fn escape_string(&self, s: &str) -> String {
        let mut out = Vec::with_capacity(s.len());
        for &c in s.as_bytes() {
            self.escape_char(c, &mut out);
        }
        into_string(out)
    }

    /// Write an escaped string.
    fn write_escaped(&self, out: &mut dyn Write, s: &str) -> io::Result<()> {
        out.write_all(self.escape_string(s).as_bytes())
    }

    /// Whether section anchors go after the section title instead of before it.
    fn anchors_follow_title(&self) -> bool {
        false
    }

    /// Output file name for a base name.
    fn output_name(&self, base: &str) -> String {
        let ext = self.default_extension();
        if base.ends_with(ext) {
            base.to_string()
        } else {
            format!("{base}{ext}")
        }
    }

    /// Write a line break inside running or preformatted text.
    fn line_break(&self, out: &mut dyn Write) -> io::Result<()> {
        out.write_all(b"\n")
    }

    /// Write the number of a preformatted line before its text.
    ///
    /// `max` is the highest number of the run being written; numbers are
    /// padded to its width.
    fn item_line_number(&self, out: &mut dyn Write, number: usize, max: usize) -> io::Result<()>;

    /// Write an anchor for a name; the name is passed through
    /// [`encode_label`](crate::render::encode_label).
    fn label(&self, out: &mut dyn Write, name: &str) -> io::Result<()>;

    /// Write the document prologue.
    fn doc_start(&self, out: &mut dyn Write, env: &Envelope<'_>) -> io::Result<()>;

    /// Write the document epilogue.
    fn doc_end(&self, out: &mut dyn Write, env: &Envelope<'_>) -> io::Result<()>;

    /// Write a table of contents over all headers, in document order.
    fn toc(&self, out: &mut dyn Write, env: &Envelope<'_>) -> io::Result<()>;

    /// Write an index over all headers.
    fn index(&self, out: &mut dyn Write, env: &Envelope<'_>) -> io::Result<()>;

    /// Start the documentation of a header (part mode).
    fn header_start(
        &self,
        out: &mut dyn Write,
        header: &Header,
        options: &RenderOptions,
    ) -> io::Result<()>;

    /// End the documentation of a header (part mode).
    fn header_end(&self, out: &mut dyn Write, header: &Header) -> io::Result<()>;

    /// Open a section (sections mode).
    fn section_start(&self, out: &mut dyn Write, section: &Section<'_>) -> io::Result<()>;

    /// Close a section.
    fn section_end(&self, out: &mut dyn Write, depth: usize, name: &str) -> io::Result<()>;

    /// Write the name of an item.
    fn item_name(&self, out: &mut dyn Write, name: &str) -> io::Result<()>;

    /// Open the body of an item.
    fn item_begin(&self, out: &mut dyn Write) -> io::Result<()>;

    /// Close the body of an item, and the item.
    fn item_end(&self, out: &mut dyn Write) -> io::Result<()>;

    /// Open a paragraph.
    fn paragraph_begin(&self, out: &mut dyn Write) -> io::Result<()>;

    /// Close a paragraph.
    fn paragraph_end(&self, out: &mut dyn Write) -> io::Result<()>;

    /// Open a preformatted block.
    fn preformatted_begin(&self, out: &mut dyn Write) -> io::Result<()>;

    /// Close a preformatted block.
    fn preformatted_end(&self, out: &mut dyn Write) -> io::Result<()>;

    /// Open a list.
    fn list_begin(&self, out: &mut dyn Write) -> io::Result<()>;

    /// Close a list.
    fn list_end(&self, out: &mut dyn Write) -> io::Result<()>;

    /// Open a list item.
    fn list_item_begin(&self, out: &mut dyn Write) -> io::Result<()>;

    /// Close a list item.
    fn list_item_end(&self, out: &mut dyn Write) -> io::Result<()>;

    /// Write a resolved cross reference.
    fn link(&self, out: &mut dyn Write, link: &Link) -> io::Result<()>;

    /// Write a reference without a resolvable target.
    fn false_link(&self, out: &mut dyn Write, text: &str) -> io::Result<()>;
}

/// Registry for backends.
///
/// Maps names, aliases and file extensions to backends. Lookups are
/// case-insensitive.
pub struct BackendRegistry {
    by_name: HashMap<String, Arc<dyn Backend>>,
    by_extension: HashMap<String, Arc<dyn Backend>>,
}

impl BackendRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            by_name: HashMap::new(),
            by_extension: HashMap::new(),
        }
    }

    /// Create a registry with the built-in backends.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(TestBackend::new()));
        registry.register(Arc::new(DocBookBackend::new()));
        registry.register(Arc::new(HtmlBackend::new()));
        registry.register(Arc::new(AsciiBackend::new()));
        registry
    }

    /// Register a backend under its name, aliases and extensions.
    ///
    /// A later registration replaces an earlier one for the same key.
    pub fn register(&mut self, backend: Arc<dyn Backend>) {
        for ext in backend.supported_extensions() {
            self.by_extension.insert(ext.to_lowercase(), backend.clone());
        }
        for alias in backend.aliases() {
            self.by_name.insert(alias.to_lowercase(), backend.clone());
        }
        self.by_name.insert(backend.name().to_lowercase(), backend);
    }

    /// Get a backend by name.
    pub fn get_by_name(&self, name: &str) -> Option<Arc<dyn Backend>> {
        self.by_name.get(&name.to_lowercase()).cloned()
    }

    /// Get a backend by target file extension (with or without the dot).
    pub fn get_by_extension(&self, ext: &str) -> Option<Arc<dyn Backend>> {
        let ext = ext.trim_start_matches('.');
        self.by_extension.get(&ext.to_lowercase()).cloned()
    }

    /// Select a backend by name, alias or extension.
    ///
    /// Names win over extensions.
    pub fn get(&self, selector: &str) -> Result<Arc<dyn Backend>> {
        let backend = self
            .get_by_name(selector)
            .or_else(|| self.get_by_extension(selector))
            .ok_or_else(|| Error::UnknownBackend(selector.to_string()))?;
        log::debug!("selected backend '{}' for '{}'", backend.name(), selector);
        Ok(backend)
    }

    /// Check if a selector resolves to a backend.
    pub fn supports(&self, selector: &str) -> bool {
        self.get_by_name(selector).is_some() || self.get_by_extension(selector).is_some()
    }

    /// List all backend names (sorted, aliases excluded).
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .by_name
            .values()
            .map(|b| b.name().to_string())
            .collect();
        names.sort();
        names.dedup();
        names
    }

    /// Get all supported extensions (sorted).
    pub fn supported_extensions(&self) -> Vec<&str> {
        let mut exts: Vec<&str> = self.by_extension.keys().map(|s| s.as_str()).collect();
        exts.sort_unstable();
        exts
    }
}

impl Default for BackendRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
