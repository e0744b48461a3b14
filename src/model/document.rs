//! Document-level types.

use super::Item;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Maximum nesting depth of sections (exclusive upper bound).
pub const MAX_SECTION_DEPTH: usize = 7;

/// One rendering unit, usually the documentation of one source file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Document {
    /// Document title (falls back to the configured default title)
    pub title: Option<String>,

    /// Public identifier of the DOCTYPE
    pub doctype_name: Option<String>,

    /// System identifier (location) of the DOCTYPE
    pub doctype_location: Option<String>,

    /// Declared charset (falls back to the configured default charset)
    pub charset: Option<String>,

    /// Source file or directory the documentation was extracted from
    pub source_name: String,

    /// Output location of this document, relative to the output root
    pub file_name: String,

    /// Headers in document order
    pub headers: Vec<Header>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the DOCTYPE public identifier and location.
    pub fn with_doctype(mut self, name: impl Into<String>, location: impl Into<String>) -> Self {
        self.doctype_name = Some(name.into());
        self.doctype_location = Some(location.into());
        self
    }

    /// Set the declared charset.
    pub fn with_charset(mut self, charset: impl Into<String>) -> Self {
        self.charset = Some(charset.into());
        self
    }

    /// Set the source name.
    pub fn with_source_name(mut self, name: impl Into<String>) -> Self {
        self.source_name = name.into();
        self
    }

    /// Set the output location of this document.
    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = name.into();
        self
    }

    /// Add a header to the document.
    pub fn add_header(&mut self, header: Header) {
        self.headers.push(header);
    }

    /// Get the number of headers in the document.
    pub fn header_count(&self) -> usize {
        self.headers.len()
    }

    /// Check if the document has any headers.
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// Parse a document tree from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// A documented entity (module, function, variable, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Header {
    /// Display name, usually `module/function`
    pub name: String,

    /// Name of the owning module
    pub module_name: String,

    /// Name of the documented function or symbol
    pub function_name: String,

    /// Nesting depth; children are strictly deeper than their parent
    pub depth: usize,

    /// Disambiguated anchor name assigned by the tree builder
    pub unique_name: Option<String>,

    /// Header type index name (e.g. "Functions")
    pub kind: Option<String>,

    /// Output location of the document holding this header
    pub file_name: Option<String>,

    /// Items in source order
    pub items: Vec<Item>,
}

impl Header {
    /// Create a header from a `module/function` style name.
    ///
    /// The module and function names are split at the last `/`; a name
    /// without a slash is used as the function name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let (module_name, function_name) = match name.rsplit_once('/') {
            Some((module, function)) => (module.to_string(), function.to_string()),
            None => (String::new(), name.clone()),
        };
        Self {
            name,
            module_name,
            function_name,
            ..Default::default()
        }
    }

    /// Set the nesting depth.
    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    /// Set the unique anchor name.
    pub fn with_unique_name(mut self, unique_name: impl Into<String>) -> Self {
        self.unique_name = Some(unique_name.into());
        self
    }

    /// Set the header type index name.
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Set the output location of the document holding this header.
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    /// Add an item to the header.
    pub fn with_item(mut self, item: Item) -> Self {
        self.items.push(item);
        self
    }

    /// Add an item to the header.
    pub fn add_item(&mut self, item: Item) {
        self.items.push(item);
    }

    /// The name used as this header's primary anchor.
    pub fn anchor(&self) -> &str {
        self.unique_name.as_deref().unwrap_or(&self.name)
    }

    /// Name to show in a section title.
    pub fn display_name(&self, name_only: bool) -> &str {
        if name_only && !self.function_name.is_empty() {
            &self.function_name
        } else {
            &self.name
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_splits_name() {
        let header = Header::new("Foo/Bar");
        assert_eq!(header.module_name, "Foo");
        assert_eq!(header.function_name, "Bar");

        let header = Header::new("Lonely");
        assert_eq!(header.module_name, "");
        assert_eq!(header.function_name, "Lonely");
    }

    #[test]
    fn test_header_anchor() {
        let header = Header::new("Foo/Bar");
        assert_eq!(header.anchor(), "Foo/Bar");

        let header = header.with_unique_name("robo12");
        assert_eq!(header.anchor(), "robo12");
    }

    #[test]
    fn test_display_name() {
        let header = Header::new("Foo/Bar");
        assert_eq!(header.display_name(false), "Foo/Bar");
        assert_eq!(header.display_name(true), "Bar");
    }

    #[test]
    fn test_document_from_json_partial() {
        let doc = Document::from_json(
            r#"{"title": "API", "headers": [{"name": "Foo/Bar", "depth": 1}]}"#,
        )
        .unwrap();
        assert_eq!(doc.title.as_deref(), Some("API"));
        assert_eq!(doc.header_count(), 1);
        assert_eq!(doc.headers[0].depth, 1);
        assert!(doc.headers[0].items.is_empty());
    }
}
