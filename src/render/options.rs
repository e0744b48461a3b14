//! Rendering options and configuration.

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Title used when neither the document nor the options provide one.
pub const DEFAULT_TITLE: &str = "API Reference";

/// Options for rendering a document.
///
/// Passed explicitly to every render; backends never read global state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Suppress the document head (prologue)
    pub headless: bool,

    /// Suppress the document foot (epilogue)
    pub footless: bool,

    /// Override the backend's default charset
    pub charset: Option<String>,

    /// Default document title
    pub title: Option<String>,

    /// Emit a table of contents before the body
    pub toc: bool,

    /// Emit an index after the body
    pub index: bool,

    /// Render headers as nested sections by depth
    pub sections: bool,

    /// Use only the function name in section titles
    pub section_name_only: bool,

    /// Tab stop width used when expanding tabs in text
    pub tab_size: usize,

    /// Include a generation timestamp in footers that support it
    pub timestamp: bool,

    /// Number the lines of preformatted blocks
    pub line_numbers: bool,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load options from a JSON configuration; missing keys keep defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Suppress the document head.
    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Suppress the document foot.
    pub fn with_footless(mut self, footless: bool) -> Self {
        self.footless = footless;
        self
    }

    /// Set the charset override.
    pub fn with_charset(mut self, charset: impl Into<String>) -> Self {
        self.charset = Some(charset.into());
        self
    }

    /// Set the default document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Enable or disable the table of contents.
    pub fn with_toc(mut self, toc: bool) -> Self {
        self.toc = toc;
        self
    }

    /// Enable or disable the index.
    pub fn with_index(mut self, index: bool) -> Self {
        self.index = index;
        self
    }

    /// Enable or disable sections mode.
    pub fn with_sections(mut self, sections: bool) -> Self {
        self.sections = sections;
        self
    }

    /// Use only function names in section titles.
    pub fn with_section_name_only(mut self, name_only: bool) -> Self {
        self.section_name_only = name_only;
        self
    }

    /// Set the tab stop width (minimum 1).
    pub fn with_tab_size(mut self, tab_size: usize) -> Self {
        self.tab_size = tab_size.max(1);
        self
    }

    /// Enable or disable footer timestamps.
    pub fn with_timestamp(mut self, timestamp: bool) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Enable or disable line numbers in preformatted blocks.
    pub fn with_line_numbers(mut self, line_numbers: bool) -> Self {
        self.line_numbers = line_numbers;
        self
    }

    /// Resolve the title for a document.
    pub fn resolve_title<'a>(&'a self, doc_title: Option<&'a str>) -> &'a str {
        doc_title
            .or(self.title.as_deref())
            .unwrap_or(DEFAULT_TITLE)
    }

    /// Resolve the charset for a document.
    pub fn resolve_charset<'a>(
        &'a self,
        doc_charset: Option<&'a str>,
        backend_default: &'a str,
    ) -> &'a str {
        doc_charset
            .or(self.charset.as_deref())
            .unwrap_or(backend_default)
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            headless: false,
            footless: false,
            charset: None,
            title: None,
            toc: false,
            index: false,
            sections: false,
            section_name_only: false,
            tab_size: 8,
            timestamp: true,
            line_numbers: false,
        }
    }
}
