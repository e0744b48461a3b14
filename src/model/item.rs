//! Item and content-block types.

use serde::{Deserialize, Serialize};

/// A named sub-block of a header (e.g. `SYNOPSIS`, `SOURCE`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Item {
    /// Item name as shown in the output
    pub name: String,

    /// Content blocks in order
    pub blocks: Vec<Block>,
}

impl Item {
    /// Create a new empty item.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            blocks: Vec::new(),
        }
    }

    /// Add a block to the item.
    pub fn with_block(mut self, block: Block) -> Self {
        self.blocks.push(block);
        self
    }

    /// Add a plain-text paragraph to the item.
    pub fn with_paragraph(self, text: impl Into<String>) -> Self {
        self.with_block(Block::paragraph(text))
    }

    /// Add a block to the item.
    pub fn add_block(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// Check if the item has no content.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// A content block inside an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content", rename_all = "snake_case")]
pub enum Block {
    /// Running text
    Paragraph(Vec<Inline>),

    /// Text whose line structure is kept (source code, examples)
    Preformatted(String),

    /// Bulleted list
    List(Vec<ListItem>),
}

impl Block {
    /// Create a paragraph with plain text.
    pub fn paragraph(text: impl Into<String>) -> Self {
        Block::Paragraph(vec![Inline::Text(text.into())])
    }

    /// Create a preformatted block.
    pub fn preformatted(text: impl Into<String>) -> Self {
        Block::Preformatted(text.into())
    }

    /// Create a list of plain-text items.
    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Block::List(
            items
                .into_iter()
                .map(|s| ListItem(vec![Inline::Text(s.into())]))
                .collect(),
        )
    }
}

/// One entry of a [`Block::List`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListItem(pub Vec<Inline>);

/// Inline content within a paragraph or list item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content", rename_all = "snake_case")]
pub enum Inline {
    /// Literal text; may contain newlines and tabs
    Text(String),

    /// A resolved cross reference
    Link(Link),

    /// A reference whose target could not be resolved
    FalseLink(String),
}

impl Inline {
    /// Get the text shown for this inline.
    pub fn plain_text(&self) -> &str {
        match self {
            Inline::Text(text) | Inline::FalseLink(text) => text,
            Inline::Link(link) => &link.text,
        }
    }
}

/// A cross reference to a label, possibly in another output file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Link {
    /// Output location of the document the link is written into
    pub doc_name: String,

    /// Output location of the document holding the target
    pub file_name: String,

    /// Label name of the target
    pub label: String,

    /// Literal display text
    pub text: String,
}

impl Link {
    /// Create a new link.
    pub fn new(
        doc_name: impl Into<String>,
        file_name: impl Into<String>,
        label: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            doc_name: doc_name.into(),
            file_name: file_name.into(),
            label: label.into(),
            text: text.into(),
        }
    }

    /// Check if the target lives in the same output file.
    pub fn is_local(&self) -> bool {
        self.file_name.is_empty() || self.file_name == self.doc_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_builder() {
        let item = Item::new("NAME")
            .with_paragraph("hello")
            .with_block(Block::preformatted("int x;"));
        assert_eq!(item.blocks.len(), 2);
        assert!(!item.is_empty());
    }

    #[test]
    fn test_link_is_local() {
        assert!(Link::new("a.xml", "a.xml", "x", "x").is_local());
        assert!(Link::new("a.xml", "", "x", "x").is_local());
        assert!(!Link::new("a.xml", "b.xml", "x", "x").is_local());
    }

    #[test]
    fn test_block_json_shape() {
        let json = serde_json::to_string(&Block::paragraph("hi")).unwrap();
        assert_eq!(
            json,
            r#"{"type":"paragraph","content":[{"type":"text","content":"hi"}]}"#
        );
    }
}
