//! Structural writer driving a backend.
//!
//! [`DocumentWriter`] owns the output stream and all per-document state:
//! where the envelope is, which blocks are open, and the section
//! counters. Every operation validates structure before it forwards to
//! the backend, so a backend only ever sees balanced, correctly nested
//! calls and text without raw line structure.

use super::escape::{expand_tabs, flatten_name};
use super::RenderOptions;
use crate::backend::{Backend, Envelope, Section};
use crate::error::{Error, Result};
use crate::model::{Document, Header, Link, MAX_SECTION_DEPTH};
use std::borrow::Cow;
use std::fmt;
use std::io::{self, Write};

/// Position of the writer in the document envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeState {
    /// Nothing written yet
    NotStarted,
    /// Prologue handled (written or suppressed)
    HeadEmitted,
    /// At least one body operation performed
    BodyEmitted,
    /// Epilogue handled; the document is complete
    FootEmitted,
}

impl EnvelopeState {
    fn as_str(self) -> &'static str {
        match self {
            EnvelopeState::NotStarted => "not started",
            EnvelopeState::HeadEmitted => "started",
            EnvelopeState::BodyEmitted => "in body",
            EnvelopeState::FootEmitted => "finished",
        }
    }

    fn accepts_body(self) -> bool {
        matches!(self, EnvelopeState::HeadEmitted | EnvelopeState::BodyEmitted)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OpenBlock {
    Header,
    Section(usize),
    Item,
    Paragraph,
    Preformatted,
    List,
    ListItem,
}

impl OpenBlock {
    /// Whether items can be written directly inside this block.
    fn holds_items(self) -> bool {
        matches!(self, OpenBlock::Header | OpenBlock::Section(_))
    }

    /// Whether text and links can be written directly inside this block.
    fn holds_text(self) -> bool {
        matches!(
            self,
            OpenBlock::Paragraph | OpenBlock::Preformatted | OpenBlock::ListItem
        )
    }
}

impl fmt::Display for OpenBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpenBlock::Header => write!(f, "header"),
            OpenBlock::Section(depth) => write!(f, "section (depth {depth})"),
            OpenBlock::Item => write!(f, "item"),
            OpenBlock::Paragraph => write!(f, "paragraph"),
            OpenBlock::Preformatted => write!(f, "preformatted"),
            OpenBlock::List => write!(f, "list"),
            OpenBlock::ListItem => write!(f, "list item"),
        }
    }
}

/// Writes one document through a backend.
///
/// # Example
///
/// ```
/// use robogen::backend::DocBookBackend;
/// use robogen::model::{Document, Header};
/// use robogen::render::{DocumentWriter, RenderOptions};
///
/// let backend = DocBookBackend::new();
/// let options = RenderOptions::default().with_headless(true).with_footless(true);
/// let doc = Document::new();
/// let header = Header::new("Foo/Bar");
///
/// let mut writer = DocumentWriter::new(&backend, &options, Vec::new());
/// writer.start(&doc).unwrap();
/// writer.header_start(&header).unwrap();
/// writer.item_name("NAME").unwrap();
/// writer.item_begin().unwrap();
/// writer.paragraph_begin().unwrap();
/// writer.text("a < b").unwrap();
/// writer.paragraph_end().unwrap();
/// writer.item_end().unwrap();
/// writer.header_end(&header).unwrap();
/// writer.end(&doc).unwrap();
///
/// let out = String::from_utf8(writer.into_inner()).unwrap();
/// assert!(out.contains("<para>a &lt; b</para>"));
/// ```
pub struct DocumentWriter<'a, W: Write> {
    backend: &'a dyn Backend,
    options: &'a RenderOptions,
    out: W,
    state: EnvelopeState,
    stack: Vec<OpenBlock>,
    counters: [usize; MAX_SECTION_DEPTH],
    /// Last line number written in the open preformatted block
    line_number: usize,
    line_start: bool,
}

impl<'a, W: Write> DocumentWriter<'a, W> {
    /// Create a writer over an open output stream.
    pub fn new(backend: &'a dyn Backend, options: &'a RenderOptions, out: W) -> Self {
        Self {
            backend,
            options,
            out,
            state: EnvelopeState::NotStarted,
            stack: Vec::new(),
            counters: [0; MAX_SECTION_DEPTH],
            line_number: 0,
            line_start: true,
        }
    }

    /// Get the current envelope state.
    pub fn state(&self) -> EnvelopeState {
        self.state
    }

    /// Get the number of currently open blocks.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Get the backend this writer drives.
    pub fn backend(&self) -> &'a dyn Backend {
        self.backend
    }

    /// Return the output stream.
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Run an envelope operation with document metadata flattened.
    fn emit_envelope(
        &mut self,
        doc: &Document,
        op: fn(&dyn Backend, &mut dyn Write, &Envelope<'_>) -> io::Result<()>,
    ) -> Result<()> {
        let doc = flattened_document(doc);
        let title = flatten_name(self.options.resolve_title(doc.title.as_deref()));
        let charset = flatten_name(
            self.options
                .resolve_charset(doc.charset.as_deref(), self.backend.default_charset()),
        );
        let env = Envelope {
            document: &doc,
            title: &title,
            charset: &charset,
            options: self.options,
        };
        op(self.backend, &mut self.out, &env)?;
        Ok(())
    }

    fn invalid_state(&self, operation: &'static str) -> Error {
        Error::InvalidState {
            operation,
            state: self.state.as_str(),
        }
    }

    fn enter_body(&mut self, operation: &'static str) -> Result<()> {
        if !self.state.accepts_body() {
            return Err(self.invalid_state(operation));
        }
        self.state = EnvelopeState::BodyEmitted;
        Ok(())
    }

    fn parent_name(&self) -> String {
        self.stack
            .last()
            .map(|b| b.to_string())
            .unwrap_or_else(|| "document body".to_string())
    }

    /// Push a block after checking it may appear inside the innermost one.
    fn open(
        &mut self,
        block: OpenBlock,
        allowed: impl Fn(Option<OpenBlock>) -> bool,
    ) -> Result<()> {
        self.enter_body("open a block")?;
        if !allowed(self.stack.last().copied()) {
            return Err(Error::Misplaced {
                block: block.to_string(),
                parent: self.parent_name(),
            });
        }
        self.stack.push(block);
        Ok(())
    }

    fn close(&mut self, block: OpenBlock) -> Result<()> {
        self.enter_body("close a block")?;
        match self.stack.last() {
            Some(top) if *top == block => {
                self.stack.pop();
                Ok(())
            }
            top => Err(Error::Unbalanced {
                expected: top
                    .map(|b| b.to_string())
                    .unwrap_or_else(|| "nothing".to_string()),
                found: block.to_string(),
            }),
        }
    }

    fn require_inside(&mut self, what: &str, allowed: impl Fn(OpenBlock) -> bool) -> Result<()> {
        self.enter_body("write content")?;
        match self.stack.last() {
            Some(top) if allowed(*top) => Ok(()),
            _ => Err(Error::Misplaced {
                block: what.to_string(),
                parent: self.parent_name(),
            }),
        }
    }

    // Envelope

    /// Start the document, writing the prologue unless headless.
    pub fn start(&mut self, doc: &Document) -> Result<()> {
        if self.state != EnvelopeState::NotStarted {
            return Err(self.invalid_state("start the document"));
        }
        log::debug!(
            "starting document '{}' with backend '{}'",
            self.options.resolve_title(doc.title.as_deref()),
            self.backend.name()
        );
        if !self.options.headless {
            self.emit_envelope(doc, |b, out, env| b.doc_start(out, env))?;
        }
        self.state = EnvelopeState::HeadEmitted;
        Ok(())
    }

    /// Write the table of contents. Only allowed before the body.
    pub fn table_of_contents(&mut self, doc: &Document) -> Result<()> {
        if self.state != EnvelopeState::HeadEmitted {
            return Err(self.invalid_state("write a table of contents"));
        }
        self.emit_envelope(doc, |b, out, env| b.toc(out, env))
    }

    /// Write the index. Only allowed after the body, before the foot.
    pub fn index(&mut self, doc: &Document) -> Result<()> {
        if !self.state.accepts_body() {
            return Err(self.invalid_state("write an index"));
        }
        if !self.stack.is_empty() {
            return Err(Error::Misplaced {
                block: "index".to_string(),
                parent: self.parent_name(),
            });
        }
        self.emit_envelope(doc, |b, out, env| b.index(out, env))?;
        self.state = EnvelopeState::BodyEmitted;
        Ok(())
    }

    /// End the document, writing the epilogue unless footless.
    ///
    /// All blocks must be closed. The stream is flushed.
    pub fn end(&mut self, doc: &Document) -> Result<()> {
        if !self.state.accepts_body() {
            return Err(self.invalid_state("end the document"));
        }
        if !self.stack.is_empty() {
            let open: Vec<String> = self.stack.iter().map(|b| b.to_string()).collect();
            log::warn!("abandoning document with {} open block(s)", open.len());
            return Err(Error::UnclosedBlocks(open));
        }
        if !self.options.footless {
            self.emit_envelope(doc, |b, out, env| b.doc_end(out, env))?;
        }
        self.out.flush()?;
        self.state = EnvelopeState::FootEmitted;
        log::debug!("finished document with backend '{}'", self.backend.name());
        Ok(())
    }

    // Headers and sections

    /// Start a header in part mode.
    pub fn header_start(&mut self, header: &Header) -> Result<()> {
        self.open(OpenBlock::Header, |parent| parent.is_none())?;
        let header = flattened_header(header);
        self.backend
            .header_start(&mut self.out, &header, self.options)?;
        Ok(())
    }

    /// End a header in part mode.
    pub fn header_end(&mut self, header: &Header) -> Result<()> {
        self.close(OpenBlock::Header)?;
        let header = flattened_header(header);
        self.backend.header_end(&mut self.out, &header)?;
        Ok(())
    }

    /// Open a section for a header at `depth`, with its anchors.
    ///
    /// The depth must be below [`MAX_SECTION_DEPTH`] and deeper than the
    /// enclosing section.
    pub fn section_start(&mut self, depth: usize, header: &Header) -> Result<()> {
        if depth >= MAX_SECTION_DEPTH {
            return Err(Error::SectionTooDeep {
                depth,
                max: MAX_SECTION_DEPTH,
            });
        }
        if let Some(OpenBlock::Section(parent)) = self.stack.last().copied() {
            if depth <= parent {
                return Err(Error::SectionNesting {
                    parent,
                    child: depth,
                });
            }
        }
        self.open(OpenBlock::Section(depth), |parent| {
            matches!(parent, None | Some(OpenBlock::Section(_)))
        })?;

        self.counters[depth] += 1;
        for counter in &mut self.counters[depth + 1..] {
            *counter = 0;
        }

        let header = flattened_header(header);
        let name = header.display_name(self.options.section_name_only);
        log::trace!("opening section '{}' at depth {}", name, depth);

        let follow = self.backend.anchors_follow_title();
        if !follow {
            self.section_labels(&header)?;
        }
        let section = Section {
            depth,
            number: &self.counters[..=depth],
            name,
            header: &header,
            name_only: self.options.section_name_only,
        };
        self.backend.section_start(&mut self.out, &section)?;
        if follow {
            self.section_labels(&header)?;
        }
        Ok(())
    }

    fn section_labels(&mut self, header: &Header) -> Result<()> {
        self.backend.label(&mut self.out, header.anchor())?;
        if header.anchor() != header.name {
            self.backend.label(&mut self.out, &header.name)?;
        }
        Ok(())
    }

    /// Close the innermost section, which must be at `depth`.
    pub fn section_end(&mut self, depth: usize, header: &Header) -> Result<()> {
        self.close(OpenBlock::Section(depth))?;
        let name = flatten_name(header.display_name(self.options.section_name_only));
        log::trace!("closing section '{}' at depth {}", name, depth);
        self.backend.section_end(&mut self.out, depth, &name)?;
        Ok(())
    }

    /// Write an anchor.
    pub fn label(&mut self, name: &str) -> Result<()> {
        self.enter_body("write a label")?;
        self.backend.label(&mut self.out, name)?;
        Ok(())
    }

    // Items

    /// Write the name of an item.
    pub fn item_name(&mut self, name: &str) -> Result<()> {
        self.enter_body("write an item name")?;
        if !self.stack.last().is_some_and(|b| b.holds_items()) {
            return Err(Error::Misplaced {
                block: "item name".to_string(),
                parent: self.parent_name(),
            });
        }
        self.backend.item_name(&mut self.out, &flatten_name(name))?;
        Ok(())
    }

    /// Open the body of an item.
    pub fn item_begin(&mut self) -> Result<()> {
        self.open(OpenBlock::Item, |parent| parent.is_some_and(|b| b.holds_items()))?;
        self.backend.item_begin(&mut self.out)?;
        Ok(())
    }

    /// Close the body of an item.
    pub fn item_end(&mut self) -> Result<()> {
        self.close(OpenBlock::Item)?;
        self.backend.item_end(&mut self.out)?;
        Ok(())
    }

    // Blocks

    /// Open a paragraph.
    pub fn paragraph_begin(&mut self) -> Result<()> {
        self.open(OpenBlock::Paragraph, |parent| parent == Some(OpenBlock::Item))?;
        self.backend.paragraph_begin(&mut self.out)?;
        Ok(())
    }

    /// Close a paragraph.
    pub fn paragraph_end(&mut self) -> Result<()> {
        self.close(OpenBlock::Paragraph)?;
        self.backend.paragraph_end(&mut self.out)?;
        Ok(())
    }

    /// Open a preformatted block.
    pub fn preformatted_begin(&mut self) -> Result<()> {
        self.open(OpenBlock::Preformatted, |parent| parent == Some(OpenBlock::Item))?;
        self.line_number = 0;
        self.line_start = true;
        self.backend.preformatted_begin(&mut self.out)?;
        Ok(())
    }

    /// Close a preformatted block.
    pub fn preformatted_end(&mut self) -> Result<()> {
        self.close(OpenBlock::Preformatted)?;
        self.backend.preformatted_end(&mut self.out)?;
        Ok(())
    }

    /// Open a list.
    pub fn list_begin(&mut self) -> Result<()> {
        self.open(OpenBlock::List, |parent| parent == Some(OpenBlock::Item))?;
        self.backend.list_begin(&mut self.out)?;
        Ok(())
    }

    /// Close a list.
    pub fn list_end(&mut self) -> Result<()> {
        self.close(OpenBlock::List)?;
        self.backend.list_end(&mut self.out)?;
        Ok(())
    }

    /// Open a list item.
    pub fn list_item_begin(&mut self) -> Result<()> {
        self.open(OpenBlock::ListItem, |parent| parent == Some(OpenBlock::List))?;
        self.backend.list_item_begin(&mut self.out)?;
        Ok(())
    }

    /// Close a list item.
    pub fn list_item_end(&mut self) -> Result<()> {
        self.close(OpenBlock::ListItem)?;
        self.backend.list_item_end(&mut self.out)?;
        Ok(())
    }

    // Inline content

    /// Write running text.
    ///
    /// Lines are joined with the backend's line break and tabs are
    /// expanded, so the escaper never sees `\n` or `\t`. Inside a
    /// preformatted block with [`RenderOptions::line_numbers`] set, every
    /// line starts with its number, padded to the width of the highest
    /// number in this run.
    pub fn text(&mut self, text: &str) -> Result<()> {
        self.require_inside("text", OpenBlock::holds_text)?;
        let numbered =
            self.options.line_numbers && self.stack.last() == Some(&OpenBlock::Preformatted);
        let lines: Vec<&str> = text.split('\n').collect();
        let last = lines.len() - 1;
        // A trailing newline opens a line that is only numbered once text arrives.
        let line_start = self.line_start;
        let fresh = lines
            .iter()
            .enumerate()
            .filter(|(i, line)| (*i > 0 || line_start) && (*i < last || !line.is_empty()))
            .count();
        let max = self.line_number + fresh;

        for (i, line) in lines.into_iter().enumerate() {
            if i > 0 {
                self.backend.line_break(&mut self.out)?;
                self.line_start = true;
            }
            if numbered && self.line_start && (i < last || !line.is_empty()) {
                self.line_number += 1;
                let number = self.line_number;
                self.backend.item_line_number(&mut self.out, number, max)?;
                self.line_start = false;
            }
            let line = line.strip_suffix('\r').unwrap_or(line);
            let line = expand_tabs(line, self.options.tab_size);
            self.backend.write_escaped(&mut self.out, &line)?;
            if !line.is_empty() {
                self.line_start = false;
            }
        }
        Ok(())
    }

    /// Write a resolved cross reference.
    pub fn link(&mut self, link: &Link) -> Result<()> {
        self.require_inside("link", OpenBlock::holds_text)?;
        let link = if [&link.doc_name, &link.file_name, &link.text]
            .iter()
            .any(|s| is_dirty(s))
        {
            Cow::Owned(Link {
                doc_name: flatten_name(&link.doc_name).into_owned(),
                file_name: flatten_name(&link.file_name).into_owned(),
                label: link.label.clone(),
                text: flatten_name(&link.text).into_owned(),
            })
        } else {
            Cow::Borrowed(link)
        };
        self.backend.link(&mut self.out, &link)?;
        Ok(())
    }

    /// Write a reference that could not be resolved.
    pub fn false_link(&mut self, text: &str) -> Result<()> {
        self.require_inside("false link", OpenBlock::holds_text)?;
        self.backend.false_link(&mut self.out, &flatten_name(text))?;
        Ok(())
    }
}

fn is_dirty(s: &str) -> bool {
    s.contains(['\n', '\r', '\t'])
}

fn opt_dirty(s: &Option<String>) -> bool {
    s.as_deref().is_some_and(is_dirty)
}

fn flatten_opt(s: &Option<String>) -> Option<String> {
    s.as_deref().map(|s| flatten_name(s).into_owned())
}

fn header_dirty(header: &Header) -> bool {
    is_dirty(&header.name)
        || is_dirty(&header.module_name)
        || is_dirty(&header.function_name)
        || opt_dirty(&header.kind)
        || opt_dirty(&header.file_name)
}

/// Header with control whitespace in its names replaced by spaces.
fn flattened_header(header: &Header) -> Cow<'_, Header> {
    if !header_dirty(header) {
        return Cow::Borrowed(header);
    }
    let mut flat = header.clone();
    flat.name = flatten_name(&header.name).into_owned();
    flat.module_name = flatten_name(&header.module_name).into_owned();
    flat.function_name = flatten_name(&header.function_name).into_owned();
    flat.kind = flatten_opt(&header.kind);
    flat.file_name = flatten_opt(&header.file_name);
    Cow::Owned(flat)
}

/// Document whose metadata and header names are safe to escape.
fn flattened_document(doc: &Document) -> Cow<'_, Document> {
    let dirty = opt_dirty(&doc.title)
        || opt_dirty(&doc.doctype_name)
        || opt_dirty(&doc.doctype_location)
        || opt_dirty(&doc.charset)
        || is_dirty(&doc.source_name)
        || is_dirty(&doc.file_name)
        || doc.headers.iter().any(header_dirty);
    if !dirty {
        return Cow::Borrowed(doc);
    }
    let mut flat = doc.clone();
    flat.title = flatten_opt(&doc.title);
    flat.doctype_name = flatten_opt(&doc.doctype_name);
    flat.doctype_location = flatten_opt(&doc.doctype_location);
    flat.charset = flatten_opt(&doc.charset);
    flat.source_name = flatten_name(&doc.source_name).into_owned();
    flat.file_name = flatten_name(&doc.file_name).into_owned();
    for header in &mut flat.headers {
        if let Cow::Owned(h) = flattened_header(header) {
            *header = h;
        }
    }
    Cow::Owned(flat)
}
