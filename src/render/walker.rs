//! Walks a document model through a [`DocumentWriter`].

use super::{DocumentWriter, RenderOptions};
use crate::backend::Backend;
use crate::error::Result;
use crate::model::{Block, Document, Header, Inline, Item};
use std::io::Write;

/// Render a whole document to `out` and hand the stream back.
///
/// Headers are rendered flat (part mode) or, with
/// [`RenderOptions::sections`], as sections nested by their depth.
pub fn render_document<W: Write>(
    backend: &dyn Backend,
    doc: &Document,
    options: &RenderOptions,
    out: W,
) -> Result<W> {
    let mut writer = DocumentWriter::new(backend, options, out);

    writer.start(doc)?;
    if options.toc {
        writer.table_of_contents(doc)?;
    }

    if options.sections {
        render_sections(&mut writer, doc)?;
    } else {
        for header in &doc.headers {
            writer.header_start(header)?;
            render_items(&mut writer, header)?;
            writer.header_end(header)?;
        }
    }

    if options.index {
        writer.index(doc)?;
    }
    writer.end(doc)?;

    log::debug!(
        "rendered {} header(s) from '{}'",
        doc.header_count(),
        doc.source_name
    );
    Ok(writer.into_inner())
}

fn render_sections<W: Write>(writer: &mut DocumentWriter<'_, W>, doc: &Document) -> Result<()> {
    let mut open: Vec<&Header> = Vec::new();
    for header in &doc.headers {
        while let Some(top) = open.last() {
            if top.depth < header.depth {
                break;
            }
            writer.section_end(top.depth, top)?;
            open.pop();
        }
        writer.section_start(header.depth, header)?;
        render_items(writer, header)?;
        open.push(header);
    }
    while let Some(top) = open.pop() {
        writer.section_end(top.depth, top)?;
    }
    Ok(())
}

fn render_items<W: Write>(writer: &mut DocumentWriter<'_, W>, header: &Header) -> Result<()> {
    for item in &header.items {
        render_item(writer, item)?;
    }
    Ok(())
}

fn render_item<W: Write>(writer: &mut DocumentWriter<'_, W>, item: &Item) -> Result<()> {
    writer.item_name(&item.name)?;
    writer.item_begin()?;
    for block in &item.blocks {
        render_block(writer, block)?;
    }
    writer.item_end()
}

fn render_block<W: Write>(writer: &mut DocumentWriter<'_, W>, block: &Block) -> Result<()> {
    match block {
        Block::Paragraph(inlines) => {
            writer.paragraph_begin()?;
            render_inlines(writer, inlines)?;
            writer.paragraph_end()
        }
        Block::Preformatted(text) => {
            writer.preformatted_begin()?;
            writer.text(text)?;
            writer.preformatted_end()
        }
        Block::List(items) => {
            writer.list_begin()?;
            for item in items {
                writer.list_item_begin()?;
                render_inlines(writer, &item.0)?;
                writer.list_item_end()?;
            }
            writer.list_end()
        }
    }
}

fn render_inlines<W: Write>(writer: &mut DocumentWriter<'_, W>, inlines: &[Inline]) -> Result<()> {
    for inline in inlines {
        match inline {
            Inline::Text(text) => writer.text(text)?,
            Inline::Link(link) => writer.link(link)?,
            Inline::FalseLink(text) => writer.false_link(text)?,
        }
    }
    Ok(())
}
