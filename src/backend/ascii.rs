//! Plain-text backend.
//!
//! No markup and no anchors: links collapse to their display text.

use super::{padded_line_number, section_number, Backend, Envelope, Section};
use crate::model::{Header, Link};
use crate::render::escape::Transcoder;
use crate::render::RenderOptions;
use std::io::{self, Write};

const RULE_WIDTH: usize = 72;

/// Backend for plain text.
#[derive(Debug, Clone, Default)]
pub struct AsciiBackend {
    transcoder: Transcoder,
}

impl AsciiBackend {
    /// Create a new plain-text backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a plain-text backend with a specific input transcoder.
    pub fn with_transcoder(transcoder: Transcoder) -> Self {
        Self { transcoder }
    }

    fn write_title(
        &self,
        out: &mut dyn Write,
        header: &Header,
        name: &str,
        name_only: bool,
    ) -> io::Result<()> {
        self.write_escaped(out, name)?;
        if !name_only {
            if let Some(kind) = &header.kind {
                out.write_all(b" [ ")?;
                self.write_escaped(out, kind)?;
                out.write_all(b" ]")?;
            }
        }
        out.write_all(b"\n\n")
    }
}

impl Backend for AsciiBackend {
    fn name(&self) -> &str {
        "ascii"
    }

    fn aliases(&self) -> &[&str] {
        &["text"]
    }

    fn supported_extensions(&self) -> &[&str] {
        &["txt"]
    }

    fn default_extension(&self) -> &str {
        ".txt"
    }

    fn default_charset(&self) -> &str {
        "UTF-8"
    }

    fn escape_char(&self, c: u8, out: &mut Vec<u8>) {
        self.transcoder.push(c, out);
    }

    fn item_line_number(&self, out: &mut dyn Write, number: usize, max: usize) -> io::Result<()> {
        self.write_escaped(out, &padded_line_number(number, max))
    }

    fn label(&self, _out: &mut dyn Write, _name: &str) -> io::Result<()> {
        Ok(())
    }

    fn doc_start(&self, out: &mut dyn Write, env: &Envelope<'_>) -> io::Result<()> {
        self.write_escaped(out, env.title)?;
        writeln!(out, "\n{}\n", "=".repeat(env.title.chars().count()))
    }

    fn doc_end(&self, _out: &mut dyn Write, _env: &Envelope<'_>) -> io::Result<()> {
        Ok(())
    }

    fn toc(&self, out: &mut dyn Write, env: &Envelope<'_>) -> io::Result<()> {
        out.write_all(b"TABLE OF CONTENTS\n")?;
        let mut counters: Vec<usize> = Vec::new();
        for header in &env.document.headers {
            let depth = if env.options.sections { header.depth } else { 0 };
            counters.truncate(depth + 1);
            counters.resize(depth + 1, 0);
            counters[depth] += 1;
            write!(out, "{}{} ", "  ".repeat(depth), section_number(&counters))?;
            self.write_escaped(out, &header.name)?;
            out.write_all(b"\n")?;
        }
        out.write_all(b"\x0c\n")
    }

    fn index(&self, _out: &mut dyn Write, _env: &Envelope<'_>) -> io::Result<()> {
        Ok(())
    }

    fn header_start(
        &self,
        out: &mut dyn Write,
        header: &Header,
        options: &RenderOptions,
    ) -> io::Result<()> {
        let name = header.display_name(options.section_name_only);
        self.write_title(out, header, name, options.section_name_only)
    }

    fn header_end(&self, out: &mut dyn Write, _header: &Header) -> io::Result<()> {
        writeln!(out, "{}\n", "-".repeat(RULE_WIDTH))
    }

    fn section_start(&self, out: &mut dyn Write, section: &Section<'_>) -> io::Result<()> {
        if !section.name_only {
            write!(out, "{} ", section_number(section.number))?;
        }
        self.write_title(out, section.header, section.name, section.name_only)
    }

    fn section_end(&self, _out: &mut dyn Write, _depth: usize, _name: &str) -> io::Result<()> {
        Ok(())
    }

    fn item_name(&self, out: &mut dyn Write, name: &str) -> io::Result<()> {
        self.write_escaped(out, name)?;
        out.write_all(b"\n")
    }

    fn item_begin(&self, _out: &mut dyn Write) -> io::Result<()> {
        Ok(())
    }

    fn item_end(&self, _out: &mut dyn Write) -> io::Result<()> {
        Ok(())
    }

    fn paragraph_begin(&self, _out: &mut dyn Write) -> io::Result<()> {
        Ok(())
    }

    fn paragraph_end(&self, out: &mut dyn Write) -> io::Result<()> {
        out.write_all(b"\n\n")
    }

    fn preformatted_begin(&self, _out: &mut dyn Write) -> io::Result<()> {
        Ok(())
    }

    fn preformatted_end(&self, out: &mut dyn Write) -> io::Result<()> {
        out.write_all(b"\n\n")
    }

    fn list_begin(&self, _out: &mut dyn Write) -> io::Result<()> {
        Ok(())
    }

    fn list_end(&self, out: &mut dyn Write) -> io::Result<()> {
        out.write_all(b"\n")
    }

    fn list_item_begin(&self, out: &mut dyn Write) -> io::Result<()> {
        out.write_all(b"  * ")
    }

    fn list_item_end(&self, out: &mut dyn Write) -> io::Result<()> {
        out.write_all(b"\n")
    }

    fn link(&self, out: &mut dyn Write, link: &Link) -> io::Result<()> {
        self.write_escaped(out, &link.text)
    }

    fn false_link(&self, out: &mut dyn Write, text: &str) -> io::Result<()> {
        self.write_escaped(out, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Document;

    fn written(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_no_escaping() {
        let backend = AsciiBackend::new();
        assert_eq!(backend.escape_string("<a & b>"), "<a & b>");
    }

    #[test]
    fn test_escape_total() {
        let backends = [
            AsciiBackend::new(),
            AsciiBackend::with_transcoder(Transcoder::Latin1ToUtf8),
        ];
        for backend in backends {
            for c in 0..=255u8 {
                let mut out = Vec::new();
                backend.escape_char(c, &mut out);
                assert!(!out.is_empty());
                if c.is_ascii() {
                    assert_eq!(out, vec![c]);
                }
            }
        }
    }

    #[test]
    fn test_item_line_number() {
        let backend = AsciiBackend::new();
        assert_eq!(written(|o| backend.item_line_number(o, 7, 12)), " 7 ");
    }

    #[test]
    fn test_label_is_silent() {
        let backend = AsciiBackend::new();
        assert_eq!(written(|o| backend.label(o, "anything")), "");
    }

    #[test]
    fn test_links_are_plain_text() {
        let backend = AsciiBackend::new();
        let link = Link::new("a.txt", "b.txt", "Foo/Bar", "Bar");
        assert_eq!(written(|o| backend.link(o, &link)), "Bar");
        assert_eq!(written(|o| backend.false_link(o, "Baz")), "Baz");
    }

    #[test]
    fn test_toc_numbering() {
        let backend = AsciiBackend::new();
        let mut doc = Document::new();
        doc.add_header(Header::new("a").with_depth(0));
        doc.add_header(Header::new("b").with_depth(1));
        doc.add_header(Header::new("c").with_depth(1));
        doc.add_header(Header::new("d").with_depth(0));
        let options = RenderOptions::default().with_sections(true);
        let env = Envelope {
            document: &doc,
            title: "T",
            charset: "UTF-8",
            options: &options,
        };
        let out = written(|o| backend.toc(o, &env));
        assert_eq!(
            out,
            "TABLE OF CONTENTS\n1. a\n  1.1. b\n  1.2. c\n2. d\n\x0c\n"
        );
    }

    #[test]
    fn test_section_start() {
        let backend = AsciiBackend::new();
        let header = Header::new("Foo/Bar").with_kind("Functions");
        let section = Section {
            depth: 0,
            number: &[3],
            name: "Foo/Bar",
            header: &header,
            name_only: false,
        };
        assert_eq!(
            written(|o| backend.section_start(o, &section)),
            "3. Foo/Bar [ Functions ]\n\n"
        );
    }
}
