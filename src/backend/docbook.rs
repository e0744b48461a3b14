//! DocBook XML backend.
//!
//! Produces a well-formed DocBook `article`. Sections map to
//! `<section>`/`<title>`, item names to empty `<formalpara>` titles, lists
//! to `<itemizedlist>`, preformatted text to monospaced
//! `<literallayout>`.

use super::{padded_line_number, Backend, Envelope, Section};
use crate::model::{Header, Link};
use crate::render::escape::{push_xml_escaped, quote_literal};
use crate::render::{encode_label, RenderOptions};
use std::io::{self, Write};

/// Public identifier used when the document names no DOCTYPE.
pub const DEFAULT_DOCTYPE_NAME: &str = "-//OASIS//DTD DocBook XML V4.2//EN";

/// System identifier used when the document names no DOCTYPE.
pub const DEFAULT_DOCTYPE_LOCATION: &str = "http://www.oasis-open.org/docbook/xml/4.2/docbookx.dtd";

/// Backend for DocBook XML.
#[derive(Debug, Clone, Default)]
pub struct DocBookBackend {
    _private: (),
}

impl DocBookBackend {
    /// Create a new DocBook backend.
    pub fn new() -> Self {
        Self { _private: () }
    }

    fn write_title(&self, out: &mut dyn Write, name: &str) -> io::Result<()> {
        out.write_all(b"<section><title>")?;
        self.write_escaped(out, name)?;
        out.write_all(b"</title>\n")
    }
}

impl Backend for DocBookBackend {
    fn name(&self) -> &str {
        "docbook"
    }

    fn aliases(&self) -> &[&str] {
        &["xmldocbook", "db"]
    }

    fn supported_extensions(&self) -> &[&str] {
        &["xml", "docbook"]
    }

    fn default_extension(&self) -> &str {
        ".xml"
    }

    fn default_charset(&self) -> &str {
        "UTF-8"
    }

    fn escape_char(&self, c: u8, out: &mut Vec<u8>) {
        push_xml_escaped(c, out);
    }

    // DocBook rejects anchors placed before the <section> they belong to.
    fn anchors_follow_title(&self) -> bool {
        true
    }

    fn item_line_number(&self, out: &mut dyn Write, number: usize, max: usize) -> io::Result<()> {
        self.write_escaped(out, &padded_line_number(number, max))
    }

    fn label(&self, out: &mut dyn Write, name: &str) -> io::Result<()> {
        out.write_all(b"<anchor id=\"")?;
        self.write_escaped(out, &encode_label(name))?;
        out.write_all(b"\"/>\n")
    }

    fn doc_start(&self, out: &mut dyn Write, env: &Envelope<'_>) -> io::Result<()> {
        let doc = env.document;
        let charset = quote_literal(env.charset);
        writeln!(out, "<?xml version=\"1.0\" encoding={charset}?>")?;
        match (&doc.doctype_name, &doc.doctype_location) {
            (Some(name), Some(location)) => {
                let (name, location) = (quote_literal(name), quote_literal(location));
                writeln!(out, "<!DOCTYPE article PUBLIC {name}\n{location}>")?;
            }
            _ => {
                writeln!(
                    out,
                    "<!DOCTYPE article PUBLIC \"{DEFAULT_DOCTYPE_NAME}\"\n\"{DEFAULT_DOCTYPE_LOCATION}\">"
                )?;
            }
        }
        out.write_all(b"<article lang=\"en\">\n")?;
        out.write_all(b"<articleinfo>\n  <title>")?;
        self.write_escaped(out, env.title)?;
        out.write_all(b"</title>\n</articleinfo>\n")
    }

    fn doc_end(&self, out: &mut dyn Write, _env: &Envelope<'_>) -> io::Result<()> {
        out.write_all(b"</article>\n")
    }

    fn toc(&self, _out: &mut dyn Write, _env: &Envelope<'_>) -> io::Result<()> {
        // DocBook processors generate their own table of contents.
        Ok(())
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
        self.write_title(out, header.display_name(options.section_name_only))?;
        self.label(out, header.anchor())
    }

    fn header_end(&self, out: &mut dyn Write, _header: &Header) -> io::Result<()> {
        out.write_all(b"</section>\n")
    }

    fn section_start(&self, out: &mut dyn Write, section: &Section<'_>) -> io::Result<()> {
        self.write_title(out, section.name)
    }

    fn section_end(&self, out: &mut dyn Write, _depth: usize, _name: &str) -> io::Result<()> {
        out.write_all(b"</section>\n")
    }

    fn item_name(&self, out: &mut dyn Write, name: &str) -> io::Result<()> {
        out.write_all(b"<formalpara><title>")?;
        self.write_escaped(out, name)?;
        out.write_all(b"</title><para></para></formalpara>\n")
    }

    fn item_begin(&self, _out: &mut dyn Write) -> io::Result<()> {
        Ok(())
    }

    fn item_end(&self, _out: &mut dyn Write) -> io::Result<()> {
        Ok(())
    }

    fn paragraph_begin(&self, out: &mut dyn Write) -> io::Result<()> {
        out.write_all(b"<para>")
    }

    fn paragraph_end(&self, out: &mut dyn Write) -> io::Result<()> {
        out.write_all(b"</para>\n")
    }

    fn preformatted_begin(&self, out: &mut dyn Write) -> io::Result<()> {
        out.write_all(b"<literallayout class=\"monospaced\">")
    }

    fn preformatted_end(&self, out: &mut dyn Write) -> io::Result<()> {
        out.write_all(b"</literallayout>\n")
    }

    fn list_begin(&self, out: &mut dyn Write) -> io::Result<()> {
        out.write_all(b"<itemizedlist>")
    }

    fn list_end(&self, out: &mut dyn Write) -> io::Result<()> {
        out.write_all(b"</itemizedlist>\n")
    }

    fn list_item_begin(&self, out: &mut dyn Write) -> io::Result<()> {
        out.write_all(b"<listitem><para>")
    }

    fn list_item_end(&self, out: &mut dyn Write) -> io::Result<()> {
        out.write_all(b"</para></listitem>")
    }

    fn link(&self, out: &mut dyn Write, link: &Link) -> io::Result<()> {
        write!(out, "<link linkend=\"{}\">", encode_label(&link.label))?;
        self.write_escaped(out, &link.text)?;
        out.write_all(b"</link>")
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
    fn test_escape_string() {
        let backend = DocBookBackend::new();
        assert_eq!(backend.escape_string("<a & b>"), "&lt;a &amp; b&gt;");
        assert_eq!(backend.escape_string("café"), "café");
    }

    #[test]
    fn test_escape_total_except_structural_bytes() {
        let backend = DocBookBackend::new();
        for c in (0..=255u8).filter(|c| *c != b'\n' && *c != b'\t') {
            let mut first = Vec::new();
            let mut second = Vec::new();
            backend.escape_char(c, &mut first);
            backend.escape_char(c, &mut second);
            assert!(!first.is_empty());
            assert_eq!(first, second);
        }
    }

    #[test]
    #[should_panic(expected = "contract violation")]
    fn test_escape_tab_is_contract_violation() {
        DocBookBackend::new().escape_string("a\tb");
    }

    #[test]
    fn test_doc_start_default_doctype() {
        let backend = DocBookBackend::new();
        let doc = Document::new();
        let options = RenderOptions::default();
        let env = Envelope {
            document: &doc,
            title: "API Reference",
            charset: "UTF-8",
            options: &options,
        };
        let out = written(|o| backend.doc_start(o, &env));
        assert!(out.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n"));
        assert!(out.contains(DEFAULT_DOCTYPE_NAME));
        assert!(out.contains("<article lang=\"en\">"));
        assert!(out.contains("<articleinfo>\n  <title>API Reference</title>\n</articleinfo>"));
    }

    #[test]
    fn test_doc_start_custom_doctype() {
        let backend = DocBookBackend::new();
        let doc = Document::new().with_doctype("-//My//DTD//EN", "my.dtd");
        let options = RenderOptions::default();
        let env = Envelope {
            document: &doc,
            title: "T",
            charset: "ISO-8859-1",
            options: &options,
        };
        let out = written(|o| backend.doc_start(o, &env));
        assert!(out.contains("encoding=\"ISO-8859-1\""));
        assert!(out.contains("<!DOCTYPE article PUBLIC \"-//My//DTD//EN\"\n\"my.dtd\">"));
        assert!(!out.contains(DEFAULT_DOCTYPE_NAME));
    }

    #[test]
    fn test_doc_start_quoted_literals() {
        let backend = DocBookBackend::new();
        let doc = Document::new().with_doctype("a\"b", "c'd\"e");
        let options = RenderOptions::default();
        let env = Envelope {
            document: &doc,
            title: "T",
            charset: "UTF\"8",
            options: &options,
        };
        let out = written(|o| backend.doc_start(o, &env));
        assert!(out.starts_with("<?xml version=\"1.0\" encoding='UTF\"8'?>\n"));
        assert!(out.contains("<!DOCTYPE article PUBLIC 'a\"b'\n\"c'de\">"));
    }

    #[test]
    fn test_item_name_and_label() {
        let backend = DocBookBackend::new();
        let out = written(|o| backend.item_name(o, "NAME"));
        assert_eq!(out, "<formalpara><title>NAME</title><para></para></formalpara>\n");

        let out = written(|o| backend.label(o, "a b"));
        assert_eq!(out, "<anchor id=\"a20b\"/>\n");
    }

    #[test]
    fn test_link_escapes_text() {
        let backend = DocBookBackend::new();
        let link = Link::new("a.xml", "a.xml", "x<y", "x<y");
        let out = written(|o| backend.link(o, &link));
        assert_eq!(out, "<link linkend=\"x3cy\">x&lt;y</link>");
    }
}
