//! Test-output backend.
//!
//! Produces a small custom tag set that system test scripts can scan
//! line by line. The output is not well-formed XML: `&` and `<` in names
//! and text are written as is, only transcoded.

use super::{padded_line_number, Backend, Envelope, Section};
use crate::model::{Header, Link};
use crate::render::escape::Transcoder;
use crate::render::{encode_label, RenderOptions};
use std::io::{self, Write};

/// Backend for scanable test markup.
#[derive(Debug, Clone, Default)]
pub struct TestBackend {
    transcoder: Transcoder,
}

impl TestBackend {
    /// Create a test backend that copies UTF-8 input unchanged.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a test backend with a specific input transcoder.
    pub fn with_transcoder(transcoder: Transcoder) -> Self {
        Self { transcoder }
    }
}

impl Backend for TestBackend {
    fn name(&self) -> &str {
        "test"
    }

    fn supported_extensions(&self) -> &[&str] {
        &[]
    }

    fn default_extension(&self) -> &str {
        ".xml"
    }

    fn default_charset(&self) -> &str {
        "UTF-8"
    }

    fn escape_char(&self, c: u8, out: &mut Vec<u8>) {
        self.transcoder.push(c, out);
    }

    fn item_line_number(&self, out: &mut dyn Write, number: usize, max: usize) -> io::Result<()> {
        out.write_all(padded_line_number(number, max).as_bytes())
    }

    fn label(&self, out: &mut dyn Write, name: &str) -> io::Result<()> {
        out.write_all(b"<label>")?;
        self.write_escaped(out, &encode_label(name))?;
        out.write_all(b"</label>")
    }

    fn doc_start(&self, out: &mut dyn Write, env: &Envelope<'_>) -> io::Result<()> {
        out.write_all(b"<doc_start src_name=\"")?;
        self.write_escaped(out, &env.document.source_name)?;
        out.write_all(b"\" name=\"")?;
        self.write_escaped(out, env.title)?;
        out.write_all(b"\">\n")
    }

    fn doc_end(&self, out: &mut dyn Write, _env: &Envelope<'_>) -> io::Result<()> {
        out.write_all(b"</doc_start>\n")
    }

    fn toc(&self, _out: &mut dyn Write, _env: &Envelope<'_>) -> io::Result<()> {
        Ok(())
    }

    fn index(&self, _out: &mut dyn Write, _env: &Envelope<'_>) -> io::Result<()> {
        Ok(())
    }

    fn header_start(
        &self,
        out: &mut dyn Write,
        header: &Header,
        _options: &RenderOptions,
    ) -> io::Result<()> {
        out.write_all(b"<header name=\"")?;
        self.write_escaped(out, &header.name)?;
        out.write_all(b"\" header_module=\"")?;
        self.write_escaped(out, &header.module_name)?;
        out.write_all(b"\" header_function_name=\"")?;
        self.write_escaped(out, &header.function_name)?;
        out.write_all(b"\" >\n")
    }

    fn header_end(&self, out: &mut dyn Write, _header: &Header) -> io::Result<()> {
        out.write_all(b"</header>\n")
    }

    fn section_start(&self, out: &mut dyn Write, section: &Section<'_>) -> io::Result<()> {
        write!(out, "<section depth=\"{}\">", section.depth)?;
        self.write_escaped(out, section.name)?;
        out.write_all(b"\n")
    }

    fn section_end(&self, out: &mut dyn Write, _depth: usize, name: &str) -> io::Result<()> {
        out.write_all(b"</section>")?;
        self.write_escaped(out, name)?;
        out.write_all(b"\n")
    }

    fn item_name(&self, out: &mut dyn Write, name: &str) -> io::Result<()> {
        out.write_all(b"<item id=\"")?;
        self.write_escaped(out, name)?;
        out.write_all(b"\">\n")
    }

    fn item_begin(&self, out: &mut dyn Write) -> io::Result<()> {
        out.write_all(b"<item_body>\n")
    }

    fn item_end(&self, out: &mut dyn Write) -> io::Result<()> {
        out.write_all(b"</item_body>\n</item>\n")
    }

    fn paragraph_begin(&self, out: &mut dyn Write) -> io::Result<()> {
        out.write_all(b"<para>\n")
    }

    fn paragraph_end(&self, out: &mut dyn Write) -> io::Result<()> {
        out.write_all(b"\n</para>\n")
    }

    fn preformatted_begin(&self, out: &mut dyn Write) -> io::Result<()> {
        out.write_all(b"<pre>\n")
    }

    fn preformatted_end(&self, out: &mut dyn Write) -> io::Result<()> {
        out.write_all(b"\n</pre>\n")
    }

    fn list_begin(&self, out: &mut dyn Write) -> io::Result<()> {
        out.write_all(b"<list>\n")
    }

    fn list_end(&self, out: &mut dyn Write) -> io::Result<()> {
        out.write_all(b"</list>\n")
    }

    fn list_item_begin(&self, out: &mut dyn Write) -> io::Result<()> {
        out.write_all(b"<list_item>\n")
    }

    fn list_item_end(&self, out: &mut dyn Write) -> io::Result<()> {
        out.write_all(b"\n</list_item>\n")
    }

    fn link(&self, out: &mut dyn Write, link: &Link) -> io::Result<()> {
        write!(out, "<link labelname=\"{}\" linkname=\"", encode_label(&link.label))?;
        self.write_escaped(out, &link.text)?;
        out.write_all(b"\" />\n")
    }

    fn false_link(&self, out: &mut dyn Write, text: &str) -> io::Result<()> {
        out.write_all(b"<false_link>")?;
        self.write_escaped(out, text)?;
        out.write_all(b"</false_link>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn written(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_no_markup_escaping() {
        let backend = TestBackend::new();
        assert_eq!(backend.escape_string("<a & b>"), "<a & b>");
        assert_eq!(backend.escape_string("tab\there"), "tab\there");
    }

    #[test]
    fn test_escape_total() {
        let backend = TestBackend::with_transcoder(Transcoder::Latin1ToUtf8);
        for c in 0..=255u8 {
            let mut first = Vec::new();
            let mut second = Vec::new();
            backend.escape_char(c, &mut first);
            backend.escape_char(c, &mut second);
            assert!(!first.is_empty());
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_label() {
        let backend = TestBackend::new();
        let out = written(|o| backend.label(o, "Foo/Bar"));
        assert_eq!(out, "<label>Foo2fBar</label>");
    }

    #[test]
    fn test_section_tags() {
        let backend = TestBackend::new();
        let header = Header::new("Foo/Bar");
        let section = Section {
            depth: 2,
            number: &[1, 1],
            name: "Foo/Bar",
            header: &header,
            name_only: false,
        };
        let out = written(|o| {
            backend.section_start(o, &section)?;
            backend.section_end(o, 2, "Foo/Bar")
        });
        assert_eq!(out, "<section depth=\"2\">Foo/Bar\n</section>Foo/Bar\n");
    }

    #[test]
    fn test_link_and_false_link() {
        let backend = TestBackend::new();
        let link = Link::new("a.xml", "b.xml", "robo1", "Foo");
        let out = written(|o| backend.link(o, &link));
        assert_eq!(out, "<link labelname=\"robo1\" linkname=\"Foo\" />\n");

        let out = written(|o| backend.false_link(o, "Nowhere"));
        assert_eq!(out, "<false_link>Nowhere</false_link>");
    }
}
