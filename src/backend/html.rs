//! XHTML backend.

use super::{padded_line_number, section_number, Backend, Envelope, Section};
use crate::model::{Document, Header, Link};
use crate::render::escape::{escape_attribute, push_xml_escaped, quote_literal};
use crate::render::{encode_label, relative_path, RenderOptions};
use std::io::{self, Write};

/// Backend for XHTML 1.0 pages.
#[derive(Debug, Clone, Default)]
pub struct HtmlBackend {
    _private: (),
}

impl HtmlBackend {
    /// Create a new HTML backend.
    pub fn new() -> Self {
        Self { _private: () }
    }

    fn write_href(&self, out: &mut dyn Write, from: &str, to: &str, label: &str) -> io::Result<()> {
        if !to.is_empty() && to != from {
            self.write_escaped(out, &relative_path(from, to))?;
        }
        write!(out, "#{}", encode_label(label))
    }

    fn write_kind(&self, out: &mut dyn Write, header: &Header) -> io::Result<()> {
        if let Some(kind) = &header.kind {
            out.write_all(b" [ ")?;
            self.write_escaped(out, kind)?;
            out.write_all(b" ]")?;
        }
        Ok(())
    }

    /// Write one `<li>` entry pointing at a header.
    fn write_entry(&self, out: &mut dyn Write, doc: &Document, header: &Header) -> io::Result<()> {
        out.write_all(b"<li><a href=\"")?;
        let target = header.file_name.as_deref().unwrap_or(&doc.file_name);
        self.write_href(out, &doc.file_name, target, header.anchor())?;
        out.write_all(b"\">")?;
        self.write_escaped(out, &header.name)?;
        out.write_all(b"</a>")
    }
}

impl Backend for HtmlBackend {
    fn name(&self) -> &str {
        "html"
    }

    fn supported_extensions(&self) -> &[&str] {
        &["html", "htm"]
    }

    fn default_extension(&self) -> &str {
        ".html"
    }

    fn default_charset(&self) -> &str {
        "UTF-8"
    }

    fn escape_char(&self, c: u8, out: &mut Vec<u8>) {
        push_xml_escaped(c, out);
    }

    fn item_line_number(&self, out: &mut dyn Write, number: usize, max: usize) -> io::Result<()> {
        out.write_all(b"<span class=\"line_number\">")?;
        self.write_escaped(out, &padded_line_number(number, max))?;
        out.write_all(b"</span>")
    }

    fn label(&self, out: &mut dyn Write, name: &str) -> io::Result<()> {
        writeln!(out, "<a name=\"{}\"></a>", encode_label(name))
    }

    fn doc_start(&self, out: &mut dyn Write, env: &Envelope<'_>) -> io::Result<()> {
        writeln!(
            out,
            "<?xml version=\"1.0\" encoding={}?>",
            quote_literal(env.charset)
        )?;
        out.write_all(
            b"<!DOCTYPE html PUBLIC \"-//W3C//DTD XHTML 1.0 Strict//EN\"\n\
              \"http://www.w3.org/TR/xhtml1/DTD/xhtml1-strict.dtd\">\n",
        )?;
        out.write_all(b"<html xmlns=\"http://www.w3.org/1999/xhtml\" xml:lang=\"en\" lang=\"en\">\n")?;
        out.write_all(b"<head>\n")?;
        writeln!(
            out,
            "<meta http-equiv=\"Content-Type\" content=\"text/html; charset={}\" />",
            escape_attribute(env.charset)
        )?;
        out.write_all(b"<title>")?;
        self.write_escaped(out, env.title)?;
        out.write_all(b"</title>\n")?;
        if !env.document.source_name.is_empty() {
            out.write_all(b"<!-- Source: ")?;
            self.write_escaped(out, &env.document.source_name)?;
            out.write_all(b" -->\n")?;
        }
        out.write_all(b"</head>\n<body>\n")
    }

    fn doc_end(&self, out: &mut dyn Write, env: &Envelope<'_>) -> io::Result<()> {
        out.write_all(b"<div id=\"footer\">\n<p>Generated from ")?;
        self.write_escaped(out, &env.document.source_name)?;
        if env.options.timestamp {
            write!(
                out,
                " on {}",
                chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
            )?;
        }
        out.write_all(b"</p>\n</div>\n</body>\n</html>\n")
    }

    fn toc(&self, out: &mut dyn Write, env: &Envelope<'_>) -> io::Result<()> {
        let doc = env.document;
        out.write_all(b"<h3>TABLE OF CONTENTS</h3>\n")?;

        // One entry per open <ul>: whether its last <li> is still open.
        let mut levels: Vec<bool> = Vec::new();
        for header in &doc.headers {
            let target = if env.options.sections {
                header.depth + 1
            } else {
                1
            };
            while levels.len() > target {
                if levels.pop() == Some(true) {
                    out.write_all(b"</li>\n")?;
                }
                out.write_all(b"</ul>\n")?;
            }
            if levels.len() == target {
                if let Some(open) = levels.last_mut() {
                    if *open {
                        out.write_all(b"</li>\n")?;
                        *open = false;
                    }
                }
            }
            while levels.len() < target {
                out.write_all(b"<ul>\n")?;
                levels.push(false);
            }
            self.write_entry(out, doc, header)?;
            if let Some(open) = levels.last_mut() {
                *open = true;
            }
        }
        while let Some(open) = levels.pop() {
            if open {
                out.write_all(b"</li>\n")?;
            }
            out.write_all(b"</ul>\n")?;
        }
        Ok(())
    }

    fn index(&self, out: &mut dyn Write, env: &Envelope<'_>) -> io::Result<()> {
        let doc = env.document;
        let mut headers: Vec<&Header> = doc.headers.iter().collect();
        headers.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.name.cmp(&b.name))
        });

        out.write_all(b"<h3>INDEX</h3>\n<ul>\n")?;
        for header in headers {
            self.write_entry(out, doc, header)?;
            out.write_all(b"</li>\n")?;
        }
        out.write_all(b"</ul>\n")
    }

    fn header_start(
        &self,
        out: &mut dyn Write,
        header: &Header,
        options: &RenderOptions,
    ) -> io::Result<()> {
        out.write_all(b"<hr />\n")?;
        self.label(out, header.anchor())?;
        out.write_all(b"<h2>")?;
        self.write_escaped(out, header.display_name(options.section_name_only))?;
        if !options.section_name_only {
            self.write_kind(out, header)?;
        }
        out.write_all(b"</h2>\n\n")
    }

    fn header_end(&self, _out: &mut dyn Write, _header: &Header) -> io::Result<()> {
        Ok(())
    }

    fn section_start(&self, out: &mut dyn Write, section: &Section<'_>) -> io::Result<()> {
        let level = (section.depth + 1).min(6);
        write!(out, "<h{level}>")?;
        if !section.name_only {
            write!(out, "{} ", section_number(section.number))?;
        }
        self.write_escaped(out, section.name)?;
        if !section.name_only {
            self.write_kind(out, section.header)?;
        }
        writeln!(out, "</h{level}>")
    }

    fn section_end(&self, _out: &mut dyn Write, _depth: usize, _name: &str) -> io::Result<()> {
        Ok(())
    }

    fn item_name(&self, out: &mut dyn Write, name: &str) -> io::Result<()> {
        out.write_all(b"<p class=\"item_name\">")?;
        self.write_escaped(out, name)?;
        out.write_all(b"</p>\n")
    }

    fn item_begin(&self, _out: &mut dyn Write) -> io::Result<()> {
        Ok(())
    }

    fn item_end(&self, _out: &mut dyn Write) -> io::Result<()> {
        Ok(())
    }

    fn paragraph_begin(&self, out: &mut dyn Write) -> io::Result<()> {
        out.write_all(b"<p>")
    }

    fn paragraph_end(&self, out: &mut dyn Write) -> io::Result<()> {
        out.write_all(b"</p>\n")
    }

    fn preformatted_begin(&self, out: &mut dyn Write) -> io::Result<()> {
        out.write_all(b"<pre>")
    }

    fn preformatted_end(&self, out: &mut dyn Write) -> io::Result<()> {
        out.write_all(b"</pre>\n")
    }

    fn list_begin(&self, out: &mut dyn Write) -> io::Result<()> {
        out.write_all(b"<ul>\n")
    }

    fn list_end(&self, out: &mut dyn Write) -> io::Result<()> {
        out.write_all(b"</ul>\n")
    }

    fn list_item_begin(&self, out: &mut dyn Write) -> io::Result<()> {
        out.write_all(b"<li>")
    }

    fn list_item_end(&self, out: &mut dyn Write) -> io::Result<()> {
        out.write_all(b"</li>\n")
    }

    fn link(&self, out: &mut dyn Write, link: &Link) -> io::Result<()> {
        out.write_all(b"<a href=\"")?;
        self.write_href(out, &link.doc_name, &link.file_name, &link.label)?;
        out.write_all(b"\">")?;
        self.write_escaped(out, &link.text)?;
        out.write_all(b"</a>")
    }

    fn false_link(&self, out: &mut dyn Write, text: &str) -> io::Result<()> {
        out.write_all(b"<strong>")?;
        self.write_escaped(out, text)?;
        out.write_all(b"</strong>")
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

    fn envelope_doc() -> Document {
        let mut doc = Document::new()
            .with_source_name("lib/foo.c")
            .with_file_name("lib/foo.html");
        doc.add_header(Header::new("foo/zeta").with_depth(0));
        doc.add_header(Header::new("foo/Alpha").with_depth(1));
        doc.add_header(
            Header::new("bar/beta")
                .with_depth(1)
                .with_file_name("lib/sub/bar.html"),
        );
        doc
    }

    #[test]
    fn test_escape_string() {
        let backend = HtmlBackend::new();
        assert_eq!(backend.escape_string("<a & b>"), "&lt;a &amp; b&gt;");
    }

    #[test]
    fn test_escape_total_except_structural_bytes() {
        let backend = HtmlBackend::new();
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
    fn test_item_line_number() {
        let backend = HtmlBackend::new();
        let out = written(|o| backend.item_line_number(o, 3, 100));
        assert_eq!(out, "<span class=\"line_number\">  3 </span>");
    }

    #[test]
    fn test_link_same_file_is_fragment() {
        let backend = HtmlBackend::new();
        let link = Link::new("lib/a.html", "lib/a.html", "Foo/Bar", "Bar");
        let out = written(|o| backend.link(o, &link));
        assert_eq!(out, "<a href=\"#Foo2fBar\">Bar</a>");
    }

    #[test]
    fn test_link_other_file_is_relative() {
        let backend = HtmlBackend::new();
        let link = Link::new("sub1/sub2/sub3/f.html", "sub1/sub2/g.html", "g", "g");
        let out = written(|o| backend.link(o, &link));
        assert_eq!(out, "<a href=\"../g.html#g\">g</a>");
    }

    #[test]
    fn test_section_start_numbering() {
        let backend = HtmlBackend::new();
        let header = Header::new("Foo/Bar").with_kind("Functions");
        let mut section = Section {
            depth: 1,
            number: &[1, 2],
            name: "Foo/Bar",
            header: &header,
            name_only: false,
        };
        let out = written(|o| backend.section_start(o, &section));
        assert_eq!(out, "<h2>1.2. Foo/Bar [ Functions ]</h2>\n");

        section.name = "Bar";
        section.name_only = true;
        let out = written(|o| backend.section_start(o, &section));
        assert_eq!(out, "<h2>Bar</h2>\n");
    }

    #[test]
    fn test_section_heading_level_is_capped() {
        let backend = HtmlBackend::new();
        let header = Header::new("deep");
        let section = Section {
            depth: 6,
            number: &[1, 1, 1, 1, 1, 1, 1],
            name: "deep",
            header: &header,
            name_only: true,
        };
        let out = written(|o| backend.section_start(o, &section));
        assert_eq!(out, "<h6>deep</h6>\n");
    }

    #[test]
    fn test_toc_flat() {
        let backend = HtmlBackend::new();
        let doc = envelope_doc();
        let options = RenderOptions::default();
        let env = Envelope {
            document: &doc,
            title: "T",
            charset: "UTF-8",
            options: &options,
        };
        let out = written(|o| backend.toc(o, &env));
        assert_eq!(
            out,
            "<h3>TABLE OF CONTENTS</h3>\n<ul>\n\
             <li><a href=\"#foo2fzeta\">foo/zeta</a></li>\n\
             <li><a href=\"#foo2fAlpha\">foo/Alpha</a></li>\n\
             <li><a href=\"./sub/bar.html#bar2fbeta\">bar/beta</a></li>\n\
             </ul>\n"
        );
    }

    #[test]
    fn test_toc_nested() {
        let backend = HtmlBackend::new();
        let doc = envelope_doc();
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
            "<h3>TABLE OF CONTENTS</h3>\n<ul>\n\
             <li><a href=\"#foo2fzeta\">foo/zeta</a><ul>\n\
             <li><a href=\"#foo2fAlpha\">foo/Alpha</a></li>\n\
             <li><a href=\"./sub/bar.html#bar2fbeta\">bar/beta</a></li>\n\
             </ul>\n</li>\n</ul>\n"
        );
    }

    #[test]
    fn test_index_sorted_case_insensitive() {
        let backend = HtmlBackend::new();
        let doc = envelope_doc();
        let options = RenderOptions::default();
        let env = Envelope {
            document: &doc,
            title: "T",
            charset: "UTF-8",
            options: &options,
        };
        let out = written(|o| backend.index(o, &env));
        let alpha = out.find("foo/Alpha").unwrap();
        let beta = out.find("bar/beta").unwrap();
        let zeta = out.find("foo/zeta").unwrap();
        assert!(out.starts_with("<h3>INDEX</h3>\n<ul>\n"));
        assert!(beta < alpha && alpha < zeta);
    }

    #[test]
    fn test_doc_end_without_timestamp() {
        let backend = HtmlBackend::new();
        let doc = envelope_doc();
        let options = RenderOptions::default().with_timestamp(false);
        let env = Envelope {
            document: &doc,
            title: "T",
            charset: "UTF-8",
            options: &options,
        };
        let out = written(|o| backend.doc_end(o, &env));
        assert_eq!(
            out,
            "<div id=\"footer\">\n<p>Generated from lib/foo.c</p>\n</div>\n</body>\n</html>\n"
        );
    }
}
