//! Byte-level escaping shared by the backends.
//!
//! Escaping is defined per input byte. The markup backends replace the
//! few characters their format reserves; the plain backends only
//! transcode. Structural bytes (newline, tab) never reach a markup
//! escaper: the writer turns them into line breaks and spaces first,
//! see [`expand_tabs`] and [`flatten_name`].

/// Generic byte-to-output transcoder used by backends without reserved
/// characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Transcoder {
    /// Bytes are already UTF-8 and are copied unchanged
    #[default]
    Utf8,
    /// Bytes are Latin-1 and are re-encoded as UTF-8
    Latin1ToUtf8,
}

impl Transcoder {
    /// Append the transcoded form of one byte.
    pub fn push(self, c: u8, out: &mut Vec<u8>) {
        match self {
            Transcoder::Utf8 => out.push(c),
            Transcoder::Latin1ToUtf8 => {
                if c < 0x80 {
                    out.push(c);
                } else {
                    out.push(0xC0 | (c >> 6));
                    out.push(0x80 | (c & 0x3F));
                }
            }
        }
    }
}

/// Append the XML-escaped form of one byte.
///
/// # Panics
///
/// Panics on `\n` and `\t`. Callers split text into lines and expand tabs
/// before escaping, so reaching this is an internal contract violation.
pub fn push_xml_escaped(c: u8, out: &mut Vec<u8>) {
    match c {
        b'\n' | b'\t' => panic!(
            "contract violation: structural byte {:#04x} reached the markup escaper",
            c
        ),
        b'<' => out.extend_from_slice(b"&lt;"),
        b'>' => out.extend_from_slice(b"&gt;"),
        b'&' => out.extend_from_slice(b"&amp;"),
        _ => out.push(c),
    }
}

/// Escape a value for a double-quoted attribute or identifier.
///
/// Like [`push_xml_escaped`] with `"` written as `&quot;`.
///
/// # Panics
///
/// Panics on `\n` and `\t`, see [`push_xml_escaped`].
pub fn escape_attribute(value: &str) -> String {
    let mut out = Vec::with_capacity(value.len());
    for &c in value.as_bytes() {
        match c {
            b'"' => out.extend_from_slice(b"&quot;"),
            _ => push_xml_escaped(c, &mut out),
        }
    }
    into_string(out)
}

/// Quote a literal of an XML declaration or DOCTYPE.
///
/// Those literals take no character references, so a value holding `"`
/// is quoted with `'` instead. A value holding both loses its `"`.
pub fn quote_literal(value: &str) -> String {
    match (value.contains('"'), value.contains('\'')) {
        (false, _) => format!("\"{value}\""),
        (true, false) => format!("'{value}'"),
        (true, true) => format!("\"{}\"", value.replace('"', "")),
    }
}

/// Build a string from escaped bytes.
///
/// Escapers only rewrite ASCII bytes, so escaping valid UTF-8 yields valid
/// UTF-8; anything else is replaced rather than trusted.
pub(crate) fn into_string(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes).unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}

/// Expand tabs to spaces using the given tab stop width.
pub fn expand_tabs(line: &str, tab_size: usize) -> String {
    if !line.contains('\t') {
        return line.to_string();
    }
    let tab_size = tab_size.max(1);
    let mut out = String::with_capacity(line.len() + tab_size);
    let mut column = 0;
    for c in line.chars() {
        if c == '\t' {
            let pad = tab_size - (column % tab_size);
            out.extend(std::iter::repeat(' ').take(pad));
            column += pad;
        } else {
            out.push(c);
            column += 1;
        }
    }
    out
}

/// Replace line structure in a name with single spaces.
///
/// Names (headers, items, link text) are written on one line.
pub fn flatten_name(name: &str) -> std::borrow::Cow<'_, str> {
    if name.contains(['\n', '\r', '\t']) {
        let flat: Vec<&str> = name.split(['\n', '\r', '\t']).filter(|s| !s.is_empty()).collect();
        std::borrow::Cow::Owned(flat.join(" "))
    } else {
        std::borrow::Cow::Borrowed(name)
    }
}
