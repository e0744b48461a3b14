//! Anchor (label) encoding.
//!
//! A label must be valid in every target's identifier grammar, so only
//! ASCII letters and digits are kept; every other byte is written as two
//! lowercase hex digits. `"Foo/Bar"` becomes `"Foo2fBar"`.
//!
//! The encoding is compatible with previously generated cross
//! references and therefore kept as is, even though it is not injective:
//! `"a b"` and `"a20b"` both encode to `"a20b"`. Label uniqueness is the
//! tree builder's job.

const HEX: &[u8; 16] = b"0123456789abcdef";

/// Encode a name as an anchor identifier.
pub fn encode_label(name: &str) -> String {
    let mut out = String::with_capacity(name.len() * 2);
    for &c in name.as_bytes() {
        if c.is_ascii_alphanumeric() {
            out.push(char::from(c));
        } else {
            out.push(char::from(HEX[usize::from(c >> 4)]));
            out.push(char::from(HEX[usize::from(c & 0x0F)]));
        }
    }
    out
}
