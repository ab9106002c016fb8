//! Separator escapes used by the catalog index for binary MARC 21 bodies.
//!
//! The index stores `fullrecord` as text, so the three MARC delimiters are
//! written as numeric escapes. Turning a stored body back into the binary
//! record means trimming surrounding whitespace and replacing exactly these
//! three escapes; nothing else in the body is touched.

/// MARC subfield delimiter (0x1F).
pub const SUBFIELD_DELIMITER: char = '\u{1f}';

/// MARC field terminator (0x1E).
pub const FIELD_TERMINATOR: char = '\u{1e}';

/// MARC record terminator (0x1D).
pub const RECORD_TERMINATOR: char = '\u{1d}';

/// Escape sequences and the delimiter each one stands for, in the order
/// they are applied.
pub const SEPARATOR_ESCAPES: [(&str, char); 3] = [
    ("#31;", SUBFIELD_DELIMITER),
    ("#30;", FIELD_TERMINATOR),
    ("#29;", RECORD_TERMINATOR),
];

/// Trims the stored body and replaces the separator escapes with their
/// control characters.
pub fn unescape_separators(raw: &str) -> String {
    let mut body = raw.trim().to_owned();
    for (escape, delimiter) in SEPARATOR_ESCAPES {
        if body.contains(escape) {
            body = body.replace(escape, delimiter.encode_utf8(&mut [0; 4]));
        }
    }
    body
}

/// Binary form of a stored body, ready to be appended to an output stream.
pub fn to_marc_bytes(raw: &str) -> Vec<u8> {
    unescape_separators(raw).into_bytes()
}
