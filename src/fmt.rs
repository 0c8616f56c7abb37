//! Formatting utilities for WBXML byte strings.
//!
//! Encoded documents are mostly binary with runs of readable text, so two views are
//! offered: a byte-string notation that keeps printable ASCII readable, and plain hex.

/// Formats bytes in byte-string notation.
///
/// Printable ASCII is written as is, backslash is doubled, tab, newline and carriage
/// return use their short escapes and every other byte becomes `\xNN`.
///
/// # Examples
/// ```rust
/// use wbxml::fmt::format_escaped;
///
/// assert_eq!(
///     format_escaped(b"\x03\x01j\x00\x00\x07VR\x030\x00\x01\x01"),
///     r"\x03\x01j\x00\x00\x07VR\x030\x00\x01\x01"
/// );
/// assert_eq!(format_escaped(b"E\\O"), r"E\\O");
/// ```
pub fn format_escaped(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len() * 2);
    for &byte in data {
        match byte {
            b'\\' => out.push_str("\\\\"),
            b'\t' => out.push_str("\\t"),
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            0x20..=0x7E => out.push(byte as char),
            _ => out.push_str(&format!("\\x{byte:02x}")),
        }
    }
    out
}

/// Formats bytes as lowercase hex pairs separated by spaces.
///
/// # Examples
/// ```rust
/// use wbxml::fmt::format_hex;
///
/// assert_eq!(format_hex(&[0x03, 0x01, 0x6A, 0x00]), "03 01 6a 00");
/// assert_eq!(format_hex(&[]), "");
/// ```
pub fn format_hex(data: &[u8]) -> String {
    data.iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Formats a short hex preview, truncating long data.
///
/// # Examples
/// ```rust
/// use wbxml::fmt::format_preview;
///
/// assert_eq!(format_preview(&[0x03, 0x01, 0x6A]), "0x03016a");
/// assert_eq!(format_preview(&(0..20).collect::<Vec<u8>>()), "0x000102030405... (20 bytes)");
/// ```
pub fn format_preview(data: &[u8]) -> String {
    if data.len() <= 8 {
        format!("0x{}", data.iter().map(|b| format!("{:02x}", b)).collect::<String>())
    } else {
        let preview: String = data[..6].iter().map(|b| format!("{:02x}", b)).collect();
        format!("0x{}... ({} bytes)", preview, data.len())
    }
}
