//! String handling utilities
//!
//! ISO9660 uses several string encodings: ASCII, d-characters,
//! a-characters, and, under Joliet, UCS-2BE.

use alloc::string::String;

/// Trim trailing spaces from byte slice.
pub fn trim_trailing_spaces(bytes: &[u8]) -> &[u8] {
    let mut end = bytes.len();
    while end > 0 && bytes[end - 1] == b' ' {
        end -= 1;
    }
    &bytes[..end]
}

/// Convert ISO9660 d-characters to string.
///
/// d-characters: A-Z, 0-9, `_`.
pub fn dchars_to_str(bytes: &[u8]) -> Result<&str, core::str::Utf8Error> {
    let trimmed = trim_trailing_spaces(bytes);
    core::str::from_utf8(trimmed)
}

/// Convert ISO9660 a-characters to string.
///
/// a-characters: A-Z, 0-9, space, and a fixed set of punctuation.
pub fn achars_to_str(bytes: &[u8]) -> Result<&str, core::str::Utf8Error> {
    let trimmed = trim_trailing_spaces(bytes);
    core::str::from_utf8(trimmed)
}

/// Validate filename against ISO9660 Level 1 rules (8.3, uppercase
/// `A-Z0-9_`, one optional `.` — the `;version` suffix is expected to
/// have already been stripped by [`strip_version`]).
pub fn is_valid_level1_filename(name: &str) -> bool {
    if name.is_empty() || name.len() > 12 {
        return false;
    }
    let (base, ext) = match name.split_once('.') {
        Some((b, e)) => (b, Some(e)),
        None => (name, None),
    };
    if base.is_empty() || base.len() > 8 {
        return false;
    }
    let valid =
        |s: &str| s.bytes().all(|b| b.is_ascii_uppercase() || b.is_ascii_digit() || b == b'_');
    if !valid(base) {
        return false;
    }
    match ext {
        Some(e) if !e.is_empty() => e.len() <= 3 && valid(e),
        Some(_) => false,
        None => true,
    }
}

/// Strip version suffix from filename (e.g., "FILE.TXT;1" -> "FILE.TXT")
/// Also removes a trailing dot if present (e.g., "FILE.;1" -> "FILE").
pub fn strip_version(name: &str) -> &str {
    let base = name.split(';').next().unwrap_or(name);
    base.strip_suffix('.').unwrap_or(base)
}

/// Downcase an ASCII string, for the Level 1 translated-name comparison
/// used when Joliet is unavailable and a component has no Rock Ridge
/// name override.
pub fn ascii_lowercase(name: &str) -> String {
    name.chars().map(|c| c.to_ascii_lowercase()).collect()
}

/// Decode a big-endian UCS-2 (UTF-16BE) byte string into UTF-8, as used
/// by Joliet filenames. Surrogate pairs are reassembled; malformed UTF-16
/// is replaced with U+FFFD, matching `String::from_utf16_lossy`.
pub fn ucs2be_to_utf8(bytes: &[u8]) -> String {
    let mut units = alloc::vec::Vec::with_capacity(bytes.len() / 2);
    for chunk in bytes.chunks_exact(2) {
        units.push(u16::from_be_bytes([chunk[0], chunk[1]]));
    }
    String::from_utf16_lossy(&units)
}
