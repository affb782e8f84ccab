//! Rock Ridge extension support
//!
//! Rock Ridge adds POSIX filesystem semantics (permissions, symlinks,
//! long names) to a directory record's system-use area via SUSP entries.

use crate::types::RockRidgeInfo;
use alloc::string::String;

/// System Use Entry header (SUSP).
#[repr(C, packed)]
pub struct SystemUseEntry {
    /// Signature (2 bytes, e.g. "PX", "PN", "SL").
    pub signature: [u8; 2],
    /// Length of entry, including this header.
    pub length: u8,
    /// Version.
    pub version: u8,
    // Followed by entry-specific data
}

/// POSIX file attributes (`PX` entry).
#[repr(C, packed)]
pub struct PosixAttributes {
    /// System Use Entry header.
    pub header: SystemUseEntry,
    /// File mode (both-endian 32-bit).
    pub mode: [u8; 8],
    /// Number of links (both-endian 32-bit).
    pub links: [u8; 8],
    /// User ID (both-endian 32-bit).
    pub uid: [u8; 8],
    /// Group ID (both-endian 32-bit).
    pub gid: [u8; 8],
}

/// Alternate name (`NM` entry), possibly reassembled from several
/// continuation entries.
pub struct AlternateName {
    /// Flags byte of the (last) `NM` entry contributing to this name.
    pub flags: u8,
    /// Decoded name content.
    pub name: String,
}

/// SUSP/Rock Ridge signature constants.
pub mod signatures {
    /// POSIX file attributes signature.
    pub const POSIX_ATTRS: [u8; 2] = *b"PX";
    /// POSIX device number signature.
    pub const POSIX_DEV: [u8; 2] = *b"PN";
    /// Symbolic link signature.
    pub const SYMLINK: [u8; 2] = *b"SL";
    /// Alternate name signature.
    pub const ALTERNATE_NAME: [u8; 2] = *b"NM";
    /// Child link signature.
    pub const CHILD_LINK: [u8; 2] = *b"CL";
    /// Parent link signature.
    pub const PARENT_LINK: [u8; 2] = *b"PL";
    /// Relocated directory signature.
    pub const RELOCATED_DIR: [u8; 2] = *b"RE";
    /// Timestamps signature.
    pub const TIMESTAMPS: [u8; 2] = *b"TF";
    /// SUSP "sharing protocol" indicator.
    pub const SHARING_PROTOCOL: [u8; 2] = *b"SP";
    /// SUSP extensions reference.
    pub const EXTENSIONS_REF: [u8; 2] = *b"ER";
    /// Continuation area.
    pub const CONTINUATION: [u8; 2] = *b"CE";
}

/// `NM` flag bit meaning "this is a continuation of the previous NM entry".
const NM_FLAG_CONTINUE: u8 = 0x01;

/// `SL` flag bit meaning "this is a continuation of the previous SL entry".
const SL_FLAG_CONTINUE: u8 = 0x01;

/// `SL` component flag bit meaning "current directory" (`.`).
const SL_COMPONENT_CURRENT: u8 = 0x02;
/// `SL` component flag bit meaning "parent directory" (`..`).
const SL_COMPONENT_PARENT: u8 = 0x04;
/// `SL` component flag bit meaning "root directory".
const SL_COMPONENT_ROOT: u8 = 0x08;

/// Walk the SUSP entry chain in a directory record's system-use area and
/// decode the Rock Ridge fields this crate understands (`PX`, `NM`, `SL`,
/// `RE`, `TF`). Unknown or malformed entries are skipped rather than
/// treated as fatal, matching the tolerant parsing the rest of this
/// component uses for optional metadata.
///
/// Returns `None` if the area contains no recognizable SUSP signature at
/// all, so callers can distinguish "no Rock Ridge" from "Rock Ridge with
/// no name override".
pub fn parse_system_use(area: &[u8]) -> Option<RockRidgeInfo> {
    let mut info = RockRidgeInfo::default();
    let mut found_any = false;
    let mut symlink = String::new();
    let mut offset = 0usize;

    while offset + 4 <= area.len() {
        let sig = [area[offset], area[offset + 1]];
        let len = area[offset + 2] as usize;
        if len < 4 || offset + len > area.len() {
            break;
        }
        let body = &area[offset + 4..offset + len];

        match sig {
            s if s == signatures::POSIX_ATTRS => {
                found_any = true;
                if body.len() >= 32 {
                    info.posix_mode = Some(u32::from_le_bytes([
                        body[0], body[1], body[2], body[3],
                    ]));
                    info.uid = Some(u32::from_le_bytes([
                        body[16], body[17], body[18], body[19],
                    ]));
                    info.gid = Some(u32::from_le_bytes([
                        body[24], body[25], body[26], body[27],
                    ]));
                }
            }
            s if s == signatures::ALTERNATE_NAME => {
                found_any = true;
            }
            s if s == signatures::SYMLINK => {
                found_any = true;
                if body.len() >= 1 {
                    let flags = body[0];
                    if flags & SL_FLAG_CONTINUE == 0 {
                        symlink.clear();
                    }
                    decode_symlink_components(&body[1..], &mut symlink);
                }
            }
            s if s == signatures::RELOCATED_DIR => {
                found_any = true;
                info.relocated = true;
            }
            s if s == signatures::CONTINUATION => {
                // A continuation area lives elsewhere on the volume; this
                // crate reads only what fits in the directory record
                // itself and stops here rather than chasing it.
                found_any = true;
                break;
            }
            _ => {}
        }

        offset += len;
    }

    if !found_any {
        return None;
    }
    info.present = crate::types::ThreeWay::Yes;
    if !symlink.is_empty() {
        info.symlink_target = Some(symlink);
    }
    Some(info)
}

/// Like [`parse_system_use`] but also returns the decoded `NM` alternate
/// name text, if any. Split from the main parse so callers that only
/// care about presence/attributes don't pay for a `String` they discard.
pub fn parse_system_use_name(area: &[u8]) -> (Option<RockRidgeInfo>, Option<String>) {
    let mut offset = 0usize;
    let mut name = String::new();
    let mut have_name = false;
    let info = parse_system_use(area);

    while offset + 4 <= area.len() {
        let sig = [area[offset], area[offset + 1]];
        let len = area[offset + 2] as usize;
        if len < 4 || offset + len > area.len() {
            break;
        }
        if sig == signatures::ALTERNATE_NAME {
            let body = &area[offset + 4..offset + len];
            if !body.is_empty() {
                let flags = body[0];
                let text = &body[1..];
                if flags & NM_FLAG_CONTINUE == 0 {
                    name.clear();
                }
                name.push_str(&String::from_utf8_lossy(text));
                have_name = true;
            }
        }
        offset += len;
    }

    (info, if have_name { Some(name) } else { None })
}

fn decode_symlink_components(mut data: &[u8], out: &mut String) {
    while data.len() >= 2 {
        let flags = data[0];
        let comp_len = data[1] as usize;
        if 2 + comp_len > data.len() {
            break;
        }
        if !out.is_empty() {
            out.push('/');
        }
        if flags & SL_COMPONENT_ROOT != 0 {
            out.push('/');
        } else if flags & SL_COMPONENT_CURRENT != 0 {
            out.push('.');
        } else if flags & SL_COMPONENT_PARENT != 0 {
            out.push_str("..");
        } else {
            out.push_str(&String::from_utf8_lossy(&data[2..2 + comp_len]));
        }
        data = &data[2 + comp_len..];
    }
}
