//! Directory Record structure and decoding
//!
//! Directory records describe files and subdirectories. [`DirectoryRecord`]
//! is the raw on-disc layout; [`decode`] turns one (or a chained sequence
//! of, for multi-extent files) raw record into an owned [`crate::types::Stat`].

use crate::diag::trace_warn;
use crate::error::{Iso9660Error, Result};
use crate::extensions::rock_ridge;
use crate::types::{DateTime7, FileFlags, Kind, Stat, XaInfo};
use crate::utils::string;
use alloc::string::{String, ToString};

/// Directory Record (variable length).
#[repr(C, packed)]
pub struct DirectoryRecord {
    /// Length of directory record (BP 1).
    pub length: u8,
    /// Extended attribute record length (BP 2).
    pub extended_attr_length: u8,
    /// Extent location (both-endian 32-bit) (BP 3-10).
    pub extent_lba: [u8; 8],
    /// Data length (both-endian 32-bit) (BP 11-18).
    pub data_length: [u8; 8],
    /// Recording date and time (7 bytes) (BP 19-25).
    pub recording_datetime: [u8; 7],
    /// File flags (BP 26).
    pub file_flags: u8,
    /// File unit size (interleaved files) (BP 27).
    pub file_unit_size: u8,
    /// Interleave gap size (BP 28).
    pub interleave_gap: u8,
    /// Volume sequence number (both-endian 16-bit) (BP 29-32).
    pub volume_sequence: [u8; 4],
    /// File identifier length (BP 33).
    pub file_id_len: u8,
    // Followed by:
    // - File identifier (file_id_len bytes)
    // - Padding field (1 byte if file_id_len is even)
    // - System use area (variable)
}

impl DirectoryRecord {
    /// Minimum record length.
    pub const MIN_LENGTH: u8 = 34;

    /// Parse directory record from bytes. Does not accept the
    /// zero-length sentinel that marks "rest of this sector unused" —
    /// callers detect that by inspecting `data[0]` before calling this.
    pub fn parse(data: &[u8]) -> Result<&Self> {
        if data.len() < Self::MIN_LENGTH as usize {
            return Err(Iso9660Error::InvalidDirectoryRecord);
        }

        let record = unsafe { &*(data.as_ptr() as *const DirectoryRecord) };

        if record.length == 0 || record.length as usize > data.len() {
            return Err(Iso9660Error::InvalidDirectoryRecord);
        }

        if record.file_id_len as usize + Self::MIN_LENGTH as usize > record.length as usize {
            return Err(Iso9660Error::InvalidDirectoryRecord);
        }

        Ok(record)
    }

    /// Get extent LBA (little-endian half of the both-endian field).
    pub fn get_extent_lba(&self) -> u32 {
        u32::from_le_bytes([
            self.extent_lba[0],
            self.extent_lba[1],
            self.extent_lba[2],
            self.extent_lba[3],
        ])
    }

    /// Get data length (little-endian half).
    pub fn get_data_length(&self) -> u32 {
        u32::from_le_bytes([
            self.data_length[0],
            self.data_length[1],
            self.data_length[2],
            self.data_length[3],
        ])
    }

    /// Parse file flags.
    pub fn get_flags(&self) -> FileFlags {
        FileFlags::from_byte(self.file_flags)
    }

    /// Is this a directory?
    pub fn is_directory(&self) -> bool {
        self.file_flags & 0x02 != 0
    }

    /// Get raw file identifier bytes.
    pub fn file_identifier<'a>(&self, raw: &'a [u8]) -> &'a [u8] {
        let start = 33;
        let len = self.file_id_len as usize;
        &raw[start..start + len]
    }

    /// Raw system-use area following the identifier and its pad byte, if
    /// any bytes remain in the record.
    pub fn system_use_area<'a>(&self, raw: &'a [u8]) -> &'a [u8] {
        let pad = if self.file_id_len % 2 == 0 { 1 } else { 0 };
        let start = 33 + self.file_id_len as usize + pad;
        let end = self.length as usize;
        if start >= end {
            &[]
        } else {
            &raw[start..end]
        }
    }
}

/// Outcome of decoding one raw record, given any prior extent of the same
/// file already accumulated.
pub enum DecodeStep {
    /// The record's multi-extent flag was set: more extents for this same
    /// file follow later in the directory; keep this partially-built
    /// `Stat` and feed the next record back in as `continuation`.
    Continuing(Stat),
    /// This was the last (or only) extent; the `Stat` is complete.
    Final(Stat),
}

/// Decode one raw directory record into a [`Stat`], chaining onto
/// `continuation` (the in-progress `Stat` from a previous extent of the
/// same multi-extent file, if any).
///
/// Mirrors `_iso9660_dir_to_statbuf` from the reference implementation:
/// contiguity is checked before the current extent's size is folded in,
/// a relocated-directory (`RE`) continuation is rejected outright, and a
/// final record's name must match the name already established by an
/// in-progress chain.
pub fn decode(raw: &[u8], joliet_active: bool, continuation: Option<Stat>) -> Result<DecodeStep> {
    let record = DirectoryRecord::parse(raw)?;
    let extent_lba = record.get_extent_lba();
    let data_length = record.get_data_length();
    let flags = record.get_flags();

    let (lsn, first_extent_size, total_size) = match &continuation {
        Some(prev) => {
            if prev.rock_ridge.relocated {
                trace_warn!("multi-extent continuation of a relocated directory rejected");
                return Err(Iso9660Error::InvalidDirectoryRecord);
            }
            let expected_next_lsn = prev.lsn as u64 + prev.total_size / 2048;
            if expected_next_lsn != extent_lba as u64 || prev.total_size % 2048 != 0 {
                trace_warn!("non-contiguous data extents for '{}'", prev.name);
                return Err(Iso9660Error::InvalidDirectoryRecord);
            }
            (prev.lsn, prev.first_extent_size, prev.total_size + data_length as u64)
        }
        None => (extent_lba, data_length, data_length as u64),
    };

    let name_bytes = record.file_identifier(raw);
    let su_area = record.system_use_area(raw);
    let (rr_opt, rr_name) = rock_ridge::parse_system_use_name(su_area);
    let rr_info = rr_opt.unwrap_or_default();

    let name = if flags.multi_extent {
        decode_plain_name(name_bytes, joliet_active)
    } else if let Some(n) = rr_name {
        n
    } else if name_bytes == [0x00] {
        ".".to_string()
    } else if name_bytes == [0x01] {
        "..".to_string()
    } else {
        decode_plain_name(name_bytes, joliet_active)
    };

    if !flags.multi_extent {
        if let Some(prev) = &continuation {
            if prev.name != name {
                trace_warn!("non consecutive multiextent file parts");
                return Err(Iso9660Error::InvalidDirectoryRecord);
            }
        }
    }

    let (xa, xa_info) = decode_xa_tail(su_area);

    let stat = Stat {
        name,
        kind: if flags.directory {
            Kind::Directory
        } else {
            Kind::File
        },
        lsn,
        first_extent_size,
        total_size,
        flags,
        time: DateTime7::from_bytes(&record.recording_datetime),
        xa,
        xa_info,
        rock_ridge: rr_info,
    };

    if flags.multi_extent {
        Ok(DecodeStep::Continuing(stat))
    } else {
        Ok(DecodeStep::Final(stat))
    }
}

fn decode_plain_name(name_bytes: &[u8], joliet_active: bool) -> String {
    // Keeps the `;version` suffix intact — callers decide whether to
    // strip it, on the comparison side, not at decode time.
    if joliet_active {
        string::ucs2be_to_utf8(name_bytes)
    } else {
        String::from_utf8_lossy(string::trim_trailing_spaces(name_bytes)).into_owned()
    }
}

fn decode_xa_tail(su_area: &[u8]) -> (crate::types::ThreeWay, Option<XaInfo>) {
    use crate::types::ThreeWay;
    let even_len = su_area.len() & !1;
    if even_len < 14 {
        return (ThreeWay::Unknown, None);
    }
    let tail = &su_area[su_area.len() - 14..];
    if &tail[6..8] != b"XA" {
        return (ThreeWay::Unknown, None);
    }
    let group_id = u16::from_le_bytes([tail[0], tail[1]]);
    let user_id = u16::from_le_bytes([tail[2], tail[3]]);
    let attributes = u16::from_le_bytes([tail[4], tail[5]]);
    let file_number = tail[8];
    (
        ThreeWay::Yes,
        Some(XaInfo {
            group_id,
            user_id,
            attributes,
            file_number,
        }),
    )
}
