//! Supplementary Volume Descriptor parsing (Joliet).
//!
//! A Supplementary Volume Descriptor shares the Primary Volume
//! Descriptor's field layout except for two fields: BP8 is a volume-flags
//! byte instead of unused, and BP89-120 carries an escape-sequence field
//! instead of being unused — Joliet is identified entirely by that escape
//! sequence.

use crate::error::{Iso9660Error, Result};
use crate::volume::primary::{BothEndian16, BothEndian32};

/// Supplementary Volume Descriptor (type 2).
#[repr(C, packed)]
pub struct SupplementaryVolumeDescriptor {
    /// Type code (2 for supplementary).
    pub type_code: u8,
    /// Standard identifier "CD001".
    pub identifier: [u8; 5],
    /// Version (1 or 2).
    pub version: u8,
    /// Volume flags.
    pub volume_flags: u8,
    /// System identifier (32 a-characters, or UCS-2BE under Joliet).
    pub system_id: [u8; 32],
    /// Volume identifier (32 d-characters, or UCS-2BE under Joliet).
    pub volume_id: [u8; 32],
    /// Unused (8 bytes).
    pub unused2: [u8; 8],
    /// Volume space size (both-endian 32-bit).
    pub volume_space_size: BothEndian32,
    /// Escape sequences identifying the secondary character set.
    pub escape_sequences: [u8; 32],
    /// Volume set size (both-endian 16-bit).
    pub volume_set_size: BothEndian16,
    /// Volume sequence number (both-endian 16-bit).
    pub volume_sequence_number: BothEndian16,
    /// Logical block size (both-endian 16-bit).
    pub logical_block_size: BothEndian16,
    /// Path table size (both-endian 32-bit).
    pub path_table_size: BothEndian32,
    /// Type L path table location (32-bit LE).
    pub type_l_path_table: u32,
    /// Optional type L path table location (32-bit LE).
    pub optional_type_l_path_table: u32,
    /// Type M path table location (32-bit BE).
    pub type_m_path_table: u32,
    /// Optional type M path table location (32-bit BE).
    pub optional_type_m_path_table: u32,
    /// Root directory record (34 bytes).
    pub root_directory_record: [u8; 34],
    // Remaining metadata fields mirror the PVD and are not needed: Joliet
    // readers fall back to the PVD for publisher/preparer/application
    // identifiers whenever the SVD's own copy is empty or identical.
}

/// Parse a Supplementary Volume Descriptor from sector data.
pub fn parse(data: &[u8]) -> Result<&SupplementaryVolumeDescriptor> {
    if data.len() < core::mem::size_of::<SupplementaryVolumeDescriptor>() {
        return Err(Iso9660Error::InvalidSignature);
    }
    let svd = unsafe { &*(data.as_ptr() as *const SupplementaryVolumeDescriptor) };
    if svd.type_code != 2 {
        return Err(Iso9660Error::InvalidSignature);
    }
    if &svd.identifier != b"CD001" {
        return Err(Iso9660Error::InvalidSignature);
    }
    Ok(svd)
}

/// Decode the Joliet level (1, 2 or 3) from an escape-sequence field, if
/// it names one of the three Joliet UCS-2 escape sequences.
///
/// Per the original source: byte 0 must be `0x25`, byte 1 `0x2f`; byte 2
/// selects the level (`0x40`→1, `0x43`→2, `0x45`→3).
pub fn joliet_level(escape_sequences: &[u8; 32]) -> Option<u8> {
    if escape_sequences[0] != 0x25 || escape_sequences[1] != 0x2f {
        return None;
    }
    match escape_sequences[2] {
        0x40 => Some(1),
        0x43 => Some(2),
        0x45 => Some(3),
        _ => None,
    }
}
