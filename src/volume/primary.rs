//! Primary Volume Descriptor parsing
//!
//! The Primary Volume Descriptor (PVD) is always present and describes
//! the basic ISO9660 filesystem structure. See ECMA-119 8.4 for the full
//! field layout this struct mirrors byte-for-byte.

use crate::error::{Iso9660Error, Result};

/// Byte offset within a PVD sector of the CD-ROM XA marker string.
pub const XA_MARKER_OFFSET: usize = 1024;

/// CD-ROM XA marker string.
pub const XA_MARKER: &[u8; 8] = b"CD-XA001";

/// Primary Volume Descriptor (sector 16, type 1).
///
/// See ECMA-119 8.4 for full specification.
#[repr(C, packed)]
pub struct PrimaryVolumeDescriptor {
    /// Type code (1 for primary).
    pub type_code: u8,
    /// Standard identifier "CD001".
    pub identifier: [u8; 5],
    /// Version (1).
    pub version: u8,
    /// Unused (1 byte).
    pub unused1: u8,
    /// System identifier (32 a-characters).
    pub system_id: [u8; 32],
    /// Volume identifier (32 d-characters).
    pub volume_id: [u8; 32],
    /// Unused (8 bytes).
    pub unused2: [u8; 8],
    /// Volume space size (both-endian 32-bit).
    pub volume_space_size: BothEndian32,
    /// Unused (32 bytes).
    pub unused3: [u8; 32],
    /// Volume set size (both-endian 16-bit).
    pub volume_set_size: BothEndian16,
    /// Volume sequence number (both-endian 16-bit).
    pub volume_sequence_number: BothEndian16,
    /// Logical block size (both-endian 16-bit, usually 2048).
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
    /// Volume set identifier (128 d-characters).
    pub volume_set_id: [u8; 128],
    /// Publisher identifier (128 a-characters).
    pub publisher_id: [u8; 128],
    /// Data preparer identifier (128 a-characters).
    pub preparer_id: [u8; 128],
    /// Application identifier (128 a-characters).
    pub application_id: [u8; 128],
    /// Copyright file identifier (37 bytes).
    pub copyright_file_id: [u8; 37],
    /// Abstract file identifier (37 bytes).
    pub abstract_file_id: [u8; 37],
    /// Bibliographic file identifier (37 bytes).
    pub bibliographic_file_id: [u8; 37],
    /// Volume creation date and time (17-byte ASCII form).
    pub creation_date: [u8; 17],
    /// Volume modification date and time.
    pub modification_date: [u8; 17],
    /// Volume expiration date and time.
    pub expiration_date: [u8; 17],
    /// Volume effective date and time.
    pub effective_date: [u8; 17],
    /// File structure version (always 1).
    pub file_structure_version: u8,
    /// Reserved (1 byte).
    pub reserved1: u8,
    /// Application-used area (512 bytes); the CD-XA marker, if present,
    /// lives at [`XA_MARKER_OFFSET`] within the sector, which falls
    /// inside this field.
    pub application_use: [u8; 512],
    // Remaining 653 bytes are reserved by ECMA-119 and not modeled.
}

/// Both-endian 32-bit value (stored as LE then BE).
#[repr(C, packed)]
#[derive(Clone, Copy)]
pub struct BothEndian32 {
    /// Little-endian value.
    pub le: [u8; 4],
    /// Big-endian value.
    pub be: [u8; 4],
}

impl BothEndian32 {
    /// Get value (uses the little-endian half).
    pub fn get(&self) -> u32 {
        u32::from_le_bytes(self.le)
    }
}

/// Both-endian 16-bit value (stored as LE then BE).
#[repr(C, packed)]
#[derive(Clone, Copy)]
pub struct BothEndian16 {
    /// Little-endian value.
    pub le: [u8; 2],
    /// Big-endian value.
    pub be: [u8; 2],
}

impl BothEndian16 {
    /// Get value (uses the little-endian half).
    pub fn get(&self) -> u16 {
        u16::from_le_bytes(self.le)
    }
}

/// Parse Primary Volume Descriptor from sector data.
///
/// Accepts version 1 or 2: most PVDs are version 1, but some writers
/// (and the corresponding Joliet SVDs) use version 2; rejecting version 2
/// here would be stricter than the volume descriptor header check this
/// parse follows, so the two are kept consistent.
pub fn parse(data: &[u8]) -> Result<&PrimaryVolumeDescriptor> {
    if data.len() < core::mem::size_of::<PrimaryVolumeDescriptor>() {
        return Err(Iso9660Error::InvalidSignature);
    }

    let pvd = unsafe { &*(data.as_ptr() as *const PrimaryVolumeDescriptor) };

    if pvd.type_code != 1 {
        return Err(Iso9660Error::InvalidSignature);
    }
    if &pvd.identifier != b"CD001" {
        return Err(Iso9660Error::InvalidSignature);
    }
    if pvd.version != 1 && pvd.version != 2 {
        return Err(Iso9660Error::UnsupportedVersion);
    }

    Ok(pvd)
}

/// Whether this PVD carries the CD-ROM XA marker in its application-use
/// area.
pub fn has_xa_marker(data: &[u8]) -> bool {
    data.len() >= XA_MARKER_OFFSET + XA_MARKER.len()
        && &data[XA_MARKER_OFFSET..XA_MARKER_OFFSET + XA_MARKER.len()] == XA_MARKER
}
