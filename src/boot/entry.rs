//! Boot catalog entry types
//!
//! Initial/Default, Section Header, and Section entries — all 32 bytes,
//! per the El Torito specification §2.

use crate::types::BootMediaType;

/// Initial/Default Entry (32 bytes), always the second entry in the
/// catalog (immediately after the validation entry).
#[repr(C, packed)]
pub struct BootEntry {
    /// Boot indicator (0x88 = bootable, 0x00 = not bootable)
    pub boot_indicator: u8,

    /// Boot media type
    pub boot_media_type: u8,

    /// Load segment (0 = default 0x7C0)
    pub load_segment: u16,

    /// System type (partition type from MBR)
    pub system_type: u8,

    /// Unused
    pub unused1: u8,

    /// Sector count (virtual sectors, 512 bytes each)
    pub sector_count: u16,

    /// Load RBA (ISO sector, 2048 bytes)
    pub load_rba: u32,

    /// Unused (20 bytes)
    pub unused2: [u8; 20],
}

impl BootEntry {
    /// Bootable indicator
    pub const BOOTABLE: u8 = 0x88;

    /// Not bootable indicator
    pub const NOT_BOOTABLE: u8 = 0x00;

    /// Is this entry bootable?
    pub fn is_bootable(&self) -> bool {
        self.boot_indicator == Self::BOOTABLE
    }

    /// Parse boot media type
    pub fn media_type(&self) -> BootMediaType {
        BootMediaType::from_byte(self.boot_media_type)
    }

    /// Get image size in bytes (sector_count * 512)
    pub fn image_size(&self) -> u32 {
        self.sector_count as u32 * 512
    }

    /// Read an entry out of a 32-byte catalog slot.
    pub fn parse(data: &[u8]) -> Option<&Self> {
        if data.len() < 32 {
            return None;
        }
        Some(unsafe { &*(data.as_ptr() as *const Self) })
    }
}

/// Section Header Entry (32 bytes): introduces a run of [`SectionEntry`]
/// records for a non-default platform/section.
#[repr(C, packed)]
pub struct SectionHeaderEntry {
    /// Header indicator: 0x90 = more headers follow, 0x91 = final header.
    pub header_indicator: u8,
    /// Platform ID for the entries in this section.
    pub platform_id: u8,
    /// Number of section entries following this header.
    pub num_section_entries: u16,
    /// Identifier string.
    pub id_string: [u8; 28],
}

impl SectionHeaderEntry {
    /// More section headers follow this one.
    pub const MORE: u8 = 0x90;
    /// This is the final section header.
    pub const FINAL: u8 = 0x91;

    /// Whether `header_indicator` is one of the two recognized header
    /// marker bytes.
    pub fn is_header(&self) -> bool {
        self.header_indicator == Self::MORE || self.header_indicator == Self::FINAL
    }

    /// Read a section header out of a 32-byte catalog slot.
    pub fn parse(data: &[u8]) -> Option<&Self> {
        if data.len() < 32 {
            return None;
        }
        Some(unsafe { &*(data.as_ptr() as *const Self) })
    }
}

/// Section Entry (32 bytes): one bootable image within a non-default
/// section.
#[repr(C, packed)]
pub struct SectionEntry {
    /// Boot indicator (0x88 = bootable, 0x00 = not bootable).
    pub boot_indicator: u8,
    /// Boot media type.
    pub boot_media_type: u8,
    /// Load segment.
    pub load_segment: u16,
    /// System type.
    pub system_type: u8,
    /// Unused.
    pub unused1: u8,
    /// Sector count (virtual sectors).
    pub sector_count: u16,
    /// Load RBA.
    pub load_rba: u32,
    /// Selection criteria type.
    pub selection_criteria_type: u8,
    /// Vendor-unique selection criteria.
    pub vendor_unique: [u8; 19],
}

impl SectionEntry {
    /// Is this entry bootable?
    pub fn is_bootable(&self) -> bool {
        self.boot_indicator == BootEntry::BOOTABLE
    }

    /// Parse boot media type.
    pub fn media_type(&self) -> BootMediaType {
        BootMediaType::from_byte(self.boot_media_type)
    }

    /// Read a section entry out of a 32-byte catalog slot.
    pub fn parse(data: &[u8]) -> Option<&Self> {
        if data.len() < 32 {
            return None;
        }
        Some(unsafe { &*(data.as_ptr() as *const Self) })
    }
}
