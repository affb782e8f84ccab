//! Volume descriptor parsing (C2)
//!
//! ISO9660 volume descriptors start at sector 16 and describe the
//! filesystem layout; multiple descriptors may follow (Primary,
//! Supplementary, Boot Record) until a type-255 terminator.

pub mod boot_record;
pub mod primary;
pub mod supplementary;

use crate::diag::trace_warn;
use crate::directory::record::DirectoryRecord;
use crate::error::{Iso9660Error, Result};
use crate::io::{BlockSource, SectorReader};
use crate::types::{BootImageSlot, MAX_BOOT_IMAGES, SECTOR_SIZE, VOLUME_DESCRIPTOR_START};
use crate::types::{ExtensionMask, Superblock, ThreeWay};
use crate::utils::string;
use alloc::string::{String, ToString};

/// Safety limit on the number of descriptors scanned before giving up,
/// guarding against a missing terminator on a corrupt image.
const MAX_DESCRIPTORS: u32 = 100;

/// Volume Descriptor header (first 7 bytes of each descriptor).
#[repr(C, packed)]
pub struct VolumeDescriptorHeader {
    /// Type code (0=boot, 1=primary, 2=supplementary, 255=terminator).
    pub type_code: u8,
    /// Standard identifier "CD001".
    pub identifier: [u8; 5],
    /// Version (1 or 2).
    pub version: u8,
}

impl VolumeDescriptorHeader {
    /// CD001 magic bytes.
    pub const MAGIC: &'static [u8; 5] = b"CD001";

    /// Check if header is structurally valid.
    pub fn validate(&self) -> bool {
        &self.identifier == Self::MAGIC && (self.version == 1 || self.version == 2)
    }
}

fn decode_achars(bytes: &[u8]) -> String {
    string::achars_to_str(bytes)
        .map(|s| s.to_string())
        .unwrap_or_else(|_| String::from_utf8_lossy(string::trim_trailing_spaces(bytes)).into_owned())
}

fn decode_dchars(bytes: &[u8]) -> String {
    string::dchars_to_str(bytes)
        .map(|s| s.to_string())
        .unwrap_or_else(|_| String::from_utf8_lossy(string::trim_trailing_spaces(bytes)).into_owned())
}

struct PrimaryFields {
    volume_id: String,
    system_id: String,
    publisher_id: String,
    preparer_id: String,
    application_id: String,
    volume_set_id: String,
    root_lsn: u32,
    root_size: u32,
    logical_block_size: u16,
    volume_space_size: u32,
    xa: bool,
}

/// Scan the volume descriptor set starting at LSN 16, building the
/// immutable [`Superblock`] a mounted image is built around. `reader`'s
/// framing (frame size, data start, fuzzy offset) is carried straight
/// into the returned superblock, so a fuzzy-recovered mount and a normal
/// one are indistinguishable to callers beyond that.
pub fn scan(reader: &mut SectorReader<impl BlockSource>, mask: ExtensionMask) -> Result<Superblock> {
    let mut buffer = [0u8; SECTOR_SIZE];
    let mut primary: Option<PrimaryFields> = None;
    let mut joliet_root_lsn: Option<u32> = None;
    let mut joliet_root_size: Option<u32> = None;
    let mut joliet_level: Option<u8> = None;
    let mut boot_catalog_lsn: Option<u32> = None;

    let mut lsn = VOLUME_DESCRIPTOR_START as u32;
    loop {
        reader.read_sector(lsn, &mut buffer)?;

        let header = unsafe { &*(buffer.as_ptr() as *const VolumeDescriptorHeader) };
        if !header.validate() {
            return Err(Iso9660Error::InvalidSignature);
        }

        match header.type_code {
            0 => {
                if mask.contains(ExtensionMask::EL_TORITO) {
                    if let Ok(br) = boot_record::parse(&buffer) {
                        if br.is_el_torito() {
                            boot_catalog_lsn = Some(br.catalog_lba());
                        }
                    }
                }
            }
            1 => {
                if primary.is_none() {
                    let pvd = primary::parse(&buffer)?;
                    let root = DirectoryRecord::parse(&pvd.root_directory_record)?;
                    primary = Some(PrimaryFields {
                        volume_id: decode_dchars(&pvd.volume_id),
                        system_id: decode_achars(&pvd.system_id),
                        publisher_id: decode_achars(&pvd.publisher_id),
                        preparer_id: decode_achars(&pvd.preparer_id),
                        application_id: decode_achars(&pvd.application_id),
                        volume_set_id: decode_dchars(&pvd.volume_set_id),
                        root_lsn: root.get_extent_lba(),
                        root_size: root.get_data_length(),
                        logical_block_size: pvd.logical_block_size.get(),
                        volume_space_size: pvd.volume_space_size.get(),
                        xa: primary::has_xa_marker(&buffer),
                    });
                }
            }
            2 => {
                if joliet_level.is_none() {
                    if let Ok(svd) = supplementary::parse(&buffer) {
                        if let Some(level) = supplementary::joliet_level(&svd.escape_sequences) {
                            if mask.allows_joliet_level(level) {
                                let root = DirectoryRecord::parse(&svd.root_directory_record)?;
                                joliet_level = Some(level);
                                joliet_root_lsn = Some(root.get_extent_lba());
                                joliet_root_size = Some(root.get_data_length());
                            }
                        }
                    }
                }
            }
            255 => break,
            _ => {}
        }

        lsn += 1;
        if lsn - VOLUME_DESCRIPTOR_START as u32 > MAX_DESCRIPTORS {
            break;
        }
    }

    let primary = primary.ok_or(Iso9660Error::InvalidSignature)?;

    let mut boot_images = [BootImageSlot::default(); MAX_BOOT_IMAGES];
    if let Some(catalog_lsn) = boot_catalog_lsn {
        match crate::boot::scan(reader, catalog_lsn, primary.volume_space_size) {
            Ok(table) => boot_images = table,
            Err(e) => trace_warn!("failed to parse El Torito boot catalog: {}", e),
        }
    }

    Ok(Superblock {
        volume_id: primary.volume_id,
        system_id: primary.system_id,
        publisher_id: primary.publisher_id,
        preparer_id: primary.preparer_id,
        application_id: primary.application_id,
        volume_set_id: primary.volume_set_id,
        root_lsn: primary.root_lsn,
        root_size: primary.root_size,
        joliet_root_lsn,
        joliet_root_size,
        logical_block_size: primary.logical_block_size,
        volume_space_size: primary.volume_space_size,
        joliet_level,
        xa: primary.xa,
        mode2: ThreeWay::Unknown,
        rock_ridge: ThreeWay::Unknown,
        boot_images,
        frame_size: reader.frame_size,
        data_start: reader.data_start,
        fuzzy_offset: reader.fuzzy_offset,
    })
}
