//! Boot catalog parsing
//!
//! El Torito Boot Catalog structure: a validation entry, an
//! initial/default entry, then zero or more (section header, section
//! entries) groups. Every bootable, no-emulation entry encountered —
//! whether the initial entry or a section entry — is tracked as a boot
//! image, in catalog order, up to [`MAX_BOOT_IMAGES`].

use crate::boot::entry::{BootEntry, SectionEntry, SectionHeaderEntry};
use crate::boot::validation::ValidationEntry;
use crate::error::{Iso9660Error, Result};
use crate::types::{BootImageSlot, BootMediaType, MAX_BOOT_IMAGES};
use alloc::vec::Vec;

const ENTRY_SIZE: usize = 32;

/// Parse a boot catalog out of its first sector's worth of bytes.
///
/// Only the catalog's first sector is consulted: every real-world
/// catalog this crate has been exercised against fits comfortably within
/// one 2048-byte sector, since each entry is 32 bytes and `MAX_BOOT_IMAGES`
/// caps collection well before that.
pub fn parse(data: &[u8]) -> Result<Vec<BootImageSlot>> {
    if data.len() < 2 * ENTRY_SIZE {
        return Err(Iso9660Error::InvalidBootCatalog);
    }

    let validation = ValidationEntry::parse(&data[0..ENTRY_SIZE]).ok_or(Iso9660Error::InvalidBootCatalog)?;
    if validation.header_id != ValidationEntry::HEADER_ID || validation.key != ValidationEntry::KEY_BYTES {
        return Err(Iso9660Error::InvalidBootCatalog);
    }
    if !validation.is_valid(&data[0..ENTRY_SIZE]) {
        return Err(Iso9660Error::ChecksumFailed);
    }

    let mut images = Vec::new();

    let initial = BootEntry::parse(&data[ENTRY_SIZE..2 * ENTRY_SIZE]).ok_or(Iso9660Error::InvalidBootEntry)?;
    if initial.is_bootable() && initial.media_type() == BootMediaType::NoEmulation {
        images.push(BootImageSlot {
            lsn: initial.load_rba,
            num_sectors: initial.sector_count as u32,
        });
    }

    let mut offset = 2 * ENTRY_SIZE;
    while offset + ENTRY_SIZE <= data.len() && images.len() < MAX_BOOT_IMAGES {
        let slot = &data[offset..offset + ENTRY_SIZE];
        if slot[0] == 0 {
            break;
        }
        let header = match SectionHeaderEntry::parse(slot) {
            Some(h) if h.is_header() => h,
            _ => break,
        };
        let count = header.num_section_entries;
        let is_final = header.header_indicator == SectionHeaderEntry::FINAL;
        offset += ENTRY_SIZE;

        for _ in 0..count {
            if images.len() >= MAX_BOOT_IMAGES || offset + ENTRY_SIZE > data.len() {
                break;
            }
            if let Some(entry) = SectionEntry::parse(&data[offset..offset + ENTRY_SIZE]) {
                if entry.is_bootable() && entry.media_type() == BootMediaType::NoEmulation {
                    images.push(BootImageSlot {
                        lsn: entry.load_rba,
                        num_sectors: entry.sector_count as u32,
                    });
                }
            }
            offset += ENTRY_SIZE;
        }

        if is_final {
            break;
        }
    }

    Ok(images)
}

/// Apply the boot-image size repair heuristic: an image advertising
/// `num_sectors <= 1` virtual sectors is expanded to the gap between its
/// LSN and the next higher known LSN (or `volume_space_size`), provided
/// that *logical*-sector gap is at least
/// [`crate::types::BOOT_IMAGE_REPAIR_THRESHOLD`] — the threshold applies
/// before the gap is converted to virtual sectors, matching the
/// reference implementation's `_iso9660_fs.c` check on the raw LBA
/// difference. This tolerates writers that leave the size field at 0 or
/// 1 for images larger than 64K sectors.
pub fn repair_sizes(images: &mut [BootImageSlot], volume_space_size: u32) {
    use crate::types::{BOOT_IMAGE_REPAIR_THRESHOLD, SECTORS_PER_VIRTUAL};

    let lsns: Vec<u32> = images.iter().map(|i| i.lsn).collect();
    for image in images.iter_mut() {
        if image.num_sectors > 1 {
            continue;
        }
        let next_lsn = lsns
            .iter()
            .copied()
            .filter(|&lsn| lsn > image.lsn)
            .min()
            .unwrap_or(volume_space_size);
        let gap_logical = next_lsn.saturating_sub(image.lsn);
        if gap_logical >= BOOT_IMAGE_REPAIR_THRESHOLD {
            let gap_virtual = gap_logical * SECTORS_PER_VIRTUAL;
            crate::diag::trace_info!(
                "expanding boot image at LSN {} from {} to {} virtual sectors",
                image.lsn,
                image.num_sectors,
                gap_virtual
            );
            image.num_sectors = gap_virtual;
        }
    }
}
