//! El Torito boot support (C8)
//!
//! Parses the boot catalog at mount time into a fixed table of
//! [`BootImageSlot`]s; the synthetic `[BOOT]` namespace built on top of
//! that table lives in [`crate::directory`], since it is a path-resolution
//! concern, not a boot-catalog concern.

pub mod catalog;
pub mod entry;
pub mod platform;
pub mod validation;

use crate::error::Result;
use crate::io::{BlockSource, SectorReader};
use crate::types::{BootImage, BootImageSlot, BootMediaType, BootPlatform, MAX_BOOT_IMAGES};

/// Read and parse the boot catalog at `catalog_lsn`, applying the
/// size-repair heuristic against `volume_space_size`, and return a
/// fixed-size table of tracked images (unused slots are the zero value).
pub fn scan(
    reader: &mut SectorReader<impl BlockSource>,
    catalog_lsn: u32,
    volume_space_size: u32,
) -> Result<[BootImageSlot; MAX_BOOT_IMAGES]> {
    let mut sector = [0u8; 2048];
    reader.read_sector(catalog_lsn, &mut sector)?;

    let mut images = catalog::parse(&sector)?;
    catalog::repair_sizes(&mut images, volume_space_size);

    let mut table = [BootImageSlot::default(); MAX_BOOT_IMAGES];
    for (slot, image) in table.iter_mut().zip(images.into_iter()) {
        *slot = image;
    }
    Ok(table)
}

/// Build a descriptive [`BootImage`] for a tracked slot. Per-entry
/// platform/media-type detail isn't retained past [`scan`] (only LSN and
/// sector count are), so this reports the no-emulation/x86 defaults that
/// hold for every image `scan` tracks — accurate for the common case and
/// good enough for informational display.
pub fn describe(slot: BootImageSlot) -> BootImage {
    BootImage {
        bootable: slot.lsn != 0,
        media_type: BootMediaType::NoEmulation,
        load_segment: 0,
        system_type: 0,
        sector_count: slot.num_sectors,
        load_rba: slot.lsn,
        platform: BootPlatform::X86,
    }
}
