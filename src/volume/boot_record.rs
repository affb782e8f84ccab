//! Boot Record Volume Descriptor parsing (El Torito).
//!
//! A type-0 volume descriptor whose boot-system identifier names
//! "EL TORITO SPECIFICATION" carries, in its boot-system-use area, the
//! logical sector number of the El Torito boot catalog.

use crate::error::{Iso9660Error, Result};

/// El Torito's boot system identifier string, left-padded with zero bytes
/// to fill the 32-byte field.
pub const EL_TORITO_ID: &[u8] = b"EL TORITO SPECIFICATION";

/// Boot Record Volume Descriptor (type 0).
#[repr(C, packed)]
pub struct BootRecordVolumeDescriptor {
    /// Type code (0 for boot record).
    pub type_code: u8,
    /// Standard identifier "CD001".
    pub identifier: [u8; 5],
    /// Version (1).
    pub version: u8,
    /// Boot system identifier.
    pub boot_system_id: [u8; 32],
    /// Boot identifier.
    pub boot_id: [u8; 32],
    /// Boot system use area; for El Torito, the first 4 bytes (LE) are
    /// the boot catalog's logical sector number.
    pub boot_system_use: [u8; 1977],
}

impl BootRecordVolumeDescriptor {
    /// Structural validation: signature and version only. Whether this is
    /// actually an El Torito boot record is a separate check
    /// ([`Self::is_el_torito`]), since a type-0 descriptor from an
    /// unrelated boot system is still a structurally valid descriptor.
    pub fn validate(&self) -> bool {
        &self.identifier == b"CD001" && self.version == 1
    }

    /// Whether the boot system identifier names El Torito.
    pub fn is_el_torito(&self) -> bool {
        self.boot_system_id.starts_with(EL_TORITO_ID)
    }

    /// Logical sector number of the El Torito boot catalog.
    pub fn catalog_lba(&self) -> u32 {
        u32::from_le_bytes([
            self.boot_system_use[0],
            self.boot_system_use[1],
            self.boot_system_use[2],
            self.boot_system_use[3],
        ])
    }
}

/// Parse a Boot Record Volume Descriptor from sector data.
pub fn parse(data: &[u8]) -> Result<&BootRecordVolumeDescriptor> {
    if data.len() < core::mem::size_of::<BootRecordVolumeDescriptor>() {
        return Err(Iso9660Error::InvalidSignature);
    }
    let br = unsafe { &*(data.as_ptr() as *const BootRecordVolumeDescriptor) };
    if !br.validate() {
        return Err(Iso9660Error::InvalidSignature);
    }
    Ok(br)
}
