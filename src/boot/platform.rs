//! Raw El Torito platform ID byte constants.
//!
//! [`crate::types::BootPlatform::from_id`] is the decoded form most code
//! should use; these remain for call sites that need to compare the raw
//! validation-entry byte directly.

/// x86 (PC-compatible)
pub const X86: u8 = 0x00;

/// PowerPC
pub const POWER_PC: u8 = 0x01;

/// Mac
pub const MAC: u8 = 0x02;

/// EFI
pub const EFI: u8 = 0xEF;
