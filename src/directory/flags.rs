//! Raw bit constants for a directory record's file-flags byte
//! (ECMA-119 9.1.6). [`crate::types::FileFlags::from_byte`] is the
//! decoded form most code should use; these remain for call sites that
//! need to test the raw byte directly.

/// Existence flag: hidden from normal directory listings.
pub const HIDDEN: u8 = 0x01;
/// This record describes a directory.
pub const DIRECTORY: u8 = 0x02;
/// Associated file.
pub const ASSOCIATED: u8 = 0x04;
/// Record format is specified by the extended attribute record.
pub const EXTENDED_FORMAT: u8 = 0x08;
/// Owner/group/permissions specified in the extended attribute record.
pub const EXTENDED_PERMISSIONS: u8 = 0x10;
/// This is not the final record of the file (more extents follow).
pub const MULTI_EXTENT: u8 = 0x80;
