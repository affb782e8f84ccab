//! Common types and constants shared across the crate.

use alloc::string::String;
use alloc::vec::Vec;

/// ISO9660 logical sector size (always 2048 bytes).
pub const SECTOR_SIZE: usize = 2048;

/// Virtual sector size used by El Torito sector counts (512 bytes).
pub const VIRTUAL_SECTOR_SIZE: u32 = 512;

/// Ratio between a logical sector and a virtual sector.
pub const SECTORS_PER_VIRTUAL: u32 = (SECTOR_SIZE as u32) / VIRTUAL_SECTOR_SIZE;

/// Volume descriptor set starts at sector 16.
pub const VOLUME_DESCRIPTOR_START: u64 = 16;

/// Maximum path length.
pub const MAX_PATH_LENGTH: usize = 255;

/// Maximum directory depth.
pub const MAX_DIRECTORY_DEPTH: usize = 8;

/// Maximum number of El Torito boot images tracked per volume.
pub const MAX_BOOT_IMAGES: usize = 8;

/// Raw CD-ROM frame size (audio/raw sector), used by the fuzzy locator.
pub const CD_FRAMESIZE_RAW: u32 = 2352;

/// Mode 2 Form 1/2 raw sector size without the 16-byte sync header.
pub const M2RAW_SECTOR_SIZE: u32 = 2336;

/// Byte length of the 16-byte CD-ROM sync header that precedes a raw frame's
/// payload.
pub const CD_SYNC_SIZE: u32 = 16;

/// Threshold (in virtual sectors) used by the boot-image size repair
/// heuristic: a tracked image with `num_sectors <= 1` is only auto-expanded
/// if the gap to the next known LSN is at least this large.
pub const BOOT_IMAGE_REPAIR_THRESHOLD: u32 = 0x4000;

/// Volume descriptor type codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum VolumeDescriptorType {
    /// Boot Record (El Torito).
    BootRecord = 0,
    /// Primary Volume Descriptor.
    Primary = 1,
    /// Supplementary Volume Descriptor (Joliet).
    Supplementary = 2,
    /// Volume Partition Descriptor.
    Partition = 3,
    /// Volume Descriptor Set Terminator.
    Terminator = 255,
}

/// A flag whose value may be known true, known false, or simply not yet
/// determined — used for XA, Mode 2, and Rock Ridge presence, each of
/// which may only become knowable once a directory record is decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreeWay {
    /// Known to be present / true.
    Yes,
    /// Known to be absent / false.
    No,
    /// Not yet determined.
    Unknown,
}

impl ThreeWay {
    /// True only when the value is definitely `Yes`.
    pub fn is_yes(self) -> bool {
        matches!(self, ThreeWay::Yes)
    }
}

/// Compile/runtime switches for optional extensions, mirroring the
/// `iso_extension_mask_t` bitmask from the reference implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtensionMask(u32);

impl ExtensionMask {
    /// Rock Ridge POSIX extensions.
    pub const ROCK_RIDGE: ExtensionMask = ExtensionMask(1 << 0);
    /// Joliet level 1 (escape sequence third byte `0x40`).
    pub const JOLIET_LEVEL1: ExtensionMask = ExtensionMask(1 << 1);
    /// Joliet level 2 (escape sequence third byte `0x43`).
    pub const JOLIET_LEVEL2: ExtensionMask = ExtensionMask(1 << 2);
    /// Joliet level 3 (escape sequence third byte `0x45`).
    pub const JOLIET_LEVEL3: ExtensionMask = ExtensionMask(1 << 3);
    /// Any Joliet level — admits an SVD regardless of which of the three
    /// levels its escape sequence names.
    pub const JOLIET: ExtensionMask =
        ExtensionMask(Self::JOLIET_LEVEL1.0 | Self::JOLIET_LEVEL2.0 | Self::JOLIET_LEVEL3.0);
    /// El Torito bootable-CD extensions.
    pub const EL_TORITO: ExtensionMask = ExtensionMask(1 << 4);
    /// CD-ROM XA extensions.
    pub const XA: ExtensionMask = ExtensionMask(1 << 5);
    /// Nothing enabled.
    pub const NONE: ExtensionMask = ExtensionMask(0);
    /// Everything this crate knows how to parse.
    pub const ALL: ExtensionMask = ExtensionMask(0b11_1111);

    /// Build a mask from feature flags compiled into this crate.
    pub fn from_build_features() -> Self {
        let mut bits = Self::EL_TORITO.0 | Self::XA.0;
        if cfg!(feature = "rock-ridge") {
            bits |= Self::ROCK_RIDGE.0;
        }
        if cfg!(feature = "joliet") {
            bits |= Self::JOLIET.0;
        }
        ExtensionMask(bits)
    }

    /// Whether `other`'s bits are all set in `self`.
    pub fn contains(self, other: ExtensionMask) -> bool {
        self.0 & other.0 == other.0
    }

    /// Union of two masks.
    pub fn union(self, other: ExtensionMask) -> Self {
        ExtensionMask(self.0 | other.0)
    }

    /// Whether this mask admits the given Joliet level (1, 2 or 3).
    /// Any other level is never admitted.
    pub fn allows_joliet_level(self, level: u8) -> bool {
        let bit = match level {
            1 => Self::JOLIET_LEVEL1,
            2 => Self::JOLIET_LEVEL2,
            3 => Self::JOLIET_LEVEL3,
            _ => return false,
        };
        self.contains(bit)
    }
}

pub use crate::utils::datetime::DateTime7;

/// File flags from a directory record (ECMA-119 9.1.6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FileFlags {
    /// Existence flag (hidden from normal directory listings).
    pub hidden: bool,
    /// This record describes a directory.
    pub directory: bool,
    /// Associated file.
    pub associated: bool,
    /// Record format is specified by the extended attribute record.
    pub extended_format: bool,
    /// Owner/group/permissions are specified in the extended attribute record.
    pub extended_permissions: bool,
    /// This is not the final record of the file (more extents follow).
    pub multi_extent: bool,
}

impl FileFlags {
    /// Decode from the raw flags byte.
    pub fn from_byte(byte: u8) -> Self {
        Self {
            hidden: byte & 0x01 != 0,
            directory: byte & 0x02 != 0,
            associated: byte & 0x04 != 0,
            extended_format: byte & 0x08 != 0,
            extended_permissions: byte & 0x10 != 0,
            multi_extent: byte & 0x80 != 0,
        }
    }
}

/// What kind of filesystem object a [`Stat`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// A regular file.
    File,
    /// A directory.
    Directory,
}

/// CD-ROM XA extended attributes trailing a directory record.
#[derive(Debug, Clone, Copy, Default)]
pub struct XaInfo {
    /// Owner group ID.
    pub group_id: u16,
    /// Owner user ID.
    pub user_id: u16,
    /// XA attributes bitmask.
    pub attributes: u16,
    /// File number (for interleaved audio).
    pub file_number: u8,
}

/// Rock Ridge metadata decoded from a directory record's system-use area.
#[derive(Debug, Clone, Default)]
pub struct RockRidgeInfo {
    /// Whether Rock Ridge fields were found on this record.
    pub present: ThreeWay,
    /// POSIX file mode from a `PX` entry, if present.
    pub posix_mode: Option<u32>,
    /// POSIX uid from a `PX` entry, if present.
    pub uid: Option<u32>,
    /// POSIX gid from a `PX` entry, if present.
    pub gid: Option<u32>,
    /// Symlink target from an `SL` entry, if present.
    pub symlink_target: Option<String>,
    /// Set when an `RE` (relocated directory) entry was seen — such
    /// entries are suppressed from listings and traversal.
    pub relocated: bool,
}

impl Default for ThreeWay {
    fn default() -> Self {
        ThreeWay::Unknown
    }
}

/// In-memory representation of one decoded directory entry.
///
/// Deliberately a plain owned value: there is no companion "free"
/// function, `Drop` releases the heap `String`/`Vec` fields automatically
/// when a `Stat` goes out of scope.
#[derive(Debug, Clone)]
pub struct Stat {
    /// File or directory name (decoded from Rock Ridge, Joliet, or the
    /// primary d/a-character name, in that order of preference).
    pub name: String,
    /// File vs. directory.
    pub kind: Kind,
    /// Logical sector number of the first (or only) extent.
    pub lsn: u32,
    /// Size of the first extent only, preserved for compatibility with
    /// callers that only care about the initial extent (see `total_size`
    /// for the aggregate).
    pub first_extent_size: u32,
    /// Total size in bytes, aggregated across every extent of a
    /// multi-extent file.
    pub total_size: u64,
    /// Raw file flags from the (last-seen) directory record.
    pub flags: FileFlags,
    /// Recording date and time.
    pub time: DateTime7,
    /// Three-valued XA presence plus decoded attributes, when present.
    pub xa: ThreeWay,
    /// Decoded XA attributes, if `xa == ThreeWay::Yes`.
    pub xa_info: Option<XaInfo>,
    /// Rock Ridge metadata, if any was decoded.
    pub rock_ridge: RockRidgeInfo,
}

impl Stat {
    /// Is this a directory?
    pub fn is_directory(&self) -> bool {
        self.kind == Kind::Directory
    }

    /// Is this a regular file?
    pub fn is_file(&self) -> bool {
        self.kind == Kind::File
    }

    /// File extension (portion after the last `.`), if any.
    pub fn extension(&self) -> Option<&str> {
        self.name.rsplit('.').next().filter(|e| *e != self.name)
    }
}

/// Synthesized boot-image entry, tracked per volume (up to
/// [`MAX_BOOT_IMAGES`]).
#[derive(Debug, Clone, Copy, Default)]
pub struct BootImageSlot {
    /// Logical sector number of the image's first sector (0 = unused slot).
    pub lsn: u32,
    /// Size in virtual (512-byte) sectors.
    pub num_sectors: u32,
}

/// El Torito boot image metadata, as returned to a caller.
#[derive(Debug, Clone)]
pub struct BootImage {
    /// Bootable flag.
    pub bootable: bool,
    /// Boot media type.
    pub media_type: BootMediaType,
    /// Load segment (x86 only).
    pub load_segment: u16,
    /// System type (partition type byte copied from the MBR).
    pub system_type: u8,
    /// Size in virtual (512-byte) sectors.
    pub sector_count: u32,
    /// Logical sector number of the image data.
    pub load_rba: u32,
    /// Platform ID.
    pub platform: BootPlatform,
}

/// Boot media type (El Torito).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum BootMediaType {
    /// No emulation.
    NoEmulation = 0,
    /// 1.2MB floppy.
    Floppy12M = 1,
    /// 1.44MB floppy.
    Floppy144M = 2,
    /// 2.88MB floppy.
    Floppy288M = 3,
    /// Hard disk.
    HardDisk = 4,
}

impl BootMediaType {
    /// Decode from the raw media-type byte, defaulting to no-emulation for
    /// unrecognized values (matches the reference implementation, which
    /// treats unknown media types as no-emulation rather than rejecting
    /// the catalog entry outright).
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            1 => BootMediaType::Floppy12M,
            2 => BootMediaType::Floppy144M,
            3 => BootMediaType::Floppy288M,
            4 => BootMediaType::HardDisk,
            _ => BootMediaType::NoEmulation,
        }
    }
}

/// Boot platform ID (El Torito validation entry).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum BootPlatform {
    /// x86 PC.
    X86 = 0,
    /// PowerPC.
    PowerPC = 1,
    /// Mac.
    Mac = 2,
    /// EFI.
    Efi = 0xEF,
}

impl BootPlatform {
    /// Decode from a validation entry's platform ID byte.
    pub fn from_id(id: u8) -> Self {
        match id {
            0x00 => BootPlatform::X86,
            0x01 => BootPlatform::PowerPC,
            0x02 => BootPlatform::Mac,
            0xEF => BootPlatform::Efi,
            _ => BootPlatform::X86,
        }
    }
}

/// Parsed, immutable volume-level information built once at mount time.
#[derive(Debug, Clone)]
pub struct Superblock {
    /// Primary volume identifier (d-characters, trimmed).
    pub volume_id: String,
    /// System identifier (a-characters, trimmed).
    pub system_id: String,
    /// Publisher identifier.
    pub publisher_id: String,
    /// Data preparer identifier.
    pub preparer_id: String,
    /// Application identifier.
    pub application_id: String,
    /// Volume set identifier.
    pub volume_set_id: String,
    /// Root directory extent LSN (primary namespace).
    pub root_lsn: u32,
    /// Root directory extent length in bytes (primary namespace).
    pub root_size: u32,
    /// Root directory extent LSN in the Joliet namespace, if Joliet is
    /// present.
    pub joliet_root_lsn: Option<u32>,
    /// Root directory extent length in the Joliet namespace.
    pub joliet_root_size: Option<u32>,
    /// Logical block size (almost always 2048).
    pub logical_block_size: u16,
    /// Total volume space size, in logical blocks.
    pub volume_space_size: u32,
    /// Joliet escape sequence level (1, 2 or 3), if Joliet was found.
    pub joliet_level: Option<u8>,
    /// Whether the PVD carries the CD-XA marker.
    pub xa: bool,
    /// Whether the disc's raw sectors are CD-ROM Mode 2 (vs. Mode 1);
    /// only determined when a fuzzy mount probes the raw sync header,
    /// otherwise `Unknown`.
    pub mode2: ThreeWay,
    /// Whether Rock Ridge has been confirmed present anywhere under root;
    /// lazily discovered, so starts `Unknown`.
    pub rock_ridge: ThreeWay,
    /// Tracked El Torito boot images (unused slots have `lsn == 0`).
    pub boot_images: [BootImageSlot; MAX_BOOT_IMAGES],
    /// Raw frame size used for this mount (2048 unless opened fuzzy).
    pub frame_size: u32,
    /// Data-start offset within a frame.
    pub data_start: u32,
    /// Fuzzy byte correction discovered at mount time (0 for a normal
    /// mount).
    pub fuzzy_offset: i64,
}

/// One entry returned by a directory listing.
pub type DirEntry = Stat;

/// A directory listing.
pub type DirList = Vec<Stat>;
