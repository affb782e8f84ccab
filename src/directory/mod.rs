//! Directory record parsing and path resolution (C5/C6/C8)

pub mod flags;
pub mod iterator;
pub mod record;

use crate::error::{Iso9660Error, Result};
use crate::io::{BlockSource, SectorReader};
use crate::types::{
    BootImageSlot, DateTime7, FileFlags, Kind, RockRidgeInfo, Stat, ThreeWay, MAX_BOOT_IMAGES,
    MAX_DIRECTORY_DEPTH, SECTOR_SIZE, VIRTUAL_SECTOR_SIZE,
};
use crate::utils::string;
use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec;
use alloc::vec::Vec;
use iterator::DirectoryWalker;

/// Which comparison a path lookup falls back to once an exact match (full
/// name, `;version` suffix and all) fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MatchMode {
    /// `stat`'s contract: case-insensitive fallback only, no `;version`
    /// normalization on the query side.
    Plain,
    /// `stat_translate`'s contract: the full Level 1 translated-name
    /// fallback — `;version` stripped from both sides, case folded.
    Translate,
}

/// Cap on a single directory extent's buffered size, guarding against a
/// corrupt or hostile `data_length` field triggering an unbounded
/// allocation.
const MAX_DIRECTORY_EXTENT_BYTES: u64 = 64 * 1024 * 1024;

/// Call-local scan state: everything a path lookup or listing needs,
/// borrowing the block source by `&mut` rather than living on the image
/// handle. Building a fresh context per call (see design note on
/// concurrency) is what lets the Rock-Ridge "deep directory" variant of
/// [`crate::find::find_lsn`] run a second, differently-configured scan
/// without aliasing the image handle.
pub struct ScanContext<'a, S: BlockSource> {
    /// Sector-granular reader over the underlying source.
    pub reader: SectorReader<'a, S>,
    /// Whether to resolve names through the Joliet namespace.
    pub joliet_active: bool,
    /// Root directory extent for the active namespace.
    pub root_lsn: u32,
    /// Root directory extent size (bytes) for the active namespace.
    pub root_size: u32,
    /// Tracked El Torito boot images, for the synthetic `[BOOT]` namespace.
    pub boot_images: [BootImageSlot; MAX_BOOT_IMAGES],
    /// Whether Rock Ridge relocated (`RE`) directory entries are hidden
    /// from listings and traversal. Normally `true`; [`crate::find`]'s
    /// deep-directory LSN search variant flips this on a shadow scan so
    /// relocated subtrees stay reachable by LSN.
    pub suppress_relocated: bool,
}

fn root_stat(ctx: &ScanContext<impl BlockSource>) -> Stat {
    Stat {
        name: String::new(),
        kind: Kind::Directory,
        lsn: ctx.root_lsn,
        first_extent_size: ctx.root_size,
        total_size: ctx.root_size as u64,
        flags: FileFlags {
            directory: true,
            ..Default::default()
        },
        time: DateTime7::default(),
        xa: ThreeWay::Unknown,
        xa_info: None,
        rock_ridge: RockRidgeInfo::default(),
    }
}

/// Read a directory's entire extent into a freshly allocated, sector-padded
/// buffer.
pub fn read_directory_extent(
    ctx: &mut ScanContext<impl BlockSource>,
    lsn: u32,
    size: u64,
) -> Result<Vec<u8>> {
    if size > MAX_DIRECTORY_EXTENT_BYTES {
        return Err(Iso9660Error::OversizedDirectory);
    }
    let sectors = (size as usize).div_ceil(SECTOR_SIZE) as u32;
    let mut buf = vec![0u8; sectors as usize * SECTOR_SIZE];
    ctx.reader.read_sectors(lsn, sectors, &mut buf)?;
    Ok(buf)
}

fn split_path(path: &str) -> Vec<&str> {
    path.split(['/', '\\']).filter(|c| !c.is_empty()).collect()
}

/// A component matches `entry` under the translated-name fallback if,
/// once any `;version` suffix is stripped from both sides, the names
/// agree — case-folded for a plain Level 1 name, case-sensitively for a
/// full Joliet or Rock Ridge name (whose `;version` suffix and 8.3
/// folding never applied in the first place).
fn translated_match(entry: &Stat, component: &str, joliet_active: bool) -> bool {
    let entry_base = string::strip_version(&entry.name);
    let query_base = string::strip_version(component);
    if joliet_active || entry.rock_ridge.present.is_yes() {
        return entry_base == query_base;
    }
    if !string::is_valid_level1_filename(entry_base) {
        return false;
    }
    string::ascii_lowercase(entry_base) == string::ascii_lowercase(query_base)
}

/// Look up one path component within the directory described by `dir`.
/// Relocated (Rock Ridge `RE`) entries are never matched, matching their
/// suppression from listings and traversal elsewhere in this module.
///
/// An exact match (including any `;version` suffix) always wins first.
/// Failing that, `mode` decides the fallback: [`MatchMode::Plain`] only
/// case-folds (no version stripping), and only outside Joliet/Rock
/// Ridge namespaces; [`MatchMode::Translate`] always tries the full
/// translated-name comparison.
fn find_component(
    ctx: &mut ScanContext<impl BlockSource>,
    dir: &Stat,
    component: &str,
    mode: MatchMode,
) -> Result<Option<Stat>> {
    let buf = read_directory_extent(ctx, dir.lsn, dir.total_size)?;
    let mut fallback: Option<Stat> = None;
    for entry in DirectoryWalker::new(&buf, ctx.joliet_active) {
        let entry = entry?;
        if entry.rock_ridge.relocated && ctx.suppress_relocated {
            continue;
        }
        if entry.name == "." || entry.name == ".." {
            continue;
        }
        if entry.name == component {
            return Ok(Some(entry));
        }
        if fallback.is_some() {
            continue;
        }
        let is_fallback_match = match mode {
            MatchMode::Plain => {
                !ctx.joliet_active
                    && !entry.rock_ridge.present.is_yes()
                    && entry.name.eq_ignore_ascii_case(component)
            }
            MatchMode::Translate => translated_match(&entry, component, ctx.joliet_active),
        };
        if is_fallback_match {
            fallback = Some(entry);
        }
    }
    Ok(fallback)
}

/// Resolve a `/`-separated path to its `Stat`, descending from the active
/// namespace's root. An empty path (or `/`) resolves to a synthetic root
/// directory entry.
pub fn stat(ctx: &mut ScanContext<impl BlockSource>, path: &str) -> Result<Stat> {
    resolve(ctx, path, MatchMode::Plain)
}

fn resolve(ctx: &mut ScanContext<impl BlockSource>, path: &str, mode: MatchMode) -> Result<Stat> {
    let components = split_path(path);
    if components.len() > MAX_DIRECTORY_DEPTH {
        return Err(Iso9660Error::PathTooLong);
    }

    let mut current = root_stat(ctx);
    for component in &components {
        if !current.is_directory() {
            return Err(Iso9660Error::NotFound);
        }
        match find_component(ctx, &current, component, mode)? {
            Some(entry) => current = entry,
            None => return Err(Iso9660Error::NotFound),
        }
    }
    Ok(current)
}

/// Parse a `[BOOT]/<index>-Boot-NoEmul.img` synthetic path, returning the
/// boot image index it names.
fn parse_boot_image_path(path: &str) -> Option<usize> {
    let trimmed = path.trim_start_matches(['/', '\\']);
    let rest = strip_prefix_ignore_case(trimmed, "[BOOT]/")?;
    let mut chars = rest.chars();
    let digit = chars.next()?.to_digit(10)? as usize;
    let suffix = chars.as_str();
    if eq_ignore_ascii_case(suffix, "-Boot-NoEmul.img") {
        Some(digit)
    } else {
        None
    }
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    if s.len() >= prefix.len() && eq_ignore_ascii_case(&s[..prefix.len()], prefix) {
        Some(&s[prefix.len()..])
    } else {
        None
    }
}

fn eq_ignore_ascii_case(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

/// Resolve a path with the added El Torito short-circuit: a name of the
/// form `[BOOT]/<N>-Boot-NoEmul.img` resolves directly to the Nth tracked
/// boot image without consulting the on-disc directory tree at all.
pub fn stat_translate(ctx: &mut ScanContext<impl BlockSource>, path: &str) -> Result<Stat> {
    if let Some(index) = parse_boot_image_path(path) {
        if index >= MAX_BOOT_IMAGES {
            return Err(Iso9660Error::NotFound);
        }
        let slot = ctx.boot_images[index];
        if slot.lsn == 0 || slot.num_sectors == 0 {
            return Err(Iso9660Error::NotFound);
        }
        return Ok(Stat {
            name: format!("{index}-Boot-NoEmul.img"),
            kind: Kind::File,
            lsn: slot.lsn,
            first_extent_size: slot.num_sectors * VIRTUAL_SECTOR_SIZE,
            total_size: slot.num_sectors as u64 * VIRTUAL_SECTOR_SIZE as u64,
            flags: FileFlags::default(),
            time: DateTime7::default(),
            xa: ThreeWay::Unknown,
            xa_info: None,
            rock_ridge: RockRidgeInfo::default(),
        });
    }
    resolve(ctx, path, MatchMode::Translate)
}

fn boot_image_entries(ctx: &ScanContext<impl BlockSource>) -> Vec<Stat> {
    let mut out = Vec::new();
    for (i, slot) in ctx.boot_images.iter().enumerate() {
        if slot.lsn == 0 {
            break;
        }
        out.push(Stat {
            name: format!("{i}-Boot-NoEmul.img"),
            kind: Kind::File,
            lsn: slot.lsn,
            first_extent_size: slot.num_sectors * VIRTUAL_SECTOR_SIZE,
            total_size: slot.num_sectors as u64 * VIRTUAL_SECTOR_SIZE as u64,
            flags: FileFlags::default(),
            time: DateTime7::default(),
            xa: ThreeWay::Unknown,
            xa_info: None,
            rock_ridge: RockRidgeInfo::default(),
        });
    }
    out
}

fn boot_namespace_stat(ctx: &ScanContext<impl BlockSource>) -> Stat {
    Stat {
        name: "[BOOT]".to_string(),
        kind: Kind::Directory,
        lsn: 0,
        first_extent_size: 0,
        total_size: 0,
        flags: FileFlags {
            directory: true,
            ..Default::default()
        },
        time: DateTime7::default(),
        xa: ThreeWay::Unknown,
        xa_info: None,
        rock_ridge: RockRidgeInfo::default(),
    }
}

/// List the contents of a directory.
///
/// Two synthetic behaviors layer on top of the on-disc tree, mirroring
/// the reference implementation's El Torito presentation: listing `/`
/// (or the empty path) prepends a synthetic `[BOOT]` directory entry
/// whenever at least one boot image is tracked, and listing `[BOOT]`
/// itself returns the tracked boot images directly without touching any
/// real directory extent.
pub fn readdir(ctx: &mut ScanContext<impl BlockSource>, path: &str) -> Result<Vec<Stat>> {
    let trimmed = path.trim_start_matches(['/', '\\']);
    if eq_ignore_ascii_case(trimmed, "[BOOT]") || strip_prefix_ignore_case(trimmed, "[BOOT]/").is_some()
    {
        return Ok(boot_image_entries(ctx));
    }

    let dir = stat(ctx, path)?;
    if !dir.is_directory() {
        return Err(Iso9660Error::NotFound);
    }

    let mut out = Vec::new();
    if trimmed.is_empty() && ctx.boot_images[0].lsn != 0 {
        out.push(boot_namespace_stat(ctx));
    }

    let buf = read_directory_extent(ctx, dir.lsn, dir.total_size)?;
    for entry in DirectoryWalker::new(&buf, ctx.joliet_active) {
        let entry = entry?;
        if entry.rock_ridge.relocated && ctx.suppress_relocated {
            continue;
        }
        if entry.name == "." || entry.name == ".." {
            continue;
        }
        out.push(entry);
    }
    Ok(out)
}
