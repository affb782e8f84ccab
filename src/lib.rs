//! ISO9660 Filesystem Reader
//!
//! A `no_std` implementation of a read-only ISO 9660 filesystem reader,
//! with Joliet, Rock Ridge and El Torito support, and a fuzzy recovery
//! mode for BIN/CUE-style raw CD images.
//!
//! # Overview
//!
//! - Volume descriptor parsing (Primary, Supplementary/Joliet, Boot Record)
//! - Directory tree navigation, reconciling the primary, Joliet and Rock
//!   Ridge namespaces into one coherent entry per file
//! - El Torito bootable-CD boot catalog discovery, projected as a
//!   synthetic `[BOOT]` directory
//! - A fuzzy locator that recovers the volume descriptor set from raw
//!   2352/2336-byte CD frames at an unknown byte offset
//!
//! This crate does not stream file contents: callers get extent location
//! and size from [`Stat`] and read the underlying block source directly.
//!
//! # Usage
//!
//! ```ignore
//! use iso9660::{Image, SliceSource};
//!
//! let mut image = Image::open(SliceSource::new(&iso_bytes))?;
//! let entries = image.readdir("/")?;
//! let kernel = image.stat("/boot/vmlinuz")?;
//! ```

#![no_std]
#![warn(missing_docs)]

extern crate alloc;

pub mod boot;
pub mod diag;
pub mod directory;
pub mod error;
pub mod extensions;
pub mod find;
pub mod fuzzy;
pub mod io;
pub mod types;
pub mod utils;
pub mod volume;

pub use error::{Iso9660Error, Result};
pub use io::{BlockSource, GptBlockIoSource, SectorReader, SliceSource};
pub use types::{BootImage, BootMediaType, BootPlatform, ExtensionMask, Stat, ThreeWay};

use alloc::string::String;
use alloc::vec::Vec;
use directory::ScanContext;
use types::Superblock;

fn non_empty(s: &str) -> Option<&str> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

/// A mounted ISO 9660 image.
///
/// Created by [`Image::open`] (or one of its variants); immutable
/// afterwards except for the lazily-discovered Rock Ridge presence flag.
/// Owns the underlying [`BlockSource`] for its lifetime; there is no
/// explicit `close` beyond dropping the handle, though [`Image::close`]
/// hands the source back if the caller wants to reuse it.
pub struct Image<S: BlockSource> {
    source: S,
    superblock: Superblock,
    mask: ExtensionMask,
}

impl<S: BlockSource> Image<S> {
    /// Mount `source` as an ISO 9660 image using the extensions enabled
    /// by this crate's build features.
    pub fn open(source: S) -> Result<Self> {
        Self::open_ext(source, ExtensionMask::from_build_features())
    }

    /// Mount `source` with an explicit extension mask, overriding the
    /// build-feature defaults.
    pub fn open_ext(mut source: S, mask: ExtensionMask) -> Result<Self> {
        let mut reader = SectorReader::new(&mut source, types::SECTOR_SIZE as u32, 0, 0);
        let superblock = volume::scan(&mut reader, mask)?;
        Ok(Self {
            source,
            superblock,
            mask,
        })
    }

    /// Mount `source`, first running the fuzzy locator (§C3) to recover
    /// the frame size, data-start offset and LSN correction, searching
    /// up to `i_fuzz` sectors on either side of LSN 16. Use this for
    /// BIN/CUE-style raw images or other non-2048-byte-sector sources
    /// where a plain [`Image::open`] fails.
    pub fn open_fuzzy(source: S, i_fuzz: u32) -> Result<Self> {
        Self::open_fuzzy_ext(source, ExtensionMask::from_build_features(), i_fuzz)
    }

    /// Fuzzy-mount with an explicit extension mask.
    pub fn open_fuzzy_ext(mut source: S, mask: ExtensionMask, i_fuzz: u32) -> Result<Self> {
        let located = fuzzy::locate(&mut source, i_fuzz)?;
        let mut reader = SectorReader::new(
            &mut source,
            located.frame_size,
            located.data_start,
            located.fuzzy_offset,
        );
        let mut superblock = volume::scan(&mut reader, mask)?;
        superblock.mode2 = located.mode2;
        Ok(Self {
            source,
            superblock,
            mask,
        })
    }

    fn context(&mut self) -> ScanContext<'_, S> {
        let frame_size = self.superblock.frame_size;
        let data_start = self.superblock.data_start;
        let fuzzy_offset = self.superblock.fuzzy_offset;
        let joliet_active = self.superblock.joliet_level.is_some();
        let (root_lsn, root_size) = if joliet_active {
            (
                self.superblock
                    .joliet_root_lsn
                    .unwrap_or(self.superblock.root_lsn),
                self.superblock
                    .joliet_root_size
                    .unwrap_or(self.superblock.root_size),
            )
        } else {
            (self.superblock.root_lsn, self.superblock.root_size)
        };
        let boot_images = self.superblock.boot_images;

        ScanContext {
            reader: SectorReader::new(&mut self.source, frame_size, data_start, fuzzy_offset),
            joliet_active,
            root_lsn,
            root_size,
            boot_images,
            suppress_relocated: true,
        }
    }

    /// Resolve a path to its metadata (C6). Matches names exactly (or,
    /// under Joliet, case-sensitively); falls back to case-insensitive
    /// comparison only when neither Joliet nor a Rock Ridge name applies.
    pub fn stat(&mut self, path: &str) -> Result<Stat> {
        let mut ctx = self.context();
        directory::stat(&mut ctx, path)
    }

    /// Resolve a path to its metadata, with the added
    /// `[BOOT]/<i>-Boot-NoEmul.img` short-circuit for El Torito boot
    /// images (C6 + C8).
    pub fn stat_translate(&mut self, path: &str) -> Result<Stat> {
        let mut ctx = self.context();
        directory::stat_translate(&mut ctx, path)
    }

    /// List a directory's contents, in on-disc order (modulo the
    /// synthetic `[BOOT]` entry prepended at root).
    pub fn readdir(&mut self, path: &str) -> Result<Vec<Stat>> {
        let mut ctx = self.context();
        directory::readdir(&mut ctx, path)
    }

    /// Recursive directory scan (C7) returning the entry whose extent
    /// starts at `target_lsn`, together with the full path it was found
    /// under. Rock Ridge relocated directories are made visible for the
    /// duration of the scan when `deep_rock_ridge` is set.
    pub fn find_lsn(&mut self, target_lsn: u32, deep_rock_ridge: bool) -> Result<(Stat, String)> {
        let mut ctx = self.context();
        find::find_lsn(&mut ctx, target_lsn, deep_rock_ridge)
    }

    /// Bounded depth-first probe for Rock Ridge presence (C9). Caches a
    /// positive result on the handle; a negative or inconclusive result
    /// is never cached, since it depends on `file_limit`.
    pub fn have_rr(&mut self, file_limit: u32) -> ThreeWay {
        if !self.mask.contains(ExtensionMask::ROCK_RIDGE) {
            return ThreeWay::No;
        }
        if self.superblock.rock_ridge.is_yes() {
            return ThreeWay::Yes;
        }
        let mut ctx = self.context();
        let result = find::have_rr(&mut ctx, file_limit);
        if result.is_yes() {
            self.superblock.rock_ridge = ThreeWay::Yes;
        }
        result
    }

    /// Whether the PVD carries the CD-ROM XA marker.
    pub fn is_xa(&self) -> bool {
        self.superblock.xa
    }

    /// The three-valued Mode-2 sector flag, resolved only when the image
    /// was opened with [`Image::open_fuzzy`]/[`Image::open_fuzzy_ext`] and
    /// the raw-sync probe found a mode byte; `Unknown` otherwise.
    pub fn mode2(&self) -> ThreeWay {
        self.superblock.mode2
    }

    /// Joliet level in effect (0 = disabled, else 1, 2 or 3).
    pub fn joliet_level(&self) -> u8 {
        self.superblock.joliet_level.unwrap_or(0)
    }

    /// Primary volume identifier, trimmed; `None` if empty.
    pub fn volume_id(&self) -> Option<&str> {
        non_empty(&self.superblock.volume_id)
    }

    /// System identifier, trimmed; `None` if empty.
    pub fn system_id(&self) -> Option<&str> {
        non_empty(&self.superblock.system_id)
    }

    /// Publisher identifier, trimmed; `None` if empty.
    pub fn publisher_id(&self) -> Option<&str> {
        non_empty(&self.superblock.publisher_id)
    }

    /// Data preparer identifier, trimmed; `None` if empty.
    pub fn preparer_id(&self) -> Option<&str> {
        non_empty(&self.superblock.preparer_id)
    }

    /// Application identifier, trimmed; `None` if empty.
    pub fn application_id(&self) -> Option<&str> {
        non_empty(&self.superblock.application_id)
    }

    /// Volume set identifier, trimmed; `None` if empty.
    pub fn volume_set_id(&self) -> Option<&str> {
        non_empty(&self.superblock.volume_set_id)
    }

    /// Total volume space size, in logical blocks.
    pub fn volume_space_size(&self) -> u32 {
        self.superblock.volume_space_size
    }

    /// Logical block size in bytes (almost always 2048).
    pub fn logical_block_size(&self) -> u16 {
        self.superblock.logical_block_size
    }

    /// Root directory extent LSN, in the primary namespace.
    pub fn root_lsn(&self) -> u32 {
        self.superblock.root_lsn
    }

    /// Root directory extent size in bytes, in the primary namespace.
    pub fn root_size(&self) -> u32 {
        self.superblock.root_size
    }

    /// Release the handle, returning the underlying source.
    pub fn close(self) -> S {
        self.source
    }
}
