//! Byte-addressable source abstraction.
//!
//! The on-disc scan needs arbitrary byte offsets: normal 2048-byte-sector
//! mounts, but also the fuzzy locator's raw CD frames (2352/2336 bytes)
//! which never line up with a fixed block size. `BlockSource` is the seam;
//! [`GptBlockIoSource`] adapts any `gpt_disk_io::BlockIo` device to it by
//! covering the requested range with whole-block reads.

use crate::error::{Iso9660Error, Result};
use alloc::vec;
use gpt_disk_io::BlockIo;
use gpt_disk_types::Lba;

/// A source of bytes addressed by absolute offset, independent of any
/// particular block size.
pub trait BlockSource {
    /// Read `buf.len()` bytes starting at absolute byte `offset`.
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<()>;
}

/// Adapts a fixed-block-size [`BlockIo`] device to [`BlockSource`].
///
/// Reads are rounded out to whole blocks and the requested slice is copied
/// out of a scratch buffer, so callers can request byte ranges that don't
/// start or end on a block boundary (as the fuzzy locator does).
pub struct GptBlockIoSource<'a, B: BlockIo> {
    device: &'a mut B,
    block_size: u64,
}

impl<'a, B: BlockIo> GptBlockIoSource<'a, B> {
    /// Wrap a block device. Reads the device's block size once up front.
    pub fn new(device: &'a mut B) -> Self {
        let block_size = device.block_size().to_u64();
        Self { device, block_size }
    }
}

impl<'a, B: BlockIo> BlockSource for GptBlockIoSource<'a, B> {
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<()> {
        if buf.is_empty() {
            return Ok(());
        }
        let bs = self.block_size;
        let first_block = offset / bs;
        let end = offset + buf.len() as u64;
        let last_block = (end - 1) / bs;
        let block_count = last_block - first_block + 1;
        let scratch_len = (block_count * bs) as usize;
        let mut scratch = vec![0u8; scratch_len];
        self.device
            .read_blocks(Lba(first_block), &mut scratch)
            .map_err(|_| Iso9660Error::IoError)?;
        let start_in_scratch = (offset - first_block * bs) as usize;
        buf.copy_from_slice(&scratch[start_in_scratch..start_in_scratch + buf.len()]);
        Ok(())
    }
}

/// A plain in-memory byte slice used as a [`BlockSource`], mainly for tests
/// and for hosts that have already mapped the whole image into memory.
pub struct SliceSource<'a> {
    data: &'a [u8],
}

impl<'a> SliceSource<'a> {
    /// Wrap a byte slice.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }
}

impl<'a> BlockSource for SliceSource<'a> {
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<()> {
        let start = offset as usize;
        let end = start
            .checked_add(buf.len())
            .ok_or(Iso9660Error::ExtentOutOfBounds)?;
        if end > self.data.len() {
            return Err(Iso9660Error::ExtentOutOfBounds);
        }
        buf.copy_from_slice(&self.data[start..end]);
        Ok(())
    }
}

/// Reads whole logical (2048-byte) sectors out of a [`BlockSource`],
/// translating through a raw frame size and the fuzzy/data-start offsets
/// the same way `iso9660_seek_read_framesize` does in the reference
/// implementation this crate is modeled on.
pub struct SectorReader<'a, S: BlockSource> {
    source: &'a mut S,
    /// Raw frame size in bytes (2048, 2352 or 2336).
    pub frame_size: u32,
    /// Offset within a frame where the 2048-byte logical sector payload
    /// begins (0 for plain 2048-byte images, `CDIO_CD_SYNC_SIZE` for raw
    /// frames).
    pub data_start: u32,
    /// Byte correction discovered by the fuzzy locator.
    pub fuzzy_offset: i64,
}

impl<'a, S: BlockSource> SectorReader<'a, S> {
    /// Wrap a source with an explicit framing.
    pub fn new(source: &'a mut S, frame_size: u32, data_start: u32, fuzzy_offset: i64) -> Self {
        Self {
            source,
            frame_size,
            data_start,
            fuzzy_offset,
        }
    }

    /// Read one 2048-byte logical sector at logical sector number `lsn`.
    pub fn read_sector(&mut self, lsn: u32, buf: &mut [u8; 2048]) -> Result<()> {
        let byte_offset = (lsn as i64) * (self.frame_size as i64)
            + self.fuzzy_offset
            + self.data_start as i64;
        if byte_offset < 0 {
            return Err(Iso9660Error::ExtentOutOfBounds);
        }
        self.source.read_at(byte_offset as u64, buf)
    }

    /// Read `count` consecutive logical sectors starting at `lsn` into a
    /// contiguous 2048-byte-stride buffer (`buf.len() == count * 2048`).
    pub fn read_sectors(&mut self, lsn: u32, count: u32, buf: &mut [u8]) -> Result<()> {
        debug_assert_eq!(buf.len(), count as usize * 2048);
        for i in 0..count {
            let mut sector = [0u8; 2048];
            self.read_sector(lsn + i, &mut sector)?;
            let start = i as usize * 2048;
            buf[start..start + 2048].copy_from_slice(&sector);
        }
        Ok(())
    }
}
