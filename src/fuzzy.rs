//! Fuzzy volume-descriptor locator (C3)
//!
//! Used when a plain 2048-byte-sector mount at LSN 16 fails to validate:
//! scans nearby LSNs across the three CD frame sizes for the literal
//! `"CD001"` signature, and on a hit commits the frame size, data-start
//! offset and signed fuzzy LSN correction that make the sector reader see
//! a clean 2048-byte logical view from then on. Grounded in
//! `iso9660_ifs_fuzzy_read_superblock`/`adjust_fuzzy_pvd` from the
//! reference implementation this crate is modeled on.

use crate::diag::trace_debug;
use crate::error::{Iso9660Error, Result};
use crate::io::{BlockSource, SectorReader};
use crate::types::{ThreeWay, CD_FRAMESIZE_RAW, CD_SYNC_SIZE, M2RAW_SECTOR_SIZE, SECTOR_SIZE};
use crate::volume::VolumeDescriptorHeader;

/// CD-ROM raw-sector sync pattern: 00 FF×10 00.
const SYNC_PATTERN: [u8; 12] = [0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x00];

/// Frame sizes tried, in order, for each candidate LSN.
const FRAME_SIZES: [u32; 3] = [SECTOR_SIZE as u32, CD_FRAMESIZE_RAW, M2RAW_SECTOR_SIZE];

/// Outcome of a successful fuzzy locate: the framing the caller should
/// hand to [`crate::volume::scan`], plus whatever the raw-sync probe
/// learned about the disc's sector mode.
pub struct FuzzyResult {
    /// Raw frame size in bytes.
    pub frame_size: u32,
    /// Payload offset within a frame.
    pub data_start: u32,
    /// Signed LSN-to-byte correction.
    pub fuzzy_offset: i64,
    /// Sector mode, if the sync probe (2352-byte frames only) determined it.
    pub mode2: ThreeWay,
}

fn data_start_for(frame_size: u32) -> u32 {
    if frame_size == SECTOR_SIZE as u32 {
        0
    } else {
        CD_SYNC_SIZE
    }
}

/// Probe the frame's leading 16 bytes for the raw-sector sync pattern; if
/// present, byte 15 is the mode byte (1 or 2).
fn probe_mode(frame: &[u8]) -> ThreeWay {
    if frame.len() < 16 || frame[0..12] != SYNC_PATTERN {
        return ThreeWay::Unknown;
    }
    match frame[15] {
        2 => ThreeWay::Yes,
        1 => ThreeWay::No,
        _ => ThreeWay::Unknown,
    }
}

/// Search for a valid PVD within `±i_fuzz` logical sectors of LSN 16,
/// across each of the three known CD frame sizes.
pub fn locate(source: &mut impl BlockSource, i_fuzz: u32) -> Result<FuzzyResult> {
    let mut offsets: alloc::vec::Vec<i64> = alloc::vec::Vec::new();
    offsets.push(0);
    for i in 1..=i_fuzz as i64 {
        offsets.push(-i);
        offsets.push(i);
    }

    for offset in offsets {
        let candidate_lsn = 16i64 + offset;
        if candidate_lsn < 0 {
            continue;
        }
        for &frame_size in &FRAME_SIZES {
            let base = candidate_lsn * frame_size as i64;
            let mut frame = alloc::vec![0u8; frame_size as usize];
            if source.read_at(base as u64, &mut frame).is_err() {
                continue;
            }

            let hit = match frame.windows(5).position(|w| w == b"CD001") {
                Some(p) => p,
                None => continue,
            };

            let fuzzy_offset = (hit as i64 - 1) - (16 - candidate_lsn) * frame_size as i64;
            let data_start = data_start_for(frame_size);

            let mut reader = SectorReader::new(source, frame_size, data_start, fuzzy_offset);
            let mut sector = [0u8; SECTOR_SIZE];
            if reader.read_sector(16, &mut sector).is_err() {
                continue;
            }
            let header = unsafe { &*(sector.as_ptr() as *const VolumeDescriptorHeader) };
            if !header.validate() || header.type_code != 1 {
                continue;
            }

            let mode2 = if frame_size == CD_FRAMESIZE_RAW {
                probe_mode(&frame)
            } else {
                ThreeWay::Unknown
            };

            trace_debug!(
                "fuzzy locate hit: lsn={} frame_size={} data_start={} fuzzy_offset={}",
                candidate_lsn,
                frame_size,
                data_start,
                fuzzy_offset
            );

            return Ok(FuzzyResult {
                frame_size,
                data_start,
                fuzzy_offset,
                mode2,
            });
        }
    }

    Err(Iso9660Error::InvalidSignature)
}
