//! Directory block walking (C5)
//!
//! Walks the raw bytes of an already-read directory extent, yielding one
//! decoded [`Stat`] per file (folding multi-extent chains together) and
//! skipping the rest of a 2048-byte block once a zero-length record or a
//! record that would cross a block boundary is seen — directory records
//! never span a logical block, so whichever comes first marks "nothing
//! more in this block".

use crate::diag::trace_warn;
use crate::directory::record::{self, DecodeStep};
use crate::error::Result;
use crate::types::Stat;

/// Whether advancing `offset` by the current record's declared length
/// would leave the current 2048-byte block, or the record is the
/// zero-length end-of-block sentinel. If so, returns the offset of the
/// start of the next block; otherwise `None`.
pub fn block_boundary_skip(buf: &[u8], offset: usize) -> Option<usize> {
    let block_start = offset & !2047;
    let next_block = block_start + 2048;
    if offset >= buf.len() {
        return Some(next_block);
    }
    let len = buf[offset] as usize;
    if len == 0 {
        return Some(next_block);
    }
    let record_end = offset + len;
    if record_end > next_block {
        return Some(next_block);
    }
    None
}

/// Iterates decoded `Stat`s out of a pre-read directory extent buffer.
///
/// `buf.len()` must be a multiple of 2048 (the caller allocates whole
/// sectors). Malformed individual records are skipped (with a trace) so
/// one bad chain doesn't abort the entire listing; this mirrors the
/// "ill chain" skip-mode the reference implementation uses while
/// walking a directory.
pub struct DirectoryWalker<'a> {
    buf: &'a [u8],
    offset: usize,
    joliet_active: bool,
    pending: Option<Stat>,
}

impl<'a> DirectoryWalker<'a> {
    /// Start walking `buf` from the beginning.
    pub fn new(buf: &'a [u8], joliet_active: bool) -> Self {
        Self {
            buf,
            offset: 0,
            joliet_active,
            pending: None,
        }
    }
}

impl<'a> Iterator for DirectoryWalker<'a> {
    type Item = Result<Stat>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(skip_to) = block_boundary_skip(self.buf, self.offset) {
                if self.pending.is_some() {
                    // A chain that never reached a final record: drop it,
                    // matching the reference implementation's "ill chain"
                    // skip behavior.
                    trace_warn!("multi-extent chain truncated at block boundary");
                    self.pending = None;
                }
                if skip_to >= self.buf.len() {
                    return None;
                }
                self.offset = skip_to;
                continue;
            }

            let len = self.buf[self.offset] as usize;
            let raw = &self.buf[self.offset..self.offset + len];
            self.offset += len;

            match record::decode(raw, self.joliet_active, self.pending.take()) {
                Ok(DecodeStep::Continuing(stat)) => {
                    self.pending = Some(stat);
                    continue;
                }
                Ok(DecodeStep::Final(stat)) => return Some(Ok(stat)),
                Err(e) => {
                    trace_warn!("skipping ill-formed directory record");
                    return Some(Err(e));
                }
            }
        }
    }
}
