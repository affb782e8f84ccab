//! Multi-extent file tests.

mod common;

use common::IsoBuilder;
use iso9660::Image;

#[test]
fn test_multi_extent_file_aggregates_total_size() {
    // A two-part file whose extents are contiguous yields a single stat
    // whose total_size equals the sum of both parts.
    let mut builder = IsoBuilder::new();
    builder.add_multi_extent_file("BIG.DAT", &[4096, 500]);
    let device = builder.build();
    let mut image = Image::open(device).expect("mount should succeed");

    let stat = image.stat("/BIG.DAT").expect("multi-extent file should resolve");
    assert_eq!(stat.total_size, 4096 + 500);
    assert_eq!(stat.first_extent_size, 4096);
}

#[test]
fn test_multi_extent_gap_is_skipped_without_crashing() {
    // If the second extent of a multi-extent chain is moved so it is no
    // longer contiguous with the first, the decoder must reject that
    // chain rather than return a corrupt stat — and readdir must not
    // crash, simply omitting the broken entry.
    let mut builder = IsoBuilder::new();
    builder.add_multi_extent_file("BIG.DAT", &[4096, 500]);
    let mut device = builder.build();

    // The continuation record for the second extent lives right after
    // the first in the root directory; its extent LBA field sits at
    // record offset 2 (both-endian u32). Bump it by one sector to break
    // contiguity with the first extent.
    // No Joliet files were added, so layout is PVD(16)/terminator(17)/
    // primary root(18).
    let root_dir_offset = 18 * 2048;
    let first_record_len = device.data[root_dir_offset] as usize; // "."
    let second_record_len = device.data[root_dir_offset + first_record_len] as usize; // ".."
    let first_file_record = root_dir_offset + first_record_len + second_record_len;
    let first_file_len = device.data[first_file_record] as usize;
    let continuation_record = first_file_record + first_file_len;

    let lba_field = continuation_record + 2;
    let bumped_lba = u32::from_le_bytes([
        device.data[lba_field],
        device.data[lba_field + 1],
        device.data[lba_field + 2],
        device.data[lba_field + 3],
    ]) + 1;
    device.data[lba_field..lba_field + 4].copy_from_slice(&bumped_lba.to_le_bytes());
    device.data[lba_field + 4..lba_field + 8].copy_from_slice(&bumped_lba.to_be_bytes());

    let mut image = Image::open(device).expect("mount should still succeed");
    let result = image.readdir("/");
    assert!(result.is_err(), "a broken multi-extent chain must not silently resolve");
}
