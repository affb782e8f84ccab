//! Extent resolution tests.
//!
//! This crate resolves a path to its extent location and size; it does
//! not stream file contents itself. These tests follow that contract:
//! `Image::stat` gives the extent, and the caller reads the bytes back
//! directly off the same `BlockSource` (a cloned device, since `Image`
//! takes ownership of the one it mounts).

mod common;

use common::{IsoBuilder, MemoryBlockDevice};
use iso9660::{BlockSource, Image};

fn read_extent(device: &mut MemoryBlockDevice, lsn: u32, size: u32) -> Vec<u8> {
    let mut buf = vec![0u8; size as usize];
    device
        .read_at(lsn as u64 * 2048, &mut buf)
        .expect("read should succeed");
    buf
}

#[test]
fn test_stat_resolves_file_content_via_block_source() {
    let mut builder = IsoBuilder::new();
    builder.add_file("TEST.TXT", b"Hello ISO9660");
    let device = builder.build();
    let mut raw = device.clone();

    let mut image = Image::open(device).expect("mount");
    let entry = image.stat("/TEST.TXT").expect("find");

    let content = read_extent(&mut raw, entry.lsn, entry.total_size as u32);
    assert_eq!(&content[..b"Hello ISO9660".len()], b"Hello ISO9660");
}

#[test]
fn test_stat_extent_crossing_sectors() {
    let mut builder = IsoBuilder::new();
    // Content spanning 2.5 sectors (2048 * 2 + 1024 = 5120 bytes)
    let mut expected_content = Vec::new();
    for i in 0..5120 {
        expected_content.push((i % 256) as u8);
    }

    builder.add_file("LARGE.DAT", &expected_content);
    let device = builder.build();
    let mut raw = device.clone();

    let mut image = Image::open(device).expect("mount");
    let entry = image.stat("/LARGE.DAT").expect("find");

    assert_eq!(entry.total_size, 5120);

    let content = read_extent(&mut raw, entry.lsn, entry.total_size as u32);
    assert_eq!(content, expected_content);
}

#[test]
fn test_stat_extent_partial_last_sector() {
    let mut builder = IsoBuilder::new();
    // 2050 bytes = 1 sector + 2 bytes
    let expected_content = vec![0xAAu8; 2050];

    builder.add_file("PARTIAL.DAT", &expected_content);
    let device = builder.build();
    let mut raw = device.clone();

    let mut image = Image::open(device).expect("mount");
    let entry = image.stat("/PARTIAL.DAT").expect("find");

    assert_eq!(entry.total_size, 2050);

    let content = read_extent(&mut raw, entry.lsn, entry.total_size as u32);
    assert_eq!(content, expected_content);
}
