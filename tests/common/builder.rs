use crate::common::MemoryBlockDevice;

/// One file (or directory entry) the builder will lay out, in insertion
/// order — entries are written to the root directory in the order they
/// were added, matching the on-disc record order the real scanner
/// preserves.
struct FileSpec {
    name: String,
    joliet_name: Option<String>,
    rr_name: Option<String>,
    content: Vec<u8>,
    /// `Some(sizes)` for a file deliberately split across contiguous
    /// extents of the given byte sizes; every size but the last must be
    /// an exact multiple of 2048, matching the decoder's contiguity rule.
    extent_sizes: Option<Vec<u32>>,
}

struct PlannedExtent {
    lba: u32,
    size: u32,
    multi_extent: bool,
}

pub struct IsoBuilder {
    files: Vec<FileSpec>,
    joliet: bool,
}

impl IsoBuilder {
    pub fn new() -> Self {
        Self {
            files: Vec::new(),
            joliet: false,
        }
    }

    pub fn add_file(&mut self, name: &str, content: &[u8]) {
        self.files.push(FileSpec {
            name: name.to_string(),
            joliet_name: None,
            rr_name: None,
            content: content.to_vec(),
            extent_sizes: None,
        });
    }

    /// Adds a file carrying a Rock Ridge alternate name (`NM`) and a
    /// synthesized POSIX-attributes entry (`PX`), alongside its primary
    /// 8.3 identifier.
    pub fn add_file_with_rr(&mut self, name: &str, rr_name: &str, content: &[u8]) {
        self.files.push(FileSpec {
            name: name.to_string(),
            joliet_name: None,
            rr_name: Some(rr_name.to_string()),
            content: content.to_vec(),
            extent_sizes: None,
        });
    }

    /// Adds a file present in both the primary namespace (`name`) and a
    /// Joliet namespace under a distinct name (`joliet_name`); builds an
    /// SVD and a second root directory extent for the Joliet tree.
    pub fn add_file_with_joliet(&mut self, name: &str, joliet_name: &str, content: &[u8]) {
        self.joliet = true;
        self.files.push(FileSpec {
            name: name.to_string(),
            joliet_name: Some(joliet_name.to_string()),
            rr_name: None,
            content: content.to_vec(),
            extent_sizes: None,
        });
    }

    /// Adds a file split across contiguous extents of the given byte
    /// sizes, one directory record per extent, chained via the
    /// multi-extent flag.
    pub fn add_multi_extent_file(&mut self, name: &str, extent_sizes: &[u32]) {
        let total: u32 = extent_sizes.iter().sum();
        self.files.push(FileSpec {
            name: name.to_string(),
            joliet_name: None,
            rr_name: None,
            content: vec![0xCDu8; total as usize],
            extent_sizes: Some(extent_sizes.to_vec()),
        });
    }

    pub fn build(self) -> MemoryBlockDevice {
        let joliet = self.joliet;
        let pvd_lba: u32 = 16;
        let svd_lba: u32 = 17;
        let term_lba: u32 = if joliet { 18 } else { 17 };
        let primary_root_lba: u32 = term_lba + 1;
        let joliet_root_lba: u32 = primary_root_lba + 1;
        let mut next_free_lba = if joliet {
            joliet_root_lba + 1
        } else {
            primary_root_lba + 1
        };

        struct Planned<'a> {
            spec: &'a FileSpec,
            extents: Vec<PlannedExtent>,
        }

        let mut planned: Vec<Planned> = Vec::new();
        for spec in &self.files {
            let mut extents = Vec::new();
            match &spec.extent_sizes {
                Some(sizes) => {
                    let mut lba = next_free_lba;
                    for (i, &size) in sizes.iter().enumerate() {
                        let is_last = i + 1 == sizes.len();
                        let sectors = if is_last {
                            (size as usize).div_ceil(2048)
                        } else {
                            assert!(
                                size % 2048 == 0,
                                "non-final multi-extent piece must be a whole number of sectors"
                            );
                            (size / 2048) as usize
                        };
                        extents.push(PlannedExtent {
                            lba,
                            size,
                            multi_extent: !is_last,
                        });
                        lba += sectors as u32;
                    }
                    next_free_lba = lba;
                }
                None => {
                    let sectors = (spec.content.len().max(1)).div_ceil(2048);
                    extents.push(PlannedExtent {
                        lba: next_free_lba,
                        size: spec.content.len() as u32,
                        multi_extent: false,
                    });
                    next_free_lba += sectors as u32;
                }
            }
            planned.push(Planned { spec, extents });
        }

        let volume_space_size = next_free_lba;
        let mut data = vec![0u8; (next_free_lba as usize + 1) * 2048];

        // 1. PVD
        let pvd_offset = pvd_lba as usize * 2048;
        data[pvd_offset] = 1;
        data[pvd_offset + 1..pvd_offset + 6].copy_from_slice(b"CD001");
        data[pvd_offset + 6] = 1;

        let root_entry_len = 34;
        data[pvd_offset + 156] = root_entry_len;
        Self::write_both_endian_u32(&mut data[pvd_offset + 158..], primary_root_lba);
        Self::write_both_endian_u32(&mut data[pvd_offset + 166..], 2048);
        data[pvd_offset + 181] = 0x02;
        data[pvd_offset + 188] = 1;
        data[pvd_offset + 189] = 0;

        Self::write_both_endian_u32(&mut data[pvd_offset + 80..], volume_space_size);
        Self::write_both_endian_u16(&mut data[pvd_offset + 128..], 2048);

        // 2. SVD (Joliet), if enabled — shares the PVD's field layout, plus
        // an escape-sequence field naming Joliet level 3.
        if joliet {
            let svd_offset = svd_lba as usize * 2048;
            data[svd_offset] = 2;
            data[svd_offset + 1..svd_offset + 6].copy_from_slice(b"CD001");
            data[svd_offset + 6] = 1;
            data[svd_offset + 88] = 0x25;
            data[svd_offset + 89] = 0x2f;
            data[svd_offset + 90] = 0x45;
            data[svd_offset + 156] = root_entry_len;
            Self::write_both_endian_u32(&mut data[svd_offset + 158..], joliet_root_lba);
            Self::write_both_endian_u32(&mut data[svd_offset + 166..], 2048);
            data[svd_offset + 181] = 0x02;
            data[svd_offset + 188] = 1;
            data[svd_offset + 189] = 0;
            Self::write_both_endian_u32(&mut data[svd_offset + 80..], volume_space_size);
            Self::write_both_endian_u16(&mut data[svd_offset + 128..], 2048);
        }

        // 3. Terminator
        let term_offset = term_lba as usize * 2048;
        data[term_offset] = 255;
        data[term_offset + 1..term_offset + 6].copy_from_slice(b"CD001");
        data[term_offset + 6] = 1;

        // 4. Primary root directory
        {
            let root_offset = primary_root_lba as usize * 2048;
            let mut dir_offset = root_offset;
            Self::write_dir_entry(&mut data, &mut dir_offset, primary_root_lba, 2048, 0x02, b"\0", None);
            Self::write_dir_entry(&mut data, &mut dir_offset, primary_root_lba, 2048, 0x02, b"\x01", None);

            for plan in &planned {
                let last = plan.extents.len() - 1;
                for (i, ext) in plan.extents.iter().enumerate() {
                    let flags = if ext.multi_extent { 0x80 } else { 0x00 };
                    let su = if i == last {
                        build_rr_system_use(plan.spec.rr_name.as_deref())
                    } else {
                        None
                    };
                    Self::write_dir_entry(
                        &mut data,
                        &mut dir_offset,
                        ext.lba,
                        ext.size,
                        flags,
                        plan.spec.name.as_bytes(),
                        su.as_deref(),
                    );
                }
            }
        }

        // 5. Joliet root directory — lists single-extent files only; this
        // fixture never needs a multi-extent entry under Joliet.
        if joliet {
            let root_offset = joliet_root_lba as usize * 2048;
            let mut dir_offset = root_offset;
            Self::write_dir_entry(&mut data, &mut dir_offset, joliet_root_lba, 2048, 0x02, b"\0", None);
            Self::write_dir_entry(&mut data, &mut dir_offset, joliet_root_lba, 2048, 0x02, b"\x01", None);

            for plan in &planned {
                if plan.extents.len() != 1 {
                    continue;
                }
                let ext = &plan.extents[0];
                let joliet_name = plan
                    .spec
                    .joliet_name
                    .clone()
                    .unwrap_or_else(|| strip_version_suffix(&plan.spec.name));
                let name_bytes = ucs2be_encode(&joliet_name);
                Self::write_dir_entry(&mut data, &mut dir_offset, ext.lba, ext.size, 0x00, &name_bytes, None);
            }
        }

        // 6. File content
        for plan in &planned {
            let mut written = 0usize;
            for ext in &plan.extents {
                let offset = ext.lba as usize * 2048;
                let len = ext.size as usize;
                data[offset..offset + len].copy_from_slice(&plan.spec.content[written..written + len]);
                written += len;
            }
        }

        MemoryBlockDevice::new(data)
    }

    fn write_both_endian_u32(dst: &mut [u8], value: u32) {
        dst[0..4].copy_from_slice(&value.to_le_bytes());
        dst[4..8].copy_from_slice(&value.to_be_bytes());
    }

    fn write_both_endian_u16(dst: &mut [u8], value: u16) {
        dst[0..2].copy_from_slice(&value.to_le_bytes());
        dst[2..4].copy_from_slice(&value.to_be_bytes());
    }

    fn write_dir_entry(
        data: &mut [u8],
        offset: &mut usize,
        lba: u32,
        size: u32,
        flags: u8,
        name_bytes: &[u8],
        system_use: Option<&[u8]>,
    ) {
        let name_len = name_bytes.len();
        let pad = if name_len % 2 == 0 { 1 } else { 0 };
        let su = system_use.unwrap_or(&[]);
        let entry_len = 33 + name_len + pad + su.len();

        let start = *offset;
        data[start] = entry_len as u8;
        data[start + 1] = 0; // Ext attr len

        Self::write_both_endian_u32(&mut data[start + 2..], lba);
        Self::write_both_endian_u32(&mut data[start + 10..], size);

        // Date (7 bytes) - all zero is fine for test

        data[start + 25] = flags;

        data[start + 28] = 0; // Volume seq
        data[start + 32] = name_len as u8;

        data[start + 33..start + 33 + name_len].copy_from_slice(name_bytes);

        if !su.is_empty() {
            let su_start = start + 33 + name_len + pad;
            data[su_start..su_start + su.len()].copy_from_slice(su);
        }

        *offset += entry_len;
    }
}

/// Builds a `PX` (POSIX attributes) + `NM` (alternate name) SUSP chain for
/// the final record of a directory entry, if it carries a Rock Ridge name.
fn build_rr_system_use(rr_name: Option<&str>) -> Option<Vec<u8>> {
    let rr_name = rr_name?;
    let mut su = Vec::new();

    su.push(b'P');
    su.push(b'X');
    su.push(36); // 4-byte header + 32-byte body
    su.push(1); // version
    let mode: u32 = 0o100644;
    let links: u32 = 1;
    let uid: u32 = 0;
    let gid: u32 = 0;
    for both_endian in [mode, links, uid, gid] {
        su.extend_from_slice(&both_endian.to_le_bytes());
        su.extend_from_slice(&both_endian.to_be_bytes());
    }

    let name_bytes = rr_name.as_bytes();
    su.push(b'N');
    su.push(b'M');
    su.push((5 + name_bytes.len()) as u8); // 4-byte header + flags + name
    su.push(1); // version
    su.push(0); // flags: not a continuation
    su.extend_from_slice(name_bytes);

    Some(su)
}

fn ucs2be_encode(s: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(s.len() * 2);
    for unit in s.encode_utf16() {
        out.extend_from_slice(&unit.to_be_bytes());
    }
    out
}

fn strip_version_suffix(name: &str) -> String {
    name.split(';').next().unwrap_or(name).to_string()
}
