//! LSN → path search (C7) and the bounded Rock Ridge presence probe
//! exposed as part of the public facade (C9).

use crate::directory::{self, ScanContext};
use crate::error::{Iso9660Error, Result};
use crate::io::BlockSource;
use crate::types::{Stat, ThreeWay};
use alloc::format;
use alloc::string::String;

fn join(parent: &str, name: &str) -> String {
    if parent.is_empty() || parent == "/" {
        format!("/{name}")
    } else {
        format!("{parent}/{name}")
    }
}

fn recurse(
    ctx: &mut ScanContext<impl BlockSource>,
    dir_path: &str,
    target_lsn: u32,
) -> Result<Option<(Stat, String)>> {
    let entries = directory::readdir(ctx, dir_path)?;

    for entry in &entries {
        if entry.lsn == target_lsn {
            return Ok(Some((entry.clone(), join(dir_path, &entry.name))));
        }
    }

    for entry in &entries {
        if !entry.is_directory() {
            continue;
        }
        let child_path = join(dir_path, &entry.name);
        if let Some(found) = recurse(ctx, &child_path, target_lsn)? {
            return Ok(Some(found));
        }
    }

    Ok(None)
}

/// Recursive depth-first directory scan returning the entry whose extent
/// starts at `target_lsn`, along with the full path under which it was
/// found.
///
/// When `deep_rock_ridge` is set, relocated (Rock Ridge `RE`) directories
/// are made visible for the duration of this scan — the "deep directory"
/// variant from the design notes — so a directory relocated under root to
/// work around the 8-level depth limit can still be found by LSN. The
/// context's suppression flag is restored before returning either way.
pub fn find_lsn(
    ctx: &mut ScanContext<impl BlockSource>,
    target_lsn: u32,
    deep_rock_ridge: bool,
) -> Result<(Stat, String)> {
    let prior = ctx.suppress_relocated;
    if deep_rock_ridge {
        ctx.suppress_relocated = false;
    }
    let result = recurse(ctx, "", target_lsn);
    ctx.suppress_relocated = prior;

    result?.ok_or(Iso9660Error::NotFound)
}

fn probe(
    ctx: &mut ScanContext<impl BlockSource>,
    dir_path: &str,
    visited: &mut u32,
    limit: u32,
) -> Result<Option<bool>> {
    let entries = directory::readdir(ctx, dir_path)?;

    for entry in &entries {
        *visited += 1;
        if *visited > limit {
            return Ok(None);
        }
        if entry.rock_ridge.present.is_yes() {
            return Ok(Some(true));
        }
    }

    for entry in &entries {
        if !entry.is_directory() {
            continue;
        }
        let child_path = join(dir_path, &entry.name);
        match probe(ctx, &child_path, visited, limit)? {
            Some(true) => return Ok(Some(true)),
            None => return Ok(None),
            Some(false) => {}
        }
    }

    Ok(Some(false))
}

/// Bounded depth-first traversal from root looking for the first Rock
/// Ridge-bearing entry. Returns `Yes` as soon as one is seen, `No` if the
/// whole tree is exhausted without one, or `Unknown` if `file_limit`
/// entries were visited without an answer (or an internal error
/// occurred).
pub fn have_rr(ctx: &mut ScanContext<impl BlockSource>, file_limit: u32) -> ThreeWay {
    let mut visited = 0u32;
    match probe(ctx, "", &mut visited, file_limit) {
        Ok(Some(true)) => ThreeWay::Yes,
        Ok(Some(false)) => ThreeWay::No,
        Ok(None) => ThreeWay::Unknown,
        Err(_) => ThreeWay::Unknown,
    }
}
