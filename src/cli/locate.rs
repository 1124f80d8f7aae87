//! Dataset discovery
//!
//! ディレクトリが指定された場合、最新のエクスポートファイルを選びます。

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// エクスポートファイル名の接頭辞
pub const DATASET_PREFIX: &str = "swipeauth_data_";

/// Resolve `--data` to a dataset file.
///
/// Export names carry a millisecond timestamp, so the lexically greatest name
/// is the newest export.
pub fn resolve_dataset(path: &Path) -> Result<PathBuf> {
    if !path.is_dir() {
        return Ok(path.to_path_buf());
    }

    let mut latest: Option<PathBuf> = None;
    for entry in fs::read_dir(path).with_context(|| format!("cannot read {}", path.display()))? {
        let candidate = entry?.path();
        if !is_dataset_file(&candidate) {
            continue;
        }
        if latest
            .as_ref()
            .map_or(true, |current| candidate.file_name() > current.file_name())
        {
            latest = Some(candidate);
        }
    }

    match latest {
        Some(file) => Ok(file),
        None => bail!(
            "no {}*.json export found in {}",
            DATASET_PREFIX,
            path.display()
        ),
    }
}

fn is_dataset_file(path: &Path) -> bool {
    path.is_file()
        && path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with(DATASET_PREFIX) && name.ends_with(".json"))
}
