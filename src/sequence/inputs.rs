use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::error::PlysResult;

/// List the regular files directly inside `dir`.
///
/// Subdirectories are not descended into. With `extension` set, only files whose extension
/// matches it (ASCII case-insensitive, leading dot optional) are returned. The order is whatever
/// the filesystem yields; the generator sorts its inputs itself.
pub fn list_frame_files(dir: impl AsRef<Path>, extension: Option<&str>) -> PlysResult<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let wanted = extension.map(|e| e.trim_start_matches('.'));

    let mut out = Vec::new();
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("read directory '{}'", dir.display()))?;
    for entry in entries {
        let entry = entry.with_context(|| format!("read directory '{}'", dir.display()))?;
        let path = entry.path();
        // Follows symlinks; broken links are skipped.
        if !path.is_file() {
            continue;
        }

        if let Some(want) = wanted {
            let matches = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case(want));
            if !matches {
                continue;
            }
        }
        out.push(path);
    }

    tracing::debug!(dir = %dir.display(), found = out.len(), "listed frame files");
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/sequence/inputs.rs"]
mod tests;
