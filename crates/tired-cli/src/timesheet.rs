//! Reading and rewriting the timesheet file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};

/// Read the timesheet as a list of lines.
///
/// Splits on `\n` only, so joining the result with `\n` reproduces the file.
pub fn read_timesheet(path: &Path) -> anyhow::Result<Vec<String>> {
    tracing::info!(path = %path.display(), "Reading timesheet.");
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read timesheet '{}'", path.display()))?;
    Ok(content.split('\n').map(str::to_string).collect())
}

pub fn file_size(path: &Path) -> anyhow::Result<u64> {
    Ok(fs::metadata(path)
        .with_context(|| format!("failed to stat '{}'", path.display()))?
        .len())
}

pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".bak");
    PathBuf::from(name)
}

/// Replace the timesheet with `lines`, keeping the old file as `<path>.bak`.
///
/// `expected_size` is the size of the file when it was read. If the file
/// changed since then it is left alone; someone else is editing it.
pub fn write_timesheet(path: &Path, lines: &[String], expected_size: u64) -> anyhow::Result<()> {
    tracing::info!(path = %path.display(), "Updating timesheet file.");

    let current = file_size(path)?;
    if current != expected_size {
        bail!(
            "timesheet '{}' changed while processing ({} -> {} bytes)",
            path.display(),
            expected_size,
            current
        );
    }

    let content = lines.join("\n");
    let backup = backup_path(path);
    fs::rename(path, &backup)
        .with_context(|| format!("failed to move '{}' to '{}'", path.display(), backup.display()))?;
    fs::write(path, &content)
        .with_context(|| format!("failed to write '{}'", path.display()))?;

    let written = file_size(path)?;
    if written != content.len() as u64 {
        bail!(
            "timesheet '{}' is {} bytes after writing, expected {}; \
             the previous version is in '{}'",
            path.display(),
            written,
            content.len(),
            backup.display()
        );
    }
    Ok(())
}
