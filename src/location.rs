use std::path::{Component, Path, PathBuf};

use crate::error::AlignmentError;

/// Appended to the last component of an alignment id to name its record.
pub const RECORD_SUFFIX: &str = ".json";

/// Map `(root, id)` to the record location, e.g. `audio/one.mp3` under `out`
/// becomes `out/audio/one.mp3.json`.
///
/// Ids are relative `/`-separated paths without empty, `.` or `..`
/// components. Rejecting those keeps the mapping injective: two distinct
/// accepted ids never name the same file.
pub fn record_path(root: &Path, id: &str) -> Result<PathBuf, AlignmentError> {
    validate_id(id)?;
    let mut path = root.to_path_buf();
    let mut parts = id.split('/').peekable();
    while let Some(part) = parts.next() {
        if parts.peek().is_some() {
            path.push(part);
        } else {
            path.push(format!("{part}{RECORD_SUFFIX}"));
        }
    }
    Ok(path)
}

/// Inverse of [`record_path`]: the id stored at `path` under `root`, if any.
pub fn record_id(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let mut parts = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_str()?),
            _ => return None,
        }
    }
    let last = parts.pop()?;
    let stem = last.strip_suffix(RECORD_SUFFIX)?;
    parts.push(stem);
    let id = parts.join("/");
    validate_id(&id).ok()?;
    Some(id)
}

fn validate_id(id: &str) -> Result<(), AlignmentError> {
    if id.is_empty() {
        return Err(AlignmentError::invalid_input("alignment id is empty"));
    }
    if id.starts_with('/') || id.contains('\\') {
        return Err(AlignmentError::invalid_input(format!(
            "alignment id must be a relative '/'-separated path: {id:?}"
        )));
    }
    if let Some(bad) = id
        .split('/')
        .find(|part| part.is_empty() || *part == "." || *part == "..")
    {
        return Err(AlignmentError::invalid_input(format!(
            "alignment id {id:?} has an invalid path component {bad:?}"
        )));
    }
    Ok(())
}
