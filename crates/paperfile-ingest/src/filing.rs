use std::fs;
use std::path::Path;

use crate::IngestError;

/// Copy `from` to `to`, which must not exist yet.
pub fn copy_file(from: &Path, to: &Path) -> Result<u64, IngestError> {
    fs::copy(from, to).map_err(|source| IngestError::Copy {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    })
}

/// Move `from` to `to`. When a rename isn't possible (e.g. across
/// filesystems) the file is copied and the original removed.
pub fn move_file(from: &Path, to: &Path) -> Result<(), IngestError> {
    let move_err = |source| IngestError::Move {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    };

    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(e) => {
            tracing::debug!(
                from = %from.display(),
                to = %to.display(),
                error = %e,
                "rename failed, falling back to copy and remove"
            );
            fs::copy(from, to).map_err(move_err)?;
            fs::remove_file(from).map_err(move_err)
        }
    }
}
