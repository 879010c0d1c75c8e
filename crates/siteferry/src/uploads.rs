use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

/// A transient archive file owned by one upload request.
///
/// The file lives inside the fixed uploads directory for the life of
/// the request. [`TransientArchive::remove`] is the normal release;
/// dropping the value releases it on early-return and panic paths too.
pub struct TransientArchive {
    file: NamedTempFile,
    root: PathBuf,
}

impl TransientArchive {
    /// Write the uploaded bytes into a fresh file under `uploads_dir`.
    pub fn store(uploads_dir: &Path, bytes: &[u8]) -> io::Result<Self> {
        let mut file = tempfile::Builder::new()
            .prefix("upload-")
            .suffix(".zip")
            .tempfile_in(uploads_dir)?;
        file.write_all(bytes)?;
        file.flush()?;
        Ok(Self {
            file,
            root: uploads_dir.to_owned(),
        })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Release the file through the containment guard.
    pub fn remove(self) -> io::Result<()> {
        let Self { file, root } = self;
        safe_unlink(file.path(), &root)?;
        // Already unlinked; disarm the drop-time deletion.
        let _ = file.keep();
        Ok(())
    }
}

/// Delete a transient file, but only if it lives inside `root`.
///
/// The check runs on canonicalized paths, so symlinks cannot point the
/// cleanup at something outside the uploads directory. A missing file
/// is fine; absence is the goal.
pub fn safe_unlink(path: &Path, root: &Path) -> io::Result<()> {
    let root = root.canonicalize()?;
    let resolved = match path.canonicalize() {
        Ok(resolved) => resolved,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(err) => return Err(err),
    };

    if !resolved.starts_with(&root) {
        return Err(io::Error::new(
            io::ErrorKind::PermissionDenied,
            format!(
                "refusing to remove '{}' outside the uploads directory",
                resolved.display()
            ),
        ));
    }

    std::fs::remove_file(resolved)
}
