use std::io::{Read, Seek};

use crate::entry::ArchiveEntry;
use crate::error::{Error, Result};

/// Lazy reader over the entries of an uploaded zip archive.
///
/// Entries are yielded once, in archive order; the sequence is not
/// restartable. Entry bytes are returned raw — nothing inside the
/// archive is interpreted or executed.
pub struct ArchiveReader<R: Read + Seek> {
    archive: zip::ZipArchive<R>,
    index: usize,
}

impl<R: Read + Seek> ArchiveReader<R> {
    /// Open an archive for reading.
    ///
    /// Fails with [`Error::Corrupted`] if the container cannot be
    /// parsed as a zip file.
    pub fn new(reader: R) -> Result<Self> {
        let archive = zip::ZipArchive::new(reader).map_err(|_| Error::Corrupted)?;
        Ok(Self { archive, index: 0 })
    }

    pub fn len(&self) -> usize {
        self.archive.len()
    }

    pub fn is_empty(&self) -> bool {
        self.archive.len() == 0
    }

    fn read_next(&mut self) -> Option<Result<ArchiveEntry>> {
        if self.index >= self.archive.len() {
            return None;
        }

        let mut file = match self.archive.by_index(self.index) {
            Ok(f) => f,
            Err(_) => return Some(Err(Error::Corrupted)),
        };
        self.index += 1;

        // The raw stored name, hostile until sanitized downstream.
        let name = file.name().to_owned();
        let is_directory = file.is_dir();

        let mut bytes = Vec::new();
        if !is_directory && file.read_to_end(&mut bytes).is_err() {
            return Some(Err(Error::Corrupted));
        }

        Some(Ok(ArchiveEntry {
            name,
            bytes,
            is_directory,
        }))
    }
}

impl<R: Read + Seek> Iterator for ArchiveReader<R> {
    type Item = Result<ArchiveEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_next()
    }
}
