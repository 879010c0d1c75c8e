/// A single entry as stored in the uploaded archive.
///
/// The name is the raw string from the container and must be treated as
/// hostile until it passes [`crate::sanitize`]. Entries are ephemeral:
/// produced once by the reader, consumed once downstream.
#[derive(Clone, Debug)]
pub struct ArchiveEntry {
    pub name: String,
    pub bytes: Vec<u8>,
    pub is_directory: bool,
}

impl ArchiveEntry {
    pub fn is_file(&self) -> bool {
        !self.is_directory
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_entry() {
        let entry = ArchiveEntry {
            name: "index.html".into(),
            bytes: b"<h1>hi</h1>".to_vec(),
            is_directory: false,
        };
        assert!(entry.is_file());
    }

    #[test]
    fn directory_entry() {
        let entry = ArchiveEntry {
            name: "assets/".into(),
            bytes: Vec::new(),
            is_directory: true,
        };
        assert!(!entry.is_file());
    }
}
