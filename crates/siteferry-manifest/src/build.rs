use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::Serialize;
use sha2::Digest;
use siteferry_archive::{ArchiveEntry, Rejected, sanitize};

use crate::error::{Error, Result};
use crate::manifest::DeploymentManifest;
use crate::media::content_type_for;

/// One content-addressed asset awaiting upload, shaped for the
/// platform's assets endpoint.
#[derive(Clone, Debug, Serialize)]
pub struct UploadItem {
    pub key: String,
    pub value: String,
    pub metadata: UploadMetadata,
    pub base64: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct UploadMetadata {
    #[serde(rename = "contentType")]
    pub content_type: String,
}

/// Everything derived from one uploaded archive: the upload batch, the
/// manifest, and the entries the sanitizer dropped.
#[derive(Clone, Debug)]
pub struct ArchiveBuild {
    pub batch: Vec<UploadItem>,
    pub manifest: DeploymentManifest,
    pub rejected: Vec<Rejected>,
}

/// Stable content digest, hex encoded. A pure function of the bytes:
/// identical content always produces the same key, so the platform
/// deduplicates identical files across paths for free.
pub fn content_hash(bytes: &[u8]) -> String {
    let mut hasher = sha2::Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Consume archive entries and produce the upload batch and manifest.
///
/// Directory entries are skipped. Entries refused by the sanitizer are
/// collected and excluded from both outputs without aborting the pass.
/// An archive yielding no uploadable file at all is not a valid
/// deployment source and fails with [`Error::EmptyArchive`].
pub fn build<I>(entries: I) -> Result<ArchiveBuild>
where
    I: IntoIterator<Item = siteferry_archive::Result<ArchiveEntry>>,
{
    let mut batch = Vec::new();
    let mut manifest = DeploymentManifest::new();
    let mut rejected = Vec::new();

    for entry in entries {
        let entry = entry?;
        if entry.is_directory {
            continue;
        }

        let path = match sanitize(&entry.name) {
            Ok(path) => path,
            Err(dropped) => {
                rejected.push(dropped);
                continue;
            }
        };

        let key = content_hash(&entry.bytes);
        batch.push(UploadItem {
            key: key.clone(),
            value: BASE64.encode(&entry.bytes),
            metadata: UploadMetadata {
                content_type: content_type_for(path.as_str()).to_owned(),
            },
            base64: true,
        });
        manifest.insert(path, key);
    }

    if batch.is_empty() {
        return Err(Error::EmptyArchive);
    }

    Ok(ArchiveBuild {
        batch,
        manifest,
        rejected,
    })
}

#[cfg(test)]
mod tests {
    use siteferry_archive::RejectReason;

    use super::*;

    fn file(name: &str, bytes: &[u8]) -> siteferry_archive::Result<ArchiveEntry> {
        Ok(ArchiveEntry {
            name: name.into(),
            bytes: bytes.to_vec(),
            is_directory: false,
        })
    }

    fn dir(name: &str) -> siteferry_archive::Result<ArchiveEntry> {
        Ok(ArchiveEntry {
            name: name.into(),
            bytes: Vec::new(),
            is_directory: true,
        })
    }

    #[test]
    fn one_batch_item_and_manifest_entry_per_file() {
        let build = build(vec![
            file("index.html", b"<h1>a</h1>"),
            file("assets/app.js", b"let x = 1;"),
        ])
        .unwrap();

        assert_eq!(build.batch.len(), 2);
        assert_eq!(build.manifest.len(), 2);
        assert!(build.manifest.contains("/index.html"));
        assert!(build.manifest.contains("/assets/app.js"));
        assert!(build.rejected.is_empty());
    }

    #[test]
    fn traversal_entry_dropped_without_aborting() {
        let build = build(vec![
            file("index.html", b"<h1>a</h1>"),
            file("../secret.txt", b"top secret"),
            file("assets/app.js", b"let x = 1;"),
        ])
        .unwrap();

        assert!(build.manifest.contains("/index.html"));
        assert!(build.manifest.contains("/assets/app.js"));
        assert_eq!(build.manifest.len(), 2);
        assert!(!build.batch.iter().any(|i| i.value == BASE64.encode(b"top secret")));

        assert_eq!(build.rejected.len(), 1);
        assert_eq!(build.rejected[0].name, "../secret.txt");
        assert_eq!(build.rejected[0].reason, RejectReason::EscapesRoot);
    }

    #[test]
    fn manifest_never_contains_paths_outside_root() {
        let build = build(vec![
            file("ok.txt", b"ok"),
            file("../../etc/passwd", b"root"),
            file("..\\evil.txt", b"evil"),
            file("a/../../b.txt", b"b"),
        ])
        .unwrap();

        assert_eq!(build.manifest.len(), 1);
        assert!(build.manifest.contains("/ok.txt"));
        assert_eq!(build.rejected.len(), 3);
    }

    #[test]
    fn directories_are_skipped_silently() {
        let build = build(vec![
            dir("assets/"),
            file("assets/app.js", b"let x = 1;"),
        ])
        .unwrap();

        assert_eq!(build.batch.len(), 1);
        assert!(build.rejected.is_empty());
    }

    #[test]
    fn directories_only_is_empty_archive() {
        let result = build(vec![dir("assets/"), dir("images/")]);
        assert!(matches!(result, Err(Error::EmptyArchive)));
    }

    #[test]
    fn unsafe_only_is_empty_archive() {
        let result = build(vec![
            file("../a.txt", b"a"),
            file("/etc/passwd", b"root"),
        ]);
        assert!(matches!(result, Err(Error::EmptyArchive)));
    }

    #[test]
    fn no_entries_is_empty_archive() {
        let result = build(Vec::new());
        assert!(matches!(result, Err(Error::EmptyArchive)));
    }

    #[test]
    fn identical_bytes_share_a_key() {
        let build = build(vec![
            file("a/copy.txt", b"same bytes"),
            file("b/copy.txt", b"same bytes"),
        ])
        .unwrap();

        assert_eq!(build.batch[0].key, build.batch[1].key);
        assert_eq!(
            build.manifest.get("/a/copy.txt"),
            build.manifest.get("/b/copy.txt")
        );
    }

    #[test]
    fn hashing_is_deterministic() {
        assert_eq!(content_hash(b"payload"), content_hash(b"payload"));
        assert_ne!(content_hash(b"payload"), content_hash(b"payload2"));
    }

    #[test]
    fn duplicate_paths_last_write_wins() {
        let build = build(vec![
            file("index.html", b"first"),
            file("index.html", b"second"),
        ])
        .unwrap();

        assert_eq!(build.manifest.len(), 1);
        assert_eq!(
            build.manifest.get("/index.html"),
            Some(content_hash(b"second").as_str())
        );
    }

    #[test]
    fn payloads_are_base64_encoded_with_content_types() {
        let build = build(vec![file("index.html", b"<h1>a</h1>")]).unwrap();

        let item = &build.batch[0];
        assert_eq!(item.value, BASE64.encode(b"<h1>a</h1>"));
        assert_eq!(item.metadata.content_type, "text/html");
        assert!(item.base64);
        assert_eq!(item.key, content_hash(b"<h1>a</h1>"));
    }

    #[test]
    fn reader_error_propagates() {
        let entries = vec![
            file("index.html", b"<h1>a</h1>"),
            Err(siteferry_archive::Error::Corrupted),
        ];
        assert!(matches!(build(entries), Err(Error::Archive(_))));
    }

    #[test]
    fn upload_item_wire_shape() {
        let build = build(vec![file("index.html", b"hi")]).unwrap();
        let json = serde_json::to_value(&build.batch[0]).unwrap();
        assert_eq!(json["metadata"]["contentType"], "text/html");
        assert_eq!(json["base64"], true);
        assert!(json["key"].is_string());
        assert!(json["value"].is_string());
    }
}
