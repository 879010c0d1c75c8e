use indexmap::IndexMap;
use serde::Serialize;
use siteferry_archive::SafePath;

/// Mapping from deployment path to content hash.
///
/// Keys are canonical deployment paths. Inserting an existing key keeps
/// its position and overwrites the hash: last write wins. The map is
/// immutable once handed to the publisher and represents the full file
/// tree of one deployment.
#[derive(Clone, Debug, Default, Serialize)]
pub struct DeploymentManifest(IndexMap<String, String>);

impl DeploymentManifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: SafePath, hash: String) {
        self.0.insert(path.into_string(), hash);
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.0.get(path).map(String::as_str)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.0.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(p, h)| (p.as_str(), h.as_str()))
    }
}
