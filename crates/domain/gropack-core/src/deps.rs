use crate::path_utils::ResourcePath;
use crate::NormalizedPath;
use std::collections::HashSet;
use std::fmt;

pub type KeyDigest = [u8; 16];

/// Lowercase form of a normalized path. Only used for comparisons, never for
/// I/O: the original case is what ends up in the archive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DependencyKey(String);

impl DependencyKey {
    /// Key for an arbitrary name (user input, archive entry).
    pub fn new(raw: &str) -> Self {
        Self(ResourcePath::canonicalize(raw))
    }

    pub fn from_path(path: &NormalizedPath) -> Self {
        Self(path.as_str().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn extension(&self) -> Option<&str> {
        ResourcePath::extension(&self.0)
    }

    pub fn with_extension(&self, ext: &str) -> Self {
        Self(ResourcePath::with_extension(&self.0, &ext.to_lowercase()))
    }

    pub fn without_variant_dir(&self) -> Option<Self> {
        ResourcePath::without_variant_dir(&self.0).map(Self)
    }

    pub fn with_underscores(&self) -> Self {
        Self(ResourcePath::with_underscores(&self.0))
    }

    pub fn digest(&self) -> KeyDigest {
        let mut hasher = md5::Context::new();
        hasher.consume(self.0.as_bytes());
        hasher.finalize().0
    }
}

impl fmt::Display for DependencyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Filenames already satisfied by the game installation or by the user's
/// ignore list. Filled before scanning starts; scanning only queries it.
#[derive(Debug, Clone, Default)]
pub struct DependencySet {
    hashes: HashSet<KeyDigest>,
}

impl DependencySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the key was not present yet.
    pub fn insert(&mut self, key: &DependencyKey) -> bool {
        self.hashes.insert(key.digest())
    }

    pub fn contains(&self, key: &DependencyKey) -> bool {
        self.hashes.contains(&key.digest())
    }

    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }
}

impl Extend<DependencyKey> for DependencySet {
    fn extend<T: IntoIterator<Item = DependencyKey>>(&mut self, iter: T) {
        for key in iter {
            self.insert(&key);
        }
    }
}

impl FromIterator<DependencyKey> for DependencySet {
    fn from_iter<T: IntoIterator<Item = DependencyKey>>(iter: T) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}
