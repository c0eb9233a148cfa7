use serde::Serialize;
use std::fmt;

pub mod deps;
pub mod path_utils;
pub mod schedule;
pub mod variant;

pub use deps::{DependencyKey, DependencySet, KeyDigest};
pub use path_utils::ResourcePath;
pub use schedule::{ScheduledFile, ScheduledFiles};
pub use variant::VariantFlags;

/// A resource path in canonical form: forward slashes only, no duplicate
/// separators, no leading separator. Case is preserved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NormalizedPath(pub(crate) String);

impl NormalizedPath {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn key(&self) -> DependencyKey {
        DependencyKey::from_path(self)
    }

    pub fn extension(&self) -> Option<&str> {
        ResourcePath::extension(&self.0)
    }

    pub fn with_extension(&self, ext: &str) -> Self {
        Self(ResourcePath::with_extension(&self.0, ext))
    }

    /// Same stem with `suffix` glued on (`Map.wld` + `.vis` -> `Map.vis`).
    pub fn sibling(&self, suffix: &str) -> Self {
        Self(ResourcePath::sibling(&self.0, suffix))
    }

    pub fn without_variant_dir(&self) -> Option<Self> {
        ResourcePath::without_variant_dir(&self.0).map(Self)
    }
}

impl fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NormalizedPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Files one scanned source added to the list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanReport {
    pub source: NormalizedPath,
    pub added: Vec<ScheduledFile>,
}

impl ScanReport {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty()
    }
}
