use camino::{Utf8Path, Utf8PathBuf};
use gropack_core::NormalizedPath;

/// Where a scheduled file lives on disk and the name it gets in the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Located {
    pub disk_path: Utf8PathBuf,
    pub entry_name: String,
}

pub trait PathResolver {
    fn locate(&self, file: &NormalizedPath) -> Option<Located>;
}

/// Resolves files against a game root. For alternate-engine runs a second
/// lookup maps `ModelsMP/...`-style directories onto the regular ones.
#[derive(Debug, Clone)]
pub struct DiskResolver {
    root: Utf8PathBuf,
    variant_dirs: bool,
}

impl DiskResolver {
    pub fn new(root: impl Into<Utf8PathBuf>, variant_dirs: bool) -> Self {
        Self {
            root: root.into(),
            variant_dirs,
        }
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    fn try_path(&self, rel: &NormalizedPath) -> Option<Located> {
        let disk_path = self.root.join(rel.as_str());
        disk_path.is_file().then(|| Located {
            disk_path,
            entry_name: rel.as_str().to_string(),
        })
    }
}

impl PathResolver for DiskResolver {
    fn locate(&self, file: &NormalizedPath) -> Option<Located> {
        if let Some(found) = self.try_path(file) {
            return Some(found);
        }
        if !self.variant_dirs {
            return None;
        }
        self.try_path(&file.without_variant_dir()?)
    }
}
