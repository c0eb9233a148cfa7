use crate::PackError;
use camino::{Utf8Path, Utf8PathBuf};
use gropack_config::ARCHIVE_EXTENSION;
use gropack_core::{DependencyKey, DependencySet, ResourcePath};
use gropack_infra::list_entries;
use serde::Serialize;
use tracing::{debug, info, warn};

const ZIP_EXTENSION: &str = "zip";

/// Resources the game already provides.
#[derive(Debug, Default)]
pub struct StandardDeps {
    pub set: DependencySet,
    /// Archives read, with the number of files each contributed.
    pub archives: Vec<(String, usize)>,
    /// Single files ignored by name.
    pub files: usize,
    /// Entries that were not found under the root.
    pub missing: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StandardSummary {
    pub keys: usize,
    pub archives: Vec<(String, usize)>,
    pub files: usize,
    pub missing: Vec<String>,
}

impl StandardDeps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn summary(&self) -> StandardSummary {
        StandardSummary {
            keys: self.set.len(),
            archives: self.archives.clone(),
            files: self.files,
            missing: self.missing.clone(),
        }
    }

    /// Add one user entry: an archive contributes its whole index, anything
    /// else is a single file that must exist under the root.
    pub fn add(&mut self, root: &Utf8Path, entry: &str) -> Result<(), PackError> {
        if is_archive(entry) {
            return self.add_archive(root, entry);
        }

        if !root.join(entry).is_file() {
            warn!("Standard dependency {} does not exist", entry);
            self.missing.push(entry.to_string());
            return Ok(());
        }

        if self.set.insert(&DependencyKey::new(entry)) {
            debug!("Ignoring {}", entry);
        }
        self.files += 1;
        Ok(())
    }

    /// Ingest every file name stored in an archive under the root.
    pub fn add_archive(&mut self, root: &Utf8Path, name: &str) -> Result<(), PackError> {
        let path: Utf8PathBuf = root.join(name);
        if !path.is_file() {
            warn!("Standard archive {} does not exist", name);
            self.missing.push(name.to_string());
            return Ok(());
        }

        let entries = list_entries(&path)
            .map_err(|source| PackError::StandardArchive { path, source })?;
        let count = entries.len();
        self.set.extend(entries.iter().map(|e| DependencyKey::new(e)));

        info!("Ignoring {} files from {}", count, name);
        self.archives.push((name.to_string(), count));
        Ok(())
    }
}

/// Build the standard dependency set from user entries.
pub fn collect(root: &Utf8Path, entries: &[String]) -> Result<StandardDeps, PackError> {
    let mut deps = StandardDeps::new();
    for entry in entries {
        deps.add(root, entry)?;
    }
    Ok(deps)
}

fn is_archive(entry: &str) -> bool {
    ResourcePath::extension(entry).is_some_and(|ext| {
        ext.eq_ignore_ascii_case(ARCHIVE_EXTENSION) || ext.eq_ignore_ascii_case(ZIP_EXTENSION)
    })
}
