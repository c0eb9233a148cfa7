use crate::deps::DependencyKey;
use crate::NormalizedPath;
use serde::Serialize;
use std::collections::HashSet;

/// A file accepted for packing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduledFile {
    /// 1-based position in acceptance order, for reporting only.
    pub ordinal: usize,
    pub path: NormalizedPath,
}

/// Insertion-ordered list of files to pack, deduplicated case-insensitively.
/// Grows only.
#[derive(Debug, Clone, Default)]
pub struct ScheduledFiles {
    files: Vec<ScheduledFile>,
    keys: HashSet<DependencyKey>,
}

impl ScheduledFiles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file unless a file with the same key is already scheduled.
    /// Returns the new ordinal, or `None` if nothing changed.
    pub fn schedule(&mut self, path: NormalizedPath) -> Option<usize> {
        if !self.keys.insert(path.key()) {
            return None;
        }

        let ordinal = self.files.len() + 1;
        self.files.push(ScheduledFile { ordinal, path });
        Some(ordinal)
    }

    pub fn contains(&self, key: &DependencyKey) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn as_slice(&self) -> &[ScheduledFile] {
        &self.files
    }

    /// Files scheduled after the list had `mark` entries.
    pub fn since(&self, mark: usize) -> &[ScheduledFile] {
        self.files.get(mark..).unwrap_or(&[])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ScheduledFile> {
        self.files.iter()
    }

    pub fn paths(&self) -> impl Iterator<Item = &NormalizedPath> {
        self.files.iter().map(|f| &f.path)
    }
}

impl<'a> IntoIterator for &'a ScheduledFiles {
    type Item = &'a ScheduledFile;
    type IntoIter = std::slice::Iter<'a, ScheduledFile>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.iter()
    }
}
