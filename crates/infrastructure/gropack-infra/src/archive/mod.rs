use camino::{Utf8Path, Utf8PathBuf};
use gropack_config::normalize_store_extension;
use gropack_core::{NormalizedPath, ResourcePath, ScheduledFile};
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use tracing::{debug, info};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

mod resolve;
pub use resolve::{DiskResolver, Located, PathResolver};

#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

/// Extensions that are packed without compression.
#[derive(Debug, Clone, Default)]
pub struct StorePolicy {
    stored: HashSet<String>,
}

impl StorePolicy {
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            stored: extensions
                .into_iter()
                .map(|e| normalize_store_extension(e.as_ref()))
                .filter(|e| !e.is_empty())
                .collect(),
        }
    }

    pub fn is_stored(&self, entry_name: &str) -> bool {
        ResourcePath::extension(entry_name)
            .map(|ext| self.stored.contains(&ext.to_lowercase()))
            .unwrap_or(false)
    }

    pub fn method_for(&self, entry_name: &str) -> CompressionMethod {
        if self.is_stored(entry_name) {
            CompressionMethod::Stored
        } else {
            CompressionMethod::Deflated
        }
    }

    pub fn extensions(&self) -> impl Iterator<Item = &str> {
        self.stored.iter().map(String::as_str)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AssemblyProgress<'a> {
    pub index: usize,
    pub total: usize,
    pub entry: &'a str,
}

#[derive(Debug, Clone, Default)]
pub struct AssemblyReport {
    /// Entry names in the order they were written.
    pub written: Vec<String>,
    /// Scheduled files that were not found on disk.
    pub missing: Vec<NormalizedPath>,
    /// Uncompressed bytes copied into the archive.
    pub bytes_in: u64,
    /// Size of the finished archive.
    pub archive_size: u64,
}

/// Pack `files` into a zip-compatible archive at `output`.
///
/// The archive is written next to `output` and only renamed over it once it
/// is complete, so a failed run never leaves a half-written archive behind.
/// Files the resolver cannot find are reported, not raised.
pub fn assemble(
    output: &Utf8Path,
    files: &[ScheduledFile],
    policy: &StorePolicy,
    resolver: &dyn PathResolver,
    on_progress: Option<&dyn Fn(AssemblyProgress<'_>)>,
) -> Result<AssemblyReport, ArchiveError> {
    if let Some(parent) = output.parent() {
        if !parent.as_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let tmp_path = Utf8PathBuf::from(format!("{output}.tmp"));
    let result = write_archive(&tmp_path, files, policy, resolver, on_progress);

    match result {
        Ok(mut report) => {
            fs::rename(&tmp_path, output)?;
            report.archive_size = fs::metadata(output)?.len();
            info!(
                "Packed {} files into {} ({} missing)",
                report.written.len(),
                output,
                report.missing.len()
            );
            Ok(report)
        }
        Err(e) => {
            let _ = fs::remove_file(&tmp_path);
            Err(e)
        }
    }
}

fn write_archive(
    path: &Utf8Path,
    files: &[ScheduledFile],
    policy: &StorePolicy,
    resolver: &dyn PathResolver,
    on_progress: Option<&dyn Fn(AssemblyProgress<'_>)>,
) -> Result<AssemblyReport, ArchiveError> {
    let mut zip = ZipWriter::new(BufWriter::new(File::create(path)?));
    let mut report = AssemblyReport::default();
    let mut entries: HashSet<String> = HashSet::new();

    for (index, file) in files.iter().enumerate() {
        let Some(found) = resolver.locate(&file.path) else {
            debug!("Not on disk: {}", file.path);
            report.missing.push(file.path.clone());
            continue;
        };

        // Two scheduled names can land on the same file after directory fallback
        if !entries.insert(found.entry_name.to_lowercase()) {
            debug!("Already packed as {}: {}", found.entry_name, file.path);
            continue;
        }

        if let Some(cb) = on_progress {
            cb(AssemblyProgress {
                index,
                total: files.len(),
                entry: &found.entry_name,
            });
        }

        let method = policy.method_for(&found.entry_name);
        let options = SimpleFileOptions::default().compression_method(method);

        let mut source = BufReader::new(File::open(&found.disk_path)?);
        zip.start_file(found.entry_name.as_str(), options)?;
        report.bytes_in += io::copy(&mut source, &mut zip)?;
        report.written.push(found.entry_name);
    }

    zip.finish()?.flush()?;
    Ok(report)
}

/// Names of all file entries in an existing archive.
pub fn list_entries(path: &Utf8Path) -> Result<Vec<String>, ArchiveError> {
    let archive = ZipArchive::new(BufReader::new(File::open(path)?))?;
    Ok(archive
        .file_names()
        .filter(|name| !name.ends_with('/'))
        .map(str::to_string)
        .collect())
}
