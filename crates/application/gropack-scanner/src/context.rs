use camino::{Utf8Path, Utf8PathBuf};
use gropack_core::{DependencySet, NormalizedPath, ResourcePath, ScheduledFiles, VariantFlags};
use gropack_infra::DiskResolver;
use tracing::debug;

#[derive(Debug, Clone, Copy, Default)]
pub struct ScanOptions {
    /// Schedule the `.ini` config next to every newly scheduled model.
    pub pack_configs: bool,
    /// An `.mp3` is satisfied by a standard `.ogg` of the same name.
    pub substitute_audio: bool,
}

/// State shared by every scan of one run.
///
/// The standard dependencies are moved in on construction and only queried
/// afterwards. Variant flags only gain bits; the scheduled list only grows.
#[derive(Debug)]
pub struct ScanContext {
    root: Utf8PathBuf,
    standard: DependencySet,
    flags: VariantFlags,
    scheduled: ScheduledFiles,
    options: ScanOptions,
}

impl ScanContext {
    pub fn new(root: impl Into<Utf8PathBuf>, standard: DependencySet, options: ScanOptions) -> Self {
        Self {
            root: root.into(),
            standard,
            flags: VariantFlags::empty(),
            scheduled: ScheduledFiles::new(),
            options,
        }
    }

    /// Seed variant flags known before scanning (installation probes, user choice).
    pub fn with_flags(mut self, flags: VariantFlags) -> Self {
        self.flags |= flags;
        self
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub fn options(&self) -> ScanOptions {
        self.options
    }

    pub fn flags(&self) -> VariantFlags {
        self.flags
    }

    pub fn standard(&self) -> &DependencySet {
        &self.standard
    }

    pub fn scheduled(&self) -> &ScheduledFiles {
        &self.scheduled
    }

    pub fn into_parts(self) -> (ScheduledFiles, VariantFlags) {
        (self.scheduled, self.flags)
    }

    pub fn mark_variant(&mut self, flags: VariantFlags) {
        let new = flags.difference(self.flags);
        if !new.is_empty() {
            debug!("Alternate engine idiom observed: {}", new);
            self.flags |= new;
        }
    }

    /// Normalize a raw filename and keep whatever variant idioms it showed.
    pub fn normalize(&mut self, raw: &str) -> NormalizedPath {
        let (path, flags) = ResourcePath::normalize(raw);
        self.mark_variant(flags);
        path
    }

    /// Add straight to the packing list, bypassing the standard dependency checks.
    pub fn schedule(&mut self, path: NormalizedPath) -> Option<usize> {
        let ordinal = self.scheduled.schedule(path)?;
        debug!("{}. {}", ordinal, self.scheduled.as_slice()[ordinal - 1].path);
        Some(ordinal)
    }

    pub fn exists(&self, path: &NormalizedPath) -> bool {
        self.root.join(path.as_str()).is_file()
    }

    /// Resolver matching the current variant state.
    pub fn resolver(&self) -> DiskResolver {
        DiskResolver::new(self.root.clone(), self.flags.is_alternate())
    }
}
