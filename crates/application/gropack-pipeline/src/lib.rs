use camino::{Utf8Path, Utf8PathBuf};
use gropack_config::{default_archive_name, DEFAULT_STORED_EXTENSIONS, LEVELS_DIR};
use gropack_infra::ArchiveError;

pub mod engine;
pub mod games;
pub mod inputs;
pub mod standard;

pub use engine::{FailureView, PackEngine, PackPlan, PlanSummary, ScanFailure};
pub use games::Game;
pub use standard::{StandardDeps, StandardSummary};

#[derive(Debug, Clone, Default)]
pub struct PackOptions {
    /// Pack the `.ini` config of every model.
    pub pack_configs: bool,
    /// Let a standard `.ogg` stand in for a referenced `.mp3`.
    pub substitute_audio: bool,
    /// Treat the resources as coming from the alternate engine from the start.
    pub alternate: bool,
    /// Probe the root for a known game and ignore its archives.
    pub detect_game: bool,
    /// The request was derived from a single world path. A detected game
    /// then also seeds the variant state and audio substitution.
    pub derived: bool,
    /// Assemble even when some inputs could not be scanned.
    pub allow_partial: bool,
}

#[derive(Debug, Clone)]
pub struct PackRequest {
    pub root: Utf8PathBuf,
    /// Relative paths are resolved against the root.
    pub output: Utf8PathBuf,
    /// Files or directories to scan, relative to the root or absolute under it.
    pub inputs: Vec<Utf8PathBuf>,
    /// Extensions stored without compression.
    pub store: Vec<String>,
    /// Archives whose contents, or single files, the game already provides.
    pub standard: Vec<String>,
    pub options: PackOptions,
}

impl PackRequest {
    /// Everything derived from the path of a single world: the root is the
    /// parent of its `Levels` directory and the archive is written there.
    pub fn from_world(world: &Utf8Path) -> Result<Self, PackError> {
        let (root, relative) = find_root(world)?;
        let stem = world.file_stem().unwrap_or("world");

        Ok(Self {
            output: root.join(default_archive_name(stem)),
            inputs: vec![relative],
            store: DEFAULT_STORED_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            standard: Vec::new(),
            options: PackOptions {
                detect_game: true,
                derived: true,
                ..Default::default()
            },
            root,
        })
    }

    pub fn output_path(&self) -> Utf8PathBuf {
        if self.output.is_absolute() {
            self.output.clone()
        } else {
            self.root.join(&self.output)
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PackError {
    #[error("{path} is not inside the game root {root}")]
    OutsideRoot { path: Utf8PathBuf, root: Utf8PathBuf },
    #[error("{0} is not inside a 'Levels' directory")]
    NoLevelsDir(Utf8PathBuf),
    #[error("path is not valid UTF-8: {0}")]
    NonUtf8Path(std::path::PathBuf),
    #[error("cannot walk {path}: {source}")]
    Walk {
        path: Utf8PathBuf,
        #[source]
        source: walkdir::Error,
    },
    #[error("cannot read standard archive {path}: {source}")]
    StandardArchive {
        path: Utf8PathBuf,
        #[source]
        source: ArchiveError,
    },
    #[error("{failed} input(s) could not be scanned")]
    IncompleteScan { failed: usize },
    #[error("Archive error: {0}")]
    Archive(#[from] ArchiveError),
}

/// Split a world path into the game root and the world's path relative to it.
///
/// The root is the parent of the closest `Levels` ancestor.
pub fn find_root(world: &Utf8Path) -> Result<(Utf8PathBuf, Utf8PathBuf), PackError> {
    let levels = world
        .ancestors()
        .skip(1)
        .find(|dir| {
            dir.file_name()
                .is_some_and(|name| name.eq_ignore_ascii_case(LEVELS_DIR))
        })
        .ok_or_else(|| PackError::NoLevelsDir(world.to_path_buf()))?;

    let root = levels.parent().unwrap_or(Utf8Path::new("")).to_path_buf();
    let relative = world
        .strip_prefix(&root)
        .map_err(|_| PackError::NoLevelsDir(world.to_path_buf()))?
        .to_path_buf();

    Ok((root, relative))
}
