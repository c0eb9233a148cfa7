//! Dependency scanning: pulls resource filenames out of worlds and
//! arbitrary game files and decides which of them need packing.

use camino::Utf8PathBuf;
use gropack_core::{NormalizedPath, ScanReport};
use gropack_infra::StreamError;
use std::fs;
use tracing::{debug, info};

pub mod accept;
pub mod context;
pub mod dictionary;
pub mod generic;
pub mod texture;
pub mod world;

pub use accept::{accept, Acceptance, SatisfiedBy};
pub use context::{ScanContext, ScanOptions};
pub use dictionary::DictionaryStats;
pub use generic::{EmbeddedName, EmbeddedNames, GenericStats, InputKind, MarkerFamily};
pub use world::WorldSummary;

const WORLD_EXTENSION: &str = "wld";

/// Structural problems inside one file.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("not a world file: {0}")]
    NotAWorld(#[source] StreamError),
    #[error(transparent)]
    Stream(#[from] StreamError),
    #[error("corrupt filename length at offset {offset}")]
    CorruptFilename { offset: usize },
    #[error("negative dictionary size {count} at offset {offset}")]
    NegativeCount { count: i32, offset: usize },
    #[error("negative dictionary position {offset} at offset {at}")]
    NegativeOffset { offset: i32, at: usize },
    #[error("no dictionary position chunk")]
    NoDictionary,
}

#[derive(Debug, thiserror::Error)]
pub enum ScannerError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path}: {source}")]
    Format {
        path: NormalizedPath,
        #[source]
        source: FormatError,
    },
}

pub struct Scanner;

impl Scanner {
    /// Scan one file under the context root.
    ///
    /// Worlds go through their dictionaries, everything else through the
    /// embedded-name scan. The report lists what this scan scheduled, in
    /// order. Files scheduled before a format error are kept.
    pub fn scan_file(
        ctx: &mut ScanContext,
        path: &NormalizedPath,
    ) -> Result<ScanReport, ScannerError> {
        let disk_path = ctx.root().join(path.as_str());
        let data = fs::read(&disk_path).map_err(|source| ScannerError::Io {
            path: disk_path.clone(),
            source,
        })?;

        let mark = ctx.scheduled().len();
        let is_world = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(WORLD_EXTENSION));

        if is_world {
            info!("Scanning world {}", path);
            world::scan_world(ctx, path, &data).map_err(|source| ScannerError::Format {
                path: path.clone(),
                source,
            })?;
        } else {
            debug!("Scanning {} ({} bytes)", path, data.len());
            let stats = generic::scan_generic(ctx, &data);
            debug!("{}: {} embedded names", path, stats.names);
        }

        let added = ctx.scheduled().since(mark).to_vec();
        if added.is_empty() {
            info!("{}: no dependencies", path);
        }

        Ok(ScanReport {
            source: path.clone(),
            added,
        })
    }
}
