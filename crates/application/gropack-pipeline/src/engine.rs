use crate::games::{self, Game};
use crate::inputs;
use crate::standard::{self, StandardSummary};
use crate::{PackError, PackRequest};
use camino::Utf8Path;
use gropack_core::{NormalizedPath, ScanReport, ScheduledFile, ScheduledFiles, VariantFlags};
use gropack_infra::{
    assemble, AssemblyProgress, AssemblyReport, DiskResolver, PathResolver, StorePolicy,
};
use gropack_scanner::{ScanContext, ScanOptions, Scanner, ScannerError};
use serde::Serialize;
use tracing::{info, warn};

/// An input that could not be scanned. Files it scheduled before failing
/// stay in the plan.
#[derive(Debug)]
pub struct ScanFailure {
    pub path: NormalizedPath,
    pub error: ScannerError,
}

#[derive(Debug, Serialize)]
pub struct FailureView {
    pub path: NormalizedPath,
    pub error: String,
}

#[derive(Debug)]
pub struct PackPlan {
    pub game: Option<Game>,
    pub standard: StandardSummary,
    pub files: ScheduledFiles,
    pub flags: VariantFlags,
    pub reports: Vec<ScanReport>,
    pub failures: Vec<ScanFailure>,
}

/// Serializable view of a plan.
#[derive(Debug, Serialize)]
pub struct PlanSummary<'a> {
    pub game: Option<Game>,
    pub standard: &'a StandardSummary,
    pub alternate: bool,
    pub flags: String,
    pub files: &'a [ScheduledFile],
    pub reports: &'a [ScanReport],
    pub failures: Vec<FailureView>,
}

impl PackPlan {
    pub fn is_alternate(&self) -> bool {
        self.flags.is_alternate()
    }

    pub fn summary(&self) -> PlanSummary<'_> {
        PlanSummary {
            game: self.game,
            standard: &self.standard,
            alternate: self.is_alternate(),
            flags: self.flags.to_string(),
            files: self.files.as_slice(),
            reports: &self.reports,
            failures: self
                .failures
                .iter()
                .map(|f| FailureView {
                    path: f.path.clone(),
                    error: f.error.to_string(),
                })
                .collect(),
        }
    }
}

/// Plans and packs one request.
///
/// `plan` never touches the output; `verify` and `execute` consume what it
/// found.
pub struct PackEngine {
    request: PackRequest,
}

impl PackEngine {
    pub fn new(request: PackRequest) -> Self {
        Self { request }
    }

    pub fn request(&self) -> &PackRequest {
        &self.request
    }

    pub fn root(&self) -> &Utf8Path {
        &self.request.root
    }

    /// Collect standard dependencies, detect the game, then scan every input
    /// in order.
    pub fn plan(&self) -> Result<PackPlan, PackError> {
        let req = &self.request;
        let opts = &req.options;

        let mut flags = VariantFlags::empty();
        let mut scan_options = ScanOptions {
            pack_configs: opts.pack_configs,
            substitute_audio: opts.substitute_audio,
        };
        if opts.alternate {
            flags |= VariantFlags::DECLARED;
        }

        let mut standard = standard::collect(&req.root, &req.standard)?;

        let game = if opts.detect_game {
            let game = games::detect(&req.root);
            match game {
                Some(game) => {
                    info!("Detected archives of {}", game);
                    for archive in game.standard_archives() {
                        standard.add_archive(&req.root, archive)?;
                    }
                    if opts.derived {
                        if game.is_alternate() {
                            flags |= VariantFlags::INSTALL_PROBE;
                        }
                        scan_options.substitute_audio |= game.substitutes_audio();
                    }
                }
                None => warn!("Could not detect the game installed in {}", req.root),
            }
            game
        } else {
            None
        };

        let summary = standard.summary();
        info!("Standard dependencies: {}", summary.keys);

        let inputs = inputs::expand(&req.root, &req.inputs)?;
        let mut ctx = ScanContext::new(&req.root, standard.set, scan_options).with_flags(flags);
        let mut reports = Vec::new();
        let mut failures = Vec::new();

        for input in inputs {
            ctx.schedule(input.clone());
            match Scanner::scan_file(&mut ctx, &input) {
                Ok(report) => reports.push(report),
                Err(error) => {
                    warn!("Skipping {}: {}", input, error);
                    failures.push(ScanFailure { path: input, error });
                }
            }
        }

        let (files, flags) = ctx.into_parts();
        info!("{} files scheduled", files.len());

        Ok(PackPlan {
            game,
            standard: summary,
            files,
            flags,
            reports,
            failures,
        })
    }

    /// Scheduled files that cannot be found on disk.
    pub fn verify(&self, plan: &PackPlan) -> Vec<NormalizedPath> {
        let resolver = DiskResolver::new(&self.request.root, plan.is_alternate());
        plan.files
            .paths()
            .filter(|path| resolver.locate(path).is_none())
            .cloned()
            .collect()
    }

    /// Write the archive for a plan.
    pub fn execute(
        &self,
        plan: &PackPlan,
        on_progress: Option<&dyn Fn(AssemblyProgress<'_>)>,
    ) -> Result<AssemblyReport, PackError> {
        if !plan.failures.is_empty() && !self.request.options.allow_partial {
            return Err(PackError::IncompleteScan {
                failed: plan.failures.len(),
            });
        }

        let output = self.request.output_path();
        let policy = StorePolicy::new(&self.request.store);
        let resolver = DiskResolver::new(&self.request.root, plan.is_alternate());

        let report = assemble(&output, plan.files.as_slice(), &policy, &resolver, on_progress)?;
        Ok(report)
    }
}
