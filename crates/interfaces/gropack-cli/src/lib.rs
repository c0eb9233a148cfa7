pub mod commands;
pub mod profile;

use anyhow::{bail, Result};
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Args, ValueEnum};
use gropack_config::{default_archive_name, ARCHIVE_EXTENSION};
use gropack_pipeline::{PackOptions, PackRequest};
use profile::PackProfile;
use serde::{Deserialize, Serialize};

#[derive(ValueEnum, Clone, Debug, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CliFlag {
    /// Resources come from the alternate engine (detected automatically otherwise)
    Alt,
    /// Pack INI configs alongside their models
    Ini,
    /// Accept OGG files in place of missing MP3 files
    Ogg,
    /// Detect the installed game and ignore its archives
    Gro,
}

#[derive(Args, Debug, Clone, Default)]
pub struct PackArgs {
    /// World file inside a game's Levels directory; derives root and output
    #[arg(conflicts_with_all = ["root", "inputs"])]
    pub world: Option<Utf8PathBuf>,
    /// Game root directory
    #[arg(short, long)]
    pub root: Option<Utf8PathBuf>,
    /// Output archive, absolute or relative to the root
    #[arg(short, long)]
    pub output: Option<Utf8PathBuf>,
    /// File or directory to scan (repeatable)
    #[arg(short = 'i', long = "input")]
    pub inputs: Vec<Utf8PathBuf>,
    /// Extension to store without compression (repeatable, e.g. "-s ogg")
    #[arg(short = 's', long = "store")]
    pub store: Vec<String>,
    /// Resource or whole archive the game already provides (repeatable)
    #[arg(short = 'd', long = "depend")]
    pub depend: Vec<String>,
    /// Behavior flag (repeatable)
    #[arg(short = 'f', long = "flag", value_enum)]
    pub flags: Vec<CliFlag>,
    /// JSON pack profile; command line values extend it
    #[arg(long, env = "GROPACK_PROFILE")]
    pub config: Option<Utf8PathBuf>,
    /// Assemble even when some inputs fail to scan
    #[arg(long)]
    pub allow_partial: bool,
    /// Print the plan as JSON
    #[arg(long)]
    pub json: bool,
}

impl PackArgs {
    /// Merge the profile (if any) and the command line into a request.
    pub fn to_request(&self) -> Result<PackRequest> {
        let profile = match &self.config {
            Some(path) => PackProfile::load(path)?,
            None => PackProfile::default(),
        };

        let mut req = match &self.world {
            Some(world) => PackRequest::from_world(world)?,
            None => self.explicit_request(&profile)?,
        };

        if let Some(output) = &self.output {
            req.output = with_archive_extension(output);
        }
        req.store.extend(profile.store.iter().chain(&self.store).cloned());
        req.standard
            .extend(profile.depend.iter().chain(&self.depend).cloned());

        let flags = profile.flags.iter().chain(&self.flags).copied();
        apply_flags(&mut req.options, flags);
        req.options.allow_partial |= self.allow_partial || profile.allow_partial;

        Ok(req)
    }

    fn explicit_request(&self, profile: &PackProfile) -> Result<PackRequest> {
        let Some(root) = self.root.clone().or_else(|| profile.root.clone().map(Into::into)) else {
            bail!("Game root has not been set (use -r <dir> or a profile with \"root\")");
        };

        let inputs: Vec<Utf8PathBuf> = profile
            .inputs
            .iter()
            .map(Utf8PathBuf::from)
            .chain(self.inputs.iter().cloned())
            .collect();
        if inputs.is_empty() {
            bail!("Nothing to scan (use -i <file> or a world path)");
        }

        let output = match profile.output.as_deref() {
            Some(output) => with_archive_extension(Utf8Path::new(output)),
            None => {
                let stem = inputs[0].file_stem().unwrap_or("pack");
                Utf8PathBuf::from(default_archive_name(stem))
            }
        };

        Ok(PackRequest {
            root,
            output,
            inputs,
            store: Vec::new(),
            standard: Vec::new(),
            options: PackOptions::default(),
        })
    }
}

pub fn apply_flags(options: &mut PackOptions, flags: impl IntoIterator<Item = CliFlag>) {
    for flag in flags {
        match flag {
            CliFlag::Alt => options.alternate = true,
            CliFlag::Ini => options.pack_configs = true,
            CliFlag::Ogg => options.substitute_audio = true,
            CliFlag::Gro => options.detect_game = true,
        }
    }
}

/// Output names without an extension get the archive one.
fn with_archive_extension(path: &Utf8Path) -> Utf8PathBuf {
    if path.extension().is_some() {
        path.to_path_buf()
    } else {
        path.with_extension(ARCHIVE_EXTENSION)
    }
}
