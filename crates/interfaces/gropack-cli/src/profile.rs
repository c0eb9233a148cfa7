use crate::CliFlag;
use anyhow::{Context, Result};
use camino::Utf8Path;
use serde::{Deserialize, Serialize};
use std::fs;

/// Reusable pack settings, e.g. one per mod project.
///
/// ```json
/// { "root": "/games/SeriousSam", "inputs": ["Levels/MyMod"], "depend": ["MyMod_Base.gro"],
///   "store": ["ogg"], "flags": ["ini", "gro"] }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct PackProfile {
    pub root: Option<String>,
    pub output: Option<String>,
    pub inputs: Vec<String>,
    pub store: Vec<String>,
    pub depend: Vec<String>,
    pub flags: Vec<CliFlag>,
    pub allow_partial: bool,
}

impl PackProfile {
    pub fn load(path: &Utf8Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("Failed to read profile {}", path))?;
        serde_json::from_str(&data).with_context(|| format!("Invalid profile {}", path))
    }
}
