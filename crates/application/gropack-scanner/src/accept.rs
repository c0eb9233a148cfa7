use crate::context::ScanContext;
use crate::texture;
use gropack_core::{DependencyKey, NormalizedPath};
use tracing::debug;

const MODEL_EXT: &str = "mdl";
const CONFIG_EXT: &str = "ini";
const TEXTURE_EXT: &str = "tex";
const AUDIO_EXT: &str = "mp3";
const AUDIO_SUBSTITUTE_EXT: &str = "ogg";

/// Which lookup found a filename among the standard dependencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SatisfiedBy {
    Standard,
    SubstituteExtension,
    VariantDirectory,
    Underscores,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acceptance {
    Satisfied(SatisfiedBy),
    AlreadyScheduled,
    Scheduled { ordinal: usize },
}

/// Run a normalized filename through the standard dependency lookups and
/// schedule it if none of them match. Newly scheduled models and textures
/// pull in the files they imply.
pub fn accept(ctx: &mut ScanContext, path: NormalizedPath) -> Acceptance {
    accept_at_depth(ctx, path, 0)
}

fn accept_at_depth(ctx: &mut ScanContext, path: NormalizedPath, depth: u8) -> Acceptance {
    // Implied files skip the audio substitution
    let substitute_audio = depth == 0 && ctx.options().substitute_audio;
    if let Some(rule) = satisfied_by(ctx, path.key(), substitute_audio) {
        debug!("Standard dependency ({:?}): {}", rule, path);
        return Acceptance::Satisfied(rule);
    }

    let ext = path.extension().map(str::to_ascii_lowercase);
    let Some(ordinal) = ctx.schedule(path.clone()) else {
        return Acceptance::AlreadyScheduled;
    };

    // Files implied by an implied file are not followed
    if depth == 0 {
        match ext.as_deref() {
            Some(MODEL_EXT) if ctx.options().pack_configs => {
                ctx.schedule(path.with_extension(CONFIG_EXT));
            }
            Some(TEXTURE_EXT) => {
                if let Some(base) = texture::base_texture(ctx, &path) {
                    accept_at_depth(ctx, base, depth + 1);
                }
            }
            _ => {}
        }
    }

    Acceptance::Scheduled { ordinal }
}

/// Every lookup is one-shot; later ones start from the key the previous one
/// left behind.
fn satisfied_by(
    ctx: &ScanContext,
    mut key: DependencyKey,
    substitute_audio: bool,
) -> Option<SatisfiedBy> {
    let standard = ctx.standard();
    if standard.contains(&key) {
        return Some(SatisfiedBy::Standard);
    }

    if substitute_audio && key.extension() == Some(AUDIO_EXT) {
        key = key.with_extension(AUDIO_SUBSTITUTE_EXT);
        if standard.contains(&key) {
            return Some(SatisfiedBy::SubstituteExtension);
        }
    }

    if ctx.flags().is_alternate() {
        if let Some(regular) = key.without_variant_dir() {
            key = regular;
            if standard.contains(&key) {
                return Some(SatisfiedBy::VariantDirectory);
            }
        }

        if standard.contains(&key.with_underscores()) {
            return Some(SatisfiedBy::Underscores);
        }
    }

    None
}
