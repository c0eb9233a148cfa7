use crate::context::ScanContext;
use gropack_config::{TEXTURE_HEADER_LEN, TEXTURE_TRAILER_FLOOR};
use gropack_core::NormalizedPath;
use gropack_infra::{ChunkReader, PathResolver, Tag};
use std::fs;
use tracing::debug;

/// Written right after the header by textures that carry effect data.
pub const EFFECT_MARKER: &Tag = b"FXDT";

/// Base texture referenced by an effect texture, if the texture can be read
/// and names one.
pub fn base_texture(ctx: &mut ScanContext, texture: &NormalizedPath) -> Option<NormalizedPath> {
    let Some(found) = ctx.resolver().locate(texture) else {
        debug!("Texture not on disk, skipping base texture lookup: {}", texture);
        return None;
    };

    let data = match fs::read(&found.disk_path) {
        Ok(data) => data,
        Err(e) => {
            debug!("Cannot read texture {}: {}", found.disk_path, e);
            return None;
        }
    };

    let raw = base_texture_name(&data)?;
    let path = ctx.normalize(&raw);
    (!path.is_empty()).then_some(path)
}

/// Name stored after the last NUL in the texture's trailing bytes.
///
/// Only effect textures carry one. The first bytes up to
/// [`TEXTURE_TRAILER_FLOOR`] are fixed metadata and never examined.
pub fn base_texture_name(data: &[u8]) -> Option<String> {
    let mut reader = ChunkReader::new(data);
    reader.seek(TEXTURE_HEADER_LEN);
    if !reader.peek_tag(EFFECT_MARKER) {
        return None;
    }

    let tail = data.get(TEXTURE_TRAILER_FLOOR + 1..)?;
    let nul = tail.iter().rposition(|&b| b == 0)?;
    let name = &tail[nul + 1..];
    if name.is_empty() {
        return None;
    }

    Some(String::from_utf8_lossy(name).into_owned())
}
