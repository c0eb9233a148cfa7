use crate::context::ScanContext;
use crate::dictionary::{scan_dictionary, DictionaryStats};
use crate::FormatError;
use gropack_core::{NormalizedPath, VariantFlags};
use gropack_infra::{ChunkReader, StreamError, Tag};
use tracing::{debug, info};

pub const BUILD_VERSION: &Tag = b"BUIV";
pub const WORLD: &Tag = b"WRLD";
pub const WORLD_INFO: &Tag = b"WLIF";
pub const TRANSLATION: &Tag = b"DTRS";
pub const LEADERBOARD: &Tag = b"LDRB";
pub const LEVEL_PROPERTIES: &Tag = b"Plv0";
pub const SPECIAL_GAMEMODE: &Tag = b"SpGM";
pub const DICTIONARY_POSITION: &Tag = b"DPOS";

/// `Plv0` is followed by 12 bytes of level data.
const LEVEL_PROPERTIES_LEN: usize = 12;
const SPAWN_FLAGS_LEN: usize = 4;

const THUMBNAIL_TEXTURE: &str = "Tbn.tex";
const THUMBNAIL: &str = ".tbn";
const VISIBILITY: &str = ".vis";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorldSummary {
    pub name: String,
    pub description: String,
    pub brushes: DictionaryStats,
    pub entities: DictionaryStats,
}

/// Check the `BUIV <version> WRLD` signature.
pub fn verify_world(reader: &mut ChunkReader<'_>) -> Result<i32, FormatError> {
    read_signature(reader).map_err(FormatError::NotAWorld)
}

fn read_signature(reader: &mut ChunkReader<'_>) -> Result<i32, StreamError> {
    reader.expect(BUILD_VERSION)?;
    let version = reader.read_i32()?;
    reader.expect(WORLD)?;
    Ok(version)
}

/// Scan a world file already loaded into memory.
///
/// The signature is verified before anything is scheduled, so a file that
/// is not a world leaves the context untouched.
pub fn scan_world(
    ctx: &mut ScanContext,
    world: &NormalizedPath,
    data: &[u8],
) -> Result<WorldSummary, FormatError> {
    let mut reader = ChunkReader::new(data);
    let version = verify_world(&mut reader)?;
    debug!("{}: build {}", world, version);

    let (name, description) = skip_world_info(ctx, &mut reader)?;
    schedule_implied_files(ctx, world);

    seek_dictionary(&mut reader, true)?;
    let brushes = scan_dictionary(ctx, &mut reader)?;

    seek_dictionary(&mut reader, false)?;
    let entities = scan_dictionary(ctx, &mut reader)?;

    info!(
        "{}: '{}' ({} + {} dictionary entries)",
        world, name, brushes.entries, entities.entries
    );

    Ok(WorldSummary {
        name,
        description,
        brushes,
        entities,
    })
}

/// Skip the world info block. Chunks only newer engines write mark the run
/// as an alternate variant.
fn skip_world_info(
    ctx: &mut ScanContext,
    reader: &mut ChunkReader<'_>,
) -> Result<(String, String), FormatError> {
    reader.expect(WORLD_INFO)?;

    if reader.peek_tag(TRANSLATION) {
        reader.skip(4);
    }

    if reader.peek_tag(LEADERBOARD) {
        reader.skip(4);
        reader.read_string()?;
        ctx.mark_variant(VariantFlags::WORLD_CHUNK);
    }

    if reader.peek_tag(LEVEL_PROPERTIES) {
        reader.skip(4 + LEVEL_PROPERTIES_LEN);
        ctx.mark_variant(VariantFlags::WORLD_CHUNK);
    }

    let name = reader.read_string()?;
    reader.skip(SPAWN_FLAGS_LEN);

    if reader.peek_tag(SPECIAL_GAMEMODE) {
        reader.skip(4);
        ctx.mark_variant(VariantFlags::WORLD_CHUNK);
    }

    let description = reader.read_string()?;
    Ok((name, description))
}

/// Thumbnail and visibility data live next to the world and are only
/// packed when present.
fn schedule_implied_files(ctx: &mut ScanContext, world: &NormalizedPath) {
    let mut thumbnail = world.sibling(THUMBNAIL_TEXTURE);
    if !ctx.exists(&thumbnail) {
        thumbnail = world.sibling(THUMBNAIL);
    }

    for implied in [thumbnail, world.sibling(VISIBILITY)] {
        if ctx.exists(&implied) {
            ctx.schedule(implied);
        }
    }
}

/// Move the cursor to the dictionary a `DPOS` chunk points at.
///
/// The first `DPOS` follows data of unknown layout, so it is found by
/// advancing byte by byte. The second one must follow the first
/// dictionary directly.
fn seek_dictionary(reader: &mut ChunkReader<'_>, search: bool) -> Result<(), FormatError> {
    if search {
        while !reader.peek_tag(DICTIONARY_POSITION) {
            if reader.at_end() {
                return Err(FormatError::NoDictionary);
            }
            reader.skip(1);
        }
    }

    reader.expect(DICTIONARY_POSITION)?;
    let at = reader.pos();
    let offset = reader.read_i32()?;
    if offset < 0 {
        return Err(FormatError::NegativeOffset { offset, at });
    }
    reader.seek(offset as usize);
    Ok(())
}
