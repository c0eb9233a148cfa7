use crate::accept::{accept, Acceptance};
use crate::context::ScanContext;
use crate::FormatError;
use gropack_infra::{ChunkReader, Tag};

pub const DICTIONARY: &Tag = b"DICT";
pub const FILENAME: &Tag = b"DFNM";
pub const DICTIONARY_END: &Tag = b"DEND";

/// What one dictionary contributed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DictionaryStats {
    pub entries: usize,
    pub empty: usize,
    pub satisfied: usize,
    pub scheduled: usize,
}

/// Read a `DICT` block at the cursor and run every filename through the
/// acceptance pipeline. The cursor ends up right after `DEND`.
pub fn scan_dictionary(
    ctx: &mut ScanContext,
    reader: &mut ChunkReader<'_>,
) -> Result<DictionaryStats, FormatError> {
    reader.expect(DICTIONARY)?;

    let offset = reader.pos();
    let count = reader.read_i32()?;
    if count < 0 {
        return Err(FormatError::NegativeCount { count, offset });
    }

    let mut stats = DictionaryStats {
        entries: count as usize,
        ..Default::default()
    };

    for _ in 0..count {
        reader.expect(FILENAME)?;
        let offset = reader.pos();
        let Some(raw) = reader.read_filename()? else {
            return Err(FormatError::CorruptFilename { offset });
        };

        if raw.is_empty() {
            stats.empty += 1;
            continue;
        }

        let path = ctx.normalize(&raw);
        if path.is_empty() {
            stats.empty += 1;
            continue;
        }

        match accept(ctx, path) {
            Acceptance::Satisfied(_) => stats.satisfied += 1,
            Acceptance::Scheduled { .. } => stats.scheduled += 1,
            Acceptance::AlreadyScheduled => {}
        }
    }

    reader.expect(DICTIONARY_END)?;
    Ok(stats)
}
