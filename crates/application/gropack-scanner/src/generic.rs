use crate::accept::{accept, Acceptance};
use crate::context::ScanContext;
use gropack_config::MAX_FILENAME_LEN;
use gropack_infra::{pe, ChunkReader, Tag};
use tracing::debug;

/// Length-prefixed filename embedded by binary resources.
pub const EMBEDDED_FILENAME: &Tag = b"EFNM";
/// NUL-terminated filename embedded by executables.
pub const EXECUTABLE_FILENAME: &Tag = b"XFNM";
/// Filename written into text resources.
pub const TEXT_FILENAME: &Tag = b"TFNM";

/// Whether an input is a PE image, whose code section is skipped before
/// the marker scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Binary,
    Executable,
}

impl InputKind {
    pub fn detect(data: &[u8]) -> Self {
        if pe::is_executable(data) {
            Self::Executable
        } else {
            Self::Binary
        }
    }
}

/// Encoding of a filename found after a marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerFamily {
    /// `EFNM` + i32 length + bytes.
    LengthPrefixed,
    /// `XFNM` + bytes up to a NUL.
    NulTerminated,
    /// `TFNM` + space + bytes up to a line break, a NUL or the length cap.
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedName {
    pub family: MarkerFamily,
    pub offset: usize,
    pub raw: String,
}

/// Iterator over every filename embedded in a buffer, in file order.
pub struct EmbeddedNames<'a> {
    reader: ChunkReader<'a>,
}

impl<'a> EmbeddedNames<'a> {
    pub fn new(data: &'a [u8], kind: InputKind) -> Self {
        let mut reader = ChunkReader::new(data);
        if kind == InputKind::Executable {
            match pe::second_section_offset(data) {
                Some(start) => reader.seek(start),
                None => debug!("Section table unreadable, scanning the whole image"),
            }
        }
        Self { reader }
    }

    /// Try every marker family at the cursor. On a match the cursor sits
    /// after the consumed name; otherwise it has not moved.
    fn match_here(&mut self) -> Option<EmbeddedName> {
        let offset = self.reader.pos();
        let (family, raw) = if self.reader.peek_tag(EMBEDDED_FILENAME) {
            let mut probe = self.reader.clone();
            probe.skip(4);
            let raw = probe.read_filename().ok()??;
            self.reader = probe;
            (MarkerFamily::LengthPrefixed, raw)
        } else if self.reader.peek_tag(EXECUTABLE_FILENAME) {
            self.reader.skip(4);
            let raw = String::from_utf8_lossy(self.reader.read_until_nul()).into_owned();
            (MarkerFamily::NulTerminated, raw)
        } else if self.reader.peek_tag(TEXT_FILENAME) && self.reader.peek(5).get(4) == Some(&b' ')
        {
            self.reader.skip(5);
            (MarkerFamily::Text, read_text_name(&mut self.reader))
        } else {
            return None;
        };

        Some(EmbeddedName {
            family,
            offset,
            raw,
        })
    }
}

impl Iterator for EmbeddedNames<'_> {
    type Item = EmbeddedName;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.reader.at_end() {
            if let Some(found) = self.match_here() {
                return Some(found);
            }
            self.reader.skip(1);
        }
        None
    }
}

fn read_text_name(reader: &mut ChunkReader<'_>) -> String {
    let rest = reader.peek(MAX_FILENAME_LEN);
    let len = rest
        .iter()
        .position(|&b| matches!(b, b'\n' | b'\r' | 0))
        .unwrap_or(rest.len());
    reader.skip(len);
    String::from_utf8_lossy(&rest[..len]).into_owned()
}

/// Number of names found and how many of them got scheduled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenericStats {
    pub names: usize,
    pub scheduled: usize,
}

/// Scan an arbitrary file for embedded filenames and accept each of them.
pub fn scan_generic(ctx: &mut ScanContext, data: &[u8]) -> GenericStats {
    let kind = InputKind::detect(data);
    let mut stats = GenericStats::default();

    for name in EmbeddedNames::new(data, kind) {
        let path = ctx.normalize(&name.raw);
        if path.is_empty() {
            continue;
        }
        stats.names += 1;
        if let Acceptance::Scheduled { .. } = accept(ctx, path) {
            stats.scheduled += 1;
        }
    }

    stats
}
