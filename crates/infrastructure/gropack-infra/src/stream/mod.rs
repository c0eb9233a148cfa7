use byteorder::{ByteOrder, LittleEndian};
use gropack_config::MAX_FILENAME_LEN;

pub type Tag = [u8; 4];

#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    #[error("expected chunk '{}' at offset {offset}, found '{}'", show_tag(.expected), show_tag(.found))]
    UnexpectedTag {
        expected: Tag,
        found: Vec<u8>,
        offset: usize,
    },
    #[error("unexpected end of stream at offset {offset} (wanted {wanted} bytes)")]
    UnexpectedEof { offset: usize, wanted: usize },
    #[error("negative string length {len} at offset {offset}")]
    NegativeLength { len: i32, offset: usize },
}

fn show_tag(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Forward-only cursor over a chunked little-endian byte buffer.
///
/// Seeking past the end is allowed; reads then fail with
/// [`StreamError::UnexpectedEof`] while peeks just come back short.
#[derive(Debug, Clone)]
pub struct ChunkReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ChunkReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Unread part of the buffer; empty once the cursor is at or past the end.
    pub fn remaining(&self) -> &'a [u8] {
        self.data.get(self.pos..).unwrap_or(&[])
    }

    pub fn seek(&mut self, pos: usize) {
        self.pos = pos;
    }

    pub fn skip(&mut self, n: usize) {
        self.pos = self.pos.saturating_add(n);
    }

    /// Up to `n` bytes at the cursor without consuming them.
    pub fn peek(&self, n: usize) -> &'a [u8] {
        let rest = self.remaining();
        &rest[..n.min(rest.len())]
    }

    pub fn peek_tag(&self, tag: &Tag) -> bool {
        self.peek(4) == tag
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], StreamError> {
        let rest = self.remaining();
        if rest.len() < n {
            return Err(StreamError::UnexpectedEof {
                offset: self.pos,
                wanted: n,
            });
        }
        self.pos += n;
        Ok(&rest[..n])
    }

    /// Consume a 4-byte chunk tag and fail if it is not `tag`.
    pub fn expect(&mut self, tag: &Tag) -> Result<(), StreamError> {
        let offset = self.pos;
        let found = self.read_bytes(4)?;
        if found != tag {
            return Err(StreamError::UnexpectedTag {
                expected: *tag,
                found: found.to_vec(),
                offset,
            });
        }
        Ok(())
    }

    pub fn read_i32(&mut self) -> Result<i32, StreamError> {
        Ok(LittleEndian::read_i32(self.read_bytes(4)?))
    }

    pub fn read_u32(&mut self) -> Result<u32, StreamError> {
        Ok(LittleEndian::read_u32(self.read_bytes(4)?))
    }

    /// Length-prefixed string with no length ceiling (world names, descriptions).
    pub fn read_string(&mut self) -> Result<String, StreamError> {
        let offset = self.pos;
        let len = self.read_i32()?;
        if len < 0 {
            return Err(StreamError::NegativeLength { len, offset });
        }
        let bytes = self.read_bytes(len as usize)?;
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }

    /// Length-prefixed filename.
    ///
    /// A negative length or one at or above [`MAX_FILENAME_LEN`] marks the
    /// field as corrupt: `Ok(None)` is returned and the cursor stays right
    /// after the length field.
    pub fn read_filename(&mut self) -> Result<Option<String>, StreamError> {
        let len = self.read_i32()?;
        if len < 0 || len as usize >= MAX_FILENAME_LEN {
            return Ok(None);
        }
        let bytes = self.read_bytes(len as usize)?;
        Ok(Some(String::from_utf8_lossy(bytes).into_owned()))
    }

    /// Bytes up to (not including) the next NUL, or up to the end of the
    /// stream. The NUL itself is consumed.
    pub fn read_until_nul(&mut self) -> &'a [u8] {
        let rest = self.remaining();
        match rest.iter().position(|&b| b == 0) {
            Some(n) => {
                self.pos += n + 1;
                &rest[..n]
            }
            None => {
                self.pos += rest.len();
                rest
            }
        }
    }
}
