//! Central configuration constants for scanning limits and packing defaults.

/// Filename fields at or above this length are treated as corrupt.
pub const MAX_FILENAME_LEN: usize = 254;

/// Fixed texture header that precedes the optional effect marker.
pub const TEXTURE_HEADER_LEN: usize = 36;

/// Bytes at the start of a texture that never hold the base texture path.
pub const TEXTURE_TRAILER_FLOOR: usize = 56;

/// Extension of the archives the game loads resources from.
pub const ARCHIVE_EXTENSION: &str = "gro";

/// Extensions stored uncompressed when the output is derived from a world path.
pub const DEFAULT_STORED_EXTENSIONS: &[&str] = &["ogg", "mp3"];

/// Directory every world file lives under, relative to the game root.
pub const LEVELS_DIR: &str = "Levels";

/// Convenience function to turn user input like `.OGG` or `ogg` into `ogg`.
pub fn normalize_store_extension(v: &str) -> String {
    v.trim().trim_start_matches('.').to_lowercase()
}

/// Output archive name used when only a world path is given.
pub fn default_archive_name(world_stem: &str) -> String {
    format!("{}_pack.{}", world_stem, ARCHIVE_EXTENSION)
}
