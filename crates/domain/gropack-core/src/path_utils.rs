use crate::{NormalizedPath, VariantFlags};

/// Top-level directories the alternate engine ships with an `MP` suffix
/// (`ModelsMP`, `TexturesMP`, ...).
const VARIANT_DIRS: [&str; 6] = ["Models", "Sounds", "Music", "Data", "Textures", "Animations"];
const VARIANT_INFIX: &[u8; 2] = b"mp";

pub struct ResourcePath;

impl ResourcePath {
    /// Canonicalize a filename extracted from a binary.
    ///
    /// Output always uses forward slashes, has no duplicate separators and no
    /// leading separator. The returned flags record every idiom of the
    /// alternate engine that the raw string used; merging them into the run's
    /// flags is up to the caller.
    pub fn normalize(raw: &str) -> (NormalizedPath, VariantFlags) {
        let mut flags = VariantFlags::empty();

        // Forward slashes are only written by the alternate engine
        if raw.contains('/') {
            flags.insert(VariantFlags::FORWARD_SLASH);
        }

        let mut out = String::with_capacity(raw.len());
        for c in raw.chars() {
            let c = if c == '\\' { '/' } else { c };

            if c == '/' && out.ends_with('/') {
                flags.insert(VariantFlags::DOUBLE_SLASH);
                continue;
            }
            out.push(c);
        }

        if out.starts_with('/') {
            out.remove(0);
            flags.insert(VariantFlags::LEADING_SLASH);
        }

        (NormalizedPath(out), flags)
    }

    /// For comparisons (dependency keys, dedup), use a canonical lowercase form.
    pub fn canonicalize(raw: &str) -> String {
        Self::normalize(raw).0.into_string().to_lowercase()
    }

    /// Extension of the final path segment, without the dot.
    pub fn extension(path: &str) -> Option<&str> {
        let name = path.rsplit('/').next().unwrap_or(path);
        name.rfind('.').map(|i| &name[i + 1..])
    }

    /// The path with the extension of its final segment removed.
    pub fn strip_extension(path: &str) -> &str {
        match Self::extension(path) {
            Some(ext) => &path[..path.len() - ext.len() - 1],
            None => path,
        }
    }

    pub fn with_extension(path: &str, ext: &str) -> String {
        format!("{}.{}", Self::strip_extension(path), ext)
    }

    /// Map an alternate-engine directory onto the regular one
    /// (`ModelsMP/Tree.mdl` -> `Models/Tree.mdl`). `None` if the path does not
    /// start with one of those directories.
    pub fn without_variant_dir(path: &str) -> Option<String> {
        let bytes = path.as_bytes();

        VARIANT_DIRS.iter().find_map(|dir| {
            let n = dir.len();
            if bytes.len() < n + 2
                || !bytes[..n].eq_ignore_ascii_case(dir.as_bytes())
                || !bytes[n..n + 2].eq_ignore_ascii_case(VARIANT_INFIX)
            {
                return None;
            }

            let mut fixed = String::with_capacity(path.len() - 2);
            fixed.push_str(&path[..n]);
            fixed.push_str(&path[n + 2..]);
            Some(fixed)
        })
    }

    /// The alternate engine renamed some resources, replacing spaces with underscores.
    pub fn with_underscores(path: &str) -> String {
        path.replace(' ', "_")
    }

    /// Path of a file that shares the stem of `path` but carries a suffix
    /// glued to it (`Levels/Map.wld` + `Tbn.tex` -> `Levels/MapTbn.tex`).
    pub fn sibling(path: &str, suffix: &str) -> String {
        format!("{}{}", Self::strip_extension(path), suffix)
    }
}
