use serde::Serialize;
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Evidence that the scanned resources come from the alternate engine fork.
///
/// Bits are only ever added during a run, never cleared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct VariantFlags(u8);

impl VariantFlags {
    /// A filename used forward slashes.
    pub const FORWARD_SLASH: Self = Self(1 << 0);
    /// A filename contained doubled separators.
    pub const DOUBLE_SLASH: Self = Self(1 << 1);
    /// A filename started with a separator.
    pub const LEADING_SLASH: Self = Self(1 << 2);
    /// A world carried a sub-chunk only the alternate engine writes.
    pub const WORLD_CHUNK: Self = Self(1 << 3);
    /// The game installation was identified as the alternate engine.
    pub const INSTALL_PROBE: Self = Self(1 << 4);
    /// Requested by the user.
    pub const DECLARED: Self = Self(1 << 5);

    const NAMES: [(Self, &'static str); 6] = [
        (Self::FORWARD_SLASH, "forward-slash"),
        (Self::DOUBLE_SLASH, "double-slash"),
        (Self::LEADING_SLASH, "leading-slash"),
        (Self::WORLD_CHUNK, "world-chunk"),
        (Self::INSTALL_PROBE, "install-probe"),
        (Self::DECLARED, "declared"),
    ];

    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    /// Bits in `self` that `other` does not have yet.
    pub const fn difference(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    /// Any evidence at all switches the fallback lookups on.
    pub const fn is_alternate(self) -> bool {
        self.0 != 0
    }
}

impl BitOr for VariantFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for VariantFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.insert(rhs);
    }
}

impl fmt::Display for VariantFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }

        let mut first = true;
        for (flag, name) in Self::NAMES {
            if self.contains(flag) {
                if !first {
                    f.write_str("|")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        Ok(())
    }
}
