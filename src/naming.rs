//! Per-version naming tables.
//!
//! Dictionary versions differ only in naming: the saveframe category marker,
//! each tag category's label, and the local wire tag of each field key. These
//! tables are plain `const` data handed to the generic engine at construction.

/// Wire naming for one tag category under one dictionary version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryNaming {
    /// Category label used as the tag prefix, or `None` for flat (v2.1) tags.
    pub label: Option<&'static str>,
    /// `(field key, local wire tag)` pairs. Keys not listed are absent in
    /// this version.
    pub tags: &'static [(&'static str, &'static str)],
}

impl CategoryNaming {
    /// Local wire tag for a field key.
    #[must_use]
    pub fn tag(&self, key: &str) -> Option<&'static str> {
        self.tags
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, tag)| *tag)
    }

    /// Iterate over the keys named by this table.
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.tags.iter().map(|(k, _)| *k)
    }
}

/// Wire naming for a whole saveframe under one dictionary version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveframeNaming {
    /// Category marker value written into the marker tag.
    pub marker: &'static str,
    /// One naming table per tag category, in declaration order.
    pub categories: &'static [CategoryNaming],
}
