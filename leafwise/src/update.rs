//! Name-keyed overlay of one tree's leaves onto another.

use alloc::string::String;

use indexmap::IndexMap;

use crate::{Result, Tree, Walker};

impl Walker<'_> {
    /// Replaces the leaves of `tree` with the leaves of `other` that carry
    /// the same name.
    ///
    /// Both trees are keyed by [`Walker::leaf_names`]. `other` may be
    /// structurally smaller than `tree` or only partially overlap it. Its
    /// names that `tree` does not have are appended after `tree`'s own
    /// leaves, so they are dropped under [`SurplusPolicy::Ignore`] and
    /// rejected under [`SurplusPolicy::Reject`].
    ///
    /// [`SurplusPolicy::Ignore`]: crate::SurplusPolicy::Ignore
    /// [`SurplusPolicy::Reject`]: crate::SurplusPolicy::Reject
    pub fn update(&self, tree: &Tree, other: &Tree) -> Result<Tree> {
        crate::trace!("update");
        let mut overlay: IndexMap<String, Tree> = self
            .leaf_names(tree)
            .into_iter()
            .zip(self.leaves(tree).cloned())
            .collect();
        overlay.extend(
            self.leaf_names(other)
                .into_iter()
                .zip(self.leaves(other).cloned()),
        );
        self.unflatten(tree, overlay.into_values())
    }
}
