//! Rebuilding a tree from a skeleton and a leaf sequence.

use crate::flatten::rebuild;
use crate::{Result, SurplusPolicy, Tree, TreeError, Walker};

impl Walker<'_> {
    /// Rebuilds a tree shaped like `treedef`, filling its leaf positions with
    /// `leaves` in pre-order.
    ///
    /// `treedef` is usually a [`TreeDef`](crate::TreeDef), but any tree works:
    /// its own leaves only mark positions and are never copied into the
    /// result. Leaves are consumed in exactly the order [`Walker::flatten`]
    /// produces them.
    ///
    /// Fails with [`TreeError::ExhaustedLeaves`] if `leaves` runs out. What
    /// happens to leaves left over is decided by the walker's
    /// [`SurplusPolicy`].
    pub fn unflatten<I>(&self, treedef: &Tree, leaves: I) -> Result<Tree>
    where
        I: IntoIterator<Item = Tree>,
    {
        crate::trace!("unflatten");
        let mut leaves = leaves.into_iter();
        let mut consumed = 0usize;
        let tree = rebuild(self, treedef, |_| match leaves.next() {
            Some(leaf) => {
                consumed += 1;
                Ok(leaf)
            }
            None => {
                crate::debug!(consumed, "leaf sequence exhausted");
                Err(TreeError::ExhaustedLeaves { consumed })
            }
        })?;

        if self.surplus_policy() == SurplusPolicy::Reject && leaves.next().is_some() {
            crate::debug!(consumed, "surplus leaves rejected");
            return Err(TreeError::SurplusLeaves { consumed });
        }
        Ok(tree)
    }
}
