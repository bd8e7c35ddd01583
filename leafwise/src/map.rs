//! Leaf-wise transforms over one or several trees.

use alloc::vec::Vec;

use crate::{Result, Tree, TreeError, Walker};

impl Walker<'_> {
    /// Applies `f` to every leaf and rebuilds the tree around the results.
    ///
    /// `tree` itself is the template for the result, so the walker's
    /// `is_leaf` sees the same values on the way down and on the way up.
    pub fn map<F>(&self, tree: &Tree, mut f: F) -> Result<Tree>
    where
        F: FnMut(&Tree) -> Tree,
    {
        self.try_map(tree, |leaf| Ok::<_, TreeError>(f(leaf)))
    }

    /// Like [`Walker::map`], for a fallible `f`.
    ///
    /// The first error `f` returns is handed back as is.
    pub fn try_map<F, E>(&self, tree: &Tree, f: F) -> Result<Tree, E>
    where
        F: FnMut(&Tree) -> Result<Tree, E>,
        E: From<TreeError>,
    {
        let mapped = self.leaves(tree).map(f).collect::<Result<Vec<_>, E>>()?;
        Ok(self.unflatten(tree, mapped)?)
    }

    /// Applies `f` position-wise across the leaves of several trees that
    /// share one structure, and rebuilds the result with that structure.
    ///
    /// `f` receives one leaf per tree, in argument order.
    pub fn multimap<F>(&self, trees: &[&Tree], mut f: F) -> Result<Tree>
    where
        F: FnMut(&[&Tree]) -> Tree,
    {
        self.try_multimap(trees, |row| Ok::<_, TreeError>(f(row)))
    }

    /// Like [`Walker::multimap`], for a fallible `f`.
    ///
    /// The first tree is the template for the result. Skeletons are only
    /// built, and compared, when there is more than one tree.
    ///
    /// Fails with [`TreeError::StructureMismatch`] naming the first tree
    /// whose skeleton differs from the first tree's, or
    /// [`TreeError::EmptyMultimap`] if `trees` is empty. Errors from `f` are
    /// handed back as is.
    pub fn try_multimap<F, E>(&self, trees: &[&Tree], mut f: F) -> Result<Tree, E>
    where
        F: FnMut(&[&Tree]) -> Result<Tree, E>,
        E: From<TreeError>,
    {
        let Some((first, rest)) = trees.split_first() else {
            return Err(TreeError::EmptyMultimap.into());
        };

        let first_leaves: Vec<&Tree> = self.leaves(first).collect();
        let mut columns = Vec::with_capacity(trees.len());
        if !rest.is_empty() {
            let treedef = self.structure(first)?;
            for (offset, tree) in rest.iter().enumerate() {
                let leaves: Vec<&Tree> = self.leaves(tree).collect();
                if self.structure(tree)? != treedef {
                    let index = offset + 1;
                    crate::debug!(index, "multimap structure mismatch");
                    return Err(TreeError::StructureMismatch {
                        index,
                        expected_leaves: first_leaves.len(),
                        actual_leaves: leaves.len(),
                    }
                    .into());
                }
                columns.push(leaves);
            }
        }
        columns.insert(0, first_leaves);

        let width = columns[0].len();
        let mut row: Vec<&Tree> = Vec::with_capacity(columns.len());
        let mut mapped = Vec::with_capacity(width);
        for i in 0..width {
            row.clear();
            row.extend(columns.iter().map(|column| column[i]));
            mapped.push(f(&row)?);
        }
        Ok(self.unflatten(first, mapped)?)
    }
}
