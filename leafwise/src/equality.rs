//! Structural equality with pluggable per-leaf comparison.

use alloc::sync::Arc;
use core::fmt::{self, Debug, Formatter};

use indexmap::IndexMap;

use crate::{Frame, NdArray, Series, Tree, TreeKind, Walker};

/// Compares two leaves, returning one boolean for the whole value.
pub type LeafEq = Arc<dyn Fn(&Tree, &Tree) -> bool + Send + Sync>;

/// Per-leaf-kind equality functions used by [`Walker::equal_with`].
///
/// A leaf is compared with the checker registered for the kind of the leaf
/// from the first tree, or with `==` when there is none.
///
/// The default table covers the array-like leaves. Two arrays are equal when
/// their shapes match and every pair of elements is `==`, so a NaN element
/// makes them unequal. Two series or frames are equal when their labels match
/// and every pair of cells is equal or both NaN.
#[derive(Clone)]
pub struct EqualityCheckers {
    checkers: IndexMap<TreeKind, LeafEq>,
}

impl EqualityCheckers {
    /// A table with no checkers: every leaf is compared with `==`.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            checkers: IndexMap::new(),
        }
    }

    /// Adds (or replaces) the checker for `kind`.
    pub fn insert<F>(&mut self, kind: TreeKind, checker: F) -> &mut Self
    where
        F: Fn(&Tree, &Tree) -> bool + Send + Sync + 'static,
    {
        self.checkers.insert(kind, Arc::new(checker));
        self
    }

    /// Builder-style [`EqualityCheckers::insert`].
    #[must_use]
    pub fn with<F>(mut self, kind: TreeKind, checker: F) -> Self
    where
        F: Fn(&Tree, &Tree) -> bool + Send + Sync + 'static,
    {
        self.insert(kind, checker);
        self
    }

    /// The checker for `kind`, if one is registered.
    #[must_use]
    pub fn get(&self, kind: TreeKind) -> Option<&LeafEq> {
        self.checkers.get(&kind)
    }

    fn leaves_equal(&self, a: &Tree, b: &Tree) -> bool {
        match self.get(a.kind()) {
            Some(checker) => checker(a, b),
            None => a == b,
        }
    }
}

impl Default for EqualityCheckers {
    fn default() -> Self {
        Self::empty()
            .with(TreeKind::Array, |a, b| match (a, b) {
                (Tree::Array(a), Tree::Array(b)) => arrays_equal(a, b),
                _ => false,
            })
            .with(TreeKind::Series, |a, b| match (a, b) {
                (Tree::Series(a), Tree::Series(b)) => series_equal(a, b),
                _ => false,
            })
            .with(TreeKind::Frame, |a, b| match (a, b) {
                (Tree::Frame(a), Tree::Frame(b)) => frames_equal(a, b),
                _ => false,
            })
    }
}

impl Debug for EqualityCheckers {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.checkers.keys()).finish()
    }
}

fn cells_equal(a: &[Tree], b: &[Tree]) -> bool {
    a.len() == b.len()
        && a.iter().zip(b).all(|pair| match pair {
            (Tree::Float(x), Tree::Float(y)) if x.is_nan() && y.is_nan() => true,
            (x, y) => x == y,
        })
}

fn arrays_equal(a: &NdArray, b: &NdArray) -> bool {
    a.shape() == b.shape() && a.data() == b.data()
}

fn series_equal(a: &Series, b: &Series) -> bool {
    a.index() == b.index() && a.name() == b.name() && cells_equal(a.values(), b.values())
}

fn frames_equal(a: &Frame, b: &Frame) -> bool {
    a.index() == b.index() && a.columns() == b.columns() && cells_equal(a.cells(), b.cells())
}

impl Walker<'_> {
    /// Structural equality under the default [`EqualityCheckers`].
    #[must_use]
    pub fn equal(&self, a: &Tree, b: &Tree) -> bool {
        self.equal_with(a, b, &EqualityCheckers::default())
    }

    /// Returns `true` if `a` and `b` have identical leaf names and pairwise
    /// equal leaves under `checkers`.
    ///
    /// Stops at the first name mismatch or the first unequal pair of leaves.
    #[must_use]
    pub fn equal_with(&self, a: &Tree, b: &Tree, checkers: &EqualityCheckers) -> bool {
        crate::trace!("equal");
        if self.leaf_names(a) != self.leaf_names(b) {
            crate::debug!("trees differ in leaf names");
            return false;
        }
        self.leaves(a)
            .zip(self.leaves(b))
            .all(|(x, y)| checkers.leaves_equal(x, y))
    }
}
