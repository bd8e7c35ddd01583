//! Pre-order descent: leaf extraction and skeleton construction.
//!
//! Both directions share one explicit-stack engine ([`rebuild`]), so the
//! skeleton a flatten produces is always consumable by unflatten, and tree
//! depth is bounded by the heap rather than the call stack.

use alloc::vec::Vec;
use core::fmt::{self, Display, Formatter};
use core::ops::Deref;

use crate::registry::Classification;
use crate::{Aux, Decomposed, NodeOps, Result, Tree, Walker};

/// The structure of a tree: a copy with every leaf replaced by
/// [`Tree::Placeholder`].
///
/// Dereferences to the underlying [`Tree`], so it classifies and decomposes
/// like any other tree and can be passed wherever a template is expected.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeDef(Tree);

impl TreeDef {
    /// The skeleton as a plain tree.
    #[must_use]
    pub fn as_tree(&self) -> &Tree {
        &self.0
    }

    /// Unwraps the skeleton.
    #[must_use]
    pub fn into_tree(self) -> Tree {
        self.0
    }
}

impl Deref for TreeDef {
    type Target = Tree;

    fn deref(&self) -> &Tree {
        &self.0
    }
}

impl AsRef<Tree> for TreeDef {
    fn as_ref(&self) -> &Tree {
        &self.0
    }
}

impl Display for TreeDef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

/// Lazy pre-order iterator over the leaves of a tree.
///
/// Yields exactly the sequence [`Walker::flatten`] returns, by reference.
/// Dropping it early is all cancellation takes.
pub struct Leaves<'w, 't> {
    walker: Walker<'w>,
    stack: Vec<alloc::vec::IntoIter<&'t Tree>>,
}

impl<'t> Iterator for Leaves<'_, 't> {
    type Item = &'t Tree;

    fn next(&mut self) -> Option<&'t Tree> {
        loop {
            let top = self.stack.last_mut()?;
            let Some(tree) = top.next() else {
                self.stack.pop();
                continue;
            };
            match self.walker.classify(tree) {
                Classification::Leaf => return Some(tree),
                Classification::Node(ops) => {
                    self.stack.push(ops.decompose(tree).children.into_iter());
                }
            }
        }
    }
}

/// An open container on the rebuild stack.
struct OpenNode<'r, 't> {
    ops: &'r dyn NodeOps,
    aux: Aux,
    pending: alloc::vec::IntoIter<&'t Tree>,
    built: Vec<Tree>,
}

impl OpenNode<'_, '_> {
    fn close(self) -> Result<Tree> {
        self.ops.recompose(self.aux, self.built)
    }
}

/// Rebuilds `template` bottom-up, asking `on_leaf` for the value of every
/// leaf position in pre-order.
pub(crate) fn rebuild<'t>(
    walker: &Walker<'_>,
    template: &'t Tree,
    mut on_leaf: impl FnMut(&'t Tree) -> Result<Tree>,
) -> Result<Tree> {
    let mut stack: Vec<OpenNode<'_, 't>> = Vec::new();
    let mut next = Some(template);
    let mut finished: Option<Tree> = None;

    loop {
        if let Some(tree) = next.take() {
            match walker.classify(tree) {
                Classification::Leaf => finished = Some(on_leaf(tree)?),
                Classification::Node(ops) => {
                    let Decomposed { children, aux } = ops.decompose(tree);
                    stack.push(OpenNode {
                        ops,
                        aux,
                        built: Vec::with_capacity(children.len()),
                        pending: children.into_iter(),
                    });
                }
            }
        }

        if let Some(value) = finished.take() {
            match stack.last_mut() {
                Some(parent) => parent.built.push(value),
                None => return Ok(value),
            }
        }

        let Some(top) = stack.last_mut() else {
            unreachable!("a leaf root returns before any node is opened")
        };
        match top.pending.next() {
            Some(child) => next = Some(child),
            None => {
                if let Some(done) = stack.pop() {
                    finished = Some(done.close()?);
                }
            }
        }
    }
}

impl<'r> Walker<'r> {
    /// Iterates over the leaves of `tree` in pre-order without collecting
    /// them.
    pub fn leaves<'t>(&self, tree: &'t Tree) -> Leaves<'r, 't> {
        Leaves {
            walker: *self,
            stack: alloc::vec![alloc::vec![tree].into_iter()],
        }
    }

    /// Collects the leaves of `tree` in pre-order.
    ///
    /// Shared subtrees are visited once per occurrence.
    #[must_use]
    pub fn flatten(&self, tree: &Tree) -> Vec<Tree> {
        crate::trace!("flatten");
        self.leaves(tree).cloned().collect()
    }

    /// Collects the leaves of `tree` and its skeleton in one descent.
    ///
    /// Building the skeleton recomposes every node around
    /// [`Tree::Placeholder`] children. A kind that refuses those children
    /// fails here with its [`TreeError::Recompose`](crate::TreeError::Recompose).
    pub fn flatten_with_structure(&self, tree: &Tree) -> Result<(Vec<Tree>, TreeDef)> {
        crate::trace!("flatten_with_structure");
        let mut leaves = Vec::new();
        let skeleton = rebuild(self, tree, |leaf| {
            leaves.push(leaf.clone());
            Ok(Tree::Placeholder)
        })?;
        Ok((leaves, TreeDef(skeleton)))
    }

    /// The skeleton of `tree`.
    pub fn structure(&self, tree: &Tree) -> Result<TreeDef> {
        rebuild(self, tree, |_| Ok(Tree::Placeholder)).map(TreeDef)
    }
}
