//! The capability contract every node kind implements.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt::{self, Debug, Formatter};

use crate::{NodeKind, Result, Tree, TreeError};

/// Auxiliary reconstruction data produced by [`NodeOps::decompose`] and
/// handed back to [`NodeOps::recompose`].
///
/// The engine never looks inside; each kind decides what to store.
pub struct Aux(Box<dyn Any + Send + Sync>);

impl Aux {
    /// Wraps a value.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self(Box::new(value))
    }

    /// Aux data for kinds that need none.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(())
    }

    /// Takes the value back out, failing with [`TreeError::Recompose`] if it
    /// is not a `T`.
    pub fn take<T: Any>(self, kind: &NodeKind) -> Result<T> {
        self.0
            .downcast::<T>()
            .map(|b| *b)
            .map_err(|_| TreeError::Recompose {
                kind: kind.clone(),
                reason: String::from("auxiliary data has an unexpected type"),
            })
    }
}

impl Debug for Aux {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("Aux(..)")
    }
}

/// A node split into its ordered children and reconstruction data.
#[derive(Debug)]
pub struct Decomposed<'t> {
    /// Children in traversal order.
    pub children: Vec<&'t Tree>,
    /// Data [`NodeOps::recompose`] needs to rebuild the node.
    pub aux: Aux,
}

impl<'t> Decomposed<'t> {
    /// A decomposition with the given children.
    pub fn new(children: Vec<&'t Tree>, aux: Aux) -> Self {
        Self { children, aux }
    }

    /// A childless decomposition.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(Vec::new(), Aux::empty())
    }
}

/// Operations a registered container kind provides to the engine.
///
/// Adapters for new container shapes implement this trait and are registered
/// through a [`Catalog`](crate::Catalog); the engine has no special cases for
/// any kind.
///
/// Implementations must uphold two laws:
///
/// - `recompose(decompose(node).aux, decompose(node).children)` rebuilds a
///   value equal to `node`;
/// - `field_names(node)` returns one name per child, in the order
///   `decompose(node)` returns the children.
pub trait NodeOps: Send + Sync + Debug {
    /// The kind this implementation handles.
    fn kind(&self) -> NodeKind;

    /// Returns `true` if `tree` is a node of this kind.
    fn accepts(&self, tree: &Tree) -> bool;

    /// Splits a node into ordered children and aux data.
    ///
    /// Only called on values for which [`accepts`](NodeOps::accepts)
    /// returned `true`.
    fn decompose<'t>(&self, node: &'t Tree) -> Decomposed<'t>;

    /// Rebuilds a node from aux data and (already rebuilt) children.
    fn recompose(&self, aux: Aux, children: Vec<Tree>) -> Result<Tree>;

    /// Names of the children, used to build leaf names.
    fn field_names(&self, node: &Tree) -> Vec<String>;
}
