//! The per-call traversal context.

use core::fmt::{self, Debug, Formatter};

use crate::registry::{Classification, DEFAULT_SEPARATOR};
use crate::{Registry, Tree};

/// What [`Walker::unflatten`] does with leaves left over once the skeleton
/// is complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SurplusPolicy {
    /// Drop them silently.
    #[default]
    Ignore,
    /// Fail with [`TreeError::SurplusLeaves`](crate::TreeError::SurplusLeaves).
    Reject,
}

/// A registry plus the settings of one kind of traversal.
///
/// Every tree operation lives on `Walker`: flattening, rebuilding, mapping,
/// naming, comparing and updating. A walker is `Copy` and borrows everything
/// it uses, so it can be created per call or kept around.
///
/// ```
/// use leafwise::{Registry, tree};
///
/// let registry = Registry::default_kinds();
/// let walker = registry.walker();
///
/// let t = tree!([0, [1, 2], {"a": 3, "b": 5}]);
/// let (leaves, treedef) = walker.flatten_with_structure(&t).unwrap();
/// assert_eq!(leaves, [tree!(0), tree!(1), tree!(2), tree!(3), tree!(5)]);
/// assert_eq!(walker.leaf_names(&t), ["0", "1_0", "1_1", "2_a", "2_b"]);
/// assert_eq!(walker.unflatten(&treedef, leaves).unwrap(), t);
/// ```
#[derive(Clone, Copy)]
pub struct Walker<'r> {
    registry: &'r Registry,
    is_leaf: Option<&'r (dyn Fn(&Tree) -> bool + 'r)>,
    separator: &'r str,
    surplus: SurplusPolicy,
}

impl<'r> Walker<'r> {
    /// A walker with no leaf predicate, `_` as name separator and
    /// [`SurplusPolicy::Ignore`].
    #[must_use]
    pub fn new(registry: &'r Registry) -> Self {
        Self {
            registry,
            is_leaf: None,
            separator: DEFAULT_SEPARATOR,
            surplus: SurplusPolicy::default(),
        }
    }

    /// Treats every value for which `is_leaf` returns `true` as a leaf, even
    /// if its kind is registered.
    #[must_use]
    pub fn is_leaf(mut self, is_leaf: &'r (dyn Fn(&Tree) -> bool + 'r)) -> Self {
        self.is_leaf = Some(is_leaf);
        self
    }

    /// Sets the string that joins path segments in leaf names.
    #[must_use]
    pub fn separator(mut self, separator: &'r str) -> Self {
        self.separator = separator;
        self
    }

    /// Sets the policy for leaves left over after unflattening.
    #[must_use]
    pub fn surplus(mut self, policy: SurplusPolicy) -> Self {
        self.surplus = policy;
        self
    }

    /// The registry this walker dispatches on.
    #[must_use]
    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    pub(crate) fn name_separator(&self) -> &'r str {
        self.separator
    }

    pub(crate) fn surplus_policy(&self) -> SurplusPolicy {
        self.surplus
    }

    /// Classifies `tree` under this walker's registry and leaf predicate.
    #[must_use]
    pub fn classify(&self, tree: &Tree) -> Classification<'r> {
        self.registry.classify(tree, self.is_leaf)
    }
}

impl Debug for Walker<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Walker")
            .field("registry", self.registry)
            .field("is_leaf", &self.is_leaf.is_some())
            .field("separator", &self.separator)
            .field("surplus", &self.surplus)
            .finish()
    }
}
