//! Building the kind → operations table a traversal dispatches on.
//!
//! A [`Catalog`] knows every kind that *could* be registered, by name. A
//! [`Registry`] is the immutable selection of kinds active for a call,
//! resolved from a catalog once and then shared freely.
//!
//! # Classification precedence
//!
//! A value is classified by asking each registered kind, in order, whether it
//! [`accepts`](NodeOps::accepts) the value; the first that does wins. The
//! order is fixed when the registry is built:
//!
//! 1. extension kinds, in the order they were requested;
//! 2. built-in kinds, most structurally specific first:
//!    `none`, `record`, `ordered_dict`, `dict`, `tuple`, `list`.

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt::{self, Debug, Formatter};

use indexmap::IndexMap;

use crate::builtin::builtin_ops;
use crate::{NodeKind, NodeOps, Result, Tree, TreeError, Walker};

/// Label separator used when no [`KindOptions`] override it.
pub const DEFAULT_SEPARATOR: &str = "_";

/// Per-kind configuration handed to a kind's factory.
///
/// Built-in kinds ignore it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KindOptions {
    label_separator: Option<String>,
}

impl KindOptions {
    /// Default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the string that joins multi-part element labels, such as the
    /// per-axis indices of an array element.
    #[must_use]
    pub fn with_label_separator(mut self, separator: impl Into<String>) -> Self {
        self.label_separator = Some(separator.into());
        self
    }

    /// The label separator, defaulting to [`DEFAULT_SEPARATOR`].
    #[must_use]
    pub fn label_separator(&self) -> &str {
        self.label_separator.as_deref().unwrap_or(DEFAULT_SEPARATOR)
    }
}

/// Options keyed by kind name, as accepted by [`Registry::build`].
pub type KindOptionsMap = IndexMap<String, KindOptions>;

/// Creates the operations for one kind from its options.
pub type KindFactory = Arc<dyn Fn(&KindOptions) -> Arc<dyn NodeOps> + Send + Sync>;

/// Every kind that can be requested by name.
#[derive(Clone)]
pub struct Catalog {
    factories: IndexMap<String, KindFactory>,
}

impl Catalog {
    /// A catalog that knows no kinds.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            factories: IndexMap::new(),
        }
    }

    /// A catalog of the six built-in kinds.
    #[must_use]
    pub fn builtin() -> Self {
        let mut catalog = Self::empty();
        for kind in NodeKind::BUILTINS {
            let name = String::from(kind.name());
            catalog.factories.insert(
                name,
                Arc::new(move |_: &KindOptions| {
                    builtin_ops(&kind).unwrap_or_else(|| unreachable!("{kind} is built in"))
                }),
            );
        }
        catalog
    }

    /// Adds (or replaces) the factory for `name`.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn(&KindOptions) -> Arc<dyn NodeOps> + Send + Sync + 'static,
    {
        self.factories.insert(name.into(), Arc::new(factory));
        self
    }

    /// Builder-style [`Catalog::register`].
    #[must_use]
    pub fn with<F>(mut self, name: impl Into<String>, factory: F) -> Self
    where
        F: Fn(&KindOptions) -> Arc<dyn NodeOps> + Send + Sync + 'static,
    {
        self.register(name, factory);
        self
    }

    /// Returns `true` if `name` can be requested.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Known kind names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    fn instantiate(&self, name: &str, options: &KindOptions) -> Result<Arc<dyn NodeOps>> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| TreeError::UnknownKind {
                name: String::from(name),
            })?;
        Ok(factory(options))
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Debug for Catalog {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

/// Outcome of classifying a value against a registry.
#[derive(Clone, Copy)]
pub enum Classification<'r> {
    /// The value is not decomposed further.
    Leaf,
    /// The value is a node of the given kind.
    Node(&'r dyn NodeOps),
}

impl Classification<'_> {
    /// Returns `true` for [`Classification::Leaf`].
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Classification::Leaf)
    }

    /// The node kind, or `None` for a leaf.
    #[must_use]
    pub fn kind(&self) -> Option<NodeKind> {
        match self {
            Classification::Leaf => None,
            Classification::Node(ops) => Some(ops.kind()),
        }
    }
}

impl Debug for Classification<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Classification::Leaf => f.write_str("Leaf"),
            Classification::Node(ops) => write!(f, "Node({})", ops.kind()),
        }
    }
}

/// The active set of node kinds for a traversal.
///
/// Immutable once built; cloning is cheap and clones share their entries, so
/// one registry can serve any number of calls and threads.
#[derive(Clone)]
pub struct Registry {
    entries: Arc<[Arc<dyn NodeOps>]>,
}

impl Registry {
    /// A registry of the six built-in kinds.
    #[must_use]
    pub fn default_kinds() -> Self {
        let entries: Vec<Arc<dyn NodeOps>> = NodeKind::BUILTINS
            .iter()
            .filter_map(builtin_ops)
            .collect();
        Self {
            entries: entries.into(),
        }
    }

    /// A registry with no kinds: every value is a leaf.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            entries: Vec::<Arc<dyn NodeOps>>::new().into(),
        }
    }

    /// Starts a [`RegistryBuilder`] resolving names against `catalog`.
    #[must_use]
    pub fn builder(catalog: &Catalog) -> RegistryBuilder<'_> {
        RegistryBuilder::new(catalog)
    }

    /// Resolves `kinds` against `catalog`.
    ///
    /// With `include_defaults`, the six built-in kinds are added whether or
    /// not they were requested. Every name in `kinds` and every key of
    /// `options` must be known to the catalog.
    pub fn build<I, S>(
        catalog: &Catalog,
        kinds: I,
        options: &KindOptionsMap,
        include_defaults: bool,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = RegistryBuilder::new(catalog).include_defaults(include_defaults);
        for kind in kinds {
            builder = builder.kind(kind.as_ref());
        }
        for (name, opts) in options {
            builder = builder.options(name.as_str(), opts.clone());
        }
        builder.build()
    }

    /// Classifies `tree`. `is_leaf` can turn a node into a leaf, never the
    /// other way around.
    pub fn classify(&self, tree: &Tree, is_leaf: Option<&dyn Fn(&Tree) -> bool>) -> Classification<'_> {
        if is_leaf.is_some_and(|pred| pred(tree)) {
            return Classification::Leaf;
        }
        self.entries
            .iter()
            .find(|ops| ops.accepts(tree))
            .map_or(Classification::Leaf, |ops| Classification::Node(ops.as_ref()))
    }

    /// Registered kinds in precedence order.
    pub fn kinds(&self) -> impl Iterator<Item = NodeKind> + '_ {
        self.entries.iter().map(|ops| ops.kind())
    }

    /// Returns `true` if `kind` is registered.
    #[must_use]
    pub fn contains(&self, kind: &NodeKind) -> bool {
        self.kinds().any(|k| &k == kind)
    }

    /// Number of registered kinds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no kinds are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// A [`Walker`] over this registry with default settings.
    #[must_use]
    pub fn walker(&self) -> Walker<'_> {
        Walker::new(self)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::default_kinds()
    }
}

impl Debug for Registry {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Registry")
            .field(&self.kinds().collect::<Vec<_>>())
            .finish()
    }
}

/// Fluent construction of a [`Registry`].
///
/// ```
/// use leafwise::{Catalog, NodeKind, Registry};
///
/// let registry = Registry::builder(&Catalog::builtin())
///     .include_defaults(false)
///     .kind("list")
///     .kind("dict")
///     .build()
///     .unwrap();
/// assert_eq!(registry.kinds().collect::<Vec<_>>(), [NodeKind::Mapping, NodeKind::Sequence]);
/// ```
#[derive(Debug)]
pub struct RegistryBuilder<'c> {
    catalog: &'c Catalog,
    requested: Vec<String>,
    options: KindOptionsMap,
    include_defaults: bool,
}

impl<'c> RegistryBuilder<'c> {
    /// A builder that includes the defaults and no extra kinds.
    #[must_use]
    pub fn new(catalog: &'c Catalog) -> Self {
        Self {
            catalog,
            requested: Vec::new(),
            options: KindOptionsMap::new(),
            include_defaults: true,
        }
    }

    /// Requests a kind by name. Requesting a name twice has no extra effect.
    #[must_use]
    pub fn kind(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.requested.contains(&name) {
            self.requested.push(name);
        }
        self
    }

    /// Sets the options for a kind.
    #[must_use]
    pub fn options(mut self, name: impl Into<String>, options: KindOptions) -> Self {
        self.options.insert(name.into(), options);
        self
    }

    /// Whether the six built-in kinds are always included (default `true`).
    #[must_use]
    pub fn include_defaults(mut self, include: bool) -> Self {
        self.include_defaults = include;
        self
    }

    /// Resolves every requested name and orders the result by precedence.
    pub fn build(self) -> Result<Registry> {
        if let Some(name) = self
            .options
            .keys()
            .find(|name| !self.catalog.contains(name))
        {
            return Err(TreeError::UnknownKind { name: name.clone() });
        }

        let mut names = self.requested;
        if self.include_defaults {
            for kind in NodeKind::BUILTINS {
                let name = String::from(kind.name());
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }

        let default_options = KindOptions::default();
        let mut extensions = Vec::new();
        let mut builtins = Vec::new();
        for name in &names {
            let options = self.options.get(name).unwrap_or(&default_options);
            let ops = self.catalog.instantiate(name, options)?;
            match ops.kind().builtin_rank() {
                Some(rank) => builtins.push((rank, ops)),
                None => extensions.push(ops),
            }
        }
        builtins.sort_by_key(|(rank, _)| *rank);

        let entries: Vec<Arc<dyn NodeOps>> = extensions
            .into_iter()
            .chain(builtins.into_iter().map(|(_, ops)| ops))
            .collect();

        crate::debug!(
            kinds = ?entries.iter().map(|ops| ops.kind()).collect::<Vec<_>>(),
            "built registry"
        );

        Ok(Registry {
            entries: entries.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree;

    #[test]
    fn test_default_kinds_precedence() {
        let registry = Registry::default_kinds();
        assert_eq!(
            registry.kinds().collect::<Vec<_>>(),
            NodeKind::BUILTINS.to_vec()
        );
    }

    #[test]
    fn test_catalog_names_in_registration_order() {
        let catalog = Catalog::builtin().with("greedy", |_| -> Arc<dyn NodeOps> {
            Arc::new(GreedySequence)
        });
        let names: Vec<&str> = catalog.names().collect();
        assert_eq!(
            names,
            ["none", "record", "ordered_dict", "dict", "tuple", "list", "greedy"]
        );
        assert_eq!(
            alloc::format!("{:?}", Catalog::empty().with("greedy", |_| -> Arc<dyn NodeOps> {
                Arc::new(GreedySequence)
            })),
            r#"["greedy"]"#
        );
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let err = Registry::builder(&Catalog::builtin())
            .kind("ndarray")
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            TreeError::UnknownKind {
                name: "ndarray".into()
            }
        );
    }

    #[test]
    fn test_unknown_kind_in_options_is_rejected() {
        let mut options = KindOptionsMap::new();
        options.insert("frame".into(), KindOptions::new());
        let err = Registry::build(&Catalog::builtin(), ["list"], &options, false).unwrap_err();
        assert!(matches!(err, TreeError::UnknownKind { name } if name == "frame"));
    }

    #[test]
    fn test_without_defaults() {
        let registry = Registry::build(&Catalog::builtin(), ["tuple"], &KindOptionsMap::new(), false)
            .unwrap();
        assert_eq!(registry.len(), 1);
        assert!(registry.classify(&tree!((1, 2)), None).kind() == Some(NodeKind::Tuple));
        assert!(registry.classify(&tree!([1, 2]), None).is_leaf());
        assert!(registry.classify(&Tree::None, None).is_leaf());
    }

    #[test]
    fn test_is_leaf_only_downgrades() {
        let registry = Registry::default_kinds();
        let is_list = |t: &Tree| matches!(t, Tree::List(_));
        assert!(registry.classify(&tree!([1]), Some(&is_list)).is_leaf());

        let never = |_: &Tree| false;
        assert!(registry.classify(&Tree::Int(1), Some(&never)).is_leaf());
        assert!(!registry.classify(&tree!([1]), Some(&never)).is_leaf());
        let always = |_: &Tree| true;
        assert!(registry.classify(&tree!({"a": 1}), Some(&always)).is_leaf());
    }

    #[derive(Debug)]
    struct GreedySequence;

    impl NodeOps for GreedySequence {
        fn kind(&self) -> NodeKind {
            NodeKind::extension("greedy")
        }

        fn accepts(&self, tree: &Tree) -> bool {
            matches!(tree, Tree::List(_) | Tree::Tuple(_))
        }

        fn decompose<'t>(&self, node: &'t Tree) -> crate::Decomposed<'t> {
            crate::builtin::SequenceKind.decompose(node)
        }

        fn recompose(&self, aux: crate::Aux, children: Vec<Tree>) -> Result<Tree> {
            crate::builtin::SequenceKind.recompose(aux, children)
        }

        fn field_names(&self, node: &Tree) -> Vec<String> {
            crate::builtin::SequenceKind.field_names(node)
        }
    }

    #[test]
    fn test_extensions_take_precedence_over_builtins() {
        let catalog = Catalog::builtin().with("greedy", |_| -> Arc<dyn NodeOps> {
            Arc::new(GreedySequence)
        });
        let registry = Registry::builder(&catalog).kind("greedy").build().unwrap();
        assert_eq!(registry.kinds().next(), Some(NodeKind::extension("greedy")));
        assert_eq!(
            registry.classify(&tree!([1]), None).kind(),
            Some(NodeKind::extension("greedy"))
        );
        // Classification is stable across calls.
        for _ in 0..3 {
            assert_eq!(
                registry.classify(&tree!((1, 2)), None).kind(),
                Some(NodeKind::extension("greedy"))
            );
        }
    }

    #[test]
    fn test_duplicates_collapse() {
        let registry = Registry::builder(&Catalog::builtin())
            .kind("list")
            .kind("list")
            .build()
            .unwrap();
        assert_eq!(registry.len(), 6);
    }

    #[test]
    fn test_registry_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Registry>();
    }
}
