//! Node kind identifiers.

use alloc::borrow::Cow;
use alloc::string::String;
use core::fmt::{self, Display, Formatter};
use core::str::FromStr;

use crate::TreeError;

/// Identifier of a registered container shape.
///
/// Built-in kinds have fixed configuration names (see [`NodeKind::name`]);
/// extension kinds carry the name they were registered under in a
/// [`Catalog`](crate::Catalog).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NodeKind {
    /// Positional sequence ([`Tree::List`](crate::Tree::List)), `list`.
    Sequence,
    /// Fixed-size sequence ([`Tree::Tuple`](crate::Tree::Tuple)), `tuple`.
    Tuple,
    /// Insertion-ordered map ([`Tree::Dict`](crate::Tree::Dict)), `dict`.
    Mapping,
    /// Distinguished ordered map ([`Tree::OrderedDict`](crate::Tree::OrderedDict)), `ordered_dict`.
    OrderedMapping,
    /// Named-field record ([`Tree::Record`](crate::Tree::Record)), `record`.
    Record,
    /// Explicit absence ([`Tree::None`](crate::Tree::None)) as a container with no children, `none`.
    None,
    /// A kind supplied by an external adapter.
    Extension(Cow<'static, str>),
}

impl NodeKind {
    /// Built-in kinds in classification precedence order: most structurally
    /// specific first.
    pub const BUILTINS: [NodeKind; 6] = [
        NodeKind::None,
        NodeKind::Record,
        NodeKind::OrderedMapping,
        NodeKind::Mapping,
        NodeKind::Tuple,
        NodeKind::Sequence,
    ];

    /// Creates an extension kind identifier.
    pub fn extension(name: impl Into<Cow<'static, str>>) -> Self {
        NodeKind::Extension(name.into())
    }

    /// The configuration name of this kind.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            NodeKind::Sequence => "list",
            NodeKind::Tuple => "tuple",
            NodeKind::Mapping => "dict",
            NodeKind::OrderedMapping => "ordered_dict",
            NodeKind::Record => "record",
            NodeKind::None => "none",
            NodeKind::Extension(name) => name,
        }
    }

    /// Position in [`NodeKind::BUILTINS`], or `None` for extension kinds.
    #[must_use]
    pub fn builtin_rank(&self) -> Option<usize> {
        NodeKind::BUILTINS.iter().position(|k| k == self)
    }
}

impl Display for NodeKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parses a built-in kind name.
///
/// Extension names are only known to a [`Catalog`](crate::Catalog) and fail
/// here with [`TreeError::UnknownKind`].
impl FromStr for NodeKind {
    type Err = TreeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodeKind::BUILTINS
            .into_iter()
            .find(|k| k.name() == s)
            .ok_or_else(|| TreeError::UnknownKind {
                name: String::from(s),
            })
    }
}
