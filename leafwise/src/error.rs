//! Error type shared by registry construction and the traversal engine.

use alloc::string::String;

use crate::NodeKind;

/// Result alias used throughout the crate.
pub type Result<T, E = TreeError> = core::result::Result<T, E>;

/// Error returned by registry construction, unflattening and the derived
/// operations built on them.
///
/// Errors raised by user closures passed to [`Walker::try_map`] or
/// [`Walker::try_multimap`] are never wrapped in this type; they come back
/// to the caller unchanged.
///
/// [`Walker::try_map`]: crate::Walker::try_map
/// [`Walker::try_multimap`]: crate::Walker::try_multimap
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TreeError {
    /// A kind name was requested that the catalog does not know.
    UnknownKind {
        /// The name as it was requested.
        name: String,
    },

    /// Trees handed to a multimap do not share one structure.
    StructureMismatch {
        /// Position (0-based) of the first tree whose structure differs from
        /// the first tree's.
        index: usize,
        /// Leaf count of the first tree.
        expected_leaves: usize,
        /// Leaf count of the divergent tree.
        actual_leaves: usize,
    },

    /// Unflattening ran out of leaves before the skeleton was complete.
    ExhaustedLeaves {
        /// Number of leaves consumed before the sequence ran dry.
        consumed: usize,
    },

    /// Unflattening finished the skeleton with leaves left over, and the
    /// walker was configured with [`SurplusPolicy::Reject`].
    ///
    /// [`SurplusPolicy::Reject`]: crate::SurplusPolicy::Reject
    SurplusLeaves {
        /// Number of leaves the skeleton consumed.
        consumed: usize,
    },

    /// A node kind could not rebuild a container from its auxiliary data and
    /// children.
    Recompose {
        /// The kind that failed.
        kind: NodeKind,
        /// Human readable cause.
        reason: String,
    },

    /// A container was built with an element count that does not match its
    /// declared shape.
    ShapeMismatch {
        /// Number of elements the shape requires.
        expected: usize,
        /// Number of elements supplied.
        actual: usize,
    },

    /// A multimap was called without any trees.
    EmptyMultimap,
}

impl core::fmt::Display for TreeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TreeError::UnknownKind { name } => {
                write!(f, "unknown node kind `{name}`")
            }
            TreeError::StructureMismatch {
                index,
                expected_leaves,
                actual_leaves,
            } => {
                write!(
                    f,
                    "tree {index} does not have the structure of tree 0 ({actual_leaves} leaves, expected {expected_leaves})"
                )
            }
            TreeError::ExhaustedLeaves { consumed } => {
                write!(
                    f,
                    "ran out of leaves after {consumed} while rebuilding the tree"
                )
            }
            TreeError::SurplusLeaves { consumed } => {
                write!(
                    f,
                    "leaves left over after the skeleton consumed {consumed}"
                )
            }
            TreeError::Recompose { kind, reason } => {
                write!(f, "cannot recompose {kind} node: {reason}")
            }
            TreeError::ShapeMismatch { expected, actual } => {
                write!(f, "shape requires {expected} elements, got {actual}")
            }
            TreeError::EmptyMultimap => f.write_str("multimap needs at least one tree"),
        }
    }
}

impl core::error::Error for TreeError {}
