//! The `ndarray` kind: arrays decompose into their row-major elements.

use leafwise::{
    Aux, Decomposed, KindOptions, NdArray, NodeKind, NodeOps, Result, Tree, TreeError,
};

/// Configuration name of [`ArrayKind`].
pub const ARRAY: &str = "ndarray";

/// Treats [`Tree::Array`] as a container of its elements.
///
/// Elements are named by their per-axis indices joined with the label
/// separator, so element `[1, 0]` of a 2×2 array is `1_0`. A
/// zero-dimensional array has one element, named `""`.
#[derive(Debug, Clone)]
pub struct ArrayKind {
    separator: String,
}

impl ArrayKind {
    /// Creates the kind from its options.
    #[must_use]
    pub fn new(options: &KindOptions) -> Self {
        Self {
            separator: options.label_separator().to_owned(),
        }
    }
}

impl Default for ArrayKind {
    fn default() -> Self {
        Self::new(&KindOptions::default())
    }
}

impl NodeOps for ArrayKind {
    fn kind(&self) -> NodeKind {
        NodeKind::extension(ARRAY)
    }

    fn accepts(&self, tree: &Tree) -> bool {
        matches!(tree, Tree::Array(_))
    }

    fn decompose<'t>(&self, node: &'t Tree) -> Decomposed<'t> {
        match node {
            Tree::Array(array) => Decomposed::new(
                array.data().iter().collect(),
                Aux::new(array.shape().to_vec()),
            ),
            _ => Decomposed::empty(),
        }
    }

    fn recompose(&self, aux: Aux, children: Vec<Tree>) -> Result<Tree> {
        let shape: Vec<usize> = aux.take(&self.kind())?;
        NdArray::new(shape, children)
            .map(Tree::Array)
            .map_err(|err| TreeError::Recompose {
                kind: self.kind(),
                reason: err.to_string(),
            })
    }

    fn field_names(&self, node: &Tree) -> Vec<String> {
        match node {
            Tree::Array(array) => index_names(array.shape(), &self.separator),
            _ => Vec::new(),
        }
    }
}

/// Names for every position of `shape`, in row-major order.
fn index_names(shape: &[usize], separator: &str) -> Vec<String> {
    let len = shape.iter().product::<usize>();
    let mut names = Vec::with_capacity(len);
    let mut position = vec![0usize; shape.len()];
    for _ in 0..len {
        let parts: Vec<String> = position.iter().map(usize::to_string).collect();
        names.push(parts.join(separator));

        // Odometer increment, last axis fastest.
        for (axis, index) in position.iter_mut().enumerate().rev() {
            *index += 1;
            if *index < shape[axis] {
                break;
            }
            *index = 0;
        }
    }
    names
}
