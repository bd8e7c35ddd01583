//! The `frame` kind: a labelled table decomposes into its cells, row by row.

use leafwise::{
    Aux, Decomposed, Frame, Key, KindOptions, NodeKind, NodeOps, Result, Tree, TreeError,
};

/// Configuration name of [`FrameKind`].
pub const FRAME: &str = "frame";

struct FrameLabels {
    index: Vec<Key>,
    columns: Vec<Key>,
}

/// Treats [`Tree::Frame`] as a container of its cells in row-major order.
///
/// A cell is named by its row label and column label joined with the label
/// separator: `a_value` is the `value` column of row `a`.
#[derive(Debug, Clone)]
pub struct FrameKind {
    separator: String,
}

impl FrameKind {
    /// Creates the kind from its options.
    #[must_use]
    pub fn new(options: &KindOptions) -> Self {
        Self {
            separator: options.label_separator().to_owned(),
        }
    }
}

impl Default for FrameKind {
    fn default() -> Self {
        Self::new(&KindOptions::default())
    }
}

impl NodeOps for FrameKind {
    fn kind(&self) -> NodeKind {
        NodeKind::extension(FRAME)
    }

    fn accepts(&self, tree: &Tree) -> bool {
        matches!(tree, Tree::Frame(_))
    }

    fn decompose<'t>(&self, node: &'t Tree) -> Decomposed<'t> {
        match node {
            Tree::Frame(frame) => Decomposed::new(
                frame.cells().iter().collect(),
                Aux::new(FrameLabels {
                    index: frame.index().to_vec(),
                    columns: frame.columns().to_vec(),
                }),
            ),
            _ => Decomposed::empty(),
        }
    }

    fn recompose(&self, aux: Aux, children: Vec<Tree>) -> Result<Tree> {
        let FrameLabels { index, columns } = aux.take(&self.kind())?;
        Frame::new(index, columns, children)
            .map(Tree::Frame)
            .map_err(|err| TreeError::Recompose {
                kind: self.kind(),
                reason: err.to_string(),
            })
    }

    fn field_names(&self, node: &Tree) -> Vec<String> {
        let Tree::Frame(frame) = node else {
            return Vec::new();
        };
        let columns: Vec<String> = frame
            .columns()
            .iter()
            .map(|column| column.label(&self.separator))
            .collect();
        let mut names = Vec::with_capacity(frame.cells().len());
        for row in frame.index() {
            let row = row.label(&self.separator);
            for column in &columns {
                names.push(format!("{row}{}{column}", self.separator));
            }
        }
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value_bla_frame() -> Tree {
        let index = vec!["a".into(), "b".into(), "c".into()];
        let frame = Frame::from_columns(index, [("value", vec![1, 2, 3]), ("bla", vec![4, 5, 6])]);
        Tree::from(frame.unwrap())
    }

    #[test]
    fn test_cells_are_row_major() {
        let kind = FrameKind::default();
        let t = value_bla_frame();
        let cells: Vec<i64> = kind
            .decompose(&t)
            .children
            .into_iter()
            .filter_map(Tree::as_int)
            .collect();
        assert_eq!(cells, [1, 4, 2, 5, 3, 6]);
    }

    #[test]
    fn test_row_then_column_names() {
        let kind = FrameKind::default();
        assert_eq!(
            kind.field_names(&value_bla_frame()),
            ["a_value", "a_bla", "b_value", "b_bla", "c_value", "c_bla"]
        );
    }

    #[test]
    fn test_round_trip() {
        let kind = FrameKind::default();
        let t = value_bla_frame();
        let Decomposed { children, aux } = kind.decompose(&t);
        let rebuilt = kind
            .recompose(aux, children.into_iter().cloned().collect())
            .unwrap();
        assert_eq!(rebuilt, t);
    }
}
