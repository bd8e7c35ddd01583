//! The `series` kind: a labelled column decomposes into its values.

use leafwise::{
    Aux, Decomposed, Key, KindOptions, NodeKind, NodeOps, Result, Series, Tree, TreeError,
};

/// Configuration name of [`SeriesKind`].
pub const SERIES: &str = "series";

/// Index labels and name of the series being rebuilt.
struct SeriesLabels {
    index: Vec<Key>,
    name: Option<String>,
}

/// Treats [`Tree::Series`] as a container of its values, each named by its
/// index label.
///
/// Multi-level labels have their parts joined with the label separator.
#[derive(Debug, Clone)]
pub struct SeriesKind {
    separator: String,
}

impl SeriesKind {
    /// Creates the kind from its options.
    #[must_use]
    pub fn new(options: &KindOptions) -> Self {
        Self {
            separator: options.label_separator().to_owned(),
        }
    }
}

impl Default for SeriesKind {
    fn default() -> Self {
        Self::new(&KindOptions::default())
    }
}

impl NodeOps for SeriesKind {
    fn kind(&self) -> NodeKind {
        NodeKind::extension(SERIES)
    }

    fn accepts(&self, tree: &Tree) -> bool {
        matches!(tree, Tree::Series(_))
    }

    fn decompose<'t>(&self, node: &'t Tree) -> Decomposed<'t> {
        match node {
            Tree::Series(series) => Decomposed::new(
                series.values().iter().collect(),
                Aux::new(SeriesLabels {
                    index: series.index().to_vec(),
                    name: series.name().map(str::to_owned),
                }),
            ),
            _ => Decomposed::empty(),
        }
    }

    fn recompose(&self, aux: Aux, children: Vec<Tree>) -> Result<Tree> {
        let SeriesLabels { index, name } = aux.take(&self.kind())?;
        let series = Series::new(index, children).map_err(|err| TreeError::Recompose {
            kind: self.kind(),
            reason: err.to_string(),
        })?;
        Ok(Tree::Series(match name {
            Some(name) => series.with_name(name),
            None => series,
        }))
    }

    fn field_names(&self, node: &Tree) -> Vec<String> {
        match node {
            Tree::Series(series) => series
                .index()
                .iter()
                .map(|label| label.label(&self.separator))
                .collect(),
            _ => Vec::new(),
        }
    }
}
