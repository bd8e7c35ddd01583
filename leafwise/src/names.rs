//! Human-readable paths to every leaf.

use alloc::string::String;
use alloc::vec::Vec;

use crate::registry::Classification;
use crate::{Tree, Walker};

impl Walker<'_> {
    /// One name per leaf, in the order [`Walker::flatten`] yields the leaves.
    ///
    /// A name is the path of field names from the root down to the leaf,
    /// joined by the walker's separator. A leaf root is named `""`.
    #[must_use]
    pub fn leaf_names(&self, tree: &Tree) -> Vec<String> {
        crate::trace!("leaf_names");
        let separator = self.name_separator();
        let mut names = Vec::new();
        let mut stack: Vec<(String, &Tree)> = alloc::vec![(String::new(), tree)];

        while let Some((path, tree)) = stack.pop() {
            let ops = match self.classify(tree) {
                Classification::Leaf => {
                    names.push(path);
                    continue;
                }
                Classification::Node(ops) => ops,
            };
            let children = ops.decompose(tree).children;
            let fields = ops.field_names(tree);
            debug_assert_eq!(
                fields.len(),
                children.len(),
                "{} names a different number of children than it yields",
                ops.kind()
            );
            // Reversed so the first child is popped first.
            for (field, child) in fields.into_iter().zip(children).rev() {
                stack.push((join(&path, separator, field), child));
            }
        }
        names
    }
}

fn join(prefix: &str, separator: &str, field: String) -> String {
    if prefix.is_empty() {
        return field;
    }
    let mut joined = String::with_capacity(prefix.len() + separator.len() + field.len());
    joined.push_str(prefix);
    joined.push_str(separator);
    joined.push_str(&field);
    joined
}
