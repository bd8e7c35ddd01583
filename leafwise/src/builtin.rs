//! The six node kinds that ship with the crate.

use alloc::string::{String, ToString};
use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::{Aux, Decomposed, Key, NodeKind, NodeOps, Record, Result, Tree, TreeError, TreeMap};

fn arity_error(kind: NodeKind, expected: usize, actual: usize) -> TreeError {
    TreeError::Recompose {
        kind,
        reason: alloc::format!("expected {expected} children, got {actual}"),
    }
}

fn positional_names(len: usize) -> Vec<String> {
    (0..len).map(|i| i.to_string()).collect()
}

/// `list`: children in index order, named by index.
#[derive(Debug, Default, Clone, Copy)]
pub struct SequenceKind;

impl NodeOps for SequenceKind {
    fn kind(&self) -> NodeKind {
        NodeKind::Sequence
    }

    fn accepts(&self, tree: &Tree) -> bool {
        matches!(tree, Tree::List(_))
    }

    fn decompose<'t>(&self, node: &'t Tree) -> Decomposed<'t> {
        match node {
            Tree::List(items) => Decomposed::new(items.iter().collect(), Aux::empty()),
            _ => Decomposed::empty(),
        }
    }

    fn recompose(&self, _aux: Aux, children: Vec<Tree>) -> Result<Tree> {
        Ok(Tree::List(children))
    }

    fn field_names(&self, node: &Tree) -> Vec<String> {
        match node {
            Tree::List(items) => positional_names(items.len()),
            _ => Vec::new(),
        }
    }
}

/// `tuple`: like `list`, but rebuilds a fixed-size tuple.
#[derive(Debug, Default, Clone, Copy)]
pub struct TupleKind;

impl NodeOps for TupleKind {
    fn kind(&self) -> NodeKind {
        NodeKind::Tuple
    }

    fn accepts(&self, tree: &Tree) -> bool {
        matches!(tree, Tree::Tuple(_))
    }

    fn decompose<'t>(&self, node: &'t Tree) -> Decomposed<'t> {
        match node {
            Tree::Tuple(items) => Decomposed::new(items.iter().collect(), Aux::empty()),
            _ => Decomposed::empty(),
        }
    }

    fn recompose(&self, _aux: Aux, children: Vec<Tree>) -> Result<Tree> {
        Ok(Tree::Tuple(children))
    }

    fn field_names(&self, node: &Tree) -> Vec<String> {
        match node {
            Tree::Tuple(items) => positional_names(items.len()),
            _ => Vec::new(),
        }
    }
}

fn map_of(tree: &Tree, ordered: bool) -> Option<&TreeMap> {
    match (tree, ordered) {
        (Tree::Dict(map), false) | (Tree::OrderedDict(map), true) => Some(map),
        _ => None,
    }
}

fn decompose_map(map: Option<&TreeMap>) -> Decomposed<'_> {
    match map {
        Some(map) => Decomposed::new(
            map.values().collect(),
            Aux::new(map.keys().cloned().collect::<Vec<Key>>()),
        ),
        None => Decomposed::empty(),
    }
}

fn recompose_map(kind: NodeKind, aux: Aux, children: Vec<Tree>) -> Result<TreeMap> {
    let keys: Vec<Key> = aux.take(&kind)?;
    if keys.len() != children.len() {
        return Err(arity_error(kind, keys.len(), children.len()));
    }
    Ok(keys.into_iter().zip(children).collect())
}

/// `dict`: values in insertion order; aux is the key list; names are the
/// keys' display form.
#[derive(Debug, Default, Clone, Copy)]
pub struct MappingKind;

impl NodeOps for MappingKind {
    fn kind(&self) -> NodeKind {
        NodeKind::Mapping
    }

    fn accepts(&self, tree: &Tree) -> bool {
        matches!(tree, Tree::Dict(_))
    }

    fn decompose<'t>(&self, node: &'t Tree) -> Decomposed<'t> {
        decompose_map(map_of(node, false))
    }

    fn recompose(&self, aux: Aux, children: Vec<Tree>) -> Result<Tree> {
        recompose_map(self.kind(), aux, children).map(Tree::Dict)
    }

    fn field_names(&self, node: &Tree) -> Vec<String> {
        map_of(node, false)
            .map(|map| map.keys().map(ToString::to_string).collect())
            .unwrap_or_default()
    }
}

/// `ordered_dict`: the `dict` contract, rebuilding an ordered dict.
#[derive(Debug, Default, Clone, Copy)]
pub struct OrderedMappingKind;

impl NodeOps for OrderedMappingKind {
    fn kind(&self) -> NodeKind {
        NodeKind::OrderedMapping
    }

    fn accepts(&self, tree: &Tree) -> bool {
        matches!(tree, Tree::OrderedDict(_))
    }

    fn decompose<'t>(&self, node: &'t Tree) -> Decomposed<'t> {
        decompose_map(map_of(node, true))
    }

    fn recompose(&self, aux: Aux, children: Vec<Tree>) -> Result<Tree> {
        recompose_map(self.kind(), aux, children).map(Tree::OrderedDict)
    }

    fn field_names(&self, node: &Tree) -> Vec<String> {
        map_of(node, true)
            .map(|map| map.keys().map(ToString::to_string).collect())
            .unwrap_or_default()
    }
}

/// A value-less copy of the source record; shares its type name and fields.
struct RecordTemplate(Record);

/// `record`: field values in declaration order, named by field.
///
/// The aux data is a template of the source record whose fields are
/// replaced on rebuild.
#[derive(Debug, Default, Clone, Copy)]
pub struct RecordKind;

impl NodeOps for RecordKind {
    fn kind(&self) -> NodeKind {
        NodeKind::Record
    }

    fn accepts(&self, tree: &Tree) -> bool {
        matches!(tree, Tree::Record(_))
    }

    fn decompose<'t>(&self, node: &'t Tree) -> Decomposed<'t> {
        match node {
            Tree::Record(record) => Decomposed::new(
                record.values().iter().collect(),
                Aux::new(RecordTemplate(record.template())),
            ),
            _ => Decomposed::empty(),
        }
    }

    fn recompose(&self, aux: Aux, children: Vec<Tree>) -> Result<Tree> {
        let RecordTemplate(template) = aux.take(&self.kind())?;
        let expected = template.fields().len();
        let actual = children.len();
        template
            .with_values(children)
            .map(Tree::Record)
            .map_err(|_| arity_error(self.kind(), expected, actual))
    }

    fn field_names(&self, node: &Tree) -> Vec<String> {
        match node {
            Tree::Record(record) => record.fields().to_vec(),
            _ => Vec::new(),
        }
    }
}

/// `none`: [`Tree::None`] as a container with zero children.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoneKind;

impl NodeOps for NoneKind {
    fn kind(&self) -> NodeKind {
        NodeKind::None
    }

    fn accepts(&self, tree: &Tree) -> bool {
        tree.is_none()
    }

    fn decompose<'t>(&self, _node: &'t Tree) -> Decomposed<'t> {
        Decomposed::empty()
    }

    fn recompose(&self, _aux: Aux, children: Vec<Tree>) -> Result<Tree> {
        if !children.is_empty() {
            return Err(arity_error(self.kind(), 0, children.len()));
        }
        Ok(Tree::None)
    }

    fn field_names(&self, _node: &Tree) -> Vec<String> {
        Vec::new()
    }
}

/// Returns the built-in implementation for `kind`, or `None` for extension
/// kinds.
pub(crate) fn builtin_ops(kind: &NodeKind) -> Option<Arc<dyn NodeOps>> {
    let ops: Arc<dyn NodeOps> = match kind {
        NodeKind::Sequence => Arc::new(SequenceKind),
        NodeKind::Tuple => Arc::new(TupleKind),
        NodeKind::Mapping => Arc::new(MappingKind),
        NodeKind::OrderedMapping => Arc::new(OrderedMappingKind),
        NodeKind::Record => Arc::new(RecordKind),
        NodeKind::None => Arc::new(NoneKind),
        NodeKind::Extension(_) => return None,
    };
    Some(ops)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree;

    fn round_trip(ops: &dyn NodeOps, node: &Tree) -> Tree {
        let Decomposed { children, aux } = ops.decompose(node);
        let owned = children.into_iter().cloned().collect();
        ops.recompose(aux, owned).unwrap()
    }

    #[test]
    fn test_sequence_round_trip() {
        let node = tree!([1, "a", [2]]);
        assert_eq!(round_trip(&SequenceKind, &node), node);
        assert_eq!(SequenceKind.field_names(&node), ["0", "1", "2"]);
    }

    #[test]
    fn test_tuple_rebuilds_tuple() {
        let node = tree!((1, 2));
        assert_eq!(round_trip(&TupleKind, &node), node);
        assert!(!TupleKind.accepts(&tree!([1, 2])));
    }

    #[test]
    fn test_mapping_keeps_key_order() {
        let node = tree!({"b": 1, "a": 2, 3: 4});
        assert_eq!(round_trip(&MappingKind, &node), node);
        assert_eq!(MappingKind.field_names(&node), ["b", "a", "3"]);
    }

    #[test]
    fn test_ordered_mapping_is_distinct_from_mapping() {
        let node = Tree::ordered_dict([("a", 1), ("b", 2)]);
        assert!(OrderedMappingKind.accepts(&node));
        assert!(!MappingKind.accepts(&node));
        assert_eq!(round_trip(&OrderedMappingKind, &node), node);
    }

    #[test]
    fn test_record_replaces_fields() {
        let node = Tree::from(Record::new("bla", [("a", 1), ("b", 2)]));
        let Decomposed { aux, .. } = RecordKind.decompose(&node);
        let rebuilt = RecordKind
            .recompose(aux, alloc::vec![Tree::Int(7), Tree::Int(8)])
            .unwrap();
        assert_eq!(rebuilt.to_string(), "bla(a=7, b=8)");
        assert_eq!(RecordKind.field_names(&node), ["a", "b"]);
    }

    #[test]
    fn test_none_has_no_children() {
        let Decomposed { children, .. } = NoneKind.decompose(&Tree::None);
        assert!(children.is_empty());
        assert!(NoneKind.field_names(&Tree::None).is_empty());
        assert_eq!(round_trip(&NoneKind, &Tree::None), Tree::None);
    }

    #[test]
    fn test_recompose_rejects_foreign_aux() {
        let err = MappingKind
            .recompose(Aux::empty(), alloc::vec![Tree::Int(1)])
            .unwrap_err();
        assert!(matches!(err, TreeError::Recompose { kind: NodeKind::Mapping, .. }));
    }
}
