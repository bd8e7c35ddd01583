//! End-to-end behaviour of the default registry: flatten, unflatten and the
//! operations derived from them.

use std::sync::Arc;

use leafwise::{
    Aux, Catalog, Decomposed, Key, NodeKind, NodeOps, Record, Registry, SurplusPolicy, Tree,
    TreeError, Walker, builtin::SequenceKind, tree,
};

/// A fixture touching every built-in kind.
fn mixed_tree() -> Tree {
    let point = Record::new("point", [("x", Tree::from(1.5)), ("y", tree!([2, 3]))]);
    tree!({
        "list": [0, [1, 2], {"a": 3, "b": 5}],
        "tuple": (6, None, "seven"),
        "point": point,
        "ordered": (Tree::ordered_dict([("z", 8), ("y", 9)])),
        "empty": [],
        "flag": true
    })
}

fn trees() -> Vec<Tree> {
    vec![
        tree!(1),
        Tree::None,
        tree!([]),
        tree!({}),
        tree!([0, [1, 2], {"a": 3, "b": 5}]),
        tree!(([0, [1, 2], {"a": 3, "b": 5}], 6)),
        mixed_tree(),
    ]
}

// ---------------------------------------------------------------------------
// Worked example
// ---------------------------------------------------------------------------

#[test]
fn test_worked_example() {
    leafwise_testhelpers::setup();

    let registry = Registry::default_kinds();
    let walker = registry.walker();
    let t = tree!([0, [1, 2], {"a": 3, "b": 5}]);

    let (leaves, treedef) = walker.flatten_with_structure(&t).unwrap();
    assert_eq!(leaves, [tree!(0), tree!(1), tree!(2), tree!(3), tree!(5)]);
    assert_eq!(walker.leaf_names(&t), ["0", "1_0", "1_1", "2_a", "2_b"]);

    let rebuilt = walker.unflatten(&treedef, leaves).unwrap();
    assert_eq!(rebuilt, t);
    assert_eq!(rebuilt.to_string(), r#"[0, [1, 2], {"a": 3, "b": 5}]"#);
}

#[test]
fn test_none_is_an_empty_container() {
    leafwise_testhelpers::setup();

    let registry = Registry::default_kinds();
    let walker = registry.walker();
    assert!(walker.flatten(&Tree::None).is_empty());
    assert!(walker.leaf_names(&Tree::None).is_empty());
    assert_eq!(walker.unflatten(&Tree::None, Vec::new()).unwrap(), Tree::None);
}

#[test]
fn test_multimap_rejects_mismatched_structures() {
    leafwise_testhelpers::setup();

    let registry = Registry::default_kinds();
    let err = registry
        .walker()
        .multimap(&[&tree!([1, 2]), &tree!([1, 2, 3])], |row| row[0].clone())
        .unwrap_err();
    assert!(matches!(err, TreeError::StructureMismatch { index: 1, .. }));
    assert_eq!(
        err.to_string(),
        "tree 1 does not have the structure of tree 0 (3 leaves, expected 2)"
    );
}

// ---------------------------------------------------------------------------
// Properties over a set of fixtures
// ---------------------------------------------------------------------------

#[test]
fn test_round_trip() {
    leafwise_testhelpers::setup();

    let registry = Registry::default_kinds();
    let walker = registry.walker();
    for t in trees() {
        let (leaves, treedef) = walker.flatten_with_structure(&t).unwrap();
        let rebuilt = walker.unflatten(&treedef, leaves).unwrap();
        assert!(walker.equal(&rebuilt, &t), "{t} did not survive a round trip");
        assert_eq!(rebuilt, t);
    }
}

#[test]
fn test_leaf_count_matches_name_count() {
    leafwise_testhelpers::setup();

    let registry = Registry::default_kinds();
    let walker = registry.walker();
    for t in trees() {
        assert_eq!(walker.flatten(&t).len(), walker.leaf_names(&t).len(), "{t}");
        assert_eq!(walker.leaves(&t).count(), walker.flatten(&t).len(), "{t}");
    }
}

#[test]
fn test_map_identity() {
    leafwise_testhelpers::setup();

    let registry = Registry::default_kinds();
    let walker = registry.walker();
    for t in trees() {
        let mapped = walker.map(&t, Tree::clone).unwrap();
        assert!(walker.equal(&mapped, &t), "{t}");
    }
}

fn pair(a: &Tree, b: &Tree) -> Tree {
    Tree::tuple([a.clone(), b.clone()])
}

#[test]
fn test_multimap_agrees_with_map() {
    leafwise_testhelpers::setup();

    let registry = Registry::default_kinds();
    let walker = registry.walker();
    for t in trees() {
        let via_map = walker.map(&t, |x| pair(x, x)).unwrap();
        let via_multimap = walker.multimap(&[&t, &t], |row| pair(row[0], row[1])).unwrap();
        assert_eq!(via_map, via_multimap, "{t}");
    }
}

#[test]
fn test_update_with_itself() {
    leafwise_testhelpers::setup();

    let registry = Registry::default_kinds();
    let walker = registry.walker();
    for t in trees() {
        assert_eq!(walker.update(&t, &t).unwrap(), t);
    }
}

#[test]
fn test_update_changes_exactly_the_named_leaves() {
    leafwise_testhelpers::setup();

    let registry = Registry::default_kinds();
    let walker = registry.walker();
    let t = mixed_tree();
    let other = tree!({"list": [(-1)], "point": {"y": [20]}, "flag": false});

    let updated = walker.update(&t, &other).unwrap();
    let before: Vec<_> = walker.leaf_names(&t).into_iter().zip(walker.flatten(&t)).collect();
    let after: Vec<_> = walker
        .leaf_names(&updated)
        .into_iter()
        .zip(walker.flatten(&updated))
        .collect();
    assert_eq!(before.len(), after.len());

    let changed: Vec<&str> = before
        .iter()
        .zip(&after)
        .filter(|(b, a)| b != a)
        .map(|((name, _), _)| name.as_str())
        .collect();
    assert_eq!(changed, ["list_0", "point_y_0", "flag"]);
    insta::assert_snapshot!(
        updated.to_string(),
        @r#"{"list": [-1, [1, 2], {"a": 3, "b": 5}], "tuple": (6, None, "seven"), "point": point(x=1.5, y=[20, 3]), "ordered": OrderedDict({"z": 8, "y": 9}), "empty": [], "flag": false}"#
    );
}

// ---------------------------------------------------------------------------
// Names and configuration
// ---------------------------------------------------------------------------

#[test]
fn test_mixed_tree_names() {
    leafwise_testhelpers::setup();

    let registry = Registry::default_kinds();
    let names = registry.walker().leaf_names(&mixed_tree());
    insta::assert_snapshot!(names.join("\n"), @r"
    list_0
    list_1_0
    list_1_1
    list_2_a
    list_2_b
    tuple_0
    tuple_2
    point_x
    point_y_0
    point_y_1
    ordered_z
    ordered_y
    flag
    ");
}

#[test]
fn test_star_separator() {
    leafwise_testhelpers::setup();

    let registry = Registry::default_kinds();
    let t = tree!(([0, [1, 2], {"a": 3, "b": 5}], 6));
    let names = registry.walker().separator("*").leaf_names(&t);
    assert_eq!(names, ["0*0", "0*1*0", "0*1*1", "0*2*a", "0*2*b", "1"]);
}

#[test]
fn test_restricted_registry_treats_other_containers_as_leaves() {
    leafwise_testhelpers::setup();

    let registry = Registry::builder(&Catalog::builtin())
        .include_defaults(false)
        .kind("list")
        .kind("record")
        .build()
        .unwrap();
    let walker = registry.walker();
    let t = mixed_tree();
    // The root dict is itself a leaf now.
    assert_eq!(walker.flatten(&t), [t.clone()]);
    assert_eq!(walker.leaf_names(&t), [""]);

    let inner = tree!([1, {"a": 2}, (3, 4)]);
    assert_eq!(walker.flatten(&inner).len(), 3);
}

#[test]
fn test_walker_settings_compose() {
    leafwise_testhelpers::setup();

    let registry = Registry::default_kinds();
    let is_dict = |t: &Tree| matches!(t, Tree::Dict(_));
    let walker: Walker<'_> = registry
        .walker()
        .is_leaf(&is_dict)
        .separator(".")
        .surplus(SurplusPolicy::Reject);

    let t = tree!([[1, {"a": 2}], 3]);
    assert_eq!(walker.leaf_names(&t), ["0.0", "0.1", "1"]);
    let treedef = walker.structure(&t).unwrap();
    let err = walker.unflatten(&treedef, (0..4).map(Tree::from)).unwrap_err();
    assert_eq!(err, TreeError::SurplusLeaves { consumed: 3 });
}

#[test]
fn test_records_and_dict_keys() {
    leafwise_testhelpers::setup();

    let registry = Registry::default_kinds();
    let walker = registry.walker();
    let t = Tree::from(Record::new("bla", [("a", 1), ("b", 2)]));
    assert_eq!(walker.flatten(&t), [tree!(1), tree!(2)]);
    assert_eq!(walker.leaf_names(&t), ["a", "b"]);

    let keyed = Tree::dict([(Key::from(1), tree!("one")), (Key::from("two"), tree!(2))]);
    assert_eq!(walker.leaf_names(&keyed), ["1", "two"]);
}

#[test]
fn test_registry_is_shared_across_threads() {
    leafwise_testhelpers::setup();

    let registry = Registry::default_kinds();
    let registry = &registry;
    std::thread::scope(|scope| {
        let handles: Vec<_> = trees()
            .into_iter()
            .map(|t| {
                scope.spawn(move || -> Result<bool, TreeError> {
                    let walker = registry.walker();
                    let (leaves, treedef) = walker.flatten_with_structure(&t)?;
                    walker.unflatten(&treedef, leaves).map(|rebuilt| rebuilt == t)
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().ok(), Some(Ok(true)));
        }
    });
}

// ---------------------------------------------------------------------------
// Kinds that validate their children, and value-dependent leaf predicates
// ---------------------------------------------------------------------------

/// A list kind that only rebuilds lists of numbers.
#[derive(Debug)]
struct NumbersKind;

impl NodeOps for NumbersKind {
    fn kind(&self) -> NodeKind {
        NodeKind::extension("numbers")
    }

    fn accepts(&self, tree: &Tree) -> bool {
        matches!(tree, Tree::List(_))
    }

    fn decompose<'t>(&self, node: &'t Tree) -> Decomposed<'t> {
        SequenceKind.decompose(node)
    }

    fn recompose(&self, aux: Aux, children: Vec<Tree>) -> Result<Tree, TreeError> {
        if let Some(bad) = children
            .iter()
            .find(|child| !matches!(child, Tree::Int(_) | Tree::Float(_)))
        {
            return Err(TreeError::Recompose {
                kind: self.kind(),
                reason: format!("{bad} is not a number"),
            });
        }
        SequenceKind.recompose(aux, children)
    }

    fn field_names(&self, node: &Tree) -> Vec<String> {
        SequenceKind.field_names(node)
    }
}

fn numbers_registry() -> Registry {
    let catalog = Catalog::builtin().with("numbers", |_| -> Arc<dyn NodeOps> {
        Arc::new(NumbersKind)
    });
    Registry::builder(&catalog).kind("numbers").build().unwrap()
}

#[test]
fn test_validating_kind_maps_over_its_own_values() {
    leafwise_testhelpers::setup();

    let registry = numbers_registry();
    let walker = registry.walker();
    let t = tree!([1, 2, 3]);

    assert_eq!(walker.map(&t, Tree::clone).unwrap(), t);
    let incremented = walker
        .map(&t, |x| Tree::Int(x.as_int().unwrap_or(0) + 1))
        .unwrap();
    assert_eq!(incremented, tree!([2, 3, 4]));
    assert_eq!(walker.update(&t, &t).unwrap(), t);
    assert_eq!(walker.update(&t, &tree!({"1": 20})).unwrap(), tree!([1, 20, 3]));
    assert_eq!(walker.multimap(&[&t], |row| row[0].clone()).unwrap(), t);
}

#[test]
fn test_validating_kind_errors_surface() {
    leafwise_testhelpers::setup();

    let registry = numbers_registry();
    let walker = registry.walker();
    let t = tree!([1, 2, 3]);
    let is_numbers_error =
        |err: &TreeError| matches!(err, TreeError::Recompose { kind, .. } if kind.name() == "numbers");

    // A skeleton holds placeholders, which this kind refuses.
    assert!(is_numbers_error(&walker.structure(&t).unwrap_err()));
    assert!(is_numbers_error(&walker.flatten_with_structure(&t).unwrap_err()));
    assert!(is_numbers_error(
        &walker.multimap(&[&t, &t], |row| row[0].clone()).unwrap_err()
    ));

    let err = walker.map(&t, |_| tree!("x")).unwrap_err();
    assert!(is_numbers_error(&err));
    assert_eq!(
        err.to_string(),
        r#"cannot recompose numbers node: "x" is not a number"#
    );
}

#[test]
fn test_value_dependent_is_leaf() {
    leafwise_testhelpers::setup();

    let registry = Registry::default_kinds();
    // Only lists that hold no lists stay whole.
    let is_flat_list = |t: &Tree| {
        matches!(t, Tree::List(items) if items.iter().all(|item| !matches!(item, Tree::List(_))))
    };
    let walker = registry.walker().is_leaf(&is_flat_list);
    let t = tree!([[1, 2]]);

    assert_eq!(walker.flatten(&t), [tree!([1, 2])]);
    assert_eq!(walker.leaf_names(&t), ["0"]);
    assert_eq!(walker.map(&t, Tree::clone).unwrap(), t);
    assert_eq!(walker.multimap(&[&t, &t], |row| row[1].clone()).unwrap(), t);
    assert_eq!(walker.update(&t, &t).unwrap(), t);
    assert_eq!(
        walker.update(&t, &tree!([[5, 6]])).unwrap(),
        tree!([[5, 6]])
    );
}
