/// Builds a [`Tree`](crate::Tree) from literal notation.
///
/// - `[a, b]` is a list, `(a, b)` or `(a,)` a tuple
/// - `{"k": v, 1: w}` is a dict (keys are literals)
/// - `None` is [`Tree::None`](crate::Tree::None)
/// - anything else goes through `Tree::from`
///
/// Each element must be a single token tree, so wrap compound expressions
/// in parentheses: `[(-1), (x * 2)]`.
///
/// ```
/// use leafwise::{Tree, tree};
///
/// let t = tree!([0, [1, 2], {"a": 3, "b": 5}]);
/// assert_eq!(t.to_string(), r#"[0, [1, 2], {"a": 3, "b": 5}]"#);
/// ```
#[macro_export]
macro_rules! tree {
    (None) => {
        $crate::Tree::None
    };
    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Tree::List(::std::vec![ $( $crate::tree!($elem) ),* ])
    };
    (()) => {
        $crate::Tree::Tuple(::std::vec::Vec::new())
    };
    (( $first:tt, $($rest:tt),* $(,)? )) => {
        $crate::Tree::Tuple(::std::vec![ $crate::tree!($first) $(, $crate::tree!($rest) )* ])
    };
    ({}) => {
        $crate::Tree::Dict($crate::TreeMap::new())
    };
    ({ $($key:literal : $value:tt),+ $(,)? }) => {
        $crate::Tree::dict([ $( ($crate::Key::from($key), $crate::tree!($value)) ),+ ])
    };
    ($other:expr) => {
        $crate::Tree::from($other)
    };
}
