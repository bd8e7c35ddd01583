//! The dynamic [`Tree`] value and the payload types it carries.

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt::{self, Debug, Display, Formatter};

use indexmap::IndexMap;

use crate::{Result, TreeError};

/// Map type used by [`Tree::Dict`] and [`Tree::OrderedDict`].
pub type TreeMap = IndexMap<Key, Tree>;

/// An arbitrarily nested, heterogeneous value.
///
/// Whether a variant is a container or a leaf is not decided here: that is
/// the job of the [`Registry`](crate::Registry) a traversal runs with. With
/// the default kinds, `List`, `Tuple`, `Dict`, `OrderedDict`, `Record` and
/// `None` are containers; everything else is a leaf. `Array`, `Series` and
/// `Frame` only become containers when an extension kind for them is
/// registered.
///
/// Equality is structural and order-sensitive for maps, since key order
/// decides leaf order.
#[derive(Clone, Default)]
pub enum Tree {
    /// Explicit absence.
    #[default]
    None,
    /// Boolean leaf.
    Bool(bool),
    /// Integer leaf.
    Int(i64),
    /// Floating point leaf.
    Float(f64),
    /// String leaf.
    Str(String),
    /// The sentinel that stands in for every leaf of a [`TreeDef`](crate::TreeDef).
    Placeholder,
    /// Growable positional sequence.
    List(Vec<Tree>),
    /// Fixed-size immutable sequence.
    Tuple(Vec<Tree>),
    /// Insertion-ordered mapping.
    Dict(TreeMap),
    /// Insertion-ordered mapping that is kept distinct from [`Tree::Dict`]
    /// when rebuilt.
    OrderedDict(TreeMap),
    /// Named record with declared fields.
    Record(Record),
    /// N-dimensional array.
    Array(NdArray),
    /// One-dimensional labelled column.
    Series(Series),
    /// Two-dimensional labelled table.
    Frame(Frame),
}

/// Runtime discriminant of a [`Tree`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TreeKind {
    /// [`Tree::None`]
    None,
    /// [`Tree::Bool`]
    Bool,
    /// [`Tree::Int`]
    Int,
    /// [`Tree::Float`]
    Float,
    /// [`Tree::Str`]
    Str,
    /// [`Tree::Placeholder`]
    Placeholder,
    /// [`Tree::List`]
    List,
    /// [`Tree::Tuple`]
    Tuple,
    /// [`Tree::Dict`]
    Dict,
    /// [`Tree::OrderedDict`]
    OrderedDict,
    /// [`Tree::Record`]
    Record,
    /// [`Tree::Array`]
    Array,
    /// [`Tree::Series`]
    Series,
    /// [`Tree::Frame`]
    Frame,
}

impl Tree {
    /// Returns the runtime kind of this value.
    #[must_use]
    pub fn kind(&self) -> TreeKind {
        match self {
            Tree::None => TreeKind::None,
            Tree::Bool(_) => TreeKind::Bool,
            Tree::Int(_) => TreeKind::Int,
            Tree::Float(_) => TreeKind::Float,
            Tree::Str(_) => TreeKind::Str,
            Tree::Placeholder => TreeKind::Placeholder,
            Tree::List(_) => TreeKind::List,
            Tree::Tuple(_) => TreeKind::Tuple,
            Tree::Dict(_) => TreeKind::Dict,
            Tree::OrderedDict(_) => TreeKind::OrderedDict,
            Tree::Record(_) => TreeKind::Record,
            Tree::Array(_) => TreeKind::Array,
            Tree::Series(_) => TreeKind::Series,
            Tree::Frame(_) => TreeKind::Frame,
        }
    }

    /// Returns `true` if this is [`Tree::None`].
    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, Tree::None)
    }

    /// Returns `true` if this is the skeleton placeholder.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Tree::Placeholder)
    }

    /// Returns the integer payload, if any.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Tree::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the numeric payload of an `Int` or `Float` as `f64`.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Tree::Int(i) => Some(*i as f64),
            Tree::Float(x) => Some(*x),
            _ => None,
        }
    }

    /// Returns the string payload, if any.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Tree::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Builds a [`Tree::Dict`] from key/value pairs, keeping their order.
    pub fn dict<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<Key>,
        V: Into<Tree>,
    {
        Tree::Dict(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Builds a [`Tree::OrderedDict`] from key/value pairs, keeping their order.
    pub fn ordered_dict<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<Key>,
        V: Into<Tree>,
    {
        Tree::OrderedDict(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Builds a [`Tree::Tuple`].
    pub fn tuple<V: Into<Tree>>(items: impl IntoIterator<Item = V>) -> Self {
        Tree::Tuple(items.into_iter().map(Into::into).collect())
    }
}

fn maps_eq(a: &TreeMap, b: &TreeMap) -> bool {
    a.len() == b.len() && a.iter().eq(b.iter())
}

impl PartialEq for Tree {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Tree::None, Tree::None) | (Tree::Placeholder, Tree::Placeholder) => true,
            (Tree::Bool(a), Tree::Bool(b)) => a == b,
            (Tree::Int(a), Tree::Int(b)) => a == b,
            (Tree::Float(a), Tree::Float(b)) => a == b,
            (Tree::Str(a), Tree::Str(b)) => a == b,
            (Tree::List(a), Tree::List(b)) | (Tree::Tuple(a), Tree::Tuple(b)) => a == b,
            (Tree::Dict(a), Tree::Dict(b)) | (Tree::OrderedDict(a), Tree::OrderedDict(b)) => {
                maps_eq(a, b)
            }
            (Tree::Record(a), Tree::Record(b)) => a == b,
            (Tree::Array(a), Tree::Array(b)) => a == b,
            (Tree::Series(a), Tree::Series(b)) => a == b,
            (Tree::Frame(a), Tree::Frame(b)) => a == b,
            _ => false,
        }
    }
}

/// A dictionary key or axis label.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Key {
    /// Integer label.
    Int(i64),
    /// String label.
    Str(String),
    /// Multi-level label, as found on hierarchical table indexes.
    Tuple(Vec<Key>),
}

impl Key {
    /// Renders the key for use inside a leaf name.
    ///
    /// Multi-level labels have their parts joined with `separator`; all other
    /// keys render as their [`Display`] form.
    #[must_use]
    pub fn label(&self, separator: &str) -> String {
        match self {
            Key::Tuple(parts) => parts
                .iter()
                .map(|part| part.label(separator))
                .collect::<Vec<_>>()
                .join(separator),
            other => other.to_string(),
        }
    }
}

impl Display for Key {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Key::Int(i) => write!(f, "{i}"),
            Key::Str(s) => f.write_str(s),
            Key::Tuple(parts) => {
                f.write_str("(")?;
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{part}")?;
                }
                f.write_str(")")
            }
        }
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::Str(s.into())
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Key::Str(s)
    }
}

impl From<i64> for Key {
    fn from(i: i64) -> Self {
        Key::Int(i)
    }
}

impl From<i32> for Key {
    fn from(i: i32) -> Self {
        Key::Int(i.into())
    }
}

/// A record: a named value with a fixed, ordered set of fields.
///
/// Cloning shares the type name and field list.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    name: Arc<str>,
    fields: Arc<[String]>,
    values: Vec<Tree>,
}

impl Record {
    /// Creates a record from `(field, value)` pairs in declaration order.
    pub fn new<F, V>(name: &str, entries: impl IntoIterator<Item = (F, V)>) -> Self
    where
        F: Into<String>,
        V: Into<Tree>,
    {
        let (fields, values): (Vec<String>, Vec<Tree>) = entries
            .into_iter()
            .map(|(field, value)| (field.into(), value.into()))
            .unzip();
        Self {
            name: name.into(),
            fields: fields.into(),
            values,
        }
    }

    /// The record's type name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared field names, in order.
    #[must_use]
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Field values, in declaration order.
    #[must_use]
    pub fn values(&self) -> &[Tree] {
        &self.values
    }

    /// Looks up a field by name.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Tree> {
        let idx = self.fields.iter().position(|f| f == field)?;
        self.values.get(idx)
    }

    /// Returns a record of the same type with every field replaced, in order.
    pub fn with_values(&self, values: Vec<Tree>) -> Result<Self> {
        if values.len() != self.fields.len() {
            return Err(TreeError::ShapeMismatch {
                expected: self.fields.len(),
                actual: values.len(),
            });
        }
        Ok(Self {
            name: Arc::clone(&self.name),
            fields: Arc::clone(&self.fields),
            values,
        })
    }

    /// A copy of this record without values, to be refilled by
    /// [`Record::with_values`].
    pub(crate) fn template(&self) -> Self {
        Self {
            name: Arc::clone(&self.name),
            fields: Arc::clone(&self.fields),
            values: Vec::new(),
        }
    }

    /// Returns a copy of this record with one field replaced.
    ///
    /// Returns `None` if the record has no such field.
    #[must_use]
    pub fn replace(&self, field: &str, value: impl Into<Tree>) -> Option<Self> {
        let idx = self.fields.iter().position(|f| f == field)?;
        let mut out = self.clone();
        out.values[idx] = value.into();
        Some(out)
    }
}

/// An n-dimensional array stored in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct NdArray {
    shape: Vec<usize>,
    data: Vec<Tree>,
}

impl NdArray {
    /// Creates an array of the given shape from row-major elements.
    pub fn new(shape: Vec<usize>, data: Vec<Tree>) -> Result<Self> {
        let expected = shape.iter().product::<usize>();
        if expected != data.len() {
            return Err(TreeError::ShapeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { shape, data })
    }

    /// Creates a one-dimensional array.
    pub fn from_vec<V: Into<Tree>>(data: impl IntoIterator<Item = V>) -> Self {
        let data: Vec<Tree> = data.into_iter().map(Into::into).collect();
        Self {
            shape: alloc::vec![data.len()],
            data,
        }
    }

    /// Length of each axis.
    #[must_use]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Row-major elements.
    #[must_use]
    pub fn data(&self) -> &[Tree] {
        &self.data
    }

    /// Total number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the array holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// A labelled one-dimensional column of values.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    index: Vec<Key>,
    name: Option<String>,
    values: Vec<Tree>,
}

impl Series {
    /// Creates a series; `index` and `values` must have the same length.
    pub fn new(index: Vec<Key>, values: Vec<Tree>) -> Result<Self> {
        if index.len() != values.len() {
            return Err(TreeError::ShapeMismatch {
                expected: index.len(),
                actual: values.len(),
            });
        }
        Ok(Self {
            index,
            name: None,
            values,
        })
    }

    /// Sets the series name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Row labels.
    #[must_use]
    pub fn index(&self) -> &[Key] {
        &self.index
    }

    /// The series name, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Values, one per label.
    #[must_use]
    pub fn values(&self) -> &[Tree] {
        &self.values
    }
}

/// A labelled two-dimensional table stored in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    index: Vec<Key>,
    columns: Vec<Key>,
    cells: Vec<Tree>,
}

impl Frame {
    /// Creates a frame from row labels, column labels and row-major cells.
    pub fn new(index: Vec<Key>, columns: Vec<Key>, cells: Vec<Tree>) -> Result<Self> {
        let expected = index.len() * columns.len();
        if expected != cells.len() {
            return Err(TreeError::ShapeMismatch {
                expected,
                actual: cells.len(),
            });
        }
        Ok(Self {
            index,
            columns,
            cells,
        })
    }

    /// Creates a frame from named columns that all have one entry per row label.
    pub fn from_columns<K, V>(
        index: Vec<Key>,
        columns: impl IntoIterator<Item = (K, Vec<V>)>,
    ) -> Result<Self>
    where
        K: Into<Key>,
        V: Into<Tree>,
    {
        let mut labels = Vec::new();
        let mut by_column: Vec<Vec<Tree>> = Vec::new();
        for (label, values) in columns {
            if values.len() != index.len() {
                return Err(TreeError::ShapeMismatch {
                    expected: index.len(),
                    actual: values.len(),
                });
            }
            labels.push(label.into());
            by_column.push(values.into_iter().map(Into::into).collect());
        }

        let mut iters: Vec<_> = by_column.into_iter().map(Vec::into_iter).collect();
        let mut cells = Vec::with_capacity(index.len() * labels.len());
        for _ in 0..index.len() {
            cells.extend(iters.iter_mut().filter_map(Iterator::next));
        }
        Self::new(index, labels, cells)
    }

    /// Row labels.
    #[must_use]
    pub fn index(&self) -> &[Key] {
        &self.index
    }

    /// Column labels.
    #[must_use]
    pub fn columns(&self) -> &[Key] {
        &self.columns
    }

    /// Row-major cells.
    #[must_use]
    pub fn cells(&self) -> &[Tree] {
        &self.cells
    }

    /// `(rows, columns)`.
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.index.len(), self.columns.len())
    }

    /// The cell at `row`, `column`.
    #[must_use]
    pub fn get(&self, row: usize, column: usize) -> Option<&Tree> {
        if column >= self.columns.len() {
            return None;
        }
        self.cells.get(row * self.columns.len() + column)
    }
}

// === From implementations ===

impl From<bool> for Tree {
    fn from(b: bool) -> Self {
        Tree::Bool(b)
    }
}

impl From<i64> for Tree {
    fn from(i: i64) -> Self {
        Tree::Int(i)
    }
}

impl From<i32> for Tree {
    fn from(i: i32) -> Self {
        Tree::Int(i.into())
    }
}

impl From<usize> for Tree {
    /// Values above `i64::MAX` saturate to `i64::MAX`.
    fn from(i: usize) -> Self {
        Tree::Int(i64::try_from(i).unwrap_or(i64::MAX))
    }
}

impl From<f64> for Tree {
    fn from(x: f64) -> Self {
        Tree::Float(x)
    }
}

impl From<&str> for Tree {
    fn from(s: &str) -> Self {
        Tree::Str(s.into())
    }
}

impl From<String> for Tree {
    fn from(s: String) -> Self {
        Tree::Str(s)
    }
}

impl<T: Into<Tree>> From<Vec<T>> for Tree {
    fn from(items: Vec<T>) -> Self {
        Tree::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Tree>> From<Option<T>> for Tree {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => Tree::None,
        }
    }
}

impl From<Record> for Tree {
    fn from(r: Record) -> Self {
        Tree::Record(r)
    }
}

impl From<NdArray> for Tree {
    fn from(a: NdArray) -> Self {
        Tree::Array(a)
    }
}

impl From<Series> for Tree {
    fn from(s: Series) -> Self {
        Tree::Series(s)
    }
}

impl From<Frame> for Tree {
    fn from(f: Frame) -> Self {
        Tree::Frame(f)
    }
}

impl<T: Into<Tree>> FromIterator<T> for Tree {
    /// Collect into a [`Tree::List`].
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Tree::List(iter.into_iter().map(Into::into).collect())
    }
}

// === Formatting ===

fn write_seq<'a>(
    f: &mut Formatter<'_>,
    open: &str,
    items: impl IntoIterator<Item = &'a Tree>,
    close: &str,
) -> fmt::Result {
    f.write_str(open)?;
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    f.write_str(close)
}

fn write_key(f: &mut Formatter<'_>, key: &Key) -> fmt::Result {
    match key {
        Key::Str(s) => write!(f, "{s:?}"),
        other => write!(f, "{other}"),
    }
}

fn write_map(f: &mut Formatter<'_>, map: &TreeMap) -> fmt::Result {
    f.write_str("{")?;
    for (i, (key, value)) in map.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write_key(f, key)?;
        write!(f, ": {value}")?;
    }
    f.write_str("}")
}

fn write_labels(f: &mut Formatter<'_>, labels: &[Key]) -> fmt::Result {
    f.write_str("[")?;
    for (i, label) in labels.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write_key(f, label)?;
    }
    f.write_str("]")
}

/// Renders the tree in a compact literal notation.
///
/// Leaves of a skeleton render as `*`.
impl Display for Tree {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Tree::None => f.write_str("None"),
            Tree::Bool(b) => write!(f, "{b}"),
            Tree::Int(i) => write!(f, "{i}"),
            Tree::Float(x) => write!(f, "{x:?}"),
            Tree::Str(s) => write!(f, "{s:?}"),
            Tree::Placeholder => f.write_str("*"),
            Tree::List(items) => write_seq(f, "[", items, "]"),
            Tree::Tuple(items) if items.len() == 1 => write_seq(f, "(", items, ",)"),
            Tree::Tuple(items) => write_seq(f, "(", items, ")"),
            Tree::Dict(map) => write_map(f, map),
            Tree::OrderedDict(map) => {
                f.write_str("OrderedDict(")?;
                write_map(f, map)?;
                f.write_str(")")
            }
            Tree::Record(record) => {
                write!(f, "{}(", record.name)?;
                for (i, (field, value)) in record.fields.iter().zip(&record.values).enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{field}={value}")?;
                }
                f.write_str(")")
            }
            Tree::Array(array) => {
                write!(f, "array(shape={:?}, ", array.shape)?;
                write_seq(f, "[", &array.data, "]")?;
                f.write_str(")")
            }
            Tree::Series(series) => {
                f.write_str("Series(")?;
                if let Some(name) = &series.name {
                    write!(f, "name={name:?}, ")?;
                }
                f.write_str("index=")?;
                write_labels(f, &series.index)?;
                f.write_str(", ")?;
                write_seq(f, "[", &series.values, "]")?;
                f.write_str(")")
            }
            Tree::Frame(frame) => {
                f.write_str("Frame(index=")?;
                write_labels(f, &frame.index)?;
                f.write_str(", columns=")?;
                write_labels(f, &frame.columns)?;
                f.write_str(", ")?;
                write_seq(f, "[", &frame.cells, "]")?;
                f.write_str(")")
            }
        }
    }
}

impl Debug for Tree {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}
