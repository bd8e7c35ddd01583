#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

extern crate alloc;

mod error;
pub use error::*;

mod macros;

mod tree;
pub use tree::*;

mod kind;
pub use kind::*;

mod node;
pub use node::*;

pub mod builtin;

mod registry;
pub use registry::{
    Catalog, Classification, DEFAULT_SEPARATOR, KindFactory, KindOptions, KindOptionsMap,
    Registry, RegistryBuilder,
};

mod walk;
pub use walk::*;

mod flatten;
pub use flatten::{Leaves, TreeDef};

mod unflatten;

mod map;

mod names;

mod equality;
pub use equality::*;

mod update;

#[cfg(feature = "tracing")]
#[allow(unused_imports)]
pub(crate) use tracing::{debug, trace};

#[cfg(not(feature = "tracing"))]
#[macro_export]
#[doc(hidden)]
/// Forwards to tracing::trace when the tracing feature is enabled
macro_rules! trace {
    ($($tt:tt)*) => {};
}
#[cfg(not(feature = "tracing"))]
#[macro_export]
#[doc(hidden)]
/// Forwards to tracing::debug when the tracing feature is enabled
macro_rules! debug {
    ($($tt:tt)*) => {};
}
