#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

use std::sync::Arc;

use leafwise::{Catalog, KindOptions, NodeOps};

#[cfg(feature = "tracing")]
use tracing::debug;

#[cfg(not(feature = "tracing"))]
macro_rules! debug {
    ($($tt:tt)*) => {};
}

mod ndarray;
pub use ndarray::{ARRAY, ArrayKind};

mod series;
pub use series::{SERIES, SeriesKind};

mod frame;
pub use frame::{FRAME, FrameKind};

/// Names of every kind this crate provides, in registration order.
pub const KINDS: [&str; 3] = [FRAME, SERIES, ARRAY];

/// Adds the array, series and frame kinds to `catalog`.
pub fn register(catalog: &mut Catalog) -> &mut Catalog {
    debug!(kinds = ?KINDS, "registering adapter kinds");
    catalog
        .register(FRAME, |options: &KindOptions| -> Arc<dyn NodeOps> {
            Arc::new(FrameKind::new(options))
        })
        .register(SERIES, |options: &KindOptions| -> Arc<dyn NodeOps> {
            Arc::new(SeriesKind::new(options))
        })
        .register(ARRAY, |options: &KindOptions| -> Arc<dyn NodeOps> {
            Arc::new(ArrayKind::new(options))
        })
}

/// The built-in kinds plus the kinds of this crate.
#[must_use]
pub fn catalog() -> Catalog {
    let mut catalog = Catalog::builtin();
    register(&mut catalog);
    catalog
}
