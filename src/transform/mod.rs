//! Per-table row transforms.
//!
//! ```text
//! statement → InsertStatement → tokenize → Row → TableTransform → Outcome
//! ```
//!
//! A [`TransformRegistry`] maps table names to [`TableTransform`]s. The
//! rewriter resolves one entry when it is built and uses it for the whole
//! run.

mod registry;
mod tables;
mod traits;

pub use registry::*;
pub use tables::*;
pub use traits::*;
