//! In-memory object model for XCCDF security checklists.
//!
//! A checklist document is parsed in a single streaming pass into a
//! [`Benchmark`] owning a tree of Groups and Rules. Cross-references between
//! items may point forward in the document; they are held as slots and
//! filled by a resolution pass, with unresolvable slots reported as
//! diagnostics rather than failures.

pub mod model;
pub use model::{Benchmark, Check, Group, Item, Rule, Unresolved};

/// Streaming document parsing.
pub mod parse;
pub use parse::Error as ParseError;
