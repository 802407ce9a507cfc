//! The checklist object model.

mod benchmark;
mod check;
mod enums;
mod item;
mod registry;
mod remediation;

pub use benchmark::Benchmark;
pub use check::{Check, CheckBody, CheckExport, CheckImport, CombinatorCheck, ContentRef, LeafCheck};
pub use enums::{CheckOp, Level, Operator, Role, Strategy};
pub use item::{Constraints, Group, Item, ItemMeta, RequiresAlternatives, Rule, Value};
pub use registry::{
    DuplicateIdent, Expected, FixId, FixRef, ItemId, ItemRef, Reason, Unresolved, ValueId, ValueRef,
};
pub use remediation::{Fix, FixCommon, FixText, Ident, ProfileNote};
