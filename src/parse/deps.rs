//! Builders for the `requires` and `conflicts` dependency elements.

use nonempty::NonEmpty;
use tracing::trace;

use crate::model::{Benchmark, ItemId, ItemRef};

use super::cursor::{Attr, Cursor};

/// Parses a `requires` element into one alternative group.
///
/// The `idref` attribute is a space-separated identifier list; any one of
/// them satisfies the group. Empty tokens are dropped, and an element that
/// yields no identifiers at all produces no constraint.
pub fn parse_requires(cursor: &Cursor<'_>, benchmark: &mut Benchmark, owner: ItemId) {
    let slots: Vec<ItemRef> = cursor
        .attribute(Attr::IdRef)
        .unwrap_or_default()
        .split(' ')
        .filter(|token| !token.is_empty())
        .map(|token| benchmark.registry().request_item(Some(token)))
        .collect();

    match NonEmpty::from_vec(slots) {
        Some(alternatives) => benchmark
            .item_mut(owner)
            .constraints_mut()
            .requires
            .push(alternatives),
        None => trace!("requires element without identifiers produces no constraint"),
    }
}

/// Parses a `conflicts` element into one reference slot.
///
/// A slot is appended even when the `idref` attribute is missing; the
/// resolution pass reports it as unresolvable rather than losing the
/// element silently.
pub fn parse_conflicts(cursor: &Cursor<'_>, benchmark: &mut Benchmark, owner: ItemId) {
    let slot = benchmark.registry().request_item(cursor.attribute(Attr::IdRef));
    benchmark.item_mut(owner).constraints_mut().conflicts.push(slot);
}
