//! Builder for Value elements.

use tracing::warn;

use crate::model::{Benchmark, ItemId, Value, ValueId};

use super::{
    Error,
    cursor::{Attr, Cursor, Element},
};

/// Parses the Value element the cursor is positioned on.
///
/// Returns `None` when the element carries no usable `id` attribute or its
/// identifier is already registered; the defective value is skipped.
pub fn parse_value(
    cursor: &mut Cursor<'_>,
    benchmark: &mut Benchmark,
    parent: Option<ItemId>,
) -> Result<Option<ValueId>, Error> {
    let Some(ident) = cursor.attribute(Attr::Id).filter(|id| !id.is_empty()) else {
        warn!("skipping value without an id attribute");
        return Ok(None);
    };

    let mut value = Value {
        ident: ident.to_string(),
        parent,
        title: None,
        description: None,
    };

    let level = cursor.level();
    while cursor.next_start_at(level + 1)? {
        match cursor.element() {
            Element::Title if value.title.is_none() => {
                value.title = Some(cursor.subtree_text()?);
            }
            Element::Description if value.description.is_none() => {
                value.description = Some(cursor.subtree_text()?);
            }
            _ => {}
        }
    }

    match benchmark.insert_value(value) {
        Ok(id) => Ok(Some(id)),
        Err(err) => {
            warn!(%err, "skipping value with duplicate identifier");
            Ok(None)
        }
    }
}
