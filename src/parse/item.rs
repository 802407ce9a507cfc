//! Builders for Group and Rule elements.

use tracing::{trace, warn};

use crate::model::{Benchmark, Group, Item, ItemId, ItemMeta, Level, Role, Rule};

use super::{
    Error, check, deps,
    cursor::{Attr, Cursor, Element},
    remediation, value,
};

/// Parses the Group or Rule the cursor is positioned on, inserting it (and
/// its descendants) into the benchmark.
///
/// Returns `None` when the item is defective and skipped: either it carries
/// no usable `id` attribute, or its identifier is already registered. The
/// cursor is left so that the enclosing loop continues with the next
/// sibling either way.
pub fn parse_item(
    cursor: &mut Cursor<'_>,
    benchmark: &mut Benchmark,
    parent: Option<ItemId>,
) -> Result<Option<ItemId>, Error> {
    let is_group = cursor.element() == Element::Group;

    let Some(ident) = cursor.attribute(Attr::Id).filter(|id| !id.is_empty()) else {
        warn!("skipping item without an id attribute");
        return Ok(None);
    };

    let mut meta = ItemMeta::new(ident.to_string(), parent);
    meta.cluster_id = cursor.attribute(Attr::ClusterId).map(ToString::to_string);
    meta.extends = cursor.attribute(Attr::Extends).map(ToString::to_string);
    meta.hidden = cursor.attribute_bool(Attr::Hidden);
    if let Some(selected) = cursor.attribute(Attr::Selected) {
        meta.selected = matches!(selected, "true" | "1");
    }
    meta.prohibit_changes = cursor.attribute_bool(Attr::ProhibitChanges);

    let item = if is_group {
        Item::Group(Group::new(meta))
    } else {
        let mut rule = Rule::new(meta);
        if let Some(role) = cursor.attribute(Attr::Role) {
            rule.role = Role::from_keyword(role);
        }
        if let Some(severity) = cursor.attribute(Attr::Severity) {
            rule.severity = Level::from_keyword(severity);
        }
        Item::Rule(rule)
    };

    // Register before descending, so the item's own identifier (and every
    // identifier seen so far) is visible to references in its subtree.
    let id = match benchmark.insert_item(item) {
        Ok(id) => id,
        Err(err) => {
            warn!(%err, "skipping item with duplicate identifier");
            return Ok(None);
        }
    };

    let level = cursor.level();
    while cursor.next_start_at(level + 1)? {
        match cursor.element() {
            Element::Title => {
                let text = cursor.subtree_text()?;
                let meta = benchmark.item_mut(id).meta_mut();
                if meta.title.is_none() {
                    meta.title = Some(text);
                }
            }
            Element::Description => {
                let text = cursor.subtree_text()?;
                let meta = benchmark.item_mut(id).meta_mut();
                if meta.description.is_none() {
                    meta.description = Some(text);
                }
            }
            Element::Requires => deps::parse_requires(cursor, benchmark, id),
            Element::Conflicts => deps::parse_conflicts(cursor, benchmark, id),
            Element::Group | Element::Rule if is_group => {
                if let Some(child) = parse_item(cursor, benchmark, Some(id))? {
                    if let Item::Group(group) = benchmark.item_mut(id) {
                        group.content.push(child);
                    }
                }
            }
            Element::Value if is_group => {
                if let Some(child) = value::parse_value(cursor, benchmark, Some(id))? {
                    if let Item::Group(group) = benchmark.item_mut(id) {
                        group.values.push(child);
                    }
                }
            }
            Element::Check | Element::ComplexCheck if !is_group => {
                let check = check::parse_check(cursor, benchmark)?;
                if let Item::Rule(rule) = benchmark.item_mut(id) {
                    rule.push_check(check);
                }
            }
            Element::Ident if !is_group => {
                if let Some(tag) = remediation::parse_ident(cursor)? {
                    if let Item::Rule(rule) = benchmark.item_mut(id) {
                        rule.idents.push(tag);
                    }
                }
            }
            Element::ProfileNote if !is_group => {
                if let Some(note) = remediation::parse_profile_note(cursor)? {
                    if let Item::Rule(rule) = benchmark.item_mut(id) {
                        rule.profile_notes.push(note);
                    }
                }
            }
            Element::Fix if !is_group => {
                let fix = remediation::parse_fix(cursor, benchmark)?;
                if let Item::Rule(rule) = benchmark.item_mut(id) {
                    rule.fixes.push(fix);
                }
            }
            Element::FixText if !is_group => {
                let fixtext = remediation::parse_fixtext(cursor, benchmark)?;
                if let Item::Rule(rule) = benchmark.item_mut(id) {
                    rule.fixtexts.push(fixtext);
                }
            }
            other => trace!(element = ?other, "skipping element"),
        }
    }

    Ok(Some(id))
}
