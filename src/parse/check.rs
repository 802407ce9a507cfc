//! Builder for check expressions, leaf and combinator alike.

use tracing::{trace, warn};

use crate::model::{
    Benchmark, Check, CheckBody, CheckExport, CheckImport, CheckOp, CombinatorCheck, ContentRef,
    LeafCheck, Operator,
};

use super::{
    Error,
    cursor::{Attr, Cursor, Element},
};

/// Parses the check element the cursor is positioned on, recursing into
/// combinator children.
///
/// An element is a combinator when it carries an `operator` attribute;
/// anything else, a `complex-check` without one included, is a leaf. A
/// combinator whose operator keyword is not recognised degrades to an `and`
/// over no children, so the node survives in the tree without guessing at
/// its meaning.
pub fn parse_check(
    cursor: &mut Cursor<'_>,
    benchmark: &mut Benchmark,
) -> Result<Check, Error> {
    let ident = cursor.attribute(Attr::Id).map(ToString::to_string);
    let system = cursor.attribute(Attr::System).map(ToString::to_string);
    let selector = cursor.attribute(Attr::Selector).map(ToString::to_string);
    let operator = cursor.attribute(Attr::Operator).map(ToString::to_string);
    let negate = cursor.attribute_bool(Attr::Negate);

    let body = if let Some(keyword) = operator.as_deref() {
        parse_combinator(cursor, benchmark, keyword, negate)?
    } else {
        parse_leaf(cursor, benchmark)?
    };

    Ok(Check {
        ident,
        system,
        selector,
        body,
    })
}

fn parse_combinator(
    cursor: &mut Cursor<'_>,
    benchmark: &mut Benchmark,
    keyword: &str,
    negate: bool,
) -> Result<CheckBody, Error> {
    let (operator, collect) = match Operator::from_keyword(keyword) {
        Some(operator) => (operator, true),
        None => {
            warn!(keyword, "unrecognised check operator, keeping no children");
            (Operator::default(), false)
        }
    };

    let mut children = Vec::new();
    let level = cursor.level();
    while cursor.next_start_at(level + 1)? {
        match cursor.element() {
            Element::Check | Element::ComplexCheck if collect => {
                children.push(parse_check(cursor, benchmark)?);
            }
            other => trace!(element = ?other, "skipping element inside combinator"),
        }
    }

    Ok(CheckBody::Combinator(CombinatorCheck {
        op: CheckOp { operator, negate },
        children,
    }))
}

fn parse_leaf(cursor: &mut Cursor<'_>, benchmark: &mut Benchmark) -> Result<CheckBody, Error> {
    let mut leaf = LeafCheck::default();
    let level = cursor.level();
    while cursor.next_start_at(level + 1)? {
        match cursor.element() {
            Element::CheckContentRef => {
                let Some(href) = cursor.attribute(Attr::Href) else {
                    warn!("dropping check-content-ref without an href attribute");
                    continue;
                };
                leaf.content_refs.push(ContentRef {
                    name: cursor.attribute(Attr::Name).map(ToString::to_string),
                    href: href.to_string(),
                });
            }
            Element::CheckContent => {
                let content = cursor.subtree_text()?;
                if leaf.content.is_none() {
                    leaf.content = Some(content);
                } else {
                    trace!("ignoring additional check-content element");
                }
            }
            Element::CheckImport => {
                let Some(name) = cursor.attribute(Attr::ImportName).map(ToString::to_string)
                else {
                    warn!("dropping check-import without an import-name attribute");
                    continue;
                };
                let content = cursor.subtree_text()?;
                leaf.imports.push(CheckImport { name, content });
            }
            Element::CheckExport => {
                let Some(name) = cursor.attribute(Attr::ExportName).map(ToString::to_string)
                else {
                    warn!("dropping check-export without an export-name attribute");
                    continue;
                };
                let value = benchmark.registry().request_value(cursor.attribute(Attr::ValueId));
                leaf.exports.push(CheckExport { name, value });
            }
            Element::Check | Element::ComplexCheck => {
                trace!("leaf check ignores nested check elements");
            }
            other => trace!(element = ?other, "skipping element inside check"),
        }
    }

    Ok(CheckBody::Leaf(leaf))
}
