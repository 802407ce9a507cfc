//! Check expressions attached to rules.
//!
//! A check is either a *leaf* naming an external checking engine and its
//! content, or a *combinator* boolean-composing child checks. The two forms
//! are distinct variants so a leaf structurally cannot hold children.

use serde::Serialize;

use crate::model::{
    enums::CheckOp,
    registry::ValueRef,
};

/// A testable condition attached to a rule.
///
/// The identifying attributes are shared by both forms; the body carries
/// the form-specific payload. A combinator owns its children transitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Check {
    /// Optional identifier of the check element.
    pub ident: Option<String>,
    /// URI of the checking system (e.g. an OVAL definitions namespace).
    pub system: Option<String>,
    /// Selector discriminating check variants; a rule's check with no
    /// selector is its primary check.
    pub selector: Option<String>,
    /// Leaf or combinator payload.
    pub body: CheckBody,
}

/// The form-specific payload of a [`Check`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CheckBody {
    /// A simple check delegating to an external checking engine.
    Leaf(LeafCheck),
    /// A boolean composition of child checks.
    Combinator(CombinatorCheck),
}

/// Payload of a simple check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LeafCheck {
    /// Inline check content, if the document embeds it. Only the first
    /// `check-content` element contributes; later ones are ignored.
    pub content: Option<String>,
    /// Pointers into external checking-content documents, in document order.
    pub content_refs: Vec<ContentRef>,
    /// Parameters imported from the checking engine, in document order.
    pub imports: Vec<CheckImport>,
    /// Values exported to the checking engine, in document order.
    pub exports: Vec<CheckExport>,
}

/// Payload of a combinator check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CombinatorCheck {
    /// The boolean connective and negation flag.
    pub op: CheckOp,
    /// Owned child checks, in document order. Empty when the operator
    /// keyword was not recognised.
    pub children: Vec<Check>,
}

/// A pointer to check content held in an external document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentRef {
    /// Name of the definition inside the external document.
    pub name: Option<String>,
    /// Location of the external document. Always present; elements without
    /// one are dropped at parse time.
    pub href: String,
}

/// A parameter imported from the checking engine after evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckImport {
    /// The engine-side name of the imported parameter.
    pub name: String,
    /// Raw text body of the import element.
    pub content: String,
}

/// A Value handed to the checking engine before evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckExport {
    /// The engine-side name the value is exported under.
    pub name: String,
    /// Reference to the exported Value item, resolved against the
    /// benchmark's identifier table.
    pub value: ValueRef,
}

impl Check {
    /// Whether the selector is absent or empty, making this check eligible
    /// to be a rule's primary check.
    #[must_use]
    pub fn has_empty_selector(&self) -> bool {
        self.selector.as_deref().is_none_or(str::is_empty)
    }

    /// The leaf payload, if this check is a leaf.
    #[must_use]
    pub const fn as_leaf(&self) -> Option<&LeafCheck> {
        match &self.body {
            CheckBody::Leaf(leaf) => Some(leaf),
            CheckBody::Combinator(_) => None,
        }
    }

    /// The combinator payload, if this check is a combinator.
    #[must_use]
    pub const fn as_combinator(&self) -> Option<&CombinatorCheck> {
        match &self.body {
            CheckBody::Combinator(combinator) => Some(combinator),
            CheckBody::Leaf(_) => None,
        }
    }

    /// Depth-first iteration over this check and all descendants.
    pub fn walk(&self) -> impl Iterator<Item = &Self> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let next = stack.pop()?;
            if let CheckBody::Combinator(combinator) = &next.body {
                stack.extend(combinator.children.iter().rev());
            }
            Some(next)
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::model::enums::Operator;

    use super::*;

    fn leaf(ident: &str) -> Check {
        Check {
            ident: Some(ident.to_string()),
            system: None,
            selector: None,
            body: CheckBody::Leaf(LeafCheck::default()),
        }
    }

    #[test]
    fn empty_selector_matches_absent_and_blank() {
        let mut check = leaf("c");
        assert!(check.has_empty_selector());

        check.selector = Some(String::new());
        assert!(check.has_empty_selector());

        check.selector = Some("alt".to_string());
        assert!(!check.has_empty_selector());
    }

    #[test]
    fn walk_visits_children_in_document_order() {
        let combinator = Check {
            ident: None,
            system: None,
            selector: None,
            body: CheckBody::Combinator(CombinatorCheck {
                op: CheckOp {
                    operator: Operator::Or,
                    negate: false,
                },
                children: vec![leaf("a"), leaf("b")],
            }),
        };

        let idents: Vec<_> = combinator
            .walk()
            .map(|check| check.ident.as_deref().unwrap_or("-"))
            .collect();
        assert_eq!(idents, ["-", "a", "b"]);
    }
}
