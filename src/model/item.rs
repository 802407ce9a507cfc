//! Groups, Rules and Values — the nodes of the checklist hierarchy.
//!
//! Groups nest Groups and Rules; Rules terminate the hierarchy and carry
//! checks, remediations and classification tags. Structural children are
//! held as arena handles owned by the [`Benchmark`](crate::model::Benchmark);
//! cross-references (`requires`, `conflicts`) are non-owning slots resolved
//! through the identifier registry.

use nonempty::NonEmpty;
use serde::Serialize;

use crate::model::{
    check::Check,
    enums::{Level, Role},
    registry::{FixId, ItemId, ItemRef, ValueId},
    remediation::{FixText, Ident, ProfileNote},
};

/// Fields common to every content item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemMeta {
    /// The item's unique identifier. Always non-empty; items without one
    /// fail construction.
    pub ident: String,
    /// Handle of the owning item, `None` for top-level items.
    pub parent: Option<ItemId>,
    /// Identifier grouping this item with others for profile selection.
    pub cluster_id: Option<String>,
    /// Raw identifier of an item this one extends, if any.
    pub extends: Option<String>,
    /// Whether the item is hidden from rendered output.
    pub hidden: bool,
    /// Whether the item is selected by default.
    pub selected: bool,
    /// Whether profiles are forbidden from changing the selection.
    pub prohibit_changes: bool,
    /// Human-readable title, if one was given.
    pub title: Option<String>,
    /// Human-readable description, if one was given.
    pub description: Option<String>,
}

impl ItemMeta {
    pub(crate) fn new(ident: String, parent: Option<ItemId>) -> Self {
        Self {
            ident,
            parent,
            cluster_id: None,
            extends: None,
            hidden: false,
            selected: true,
            prohibit_changes: false,
            title: None,
            description: None,
        }
    }
}

/// An alternative group within a `requires` constraint: satisfying any one
/// reference satisfies the group. Non-empty by construction; a `requires`
/// attribute yielding no identifiers produces no group at all.
pub type RequiresAlternatives = NonEmpty<ItemRef>;

/// Dependency constraints shared by Groups and Rules.
///
/// `requires` is a conjunction of alternative groups (OR inside, AND
/// across); `conflicts` is a flat list of references, none of which may be
/// satisfied. Both preserve document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Constraints {
    /// Alternative groups, one per `requires` element that produced any
    /// references.
    pub requires: Vec<RequiresAlternatives>,
    /// Conflicting item references. A slot is present even when the source
    /// element carried no identifier (historical leniency).
    pub conflicts: Vec<ItemRef>,
}

/// A container node in the checklist hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Group {
    /// Common item fields.
    pub meta: ItemMeta,
    /// Owned child items in document order.
    pub content: Vec<ItemId>,
    /// Owned child values in document order.
    pub values: Vec<ValueId>,
    /// Dependency constraints.
    pub constraints: Constraints,
}

/// A leaf policy node carrying checks and remediations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rule {
    /// Common item fields.
    pub meta: ItemMeta,
    /// The role the rule plays during scoring.
    pub role: Role,
    /// Severity of a failed rule.
    pub severity: Level,
    /// Dependency constraints.
    pub constraints: Constraints,
    /// External classification tags in document order.
    pub idents: Vec<Ident>,
    /// All checks in document order, including the primary one.
    pub checks: Vec<Check>,
    /// Position in [`Self::checks`] of the primary check: the first check
    /// with an absent or empty selector.
    pub primary: Option<usize>,
    /// Profile-keyed notes in document order.
    pub profile_notes: Vec<ProfileNote>,
    /// Owned fixes in document order (arena handles, since fixtexts may
    /// refer to fixes by identifier).
    pub fixes: Vec<FixId>,
    /// Owned fix descriptions in document order.
    pub fixtexts: Vec<FixText>,
}

impl Group {
    pub(crate) fn new(meta: ItemMeta) -> Self {
        Self {
            meta,
            content: Vec::new(),
            values: Vec::new(),
            constraints: Constraints::default(),
        }
    }
}

impl Rule {
    pub(crate) fn new(meta: ItemMeta) -> Self {
        Self {
            meta,
            role: Role::default(),
            severity: Level::default(),
            constraints: Constraints::default(),
            idents: Vec::new(),
            checks: Vec::new(),
            primary: None,
            profile_notes: Vec::new(),
            fixes: Vec::new(),
            fixtexts: Vec::new(),
        }
    }

    /// The rule's primary check: the first check with an absent or empty
    /// selector, if any.
    #[must_use]
    pub fn primary_check(&self) -> Option<&Check> {
        self.primary.and_then(|index| self.checks.get(index))
    }

    pub(crate) fn push_check(&mut self, check: Check) {
        if self.primary.is_none() && check.has_empty_selector() {
            self.primary = Some(self.checks.len());
        }
        self.checks.push(check);
    }
}

/// A content item: either a container Group or a leaf Rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Item {
    /// A container node.
    Group(Group),
    /// A leaf policy node.
    Rule(Rule),
}

impl Item {
    /// The common fields shared by both variants.
    #[must_use]
    pub const fn meta(&self) -> &ItemMeta {
        match self {
            Self::Group(group) => &group.meta,
            Self::Rule(rule) => &rule.meta,
        }
    }

    /// The item's identifier.
    #[must_use]
    pub fn ident(&self) -> &str {
        &self.meta().ident
    }

    /// The item's dependency constraints.
    #[must_use]
    pub const fn constraints(&self) -> &Constraints {
        match self {
            Self::Group(group) => &group.constraints,
            Self::Rule(rule) => &rule.constraints,
        }
    }

    pub(crate) const fn meta_mut(&mut self) -> &mut ItemMeta {
        match self {
            Self::Group(group) => &mut group.meta,
            Self::Rule(rule) => &mut rule.meta,
        }
    }

    pub(crate) const fn constraints_mut(&mut self) -> &mut Constraints {
        match self {
            Self::Group(group) => &mut group.constraints,
            Self::Rule(rule) => &mut rule.constraints,
        }
    }

    /// The group payload, if this item is a Group.
    #[must_use]
    pub const fn as_group(&self) -> Option<&Group> {
        match self {
            Self::Group(group) => Some(group),
            Self::Rule(_) => None,
        }
    }

    /// The rule payload, if this item is a Rule.
    #[must_use]
    pub const fn as_rule(&self) -> Option<&Rule> {
        match self {
            Self::Rule(rule) => Some(rule),
            Self::Group(_) => None,
        }
    }
}

/// A named value item, referenced by check exports.
///
/// Only the identity and descriptive fields are modelled here; the tailoring
/// machinery (selectors, bounds, types) lives outside this crate's scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Value {
    /// The value's unique identifier.
    pub ident: String,
    /// Handle of the owning item, `None` for benchmark-level values.
    pub parent: Option<ItemId>,
    /// Human-readable title, if one was given.
    pub title: Option<String>,
    /// Human-readable description, if one was given.
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use crate::model::check::{CheckBody, LeafCheck};

    use super::*;

    fn check_with_selector(selector: Option<&str>) -> Check {
        Check {
            ident: None,
            system: None,
            selector: selector.map(ToString::to_string),
            body: CheckBody::Leaf(LeafCheck::default()),
        }
    }

    #[test]
    fn first_selectorless_check_becomes_primary() {
        let mut rule = Rule::new(ItemMeta::new("r".to_string(), None));

        rule.push_check(check_with_selector(Some("alt")));
        rule.push_check(check_with_selector(None));
        rule.push_check(check_with_selector(Some(""))); // also selector-less, but second

        assert_eq!(rule.primary, Some(1));
        assert_eq!(rule.checks.len(), 3);
        assert!(rule.primary_check().unwrap().has_empty_selector());
    }

    #[test]
    fn rule_without_selectorless_check_has_no_primary() {
        let mut rule = Rule::new(ItemMeta::new("r".to_string(), None));
        rule.push_check(check_with_selector(Some("alt")));

        assert!(rule.primary_check().is_none());
    }
}
