//! Identifier registry and deferred reference resolution.
//!
//! Checklist items refer to each other by identifier, and a reference may
//! name an item that appears later in document order. Builders therefore
//! never hold direct references; they request a *slot* from the registry.
//! A slot is filled immediately when the identifier is already registered,
//! and otherwise left pending for the resolution pass that runs once the
//! whole document has been parsed.
//!
//! Handles are stable indices into the arenas owned by the
//! [`Benchmark`](crate::model::Benchmark); they survive arena growth and are
//! cheap to copy.

use std::{collections::HashMap, fmt};

use serde::Serialize;

/// A stable handle to a Group or Rule in the benchmark's item arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ItemId(pub(crate) usize);

/// A stable handle to a Value in the benchmark's value arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ValueId(pub(crate) usize);

/// A stable handle to a Fix in the benchmark's fix arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct FixId(pub(crate) usize);

impl ItemId {
    /// The position of the item in the benchmark's item arena.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl ValueId {
    /// The position of the value in the benchmark's value arena.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl FixId {
    /// The position of the fix in the benchmark's fix arena.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// A non-owning reference to a content item (Group or Rule), resolved by
/// identifier.
///
/// The slot keeps the raw identifier it was requested with so that
/// diagnostics can name it even when resolution fails. A slot with no
/// identifier at all can occur (a `conflicts` element without an `idref`
/// attribute still produces one); it is never resolvable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemRef {
    /// The referenced identifier, if one was given.
    pub idref: Option<String>,
    /// The resolved handle, filled at request time or by the resolution pass.
    pub target: Option<ItemId>,
}

/// A non-owning reference to a Value item, resolved by identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueRef {
    /// The referenced identifier, if one was given.
    pub idref: Option<String>,
    /// The resolved handle, filled at request time or by the resolution pass.
    pub target: Option<ValueId>,
}

/// A non-owning reference to a Fix record, looked up in the auxiliary fix
/// table.
///
/// Fix lookup is intentionally weaker than content/value resolution: the
/// auxiliary table is keyed independently of the main identifier table and
/// no kind check applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FixRef {
    /// The referenced fix identifier, if one was given.
    pub idref: Option<String>,
    /// The resolved handle, filled at request time or by the resolution pass.
    pub target: Option<FixId>,
}

impl ItemRef {
    /// Whether the slot has been filled.
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        self.target.is_some()
    }
}

impl ValueRef {
    /// Whether the slot has been filled.
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        self.target.is_some()
    }
}

impl FixRef {
    /// Whether the slot has been filled.
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        self.target.is_some()
    }
}

/// The kind of entity a reference slot expects to resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Expected {
    /// A Group or Rule in the main identifier table.
    Content,
    /// A Value in the main identifier table.
    Value,
    /// A Fix in the auxiliary fix table.
    Fix,
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Content => "content item",
            Self::Value => "value",
            Self::Fix => "fix",
        };
        f.write_str(name)
    }
}

/// Why a reference slot could not be filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Reason {
    /// The identifier is not registered anywhere in the document.
    NotFound,
    /// The identifier is registered, but to an entity of a different kind.
    WrongKind,
    /// The slot was created without an identifier and can never resolve.
    MissingIdent,
}

/// A per-slot diagnostic produced by the resolution pass.
///
/// Unresolved references are recoverable by design: the object model is
/// still returned and consumers decide whether the document is usable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Unresolved {
    /// Identifier of the item whose slot failed to resolve.
    pub owner: String,
    /// The identifier the slot was requested with, if any.
    pub idref: Option<String>,
    /// The kind of entity the slot expected.
    pub expected: Expected,
    /// Why the slot stayed empty.
    pub reason: Reason,
}

impl fmt::Display for Unresolved {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.idref, self.reason) {
            (Some(idref), Reason::WrongKind) => write!(
                f,
                "{}: '{idref}' is not a {} (wrong kind)",
                self.owner, self.expected
            ),
            (Some(idref), _) => {
                write!(f, "{}: {} '{idref}' not found", self.owner, self.expected)
            }
            (None, _) => write!(f, "{}: {} reference with no identifier", self.owner, self.expected),
        }
    }
}

/// Error returned when an identifier is registered twice.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("identifier '{0}' is already registered")]
pub struct DuplicateIdent(pub String);

/// An entry in the main identifier table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Entry {
    Item(ItemId),
    Value(ValueId),
}

/// The benchmark-scoped identifier tables.
///
/// The main table holds content items and values under a single keyspace
/// (kind-checked at lookup); the auxiliary table holds fixes under an
/// independent keyspace.
#[derive(Debug, Default)]
pub struct IdentRegistry {
    entries: HashMap<String, Entry>,
    fixes: HashMap<String, FixId>,
}

impl IdentRegistry {
    /// Registers a content item under its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`DuplicateIdent`] if the identifier is already taken by any
    /// item or value.
    pub fn register_item(&mut self, ident: &str, id: ItemId) -> Result<(), DuplicateIdent> {
        if self.entries.contains_key(ident) {
            return Err(DuplicateIdent(ident.to_string()));
        }
        self.entries.insert(ident.to_string(), Entry::Item(id));
        Ok(())
    }

    /// Registers a value under its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`DuplicateIdent`] if the identifier is already taken.
    pub fn register_value(
        &mut self,
        ident: &str,
        id: ValueId,
    ) -> Result<(), DuplicateIdent> {
        if self.entries.contains_key(ident) {
            return Err(DuplicateIdent(ident.to_string()));
        }
        self.entries.insert(ident.to_string(), Entry::Value(id));
        Ok(())
    }

    /// Registers a fix in the auxiliary table. First registration wins;
    /// later fixes reusing the identifier are left unregistered.
    pub fn register_fix(&mut self, ident: &str, id: FixId) {
        self.fixes.entry(ident.to_string()).or_insert(id);
    }

    /// Requests a content-item reference.
    ///
    /// The slot is filled immediately when the identifier is already
    /// registered as a content item; otherwise it is left pending for the
    /// resolution pass.
    pub fn request_item(&self, idref: Option<&str>) -> ItemRef {
        let target = idref.and_then(|ident| self.lookup_item(ident).ok());
        ItemRef {
            idref: idref.map(ToString::to_string),
            target,
        }
    }

    /// Requests a value reference. See [`Self::request_item`].
    pub fn request_value(&self, idref: Option<&str>) -> ValueRef {
        let target = idref.and_then(|ident| self.lookup_value(ident).ok());
        ValueRef {
            idref: idref.map(ToString::to_string),
            target,
        }
    }

    /// Requests a fix reference against the auxiliary table.
    pub fn request_fix(&self, idref: Option<&str>) -> FixRef {
        let target = idref.and_then(|ident| self.fixes.get(ident).copied());
        FixRef {
            idref: idref.map(ToString::to_string),
            target,
        }
    }

    /// Looks up a content item, distinguishing "not registered" from
    /// "registered as something else".
    pub fn lookup_item(&self, ident: &str) -> Result<ItemId, Reason> {
        match self.entries.get(ident) {
            Some(Entry::Item(id)) => Ok(*id),
            Some(Entry::Value(_)) => Err(Reason::WrongKind),
            None => Err(Reason::NotFound),
        }
    }

    /// Looks up a value, distinguishing "not registered" from "registered as
    /// something else".
    pub fn lookup_value(&self, ident: &str) -> Result<ValueId, Reason> {
        match self.entries.get(ident) {
            Some(Entry::Value(id)) => Ok(*id),
            Some(Entry::Item(_)) => Err(Reason::WrongKind),
            None => Err(Reason::NotFound),
        }
    }

    /// Looks up a fix in the auxiliary table. No kind check applies.
    pub fn lookup_fix(&self, ident: &str) -> Result<FixId, Reason> {
        self.fixes.get(ident).copied().ok_or(Reason::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut registry = IdentRegistry::default();
        registry.register_item("rule-1", ItemId(0)).unwrap();

        let err = registry.register_item("rule-1", ItemId(1)).unwrap_err();
        assert_eq!(err, DuplicateIdent("rule-1".to_string()));

        // Values share the keyspace with items.
        assert!(registry.register_value("rule-1", ValueId(0)).is_err());
    }

    #[test]
    fn early_identifier_resolves_at_request_time() {
        let mut registry = IdentRegistry::default();
        registry.register_item("rule-1", ItemId(3)).unwrap();

        let slot = registry.request_item(Some("rule-1"));
        assert_eq!(slot.target, Some(ItemId(3)));
        assert_eq!(slot.target.unwrap().index(), 3);
    }

    #[test]
    fn late_identifier_leaves_slot_pending() {
        let registry = IdentRegistry::default();
        let slot = registry.request_item(Some("rule-later"));
        assert!(!slot.is_resolved());
        assert_eq!(slot.idref.as_deref(), Some("rule-later"));
    }

    #[test]
    fn kind_mismatch_is_distinguished_from_absence() {
        let mut registry = IdentRegistry::default();
        registry.register_value("val-1", ValueId(0)).unwrap();

        assert_eq!(registry.lookup_item("val-1"), Err(Reason::WrongKind));
        assert_eq!(registry.lookup_item("nope"), Err(Reason::NotFound));
        assert_eq!(registry.lookup_value("val-1"), Ok(ValueId(0)));
    }

    #[test]
    fn fix_table_is_independent_and_first_wins() {
        let mut registry = IdentRegistry::default();
        registry.register_item("shared", ItemId(0)).unwrap();

        // Same identifier in the auxiliary table is fine.
        registry.register_fix("shared", FixId(0));
        registry.register_fix("shared", FixId(1));

        assert_eq!(registry.lookup_fix("shared"), Ok(FixId(0)));
    }
}
