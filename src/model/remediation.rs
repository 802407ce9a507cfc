//! Remediation records and classification tags attached to rules.

use serde::Serialize;

use crate::model::{
    enums::{Level, Strategy},
    registry::FixRef,
};

/// An external classification tag on a rule, such as a CVE or CCE entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ident {
    /// The identifier within the naming system.
    pub ident: String,
    /// URI of the naming system.
    pub system: String,
}

/// A rule-local note shown only when a profile selects the rule under the
/// note's tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileNote {
    /// The profile tag this note is keyed by.
    pub tag: String,
    /// Raw rich-text body of the note.
    pub text: String,
}

/// Attributes shared by [`Fix`] and [`FixText`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FixCommon {
    /// Whether applying the remediation requires a reboot.
    pub reboot: bool,
    /// The remediation approach.
    pub strategy: Strategy,
    /// How disruptive applying the remediation is.
    pub disruption: Level,
    /// How complex applying the remediation is.
    pub complexity: Level,
    /// Free-form remediation content (a script or instructions).
    pub content: String,
}

/// A machine-applicable remediation attached to a rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Fix {
    /// Optional identifier. Non-empty identifiers are registered in the
    /// benchmark's auxiliary fix table so fixtexts can refer back to them.
    pub ident: Option<String>,
    /// URI of the system the fix content is written for.
    pub system: Option<String>,
    /// The platform the fix applies to.
    pub platform: Option<String>,
    /// Shared remediation attributes and content.
    pub common: FixCommon,
}

/// A human-readable description of a remediation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FixText {
    /// Reference to the specific [`Fix`] this text describes. A slot with
    /// no identifier means the text applies generally.
    pub fixref: FixRef,
    /// Shared remediation attributes and content.
    pub common: FixCommon,
}
