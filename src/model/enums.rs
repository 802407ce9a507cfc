//! Keyword-mapped enumerations used throughout the checklist model.
//!
//! Attribute values in a checklist document are free text; each enumeration
//! here carries a keyword table mapping the recognised spellings to a typed
//! variant. Unrecognised keywords map to the default variant rather than
//! failing the parse, since checklist content is frequently imperfect.

use serde::Serialize;

/// The role a rule plays during scoring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    /// The rule is checked and scored (the default).
    #[default]
    Full,
    /// The rule is checked but not scored.
    Unscored,
    /// The rule is neither checked nor scored.
    Unchecked,
}

impl Role {
    /// Maps a keyword to a role, defaulting to [`Role::Full`].
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Self {
        match keyword {
            "unscored" => Self::Unscored,
            "unchecked" => Self::Unchecked,
            _ => Self::Full,
        }
    }
}

/// A coarse magnitude scale shared by severity, disruption and complexity
/// attributes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Level {
    /// No level was given, or the keyword was not recognised.
    #[default]
    Unknown,
    /// Informational only.
    Info,
    /// Low.
    Low,
    /// Medium.
    Medium,
    /// High.
    High,
}

impl Level {
    /// Maps a keyword to a level, defaulting to [`Level::Unknown`].
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Self {
        match keyword {
            "info" => Self::Info,
            "low" => Self::Low,
            "medium" => Self::Medium,
            "high" => Self::High,
            _ => Self::Unknown,
        }
    }
}

/// The remediation approach a fix takes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// No strategy was given, or the keyword was not recognised.
    #[default]
    Unknown,
    /// Adjust a configuration setting.
    Configure,
    /// A combination of other strategies.
    Combination,
    /// Disable a component or service.
    Disable,
    /// Enable a component or service.
    Enable,
    /// Apply a patch or update package.
    Patch,
    /// Remediation by policy rather than technical means.
    Policy,
    /// Restrict access or permissions.
    Restrict,
    /// Update to a newer version.
    Update,
}

impl Strategy {
    /// Maps a keyword to a strategy, defaulting to [`Strategy::Unknown`].
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Self {
        match keyword {
            "configure" => Self::Configure,
            "combination" => Self::Combination,
            "disable" => Self::Disable,
            "enable" => Self::Enable,
            "patch" => Self::Patch,
            "policy" => Self::Policy,
            "restrict" => Self::Restrict,
            "update" => Self::Update,
            _ => Self::Unknown,
        }
    }
}

/// The boolean connective of a combinator check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Operator {
    /// All children must pass.
    #[default]
    And,
    /// At least one child must pass.
    Or,
}

impl Operator {
    /// Maps a keyword to an operator.
    ///
    /// Unlike the other keyword tables this one is case-insensitive, since
    /// both `and` and `AND` spellings occur in the wild. Unrecognised
    /// keywords return `None`; the caller decides how a combinator with an
    /// unrecognised operator degrades.
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        if keyword.eq_ignore_ascii_case("and") {
            Some(Self::And)
        } else if keyword.eq_ignore_ascii_case("or") {
            Some(Self::Or)
        } else {
            None
        }
    }
}

/// A boolean operator together with its independent negation flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CheckOp {
    /// The connective applied across the combinator's children.
    pub operator: Operator,
    /// Whether the combined result is inverted.
    pub negate: bool,
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case("full", Role::Full; "full")]
    #[test_case("unscored", Role::Unscored; "unscored")]
    #[test_case("unchecked", Role::Unchecked; "unchecked")]
    #[test_case("bogus", Role::Full; "unrecognised defaults to full")]
    fn role_keywords(keyword: &str, expected: Role) {
        assert_eq!(Role::from_keyword(keyword), expected);
    }

    #[test_case("info", Level::Info; "info")]
    #[test_case("low", Level::Low; "low")]
    #[test_case("medium", Level::Medium; "medium")]
    #[test_case("high", Level::High; "high")]
    #[test_case("HIGH", Level::Unknown; "uppercase is not recognised")]
    #[test_case("", Level::Unknown; "empty")]
    fn level_keywords(keyword: &str, expected: Level) {
        assert_eq!(Level::from_keyword(keyword), expected);
    }

    #[test_case("patch", Strategy::Patch; "patch")]
    #[test_case("configure", Strategy::Configure; "configure")]
    #[test_case("nonsense", Strategy::Unknown; "unrecognised")]
    fn strategy_keywords(keyword: &str, expected: Strategy) {
        assert_eq!(Strategy::from_keyword(keyword), expected);
    }

    #[test_case("and", Some(Operator::And); "lower and")]
    #[test_case("AND", Some(Operator::And); "upper and")]
    #[test_case("or", Some(Operator::Or); "lower or")]
    #[test_case("OR", Some(Operator::Or); "upper or")]
    #[test_case("xor", None; "unrecognised")]
    fn operator_keywords(keyword: &str, expected: Option<Operator>) {
        assert_eq!(Operator::from_keyword(keyword), expected);
    }

    #[test]
    fn levels_are_ordered() {
        assert!(Level::High > Level::Low);
        assert!(Level::Unknown < Level::Info);
    }
}
