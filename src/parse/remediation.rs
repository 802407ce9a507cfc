//! Builders for rule remediations and classification tags.

use tracing::trace;

use crate::model::{Benchmark, Fix, FixCommon, FixId, FixText, Ident, Level, ProfileNote, Strategy};

use super::{
    Error,
    cursor::{Attr, Cursor},
};

/// Parses an `ident` classification tag.
///
/// Both the `system` attribute and a non-empty text body are required;
/// elements missing either are dropped.
pub fn parse_ident(cursor: &mut Cursor<'_>) -> Result<Option<Ident>, Error> {
    let system = cursor.attribute(Attr::System).map(ToString::to_string);
    let ident = cursor.subtree_text()?;

    match system {
        Some(system) if !ident.is_empty() => Ok(Some(Ident { ident, system })),
        _ => {
            trace!("dropping ident without system or text");
            Ok(None)
        }
    }
}

/// Parses a `profile-note` element. Notes without a `tag` are dropped,
/// since nothing could ever select them.
pub fn parse_profile_note(cursor: &mut Cursor<'_>) -> Result<Option<ProfileNote>, Error> {
    let tag = cursor.attribute(Attr::Tag).map(ToString::to_string);
    let text = cursor.subtree_text()?;

    match tag {
        Some(tag) => Ok(Some(ProfileNote { tag, text })),
        None => {
            trace!("dropping profile-note without a tag attribute");
            Ok(None)
        }
    }
}

/// Parses a `fix` element into the benchmark's fix arena, registering a
/// non-empty identifier in the auxiliary fix table (first registration
/// wins).
pub fn parse_fix(
    cursor: &mut Cursor<'_>,
    benchmark: &mut Benchmark,
) -> Result<FixId, Error> {
    let ident = cursor.attribute(Attr::Id).map(ToString::to_string);
    let system = cursor.attribute(Attr::System).map(ToString::to_string);
    let platform = cursor.attribute(Attr::Platform).map(ToString::to_string);
    let common = parse_fix_common(cursor)?;

    Ok(benchmark.insert_fix(Fix {
        ident,
        system,
        platform,
        common,
    }))
}

/// Parses a `fixtext` element. The `fixref` attribute, when present, is
/// resolved against the auxiliary fix table, possibly deferred to the
/// resolution pass.
pub fn parse_fixtext(
    cursor: &mut Cursor<'_>,
    benchmark: &mut Benchmark,
) -> Result<FixText, Error> {
    let fixref = benchmark.registry().request_fix(cursor.attribute(Attr::FixRef));
    let common = parse_fix_common(cursor)?;

    Ok(FixText { fixref, common })
}

fn parse_fix_common(cursor: &mut Cursor<'_>) -> Result<FixCommon, Error> {
    let reboot = cursor.attribute_bool(Attr::Reboot);
    let strategy = cursor
        .attribute(Attr::Strategy)
        .map_or_else(Strategy::default, Strategy::from_keyword);
    let disruption = cursor
        .attribute(Attr::Disruption)
        .map_or_else(Level::default, Level::from_keyword);
    let complexity = cursor
        .attribute(Attr::Complexity)
        .map_or_else(Level::default, Level::from_keyword);
    let content = cursor.subtree_text()?;

    Ok(FixCommon {
        reboot,
        strategy,
        disruption,
        complexity,
        content,
    })
}
