//! Streaming construction of the object model from checklist documents.
//!
//! Parsing is a single forward pass over the token stream. Items are
//! registered in the benchmark's identifier table as they are encountered,
//! so references to earlier identifiers resolve immediately; references to
//! later ones are left pending and filled by a resolution pass once the
//! document has been read. Defective elements are skipped with a log event
//! rather than failing the document: only malformed XML or a wrong root
//! element is fatal.

mod check;
mod cursor;
mod deps;
mod item;
mod remediation;
mod value;

use tracing::instrument;

use crate::model::Benchmark;

use cursor::{Attr, Cursor, Element};

/// Errors fatal to document parsing.
///
/// Everything else (missing identifiers, duplicate items, dangling
/// references) is recoverable and surfaces through
/// [`Benchmark::unresolved`] or log events instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The underlying XML token stream is malformed.
    #[error("malformed XML: {0}")]
    Xml(#[from] quick_xml::Error),
    /// An attribute could not be decoded.
    #[error("malformed attribute: {0}")]
    Attr(#[from] quick_xml::events::attributes::AttrError),
    /// The document's root element is not a `Benchmark`.
    #[error("document root is not a Benchmark element")]
    NotABenchmark,
}

/// Parses a checklist document into a [`Benchmark`].
#[instrument(skip_all)]
pub(crate) fn parse_document(source: &str) -> Result<Benchmark, Error> {
    let mut cursor = Cursor::new(source);
    if !cursor.next_start_at(0)? || cursor.element() != Element::Benchmark {
        return Err(Error::NotABenchmark);
    }

    let mut benchmark = Benchmark::default();
    benchmark.set_ident(cursor.attribute(Attr::Id).map(ToString::to_string));

    while cursor.next_start_at(1)? {
        match cursor.element() {
            Element::Title => {
                let text = cursor.subtree_text()?;
                if benchmark.title().is_none() {
                    benchmark.set_title(text);
                }
            }
            Element::Description => {
                let text = cursor.subtree_text()?;
                if benchmark.description().is_none() {
                    benchmark.set_description(text);
                }
            }
            Element::Group | Element::Rule => {
                if let Some(id) = item::parse_item(&mut cursor, &mut benchmark, None)? {
                    benchmark.push_content(id);
                }
            }
            Element::Value => {
                if let Some(id) = value::parse_value(&mut cursor, &mut benchmark, None)? {
                    benchmark.push_root_value(id);
                }
            }
            _ => {}
        }
    }

    benchmark.resolve_pending();
    Ok(benchmark)
}
