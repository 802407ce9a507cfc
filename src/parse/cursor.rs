//! A depth-tracked cursor over the XML token stream.
//!
//! Builders navigate the document with two operations: advance to the next
//! element start at a given nesting level (skipping anything deeper), and
//! capture the raw text of the current element's subtree. Element and
//! attribute names are matched on their local part, so namespace prefixes
//! don't matter.

use quick_xml::{
    Reader,
    events::{BytesStart, Event},
    name::QName,
};

use super::Error;

/// Element vocabulary recognised by the builders. Anything else maps to
/// [`Element::Unknown`] and is skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Element {
    Benchmark,
    Group,
    Rule,
    Value,
    Requires,
    Conflicts,
    Check,
    ComplexCheck,
    CheckContent,
    CheckContentRef,
    CheckImport,
    CheckExport,
    Fix,
    FixText,
    Ident,
    ProfileNote,
    Title,
    Description,
    Unknown,
}

impl Element {
    fn from_local(local: &[u8]) -> Self {
        match local {
            b"Benchmark" => Self::Benchmark,
            b"Group" => Self::Group,
            b"Rule" => Self::Rule,
            b"Value" => Self::Value,
            b"requires" => Self::Requires,
            b"conflicts" => Self::Conflicts,
            b"check" => Self::Check,
            b"complex-check" => Self::ComplexCheck,
            b"check-content" => Self::CheckContent,
            b"check-content-ref" => Self::CheckContentRef,
            b"check-import" => Self::CheckImport,
            b"check-export" => Self::CheckExport,
            b"fix" => Self::Fix,
            b"fixtext" => Self::FixText,
            b"ident" => Self::Ident,
            b"profile-note" => Self::ProfileNote,
            b"title" => Self::Title,
            b"description" => Self::Description,
            _ => Self::Unknown,
        }
    }
}

/// Attribute vocabulary recognised by the builders. Unrecognised attributes
/// are dropped at capture time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attr {
    Id,
    IdRef,
    ClusterId,
    Extends,
    Hidden,
    Selected,
    ProhibitChanges,
    Role,
    Severity,
    System,
    Selector,
    Operator,
    Negate,
    Name,
    Href,
    ImportName,
    ExportName,
    ValueId,
    Tag,
    Platform,
    Reboot,
    Strategy,
    Disruption,
    Complexity,
    FixRef,
}

impl Attr {
    fn from_local(local: &[u8]) -> Option<Self> {
        let attr = match local {
            b"id" => Self::Id,
            b"idref" => Self::IdRef,
            b"cluster-id" => Self::ClusterId,
            b"extends" => Self::Extends,
            b"hidden" => Self::Hidden,
            b"selected" => Self::Selected,
            b"prohibitChanges" => Self::ProhibitChanges,
            b"role" => Self::Role,
            b"severity" => Self::Severity,
            b"system" => Self::System,
            b"selector" => Self::Selector,
            b"operator" => Self::Operator,
            b"negate" => Self::Negate,
            b"name" => Self::Name,
            b"href" => Self::Href,
            b"import-name" => Self::ImportName,
            b"export-name" => Self::ExportName,
            b"value-id" => Self::ValueId,
            b"tag" => Self::Tag,
            b"platform" => Self::Platform,
            b"reboot" => Self::Reboot,
            b"strategy" => Self::Strategy,
            b"disruption" => Self::Disruption,
            b"complexity" => Self::Complexity,
            b"fixref" => Self::FixRef,
            _ => return None,
        };
        Some(attr)
    }
}

/// The cursor: a reader plus the capture state of the most recent element.
pub struct Cursor<'a> {
    reader: Reader<&'a [u8]>,
    /// Current nesting level of the reader position.
    depth: usize,
    element: Element,
    attrs: Vec<(Attr, String)>,
    /// Qualified name of the captured element, kept for subtree capture.
    name: Vec<u8>,
    /// Nesting level of the captured element.
    el_depth: usize,
    /// Whether the captured element was self-closing.
    empty: bool,
}

impl<'a> Cursor<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            reader: Reader::from_str(source),
            depth: 0,
            element: Element::Unknown,
            attrs: Vec::new(),
            name: Vec::new(),
            el_depth: 0,
            empty: false,
        }
    }

    /// The recognised kind of the captured element.
    pub const fn element(&self) -> Element {
        self.element
    }

    /// The nesting level of the captured element. Its children, if any,
    /// live one level deeper.
    pub const fn level(&self) -> usize {
        self.el_depth
    }

    /// A recognised attribute of the captured element.
    pub fn attribute(&self, key: Attr) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(attr, _)| *attr == key)
            .map(|(_, value)| value.as_str())
    }

    /// A boolean attribute. Both `true` and `1` spellings count; anything
    /// else (including absence) is false.
    pub fn attribute_bool(&self, key: Attr) -> bool {
        matches!(self.attribute(key), Some("true" | "1"))
    }

    /// Advances to the next element start at exactly `want` nesting levels,
    /// capturing it and returning `true`. Deeper subtrees are skipped;
    /// returns `false` once the enclosing element at level `want - 1`
    /// closes (or at end of input).
    pub fn next_start_at(&mut self, want: usize) -> Result<bool, Error> {
        // A self-closing element has no children to find.
        if self.empty && want > self.el_depth {
            return Ok(false);
        }
        loop {
            match self.reader.read_event()? {
                Event::Start(start) => {
                    let level = self.depth;
                    self.depth += 1;
                    if level == want {
                        self.capture(&start, level, false)?;
                        return Ok(true);
                    }
                }
                Event::Empty(start) => {
                    if self.depth == want {
                        self.capture(&start, self.depth, true)?;
                        return Ok(true);
                    }
                }
                Event::End(_) => {
                    self.depth = self.depth.saturating_sub(1);
                    if self.depth < want {
                        return Ok(false);
                    }
                }
                Event::Eof => return Ok(false),
                _ => {}
            }
        }
    }

    /// Captures the raw text of the current element's subtree, markup
    /// included, and leaves the cursor positioned after its end tag.
    pub fn subtree_text(&mut self) -> Result<String, Error> {
        if self.empty {
            return Ok(String::new());
        }
        let name = self.name.clone();
        let text = self.reader.read_text(QName(&name))?;
        self.depth = self.el_depth;
        self.empty = true;
        Ok(text.into_owned())
    }

    fn capture(&mut self, start: &BytesStart<'_>, level: usize, empty: bool) -> Result<(), Error> {
        self.element = Element::from_local(start.local_name().as_ref());
        self.attrs.clear();
        for attr in start.attributes() {
            let attr = attr?;
            if let Some(key) = Attr::from_local(attr.key.local_name().as_ref()) {
                self.attrs.push((key, attr.unescape_value()?.into_owned()));
            }
        }
        self.name = start.name().as_ref().to_vec();
        self.el_depth = level;
        self.empty = empty;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sibling_iteration_skips_subtrees() {
        let source = r#"<root>
            <a><nested/><nested/></a>
            <b attr="x"/>
            <c>text</c>
        </root>"#;
        let mut cursor = Cursor::new(source);
        assert!(cursor.next_start_at(0).unwrap());

        let mut seen = Vec::new();
        while cursor.next_start_at(1).unwrap() {
            seen.push(String::from_utf8(cursor.name.clone()).unwrap());
        }
        assert_eq!(seen, ["a", "b", "c"]);
    }

    #[test]
    fn descends_into_children_and_back_out() {
        let source = "<root><a><x/><y/></a><b/></root>";
        let mut cursor = Cursor::new(source);
        assert!(cursor.next_start_at(0).unwrap());
        assert!(cursor.next_start_at(1).unwrap()); // a

        let mut children = Vec::new();
        while cursor.next_start_at(2).unwrap() {
            children.push(String::from_utf8(cursor.name.clone()).unwrap());
        }
        assert_eq!(children, ["x", "y"]);

        // Back at level 1, the next sibling is b.
        assert!(cursor.next_start_at(1).unwrap());
        assert_eq!(cursor.name, b"b");
        assert!(!cursor.next_start_at(1).unwrap());
    }

    #[test]
    fn subtree_text_keeps_raw_markup() {
        let source = "<root><content>line<br/>more <b>bold</b></content><after/></root>";
        let mut cursor = Cursor::new(source);
        assert!(cursor.next_start_at(0).unwrap());
        assert!(cursor.next_start_at(1).unwrap());

        let text = cursor.subtree_text().unwrap();
        assert_eq!(text, "line<br/>more <b>bold</b>");

        // The cursor continues with the following sibling.
        assert!(cursor.next_start_at(1).unwrap());
        assert_eq!(cursor.name, b"after");
    }

    #[test]
    fn self_closing_element_has_no_children_and_empty_text() {
        let source = "<root><a/><b/></root>";
        let mut cursor = Cursor::new(source);
        assert!(cursor.next_start_at(0).unwrap());
        assert!(cursor.next_start_at(1).unwrap()); // a

        assert!(!cursor.next_start_at(2).unwrap());
        assert!(cursor.next_start_at(1).unwrap()); // b
        assert_eq!(cursor.subtree_text().unwrap(), "");
    }

    #[test]
    fn attributes_are_unescaped_and_matched_by_local_name() {
        let source = r#"<root><Rule xccdf:id="r&amp;1" unknown="x" selected="1"/></root>"#;
        let mut cursor = Cursor::new(source);
        assert!(cursor.next_start_at(0).unwrap());
        assert!(cursor.next_start_at(1).unwrap());

        assert_eq!(cursor.element(), Element::Rule);
        assert_eq!(cursor.attribute(Attr::Id), Some("r&1"));
        assert!(cursor.attribute_bool(Attr::Selected));
        assert!(!cursor.attribute_bool(Attr::Hidden));
    }

    #[test]
    fn namespace_prefixes_do_not_matter_for_elements() {
        let source = "<xccdf:Benchmark xmlns:xccdf=\"ns\"><xccdf:Group id=\"g\"/></xccdf:Benchmark>";
        let mut cursor = Cursor::new(source);
        assert!(cursor.next_start_at(0).unwrap());
        assert_eq!(cursor.element(), Element::Benchmark);
        assert!(cursor.next_start_at(1).unwrap());
        assert_eq!(cursor.element(), Element::Group);
    }
}
