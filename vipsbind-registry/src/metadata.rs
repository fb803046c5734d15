//! Human-readable documentation from GObject-Introspection metadata.
//!
//! Only the docs of `enumeration` and `bitfield` elements that are direct
//! children of a `namespace`, and of their `member` children, are kept.
//! Everything else in the document is skipped.

use crate::error::ParseError;
use quick_xml::Reader;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesStart, Event};
use std::collections::HashMap;

/// Documentation of enumerated and flags types, keyed by unprefixed name.
#[derive(Debug, Clone, Default)]
pub struct MetadataDocs {
    types: HashMap<String, TypeDocs>,
}

#[derive(Debug, Clone, Default)]
struct TypeDocs {
    doc: Option<String>,
    members: HashMap<String, String>,
}

impl MetadataDocs {
    /// Returns the type-level doc text.
    #[must_use]
    pub fn type_doc(&self, type_name: &str) -> Option<&str> {
        self.types.get(type_name)?.doc.as_deref()
    }

    /// Returns the doc text of one member of a type.
    #[must_use]
    pub fn member_doc(&self, type_name: &str, member: &str) -> Option<&str> {
        self.types
            .get(type_name)?
            .members
            .get(member)
            .map(String::as_str)
    }

    /// Returns true if the type was declared in the document.
    #[must_use]
    pub fn contains_type(&self, type_name: &str) -> bool {
        self.types.contains_key(type_name)
    }

    fn declare(&mut self, target: DocTarget) {
        if let DocTarget::Type(name) = target {
            self.types.entry(name).or_default();
        }
    }

    fn annotate(&mut self, target: DocTarget, text: String) {
        match target {
            DocTarget::Type(name) => {
                let entry = self.types.entry(name).or_default();
                entry.doc.get_or_insert(text);
            }
            DocTarget::Member(name, member) => {
                self.types
                    .entry(name)
                    .or_default()
                    .members
                    .entry(member)
                    .or_insert(text);
            }
        }
    }
}

/// Where a `doc` element's text belongs.
#[derive(Debug, Clone, PartialEq, Eq)]
enum DocTarget {
    Type(String),
    Member(String, String),
}

/// One open element on the path from the document root.
#[derive(Debug)]
struct Frame {
    element: String,
    name: Option<String>,
}

impl Frame {
    fn from_start(e: &BytesStart<'_>) -> Result<Self, ParseError> {
        let element = std::str::from_utf8(e.local_name().as_ref())?.to_string();
        let mut name = None;
        for attr in e.attributes().flatten() {
            if attr.key.as_ref() == b"name" {
                let value = std::str::from_utf8(&attr.value)?;
                name = Some(quick_xml::escape::unescape(value)?.into_owned());
            }
        }
        Ok(Self { element, name })
    }

    fn is_enumerated(&self) -> bool {
        self.element == "enumeration" || self.element == "bitfield"
    }
}

fn doc_target(path: &[Frame]) -> Option<DocTarget> {
    match path {
        [.., ns, ty] if ns.element == "namespace" && ty.is_enumerated() => {
            Some(DocTarget::Type(ty.name.clone()?))
        }
        [.., ns, ty, member]
            if ns.element == "namespace" && ty.is_enumerated() && member.element == "member" =>
        {
            Some(DocTarget::Member(ty.name.clone()?, member.name.clone()?))
        }
        _ => None,
    }
}

/// Parses enum and flags documentation from a GIR document.
///
/// # Errors
/// Returns `ParseError` if the XML is malformed.
pub fn parse_metadata(xml: &str) -> Result<MetadataDocs, ParseError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut docs = MetadataDocs::default();
    let mut path: Vec<Frame> = Vec::new();
    let mut capture: Option<(DocTarget, String)> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let frame = Frame::from_start(e)?;
                if frame.element == "doc" {
                    capture = doc_target(&path).map(|target| (target, String::new()));
                } else if let Some(target) = doc_target_for_declaration(&path, &frame) {
                    docs.declare(target);
                }
                path.push(frame);
            }
            Ok(Event::Empty(ref e)) => {
                let frame = Frame::from_start(e)?;
                if let Some(target) = doc_target_for_declaration(&path, &frame) {
                    docs.declare(target);
                }
            }
            Ok(Event::Text(ref t)) => {
                if let Some((_, text)) = capture.as_mut() {
                    text.push_str(std::str::from_utf8(t.as_ref())?);
                }
            }
            Ok(Event::CData(ref t)) => {
                if let Some((_, text)) = capture.as_mut() {
                    text.push_str(std::str::from_utf8(t.as_ref())?);
                }
            }
            Ok(Event::GeneralRef(ref r)) => {
                if let Some((_, text)) = capture.as_mut() {
                    if let Some(ch) = r.resolve_char_ref()? {
                        text.push(ch);
                    } else {
                        // unknown entities are kept verbatim
                        let name = std::str::from_utf8(r.as_ref())?;
                        match resolve_predefined_entity(name) {
                            Some(value) => text.push_str(value),
                            None => text.push_str(&format!("&{name};")),
                        }
                    }
                }
            }
            Ok(Event::End(_)) => {
                let closed = path.pop();
                if closed.is_some_and(|frame| frame.element == "doc") {
                    if let Some((target, text)) = capture.take() {
                        docs.annotate(target, text);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(docs)
}

/// Returns the type an `enumeration`/`bitfield` element declares, if the
/// element sits directly inside a namespace.
fn doc_target_for_declaration(path: &[Frame], frame: &Frame) -> Option<DocTarget> {
    match path.last() {
        Some(parent) if parent.element == "namespace" && frame.is_enumerated() => {
            Some(DocTarget::Type(frame.name.clone()?))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GIR: &str = r#"<?xml version="1.0"?>
<repository version="1.2" xmlns="http://www.gtk.org/introspection/core/1.0"
            xmlns:c="http://www.gtk.org/introspection/c/1.0"
            xmlns:glib="http://www.gtk.org/introspection/glib/1.0">
  <namespace name="Vips" version="8.0">
    <enumeration name="Access" glib:type-name="VipsAccess">
      <doc xml:space="preserve">The type of access an operation has to supply.
See vips_tilecache().</doc>
      <member name="random" value="0" c:identifier="VIPS_ACCESS_RANDOM">
        <doc xml:space="preserve">can read anywhere</doc>
      </member>
      <member name="sequential" value="1" c:identifier="VIPS_ACCESS_SEQUENTIAL">
      </member>
      <function name="get_type"><doc xml:space="preserve">not a member doc</doc></function>
    </enumeration>
    <bitfield name="ForeignPngFilter" glib:type-name="VipsForeignPngFilter">
      <member name="none" value="8"><doc xml:space="preserve">no filtering &amp; &lt;nothing&gt; &#x41;</doc></member>
    </bitfield>
    <class name="Image">
      <doc xml:space="preserve">class docs are ignored</doc>
    </class>
    <enumeration name="Undocumented"/>
  </namespace>
</repository>"#;

    #[test]
    fn test_type_docs() {
        let docs = parse_metadata(GIR).expect("Failed to parse metadata");

        assert_eq!(
            docs.type_doc("Access"),
            Some("The type of access an operation has to supply.\nSee vips_tilecache().")
        );
        assert_eq!(docs.type_doc("Image"), None);
        assert!(docs.contains_type("Undocumented"));
        assert_eq!(docs.type_doc("Undocumented"), None);
        assert!(docs.contains_type("ForeignPngFilter"));
        assert!(!docs.contains_type("Image"));
    }

    #[test]
    fn test_member_docs() {
        let docs = parse_metadata(GIR).expect("Failed to parse metadata");

        assert_eq!(docs.member_doc("Access", "random"), Some("can read anywhere"));
        assert_eq!(docs.member_doc("Access", "sequential"), None);
        assert_eq!(docs.member_doc("Access", "get_type"), None);
        assert_eq!(docs.member_doc("Missing", "random"), None);
    }

    #[test]
    fn test_entities_are_resolved() {
        let docs = parse_metadata(GIR).expect("Failed to parse metadata");

        assert_eq!(
            docs.member_doc("ForeignPngFilter", "none"),
            Some("no filtering & <nothing> A")
        );
    }

    #[test]
    fn test_char_refs_and_unknown_entities() {
        let gir = r#"<repository><namespace name="Vips">
  <enumeration name="Kernel"><doc>&#65; &quot;cubic&quot; &nbsp;kernel</doc></enumeration>
</namespace></repository>"#;
        let docs = parse_metadata(gir).expect("Failed to parse metadata");

        assert_eq!(docs.type_doc("Kernel"), Some("A \"cubic\" &nbsp;kernel"));
    }

    #[test]
    fn test_empty_document() {
        let docs = parse_metadata("<repository/>").expect("Failed to parse metadata");
        assert!(!docs.contains_type("Access"));
        assert_eq!(docs.type_doc("Access"), None);
    }

    #[test]
    fn test_malformed_document() {
        assert!(parse_metadata("<repository><namespace></repository>").is_err());
    }
}
