//! Registry snapshot parser.
//!
//! This module parses the XML snapshot of a native type registry into a
//! [`RegistrySnapshot`]. The snapshot carries the type hierarchy, every
//! operation with its arguments, the enumerated and flags types, and the
//! image header fields.

use crate::error::ParseError;
use crate::operations::{ArgumentDef, ArgumentFlags, OperationDef};
use crate::types::{EnumDef, EnumKind, RegistrySnapshot, TypeNode};
use quick_xml::Reader;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};

/// Parses a registry snapshot from a string.
///
/// # Arguments
/// * `xml` - Snapshot document content
///
/// # Returns
/// Parsed snapshot or parse error.
///
/// # Errors
/// Returns `ParseError` if the XML is malformed, a required attribute is
/// missing, or an attribute value cannot be interpreted.
pub fn parse_snapshot(xml: &str) -> Result<RegistrySnapshot, ParseError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut snapshot: Option<RegistrySnapshot> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let name_bytes = e.name().as_ref().to_vec();
                let name = std::str::from_utf8(&name_bytes)?;
                match name {
                    "registry" => snapshot = Some(parse_registry(e)?),
                    "hierarchy" => parse_hierarchy(&mut reader, require(&mut snapshot)?)?,
                    "operations" => parse_operations(&mut reader, require(&mut snapshot)?)?,
                    "enums" => parse_enums(&mut reader, require(&mut snapshot)?)?,
                    "properties" => parse_properties(&mut reader, require(&mut snapshot)?)?,
                    _ => {}
                }
            }
            Ok(Event::Empty(ref e)) => {
                if e.name().as_ref() == b"registry" {
                    snapshot = Some(parse_registry(e)?);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    snapshot.ok_or_else(|| ParseError::structure("No registry element found"))
}

fn require(snapshot: &mut Option<RegistrySnapshot>) -> Result<&mut RegistrySnapshot, ParseError> {
    snapshot
        .as_mut()
        .ok_or_else(|| ParseError::structure("section found outside the registry element"))
}

/// Decodes and unescapes an attribute value.
fn attr_text(raw: &[u8]) -> Result<String, ParseError> {
    let value = std::str::from_utf8(raw)?;
    Ok(unescape(value)?.into_owned())
}

fn parse_bool(element: &str, attribute: &str, value: &str) -> Result<bool, ParseError> {
    match value {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(ParseError::invalid_attr(element, attribute, value)),
    }
}

/// Parses the registry element attributes.
fn parse_registry(e: &BytesStart<'_>) -> Result<RegistrySnapshot, ParseError> {
    let mut library = String::new();
    let mut version = String::new();

    for attr in e.attributes().flatten() {
        let key = std::str::from_utf8(attr.key.as_ref())?;
        match key {
            "library" => library = attr_text(&attr.value)?,
            "version" => version = attr_text(&attr.value)?,
            _ => {}
        }
    }

    Ok(RegistrySnapshot::new(library, version))
}

/// Parses the hierarchy section.
fn parse_hierarchy(
    reader: &mut Reader<&[u8]>,
    snapshot: &mut RegistrySnapshot,
) -> Result<(), ParseError> {
    let mut buf = Vec::new();
    let mut depth = 0;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                if e.name().as_ref() == b"type" {
                    // parse_type_node consumes the end tag
                    snapshot.add_root(parse_type_node(reader, e)?);
                } else {
                    depth += 1;
                }
            }
            Ok(Event::Empty(ref e)) => {
                if e.name().as_ref() == b"type" {
                    snapshot.add_root(parse_type_attrs(e)?);
                }
            }
            Ok(Event::End(_)) => {
                if depth == 0 {
                    break;
                }
                depth -= 1;
            }
            Ok(Event::Eof) => return Err(ParseError::structure("unterminated hierarchy")),
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(())
}

/// Parses a type node with children, recursively.
fn parse_type_node(reader: &mut Reader<&[u8]>, e: &BytesStart<'_>) -> Result<TypeNode, ParseError> {
    let mut node = parse_type_attrs(e)?;
    let mut buf = Vec::new();
    let mut depth = 0;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                if e.name().as_ref() == b"type" {
                    node.add_child(parse_type_node(reader, e)?);
                } else {
                    depth += 1;
                }
            }
            Ok(Event::Empty(ref e)) => {
                if e.name().as_ref() == b"type" {
                    node.add_child(parse_type_attrs(e)?);
                }
            }
            Ok(Event::End(_)) => {
                if depth == 0 {
                    break;
                }
                depth -= 1;
            }
            Ok(Event::Eof) => {
                return Err(ParseError::structure(format!(
                    "unterminated type '{}'",
                    node.name
                )));
            }
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(node)
}

/// Parses the attributes of a type element.
fn parse_type_attrs(e: &BytesStart<'_>) -> Result<TypeNode, ParseError> {
    let mut name = None;
    let mut nickname = None;
    let mut is_abstract = false;

    for attr in e.attributes().flatten() {
        let key = std::str::from_utf8(attr.key.as_ref())?;
        let value = attr_text(&attr.value)?;

        match key {
            "name" => name = Some(value),
            "nickname" => nickname = Some(value),
            "abstract" => is_abstract = parse_bool("type", "abstract", &value)?,
            _ => {}
        }
    }

    let mut node = TypeNode::new(name.ok_or_else(|| ParseError::missing_attr("type", "name"))?);
    node.nickname = nickname;
    node.is_abstract = is_abstract;

    Ok(node)
}

/// Parses the operations section.
fn parse_operations(
    reader: &mut Reader<&[u8]>,
    snapshot: &mut RegistrySnapshot,
) -> Result<(), ParseError> {
    let mut buf = Vec::new();
    let mut depth = 0;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                if e.name().as_ref() == b"operation" {
                    snapshot.add_operation(parse_operation(reader, e)?);
                } else {
                    depth += 1;
                }
            }
            Ok(Event::Empty(ref e)) => {
                if e.name().as_ref() == b"operation" {
                    snapshot.add_operation(parse_operation_attrs(e)?);
                }
            }
            Ok(Event::End(_)) => {
                if depth == 0 {
                    break;
                }
                depth -= 1;
            }
            Ok(Event::Eof) => return Err(ParseError::structure("unterminated operations")),
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(())
}

/// Parses an operation element and its arguments.
fn parse_operation(
    reader: &mut Reader<&[u8]>,
    e: &BytesStart<'_>,
) -> Result<OperationDef, ParseError> {
    let mut operation = parse_operation_attrs(e)?;
    let mut buf = Vec::new();
    let mut depth = 0;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                if e.name().as_ref() == b"argument" {
                    operation.add_argument(parse_argument(e)?);
                }
                depth += 1;
            }
            Ok(Event::Empty(ref e)) => {
                if e.name().as_ref() == b"argument" {
                    operation.add_argument(parse_argument(e)?);
                }
            }
            Ok(Event::End(_)) => {
                if depth == 0 {
                    break;
                }
                depth -= 1;
            }
            Ok(Event::Eof) => {
                return Err(ParseError::structure(format!(
                    "unterminated operation '{}'",
                    operation.name
                )));
            }
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(operation)
}

/// Parses the attributes of an operation element.
fn parse_operation_attrs(e: &BytesStart<'_>) -> Result<OperationDef, ParseError> {
    let mut name = None;
    let mut description = String::new();
    let mut deprecated = false;

    for attr in e.attributes().flatten() {
        let key = std::str::from_utf8(attr.key.as_ref())?;
        let value = attr_text(&attr.value)?;

        match key {
            "name" => name = Some(value),
            "description" => description = value,
            "deprecated" => deprecated = parse_bool("operation", "deprecated", &value)?,
            _ => {}
        }
    }

    let mut operation =
        OperationDef::new(name.ok_or_else(|| ParseError::missing_attr("operation", "name"))?);
    operation.description = description;
    operation.deprecated = deprecated;

    Ok(operation)
}

/// Parses an argument element.
fn parse_argument(e: &BytesStart<'_>) -> Result<ArgumentDef, ParseError> {
    let mut name = None;
    let mut type_name = String::new();
    let mut flags = ArgumentFlags::empty();
    let mut blurb = String::new();

    for attr in e.attributes().flatten() {
        let key = std::str::from_utf8(attr.key.as_ref())?;
        let value = attr_text(&attr.value)?;

        match key {
            "name" => name = Some(value),
            "type" => type_name = value,
            "flags" => {
                flags = ArgumentFlags::parse(&value)
                    .map_err(|token| ParseError::invalid_attr("argument", "flags", token))?
            }
            "blurb" => blurb = value,
            _ => {}
        }
    }

    let mut argument = ArgumentDef::new(
        name.ok_or_else(|| ParseError::missing_attr("argument", "name"))?,
        type_name,
        flags,
    );
    argument.blurb = blurb;

    Ok(argument)
}

/// Parses the enums section.
fn parse_enums(
    reader: &mut Reader<&[u8]>,
    snapshot: &mut RegistrySnapshot,
) -> Result<(), ParseError> {
    let mut buf = Vec::new();
    let mut depth = 0;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match enum_kind(e) {
                Some(kind) => snapshot.add_enum(parse_enum(reader, e, kind)?),
                None => depth += 1,
            },
            Ok(Event::Empty(ref e)) => {
                if let Some(kind) = enum_kind(e) {
                    snapshot.add_enum(EnumDef::new(enum_name(e, kind)?, kind));
                }
            }
            Ok(Event::End(_)) => {
                if depth == 0 {
                    break;
                }
                depth -= 1;
            }
            Ok(Event::Eof) => return Err(ParseError::structure("unterminated enums")),
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(())
}

fn enum_kind(e: &BytesStart<'_>) -> Option<EnumKind> {
    match e.name().as_ref() {
        b"enum" => Some(EnumKind::Enum),
        b"flags" => Some(EnumKind::Flags),
        _ => None,
    }
}

fn enum_name(e: &BytesStart<'_>, kind: EnumKind) -> Result<String, ParseError> {
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() == b"name" {
            return attr_text(&attr.value);
        }
    }
    Err(ParseError::missing_attr(kind.element_name(), "name"))
}

/// Parses an enum or flags element with its values.
fn parse_enum(
    reader: &mut Reader<&[u8]>,
    e: &BytesStart<'_>,
    kind: EnumKind,
) -> Result<EnumDef, ParseError> {
    let mut enum_def = EnumDef::new(enum_name(e, kind)?, kind);
    let mut buf = Vec::new();
    let mut depth = 0;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                if e.name().as_ref() == b"value" {
                    enum_def.add_value(parse_value_nick(e)?);
                }
                depth += 1;
            }
            Ok(Event::Empty(ref e)) => {
                if e.name().as_ref() == b"value" {
                    enum_def.add_value(parse_value_nick(e)?);
                }
            }
            Ok(Event::End(_)) => {
                if depth == 0 {
                    break;
                }
                depth -= 1;
            }
            Ok(Event::Eof) => {
                return Err(ParseError::structure(format!(
                    "unterminated {} '{}'",
                    kind.element_name(),
                    enum_def.name
                )));
            }
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(enum_def)
}

fn parse_value_nick(e: &BytesStart<'_>) -> Result<String, ParseError> {
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() == b"nick" {
            return attr_text(&attr.value);
        }
    }
    Err(ParseError::missing_attr("value", "nick"))
}

/// Parses the properties section.
fn parse_properties(
    reader: &mut Reader<&[u8]>,
    snapshot: &mut RegistrySnapshot,
) -> Result<(), ParseError> {
    let mut buf = Vec::new();
    let mut depth = 0;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                if e.name().as_ref() == b"property" {
                    snapshot.add_property(parse_property_name(e)?);
                }
                depth += 1;
            }
            Ok(Event::Empty(ref e)) => {
                if e.name().as_ref() == b"property" {
                    snapshot.add_property(parse_property_name(e)?);
                }
            }
            Ok(Event::End(_)) => {
                if depth == 0 {
                    break;
                }
                depth -= 1;
            }
            Ok(Event::Eof) => return Err(ParseError::structure("unterminated properties")),
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(())
}

fn parse_property_name(e: &BytesStart<'_>) -> Result<String, ParseError> {
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() == b"name" {
            return attr_text(&attr.value);
        }
    }
    Err(ParseError::missing_attr("property", "name"))
}
