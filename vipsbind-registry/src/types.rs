//! Registry snapshot type definitions.
//!
//! This module contains the data structures representing a captured native
//! type registry: the type hierarchy, operation definitions, enumerated and
//! flag types, and the image header fields.

use crate::operations::OperationDef;
use std::collections::{HashMap, HashSet};

/// Complete registry snapshot.
#[derive(Debug, Clone, Default)]
pub struct RegistrySnapshot {
    /// Name of the library the snapshot was captured from.
    pub library: String,
    /// Library version string.
    pub version: String,
    /// Root nodes of the type hierarchy.
    pub roots: Vec<TypeNode>,
    /// Operation definitions.
    pub operations: Vec<OperationDef>,
    /// Enum and flags definitions.
    pub enums: Vec<EnumDef>,
    /// Image header fields exposed as properties.
    pub properties: Vec<String>,
    /// Lookup maps (built while nodes are added).
    index: TypeIndex,
}

/// Lookup maps derived from the hierarchy and definition lists.
#[derive(Debug, Clone, Default)]
struct TypeIndex {
    children: HashMap<String, Vec<String>>,
    fundamentals: HashMap<String, String>,
    nicknames: HashMap<String, String>,
    abstract_nicknames: HashSet<String>,
    operations: HashMap<String, usize>,
    enums: HashMap<String, usize>,
}

impl RegistrySnapshot {
    /// Creates a new empty snapshot.
    #[must_use]
    pub fn new(library: String, version: String) -> Self {
        Self {
            library,
            version,
            ..Self::default()
        }
    }

    /// Adds a root of the type hierarchy.
    pub fn add_root(&mut self, node: TypeNode) {
        let root = node.name.clone();
        self.index_node(&node, &root);
        self.roots.push(node);
    }

    /// Adds an operation definition.
    pub fn add_operation(&mut self, operation: OperationDef) {
        let index = self.operations.len();
        self.index.operations.insert(operation.name.clone(), index);
        self.operations.push(operation);
    }

    /// Adds an enum or flags definition.
    pub fn add_enum(&mut self, enum_def: EnumDef) {
        let index = self.enums.len();
        self.index.enums.insert(enum_def.name.clone(), index);
        self.enums.push(enum_def);
    }

    /// Adds an image header field.
    pub fn add_property(&mut self, name: String) {
        self.properties.push(name);
    }

    /// Looks up an operation by nickname.
    #[must_use]
    pub fn get_operation(&self, name: &str) -> Option<&OperationDef> {
        self.index
            .operations
            .get(name)
            .map(|&idx| &self.operations[idx])
    }

    /// Looks up an enum or flags type by name.
    #[must_use]
    pub fn get_enum(&self, name: &str) -> Option<&EnumDef> {
        self.index.enums.get(name).map(|&idx| &self.enums[idx])
    }

    /// Returns the direct children of a type, in declaration order.
    #[must_use]
    pub fn children_of(&self, type_name: &str) -> &[String] {
        self.index
            .children
            .get(type_name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Returns the nickname of a type, if it has one.
    #[must_use]
    pub fn nickname_of(&self, type_name: &str) -> Option<&str> {
        self.index.nicknames.get(type_name).map(String::as_str)
    }

    /// Returns the root of the hierarchy the type belongs to.
    ///
    /// Types outside the hierarchy are their own fundamental.
    #[must_use]
    pub fn fundamental_of<'a>(&'a self, type_name: &'a str) -> &'a str {
        self.index
            .fundamentals
            .get(type_name)
            .map_or(type_name, String::as_str)
    }

    /// Returns true if the nickname belongs to an abstract type.
    #[must_use]
    pub fn is_abstract_nickname(&self, nickname: &str) -> bool {
        self.index.abstract_nicknames.contains(nickname)
    }

    fn index_node(&mut self, node: &TypeNode, root: &str) {
        self.index
            .fundamentals
            .entry(node.name.clone())
            .or_insert_with(|| root.to_string());
        if let Some(nickname) = &node.nickname {
            self.index
                .nicknames
                .entry(node.name.clone())
                .or_insert_with(|| nickname.clone());
            if node.is_abstract {
                self.index.abstract_nicknames.insert(nickname.clone());
            }
        }

        for child in &node.children {
            let siblings = self.index.children.entry(node.name.clone()).or_default();
            if !siblings.contains(&child.name) {
                siblings.push(child.name.clone());
            }
            self.index_node(child, root);
        }
    }
}

/// One node of the type hierarchy.
#[derive(Debug, Clone)]
pub struct TypeNode {
    /// Full type name (e.g. `VipsForeignLoadJpegFile`).
    pub name: String,
    /// Short name used to call the type as an operation (e.g. `jpegload`).
    pub nickname: Option<String>,
    /// Whether the type is abstract.
    pub is_abstract: bool,
    /// Direct subtypes.
    pub children: Vec<TypeNode>,
}

impl TypeNode {
    /// Creates a new concrete node without children.
    #[must_use]
    pub fn new(name: String) -> Self {
        Self {
            name,
            nickname: None,
            is_abstract: false,
            children: Vec::new(),
        }
    }

    /// Adds a subtype.
    pub fn add_child(&mut self, child: TypeNode) {
        self.children.push(child);
    }
}

/// Whether an enumerated type is an exclusive choice or a bitfield.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnumKind {
    /// Exclusive choice.
    Enum,
    /// Bitfield.
    Flags,
}

impl EnumKind {
    /// Returns the snapshot element name for this kind.
    #[must_use]
    pub const fn element_name(&self) -> &'static str {
        match self {
            Self::Enum => "enum",
            Self::Flags => "flags",
        }
    }
}

/// Enum or flags definition.
#[derive(Debug, Clone)]
pub struct EnumDef {
    /// Type name (prefixed, e.g. `VipsAccess`).
    pub name: String,
    /// Enum or flags.
    pub kind: EnumKind,
    /// Value nicks in declaration order.
    pub values: Vec<String>,
}

impl EnumDef {
    /// Creates a new enum definition.
    #[must_use]
    pub fn new(name: String, kind: EnumKind) -> Self {
        Self {
            name,
            kind,
            values: Vec::new(),
        }
    }

    /// Adds a value nick.
    pub fn add_value(&mut self, nick: String) {
        self.values.push(nick);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(name: &str, nickname: Option<&str>, is_abstract: bool) -> TypeNode {
        let mut node = TypeNode::new(name.to_string());
        node.nickname = nickname.map(str::to_string);
        node.is_abstract = is_abstract;
        node
    }

    #[test]
    fn test_hierarchy_index() {
        let mut root = node("VipsOperation", Some("operation"), true);
        let mut arithmetic = node("VipsArithmetic", Some("arithmetic"), true);
        arithmetic.add_child(node("VipsAdd", Some("add"), false));
        root.add_child(arithmetic);
        root.add_child(node("VipsCopy", Some("copy"), false));

        let mut snapshot = RegistrySnapshot::new("vips".to_string(), "8.16".to_string());
        snapshot.add_root(root);

        assert_eq!(snapshot.children_of("VipsOperation"), ["VipsArithmetic", "VipsCopy"]);
        assert!(snapshot.children_of("VipsAdd").is_empty());
        assert_eq!(snapshot.nickname_of("VipsAdd"), Some("add"));
        assert_eq!(snapshot.fundamental_of("VipsAdd"), "VipsOperation");
        assert_eq!(snapshot.fundamental_of("gint"), "gint");
        assert!(snapshot.is_abstract_nickname("arithmetic"));
        assert!(!snapshot.is_abstract_nickname("add"));
    }

    #[test]
    fn test_type_under_two_parents() {
        let mut root = node("GObject", None, true);
        let mut left = node("Left", None, true);
        let mut right = node("Right", None, true);
        left.add_child(node("Shared", None, false));
        right.add_child(node("Shared", None, false));
        root.add_child(left);
        root.add_child(right);

        let mut snapshot = RegistrySnapshot::default();
        snapshot.add_root(root);

        assert_eq!(snapshot.children_of("Left"), ["Shared"]);
        assert_eq!(snapshot.children_of("Right"), ["Shared"]);
        assert_eq!(snapshot.fundamental_of("Shared"), "GObject");
    }

    #[test]
    fn test_enum_lookup() {
        let mut snapshot = RegistrySnapshot::default();
        let mut access = EnumDef::new("VipsAccess".to_string(), EnumKind::Enum);
        access.add_value("random".to_string());
        snapshot.add_enum(access);

        let found = snapshot.get_enum("VipsAccess").expect("enum registered");
        assert_eq!(found.values, ["random"]);
        assert!(snapshot.get_enum("VipsMissing").is_none());
    }
}
