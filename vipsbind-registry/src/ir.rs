//! Intermediate representation for code generation.
//!
//! This module provides the classified, resolved view of operations and
//! enumerated types that the emitters consume. Descriptors are built fresh
//! from a registry for each generation run and never mutated afterwards.

use crate::metadata::MetadataDocs;
use crate::types::{EnumDef, EnumKind};

/// Category of a value flowing through an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ValueKind {
    /// `gboolean`.
    Boolean,
    /// `gint`.
    Int,
    /// `guint64`.
    UInt64,
    /// `gdouble`.
    Double,
    /// `gchararray`.
    String,
    /// Reference-counted string.
    RefString,
    /// Any enumerated type.
    Enum,
    /// Any flags type.
    Flags,
    /// Image.
    Image,
    /// Array of integers.
    ArrayInt,
    /// Array of doubles.
    ArrayDouble,
    /// Array of images.
    ArrayImage,
    /// Binary blob.
    Blob,
    /// Source handle.
    Source,
    /// Target handle.
    Target,
    /// Interpolator.
    Interpolate,
}

impl ValueKind {
    /// Every kind, in table order.
    pub const ALL: [Self; 16] = [
        Self::Boolean,
        Self::Int,
        Self::UInt64,
        Self::Double,
        Self::String,
        Self::RefString,
        Self::Enum,
        Self::Flags,
        Self::Image,
        Self::ArrayInt,
        Self::ArrayDouble,
        Self::ArrayImage,
        Self::Blob,
        Self::Source,
        Self::Target,
        Self::Interpolate,
    ];

    /// Returns the canonical registry type name.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Boolean => "gboolean",
            Self::Int => "gint",
            Self::UInt64 => "guint64",
            Self::Double => "gdouble",
            Self::String => "gchararray",
            Self::RefString => "VipsRefString",
            Self::Enum => "GEnum",
            Self::Flags => "GFlags",
            Self::Image => "VipsImage",
            Self::ArrayInt => "VipsArrayInt",
            Self::ArrayDouble => "VipsArrayDouble",
            Self::ArrayImage => "VipsArrayImage",
            Self::Blob => "VipsBlob",
            Self::Source => "VipsSource",
            Self::Target => "VipsTarget",
            Self::Interpolate => "VipsInterpolate",
        }
    }

    /// Resolves a canonical registry type name.
    #[must_use]
    pub fn from_type_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.type_name() == name)
    }
}

/// Registry type of a value together with its fundamental type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeRef {
    /// Exact registry type name (e.g. `VipsAccess`).
    pub name: String,
    /// Root of the type's hierarchy (e.g. `GEnum`).
    pub fundamental: String,
}

impl TypeRef {
    /// Creates a new type reference.
    #[must_use]
    pub fn new(name: impl Into<String>, fundamental: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fundamental: fundamental.into(),
        }
    }

    /// Creates a reference to a canonical kind.
    #[must_use]
    pub fn of_kind(kind: ValueKind) -> Self {
        Self::new(kind.type_name(), kind.type_name())
    }

    /// Resolves the value kind: exact name first, then the fundamental.
    #[must_use]
    pub fn kind(&self) -> Option<ValueKind> {
        ValueKind::from_type_name(&self.name).or_else(|| ValueKind::from_type_name(&self.fundamental))
    }

    /// Returns true if the exact type is the given kind's canonical type.
    #[must_use]
    pub fn is_exactly(&self, kind: ValueKind) -> bool {
        self.name == kind.type_name()
    }
}

/// Direction a value flows in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Into the operation.
    Input,
    /// Out of the operation.
    Output,
}

/// Classified operation argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentDescriptor {
    /// Name in registry form (may contain hyphens).
    pub name: String,
    /// Value type.
    pub type_ref: TypeRef,
    /// Whether the operation mandates the argument.
    pub required: bool,
    /// Value direction.
    pub direction: Direction,
    /// Short human-readable description.
    pub blurb: String,
    /// Whether the argument is deprecated.
    pub deprecated: bool,
}

impl ArgumentDescriptor {
    /// Creates a non-deprecated argument with an empty blurb.
    #[must_use]
    pub fn new(name: impl Into<String>, type_ref: TypeRef, required: bool, direction: Direction) -> Self {
        Self {
            name: name.into(),
            type_ref,
            required,
            direction,
            blurb: String::new(),
            deprecated: false,
        }
    }

    /// Returns the resolved value kind, if any.
    #[must_use]
    pub fn kind(&self) -> Option<ValueKind> {
        self.type_ref.kind()
    }

    /// Returns true if the value is a binary blob.
    #[must_use]
    pub fn is_blob(&self) -> bool {
        self.type_ref.is_exactly(ValueKind::Blob)
    }
}

/// Structured signature of one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationDescriptor {
    /// Operation nickname.
    pub name: String,
    /// One-line description.
    pub description: String,
    /// Whether the operation is deprecated.
    pub deprecated: bool,
    /// Receiver argument, present for instance methods.
    pub receiver: Option<ArgumentDescriptor>,
    /// Required inputs, receiver excluded.
    pub required_input: Vec<ArgumentDescriptor>,
    /// Required outputs, receiver excluded.
    pub required_output: Vec<ArgumentDescriptor>,
    /// Optional inputs, deprecated entries included.
    pub optional_input: Vec<ArgumentDescriptor>,
    /// Optional outputs, deprecated entries included.
    pub optional_output: Vec<ArgumentDescriptor>,
}

impl OperationDescriptor {
    /// Creates an empty static descriptor.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            deprecated: false,
            receiver: None,
            required_input: Vec::new(),
            required_output: Vec::new(),
            optional_input: Vec::new(),
            optional_output: Vec::new(),
        }
    }

    /// Returns true if the operation has a receiver.
    #[must_use]
    pub fn is_instance_method(&self) -> bool {
        self.receiver.is_some()
    }

    /// Returns true if the operation has no required outputs.
    #[must_use]
    pub fn is_void(&self) -> bool {
        self.required_output.is_empty()
    }

    /// Returns the output used as return value.
    #[must_use]
    pub fn return_value(&self) -> Option<&ArgumentDescriptor> {
        self.required_output.first()
    }

    /// Returns the remaining required outputs, passed as out-parameters.
    #[must_use]
    pub fn out_params(&self) -> &[ArgumentDescriptor] {
        self.required_output.get(1..).unwrap_or(&[])
    }

    /// Returns true if an options aggregate is accepted.
    #[must_use]
    pub fn has_options(&self) -> bool {
        !self.optional_input.is_empty() || !self.optional_output.is_empty()
    }

    /// Optional inputs worth documenting.
    pub fn documented_optional_input(&self) -> impl Iterator<Item = &ArgumentDescriptor> {
        self.optional_input.iter().filter(|arg| !arg.deprecated)
    }

    /// Optional outputs worth documenting.
    pub fn documented_optional_output(&self) -> impl Iterator<Item = &ArgumentDescriptor> {
        self.optional_output.iter().filter(|arg| !arg.deprecated)
    }

    /// Returns true if any documented optional argument exists.
    #[must_use]
    pub fn has_documented_options(&self) -> bool {
        self.documented_optional_input().next().is_some()
            || self.documented_optional_output().next().is_some()
    }
}

/// One value of an enumerated type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValueDescriptor {
    /// Value nick in registry form (may contain hyphens).
    pub nick: String,
    /// Documentation text, if the metadata has any.
    pub doc: Option<String>,
}

/// Enumerated or flags type ready for emission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDescriptor {
    /// Type name in registry form (e.g. `VipsAccess`).
    pub name: String,
    /// Enum or flags.
    pub kind: EnumKind,
    /// Type-level documentation.
    pub doc: Option<String>,
    /// Values in declaration order.
    pub values: Vec<EnumValueDescriptor>,
}

impl EnumDescriptor {
    /// Creates an undocumented descriptor from a registry definition.
    #[must_use]
    pub fn from_def(def: &EnumDef) -> Self {
        Self {
            name: def.name.clone(),
            kind: def.kind,
            doc: None,
            values: def
                .values
                .iter()
                .map(|nick| EnumValueDescriptor {
                    nick: nick.clone(),
                    doc: None,
                })
                .collect(),
        }
    }

    /// Attaches documentation from the metadata document.
    ///
    /// Types and members are looked up by their unprefixed name; members are
    /// keyed by the nick with hyphens replaced by underscores.
    #[must_use]
    pub fn with_docs(mut self, docs: &MetadataDocs, prefix: &str) -> Self {
        let short = self.name.strip_prefix(prefix).unwrap_or(&self.name).to_string();
        self.doc = docs.type_doc(&short).map(str::to_string);
        for value in &mut self.values {
            let member = value.nick.replace('-', "_");
            value.doc = docs.member_doc(&short, &member).map(str::to_string);
        }
        self
    }
}
