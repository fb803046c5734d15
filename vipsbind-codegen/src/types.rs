//! Value type mapping.
//!
//! One lookup table per (language, position) pair, keyed by registry type
//! name. A lookup tries the exact type first and then its fundamental type;
//! a miss is an error, never a placeholder.

use crate::error::CodegenError;
use std::collections::HashMap;
use std::fmt;
use vipsbind_registry::{EnumKind, TypeRef, ValueKind};

/// Output language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    /// C++ bound through embind.
    Cpp,
    /// TypeScript declarations.
    TypeScript,
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Cpp => "C++",
            Self::TypeScript => "TypeScript",
        })
    }
}

/// Where a type appears in a signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    /// Function parameter.
    Parameter,
    /// Return value or output.
    Return,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Parameter => "parameter",
            Self::Return => "return",
        })
    }
}

fn cpp_param(kind: ValueKind) -> &'static str {
    match kind {
        ValueKind::Boolean => "bool",
        ValueKind::Int => "int",
        ValueKind::UInt64 => "uint64_t",
        ValueKind::Double => "double",
        ValueKind::String | ValueKind::RefString | ValueKind::Blob => "const std::string &",
        ValueKind::Flags => "int",
        ValueKind::Enum | ValueKind::Image | ValueKind::ArrayImage => "emscripten::val",
        ValueKind::ArrayInt => "const std::vector<int> &",
        ValueKind::ArrayDouble => "const std::vector<double> &",
        ValueKind::Source => "const Source &",
        ValueKind::Target => "const Target &",
        ValueKind::Interpolate => "const Interpolate &",
    }
}

fn cpp_return(kind: ValueKind) -> &'static str {
    match kind {
        ValueKind::Boolean => "bool",
        ValueKind::Int | ValueKind::Enum | ValueKind::Flags => "int",
        ValueKind::UInt64 => "uint64_t",
        ValueKind::Double => "double",
        ValueKind::String | ValueKind::RefString => "std::string",
        ValueKind::Image => "Image",
        ValueKind::ArrayInt => "std::vector<int>",
        ValueKind::ArrayDouble => "std::vector<double>",
        ValueKind::ArrayImage => "std::vector<Image>",
        ValueKind::Blob => "emscripten::val",
        ValueKind::Source => "Source",
        ValueKind::Target => "Target",
        ValueKind::Interpolate => "Interpolate",
    }
}

fn ts_param(kind: ValueKind) -> &'static str {
    match kind {
        ValueKind::Boolean => "boolean",
        ValueKind::Int | ValueKind::UInt64 | ValueKind::Double => "number",
        ValueKind::String | ValueKind::RefString => "string",
        ValueKind::Enum => "Enum",
        ValueKind::Flags => "Flag",
        // images also accept a constant
        ValueKind::Image => "Image | ArrayConstant",
        ValueKind::ArrayImage => "ArrayImage | ArrayConstant",
        ValueKind::ArrayInt | ValueKind::ArrayDouble => "ArrayConstant",
        ValueKind::Blob => "Blob",
        ValueKind::Source => "Source",
        ValueKind::Target => "Target",
        ValueKind::Interpolate => "Interpolate",
    }
}

fn ts_return(kind: ValueKind) -> &'static str {
    match kind {
        ValueKind::Boolean => "boolean",
        ValueKind::Int | ValueKind::UInt64 | ValueKind::Double | ValueKind::Flags => "number",
        ValueKind::String | ValueKind::RefString | ValueKind::Enum => "string",
        ValueKind::Image => "Image",
        ValueKind::ArrayInt | ValueKind::ArrayDouble => "number[]",
        ValueKind::ArrayImage => "Vector<Image>",
        ValueKind::Blob => "Uint8Array",
        ValueKind::Source => "Source",
        ValueKind::Target => "Target",
        ValueKind::Interpolate => "Interpolate",
    }
}

/// Maps registry types to target-language type names.
#[derive(Debug, Clone)]
pub struct TypeMapper {
    tables: HashMap<(Language, Position), HashMap<String, String>>,
}

impl Default for TypeMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeMapper {
    /// Creates a mapper holding the canonical entry of every value kind.
    #[must_use]
    pub fn new() -> Self {
        let builders: [(Language, Position, fn(ValueKind) -> &'static str); 4] = [
            (Language::Cpp, Position::Parameter, cpp_param),
            (Language::Cpp, Position::Return, cpp_return),
            (Language::TypeScript, Position::Parameter, ts_param),
            (Language::TypeScript, Position::Return, ts_return),
        ];

        let tables = builders
            .into_iter()
            .map(|(language, position, build)| {
                let table = ValueKind::ALL
                    .into_iter()
                    .map(|kind| (kind.type_name().to_string(), build(kind).to_string()))
                    .collect();
                ((language, position), table)
            })
            .collect();

        Self { tables }
    }

    /// Adds or replaces the entry for one registry type.
    pub fn insert(
        &mut self,
        language: Language,
        position: Position,
        type_name: impl Into<String>,
        target: impl Into<String>,
    ) {
        self.tables
            .entry((language, position))
            .or_default()
            .insert(type_name.into(), target.into());
    }

    /// Registers a named enum or flags type under its short name.
    ///
    /// TypeScript parameters accept the named type or its fallback; enum
    /// returns use the named type.
    pub fn register_enum(&mut self, type_name: &str, short_name: &str, kind: EnumKind) {
        let fallback = match kind {
            EnumKind::Enum => "Enum",
            EnumKind::Flags => "Flag",
        };
        self.insert(
            Language::TypeScript,
            Position::Parameter,
            type_name,
            format!("{short_name} | {fallback}"),
        );
        if kind == EnumKind::Enum {
            self.insert(Language::TypeScript, Position::Return, type_name, short_name);
        }
    }

    /// Maps a registry type.
    ///
    /// # Errors
    /// Returns `CodegenError::UnmappedValueKind` if neither the type nor its
    /// fundamental has an entry.
    pub fn map(
        &self,
        language: Language,
        position: Position,
        type_ref: &TypeRef,
    ) -> Result<&str, CodegenError> {
        let table = self.tables.get(&(language, position));
        table
            .and_then(|t| t.get(&type_ref.name).or_else(|| t.get(&type_ref.fundamental)))
            .map(String::as_str)
            .ok_or_else(|| CodegenError::UnmappedValueKind {
                type_name: type_ref.name.clone(),
                fundamental: type_ref.fundamental.clone(),
                language,
                position,
            })
    }

    /// Maps a C++ parameter type.
    ///
    /// # Errors
    /// Returns `CodegenError::UnmappedValueKind` on a table miss.
    pub fn cpp_param(&self, type_ref: &TypeRef) -> Result<&str, CodegenError> {
        self.map(Language::Cpp, Position::Parameter, type_ref)
    }

    /// Maps a C++ return type.
    ///
    /// # Errors
    /// Returns `CodegenError::UnmappedValueKind` on a table miss.
    pub fn cpp_return(&self, type_ref: &TypeRef) -> Result<&str, CodegenError> {
        self.map(Language::Cpp, Position::Return, type_ref)
    }

    /// Maps a TypeScript parameter type.
    ///
    /// # Errors
    /// Returns `CodegenError::UnmappedValueKind` on a table miss.
    pub fn ts_param(&self, type_ref: &TypeRef) -> Result<&str, CodegenError> {
        self.map(Language::TypeScript, Position::Parameter, type_ref)
    }

    /// Maps a TypeScript return type.
    ///
    /// # Errors
    /// Returns `CodegenError::UnmappedValueKind` on a table miss.
    pub fn ts_return(&self, type_ref: &TypeRef) -> Result<&str, CodegenError> {
        self.map(Language::TypeScript, Position::Return, type_ref)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_is_mapped() {
        let mapper = TypeMapper::new();
        for language in [Language::Cpp, Language::TypeScript] {
            for position in [Position::Parameter, Position::Return] {
                for kind in ValueKind::ALL {
                    assert!(
                        mapper.map(language, position, &TypeRef::of_kind(kind)).is_ok(),
                        "{language} {position} {kind:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_position_specific_tables() {
        let mapper = TypeMapper::new();
        let image = TypeRef::of_kind(ValueKind::Image);

        assert_eq!(mapper.cpp_param(&image).ok(), Some("emscripten::val"));
        assert_eq!(mapper.cpp_return(&image).ok(), Some("Image"));
        assert_eq!(mapper.ts_param(&image).ok(), Some("Image | ArrayConstant"));
        assert_eq!(mapper.ts_return(&image).ok(), Some("Image"));
    }

    #[test]
    fn test_fundamental_fallback() {
        let mapper = TypeMapper::new();
        let kernel = TypeRef::new("VipsKernel", "GEnum");

        assert_eq!(mapper.cpp_param(&kernel).ok(), Some("emscripten::val"));
        assert_eq!(mapper.ts_param(&kernel).ok(), Some("Enum"));
    }

    #[test]
    fn test_registered_enum_wins_over_fallback() {
        let mut mapper = TypeMapper::new();
        mapper.register_enum("VipsKernel", "Kernel", EnumKind::Enum);
        mapper.register_enum("VipsForeignPngFilter", "ForeignPngFilter", EnumKind::Flags);

        let kernel = TypeRef::new("VipsKernel", "GEnum");
        let filter = TypeRef::new("VipsForeignPngFilter", "GFlags");
        assert_eq!(mapper.ts_param(&kernel).ok(), Some("Kernel | Enum"));
        assert_eq!(mapper.ts_return(&kernel).ok(), Some("Kernel"));
        assert_eq!(mapper.ts_param(&filter).ok(), Some("ForeignPngFilter | Flag"));
        assert_eq!(mapper.ts_return(&filter).ok(), Some("number"));
        assert_eq!(mapper.cpp_param(&filter).ok(), Some("int"));
    }

    #[test]
    fn test_unmapped_type_is_an_error() {
        let mapper = TypeMapper::new();
        let region = TypeRef::new("VipsRegion", "GObject");

        let err = mapper.cpp_return(&region).unwrap_err();
        assert!(matches!(
            err,
            CodegenError::UnmappedValueKind { ref type_name, language: Language::Cpp, position: Position::Return, .. }
                if type_name == "VipsRegion"
        ));
        assert!(!err.to_string().contains("<unknown"));
    }
}
