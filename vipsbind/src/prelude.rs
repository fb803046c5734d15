//! Prelude module for convenient imports.
//!
//! ```ignore
//! use vipsbind::prelude::*;
//! ```

// Registry types
pub use vipsbind_registry::{
    ArgumentDescriptor, Direction, EnumDescriptor, EnumKind, EnumValueDescriptor, Introspector,
    MetadataDocs, OperationDescriptor, RegistryError, RegistrySnapshot, RegistryWalker,
    TypeRef, TypeRegistry, ValueKind, WalkOptions, WalkedOperation, parse_metadata,
    parse_snapshot, validate_snapshot,
};

// Generation
pub use vipsbind_codegen::config::{EnumConfig, SkipConfig, TypeScriptConfig};
pub use vipsbind_codegen::{
    CodegenError, GeneratedFiles, Generator, GeneratorConfig, Language, Position, TypeMapper,
    generate_from_files, generate_from_xml,
};
