//! # vipsbind registry
//!
//! libvips type-registry model, snapshot parser and operation introspection.
//!
//! This crate provides:
//! - XML snapshot parsing of the native type registry
//! - GObject-Introspection metadata parsing for enum documentation
//! - Snapshot validation
//! - Registry traversal and per-operation introspection into descriptors

pub mod error;
pub mod introspect;
pub mod ir;
pub mod metadata;
pub mod operations;
pub mod parser;
pub mod registry;
pub mod types;
pub mod validation;
pub mod walker;

pub use error::{ParseError, RegistryError};
pub use introspect::Introspector;
pub use ir::{
    ArgumentDescriptor, Direction, EnumDescriptor, EnumValueDescriptor, OperationDescriptor,
    TypeRef, ValueKind,
};
pub use metadata::{MetadataDocs, parse_metadata};
pub use operations::{ArgumentDef, ArgumentFlags, OperationDef};
pub use parser::parse_snapshot;
pub use registry::TypeRegistry;
pub use types::{EnumDef, EnumKind, RegistrySnapshot, TypeNode};
pub use validation::validate_snapshot;
pub use walker::{RegistryWalker, WalkOptions, WalkedOperation};
