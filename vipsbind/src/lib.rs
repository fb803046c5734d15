//! # vipsbind
//!
//! Binding generator for libvips compiled to WebAssembly.
//!
//! vipsbind walks a snapshot of the libvips type registry, introspects every
//! operation and enumerated type, and emits the glue a WebAssembly build
//! needs: embind registrations, C++ operator wrappers and TypeScript
//! declarations.
//!
//! ## Quick Start
//!
//! ```ignore
//! use vipsbind::prelude::*;
//!
//! let config = GeneratorConfig::default();
//! let files = generate_from_xml(&registry_xml, Some(&gir_xml), "", &config)?;
//! files.write_to(Path::new("out"))?;
//! ```
//!
//! ## Crate Organization
//!
//! - [`registry`] - Registry snapshot parsing, validation, walking and introspection
//! - [`codegen`] - Type and name mapping, C++ and TypeScript emitters

pub mod prelude;

/// Registry model, traversal and operation introspection.
pub mod registry {
    pub use vipsbind_registry::*;
}

/// Binding and declaration generation.
pub mod codegen {
    pub use vipsbind_codegen::*;
}

// Re-export commonly used items at the crate root
pub use vipsbind_codegen::{
    CodegenError, GeneratedFiles, Generator, GeneratorConfig, generate_from_files,
    generate_from_xml,
};
pub use vipsbind_registry::{RegistryError, RegistrySnapshot, TypeRegistry};
