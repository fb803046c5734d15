//! # vipsbind codegen
//!
//! Binding generation from a libvips registry snapshot.
//!
//! This crate provides:
//! - embind registrations for functions, enums and image properties
//! - C++ operator declarations and definitions
//! - TypeScript declarations with documented enums
//! - TOML configuration of every hand-maintained table

pub mod config;
pub mod cpp;
pub mod error;
pub mod generator;
pub mod names;
pub mod render;
pub mod types;
pub mod typescript;

pub use config::GeneratorConfig;
pub use error::CodegenError;
pub use generator::{GeneratedFiles, Generator};
pub use types::{Language, Position, TypeMapper};

use std::path::Path;

/// Generates every artifact from registry and metadata documents.
///
/// # Arguments
/// * `registry_xml` - Registry snapshot content
/// * `gir_xml` - GObject-Introspection document, if enum docs are wanted
/// * `preamble` - Hand-written text opening the TypeScript declarations
/// * `config` - Generator tables
///
/// # Errors
/// Returns `CodegenError` if parsing, validation or generation fails.
pub fn generate_from_xml(
    registry_xml: &str,
    gir_xml: Option<&str>,
    preamble: &str,
    config: &GeneratorConfig,
) -> Result<GeneratedFiles, CodegenError> {
    let snapshot = vipsbind_registry::parse_snapshot(registry_xml)?;
    vipsbind_registry::validate_snapshot(&snapshot)?;
    let docs = gir_xml.map(vipsbind_registry::parse_metadata).transpose()?;

    let mut generator = Generator::new(&snapshot, config).with_preamble(preamble);
    if let Some(docs) = &docs {
        generator = generator.with_docs(docs);
    }
    generator.generate()
}

/// Generates every artifact from files on disk.
///
/// # Errors
/// Returns `CodegenError` if reading, parsing or generation fails.
pub fn generate_from_files(
    registry: &Path,
    gir: Option<&Path>,
    preamble: Option<&Path>,
    config: &GeneratorConfig,
) -> Result<GeneratedFiles, CodegenError> {
    let registry_xml = std::fs::read_to_string(registry)?;
    let gir_xml = gir.map(std::fs::read_to_string).transpose()?;
    let preamble = preamble
        .map(std::fs::read_to_string)
        .transpose()?
        .unwrap_or_default();
    generate_from_xml(&registry_xml, gir_xml.as_deref(), &preamble, config)
}
