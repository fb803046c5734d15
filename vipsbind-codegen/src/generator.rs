//! Main code generator.
//!
//! Walks the registry once, introspects every operation and enumerated type
//! into descriptors, then runs each emitter over its own filtered view. Any
//! failure aborts the whole run; nothing is written until every text is
//! complete.

use crate::config::GeneratorConfig;
use crate::cpp::{BindingGenerator, EnumRegistrationGenerator, OperatorGenerator, PropertyGenerator};
use crate::error::CodegenError;
use crate::names::remove_prefix;
use crate::types::TypeMapper;
use crate::typescript::{DeclarationGenerator, TsEnumGenerator};
use std::path::Path;
use tracing::{debug, info, trace};
use vipsbind_registry::{
    EnumDescriptor, Introspector, MetadataDocs, OperationDescriptor, RegistryWalker, TypeRegistry,
    WalkOptions, WalkedOperation,
};

/// The six texts produced by one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedFiles {
    /// embind function registrations.
    pub functions_cpp: String,
    /// embind enum registrations.
    pub enums_cpp: String,
    /// embind property registrations.
    pub properties_cpp: String,
    /// C++ member declarations.
    pub operators_h: String,
    /// C++ member definitions.
    pub operators_cpp: String,
    /// TypeScript declarations.
    pub vips_d_ts: String,
}

impl GeneratedFiles {
    /// Returns `(file name, contents)` pairs in a fixed order.
    #[must_use]
    pub fn files(&self) -> [(&'static str, &str); 6] {
        [
            ("functions.cpp", self.functions_cpp.as_str()),
            ("enums.cpp", self.enums_cpp.as_str()),
            ("properties.cpp", self.properties_cpp.as_str()),
            ("vips-operators.h", self.operators_h.as_str()),
            ("vips-operators.cpp", self.operators_cpp.as_str()),
            ("vips.d.ts", self.vips_d_ts.as_str()),
        ]
    }

    /// Writes every file into `dir`, creating it if needed.
    ///
    /// # Errors
    /// Returns `CodegenError::Io` if the directory or a file cannot be
    /// written.
    pub fn write_to(&self, dir: &Path) -> Result<(), CodegenError> {
        std::fs::create_dir_all(dir)?;
        for (name, contents) in self.files() {
            let path = dir.join(name);
            std::fs::write(&path, contents)?;
            info!(path = %path.display(), bytes = contents.len(), "wrote file");
        }
        Ok(())
    }
}

/// Main code generator.
pub struct Generator<'a, R: TypeRegistry + ?Sized> {
    registry: &'a R,
    config: &'a GeneratorConfig,
    docs: Option<&'a MetadataDocs>,
    preamble: &'a str,
}

impl<'a, R: TypeRegistry + ?Sized> Generator<'a, R> {
    /// Creates a generator with no enum documentation and no preamble.
    #[must_use]
    pub fn new(registry: &'a R, config: &'a GeneratorConfig) -> Self {
        Self {
            registry,
            config,
            docs: None,
            preamble: "",
        }
    }

    /// Sets the metadata document enum documentation is taken from.
    #[must_use]
    pub fn with_docs(mut self, docs: &'a MetadataDocs) -> Self {
        self.docs = Some(docs);
        self
    }

    /// Sets the hand-written text that opens `vips.d.ts`.
    #[must_use]
    pub fn with_preamble(mut self, preamble: &'a str) -> Self {
        self.preamble = preamble;
        self
    }

    /// Walks the operation hierarchy, synonyms included and no artifact's
    /// deny-list applied.
    ///
    /// # Errors
    /// Returns `CodegenError::Registry` if a synonym cannot be resolved.
    pub fn operations(&self) -> Result<Vec<WalkedOperation>, CodegenError> {
        let options = WalkOptions {
            root: self.config.roots.operations.clone(),
            synonyms: self.config.synonyms.clone(),
            deny: Vec::new(),
        };
        Ok(RegistryWalker::new(self.registry).operations(&options)?)
    }

    /// Introspects every walked operation, in walk order.
    ///
    /// # Errors
    /// Returns `CodegenError::Registry` if the walk or an introspection
    /// fails.
    pub fn descriptors(&self) -> Result<Vec<OperationDescriptor>, CodegenError> {
        let introspector = Introspector::new(self.registry);
        self.operations()?
            .iter()
            .map(|op| Ok(introspector.introspect(&op.name)?))
            .collect()
    }

    /// Collects the documented enum and flags types to emit, in walk order.
    ///
    /// # Errors
    /// Returns `CodegenError::Registry` if a walked type has no definition.
    pub fn enums(&self) -> Result<Vec<EnumDescriptor>, CodegenError> {
        let roots = [
            self.config.roots.enums.as_str(),
            self.config.roots.flags.as_str(),
        ];
        let introspector = Introspector::new(self.registry);
        let prefix = &self.config.enums.type_prefix;

        let mut enums = Vec::new();
        for name in RegistryWalker::new(self.registry).enums(&roots) {
            if self.config.enums.skip_types.contains(&name) {
                trace!(type_name = %name, "skipping internal enumerated type");
                continue;
            }
            let desc = introspector.enumeration(&name)?;
            let desc = match self.docs {
                Some(docs) => {
                    if !docs.contains_type(remove_prefix(&name, prefix)) {
                        debug!(type_name = %name, "no metadata for enumerated type");
                    }
                    desc.with_docs(docs, prefix)
                }
                None => desc,
            };
            enums.push(desc);
        }
        Ok(enums)
    }

    /// Builds the type tables with every emitted enum registered.
    #[must_use]
    pub fn type_mapper(&self, enums: &[EnumDescriptor]) -> TypeMapper {
        let mut mapper = TypeMapper::new();
        for desc in enums {
            let short = remove_prefix(&desc.name, &self.config.enums.type_prefix);
            mapper.register_enum(&desc.name, short, desc.kind);
        }
        mapper
    }

    /// Generates all six texts.
    ///
    /// # Errors
    /// Returns `CodegenError` if introspection fails or a type has no
    /// mapping.
    pub fn generate(&self) -> Result<GeneratedFiles, CodegenError> {
        let operations = self.descriptors()?;
        let enums = self.enums()?;
        let mapper = self.type_mapper(&enums);
        debug!(
            operations = operations.len(),
            enums = enums.len(),
            "generating bindings"
        );

        let skip = &self.config.skip;
        let prefix = &self.config.enums.type_prefix;

        let functions_cpp =
            BindingGenerator::new(select(&operations, &skip.bindings), &mapper).generate()?;
        let operators = OperatorGenerator::new(select(&operations, &skip.operators), &mapper, prefix);
        let operators_h = operators.generate_declarations()?;
        let operators_cpp = operators.generate_definitions()?;
        let enums_cpp = EnumRegistrationGenerator::new(&enums, &self.config.enums).generate();
        let properties_cpp = PropertyGenerator::new(self.registry.image_properties()).generate();

        let mut vips_d_ts = self.preamble.to_string();
        vips_d_ts.push_str(
            &DeclarationGenerator::new(
                select(&operations, &skip.declarations),
                &mapper,
                &self.config.typescript,
            )
            .generate()?,
        );
        vips_d_ts.push_str(&TsEnumGenerator::new(&enums, &self.config.enums).generate());
        vips_d_ts.push_str(&self.config.typescript.footer);

        Ok(GeneratedFiles {
            functions_cpp,
            enums_cpp,
            properties_cpp,
            operators_h,
            operators_cpp,
            vips_d_ts,
        })
    }
}

/// Operations not on the deny-list, order preserved.
fn select<'d>(
    operations: &'d [OperationDescriptor],
    deny: &'d [String],
) -> impl Iterator<Item = &'d OperationDescriptor> {
    operations.iter().filter(move |op| !deny.contains(&op.name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use vipsbind_registry::{parse_metadata, parse_snapshot};

    const SNAPSHOT: &str = r#"<registry library="vips" version="8.16.0">
    <hierarchy>
        <type name="VipsOperation" nickname="operation" abstract="true">
            <type name="VipsInvert" nickname="invert"/>
            <type name="VipsBlack" nickname="black"/>
            <type name="VipsAdd" nickname="add"/>
        </type>
        <type name="GEnum">
            <type name="VipsAccess"/>
            <type name="VipsOperationFlags"/>
        </type>
        <type name="GFlags">
            <type name="VipsForeignPngFilter"/>
        </type>
    </hierarchy>
    <operations>
        <operation name="invert" description="invert an image">
            <argument name="in" type="VipsImage" flags="required construct input" blurb="Input image"/>
            <argument name="out" type="VipsImage" flags="required construct output" blurb="Output image"/>
        </operation>
        <operation name="black" description="make a black image">
            <argument name="out" type="VipsImage" flags="required construct output" blurb="Output image"/>
            <argument name="width" type="gint" flags="required construct input" blurb="Image width in pixels"/>
            <argument name="access" type="VipsAccess" flags="construct input" blurb="required access pattern"/>
        </operation>
        <operation name="add" description="add two images">
            <argument name="left" type="VipsImage" flags="required construct input" blurb="Left-hand image"/>
            <argument name="right" type="VipsImage" flags="required construct input" blurb="Right-hand image"/>
            <argument name="out" type="VipsImage" flags="required construct output" blurb="Output image"/>
        </operation>
    </operations>
    <enums>
        <enum name="VipsAccess">
            <value nick="random"/>
            <value nick="sequential"/>
        </enum>
        <enum name="VipsOperationFlags">
            <value nick="none"/>
        </enum>
        <flags name="VipsForeignPngFilter">
            <value nick="none"/>
            <value nick="sub"/>
        </flags>
    </enums>
    <properties>
        <property name="width"/>
    </properties>
</registry>"#;

    const GIR: &str = r#"<repository><namespace name="Vips">
  <enumeration name="Access"><doc>How pixels are read.</doc></enumeration>
</namespace></repository>"#;

    fn config() -> GeneratorConfig {
        let mut config = GeneratorConfig::default();
        config.synonyms.clear();
        config
    }

    #[test]
    fn test_enums_skip_internal_types() {
        let snapshot = parse_snapshot(SNAPSHOT).expect("snapshot");
        let config = config();
        let docs = parse_metadata(GIR).expect("metadata");

        let enums = Generator::new(&snapshot, &config).with_docs(&docs).enums().expect("enums");
        let names: Vec<&str> = enums.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["VipsAccess", "VipsForeignPngFilter"]);
        assert_eq!(enums[0].doc.as_deref(), Some("How pixels are read."));
        assert_eq!(enums[1].doc, None);
    }

    #[test]
    fn test_per_artifact_deny_lists() {
        let snapshot = parse_snapshot(SNAPSHOT).expect("snapshot");
        let config = config();

        let files = Generator::new(&snapshot, &config).generate().expect("generation");
        // add is wrapped by hand in C++ but declared in TypeScript
        assert!(!files.functions_cpp.contains("\"add\""));
        assert!(!files.operators_h.contains(" add("));
        assert!(files.vips_d_ts.contains("        add(right: Image | ArrayConstant): Image;"));
    }

    #[test]
    fn test_registered_enums_reach_declarations() {
        let snapshot = parse_snapshot(SNAPSHOT).expect("snapshot");
        let config = config();

        let files = Generator::new(&snapshot, &config)
            .with_preamble("declare module Vips {\n")
            .generate()
            .expect("generation");
        assert!(files.vips_d_ts.starts_with("declare module Vips {\n    abstract class ImageAutoGen"));
        assert!(files.vips_d_ts.contains("access?: Access | Enum"));
        assert!(files.vips_d_ts.contains("    export enum ForeignPngFilter {\n"));
        assert!(files.vips_d_ts.ends_with("    }\n\n}\n"));
        assert!(files.properties_cpp.contains(".property(\"width\", &Image::width)"));
    }

    #[test]
    fn test_unknown_synonym_aborts() {
        let snapshot = parse_snapshot(SNAPSHOT).expect("snapshot");
        let config = GeneratorConfig::default();

        let result = Generator::new(&snapshot, &config).generate();
        assert!(matches!(result, Err(CodegenError::Registry(_))));
    }

    #[test]
    fn test_write_to_creates_every_file() {
        let snapshot = parse_snapshot(SNAPSHOT).expect("snapshot");
        let config = config();
        let files = Generator::new(&snapshot, &config).generate().expect("generation");

        let dir = tempfile::tempdir().expect("temp dir");
        let out = dir.path().join("generated");
        files.write_to(&out).expect("write");

        for (name, contents) in files.files() {
            let written = std::fs::read_to_string(out.join(name)).expect("file exists");
            assert_eq!(written, contents);
        }
    }
}
