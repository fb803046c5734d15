//! Generator configuration.
//!
//! Every hand-maintained table the generator consults lives here: walk
//! roots, synonyms, per-artifact deny-lists, the enum constant exception
//! tables and the TypeScript class frame. Each field defaults to the
//! libvips tables, so an empty TOML file reproduces the stock output.

use crate::error::CodegenError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Complete generator configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Roots of the registry walks.
    pub roots: RootsConfig,
    /// Operation names appended after the walk.
    pub synonyms: Vec<String>,
    /// Per-artifact operation deny-lists.
    pub skip: SkipConfig,
    /// Enum naming tables.
    pub enums: EnumConfig,
    /// TypeScript declaration frame.
    pub typescript: TypeScriptConfig,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            roots: RootsConfig::default(),
            synonyms: strings(&["crop"]),
            skip: SkipConfig::default(),
            enums: EnumConfig::default(),
            typescript: TypeScriptConfig::default(),
        }
    }
}

impl GeneratorConfig {
    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    /// Returns `CodegenError::Config` if the text is not valid TOML or has
    /// fields of the wrong type.
    pub fn from_toml_str(text: &str) -> Result<Self, CodegenError> {
        Ok(toml::from_str(text)?)
    }

    /// Reads a configuration file.
    ///
    /// # Errors
    /// Returns `CodegenError` if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, CodegenError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}

/// Abstract root types the walks start from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RootsConfig {
    /// Root of all operations.
    pub operations: String,
    /// Root of all enumerated types.
    pub enums: String,
    /// Root of all flags types.
    pub flags: String,
}

impl Default for RootsConfig {
    fn default() -> Self {
        Self {
            operations: "VipsOperation".to_string(),
            enums: "GEnum".to_string(),
            flags: "GFlags".to_string(),
        }
    }
}

/// Operations whose output is written by hand, per artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkipConfig {
    /// Skipped in the embind registrations.
    pub bindings: Vec<String>,
    /// Skipped in the C++ operator declarations and definitions.
    pub operators: Vec<String>,
    /// Skipped in the TypeScript declarations.
    pub declarations: Vec<String>,
}

impl Default for SkipConfig {
    fn default() -> Self {
        Self {
            bindings: strings(&[
                "add",
                "bandbool",
                "bandjoin_const",
                "boolean",
                "boolean_const",
                "complex",
                "complexget",
                "composite",
                "divide",
                "find_trim",
                "flip",
                "linear",
                "math",
                "math2",
                "math2_const",
                "morph",
                "multiply",
                "profile",
                "project",
                "relational",
                "relational_const",
                "remainder",
                "remainder_const",
                "rot",
                "round",
                "subtract",
            ]),
            operators: strings(&[
                "add",
                "bandjoin_const",
                "boolean",
                "composite",
                "divide",
                "ifthenelse",
                "math2",
                "multiply",
                "relational",
                "remainder",
                "subtract",
            ]),
            declarations: strings(&[
                "composite",
                "find_trim",
                "profile",
                "project",
                "bandjoin_const",
                "boolean_const",
                "math2_const",
                "relational_const",
                "remainder_const",
            ]),
        }
    }
}

/// Enum naming and filtering tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnumConfig {
    /// Library prefix stripped from type names.
    pub type_prefix: String,
    /// Enum and flags types never emitted.
    pub skip_types: Vec<String>,
    /// Value names dropped from TypeScript enums when they come first.
    pub skip_leading_values: Vec<String>,
    /// Constant prefixes that differ from the derived one.
    pub prefix_overrides: BTreeMap<String, String>,
    /// Whole constant names that differ from the derived one.
    pub constant_overrides: BTreeMap<String, String>,
}

impl Default for EnumConfig {
    fn default() -> Self {
        Self {
            type_prefix: "Vips".to_string(),
            skip_types: strings(&["VipsArgumentFlags", "VipsForeignFlags", "VipsOperationFlags"]),
            skip_leading_values: strings(&["error", "notset"]),
            prefix_overrides: pairs(&[
                ("VIPS_BAND_FORMAT", "VIPS_FORMAT"),
                ("VIPS_IMAGE_TYPE", "VIPS_IMAGE"),
            ]),
            constant_overrides: pairs(&[
                ("VIPS_INTERPRETATION_SRGB", "VIPS_INTERPRETATION_sRGB"),
                ("VIPS_INTERPRETATION_SCRGB", "VIPS_INTERPRETATION_scRGB"),
            ]),
        }
    }
}

/// Text framing the generated TypeScript class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypeScriptConfig {
    /// Opens the generated class block.
    pub class_header: String,
    /// Closes the generated class block.
    pub class_footer: String,
    /// Closes the surrounding declaration file.
    pub footer: String,
}

impl Default for TypeScriptConfig {
    fn default() -> Self {
        Self {
            class_header: "    abstract class ImageAutoGen extends EmbindClassHandle<ImageAutoGen> {\n        // THIS IS A GENERATED CLASS. DO NOT EDIT DIRECTLY.\n".to_string(),
            class_footer: "    }\n\n".to_string(),
            footer: "}\n".to_string(),
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

fn pairs(items: &[(&str, &str)]) -> BTreeMap<String, String> {
    items
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_is_default() {
        let config = GeneratorConfig::from_toml_str("").expect("empty config parses");
        assert_eq!(config, GeneratorConfig::default());
        assert_eq!(config.synonyms, ["crop"]);
        assert_eq!(config.roots.operations, "VipsOperation");
    }

    #[test]
    fn test_partial_override() {
        let text = r#"
synonyms = []

[skip]
bindings = ["add"]

[enums.constant_overrides]
VIPS_KERNEL_CUBIC = "VIPS_KERNEL_CUBIC_SPECIAL"
"#;
        let config = GeneratorConfig::from_toml_str(text).expect("config parses");

        assert!(config.synonyms.is_empty());
        assert_eq!(config.skip.bindings, ["add"]);
        assert_eq!(config.skip.operators, SkipConfig::default().operators);
        assert_eq!(
            config.enums.constant_overrides.get("VIPS_KERNEL_CUBIC").map(String::as_str),
            Some("VIPS_KERNEL_CUBIC_SPECIAL")
        );
        assert_eq!(config.enums.type_prefix, "Vips");
    }

    #[test]
    fn test_wrong_field_type_is_rejected() {
        let err = GeneratorConfig::from_toml_str("synonyms = 3").unwrap_err();
        assert!(matches!(err, CodegenError::Config(_)));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("vipsbind.toml");
        std::fs::write(&path, "[roots]\noperations = \"VipsForeign\"\n").expect("write config");

        let config = GeneratorConfig::from_file(&path).expect("config file parses");
        assert_eq!(config.roots.operations, "VipsForeign");
        assert_eq!(config.roots.enums, "GEnum");
    }
}
