//! embind enum registrations.

use crate::config::EnumConfig;
use crate::names::{normalize, remove_prefix, to_snake_case};
use vipsbind_registry::EnumDescriptor;

/// Derives the C constant naming one enum value.
///
/// The prefix is the upper-cased snake form of the type name. Prefixes and
/// whole names listed in the overrides replace the derived ones.
#[must_use]
pub fn constant_name(type_name: &str, nick: &str, config: &EnumConfig) -> String {
    let derived = to_snake_case(type_name).to_uppercase();
    let prefix = config
        .prefix_overrides
        .get(&derived)
        .cloned()
        .unwrap_or(derived);
    let constant = format!("{prefix}_{}", normalize(nick).to_uppercase());
    config
        .constant_overrides
        .get(&constant)
        .cloned()
        .unwrap_or(constant)
}

/// Generator for `enums.cpp`.
pub struct EnumRegistrationGenerator<'a> {
    enums: &'a [EnumDescriptor],
    config: &'a EnumConfig,
}

impl<'a> EnumRegistrationGenerator<'a> {
    /// Creates a new enum registration generator.
    #[must_use]
    pub fn new(enums: &'a [EnumDescriptor], config: &'a EnumConfig) -> Self {
        Self { enums, config }
    }

    /// Generates one `enum_` statement per type.
    #[must_use]
    pub fn generate(&self) -> String {
        let mut output = String::from("    // Auto-generated enums\n");
        for desc in self.enums {
            output.push_str(&self.registration(desc));
        }
        output
    }

    fn registration(&self, desc: &EnumDescriptor) -> String {
        let mut output = format!(
            "    enum_<{}>(\"{}\")",
            desc.name,
            remove_prefix(&desc.name, &self.config.type_prefix)
        );
        for value in &desc.values {
            output.push_str(&format!(
                "\n        .value(\"{}\", {})",
                normalize(&value.nick),
                constant_name(&desc.name, &value.nick, self.config)
            ));
        }
        output.push_str(";\n\n");
        output
    }
}
