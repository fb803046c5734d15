//! TypeScript enum declarations.

use crate::config::EnumConfig;
use crate::names::{normalize, remove_prefix, upper_first};
use crate::render::DocBlock;
use vipsbind_registry::{EnumDescriptor, EnumValueDescriptor};

/// Generator for the enum section of `vips.d.ts`.
pub struct TsEnumGenerator<'a> {
    enums: &'a [EnumDescriptor],
    config: &'a EnumConfig,
}

impl<'a> TsEnumGenerator<'a> {
    /// Creates a new enum declaration generator.
    #[must_use]
    pub fn new(enums: &'a [EnumDescriptor], config: &'a EnumConfig) -> Self {
        Self { enums, config }
    }

    /// Generates one `export enum` per type.
    #[must_use]
    pub fn generate(&self) -> String {
        self.enums.iter().map(|desc| self.declaration(desc)).collect()
    }

    /// Generates one documented enum. Flags share the enum shape.
    #[must_use]
    pub fn declaration(&self, desc: &EnumDescriptor) -> String {
        let mut output = String::new();

        if let Some(doc) = &desc.doc {
            output.push_str(&DocBlock::new("    ").line(doc).render());
        }
        output.push_str(&format!(
            "    export enum {} {{\n",
            remove_prefix(&desc.name, &self.config.type_prefix)
        ));

        let entries: Vec<String> = desc
            .values
            .iter()
            .enumerate()
            .filter(|(i, value)| !(*i == 0 && self.is_skipped_leader(value)))
            .map(|(_, value)| entry(value))
            .collect();
        output.push_str(&entries.join(",\n"));

        output.push_str("\n    }\n\n");
        output
    }

    fn is_skipped_leader(&self, value: &EnumValueDescriptor) -> bool {
        let name = normalize(&value.nick);
        self.config.skip_leading_values.contains(&name)
    }
}

fn entry(value: &EnumValueDescriptor) -> String {
    let mut output = String::new();
    if let Some(doc) = &value.doc {
        output.push_str(&DocBlock::new("        ").line(&upper_first(doc)).render());
    }
    output.push_str(&format!("        {} = '{}'", normalize(&value.nick), value.nick));
    output
}
