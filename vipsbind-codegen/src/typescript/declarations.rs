//! Member declarations of the generated TypeScript class.

use super::MEMBER_INDENT;
use crate::config::TypeScriptConfig;
use crate::error::CodegenError;
use crate::names::{capitalize, to_camel_case, ts_arg_name};
use crate::render::{ArgList, DocBlock};
use crate::types::TypeMapper;
use vipsbind_registry::OperationDescriptor;

/// Generator for the class block of `vips.d.ts`.
pub struct DeclarationGenerator<'a> {
    operations: Vec<&'a OperationDescriptor>,
    mapper: &'a TypeMapper,
    config: &'a TypeScriptConfig,
}

impl<'a> DeclarationGenerator<'a> {
    /// Creates a new declaration generator.
    #[must_use]
    pub fn new(
        operations: impl IntoIterator<Item = &'a OperationDescriptor>,
        mapper: &'a TypeMapper,
        config: &'a TypeScriptConfig,
    ) -> Self {
        Self {
            operations: operations.into_iter().collect(),
            mapper,
            config,
        }
    }

    /// Generates the class block, header and footer included.
    ///
    /// # Errors
    /// Returns `CodegenError::UnmappedValueKind` if an argument type has no
    /// TypeScript mapping.
    pub fn generate(&self) -> Result<String, CodegenError> {
        let mut output = self.config.class_header.clone();
        for desc in &self.operations {
            output.push_str(&self.declaration(desc)?);
            output.push('\n');
        }
        output.push_str(&self.config.class_footer);
        Ok(output)
    }

    /// Generates one documented member declaration.
    ///
    /// Optional arguments are typed inline as members of `options`;
    /// deprecated ones are left out. Out-parameters have no TypeScript form.
    ///
    /// # Errors
    /// Returns `CodegenError::UnmappedValueKind` on a type table miss.
    pub fn declaration(&self, desc: &OperationDescriptor) -> Result<String, CodegenError> {
        let indent = MEMBER_INDENT;

        let mut doc = DocBlock::new(indent).line(&format!("{}.", capitalize(&desc.description)));
        for arg in &desc.required_input {
            doc.push(&format!("@param {} {}.", ts_arg_name(&arg.name), arg.blurb));
        }
        if desc.has_documented_options() {
            doc.push("@param options Optional options.");
        }
        if let Some(ret) = desc.return_value() {
            doc.push(&format!("@return {}.", ret.blurb));
        }

        let mut args = ArgList::new();
        for arg in &desc.required_input {
            args.push(format!(
                "{}: {}",
                ts_arg_name(&arg.name),
                self.mapper.ts_param(&arg.type_ref)?
            ));
        }
        if desc.has_documented_options() {
            args.push(self.options(desc)?);
        }

        let return_type = match desc.return_value() {
            Some(ret) => self.mapper.ts_return(&ret.type_ref)?,
            None => "void",
        };

        let mut output = format!("\n{}{indent}", doc.render());
        if !desc.is_instance_method() {
            output.push_str("static ");
        }
        output.push_str(&format!(
            "{}({}): {return_type};",
            to_camel_case(&desc.name),
            args.render()
        ));
        Ok(output)
    }

    /// Renders the inline `options?: { ... }` parameter.
    fn options(&self, desc: &OperationDescriptor) -> Result<String, CodegenError> {
        let indent = MEMBER_INDENT;
        let field_indent = format!("{indent}    ");
        let mut output = String::from("options?: {");

        for arg in desc.documented_optional_input() {
            let doc = DocBlock::new(&field_indent).line(&format!("{}.", capitalize(&arg.blurb)));
            output.push_str(&format!(
                "\n{}{field_indent}{}?: {}",
                doc.render(),
                ts_arg_name(&arg.name),
                self.mapper.ts_param(&arg.type_ref)?
            ));
        }
        for arg in desc.documented_optional_output() {
            let doc = DocBlock::new(&field_indent)
                .line(&format!("{} (output).", capitalize(&arg.blurb)));
            output.push_str(&format!(
                "\n{}{field_indent}{}?: {} | undefined",
                doc.render(),
                ts_arg_name(&arg.name),
                self.mapper.ts_return(&arg.type_ref)?
            ));
        }

        output.push_str(&format!("\n{indent}}}"));
        Ok(output)
    }
}
