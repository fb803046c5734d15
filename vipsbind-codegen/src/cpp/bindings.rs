//! embind registration statements.
//!
//! The output is spliced into a hand-written `class_<Image>` definition,
//! so every statement starts with `.` and carries no terminator.

use super::CppOperation;
use crate::error::CodegenError;
use crate::names::{normalize, to_camel_case};
use crate::render::ArgList;
use crate::types::TypeMapper;
use vipsbind_registry::OperationDescriptor;

/// Generator for `functions.cpp`.
pub struct BindingGenerator<'a> {
    operations: Vec<&'a OperationDescriptor>,
    mapper: &'a TypeMapper,
}

impl<'a> BindingGenerator<'a> {
    /// Creates a new binding generator.
    #[must_use]
    pub fn new(
        operations: impl IntoIterator<Item = &'a OperationDescriptor>,
        mapper: &'a TypeMapper,
    ) -> Self {
        Self {
            operations: operations.into_iter().collect(),
            mapper,
        }
    }

    /// Generates every registration.
    ///
    /// # Errors
    /// Returns `CodegenError::UnmappedValueKind` if an argument type has no
    /// C++ mapping.
    pub fn generate(&self) -> Result<String, CodegenError> {
        let mut output = String::from("        // Auto-generated (class-)functions\n");
        for desc in &self.operations {
            output.push_str(&self.registration(desc)?);
            output.push('\n');
        }
        Ok(output)
    }

    /// Generates the registration of one operation.
    ///
    /// Operations with options get a second registration under the same name
    /// that forwards to the member with `js_options` left at its default.
    ///
    /// # Errors
    /// Returns `CodegenError::UnmappedValueKind` on a type table miss.
    pub fn registration(&self, desc: &OperationDescriptor) -> Result<String, CodegenError> {
        let op = CppOperation::new(desc, self.mapper)?;

        let function_type = if op.is_instance() { "function" } else { "class_function" };
        let js_name = to_camel_case(&desc.name);
        let policy = if op.outputs.is_empty() { "" } else { ", allow_raw_pointers()" };

        let mut output = format!(
            "        .{function_type}(\"{js_name}\", &Image::{}{policy})",
            op.member
        );

        if !desc.has_options() {
            return Ok(output);
        }

        let padding = " ".repeat(if op.is_instance() { 9 } else { 15 });
        let mut params = ArgList::new();
        if op.is_instance() {
            params.push("const Image &image");
        }
        params.extend(op.params());

        let result = if desc.is_void() { "" } else { "return " };
        let target = op.call_target("image.");

        output.push_str(&format!(
            "\n        .{function_type}(\"{js_name}\", optional_override([]({}) {{\n",
            params.render()
        ));
        output.push_str(&format!(
            "{padding}             {result}{target}{}({});\n",
            op.member,
            op.forwarded_args().render()
        ));
        output.push_str(&format!("         {padding}}}){policy})"));

        Ok(output)
    }
}

/// Generator for `properties.cpp`.
pub struct PropertyGenerator<'a> {
    properties: &'a [String],
}

impl<'a> PropertyGenerator<'a> {
    /// Creates a new property generator over image header field names.
    #[must_use]
    pub fn new(properties: &'a [String]) -> Self {
        Self { properties }
    }

    /// Generates one `.property` statement per field.
    #[must_use]
    pub fn generate(&self) -> String {
        let mut output = String::from("        // Auto-generated properties\n");
        for property in self.properties {
            let name = normalize(property);
            output.push_str(&format!("        .property(\"{name}\", &Image::{name})\n"));
        }
        output
    }
}
