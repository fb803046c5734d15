//! C++ operator declarations and definitions.
//!
//! Each operation becomes one member of the `Image` class. The definition
//! builds an `Option` chain carrying the receiver, the outputs and every
//! required input, then hands it to `call` together with the caller's
//! `js_options`.

use super::{CppOperation, DYNAMIC_VALUE};
use crate::error::CodegenError;
use crate::names::{capitalize, normalize, type_macro};
use crate::render::{DocBlock, spaced};
use crate::types::TypeMapper;
use vipsbind_registry::{OperationDescriptor, ValueKind};

/// Banner opening both generated operator files.
pub const PREAMBLE: &str = "/**\n * This file was generated automatically. Do not edit!\n */\n";

/// Generator for `vips-operators.h` and `vips-operators.cpp`.
pub struct OperatorGenerator<'a> {
    operations: Vec<&'a OperationDescriptor>,
    mapper: &'a TypeMapper,
    type_prefix: &'a str,
}

impl<'a> OperatorGenerator<'a> {
    /// Creates a new operator generator.
    #[must_use]
    pub fn new(
        operations: impl IntoIterator<Item = &'a OperationDescriptor>,
        mapper: &'a TypeMapper,
        type_prefix: &'a str,
    ) -> Self {
        Self {
            operations: operations.into_iter().collect(),
            mapper,
            type_prefix,
        }
    }

    /// Generates the header with every member declaration.
    ///
    /// # Errors
    /// Returns `CodegenError::UnmappedValueKind` if an argument type has no
    /// C++ mapping.
    pub fn generate_declarations(&self) -> Result<String, CodegenError> {
        let mut output = String::from(PREAMBLE);
        for desc in &self.operations {
            output.push_str(&self.declaration(desc)?);
            output.push('\n');
        }
        Ok(output)
    }

    /// Generates the source file with every member definition.
    ///
    /// # Errors
    /// Returns `CodegenError::UnmappedValueKind` if an argument type has no
    /// C++ mapping.
    pub fn generate_definitions(&self) -> Result<String, CodegenError> {
        let mut output = String::from(PREAMBLE);
        for desc in &self.operations {
            output.push_str(&self.definition(desc)?);
            output.push('\n');
        }
        Ok(output)
    }

    /// Generates one documented member declaration.
    ///
    /// # Errors
    /// Returns `CodegenError::UnmappedValueKind` on a type table miss.
    pub fn declaration(&self, desc: &OperationDescriptor) -> Result<String, CodegenError> {
        let op = CppOperation::new(desc, self.mapper)?;

        let mut doc = DocBlock::new("").line(&format!("{}.", capitalize(&desc.description)));
        for param in op.inputs.iter().chain(&op.outputs) {
            doc.push(&format!("@param {} {}.", param.name, param.arg.blurb));
        }
        if desc.has_options() {
            doc.push("@param js_options Optional options.");
        }
        if let Some(ret) = desc.return_value() {
            doc.push(&format!("@return {}.", ret.blurb));
        }

        let mut params = op.params();
        if desc.has_options() {
            params.push(format!("{DYNAMIC_VALUE} js_options = {DYNAMIC_VALUE}::null()"));
        }

        let mut output = format!("\n{}", doc.render());
        if !op.is_instance() {
            output.push_str("static ");
        }
        output.push_str(&spaced(op.return_type_or_void(), &op.member));
        output.push_str(&format!("({})", params.render()));
        if op.is_instance() {
            output.push_str(" const");
        }
        output.push(';');

        Ok(output)
    }

    /// Generates one member definition.
    ///
    /// # Errors
    /// Returns `CodegenError::UnmappedValueKind` on a type table miss.
    pub fn definition(&self, desc: &OperationDescriptor) -> Result<String, CodegenError> {
        let op = CppOperation::new(desc, self.mapper)?;

        let mut params = op.params();
        if desc.has_options() {
            params.push(format!("{DYNAMIC_VALUE} js_options"));
        }

        let mut output = String::from("\n");
        output.push_str(&spaced(
            op.return_type_or_void(),
            &format!("Image::{}", op.member),
        ));
        output.push_str(&format!("({})", params.render()));
        if op.is_instance() {
            output.push_str(" const");
        }
        output.push_str("\n{\n");

        // Result variable
        if let (Some(ret), Some(ret_type)) = (desc.return_value(), op.return_type.as_deref()) {
            let declared = if ret.is_blob() { "VipsBlob *" } else { ret_type };
            output.push_str(&format!(
                "    {};\n\n",
                spaced(declared, &normalize(&ret.name))
            ));
        }

        let blobs: Vec<&str> = op
            .inputs
            .iter()
            .filter(|p| p.arg.is_blob())
            .map(|p| p.name.as_str())
            .collect();
        let target = op.call_target("this->");
        let null_arg = if op.is_instance() { "" } else { " nullptr," };

        let padding = if !blobs.is_empty() {
            26
        } else if op.is_instance() {
            15
        } else {
            16
        };
        if blobs.is_empty() {
            output.push_str(&format!(
                "    {target}call(\"{}\",{null_arg}\n{}(new Option)",
                desc.name,
                " ".repeat(padding)
            ));
        } else {
            // The caller's buffer may not outlive the call. Every statement
            // after the copy runs inside the try, setters included.
            for blob in &blobs {
                output.push_str(&format!(
                    "    VipsBlob *{blob}_blob = vips_blob_copy({blob}.c_str(), {blob}.size());\n"
                ));
            }
            output.push_str("\n    try {\n");
            output.push_str("        Option *options = (new Option)");
        }

        for (name, value) in self.option_values(&op) {
            output.push_str(&format!(
                "\n    {}->set(\"{name}\", {value})",
                " ".repeat(padding)
            ));
        }

        if blobs.is_empty() {
            if desc.has_options() {
                output.push_str(&format!(",\n{}js_options);\n", " ".repeat(padding)));
            } else {
                output.push_str(");\n");
            }
        } else {
            let js_options = if desc.has_options() { ", js_options" } else { "" };
            output.push_str(";\n");
            output.push_str(&format!(
                "        {target}call(\"{}\",{null_arg} options{js_options});\n",
                desc.name
            ));
            output.push_str("    } catch (...) {\n");
            for blob in &blobs {
                output.push_str(&format!("        vips_area_unref(VIPS_AREA({blob}_blob));\n"));
            }
            output.push_str("        throw;\n");
            output.push_str("    }\n");
            for blob in &blobs {
                output.push_str(&format!("    vips_area_unref(VIPS_AREA({blob}_blob));\n"));
            }
        }

        if let Some(ret) = desc.return_value() {
            let name = normalize(&ret.name);
            output.push('\n');
            if ret.is_blob() {
                output.push_str(&blob_result(&name));
            } else {
                output.push_str(&format!("    return {name};\n"));
            }
        }

        output.push('}');
        Ok(output)
    }

    /// `(registry name, C++ value)` pairs of the `Option` chain, in call
    /// order: receiver, return value, inputs, out-parameters.
    fn option_values(&self, op: &CppOperation<'_>) -> Vec<(String, String)> {
        let mut values = Vec::new();

        if let Some(receiver) = &op.desc.receiver {
            values.push((receiver.name.clone(), "*this".to_string()));
        }
        if let Some(ret) = op.desc.return_value() {
            values.push((
                ret.name.clone(),
                format!("&{}", normalize(&ret.name)),
            ));
        }

        for param in &op.inputs {
            let value = if param.arg.is_blob() {
                format!("{}_blob", param.name)
            } else if param.type_name == DYNAMIC_VALUE && !op.is_output(&param.arg.name) {
                let mut value = format!(
                    "{}, {}",
                    type_macro(&param.arg.type_ref.name, self.type_prefix),
                    param.name
                );
                // images are matched against the receiver
                if op.is_instance()
                    && (param.arg.type_ref.is_exactly(ValueKind::Image)
                        || param.arg.type_ref.is_exactly(ValueKind::ArrayImage))
                {
                    value.push_str(", this");
                }
                value
            } else {
                param.name.clone()
            };
            values.push((param.arg.name.clone(), value));
        }

        for param in &op.outputs {
            values.push((param.arg.name.clone(), param.name.clone()));
        }

        values
    }
}

/// Wraps a returned blob in a typed-array view, releasing the native blob
/// on both paths.
fn blob_result(name: &str) -> String {
    let mut output = String::new();
    output.push_str("    emscripten::val result = emscripten::val::undefined();\n");
    output.push_str("    try {\n");
    output.push_str("        result = BlobVal.new_(emscripten::typed_memory_view(\n");
    output.push_str(&format!("            VIPS_AREA({name})->length,\n"));
    output.push_str(&format!(
        "            static_cast<uint8_t *>(VIPS_AREA({name})->data)));\n"
    ));
    output.push_str("    } catch (...) {\n");
    output.push_str(&format!("        vips_area_unref(VIPS_AREA({name}));\n"));
    output.push_str("        throw;\n");
    output.push_str("    }\n");
    output.push_str(&format!("    vips_area_unref(VIPS_AREA({name}));\n\n"));
    output.push_str("    return result;\n");
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpp::fixtures;
    use vipsbind_registry::{Direction, TypeRef};

    fn generator(mapper: &TypeMapper) -> OperatorGenerator<'_> {
        OperatorGenerator::new(std::iter::empty(), mapper, "Vips")
    }

    #[test]
    fn test_instance_declaration() {
        let mapper = TypeMapper::new();
        let text = generator(&mapper)
            .declaration(&fixtures::invert())
            .expect("declaration");

        assert_eq!(
            text,
            "\n/**\n * Invert an image.\n * @return Output image.\n */\nImage invert() const;"
        );
    }

    #[test]
    fn test_static_declaration_with_options() {
        let mapper = TypeMapper::new();
        let text = generator(&mapper)
            .declaration(&fixtures::black())
            .expect("declaration");

        assert!(text.contains(" * @param width Image width in pixels.\n"));
        assert!(text.contains(" * @param js_options Optional options.\n"));
        assert!(text.ends_with(
            "static Image black(int width, int height, emscripten::val js_options = emscripten::val::null());"
        ));
    }

    #[test]
    fn test_instance_definition() {
        let mapper = TypeMapper::new();
        let text = generator(&mapper)
            .definition(&fixtures::invert())
            .expect("definition");

        let expected = "
Image Image::invert() const
{
    Image out;

    this->call(\"invert\",
               (new Option)
                   ->set(\"in\", *this)
                   ->set(\"out\", &out));

    return out;
}";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_static_definition_with_options() {
        let mapper = TypeMapper::new();
        let text = generator(&mapper)
            .definition(&fixtures::black())
            .expect("definition");

        let expected = "
Image Image::black(int width, int height, emscripten::val js_options)
{
    Image out;

    Image::call(\"black\", nullptr,
                (new Option)
                    ->set(\"out\", &out)
                    ->set(\"width\", width)
                    ->set(\"height\", height),
                js_options);

    return out;
}";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_multi_output_definition() {
        let mapper = TypeMapper::new();
        let operators = generator(&mapper);
        let desc = fixtures::minpair();

        let decl = operators.declaration(&desc).expect("declaration");
        assert!(decl.ends_with("double minpair(int *b, std::vector<double> *c) const;"));
        assert!(decl.contains(" * @param b Horizontal position.\n * @param c All values.\n"));
        assert!(decl.contains(" * @return Minimum value.\n"));

        let def = operators.definition(&desc).expect("definition");
        assert!(def.contains("    double a;\n"));
        let a = def.find("->set(\"a\", &a)").expect("return value set");
        let b = def.find("->set(\"b\", b)").expect("first out-param set");
        let c = def.find("->set(\"c\", c)").expect("second out-param set");
        assert!(a < b && b < c);
    }

    #[test]
    fn test_dynamic_values_carry_type_macro() {
        let mapper = TypeMapper::new();
        let text = generator(&mapper)
            .definition(&fixtures::case())
            .expect("definition");

        assert!(text.starts_with("\nImage Image::case_image(emscripten::val cases) const\n"));
        assert!(text.contains("this->call(\"case\",\n"));
        assert!(text.contains("->set(\"cases\", VIPS_TYPE_ARRAY_IMAGE, cases, this)"));
    }

    #[test]
    fn test_blob_input_is_copied_and_released() {
        let mapper = TypeMapper::new();
        let text = generator(&mapper)
            .definition(&fixtures::jpegload_buffer())
            .expect("definition");

        let expected = "
Image Image::jpegload_buffer(const std::string &buffer, emscripten::val js_options)
{
    Image out;

    VipsBlob *buffer_blob = vips_blob_copy(buffer.c_str(), buffer.size());

    try {
        Option *options = (new Option)
                              ->set(\"out\", &out)
                              ->set(\"buffer\", buffer_blob);
        Image::call(\"jpegload_buffer\", nullptr, options, js_options);
    } catch (...) {
        vips_area_unref(VIPS_AREA(buffer_blob));
        throw;
    }
    vips_area_unref(VIPS_AREA(buffer_blob));

    return out;
}";
        assert_eq!(text, expected);
        assert_eq!(text.matches("vips_area_unref(VIPS_AREA(buffer_blob))").count(), 2);
    }

    #[test]
    fn test_blob_copy_is_released_when_a_setter_throws() {
        let mapper = TypeMapper::new();
        let mut desc = fixtures::jpegload_buffer();
        let mut access = fixtures::arg("access", ValueKind::Enum, Direction::Input, "Required access pattern");
        access.type_ref = TypeRef::new("VipsAccess", "GEnum");
        desc.required_input.push(access);

        let text = generator(&mapper).definition(&desc).expect("definition");

        let copy = text.find("vips_blob_copy").expect("copy");
        let try_open = text.find("    try {\n").expect("try");
        let chain = text.find("(new Option)").expect("option chain");
        let conversion = text
            .find("->set(\"access\", VIPS_TYPE_ACCESS, access)")
            .expect("enum conversion");
        let catch = text.find("} catch (...) {").expect("catch");
        assert!(copy < try_open && try_open < chain && chain < conversion && conversion < catch);
        assert_eq!(text.matches("vips_area_unref(VIPS_AREA(buffer_blob))").count(), 2);
    }

    #[test]
    fn test_optional_blob_travels_in_js_options() {
        let mapper = TypeMapper::new();
        let mut desc = fixtures::invert();
        desc.optional_input.push(fixtures::optional(
            "profile",
            ValueKind::Blob,
            Direction::Input,
            "Embedded ICC profile",
        ));
        let operators = generator(&mapper);

        let decl = operators.declaration(&desc).expect("declaration");
        assert!(decl.ends_with(
            "Image invert(emscripten::val js_options = emscripten::val::null()) const;"
        ));

        let def = operators.definition(&desc).expect("definition");
        assert!(!def.contains("vips_blob_copy"));
        assert!(!def.contains("vips_area_unref"));
        assert!(!def.contains("\"profile\""));
        assert!(def.contains("->set(\"out\", &out),\n               js_options);\n"));
    }

    #[test]
    fn test_blob_return_is_viewed_and_released() {
        let mapper = TypeMapper::new();
        let text = generator(&mapper)
            .definition(&fixtures::jpegsave_buffer())
            .expect("definition");

        assert!(text.starts_with(
            "\nemscripten::val Image::jpegsave_buffer(emscripten::val js_options) const\n{\n    VipsBlob *buffer;\n"
        ));
        assert!(text.contains("->set(\"buffer\", &buffer),\n"));
        assert!(text.contains("typed_memory_view(\n            VIPS_AREA(buffer)->length,\n"));
        assert_eq!(text.matches("vips_area_unref(VIPS_AREA(buffer));").count(), 2);
        assert!(text.ends_with("    return result;\n}"));
    }

    #[test]
    fn test_void_definition() {
        let mapper = TypeMapper::new();
        let text = generator(&mapper)
            .definition(&fixtures::draw_rect())
            .expect("definition");

        assert!(text.starts_with(
            "\nvoid Image::draw_rect(const std::vector<double> &ink, int left, emscripten::val js_options) const\n{\n    this->call"
        ));
        assert!(!text.contains("return"));
    }

    #[test]
    fn test_files_start_with_banner() {
        let mapper = TypeMapper::new();
        let ops = [fixtures::black(), fixtures::invert()];
        let operators = OperatorGenerator::new(&ops, &mapper, "Vips");

        let header = operators.generate_declarations().expect("declarations");
        assert!(header.starts_with(PREAMBLE));
        assert_eq!(header.matches(";\n").count(), 2);
        assert!(header.find("black(").unwrap() < header.find("invert(").unwrap());

        let source = operators.generate_definitions().expect("definitions");
        assert_eq!(source.matches("\n}\n").count(), 2);
    }
}
