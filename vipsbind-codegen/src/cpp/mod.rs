//! C++ / embind code generation modules.

pub mod bindings;
pub mod enums;
pub mod operators;

pub use bindings::{BindingGenerator, PropertyGenerator};
pub use enums::EnumRegistrationGenerator;
pub use operators::OperatorGenerator;

use crate::error::CodegenError;
use crate::names::{cpp_member_name, normalize};
use crate::render::{ArgList, spaced};
use crate::types::TypeMapper;
use vipsbind_registry::{ArgumentDescriptor, OperationDescriptor};

/// C++ type of values marshalled dynamically from JavaScript.
pub(crate) const DYNAMIC_VALUE: &str = "emscripten::val";

/// One parameter of a C++ member signature.
#[derive(Debug, Clone)]
pub(crate) struct CppParam<'d> {
    pub arg: &'d ArgumentDescriptor,
    /// Normalized name.
    pub name: String,
    /// Mapped type: parameter table for inputs, return table for outputs.
    pub type_name: String,
}

/// An operation resolved against the C++ type tables.
#[derive(Debug, Clone)]
pub(crate) struct CppOperation<'d> {
    pub desc: &'d OperationDescriptor,
    /// Member name, keyword-escaped.
    pub member: String,
    /// Return type, `None` for void.
    pub return_type: Option<String>,
    /// Required inputs, receiver excluded.
    pub inputs: Vec<CppParam<'d>>,
    /// Out-parameters, passed as pointers.
    pub outputs: Vec<CppParam<'d>>,
}

impl<'d> CppOperation<'d> {
    pub fn new(desc: &'d OperationDescriptor, mapper: &TypeMapper) -> Result<Self, CodegenError> {
        let return_type = desc
            .return_value()
            .map(|arg| mapper.cpp_return(&arg.type_ref).map(str::to_string))
            .transpose()?;

        let inputs = desc
            .required_input
            .iter()
            .map(|arg| {
                Ok(CppParam {
                    arg,
                    name: normalize(&arg.name),
                    type_name: mapper.cpp_param(&arg.type_ref)?.to_string(),
                })
            })
            .collect::<Result<Vec<_>, CodegenError>>()?;

        let outputs = desc
            .out_params()
            .iter()
            .map(|arg| {
                Ok(CppParam {
                    arg,
                    name: normalize(&arg.name),
                    type_name: mapper.cpp_return(&arg.type_ref)?.to_string(),
                })
            })
            .collect::<Result<Vec<_>, CodegenError>>()?;

        Ok(Self {
            desc,
            member: cpp_member_name(&desc.name),
            return_type,
            inputs,
            outputs,
        })
    }

    pub fn is_instance(&self) -> bool {
        self.desc.is_instance_method()
    }

    /// `Image::` for static functions, the given receiver otherwise.
    pub fn call_target<'s>(&self, receiver: &'s str) -> &'s str {
        if self.is_instance() { receiver } else { "Image::" }
    }

    pub fn return_type_or_void(&self) -> &str {
        self.return_type.as_deref().unwrap_or("void")
    }

    /// Declared parameters without the options aggregate.
    pub fn params(&self) -> ArgList {
        let mut params: ArgList = self
            .inputs
            .iter()
            .map(|p| spaced(&p.type_name, &p.name))
            .collect();
        params.extend(
            self.outputs
                .iter()
                .map(|p| spaced(&p.type_name, &format!("*{}", p.name))),
        );
        params
    }

    /// Argument names forwarded to the member, without the options aggregate.
    pub fn forwarded_args(&self) -> ArgList {
        self.inputs
            .iter()
            .chain(&self.outputs)
            .map(|p| p.name.clone())
            .collect()
    }

    /// Returns true if `name` is also a required output.
    pub fn is_output(&self, name: &str) -> bool {
        self.desc.required_output.iter().any(|arg| arg.name == name)
    }
}
