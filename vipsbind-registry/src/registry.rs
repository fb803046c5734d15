//! Read access to a native type registry.
//!
//! Generation only needs a handful of questions answered about the
//! registry, so they are gathered in the [`TypeRegistry`] trait. The
//! snapshot parsed from XML is the one implementation shipped here.

use crate::error::RegistryError;
use crate::operations::OperationDef;
use crate::types::{EnumDef, RegistrySnapshot};

/// Introspection surface of a native type registry.
pub trait TypeRegistry {
    /// Returns the direct subtypes of a type, in declaration order.
    fn children(&self, type_name: &str) -> &[String];

    /// Returns the short operation name of a type.
    fn nickname(&self, type_name: &str) -> Option<&str>;

    /// Returns the root of the hierarchy the type belongs to.
    fn fundamental<'a>(&'a self, type_name: &'a str) -> &'a str;

    /// Resolves an operation by nickname.
    ///
    /// # Errors
    /// Returns `RegistryError::AbstractType` if the nickname names an
    /// abstract type, or `RegistryError::UnknownOperation` if nothing
    /// resolves.
    fn operation(&self, nickname: &str) -> Result<&OperationDef, RegistryError>;

    /// Resolves an enum or flags type by name.
    ///
    /// # Errors
    /// Returns `RegistryError::UnknownType` if the type is not registered.
    fn enumeration(&self, type_name: &str) -> Result<&EnumDef, RegistryError>;

    /// Returns the image header fields exposed as properties.
    fn image_properties(&self) -> &[String];
}

impl TypeRegistry for RegistrySnapshot {
    fn children(&self, type_name: &str) -> &[String] {
        self.children_of(type_name)
    }

    fn nickname(&self, type_name: &str) -> Option<&str> {
        self.nickname_of(type_name)
    }

    fn fundamental<'a>(&'a self, type_name: &'a str) -> &'a str {
        self.fundamental_of(type_name)
    }

    fn operation(&self, nickname: &str) -> Result<&OperationDef, RegistryError> {
        if self.is_abstract_nickname(nickname) {
            return Err(RegistryError::AbstractType {
                name: nickname.to_string(),
            });
        }
        self.get_operation(nickname)
            .ok_or_else(|| RegistryError::unknown_operation(nickname))
    }

    fn enumeration(&self, type_name: &str) -> Result<&EnumDef, RegistryError> {
        self.get_enum(type_name)
            .ok_or_else(|| RegistryError::unknown_type(type_name))
    }

    fn image_properties(&self) -> &[String] {
        &self.properties
    }
}
