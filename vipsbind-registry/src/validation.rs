//! Snapshot validation utilities.
//!
//! This module checks a parsed registry snapshot for the inconsistencies
//! that would otherwise surface as confusing output later on.

use crate::error::RegistryError;
use crate::operations::OperationDef;
use crate::types::{EnumDef, RegistrySnapshot};
use std::collections::HashSet;

/// Validates a parsed snapshot for correctness.
///
/// # Arguments
/// * `snapshot` - The snapshot to validate
///
/// # Returns
/// Ok(()) if valid, or RegistryError describing the issue.
///
/// # Errors
/// Returns `RegistryError::Validation` if validation fails.
pub fn validate_snapshot(snapshot: &RegistrySnapshot) -> Result<(), RegistryError> {
    validate_hierarchy(snapshot)?;
    validate_operations(snapshot)?;
    validate_enums(snapshot)?;
    Ok(())
}

/// Rejects a hierarchy in which a type is its own ancestor.
///
/// Children are merged across every occurrence of a type, so two separate
/// subtrees can close a cycle that neither shows on its own.
fn validate_hierarchy(snapshot: &RegistrySnapshot) -> Result<(), RegistryError> {
    let mut finished: HashSet<&str> = HashSet::new();

    for root in &snapshot.roots {
        let root = root.name.as_str();
        if finished.contains(root) {
            continue;
        }
        let mut on_path: HashSet<&str> = HashSet::from([root]);
        let mut path: Vec<(&str, usize)> = vec![(root, 0)];

        while let Some(top) = path.last_mut() {
            let (type_name, index) = *top;
            top.1 += 1;

            match snapshot.children_of(type_name).get(index) {
                Some(child) => {
                    let child = child.as_str();
                    if on_path.contains(child) {
                        return Err(RegistryError::validation(format!(
                            "Type '{child}' is its own ancestor in the hierarchy"
                        )));
                    }
                    if !finished.contains(child) {
                        on_path.insert(child);
                        path.push((child, 0));
                    }
                }
                None => {
                    on_path.remove(type_name);
                    finished.insert(type_name);
                    path.pop();
                }
            }
        }
    }

    Ok(())
}

/// Validates all operation definitions in the snapshot.
fn validate_operations(snapshot: &RegistrySnapshot) -> Result<(), RegistryError> {
    let mut seen_names = HashSet::new();

    for operation in &snapshot.operations {
        if !seen_names.insert(&operation.name) {
            return Err(RegistryError::validation(format!(
                "Duplicate operation name '{}'",
                operation.name
            )));
        }

        validate_arguments(operation)?;
    }

    Ok(())
}

/// Validates the arguments of one operation.
fn validate_arguments(operation: &OperationDef) -> Result<(), RegistryError> {
    let mut seen_names = HashSet::new();

    for argument in &operation.arguments {
        if !seen_names.insert(&argument.name) {
            return Err(RegistryError::validation(format!(
                "Duplicate argument '{}' in operation '{}'",
                argument.name, operation.name
            )));
        }

        if argument.type_name.is_empty() {
            return Err(RegistryError::validation(format!(
                "Argument '{}' in operation '{}' has no type",
                argument.name, operation.name
            )));
        }
    }

    Ok(())
}

/// Validates all enum and flags definitions in the snapshot.
fn validate_enums(snapshot: &RegistrySnapshot) -> Result<(), RegistryError> {
    let mut seen_names = HashSet::new();

    for enum_def in &snapshot.enums {
        if !seen_names.insert(&enum_def.name) {
            return Err(RegistryError::validation(format!(
                "Duplicate {} type '{}'",
                enum_def.kind.element_name(),
                enum_def.name
            )));
        }

        validate_enum_values(enum_def)?;
    }

    Ok(())
}

/// Validates the values of one enum or flags type.
fn validate_enum_values(enum_def: &EnumDef) -> Result<(), RegistryError> {
    let mut seen_nicks = HashSet::new();

    for nick in &enum_def.values {
        if !seen_nicks.insert(nick) {
            return Err(RegistryError::validation(format!(
                "Duplicate value '{}' in {} '{}'",
                nick,
                enum_def.kind.element_name(),
                enum_def.name
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_snapshot;

    fn validate(xml: &str) -> Result<(), RegistryError> {
        let snapshot = parse_snapshot(xml).expect("Failed to parse");
        validate_snapshot(&snapshot)
    }

    #[test]
    fn test_validate_valid_snapshot() {
        let xml = r#"<registry library="vips" version="8.16.0">
    <operations>
        <operation name="invert">
            <argument name="in" type="VipsImage" flags="required construct input"/>
            <argument name="out" type="VipsImage" flags="required construct output"/>
        </operation>
    </operations>
    <enums><enum name="VipsAccess"><value nick="random"/><value nick="sequential"/></enum></enums>
</registry>"#;

        assert!(validate(xml).is_ok());
    }

    #[test]
    fn test_validate_cyclic_hierarchy() {
        let xml = r#"<registry><hierarchy>
    <type name="VipsA"><type name="VipsB"/></type>
    <type name="VipsB"><type name="VipsA"/></type>
</hierarchy></registry>"#;

        let err = validate(xml).unwrap_err();
        assert!(matches!(err, RegistryError::Validation { .. }));
        assert!(err.to_string().contains("is its own ancestor"));
    }

    #[test]
    fn test_validate_shared_subtree_is_not_a_cycle() {
        let xml = r#"<registry><hierarchy>
    <type name="VipsOperation">
        <type name="VipsArithmetic"><type name="VipsInvert"/></type>
        <type name="VipsUnary"><type name="VipsInvert"/></type>
    </type>
</hierarchy></registry>"#;

        assert!(validate(xml).is_ok());
    }

    #[test]
    fn test_validate_duplicate_operation() {
        let xml = r#"<registry><operations>
    <operation name="invert"/>
    <operation name="invert"/>
</operations></registry>"#;

        let result = validate(xml);
        assert!(matches!(result, Err(RegistryError::Validation { .. })));
    }

    #[test]
    fn test_validate_duplicate_argument() {
        let xml = r#"<registry><operations>
    <operation name="invert">
        <argument name="in" type="VipsImage" flags="input"/>
        <argument name="in" type="VipsImage" flags="input"/>
    </operation>
</operations></registry>"#;

        assert!(validate(xml).is_err());
    }

    #[test]
    fn test_validate_untyped_argument() {
        let xml = r#"<registry><operations>
    <operation name="invert"><argument name="in" flags="input"/></operation>
</operations></registry>"#;

        let err = validate(xml).unwrap_err();
        assert!(err.to_string().contains("has no type"));
    }

    #[test]
    fn test_validate_duplicate_enum_value() {
        let xml = r#"<registry><enums>
    <flags name="VipsForeignPngFilter"><value nick="none"/><value nick="none"/></flags>
</enums></registry>"#;

        let err = validate(xml).unwrap_err();
        assert!(err.to_string().contains("Duplicate value 'none' in flags"));
    }

    #[test]
    fn test_validate_duplicate_enum_type() {
        let xml = r#"<registry><enums>
    <enum name="VipsAccess"/>
    <flags name="VipsAccess"/>
</enums></registry>"#;

        assert!(validate(xml).is_err());
    }
}
