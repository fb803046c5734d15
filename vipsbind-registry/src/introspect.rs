//! Operation introspection.
//!
//! Turns the raw argument list of an operation into an
//! [`OperationDescriptor`]: required inputs, required outputs, optional
//! inputs and optional outputs, with the receiver split out.

use crate::error::RegistryError;
use crate::ir::{ArgumentDescriptor, Direction, EnumDescriptor, OperationDescriptor, TypeRef, ValueKind};
use crate::operations::{ArgumentDef, ArgumentFlags};
use crate::registry::TypeRegistry;

/// Builds descriptors from a registry.
pub struct Introspector<'a, R: TypeRegistry + ?Sized> {
    registry: &'a R,
}

impl<'a, R: TypeRegistry + ?Sized> Introspector<'a, R> {
    /// Creates an introspector over a registry.
    #[must_use]
    pub const fn new(registry: &'a R) -> Self {
        Self { registry }
    }

    /// Builds the signature descriptor of one operation.
    ///
    /// Only construct-time arguments take part in the signature. Argument
    /// order within each list follows declaration order.
    ///
    /// # Errors
    /// Returns the registry's lookup error if the name does not resolve to
    /// an instantiable operation.
    pub fn introspect(&self, name: &str) -> Result<OperationDescriptor, RegistryError> {
        let def = self.registry.operation(name)?;

        let mut desc = OperationDescriptor::new(def.name.clone());
        desc.description = def.description.clone();
        desc.deprecated = def.deprecated;

        for arg in &def.arguments {
            let flags = arg.flags;
            if !flags.contains(ArgumentFlags::CONSTRUCT) {
                continue;
            }
            let required = flags.contains(ArgumentFlags::REQUIRED);
            let deprecated = flags.contains(ArgumentFlags::DEPRECATED);
            let input = flags.contains(ArgumentFlags::INPUT);
            let output = flags.contains(ArgumentFlags::OUTPUT);

            if required && input && !deprecated {
                let descriptor = self.describe(arg, Direction::Input);
                if flags.contains(ArgumentFlags::MODIFY) {
                    let mut modified = descriptor.clone();
                    modified.direction = Direction::Output;
                    desc.required_output.push(modified);
                }
                desc.required_input.push(descriptor);
            }
            if required && output && !deprecated {
                desc.required_output.push(self.describe(arg, Direction::Output));
            }
            if input && !required {
                desc.optional_input.push(self.describe(arg, Direction::Input));
            }
            if output && !required {
                desc.optional_output.push(self.describe(arg, Direction::Output));
            }
        }

        let receiver = desc
            .required_input
            .iter()
            .position(|arg| arg.kind() == Some(ValueKind::Image));
        if let Some(index) = receiver {
            let receiver = desc.required_input.remove(index);
            desc.required_output.retain(|arg| arg.name != receiver.name);
            desc.receiver = Some(receiver);
        }

        Ok(desc)
    }

    /// Builds the undocumented descriptor of an enum or flags type.
    ///
    /// # Errors
    /// Returns `RegistryError::UnknownType` if the type is not registered.
    pub fn enumeration(&self, type_name: &str) -> Result<EnumDescriptor, RegistryError> {
        self.registry
            .enumeration(type_name)
            .map(EnumDescriptor::from_def)
    }

    fn describe(&self, arg: &ArgumentDef, direction: Direction) -> ArgumentDescriptor {
        let type_ref = TypeRef::new(
            arg.type_name.clone(),
            self.registry.fundamental(&arg.type_name),
        );
        let mut descriptor = ArgumentDescriptor::new(
            arg.name.clone(),
            type_ref,
            arg.flags.contains(ArgumentFlags::REQUIRED),
            direction,
        );
        descriptor.blurb = arg.blurb.clone();
        descriptor.deprecated = arg.flags.contains(ArgumentFlags::DEPRECATED);
        descriptor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_snapshot;

    const SNAPSHOT: &str = r#"<registry library="vips" version="8.16.0">
    <hierarchy>
        <type name="VipsOperation" nickname="operation" abstract="true">
            <type name="VipsDrawRect" nickname="draw_rect"/>
            <type name="VipsMinPair" nickname="minpair"/>
            <type name="VipsBlack" nickname="black"/>
        </type>
        <type name="GEnum"><type name="VipsAccess"/></type>
    </hierarchy>
    <operations>
        <operation name="draw_rect" description="paint a rectangle on an image">
            <argument name="image" type="VipsImage" flags="required construct input modify" blurb="Image to draw on"/>
            <argument name="ink" type="VipsArrayDouble" flags="required construct input" blurb="Color for pixels"/>
            <argument name="fill" type="gboolean" flags="construct input" blurb="Draw a solid object"/>
        </operation>
        <operation name="minpair" description="minimum with positions">
            <argument name="in" type="VipsImage" flags="required construct input" blurb="Input image"/>
            <argument name="out" type="gdouble" flags="required construct output" blurb="Output value"/>
            <argument name="x" type="gint" flags="required construct output" blurb="Horizontal position"/>
            <argument name="y" type="gint" flags="required construct output" blurb="Vertical position"/>
            <argument name="size" type="gint" flags="construct input deprecated" blurb="Old size"/>
            <argument name="out-array" type="VipsArrayDouble" flags="construct output" blurb="Array of values"/>
            <argument name="nickname" type="gchararray" flags="input" blurb="Not a construct argument"/>
        </operation>
        <operation name="black" description="make a black image">
            <argument name="out" type="VipsImage" flags="required construct output" blurb="Output image"/>
            <argument name="width" type="gint" flags="required construct input" blurb="Image width in pixels"/>
            <argument name="access" type="VipsAccess" flags="construct input" blurb="Access pattern"/>
            <argument name="old-width" type="gint" flags="required construct input deprecated" blurb="Old"/>
        </operation>
    </operations>
    <enums><enum name="VipsAccess"><value nick="random"/></enum></enums>
</registry>"#;

    fn names(args: &[ArgumentDescriptor]) -> Vec<&str> {
        args.iter().map(|a| a.name.as_str()).collect()
    }

    #[test]
    fn test_static_operation() {
        let snapshot = parse_snapshot(SNAPSHOT).expect("Failed to parse snapshot");
        let desc = Introspector::new(&snapshot)
            .introspect("black")
            .expect("black resolves");

        assert!(!desc.is_instance_method());
        assert_eq!(names(&desc.required_input), ["width"]);
        assert_eq!(names(&desc.required_output), ["out"]);
        assert_eq!(names(&desc.optional_input), ["access"]);
        assert_eq!(desc.optional_input[0].type_ref, TypeRef::new("VipsAccess", "GEnum"));
        assert_eq!(desc.optional_input[0].kind(), Some(ValueKind::Enum));
    }

    #[test]
    fn test_receiver_is_split_out() {
        let snapshot = parse_snapshot(SNAPSHOT).expect("Failed to parse snapshot");
        let desc = Introspector::new(&snapshot)
            .introspect("minpair")
            .expect("minpair resolves");

        assert_eq!(desc.receiver.as_ref().map(|a| a.name.as_str()), Some("in"));
        assert!(desc.required_input.is_empty());
        assert_eq!(names(&desc.required_output), ["out", "x", "y"]);
        assert_eq!(names(&desc.optional_input), ["size"]);
        assert!(desc.optional_input[0].deprecated);
        assert_eq!(names(&desc.optional_output), ["out-array"]);
        assert_eq!(desc.optional_output[0].blurb, "Array of values");
    }

    #[test]
    fn test_modified_receiver_is_not_an_output() {
        let snapshot = parse_snapshot(SNAPSHOT).expect("Failed to parse snapshot");
        let desc = Introspector::new(&snapshot)
            .introspect("draw_rect")
            .expect("draw_rect resolves");

        assert_eq!(desc.receiver.as_ref().map(|a| a.name.as_str()), Some("image"));
        assert_eq!(names(&desc.required_input), ["ink"]);
        assert!(desc.is_void());
    }

    #[test]
    fn test_abstract_and_unknown_names() {
        let snapshot = parse_snapshot(SNAPSHOT).expect("Failed to parse snapshot");
        let introspector = Introspector::new(&snapshot);

        assert!(matches!(
            introspector.introspect("operation"),
            Err(RegistryError::AbstractType { .. })
        ));
        assert!(matches!(
            introspector.introspect("nothing"),
            Err(RegistryError::UnknownOperation { .. })
        ));
    }

    #[test]
    fn test_enumeration_descriptor() {
        let snapshot = parse_snapshot(SNAPSHOT).expect("Failed to parse snapshot");
        let introspector = Introspector::new(&snapshot);

        let access = introspector.enumeration("VipsAccess").expect("enum resolves");
        assert_eq!(access.values.len(), 1);
        assert!(access.doc.is_none());
        assert!(introspector.enumeration("VipsNothing").is_err());
    }
}
