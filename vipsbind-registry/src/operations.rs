//! Operation definitions for registry snapshots.
//!
//! This module contains the raw, unclassified operation data exactly as the
//! native registry reports it: the argument list in declaration order and the
//! argument flag bits.

use std::fmt;

/// Argument flag bits, mirroring the native library's argument flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ArgumentFlags(u8);

impl ArgumentFlags {
    /// The operation cannot run without this argument.
    pub const REQUIRED: Self = Self(1);
    /// Set at construction time.
    pub const CONSTRUCT: Self = Self(2);
    /// Can only be set once.
    pub const SET_ONCE: Self = Self(4);
    /// Must be set even when it has a default.
    pub const SET_ALWAYS: Self = Self(8);
    /// Value flows into the operation.
    pub const INPUT: Self = Self(16);
    /// Value flows out of the operation.
    pub const OUTPUT: Self = Self(32);
    /// Kept for compatibility only.
    pub const DEPRECATED: Self = Self(64);
    /// The operation modifies this input in place.
    pub const MODIFY: Self = Self(128);

    const TOKENS: [(&'static str, Self); 8] = [
        ("required", Self::REQUIRED),
        ("construct", Self::CONSTRUCT),
        ("set-once", Self::SET_ONCE),
        ("set-always", Self::SET_ALWAYS),
        ("input", Self::INPUT),
        ("output", Self::OUTPUT),
        ("deprecated", Self::DEPRECATED),
        ("modify", Self::MODIFY),
    ];

    /// Returns the empty flag set.
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Returns true if every bit of `other` is set.
    #[must_use]
    pub const fn contains(&self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns the union of both flag sets.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Parses a whitespace-separated token list such as `"required input"`.
    ///
    /// Returns the first unknown token on failure.
    pub fn parse(tokens: &str) -> Result<Self, String> {
        let mut flags = Self::empty();
        for token in tokens.split_whitespace() {
            let (_, flag) = Self::TOKENS
                .iter()
                .find(|(name, _)| *name == token)
                .ok_or_else(|| token.to_string())?;
            flags = flags.union(*flag);
        }
        Ok(flags)
    }
}

impl std::ops::BitOr for ArgumentFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl fmt::Display for ArgumentFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = Self::TOKENS
            .iter()
            .filter(|(_, flag)| self.contains(*flag))
            .map(|(name, _)| *name)
            .collect();
        f.write_str(&names.join(" "))
    }
}

/// One argument of an operation as declared in the registry.
#[derive(Debug, Clone)]
pub struct ArgumentDef {
    /// Argument name in registry form (may contain hyphens).
    pub name: String,
    /// Registry type name of the value.
    pub type_name: String,
    /// Argument flags.
    pub flags: ArgumentFlags,
    /// Short human-readable description.
    pub blurb: String,
}

impl ArgumentDef {
    /// Creates a new argument definition.
    #[must_use]
    pub fn new(name: String, type_name: String, flags: ArgumentFlags) -> Self {
        Self {
            name,
            type_name,
            flags,
            blurb: String::new(),
        }
    }
}

/// Operation definition.
#[derive(Debug, Clone)]
pub struct OperationDef {
    /// Operation nickname.
    pub name: String,
    /// One-line description.
    pub description: String,
    /// Whether the operation is deprecated.
    pub deprecated: bool,
    /// Arguments in declaration order.
    pub arguments: Vec<ArgumentDef>,
}

impl OperationDef {
    /// Creates a new operation definition.
    #[must_use]
    pub fn new(name: String) -> Self {
        Self {
            name,
            description: String::new(),
            deprecated: false,
            arguments: Vec::new(),
        }
    }

    /// Adds an argument to the operation.
    pub fn add_argument(&mut self, argument: ArgumentDef) {
        self.arguments.push(argument);
    }

    /// Looks up an argument by name.
    #[must_use]
    pub fn get_argument(&self, name: &str) -> Option<&ArgumentDef> {
        self.arguments.iter().find(|a| a.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        let flags = ArgumentFlags::parse("required construct input").expect("valid flags");
        assert!(flags.contains(ArgumentFlags::REQUIRED));
        assert!(flags.contains(ArgumentFlags::INPUT));
        assert!(!flags.contains(ArgumentFlags::OUTPUT));
        assert_eq!(
            flags,
            ArgumentFlags::REQUIRED | ArgumentFlags::CONSTRUCT | ArgumentFlags::INPUT
        );
    }

    #[test]
    fn test_parse_flags_unknown_token() {
        let err = ArgumentFlags::parse("required sideways").unwrap_err();
        assert_eq!(err, "sideways");
    }

    #[test]
    fn test_parse_flags_empty() {
        let flags = ArgumentFlags::parse("  ").expect("empty is valid");
        assert_eq!(flags, ArgumentFlags::empty());
    }

    #[test]
    fn test_flags_display() {
        let flags = ArgumentFlags::REQUIRED | ArgumentFlags::OUTPUT;
        assert_eq!(flags.to_string(), "required output");
    }

    #[test]
    fn test_operation_get_argument() {
        let mut op = OperationDef::new("invert".to_string());
        op.add_argument(ArgumentDef::new(
            "in".to_string(),
            "VipsImage".to_string(),
            ArgumentFlags::REQUIRED | ArgumentFlags::INPUT,
        ));

        assert!(op.get_argument("in").is_some());
        assert!(op.get_argument("out").is_none());
    }
}
