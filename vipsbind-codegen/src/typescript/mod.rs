//! TypeScript declaration generation modules.

pub mod declarations;
pub mod enums;

pub use declarations::DeclarationGenerator;
pub use enums::TsEnumGenerator;

/// Indentation of class members.
pub(crate) const MEMBER_INDENT: &str = "        ";
