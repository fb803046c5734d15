//! Name transforms shared by every emitter.
//!
//! All functions here are pure string transforms.

use once_cell::sync::Lazy;
use regex::Regex;

static FIRST_CAP: Lazy<Regex> =
    Lazy::new(|| Regex::new("(.)([A-Z][a-z]+)").expect("valid regex"));
static ALL_CAP: Lazy<Regex> = Lazy::new(|| Regex::new("([a-z0-9])([A-Z])").expect("valid regex"));

/// Suffix appended to operation names that are C++ keywords.
pub const CPP_KEYWORD_SUFFIX: &str = "_image";

/// Prefix prepended to argument names that are TypeScript reserved words.
pub const TS_KEYWORD_PREFIX: &str = "_";

/// C++ reserved words, including the alternative operator tokens.
pub const CPP_KEYWORDS: &[&str] = &[
    "alignas", "alignof", "and", "and_eq", "asm", "auto", "bitand", "bitor", "bool", "break",
    "case", "catch", "char", "char8_t", "char16_t", "char32_t", "class", "compl", "concept",
    "const", "consteval", "constexpr", "constinit", "const_cast", "continue", "co_await",
    "co_return", "co_yield", "decltype", "default", "delete", "do", "double", "dynamic_cast",
    "else", "enum", "explicit", "export", "extern", "false", "float", "for", "friend", "goto",
    "if", "inline", "int", "long", "mutable", "namespace", "new", "noexcept", "not", "not_eq",
    "nullptr", "operator", "or", "or_eq", "private", "protected", "public", "register",
    "reinterpret_cast", "requires", "return", "short", "signed", "sizeof", "static",
    "static_assert", "static_cast", "struct", "switch", "template", "this", "thread_local",
    "throw", "true", "try", "typedef", "typeid", "typename", "union", "unsigned", "using",
    "virtual", "void", "volatile", "wchar_t", "while", "xor", "xor_eq",
];

/// TypeScript reserved words.
pub const TS_KEYWORDS: &[&str] = &[
    "break", "case", "catch", "class", "const", "continue", "debugger", "default", "delete", "do",
    "else", "enum", "export", "extends", "false", "finally", "for", "function", "if", "import",
    "in", "instanceof", "new", "null", "return", "super", "switch", "this", "throw", "true", "try",
    "typeof", "var", "void", "while", "with",
];

/// Replaces hyphens with underscores.
#[must_use]
pub fn normalize(name: &str) -> String {
    name.replace('-', "_")
}

/// Converts `snake_case` to `camelCase`.
///
/// Every component after the first is title-cased: its first letter goes
/// upper-case and the rest lower-case.
#[must_use]
pub fn to_camel_case(name: &str) -> String {
    let mut parts = name.split('_');
    let mut result = parts.next().unwrap_or_default().to_string();
    for part in parts {
        result.push_str(&title(part));
    }
    result
}

/// Converts `CamelCase` to `snake_case`.
#[must_use]
pub fn to_snake_case(name: &str) -> String {
    let first = FIRST_CAP.replace_all(name, "${1}_${2}");
    ALL_CAP.replace_all(&first, "${1}_${2}").to_lowercase()
}

/// Title-cases a word: letters following a non-letter go upper-case, all
/// other letters lower-case.
#[must_use]
pub fn title(word: &str) -> String {
    let mut result = String::with_capacity(word.len());
    let mut after_letter = false;
    for c in word.chars() {
        if after_letter {
            result.extend(c.to_lowercase());
        } else {
            result.extend(c.to_uppercase());
        }
        after_letter = c.is_alphabetic();
    }
    result
}

/// Upper-cases the first character and lower-cases the rest.
#[must_use]
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Upper-cases the first character, leaving the rest untouched.
#[must_use]
pub fn upper_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Strips a library prefix if present.
#[must_use]
pub fn remove_prefix<'a>(name: &'a str, prefix: &str) -> &'a str {
    name.strip_prefix(prefix).unwrap_or(name)
}

/// Returns the C++ member name for an operation.
#[must_use]
pub fn cpp_member_name(operation: &str) -> String {
    let name = normalize(operation);
    if CPP_KEYWORDS.contains(&name.as_str()) {
        format!("{name}{CPP_KEYWORD_SUFFIX}")
    } else {
        name
    }
}

/// Returns the TypeScript name for an argument.
#[must_use]
pub fn ts_arg_name(argument: &str) -> String {
    let name = normalize(argument);
    if TS_KEYWORDS.contains(&name.as_str()) {
        format!("{TS_KEYWORD_PREFIX}{name}")
    } else {
        name
    }
}

/// Returns the `VIPS_TYPE_*` macro naming a registry type.
#[must_use]
pub fn type_macro(type_name: &str, prefix: &str) -> String {
    format!(
        "VIPS_TYPE_{}",
        to_snake_case(remove_prefix(type_name, prefix)).to_uppercase()
    )
}
