//! Dart naming policy.
//!
//! Every generated identifier goes through one of the casing transforms here and is
//! then escaped with a trailing `$` when it would collide with a Dart keyword or with
//! a name the generated code already uses in that position. FIDL identifiers cannot
//! contain `$`, so escaped names never collide with declared ones.

use fidlgen_ir::LibraryIdentifier;
use heck::{ToLowerCamelCase, ToUpperCamelCase};

/// Dart keywords and built-in identifiers.
const RESERVED_WORDS: &[&str] = &[
    "abstract", "as", "assert", "async", "await", "break", "case", "catch", "class", "const",
    "continue", "covariant", "default", "deferred", "do", "dynamic", "else", "enum", "export",
    "extends", "extension", "external", "factory", "false", "final", "finally", "for",
    "Function", "get", "hide", "if", "implements", "import", "in", "interface", "is", "late",
    "library", "mixin", "new", "null", "on", "operator", "part", "required", "rethrow",
    "return", "set", "show", "static", "super", "switch", "sync", "this", "throw", "true",
    "try", "typedef", "var", "void", "while", "with", "yield",
];

/// `dart:core` types a declaration must not shadow.
const DECLARATION_RESERVED: &[&str] = &[
    "bool", "double", "Duration", "Future", "int", "Iterable", "List", "Map", "Null", "num",
    "Object", "Set", "Stream", "String", "Symbol", "Type",
];

/// Members every generated class inherits from `Object`.
const MEMBER_RESERVED: &[&str] = &["hashCode", "noSuchMethod", "runtimeType", "toString"];

/// Names the generated proxy classes already define.
const METHOD_RESERVED: &[&str] = &[
    "ctrl",
    "hashCode",
    "noSuchMethod",
    "runtimeType",
    "toString",
];

/// Static members of the generated enum and bits classes.
const ENUM_MEMBER_RESERVED: &[&str] = &[
    "hashCode",
    "noSuchMethod",
    "runtimeType",
    "toString",
    "value",
    "values",
    "valuesMap",
];

/// Position a generated name will occupy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameContext {
    /// Top-level class name.
    Declaration,
    /// Field, accessor or parameter.
    Member,
    /// Proxy/binding method.
    Method,
    /// Enum, bits or union-tag constant.
    EnumMember,
    /// Top-level constant.
    Constant,
}

impl NameContext {
    fn reserved(&self) -> &'static [&'static str] {
        match self {
            Self::Declaration => DECLARATION_RESERVED,
            Self::Member => MEMBER_RESERVED,
            Self::Method => METHOD_RESERVED,
            Self::EnumMember => ENUM_MEMBER_RESERVED,
            Self::Constant => &[],
        }
    }
}

/// Appends `$` to names that are reserved in the given context.
#[must_use]
pub fn change_if_reserved(name: String, context: NameContext) -> String {
    let word = name.as_str();
    if RESERVED_WORDS.contains(&word) || context.reserved().contains(&word) {
        format!("{name}$")
    } else {
        name
    }
}

/// Converts to UpperCamelCase and escapes.
#[must_use]
pub fn upper_camel(name: &str, context: NameContext) -> String {
    change_if_reserved(name.to_upper_camel_case(), context)
}

/// Converts to lowerCamelCase and escapes.
#[must_use]
pub fn lower_camel(name: &str, context: NameContext) -> String {
    change_if_reserved(name.to_lower_camel_case(), context)
}

/// Import prefix for a dependency library: `lib$fuchsia_mem`.
#[must_use]
pub fn library_prefix(library: &LibraryIdentifier) -> String {
    format!("lib${}", library.join("_"))
}

/// Runtime descriptor symbol of a declaration.
#[must_use]
pub fn type_symbol(name: &str) -> String {
    format!("k{name}_Type")
}

/// Runtime descriptor symbol of a declaration's nullable form.
#[must_use]
pub fn opt_type_symbol(name: &str) -> String {
    format!("k{name}_OptType")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upper_camel() {
        assert_eq!(upper_camel("i", NameContext::Member), "I");
        assert_eq!(upper_camel("some_struct", NameContext::Declaration), "SomeStruct");
        assert_eq!(upper_camel("Test", NameContext::Declaration), "Test");
    }

    #[test]
    fn test_lower_camel() {
        assert_eq!(lower_camel("i", NameContext::EnumMember), "i");
        assert_eq!(lower_camel("MAX_SIZE", NameContext::Constant), "maxSize");
        assert_eq!(lower_camel("first_name", NameContext::Member), "firstName");
    }

    #[test]
    fn test_reserved_words_are_escaped() {
        assert_eq!(lower_camel("switch", NameContext::Member), "switch$");
        assert_eq!(lower_camel("to_string", NameContext::Member), "toString$");
        assert_eq!(upper_camel("string", NameContext::Declaration), "String$");
        assert_eq!(lower_camel("VALUES", NameContext::EnumMember), "values$");
        assert_eq!(lower_camel("ctrl", NameContext::Method), "ctrl$");
    }

    #[test]
    fn test_context_specific_reservation() {
        // Only reserved where the generated class already defines the name.
        assert_eq!(lower_camel("ctrl", NameContext::Member), "ctrl");
        assert_eq!(lower_camel("values", NameContext::Member), "values");
        assert_eq!(upper_camel("list", NameContext::Member), "List");
    }

    #[test]
    fn test_library_prefix() {
        let lib = LibraryIdentifier::parse("fuchsia.mem");
        assert_eq!(library_prefix(&lib), "lib$fuchsia_mem");
    }

    #[test]
    fn test_type_symbols() {
        assert_eq!(type_symbol("Test"), "kTest_Type");
        assert_eq!(opt_type_symbol("Test"), "kTest_OptType");
    }
}
