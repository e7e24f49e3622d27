//! # fidlgen Dart
//!
//! Dart middle-end for the FIDL JSON IR.
//!
//! This crate provides:
//! - Type resolution into every Dart call-site spelling plus a runtime descriptor
//! - Lossless numeric literal formatting
//! - Normalization of static and extensible unions into one tagged-union model
//! - A declaration-order driver producing a [`Tree`] for the template emitter

pub mod compiler;
pub mod config;
pub mod dart;
pub mod error;
pub mod names;
pub mod tree;

pub use compiler::Compiler;
pub use config::CompilerConfig;
pub use error::CompileError;
pub use tree::Tree;

use fidlgen_ir::Root;

/// Compiles a parsed library with the default configuration.
///
/// # Errors
/// Returns `CompileError` if the IR is inconsistent or any declaration fails to
/// resolve; no partial tree is returned.
pub fn compile(root: &Root) -> Result<Tree, CompileError> {
    compile_with_config(root, CompilerConfig::default())
}

/// Compiles a parsed library.
///
/// # Errors
/// Returns `CompileError` if the IR is inconsistent or any declaration fails to
/// resolve; no partial tree is returned.
pub fn compile_with_config(root: &Root, config: CompilerConfig) -> Result<Tree, CompileError> {
    fidlgen_ir::validate_root(root)?;
    Compiler::new(root, config).compile()
}

/// Compiles a library from JSON IR text.
///
/// # Arguments
/// * `json` - JSON IR document
///
/// # Errors
/// Returns `CompileError` if parsing or compilation fails.
pub fn compile_from_json(json: &str) -> Result<Tree, CompileError> {
    let root = Root::from_json(json)?;
    compile(&root)
}

/// Compiles a library from a JSON IR file.
///
/// # Arguments
/// * `path` - Path to the JSON IR file
///
/// # Errors
/// Returns `CompileError` if reading, parsing, or compilation fails.
pub fn compile_from_file(path: &std::path::Path) -> Result<Tree, CompileError> {
    let json = std::fs::read_to_string(path)?;
    compile_from_json(&json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const LIBRARY_JSON: &str = r#"{
        "name": "fidl.test",
        "struct_declarations": [{
            "name": "fidl.test/Empty",
            "members": [],
            "size": 1
        }],
        "declaration_order": ["fidl.test/Empty"],
        "declarations": {"fidl.test/Empty": "struct"}
    }"#;

    #[test]
    fn test_compile_from_json() {
        let tree = compile_from_json(LIBRARY_JSON).expect("Failed to compile");
        assert_eq!(tree.library_name, "fidl.test");
        assert_eq!(tree.structs().count(), 1);
    }

    #[test]
    fn test_compile_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(LIBRARY_JSON.as_bytes())
            .expect("Failed to write IR");

        let tree = compile_from_file(file.path()).expect("Failed to compile");
        assert_eq!(tree.declarations[0].name(), "Empty");
    }

    #[test]
    fn test_compile_from_missing_file() {
        let err = compile_from_file(std::path::Path::new("/nonexistent/ir.json"))
            .expect_err("Expected IO error");
        assert!(matches!(err, CompileError::Io(_)));
    }

    #[test]
    fn test_inconsistent_ir_is_rejected() {
        let json = LIBRARY_JSON.replace(
            r#""fidl.test/Empty": "struct""#,
            r#""fidl.test/Empty": "table""#,
        );
        let err = compile_from_json(&json).expect_err("Expected kind mismatch");
        assert!(matches!(err, CompileError::Ir(fidlgen_ir::IrError::KindMismatch { .. })));
    }

    #[test]
    fn test_listed_but_undeclared_is_rejected() {
        let json = LIBRARY_JSON.replace(
            r#""fidl.test/Empty": "struct""#,
            r#""fidl.test/Empty": "struct", "fidl.test/Ghost": "struct""#,
        );
        let err = compile_from_json(&json).expect_err("Expected missing declaration");
        assert!(matches!(
            err,
            CompileError::Ir(fidlgen_ir::IrError::MissingDeclaration { .. })
        ));
    }

    #[test]
    fn test_custom_runtime_alias() {
        let root = Root::from_json(LIBRARY_JSON).expect("Failed to parse IR");
        let config = CompilerConfig::new().runtime_alias("fidl");
        let tree = compile_with_config(&root, config).expect("Failed to compile");
        let empty = tree.structs().next().expect("Missing struct");
        assert!(empty.type_expr.starts_with("fidl.StructType<Empty>("));
    }
}
