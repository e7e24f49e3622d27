//! # fidlgen
//!
//! Compiles the FIDL JSON intermediate representation into a fully resolved model
//! from which Dart bindings are rendered by a template emitter.
//!
//! ## Quick Start
//!
//! ```ignore
//! use fidlgen::prelude::*;
//!
//! let tree = compile_from_file(std::path::Path::new("echo.fidl.json"))?;
//! for union in tree.unions() {
//!     println!("{} -> {}", union.name, union.type_symbol);
//! }
//! ```
//!
//! ## Crate Organization
//!
//! - [`ir`] - JSON IR definitions, identifier parsing and validation
//! - [`dart`] - Dart type, constant and union resolution plus the compilation driver

pub mod prelude;

/// JSON IR definitions.
pub mod ir {
    pub use fidlgen_ir::*;
}

/// Dart middle-end.
pub mod dart {
    pub use fidlgen_dart::*;
}

// Re-export commonly used items at the crate root
pub use fidlgen_dart::{
    CompileError, Compiler, CompilerConfig, Tree, compile, compile_from_file, compile_from_json,
    compile_with_config,
};
pub use fidlgen_ir::{IrError, Root};

#[cfg(test)]
mod tests {
    use super::*;

    const SHAPES_IR: &str = include_str!("../demos/example.fidl.json");

    #[test]
    fn test_compile_bundled_library() {
        let tree = compile_from_json(SHAPES_IR).expect("Failed to compile");

        let names: Vec<_> = tree.declarations.iter().map(|d| d.name()).collect();
        assert_eq!(
            names,
            vec!["Style", "maxPoints", "Color", "Point", "Paint", "Shape", "Canvas"]
        );

        let shape = tree.unions().next().expect("Missing union");
        assert!(shape.is_flexible());
        assert_eq!(shape.tags, vec!["$unknown", "polygon", "radius"]);
        assert_eq!(shape.reserved_ordinals, vec![0xbeefbabe]);
        assert_eq!(shape.members[0].ty.decl, "List<Point>");
        assert_eq!(shape.members[1].ty.decl, "double");

        let paint = tree.tables().next().expect("Missing table");
        assert_eq!(paint.members[0].ty.decl, "Color?");
        assert_eq!(paint.members[1].ty.type_expr, "kStyle_Type");

        let canvas = tree.interfaces().next().expect("Missing interface");
        assert_eq!(canvas.service_name.as_deref(), Some("fidl.examples.shapes.Canvas"));
        assert_eq!(canvas.methods[0].request[0].ty.type_expr, "kShape_Type");
        assert_eq!(
            canvas.methods[1].async_response_class.as_deref(),
            Some("Canvas$OnResize$Response")
        );
    }

    #[test]
    fn test_tree_serializes() {
        let tree = compile_from_json(SHAPES_IR).expect("Failed to compile");
        let json = tree.to_json().expect("Failed to serialize");
        assert!(json.contains("\"kind\": \"union\""));
        assert!(json.contains("\"strictness\": \"flexible\""));
    }
}
