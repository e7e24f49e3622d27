//! Prelude module for convenient imports.
//!
//! ```ignore
//! use fidlgen::prelude::*;
//! ```

// Input
pub use fidlgen_ir::{DeclKind, EncodedCompoundIdentifier, IrError, Root, Strictness};

// Compilation
pub use fidlgen_dart::{
    CompileError, Compiler, CompilerConfig, compile, compile_from_file, compile_from_json,
    compile_with_config,
};

// Compiled tree
pub use fidlgen_dart::tree::{
    Bits, Const, Declaration, Enum, Import, Interface, Method, Parameter, Struct, StructMember,
    Table, TableMember, Tree, Type, Union, UnionMember,
};
