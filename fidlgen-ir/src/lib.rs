//! # fidlgen IR
//!
//! FIDL JSON intermediate representation: the input of the Dart middle-end.
//!
//! This crate provides:
//! - Serde definitions for every declaration kind in the JSON IR
//! - Ingestion of both union representations into one `UnionDecl`
//! - Compound identifier parsing
//! - Consistency validation of a parsed library

pub mod decls;
pub mod error;
pub mod identifier;
pub mod types;
pub mod validation;

pub use decls::{
    ActiveMember, BitsDecl, BitsMember, ConstDecl, DeclKind, DeclarationTable, EnumDecl,
    EnumMember, InterfaceDecl, LibraryDependency, Method, OrdinalMember, Parameter, Root,
    Strictness, StructDecl, StructMember, TableDecl, UnionDecl,
};
pub use error::IrError;
pub use identifier::{CompoundIdentifier, EncodedCompoundIdentifier, LibraryIdentifier};
pub use types::{
    Attribute, Attributes, Constant, HandleSubtype, Literal, LiteralKind, PrimitiveSubtype, Type,
};
pub use validation::validate_root;
