//! The compiled tree handed to the template emitter.
//!
//! Everything here is fully resolved: the emitter performs textual substitution and
//! list iteration only. The tree serializes to JSON for out-of-process emitters.

use fidlgen_ir::Strictness;
use serde::Serialize;

/// One type at every call-site spelling the templates need.
///
/// All declaration forms describe the same underlying type; nullability is applied
/// to all of them or to none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Type {
    /// General declaration.
    pub decl: String,
    /// Declaration in synchronous bindings.
    pub sync_decl: String,
    /// Declaration in asynchronous bindings.
    pub async_decl: String,
    /// Typed-data list for numeric primitives, used when they appear as elements.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub typed_data_decl: Option<String>,
    /// Runtime type descriptor expression.
    pub type_expr: String,
    /// Whether the declarations carry the nullable annotation.
    pub nullable: bool,
}

impl Type {
    /// Returns the general declaration without the nullable annotation.
    #[must_use]
    pub fn base_decl(&self) -> &str {
        if self.nullable {
            self.decl.strip_suffix('?').unwrap_or(&self.decl)
        } else {
            &self.decl
        }
    }
}

/// Library import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Import {
    /// Async bindings URL.
    pub async_url: String,
    /// Test bindings URL.
    pub test_url: String,
    /// Import prefix.
    pub local_name: String,
}

/// Top-level constant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Const {
    /// Constant name.
    pub name: String,
    /// Declared type.
    #[serde(rename = "type")]
    pub ty: Type,
    /// Value expression.
    pub value: String,
    /// Documentation lines.
    pub doc: Vec<String>,
}

/// Enum declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Enum {
    /// Class name.
    pub name: String,
    /// Members.
    pub members: Vec<EnumMember>,
    /// Descriptor symbol.
    pub type_symbol: String,
    /// Descriptor expression.
    pub type_expr: String,
    /// Documentation lines.
    pub doc: Vec<String>,
}

/// Enum or bits member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumMember {
    /// Constant name.
    pub name: String,
    /// Value expression.
    pub value: String,
    /// Documentation lines.
    pub doc: Vec<String>,
}

/// Bits declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bits {
    /// Class name.
    pub name: String,
    /// Underlying type.
    #[serde(rename = "type")]
    pub ty: Type,
    /// Formatted mask of all members, when the IR provides one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mask: Option<String>,
    /// Members.
    pub members: Vec<EnumMember>,
    /// Descriptor symbol.
    pub type_symbol: String,
    /// Descriptor expression.
    pub type_expr: String,
    /// Documentation lines.
    pub doc: Vec<String>,
}

/// Struct declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Struct {
    /// Class name.
    pub name: String,
    /// Members in wire order.
    pub members: Vec<StructMember>,
    /// Inline size in bytes.
    pub size: u32,
    /// Descriptor symbol.
    pub type_symbol: String,
    /// Descriptor expression.
    pub type_expr: String,
    /// True if any member is nullable.
    pub has_nullable_field: bool,
    /// Documentation lines.
    pub doc: Vec<String>,
}

/// Struct member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructMember {
    /// Member type.
    #[serde(rename = "type")]
    pub ty: Type,
    /// Field name.
    pub name: String,
    /// Byte offset.
    pub offset: u32,
    /// Default value expression.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    /// `MemberType` descriptor.
    pub type_expr: String,
    /// Documentation lines.
    pub doc: Vec<String>,
}

/// Table declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table {
    /// Class name.
    pub name: String,
    /// Active members in source order.
    pub members: Vec<TableMember>,
    /// Reserved ordinals, kept for traceability.
    pub reserved_ordinals: Vec<u32>,
    /// Inline size in bytes.
    pub size: u32,
    /// Descriptor symbol.
    pub type_symbol: String,
    /// Descriptor expression.
    pub type_expr: String,
    /// Documentation lines.
    pub doc: Vec<String>,
}

/// Table member. Its declarations are always nullable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableMember {
    /// Wire ordinal.
    pub ordinal: u32,
    /// Member type.
    #[serde(rename = "type")]
    pub ty: Type,
    /// Field name.
    pub name: String,
    /// Documentation lines.
    pub doc: Vec<String>,
}

/// Tagged union, compiled from either IR representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Union {
    /// Class name.
    pub name: String,
    /// Tag enum name.
    pub tag_name: String,
    /// Tag enum constants; `$unknown` leads for flexible unions.
    pub tags: Vec<String>,
    /// Active members in source order.
    pub members: Vec<UnionMember>,
    /// Reserved ordinals, kept for traceability.
    pub reserved_ordinals: Vec<u32>,
    /// Descriptor symbol.
    pub type_symbol: String,
    /// Descriptor expression.
    pub type_expr: String,
    /// Nullable descriptor symbol.
    pub opt_type_symbol: String,
    /// Nullable descriptor expression.
    pub opt_type_expr: String,
    /// Strictness.
    pub strictness: Strictness,
    /// Documentation lines.
    pub doc: Vec<String>,
}

impl Union {
    /// Returns true if unknown ordinals decode to the `$unknown` tag.
    #[must_use]
    pub const fn is_flexible(&self) -> bool {
        self.strictness.is_flexible()
    }
}

/// Union member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnionMember {
    /// Wire ordinal.
    pub ordinal: u32,
    /// Member type.
    #[serde(rename = "type")]
    pub ty: Type,
    /// Accessor name.
    pub name: String,
    /// Named-constructor suffix (`withFoo`).
    pub ctor_name: String,
    /// Tag enum constant.
    pub tag: String,
    /// Documentation lines.
    pub doc: Vec<String>,
}

/// Protocol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Interface {
    /// Interface name.
    pub name: String,
    /// Discoverable service name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
    /// Proxy class name.
    pub proxy_name: String,
    /// Binding class name.
    pub binding_name: String,
    /// Events class name.
    pub events_name: String,
    /// Methods and events in declaration order.
    pub methods: Vec<Method>,
    /// True if any method is an event.
    pub has_events: bool,
    /// Documentation lines.
    pub doc: Vec<String>,
}

/// Protocol method or event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Method {
    /// Wire ordinal.
    pub ordinal: u64,
    /// Ordinal constant name.
    pub ordinal_name: String,
    /// Method name.
    pub name: String,
    /// False for events.
    pub has_request: bool,
    /// Request parameters.
    pub request: Vec<Parameter>,
    /// False for one-way methods.
    pub has_response: bool,
    /// Response parameters.
    pub response: Vec<Parameter>,
    /// Response holder class, for responses with more than one parameter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub async_response_class: Option<String>,
    /// Future value type in the async bindings.
    pub async_response_type: String,
    /// Descriptor symbol.
    pub type_symbol: String,
    /// `MethodType` descriptor expression.
    pub type_expr: String,
    /// Documentation lines.
    pub doc: Vec<String>,
}

/// Method parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Parameter {
    /// Parameter type.
    #[serde(rename = "type")]
    pub ty: Type,
    /// Parameter name.
    pub name: String,
    /// Byte offset within the message.
    pub offset: u32,
    /// `MemberType` descriptor.
    pub type_expr: String,
}

/// One compiled declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Declaration {
    /// Constant.
    Const(Const),
    /// Enum.
    Enum(Enum),
    /// Bits.
    Bits(Bits),
    /// Struct.
    Struct(Struct),
    /// Table.
    Table(Table),
    /// Union of either representation.
    Union(Union),
    /// Protocol.
    Interface(Interface),
}

impl Declaration {
    /// Returns the compiled name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Const(d) => &d.name,
            Self::Enum(d) => &d.name,
            Self::Bits(d) => &d.name,
            Self::Struct(d) => &d.name,
            Self::Table(d) => &d.name,
            Self::Union(d) => &d.name,
            Self::Interface(d) => &d.name,
        }
    }
}

/// Compiled library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tree {
    /// Library name.
    pub library_name: String,
    /// Dependency imports.
    pub imports: Vec<Import>,
    /// Declarations in declaration order.
    pub declarations: Vec<Declaration>,
}

macro_rules! kind_accessor {
    ($(#[$doc:meta])* $fn_name:ident, $variant:ident, $ty:ty) => {
        $(#[$doc])*
        pub fn $fn_name(&self) -> impl Iterator<Item = &$ty> {
            self.declarations.iter().filter_map(|decl| match decl {
                Declaration::$variant(inner) => Some(inner),
                _ => None,
            })
        }
    };
}

impl Tree {
    kind_accessor!(
        /// Constants in declaration order.
        consts, Const, Const
    );
    kind_accessor!(
        /// Enums in declaration order.
        enums, Enum, Enum
    );
    kind_accessor!(
        /// Bits in declaration order.
        bits, Bits, Bits
    );
    kind_accessor!(
        /// Structs in declaration order.
        structs, Struct, Struct
    );
    kind_accessor!(
        /// Tables in declaration order.
        tables, Table, Table
    );
    kind_accessor!(
        /// Unions of both representations in declaration order.
        unions, Union, Union
    );
    kind_accessor!(
        /// Interfaces in declaration order.
        interfaces, Interface, Interface
    );

    /// Serializes the tree for an out-of-process emitter.
    ///
    /// # Errors
    /// Returns `serde_json::Error` if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
