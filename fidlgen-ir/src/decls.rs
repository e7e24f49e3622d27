//! Declaration definitions.
//!
//! The two wire representations of tagged unions (statically ordinalled `union`
//! and extensible `xunion`) are ingested into the single [`UnionDecl`] shape with an
//! explicit [`Strictness`], so nothing downstream needs to know which one the IR used.

use crate::error::IrError;
use crate::identifier::EncodedCompoundIdentifier;
use crate::types::{Attributes, Constant, PrimitiveSubtype, Type};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Declaration kinds as spelled in the `declarations` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclKind {
    /// Constant.
    Const,
    /// Enumeration.
    Enum,
    /// Bit-flag set.
    Bits,
    /// Struct.
    Struct,
    /// Table.
    Table,
    /// Statically ordinalled union.
    Union,
    /// Extensible union.
    XUnion,
    /// Protocol.
    Interface,
}

impl DeclKind {
    /// Returns the IR spelling.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Const => "const",
            Self::Enum => "enum",
            Self::Bits => "bits",
            Self::Struct => "struct",
            Self::Table => "table",
            Self::Union => "union",
            Self::XUnion => "xunion",
            Self::Interface => "interface",
        }
    }

    /// Returns true for either union representation.
    #[must_use]
    pub const fn is_union(&self) -> bool {
        matches!(self, Self::Union | Self::XUnion)
    }
}

impl fmt::Display for DeclKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declaration-kind table keyed by encoded identifier.
pub type DeclarationTable = IndexMap<EncodedCompoundIdentifier, DeclKind>;

/// Root of a JSON IR document: one library.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Root {
    /// Library name, e.g. `fuchsia.io`.
    #[serde(default)]
    pub name: String,
    /// Libraries this one depends on.
    #[serde(default)]
    pub library_dependencies: Vec<LibraryDependency>,
    /// Constants.
    #[serde(default, rename = "const_declarations")]
    pub consts: Vec<ConstDecl>,
    /// Enums.
    #[serde(default, rename = "enum_declarations")]
    pub enums: Vec<EnumDecl>,
    /// Bit sets.
    #[serde(default, rename = "bits_declarations")]
    pub bits: Vec<BitsDecl>,
    /// Protocols.
    #[serde(default, rename = "interface_declarations")]
    pub interfaces: Vec<InterfaceDecl>,
    /// Structs.
    #[serde(default, rename = "struct_declarations")]
    pub structs: Vec<StructDecl>,
    /// Tables.
    #[serde(default, rename = "table_declarations", deserialize_with = "raw::tables")]
    pub tables: Vec<TableDecl>,
    /// Statically ordinalled unions, always strict.
    #[serde(
        default,
        rename = "union_declarations",
        deserialize_with = "raw::static_unions"
    )]
    pub unions: Vec<UnionDecl>,
    /// Extensible unions, strict or flexible.
    #[serde(
        default,
        rename = "xunion_declarations",
        deserialize_with = "raw::extensible_unions"
    )]
    pub xunions: Vec<UnionDecl>,
    /// Emission order of every local declaration.
    #[serde(default, rename = "declaration_order")]
    pub decl_order: Vec<EncodedCompoundIdentifier>,
    /// Kinds of every local declaration.
    #[serde(default)]
    pub declarations: DeclarationTable,
}

/// Dependency library with the kinds of the declarations it exports.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LibraryDependency {
    /// Library name.
    pub name: String,
    /// Kinds of the library's declarations.
    #[serde(default)]
    pub declarations: DeclarationTable,
}

/// Constant declaration.
#[derive(Debug, Clone, Deserialize)]
pub struct ConstDecl {
    /// Declaration name.
    pub name: EncodedCompoundIdentifier,
    /// Attributes.
    #[serde(default, rename = "maybe_attributes")]
    pub attributes: Attributes,
    /// Declared type.
    #[serde(rename = "type")]
    pub ty: Type,
    /// Value.
    pub value: Constant,
}

/// Enum declaration.
#[derive(Debug, Clone, Deserialize)]
pub struct EnumDecl {
    /// Declaration name.
    pub name: EncodedCompoundIdentifier,
    /// Attributes.
    #[serde(default, rename = "maybe_attributes")]
    pub attributes: Attributes,
    /// Underlying integer type.
    #[serde(rename = "type")]
    pub ty: PrimitiveSubtype,
    /// Members.
    pub members: Vec<EnumMember>,
}

/// Enum member.
#[derive(Debug, Clone, Deserialize)]
pub struct EnumMember {
    /// Member name.
    pub name: String,
    /// Attributes.
    #[serde(default, rename = "maybe_attributes")]
    pub attributes: Attributes,
    /// Value.
    pub value: Constant,
}

/// Bits declaration.
#[derive(Debug, Clone, Deserialize)]
pub struct BitsDecl {
    /// Declaration name.
    pub name: EncodedCompoundIdentifier,
    /// Attributes.
    #[serde(default, rename = "maybe_attributes")]
    pub attributes: Attributes,
    /// Underlying type.
    #[serde(rename = "type")]
    pub ty: Type,
    /// Union of all member bits, as numeric text.
    #[serde(default)]
    pub mask: Option<String>,
    /// Members.
    pub members: Vec<BitsMember>,
}

/// Bits member.
#[derive(Debug, Clone, Deserialize)]
pub struct BitsMember {
    /// Member name.
    pub name: String,
    /// Attributes.
    #[serde(default, rename = "maybe_attributes")]
    pub attributes: Attributes,
    /// Value.
    pub value: Constant,
}

/// Struct declaration.
#[derive(Debug, Clone, Deserialize)]
pub struct StructDecl {
    /// Declaration name.
    pub name: EncodedCompoundIdentifier,
    /// Attributes.
    #[serde(default, rename = "maybe_attributes")]
    pub attributes: Attributes,
    /// Members in wire order.
    pub members: Vec<StructMember>,
    /// Inline size in bytes.
    pub size: u32,
    /// Maximum handle count.
    #[serde(default)]
    pub max_handles: u32,
    /// Maximum out-of-line bytes.
    #[serde(default)]
    pub max_out_of_line: u32,
    /// Compiler-synthesized request/response payload.
    #[serde(default)]
    pub anonymous: bool,
}

/// Struct member.
#[derive(Debug, Clone, Deserialize)]
pub struct StructMember {
    /// Member name.
    pub name: String,
    /// Attributes.
    #[serde(default, rename = "maybe_attributes")]
    pub attributes: Attributes,
    /// Member type.
    #[serde(rename = "type")]
    pub ty: Type,
    /// Byte offset within the struct.
    pub offset: u32,
    /// Maximum out-of-line bytes.
    #[serde(default)]
    pub max_out_of_line: u32,
    /// Default value.
    #[serde(default, rename = "maybe_default_value")]
    pub default_value: Option<Constant>,
}

/// Table declaration.
#[derive(Debug, Clone)]
pub struct TableDecl {
    /// Declaration name.
    pub name: EncodedCompoundIdentifier,
    /// Attributes.
    pub attributes: Attributes,
    /// Members in source order, reserved slots included.
    pub members: Vec<OrdinalMember>,
    /// Inline size in bytes.
    pub size: u32,
    /// Maximum handle count.
    pub max_handles: u32,
    /// Maximum out-of-line bytes.
    pub max_out_of_line: u32,
}

/// Union strictness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Strictness {
    /// Unknown ordinals are a decode error.
    Strict,
    /// Unknown ordinals decode to an "unknown" state.
    Flexible,
}

impl Strictness {
    /// Returns true for flexible declarations.
    #[must_use]
    pub const fn is_flexible(&self) -> bool {
        matches!(self, Self::Flexible)
    }

    /// Maps the IR's `strict` flag.
    #[must_use]
    pub const fn from_strict_flag(strict: bool) -> Self {
        if strict { Self::Strict } else { Self::Flexible }
    }
}

/// Tagged union declaration in either representation.
#[derive(Debug, Clone)]
pub struct UnionDecl {
    /// Declaration name.
    pub name: EncodedCompoundIdentifier,
    /// Attributes.
    pub attributes: Attributes,
    /// Members in source order, reserved slots included.
    pub members: Vec<OrdinalMember>,
    /// Inline size in bytes.
    pub size: u32,
    /// Maximum handle count.
    pub max_handles: u32,
    /// Maximum out-of-line bytes.
    pub max_out_of_line: u32,
    /// Strictness; statically ordinalled unions are always strict.
    pub strictness: Strictness,
}

/// Member of an ordinal-keyed declaration (union, xunion or table).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrdinalMember {
    /// Slot kept unusable for wire evolution.
    Reserved {
        /// Reserved ordinal.
        ordinal: u32,
    },
    /// Member carrying a field.
    Active(ActiveMember),
}

impl OrdinalMember {
    /// Returns the member's ordinal.
    #[must_use]
    pub const fn ordinal(&self) -> u32 {
        match self {
            Self::Reserved { ordinal } => *ordinal,
            Self::Active(member) => member.ordinal,
        }
    }

    /// Returns the active member, if any.
    #[must_use]
    pub const fn as_active(&self) -> Option<&ActiveMember> {
        match self {
            Self::Reserved { .. } => None,
            Self::Active(member) => Some(member),
        }
    }
}

/// Non-reserved member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveMember {
    /// Wire ordinal.
    pub ordinal: u32,
    /// Member name.
    pub name: String,
    /// Member type.
    pub ty: Type,
    /// Byte offset of the payload.
    pub offset: u32,
    /// Maximum out-of-line bytes.
    pub max_out_of_line: u32,
    /// Attributes.
    pub attributes: Attributes,
}

/// Protocol declaration.
#[derive(Debug, Clone, Deserialize)]
pub struct InterfaceDecl {
    /// Declaration name.
    pub name: EncodedCompoundIdentifier,
    /// Attributes.
    #[serde(default, rename = "maybe_attributes")]
    pub attributes: Attributes,
    /// Methods.
    pub methods: Vec<Method>,
}

/// Protocol method or event.
#[derive(Debug, Clone, Deserialize)]
pub struct Method {
    /// Wire ordinal.
    pub ordinal: u64,
    /// Ordinal derived from the method name, when the IR carries one.
    #[serde(default)]
    pub generated_ordinal: Option<u64>,
    /// Method name.
    pub name: String,
    /// Attributes.
    #[serde(default, rename = "maybe_attributes")]
    pub attributes: Attributes,
    /// False for events.
    pub has_request: bool,
    /// Request parameters.
    #[serde(default, rename = "maybe_request")]
    pub request: Vec<Parameter>,
    /// Request message size.
    #[serde(default, rename = "maybe_request_size")]
    pub request_size: Option<u32>,
    /// False for one-way methods.
    pub has_response: bool,
    /// Response parameters.
    #[serde(default, rename = "maybe_response")]
    pub response: Vec<Parameter>,
    /// Response message size.
    #[serde(default, rename = "maybe_response_size")]
    pub response_size: Option<u32>,
}

impl Method {
    /// Returns true if this is an event (response without request).
    #[must_use]
    pub const fn is_event(&self) -> bool {
        !self.has_request && self.has_response
    }
}

/// Method parameter.
#[derive(Debug, Clone, Deserialize)]
pub struct Parameter {
    /// Parameter name.
    pub name: String,
    /// Parameter type.
    #[serde(rename = "type")]
    pub ty: Type,
    /// Byte offset within the message.
    pub offset: u32,
    /// Inline size.
    #[serde(default)]
    pub size: u32,
    /// Maximum out-of-line bytes.
    #[serde(default)]
    pub max_out_of_line: u32,
}

/// Raw IR shapes for the ordinal-keyed declarations.
mod raw {
    use super::{ActiveMember, OrdinalMember, Strictness, TableDecl, UnionDecl};
    use crate::error::IrError;
    use crate::identifier::EncodedCompoundIdentifier;
    use crate::types::{Attributes, Type};
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer};

    /// Statically ordinalled union: carries its wire ordinal as `xunion_ordinal`
    /// and has no strictness flag.
    #[derive(Deserialize)]
    struct StaticUnion {
        name: EncodedCompoundIdentifier,
        #[serde(default, rename = "maybe_attributes")]
        attributes: Attributes,
        members: Vec<StaticUnionMember>,
        size: u32,
        #[serde(default)]
        max_handles: u32,
        #[serde(default)]
        max_out_of_line: u32,
    }

    #[derive(Deserialize)]
    struct StaticUnionMember {
        #[serde(default)]
        reserved: bool,
        xunion_ordinal: u32,
        #[serde(flatten)]
        body: MemberBody,
    }

    /// Extensible union: ordinal under `ordinal`, explicit `strict` flag.
    #[derive(Deserialize)]
    struct ExtensibleUnion {
        name: EncodedCompoundIdentifier,
        #[serde(default, rename = "maybe_attributes")]
        attributes: Attributes,
        members: Vec<OrdinalledMember>,
        size: u32,
        #[serde(default)]
        max_handles: u32,
        #[serde(default)]
        max_out_of_line: u32,
        #[serde(default)]
        strict: bool,
    }

    /// Table: same member shape as the extensible union, no strictness.
    #[derive(Deserialize)]
    struct Table {
        name: EncodedCompoundIdentifier,
        #[serde(default, rename = "maybe_attributes")]
        attributes: Attributes,
        members: Vec<OrdinalledMember>,
        size: u32,
        #[serde(default)]
        max_handles: u32,
        #[serde(default)]
        max_out_of_line: u32,
    }

    #[derive(Deserialize)]
    struct OrdinalledMember {
        #[serde(default)]
        reserved: bool,
        ordinal: u32,
        #[serde(flatten)]
        body: MemberBody,
    }

    #[derive(Deserialize)]
    struct MemberBody {
        #[serde(default)]
        name: Option<String>,
        #[serde(default, rename = "type")]
        ty: Option<Type>,
        #[serde(default)]
        offset: u32,
        #[serde(default)]
        max_out_of_line: u32,
        #[serde(default, rename = "maybe_attributes")]
        attributes: Attributes,
    }

    fn member(
        declaration: &EncodedCompoundIdentifier,
        reserved: bool,
        ordinal: u32,
        body: MemberBody,
    ) -> Result<OrdinalMember, IrError> {
        if reserved {
            return Ok(OrdinalMember::Reserved { ordinal });
        }
        let name = body.name.ok_or_else(|| {
            IrError::invalid_member(
                declaration.as_str(),
                format!("member with ordinal {ordinal} has no name"),
            )
        })?;
        let ty = body.ty.ok_or_else(|| {
            IrError::invalid_member(declaration.as_str(), format!("member '{name}' has no type"))
        })?;
        Ok(OrdinalMember::Active(ActiveMember {
            ordinal,
            name,
            ty,
            offset: body.offset,
            max_out_of_line: body.max_out_of_line,
            attributes: body.attributes,
        }))
    }

    impl TryFrom<StaticUnion> for UnionDecl {
        type Error = IrError;

        fn try_from(raw: StaticUnion) -> Result<Self, Self::Error> {
            let members = raw
                .members
                .into_iter()
                .map(|m| member(&raw.name, m.reserved, m.xunion_ordinal, m.body))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Self {
                name: raw.name,
                attributes: raw.attributes,
                members,
                size: raw.size,
                max_handles: raw.max_handles,
                max_out_of_line: raw.max_out_of_line,
                strictness: Strictness::Strict,
            })
        }
    }

    impl TryFrom<ExtensibleUnion> for UnionDecl {
        type Error = IrError;

        fn try_from(raw: ExtensibleUnion) -> Result<Self, Self::Error> {
            let members = raw
                .members
                .into_iter()
                .map(|m| member(&raw.name, m.reserved, m.ordinal, m.body))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Self {
                name: raw.name,
                attributes: raw.attributes,
                members,
                size: raw.size,
                max_handles: raw.max_handles,
                max_out_of_line: raw.max_out_of_line,
                strictness: Strictness::from_strict_flag(raw.strict),
            })
        }
    }

    impl TryFrom<Table> for TableDecl {
        type Error = IrError;

        fn try_from(raw: Table) -> Result<Self, Self::Error> {
            let members = raw
                .members
                .into_iter()
                .map(|m| member(&raw.name, m.reserved, m.ordinal, m.body))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Self {
                name: raw.name,
                attributes: raw.attributes,
                members,
                size: raw.size,
                max_handles: raw.max_handles,
                max_out_of_line: raw.max_out_of_line,
            })
        }
    }

    pub(super) fn static_unions<'de, D>(deserializer: D) -> Result<Vec<UnionDecl>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Vec::<StaticUnion>::deserialize(deserializer)?
            .into_iter()
            .map(UnionDecl::try_from)
            .collect::<Result<_, _>>()
            .map_err(D::Error::custom)
    }

    pub(super) fn extensible_unions<'de, D>(deserializer: D) -> Result<Vec<UnionDecl>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Vec::<ExtensibleUnion>::deserialize(deserializer)?
            .into_iter()
            .map(UnionDecl::try_from)
            .collect::<Result<_, _>>()
            .map_err(D::Error::custom)
    }

    pub(super) fn tables<'de, D>(deserializer: D) -> Result<Vec<TableDecl>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Vec::<Table>::deserialize(deserializer)?
            .into_iter()
            .map(TableDecl::try_from)
            .collect::<Result<_, _>>()
            .map_err(D::Error::custom)
    }
}

impl UnionDecl {
    /// Returns the active members in source order.
    pub fn active_members(&self) -> impl Iterator<Item = &ActiveMember> {
        self.members.iter().filter_map(OrdinalMember::as_active)
    }
}

impl Root {
    /// Parses a JSON IR document.
    ///
    /// # Errors
    /// Returns `IrError::Json` if the document does not match the IR shape.
    pub fn from_json(json: &str) -> Result<Self, IrError> {
        let root: Self = serde_json::from_str(json)?;
        tracing::debug!(
            library = %root.name,
            declarations = root.decl_order.len(),
            "read JSON IR"
        );
        Ok(root)
    }

    /// Reads and parses a JSON IR file.
    ///
    /// # Errors
    /// Returns `IrError::Io` if the file cannot be read, or `IrError::Json` if it
    /// does not match the IR shape.
    pub fn from_file(path: &std::path::Path) -> Result<Self, IrError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Looks up the kind of a declaration, local or from a dependency.
    #[must_use]
    pub fn declaration_kind(&self, name: &EncodedCompoundIdentifier) -> Option<DeclKind> {
        self.declarations.get(name).copied().or_else(|| {
            self.library_dependencies
                .iter()
                .find_map(|dep| dep.declarations.get(name).copied())
        })
    }

    /// Looks up the kind of a declaration in the dependency tables only.
    #[must_use]
    pub fn dependency_kind(&self, name: &EncodedCompoundIdentifier) -> Option<DeclKind> {
        self.library_dependencies
            .iter()
            .find_map(|dep| dep.declarations.get(name).copied())
    }
}
