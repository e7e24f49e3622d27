//! Type resolution.
//!
//! One IR type reference becomes one [`Type`] holding every Dart spelling of it.
//! Nullability is applied to all declaration forms at once; the descriptor carries
//! the declared nullability as an explicit argument instead.

use crate::compiler::Compiler;
use crate::error::{CompileError, Result};
use crate::tree::Type;
use fidlgen_ir::{
    DeclKind, EncodedCompoundIdentifier, HandleSubtype, PrimitiveSubtype, Type as IrType,
};

/// Nullability applied on top of the declared one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NullabilityOverride {
    /// Use the type's own nullability.
    #[default]
    AsDeclared,
    /// Force the declarations nullable (table members).
    Nullable,
}

/// Resolves IR type references into Dart spellings.
pub struct TypeResolver<'c, 'a> {
    compiler: &'c Compiler<'a>,
}

impl<'c, 'a> TypeResolver<'c, 'a> {
    /// Creates a new type resolver.
    #[must_use]
    pub fn new(compiler: &'c Compiler<'a>) -> Self {
        Self { compiler }
    }

    /// Resolves a type reference.
    ///
    /// `context` names the referencing site in error messages.
    ///
    /// # Errors
    /// Returns `CompileError::UnresolvedReference` if an identifier names no known
    /// type declaration.
    pub fn resolve(
        &self,
        ty: &IrType,
        nullability: NullabilityOverride,
        context: &str,
    ) -> Result<Type> {
        let resolved = self.resolve_base(ty, context)?;
        let nullable = ty.is_nullable() || nullability == NullabilityOverride::Nullable;
        Ok(apply_nullability(resolved, nullable))
    }

    fn resolve_base(&self, ty: &IrType, context: &str) -> Result<Type> {
        let fidl = self.compiler.config().fidl();

        match ty {
            IrType::Primitive { subtype } => Ok(self.primitive(*subtype)),

            IrType::Array {
                element_type,
                element_count,
            } => {
                let element =
                    self.resolve(element_type, NullabilityOverride::AsDeclared, context)?;
                let mut list = list_of(&element);
                list.type_expr = format!(
                    "{fidl}.ArrayType<{}>(element: {}, elementCount: {element_count})",
                    list.decl, element.type_expr
                );
                Ok(list)
            }

            IrType::Vector {
                element_type,
                maybe_element_count,
                nullable,
            } => {
                let element =
                    self.resolve(element_type, NullabilityOverride::AsDeclared, context)?;
                let mut list = list_of(&element);
                list.type_expr = format!(
                    "{fidl}.VectorType<{}>(element: {}, maybeElementCount: {}, nullable: {nullable})",
                    list.decl,
                    element.type_expr,
                    bound(*maybe_element_count)
                );
                Ok(list)
            }

            IrType::String {
                maybe_element_count,
                nullable,
            } => Ok(uniform(
                "String".to_string(),
                format!(
                    "{fidl}.StringType(maybeElementCount: {}, nullable: {nullable})",
                    bound(*maybe_element_count)
                ),
            )),

            IrType::Handle { subtype, nullable } => {
                let name = handle_name(*subtype);
                Ok(uniform(
                    format!("{}.{name}", self.compiler.config().zx()),
                    format!("{fidl}.{name}Type(nullable: {nullable})"),
                ))
            }

            IrType::Request { subtype, nullable } => {
                let protocol = self.protocol_name(subtype, context)?;
                Ok(uniform(
                    format!("{fidl}.InterfaceRequest<{protocol}>"),
                    format!("{fidl}.InterfaceRequestType<{protocol}>(nullable: {nullable})"),
                ))
            }

            IrType::Identifier {
                identifier,
                nullable,
            } => self.identifier(identifier, *nullable, context),
        }
    }

    fn primitive(&self, subtype: PrimitiveSubtype) -> Type {
        let mut ty = uniform(
            primitive_decl(subtype).to_string(),
            format!(
                "{}.{}()",
                self.compiler.config().fidl(),
                primitive_descriptor(subtype)
            ),
        );
        ty.typed_data_decl = typed_data_decl(subtype).map(str::to_string);
        ty
    }

    fn identifier(
        &self,
        identifier: &EncodedCompoundIdentifier,
        nullable: bool,
        context: &str,
    ) -> Result<Type> {
        let fidl = self.compiler.config().fidl();
        let kind = self.compiler.lookup_kind(identifier, context)?;
        let name = self.compiler.declaration_name(identifier)?;

        match kind {
            DeclKind::Const => Err(CompileError::unresolved(
                identifier.as_str(),
                format!("{context} (constant used as a type)"),
            )),
            DeclKind::Enum | DeclKind::Bits | DeclKind::Table => {
                Ok(uniform(name, self.compiler.type_symbol(identifier)?))
            }
            DeclKind::Struct => {
                let symbol = self.compiler.type_symbol(identifier)?;
                let expr = if nullable {
                    format!("{fidl}.PointerType<{name}>(element: {symbol})")
                } else {
                    symbol
                };
                Ok(uniform(name, expr))
            }
            DeclKind::Union | DeclKind::XUnion => {
                let expr = if nullable {
                    self.compiler.opt_type_symbol(identifier)?
                } else {
                    self.compiler.type_symbol(identifier)?
                };
                Ok(uniform(name, expr))
            }
            DeclKind::Interface => Ok(Type {
                decl: format!("{fidl}.InterfaceHandle<{name}>"),
                sync_decl: format!("{fidl}.InterfaceHandle<{name}$Sync>"),
                async_decl: format!("{fidl}.InterfaceHandle<{name}>"),
                typed_data_decl: None,
                type_expr: format!("{fidl}.InterfaceHandleType<{name}>(nullable: {nullable})"),
                nullable: false,
            }),
        }
    }

    fn protocol_name(
        &self,
        identifier: &EncodedCompoundIdentifier,
        context: &str,
    ) -> Result<String> {
        match self.compiler.lookup_kind(identifier, context)? {
            DeclKind::Interface => self.compiler.declaration_name(identifier),
            _ => Err(CompileError::unresolved(
                identifier.as_str(),
                format!("{context} (request of a non-protocol)"),
            )),
        }
    }
}

/// Same spelling at every call site.
fn uniform(decl: String, type_expr: String) -> Type {
    Type {
        sync_decl: decl.clone(),
        async_decl: decl.clone(),
        decl,
        typed_data_decl: None,
        type_expr,
        nullable: false,
    }
}

/// Array/vector declarations: the element's typed-data list when it has one.
fn list_of(element: &Type) -> Type {
    match &element.typed_data_decl {
        Some(typed) => uniform(typed.clone(), String::new()),
        None => Type {
            decl: format!("List<{}>", element.decl),
            sync_decl: format!("List<{}>", element.sync_decl),
            async_decl: format!("List<{}>", element.async_decl),
            typed_data_decl: None,
            type_expr: String::new(),
            nullable: false,
        },
    }
}

fn apply_nullability(mut ty: Type, nullable: bool) -> Type {
    if nullable {
        ty.decl.push('?');
        ty.sync_decl.push('?');
        ty.async_decl.push('?');
        ty.nullable = true;
    }
    ty
}

fn bound(maybe_element_count: Option<u32>) -> String {
    maybe_element_count.map_or_else(|| "null".to_string(), |count| count.to_string())
}

fn primitive_decl(subtype: PrimitiveSubtype) -> &'static str {
    match subtype {
        PrimitiveSubtype::Bool => "bool",
        PrimitiveSubtype::Float32 | PrimitiveSubtype::Float64 => "double",
        _ => "int",
    }
}

fn primitive_descriptor(subtype: PrimitiveSubtype) -> &'static str {
    match subtype {
        PrimitiveSubtype::Bool => "BoolType",
        PrimitiveSubtype::Int8 => "Int8Type",
        PrimitiveSubtype::Int16 => "Int16Type",
        PrimitiveSubtype::Int32 => "Int32Type",
        PrimitiveSubtype::Int64 => "Int64Type",
        PrimitiveSubtype::Uint8 => "Uint8Type",
        PrimitiveSubtype::Uint16 => "Uint16Type",
        PrimitiveSubtype::Uint32 => "Uint32Type",
        PrimitiveSubtype::Uint64 => "Uint64Type",
        PrimitiveSubtype::Float32 => "Float32Type",
        PrimitiveSubtype::Float64 => "Float64Type",
    }
}

fn typed_data_decl(subtype: PrimitiveSubtype) -> Option<&'static str> {
    match subtype {
        PrimitiveSubtype::Bool => None,
        PrimitiveSubtype::Int8 => Some("Int8List"),
        PrimitiveSubtype::Int16 => Some("Int16List"),
        PrimitiveSubtype::Int32 => Some("Int32List"),
        PrimitiveSubtype::Int64 => Some("Int64List"),
        PrimitiveSubtype::Uint8 => Some("Uint8List"),
        PrimitiveSubtype::Uint16 => Some("Uint16List"),
        PrimitiveSubtype::Uint32 => Some("Uint32List"),
        PrimitiveSubtype::Uint64 => Some("Uint64List"),
        PrimitiveSubtype::Float32 => Some("Float32List"),
        PrimitiveSubtype::Float64 => Some("Float64List"),
    }
}

/// Handle subtypes with a dedicated Dart class; the rest use the generic one.
fn handle_name(subtype: HandleSubtype) -> &'static str {
    match subtype {
        HandleSubtype::Channel => "Channel",
        HandleSubtype::EventPair => "EventPair",
        HandleSubtype::Socket => "Socket",
        HandleSubtype::Vmo => "Vmo",
        _ => "Handle",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CompilerConfig;
    use fidlgen_ir::Root;

    const TYPES_JSON: &str = r#"{
        "name": "fidl.test",
        "enum_declarations": [{
            "name": "fidl.test/Color",
            "type": "uint8",
            "members": [{"name": "RED", "value": {"kind": "literal", "literal": {"kind": "numeric", "value": "1"}}}]
        }],
        "struct_declarations": [{
            "name": "fidl.test/Point",
            "members": [],
            "size": 1
        }],
        "interface_declarations": [{
            "name": "fidl.test/Echo",
            "methods": []
        }],
        "xunion_declarations": [{
            "name": "fidl.test/Shape",
            "members": [],
            "size": 24
        }],
        "const_declarations": [{
            "name": "fidl.test/LIMIT",
            "type": {"kind": "primitive", "subtype": "uint32"},
            "value": {"kind": "literal", "literal": {"kind": "numeric", "value": "4"}}
        }]
    }"#;

    fn resolve(json_type: &str, nullability: NullabilityOverride) -> Result<Type> {
        let root = Root::from_json(TYPES_JSON).expect("Failed to parse IR");
        let compiler = Compiler::new(&root, CompilerConfig::default());
        let ty: IrType = serde_json::from_str(json_type).expect("Failed to parse type");
        TypeResolver::new(&compiler).resolve(&ty, nullability, "test")
    }

    fn resolve_ok(json_type: &str) -> Type {
        resolve(json_type, NullabilityOverride::AsDeclared).expect("Failed to resolve")
    }

    #[test]
    fn test_int64_primitive() {
        let ty = resolve_ok(r#"{"kind": "primitive", "subtype": "int64"}"#);
        assert_eq!(ty.decl, "int");
        assert_eq!(ty.sync_decl, "int");
        assert_eq!(ty.async_decl, "int");
        assert_eq!(ty.typed_data_decl.as_deref(), Some("Int64List"));
        assert_eq!(ty.type_expr, "$fidl.Int64Type()");
        assert!(!ty.nullable);
    }

    #[test]
    fn test_bool_and_float_primitives() {
        let flag = resolve_ok(r#"{"kind": "primitive", "subtype": "bool"}"#);
        assert_eq!(flag.decl, "bool");
        assert_eq!(flag.typed_data_decl, None);

        let real = resolve_ok(r#"{"kind": "primitive", "subtype": "float32"}"#);
        assert_eq!(real.decl, "double");
        assert_eq!(real.type_expr, "$fidl.Float32Type()");
    }

    #[test]
    fn test_vector_of_numbers_uses_typed_data() {
        let ty = resolve_ok(
            r#"{"kind": "vector", "element_type": {"kind": "primitive", "subtype": "uint8"}, "maybe_element_count": 16, "nullable": true}"#,
        );
        assert_eq!(ty.decl, "Uint8List?");
        assert_eq!(ty.sync_decl, "Uint8List?");
        assert_eq!(ty.base_decl(), "Uint8List");
        assert_eq!(
            ty.type_expr,
            "$fidl.VectorType<Uint8List>(element: $fidl.Uint8Type(), maybeElementCount: 16, nullable: true)"
        );
    }

    #[test]
    fn test_array_of_strings() {
        let ty = resolve_ok(
            r#"{"kind": "array", "element_type": {"kind": "string"}, "element_count": 3}"#,
        );
        assert_eq!(ty.decl, "List<String>");
        assert_eq!(
            ty.type_expr,
            "$fidl.ArrayType<List<String>>(element: $fidl.StringType(maybeElementCount: null, nullable: false), elementCount: 3)"
        );
    }

    #[test]
    fn test_handles() {
        let channel = resolve_ok(r#"{"kind": "handle", "subtype": "channel", "nullable": true}"#);
        assert_eq!(channel.decl, "$zx.Channel?");
        assert_eq!(channel.type_expr, "$fidl.ChannelType(nullable: true)");

        let job = resolve_ok(r#"{"kind": "handle", "subtype": "job"}"#);
        assert_eq!(job.decl, "$zx.Handle");
        assert_eq!(job.type_expr, "$fidl.HandleType(nullable: false)");
    }

    #[test]
    fn test_identifier_kinds() {
        let color = resolve_ok(r#"{"kind": "identifier", "identifier": "fidl.test/Color"}"#);
        assert_eq!(color.decl, "Color");
        assert_eq!(color.type_expr, "kColor_Type");

        let point = resolve_ok(
            r#"{"kind": "identifier", "identifier": "fidl.test/Point", "nullable": true}"#,
        );
        assert_eq!(point.decl, "Point?");
        assert_eq!(point.type_expr, "$fidl.PointerType<Point>(element: kPoint_Type)");

        let shape = resolve_ok(
            r#"{"kind": "identifier", "identifier": "fidl.test/Shape", "nullable": true}"#,
        );
        assert_eq!(shape.decl, "Shape?");
        assert_eq!(shape.type_expr, "kShape_OptType");
    }

    #[test]
    fn test_protocol_spellings_differ_by_call_site() {
        let echo = resolve_ok(r#"{"kind": "identifier", "identifier": "fidl.test/Echo"}"#);
        assert_eq!(echo.decl, "$fidl.InterfaceHandle<Echo>");
        assert_eq!(echo.sync_decl, "$fidl.InterfaceHandle<Echo$Sync>");
        assert_eq!(echo.async_decl, "$fidl.InterfaceHandle<Echo>");
        assert_eq!(echo.type_expr, "$fidl.InterfaceHandleType<Echo>(nullable: false)");

        let request = resolve_ok(r#"{"kind": "request", "subtype": "fidl.test/Echo"}"#);
        assert_eq!(request.decl, "$fidl.InterfaceRequest<Echo>");
        assert_eq!(request.type_expr, "$fidl.InterfaceRequestType<Echo>(nullable: false)");
    }

    #[test]
    fn test_forced_nullability_keeps_descriptor() {
        let ty = resolve(
            r#"{"kind": "primitive", "subtype": "int32"}"#,
            NullabilityOverride::Nullable,
        )
        .expect("Failed to resolve");
        assert_eq!(ty.decl, "int?");
        assert_eq!(ty.sync_decl, "int?");
        assert_eq!(ty.async_decl, "int?");
        assert_eq!(ty.type_expr, "$fidl.Int32Type()");
    }

    #[test]
    fn test_unresolved_identifier_fails() {
        let err = resolve(
            r#"{"kind": "identifier", "identifier": "fidl.test/Nope"}"#,
            NullabilityOverride::AsDeclared,
        )
        .expect_err("Expected unresolved reference");
        assert!(matches!(err, CompileError::UnresolvedReference { .. }));
    }

    #[test]
    fn test_constant_is_not_a_type() {
        let err = resolve(
            r#"{"kind": "identifier", "identifier": "fidl.test/LIMIT"}"#,
            NullabilityOverride::AsDeclared,
        )
        .expect_err("Expected unresolved reference");
        assert!(matches!(err, CompileError::UnresolvedReference { .. }));
    }
}
