//! Const, enum and bits compilation.

use super::constants::ConstantResolver;
use super::literals::format_numeric;
use super::types::{NullabilityOverride, TypeResolver};
use crate::compiler::Compiler;
use crate::error::Result;
use crate::names::{self, NameContext};
use crate::tree::{Bits, Const, Enum, EnumMember};
use fidlgen_ir::{Attributes, BitsDecl, ConstDecl, Constant, EnumDecl, Type as IrType};

/// Compiles value-like declarations.
pub struct EnumCompiler<'c, 'a> {
    compiler: &'c Compiler<'a>,
}

impl<'c, 'a> EnumCompiler<'c, 'a> {
    /// Creates a new enum compiler.
    #[must_use]
    pub fn new(compiler: &'c Compiler<'a>) -> Self {
        Self { compiler }
    }

    /// Compiles a top-level constant.
    ///
    /// # Errors
    /// Returns `CompileError` if the type or value cannot be resolved.
    pub fn compile_const(&self, decl: &ConstDecl) -> Result<Const> {
        let parsed = decl.name.parse()?;
        let context = format!("constant '{}'", decl.name);
        let ty = TypeResolver::new(self.compiler).resolve(
            &decl.ty,
            NullabilityOverride::AsDeclared,
            &context,
        )?;
        let value =
            ConstantResolver::new(self.compiler).resolve(&decl.value, Some(&decl.ty), &context)?;

        Ok(Const {
            name: names::lower_camel(&parsed.name, NameContext::Constant),
            ty,
            value,
            doc: decl.attributes.doc_lines(),
        })
    }

    /// Compiles an enum.
    ///
    /// # Errors
    /// Returns `CompileError` if a member value cannot be resolved.
    pub fn compile_enum(&self, decl: &EnumDecl) -> Result<Enum> {
        let fidl = self.compiler.config().fidl();
        let name = self.compiler.declaration_name(&decl.name)?;
        let underlying = IrType::primitive(decl.ty);
        let context = format!("enum '{}'", decl.name);
        let ty = TypeResolver::new(self.compiler).resolve(
            &underlying,
            NullabilityOverride::AsDeclared,
            &context,
        )?;

        let members = self.members(
            decl.members.iter().map(|m| (m.name.as_str(), &m.value, &m.attributes)),
            &underlying,
            &context,
        )?;

        Ok(Enum {
            type_symbol: names::type_symbol(&name),
            type_expr: format!(
                "{fidl}.EnumType<{name}>(type: {}, ctor: {name}._ctor)",
                ty.type_expr
            ),
            members,
            doc: decl.attributes.doc_lines(),
            name,
        })
    }

    /// Compiles a bits declaration.
    ///
    /// # Errors
    /// Returns `CompileError` if a member value or the mask cannot be resolved.
    pub fn compile_bits(&self, decl: &BitsDecl) -> Result<Bits> {
        let fidl = self.compiler.config().fidl();
        let name = self.compiler.declaration_name(&decl.name)?;
        let context = format!("bits '{}'", decl.name);
        let ty = TypeResolver::new(self.compiler).resolve(
            &decl.ty,
            NullabilityOverride::AsDeclared,
            &context,
        )?;

        let members = self.members(
            decl.members.iter().map(|m| (m.name.as_str(), &m.value, &m.attributes)),
            &decl.ty,
            &context,
        )?;
        let mask = decl.mask.as_deref().map(format_numeric).transpose()?;

        Ok(Bits {
            type_symbol: names::type_symbol(&name),
            type_expr: format!(
                "{fidl}.BitsType<{name}>(type: {}, ctor: {name}._ctor)",
                ty.type_expr
            ),
            ty,
            mask,
            members,
            doc: decl.attributes.doc_lines(),
            name,
        })
    }

    fn members<'m>(
        &self,
        members: impl Iterator<Item = (&'m str, &'m Constant, &'m Attributes)>,
        underlying: &IrType,
        context: &str,
    ) -> Result<Vec<EnumMember>> {
        let constants = ConstantResolver::new(self.compiler);
        members
            .map(|(name, value, attributes)| {
                Ok(EnumMember {
                    name: names::lower_camel(name, NameContext::EnumMember),
                    value: constants.resolve(value, Some(underlying), context)?,
                    doc: attributes.doc_lines(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CompilerConfig;
    use crate::error::CompileError;
    use crate::tree::Tree;
    use fidlgen_ir::Root;

    const VALUES_JSON: &str = r#"{
        "name": "fidl.test",
        "const_declarations": [
            {
                "name": "fidl.test/MAX_RETRIES",
                "maybe_attributes": [{"name": "Doc", "value": " Upper bound.\n"}],
                "type": {"kind": "primitive", "subtype": "uint32"},
                "value": {"kind": "literal", "literal": {"kind": "numeric", "value": "10"}}
            },
            {
                "name": "fidl.test/DEFAULT_RETRIES",
                "type": {"kind": "primitive", "subtype": "uint32"},
                "value": {"kind": "identifier", "identifier": "fidl.test/MAX_RETRIES"}
            },
            {
                "name": "fidl.test/GREETING",
                "type": {"kind": "string"},
                "value": {"kind": "literal", "literal": {"kind": "string", "value": "\"hi\""}}
            }
        ],
        "enum_declarations": [{
            "name": "fidl.test/Status",
            "type": "int32",
            "members": [
                {"name": "OK", "value": {"kind": "literal", "literal": {"kind": "numeric", "value": "0"}}},
                {"name": "FAILED", "value": {"kind": "literal", "literal": {"kind": "numeric", "value": "-1"}}},
                {"name": "values", "value": {"kind": "literal", "literal": {"kind": "numeric", "value": "2"}}}
            ]
        }],
        "bits_declarations": [{
            "name": "fidl.test/Perms",
            "type": {"kind": "primitive", "subtype": "uint8"},
            "mask": "3",
            "members": [
                {"name": "READ", "value": {"kind": "literal", "literal": {"kind": "numeric", "value": "1"}}},
                {"name": "WRITE", "value": {"kind": "literal", "literal": {"kind": "numeric", "value": "0b10"}}}
            ]
        }],
        "declaration_order": [
            "fidl.test/MAX_RETRIES",
            "fidl.test/DEFAULT_RETRIES",
            "fidl.test/GREETING",
            "fidl.test/Status",
            "fidl.test/Perms"
        ]
    }"#;

    fn compile(json: &str) -> Result<Tree> {
        let root = Root::from_json(json).expect("Failed to parse IR");
        Compiler::new(&root, CompilerConfig::default()).compile()
    }

    #[test]
    fn test_compile_consts() {
        let tree = compile(VALUES_JSON).expect("Failed to compile");
        let consts: Vec<_> = tree.consts().collect();

        assert_eq!(consts[0].name, "maxRetries");
        assert_eq!(consts[0].value, "0xa");
        assert_eq!(consts[0].ty.decl, "int");
        assert_eq!(consts[0].doc, vec![" Upper bound."]);
        assert_eq!(consts[1].name, "defaultRetries");
        assert_eq!(consts[1].value, "maxRetries");
        assert_eq!(consts[2].ty.decl, "String");
        assert_eq!(consts[2].value, "r\"hi\"");
    }

    #[test]
    fn test_compile_enum() {
        let tree = compile(VALUES_JSON).expect("Failed to compile");
        let status = tree.enums().next().expect("Missing enum");

        let members: Vec<_> = status
            .members
            .iter()
            .map(|m| (m.name.as_str(), m.value.as_str()))
            .collect();
        assert_eq!(members, vec![("ok", "0x0"), ("failed", "-1"), ("values$", "0x2")]);
        assert_eq!(status.type_symbol, "kStatus_Type");
        assert_eq!(
            status.type_expr,
            "$fidl.EnumType<Status>(type: $fidl.Int32Type(), ctor: Status._ctor)"
        );
    }

    #[test]
    fn test_compile_bits() {
        let tree = compile(VALUES_JSON).expect("Failed to compile");
        let perms = tree.bits().next().expect("Missing bits");

        assert_eq!(perms.mask.as_deref(), Some("0x3"));
        assert_eq!(perms.members[1].name, "write");
        assert_eq!(perms.members[1].value, "0x2");
        assert_eq!(perms.ty.type_expr, "$fidl.Uint8Type()");
        assert_eq!(
            perms.type_expr,
            "$fidl.BitsType<Perms>(type: $fidl.Uint8Type(), ctor: Perms._ctor)"
        );
    }

    #[test]
    fn test_malformed_member_value_aborts() {
        let json = VALUES_JSON.replace("\"0b10\"", "\"0b12\"");
        let err = compile(&json).expect_err("Expected malformed literal");
        assert!(matches!(err, CompileError::MalformedLiteral { ref value } if value == "0b12"));
    }
}
