//! Constant resolution.

use super::literals::format_literal;
use crate::compiler::Compiler;
use crate::error::{CompileError, Result};
use crate::names::{self, NameContext};
use fidlgen_ir::{CompoundIdentifier, Constant, DeclKind, EncodedCompoundIdentifier, Type};

/// Resolves constants to Dart expressions.
pub struct ConstantResolver<'c, 'a> {
    compiler: &'c Compiler<'a>,
}

impl<'c, 'a> ConstantResolver<'c, 'a> {
    /// Creates a new constant resolver.
    #[must_use]
    pub fn new(compiler: &'c Compiler<'a>) -> Self {
        Self { compiler }
    }

    /// Resolves a constant.
    ///
    /// `hint` is the expected type; it only matters for bare member names, which
    /// are looked up in the enum or bits declaration it names.
    ///
    /// # Errors
    /// Returns `CompileError::MalformedLiteral` for bad numeric text and
    /// `CompileError::UnresolvedReference` for identifiers naming nothing known.
    pub fn resolve(
        &self,
        constant: &Constant,
        hint: Option<&Type>,
        context: &str,
    ) -> Result<String> {
        match constant {
            Constant::Literal { literal } => format_literal(literal),
            Constant::Identifier { identifier } => self.reference(identifier, hint, context),
        }
    }

    fn reference(
        &self,
        identifier: &EncodedCompoundIdentifier,
        hint: Option<&Type>,
        context: &str,
    ) -> Result<String> {
        let parsed = identifier.parse()?;

        if let Some(member) = &parsed.member {
            let owner = parsed.declaration_identifier();
            return self.member_reference(&owner, member, identifier, context);
        }

        match self.compiler.lookup_kind(identifier, context) {
            Ok(DeclKind::Const) => {
                let name = names::lower_camel(&parsed.name, NameContext::Constant);
                Ok(self.compiler.qualify(&parsed, name))
            }
            Ok(_) => Err(CompileError::unresolved(
                identifier.as_str(),
                format!("{context} (declaration used as a value)"),
            )),
            Err(err) => match hint {
                Some(Type::Identifier { identifier: owner, .. }) => {
                    self.member_reference(owner, &parsed.name, identifier, context)
                }
                _ => Err(err),
            },
        }
    }

    /// `Owner.member` for an enum or bits member.
    fn member_reference(
        &self,
        owner: &EncodedCompoundIdentifier,
        member: &str,
        identifier: &EncodedCompoundIdentifier,
        context: &str,
    ) -> Result<String> {
        let unresolved = || CompileError::unresolved(identifier.as_str(), context);

        let kind = self.compiler.lookup_kind(owner, context).map_err(|_| unresolved())?;
        if !matches!(kind, DeclKind::Enum | DeclKind::Bits) {
            return Err(unresolved());
        }

        let owner_parsed: CompoundIdentifier = owner.parse()?;
        if self.compiler.is_local(&owner_parsed) {
            let declared = self
                .compiler
                .source(owner)
                .is_some_and(|source| source.has_member(member));
            if !declared {
                return Err(unresolved());
            }
        }

        Ok(format!(
            "{}.{}",
            self.compiler.declaration_name(owner)?,
            names::lower_camel(member, NameContext::EnumMember)
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CompilerConfig;
    use fidlgen_ir::Root;

    const CONSTANTS_JSON: &str = r#"{
        "name": "fidl.test",
        "library_dependencies": [{
            "name": "fuchsia.io",
            "declarations": {"fuchsia.io/MAX_PATH": "const", "fuchsia.io/Mode": "bits"}
        }],
        "const_declarations": [{
            "name": "fidl.test/MAX_SIZE",
            "type": {"kind": "primitive", "subtype": "uint32"},
            "value": {"kind": "literal", "literal": {"kind": "numeric", "value": "10"}}
        }],
        "enum_declarations": [{
            "name": "fidl.test/Color",
            "type": "uint8",
            "members": [
                {"name": "RED", "value": {"kind": "literal", "literal": {"kind": "numeric", "value": "1"}}},
                {"name": "DARK_BLUE", "value": {"kind": "literal", "literal": {"kind": "numeric", "value": "2"}}}
            ]
        }]
    }"#;

    fn with_resolver<T>(f: impl FnOnce(&ConstantResolver<'_, '_>) -> T) -> T {
        let root = Root::from_json(CONSTANTS_JSON).expect("Failed to parse IR");
        let compiler = Compiler::new(&root, CompilerConfig::default());
        f(&ConstantResolver::new(&compiler))
    }

    #[test]
    fn test_literal_constants() {
        with_resolver(|resolver| {
            for (raw, expected) in [("10", "0xa"), ("-1", "-1"), ("0xA", "0xA"), ("1.23", "1.23")] {
                let actual = resolver
                    .resolve(&Constant::numeric(raw), None, "test")
                    .expect("Failed to resolve");
                assert_eq!(actual, expected);
            }
        });
    }

    #[test]
    fn test_const_reference() {
        with_resolver(|resolver| {
            let local = resolver
                .resolve(&Constant::identifier("fidl.test/MAX_SIZE"), None, "test")
                .expect("Failed to resolve");
            assert_eq!(local, "maxSize");

            let external = resolver
                .resolve(&Constant::identifier("fuchsia.io/MAX_PATH"), None, "test")
                .expect("Failed to resolve");
            assert_eq!(external, "lib$fuchsia_io.maxPath");
        });
    }

    #[test]
    fn test_member_reference() {
        with_resolver(|resolver| {
            let local = resolver
                .resolve(&Constant::identifier("fidl.test/Color.DARK_BLUE"), None, "test")
                .expect("Failed to resolve");
            assert_eq!(local, "Color.darkBlue");

            let external = resolver
                .resolve(&Constant::identifier("fuchsia.io/Mode.READ"), None, "test")
                .expect("Failed to resolve");
            assert_eq!(external, "lib$fuchsia_io.Mode.read");
        });
    }

    #[test]
    fn test_bare_member_uses_type_hint() {
        with_resolver(|resolver| {
            let hint = Type::identifier("fidl.test/Color", false);
            let actual = resolver
                .resolve(&Constant::identifier("RED"), Some(&hint), "test")
                .expect("Failed to resolve");
            assert_eq!(actual, "Color.red");
        });
    }

    #[test]
    fn test_unresolved_references() {
        with_resolver(|resolver| {
            for raw in ["fidl.test/NOPE", "fidl.test/Color.GREEN", "fidl.test/MAX_SIZE.X", "RED"] {
                let err = resolver
                    .resolve(&Constant::identifier(raw), None, "test")
                    .expect_err("Expected unresolved reference");
                assert!(matches!(err, CompileError::UnresolvedReference { .. }), "{raw}");
            }
        });
    }

    #[test]
    fn test_malformed_literal() {
        with_resolver(|resolver| {
            let err = resolver
                .resolve(&Constant::numeric("12abc"), None, "test")
                .expect_err("Expected malformed literal");
            assert!(matches!(err, CompileError::MalformedLiteral { .. }));
        });
    }
}
