//! Compilation driver.
//!
//! Walks the IR's declaration order once and dispatches every declaration to the
//! compiler for its kind. Compiled declarations land in an append-only index;
//! lookups consult the index first and fall back to the source IR, so forward
//! references resolve without compiling out of order.

use crate::config::CompilerConfig;
use crate::dart::{EnumCompiler, InterfaceCompiler, StructCompiler, UnionCompiler};
use crate::error::{CompileError, Result};
use crate::names::{self, NameContext};
use crate::tree::{Declaration, Import, Tree};
use fidlgen_ir::{
    BitsDecl, CompoundIdentifier, ConstDecl, DeclKind, EncodedCompoundIdentifier, EnumDecl,
    InterfaceDecl, LibraryIdentifier, Root, StructDecl, TableDecl, UnionDecl,
};
use indexmap::IndexMap;
use std::collections::HashMap;

/// Borrowed source declaration of any kind.
#[derive(Debug, Clone, Copy)]
pub enum SourceDecl<'a> {
    /// Constant.
    Const(&'a ConstDecl),
    /// Enum.
    Enum(&'a EnumDecl),
    /// Bits.
    Bits(&'a BitsDecl),
    /// Struct.
    Struct(&'a StructDecl),
    /// Table.
    Table(&'a TableDecl),
    /// Statically ordinalled union.
    Union(&'a UnionDecl),
    /// Extensible union.
    XUnion(&'a UnionDecl),
    /// Protocol.
    Interface(&'a InterfaceDecl),
}

impl<'a> SourceDecl<'a> {
    /// Returns the declaration name.
    #[must_use]
    pub const fn name(&self) -> &'a EncodedCompoundIdentifier {
        match *self {
            Self::Const(decl) => &decl.name,
            Self::Enum(decl) => &decl.name,
            Self::Bits(decl) => &decl.name,
            Self::Struct(decl) => &decl.name,
            Self::Table(decl) => &decl.name,
            Self::Union(decl) | Self::XUnion(decl) => &decl.name,
            Self::Interface(decl) => &decl.name,
        }
    }

    /// Returns the declaration kind.
    #[must_use]
    pub const fn kind(&self) -> DeclKind {
        match self {
            Self::Const(_) => DeclKind::Const,
            Self::Enum(_) => DeclKind::Enum,
            Self::Bits(_) => DeclKind::Bits,
            Self::Struct(_) => DeclKind::Struct,
            Self::Table(_) => DeclKind::Table,
            Self::Union(_) => DeclKind::Union,
            Self::XUnion(_) => DeclKind::XUnion,
            Self::Interface(_) => DeclKind::Interface,
        }
    }

    /// Returns true if the declaration has a member with the given IR name.
    #[must_use]
    pub fn has_member(&self, member: &str) -> bool {
        match self {
            Self::Enum(decl) => decl.members.iter().any(|m| m.name == member),
            Self::Bits(decl) => decl.members.iter().any(|m| m.name == member),
            _ => false,
        }
    }
}

/// Dart middle-end compiler for one library.
pub struct Compiler<'a> {
    root: &'a Root,
    config: CompilerConfig,
    library: LibraryIdentifier,
    sources: HashMap<&'a EncodedCompoundIdentifier, SourceDecl<'a>>,
    compiled: IndexMap<EncodedCompoundIdentifier, Declaration>,
}

impl<'a> Compiler<'a> {
    /// Creates a compiler over a parsed root.
    #[must_use]
    pub fn new(root: &'a Root, config: CompilerConfig) -> Self {
        let mut sources = HashMap::new();
        let collections = root
            .consts
            .iter()
            .map(SourceDecl::Const)
            .chain(root.enums.iter().map(SourceDecl::Enum))
            .chain(root.bits.iter().map(SourceDecl::Bits))
            .chain(root.structs.iter().map(SourceDecl::Struct))
            .chain(root.tables.iter().map(SourceDecl::Table))
            .chain(root.unions.iter().map(SourceDecl::Union))
            .chain(root.xunions.iter().map(SourceDecl::XUnion))
            .chain(root.interfaces.iter().map(SourceDecl::Interface));

        for source in collections {
            sources.entry(source.name()).or_insert(source);
        }

        Self {
            root,
            config,
            library: LibraryIdentifier::parse(&root.name),
            sources,
            compiled: IndexMap::new(),
        }
    }

    /// Compiles every declaration in declaration order.
    ///
    /// # Errors
    /// Returns the first `CompileError` met in declaration order; nothing is
    /// returned for a run that fails.
    pub fn compile(mut self) -> Result<Tree> {
        for name in &self.root.decl_order {
            if self.compiled.contains_key(name) {
                tracing::warn!(
                    declaration = %name,
                    "declaration listed twice in declaration order"
                );
                continue;
            }

            let source = self
                .sources
                .get(name)
                .copied()
                .ok_or_else(|| CompileError::unresolved(name.as_str(), "declaration order"))?;

            let declaration = self.compile_declaration(source)?;
            tracing::debug!(
                declaration = %name,
                kind = %source.kind(),
                dart_name = declaration.name(),
                "compiled declaration"
            );
            self.compiled.entry(name.clone()).or_insert(declaration);
        }

        let tree = Tree {
            library_name: self.root.name.clone(),
            imports: self.imports(),
            declarations: self.compiled.into_values().collect(),
        };

        tracing::info!(
            library = %tree.library_name,
            declarations = tree.declarations.len(),
            imports = tree.imports.len(),
            "compiled library"
        );

        Ok(tree)
    }

    fn compile_declaration(&self, source: SourceDecl<'a>) -> Result<Declaration> {
        match source {
            SourceDecl::Const(decl) => {
                EnumCompiler::new(self).compile_const(decl).map(Declaration::Const)
            }
            SourceDecl::Enum(decl) => {
                EnumCompiler::new(self).compile_enum(decl).map(Declaration::Enum)
            }
            SourceDecl::Bits(decl) => {
                EnumCompiler::new(self).compile_bits(decl).map(Declaration::Bits)
            }
            SourceDecl::Struct(decl) => {
                StructCompiler::new(self).compile_struct(decl).map(Declaration::Struct)
            }
            SourceDecl::Table(decl) => {
                StructCompiler::new(self).compile_table(decl).map(Declaration::Table)
            }
            SourceDecl::Union(decl) | SourceDecl::XUnion(decl) => {
                UnionCompiler::new(self).compile(decl).map(Declaration::Union)
            }
            SourceDecl::Interface(decl) => {
                InterfaceCompiler::new(self).compile(decl).map(Declaration::Interface)
            }
        }
    }

    fn imports(&self) -> Vec<Import> {
        self.root
            .library_dependencies
            .iter()
            .map(|dep| {
                let library = LibraryIdentifier::parse(&dep.name);
                let package = format!("fidl_{}", library.join("_"));
                Import {
                    async_url: format!("package:{package}/{}", self.config.async_file_name()),
                    test_url: format!("package:{package}/{}", self.config.test_file_name()),
                    local_name: names::library_prefix(&library),
                }
            })
            .collect()
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Returns the local source declaration with the given name.
    #[must_use]
    pub fn source(&self, name: &EncodedCompoundIdentifier) -> Option<SourceDecl<'a>> {
        self.sources.get(name).copied()
    }

    /// Resolves the kind of a referenced declaration.
    ///
    /// Local names resolve only through declarations with a body; the dependency
    /// tables are consulted for names of other libraries.
    ///
    /// # Errors
    /// Returns `CompileError::UnresolvedReference` if neither this library nor a
    /// dependency declares `name`.
    pub fn lookup_kind(
        &self,
        name: &EncodedCompoundIdentifier,
        context: &str,
    ) -> Result<DeclKind> {
        if let Some(compiled) = self.compiled.get(name) {
            tracing::trace!(declaration = %name, "resolved from compiled index");
            return Ok(compiled_kind(compiled));
        }
        if let Some(source) = self.sources.get(name) {
            tracing::trace!(declaration = %name, "forward reference resolved from source");
            return Ok(source.kind());
        }
        if self.is_local(&name.parse()?) {
            return Err(CompileError::unresolved(name.as_str(), context));
        }
        self.root
            .dependency_kind(name)
            .ok_or_else(|| CompileError::unresolved(name.as_str(), context))
    }

    /// Returns true if the identifier belongs to the library being compiled.
    #[must_use]
    pub fn is_local(&self, identifier: &CompoundIdentifier) -> bool {
        identifier.library.is_empty() || identifier.library == self.library
    }

    /// Dart class name of a declaration, library-qualified when external.
    ///
    /// # Errors
    /// Returns `CompileError::Ir` if the identifier does not parse.
    pub fn declaration_name(&self, name: &EncodedCompoundIdentifier) -> Result<String> {
        let parsed = name.parse()?;
        let local = names::upper_camel(&parsed.name, NameContext::Declaration);
        Ok(self.qualify(&parsed, local))
    }

    /// Descriptor symbol of a declaration, library-qualified when external.
    ///
    /// # Errors
    /// Returns `CompileError::Ir` if the identifier does not parse.
    pub fn type_symbol(&self, name: &EncodedCompoundIdentifier) -> Result<String> {
        let parsed = name.parse()?;
        let local = names::upper_camel(&parsed.name, NameContext::Declaration);
        Ok(self.qualify(&parsed, names::type_symbol(&local)))
    }

    /// Nullable descriptor symbol of a declaration, library-qualified when external.
    ///
    /// # Errors
    /// Returns `CompileError::Ir` if the identifier does not parse.
    pub fn opt_type_symbol(&self, name: &EncodedCompoundIdentifier) -> Result<String> {
        let parsed = name.parse()?;
        let local = names::upper_camel(&parsed.name, NameContext::Declaration);
        Ok(self.qualify(&parsed, names::opt_type_symbol(&local)))
    }

    /// Prefixes `symbol` with the import prefix of an external library.
    #[must_use]
    pub fn qualify(&self, identifier: &CompoundIdentifier, symbol: String) -> String {
        if self.is_local(identifier) {
            symbol
        } else {
            format!("{}.{symbol}", names::library_prefix(&identifier.library))
        }
    }
}

fn compiled_kind(declaration: &Declaration) -> DeclKind {
    match declaration {
        Declaration::Const(_) => DeclKind::Const,
        Declaration::Enum(_) => DeclKind::Enum,
        Declaration::Bits(_) => DeclKind::Bits,
        Declaration::Struct(_) => DeclKind::Struct,
        Declaration::Table(_) => DeclKind::Table,
        Declaration::Union(_) => DeclKind::Union,
        Declaration::Interface(_) => DeclKind::Interface,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIBRARY_JSON: &str = r#"{
        "name": "fidl.test",
        "library_dependencies": [{
            "name": "fuchsia.mem",
            "declarations": {"fuchsia.mem/Buffer": "struct"}
        }],
        "const_declarations": [{
            "name": "fidl.test/MAX",
            "type": {"kind": "primitive", "subtype": "uint32"},
            "value": {"kind": "literal", "literal": {"kind": "numeric", "value": "10"}}
        }],
        "struct_declarations": [{
            "name": "fidl.test/Holder",
            "members": [{
                "name": "payload",
                "type": {"kind": "identifier", "identifier": "fidl.test/Later", "nullable": true},
                "offset": 0,
                "max_out_of_line": 4294967295
            }],
            "size": 24,
            "max_handles": 0,
            "max_out_of_line": 4294967295
        }],
        "xunion_declarations": [{
            "name": "fidl.test/Later",
            "members": [{
                "ordinal": 1,
                "name": "buffer",
                "type": {"kind": "identifier", "identifier": "fuchsia.mem/Buffer"},
                "offset": 0,
                "max_out_of_line": 0
            }],
            "size": 24,
            "max_handles": 0,
            "max_out_of_line": 4294967295,
            "strict": false
        }],
        "declaration_order": ["fidl.test/MAX", "fidl.test/Holder", "fidl.test/Later", "fidl.test/Holder"],
        "declarations": {
            "fidl.test/MAX": "const",
            "fidl.test/Holder": "struct",
            "fidl.test/Later": "xunion"
        }
    }"#;

    fn root() -> Root {
        Root::from_json(LIBRARY_JSON).expect("Failed to parse IR")
    }

    #[test]
    fn test_compile_respects_declaration_order() {
        let root = root();
        let tree = Compiler::new(&root, CompilerConfig::default())
            .compile()
            .expect("Failed to compile");

        let names: Vec<_> = tree.declarations.iter().map(Declaration::name).collect();
        assert_eq!(names, vec!["max", "Holder", "Later"]);
        assert_eq!(tree.library_name, "fidl.test");
    }

    #[test]
    fn test_forward_reference_resolves() {
        let root = root();
        let tree = Compiler::new(&root, CompilerConfig::default())
            .compile()
            .expect("Failed to compile");

        let holder = tree.structs().next().expect("Missing struct");
        assert_eq!(holder.members[0].ty.decl, "Later?");
        assert_eq!(holder.members[0].ty.type_expr, "kLater_OptType");
    }

    #[test]
    fn test_external_reference_is_qualified() {
        let root = root();
        let tree = Compiler::new(&root, CompilerConfig::default())
            .compile()
            .expect("Failed to compile");

        let later = tree.unions().next().expect("Missing union");
        assert_eq!(later.members[0].ty.decl, "lib$fuchsia_mem.Buffer");
        assert_eq!(later.members[0].ty.type_expr, "lib$fuchsia_mem.kBuffer_Type");
    }

    #[test]
    fn test_imports_from_dependencies() {
        let root = root();
        let tree = Compiler::new(&root, CompilerConfig::default())
            .compile()
            .expect("Failed to compile");

        assert_eq!(
            tree.imports,
            vec![Import {
                async_url: "package:fidl_fuchsia_mem/fidl_async.dart".to_string(),
                test_url: "package:fidl_fuchsia_mem/fidl_test.dart".to_string(),
                local_name: "lib$fuchsia_mem".to_string(),
            }]
        );
    }

    #[test]
    fn test_unknown_declaration_order_entry_fails() {
        let mut root = root();
        root.decl_order.push(EncodedCompoundIdentifier::from("fidl.test/Missing"));

        let err = Compiler::new(&root, CompilerConfig::default())
            .compile()
            .expect_err("Expected unresolved reference");
        assert!(matches!(
            err,
            CompileError::UnresolvedReference { ref identifier, .. } if identifier == "fidl.test/Missing"
        ));
    }

    #[test]
    fn test_lookup_kind_fallbacks() {
        let root = root();
        let compiler = Compiler::new(&root, CompilerConfig::default());

        let later = EncodedCompoundIdentifier::from("fidl.test/Later");
        let buffer = EncodedCompoundIdentifier::from("fuchsia.mem/Buffer");
        let missing = EncodedCompoundIdentifier::from("fuchsia.mem/Nope");

        assert_eq!(
            compiler.lookup_kind(&later, "test").expect("Failed to lookup"),
            DeclKind::XUnion
        );
        assert_eq!(
            compiler.lookup_kind(&buffer, "test").expect("Failed to lookup"),
            DeclKind::Struct
        );
        assert!(compiler.lookup_kind(&missing, "test").is_err());
    }

    #[test]
    fn test_local_name_without_body_is_unresolved() {
        let json = LIBRARY_JSON
            .replace(
                r#""identifier": "fidl.test/Later""#,
                r#""identifier": "fidl.test/Ghost""#,
            )
            .replace(
                r#""fidl.test/Later": "xunion""#,
                r#""fidl.test/Later": "xunion", "fidl.test/Ghost": "struct""#,
            );
        let root = Root::from_json(&json).expect("Failed to parse IR");

        let ghost = EncodedCompoundIdentifier::from("fidl.test/Ghost");
        let compiler = Compiler::new(&root, CompilerConfig::default());
        assert!(compiler.lookup_kind(&ghost, "test").is_err());

        let err = Compiler::new(&root, CompilerConfig::default())
            .compile()
            .expect_err("Expected unresolved reference");
        assert!(matches!(
            err,
            CompileError::UnresolvedReference { ref identifier, .. } if identifier == "fidl.test/Ghost"
        ));
    }
}
