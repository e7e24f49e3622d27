//! Union normalization.
//!
//! Static unions and extensible unions arrive as the same [`UnionDecl`]; the only
//! difference that survives compilation is [`Strictness`], which adds the
//! `$unknown` tag and sets the descriptor's `flexible` flag.

use super::types::{NullabilityOverride, TypeResolver};
use super::{check_names, check_ordinals, indent_entries};
use crate::compiler::Compiler;
use crate::error::Result;
use crate::names::{self, NameContext};
use crate::tree::{Union, UnionMember};
use fidlgen_ir::{Strictness, UnionDecl};

/// Tag constant for ordinals this binding does not know.
pub const UNKNOWN_TAG: &str = "$unknown";

/// Compiles union declarations.
pub struct UnionCompiler<'c, 'a> {
    compiler: &'c Compiler<'a>,
}

impl<'c, 'a> UnionCompiler<'c, 'a> {
    /// Creates a new union compiler.
    #[must_use]
    pub fn new(compiler: &'c Compiler<'a>) -> Self {
        Self { compiler }
    }

    /// Compiles one union of either representation.
    ///
    /// # Errors
    /// Returns `CompileError::DuplicateOrdinal` if two members share an ordinal,
    /// `CompileError::NameCollision` if two members share a tag, constructor or field
    /// name, and `CompileError::UnresolvedReference` if a member type cannot be
    /// resolved.
    pub fn compile(&self, decl: &UnionDecl) -> Result<Union> {
        check_ordinals(&decl.name, &decl.members)?;

        let name = self.compiler.declaration_name(&decl.name)?;
        let tag_name = format!("{name}Tag");
        let resolver = TypeResolver::new(self.compiler);

        let mut members = Vec::new();
        for member in decl.active_members() {
            let context = format!("member '{}' of '{}'", member.name, decl.name);
            members.push(UnionMember {
                ordinal: member.ordinal,
                ty: resolver.resolve(&member.ty, NullabilityOverride::AsDeclared, &context)?,
                name: names::lower_camel(&member.name, NameContext::Member),
                ctor_name: names::upper_camel(&member.name, NameContext::Member),
                tag: names::lower_camel(&member.name, NameContext::EnumMember),
                doc: member.attributes.doc_lines(),
            });
        }

        let sources: Vec<&str> = decl.active_members().map(|m| m.name.as_str()).collect();
        let tags = members.iter().map(|m| m.tag.as_str());
        check_names(&decl.name, sources.iter().copied().zip(tags))?;
        let ctors = members.iter().map(|m| m.ctor_name.as_str());
        check_names(&decl.name, sources.iter().copied().zip(ctors))?;
        let fields = members.iter().map(|m| m.name.as_str());
        check_names(&decl.name, sources.iter().copied().zip(fields))?;

        let reserved_ordinals = decl
            .members
            .iter()
            .filter(|m| m.as_active().is_none())
            .map(|m| m.ordinal())
            .collect();

        let mut tags = Vec::with_capacity(members.len() + 1);
        if decl.strictness.is_flexible() {
            tags.push(UNKNOWN_TAG.to_string());
        }
        tags.extend(members.iter().map(|m| m.tag.clone()));

        let fidl = self.compiler.config().fidl();
        let type_expr = descriptor(fidl, &name, &members, false, decl.strictness);
        let opt_type_expr = descriptor(fidl, &name, &members, true, decl.strictness);

        Ok(Union {
            type_symbol: names::type_symbol(&name),
            opt_type_symbol: names::opt_type_symbol(&name),
            type_expr,
            opt_type_expr,
            tag_name,
            tags,
            members,
            reserved_ordinals,
            strictness: decl.strictness,
            doc: decl.attributes.doc_lines(),
            name,
        })
    }
}

/// `XUnionType` descriptor. Ordinals are printed in decimal.
fn descriptor(
    fidl: &str,
    name: &str,
    members: &[UnionMember],
    nullable: bool,
    strictness: Strictness,
) -> String {
    let entries: Vec<String> = members
        .iter()
        .map(|m| format!("{}: {}", m.ordinal, m.ty.type_expr))
        .collect();

    let mut output = String::new();
    output.push_str(&format!("{fidl}.XUnionType<{name}>(\n"));
    output.push_str(&format!("  members: <int, {fidl}.FidlType>{{\n"));
    output.push_str(&indent_entries(&entries, "    "));
    output.push_str("  },\n");
    output.push_str(&format!("  ctor: {name}._ctor,\n"));
    output.push_str(&format!("  nullable: {nullable},\n"));
    output.push_str(&format!("  flexible: {},\n", strictness.is_flexible()));
    output.push(')');
    output
}
