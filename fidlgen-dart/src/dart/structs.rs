//! Struct and table compilation.

use super::constants::ConstantResolver;
use super::types::{NullabilityOverride, TypeResolver};
use super::{check_names, check_ordinals, indent_entries};
use crate::compiler::Compiler;
use crate::error::Result;
use crate::names::{self, NameContext};
use crate::tree::{Struct, StructMember, Table, TableMember};
use fidlgen_ir::{OrdinalMember, StructDecl, TableDecl};

/// Compiles structs and tables.
pub struct StructCompiler<'c, 'a> {
    compiler: &'c Compiler<'a>,
}

impl<'c, 'a> StructCompiler<'c, 'a> {
    /// Creates a new struct compiler.
    #[must_use]
    pub fn new(compiler: &'c Compiler<'a>) -> Self {
        Self { compiler }
    }

    /// Compiles a struct.
    ///
    /// # Errors
    /// Returns `CompileError::NameCollision` if two members share a field name, or
    /// `CompileError` if a member type or default value cannot be resolved.
    pub fn compile_struct(&self, decl: &StructDecl) -> Result<Struct> {
        let fidl = self.compiler.config().fidl();
        let name = self.compiler.declaration_name(&decl.name)?;
        let types = TypeResolver::new(self.compiler);
        let constants = ConstantResolver::new(self.compiler);

        let mut members = Vec::with_capacity(decl.members.len());
        for member in &decl.members {
            let context = format!("member '{}' of '{}'", member.name, decl.name);
            let ty = types.resolve(&member.ty, NullabilityOverride::AsDeclared, &context)?;
            let default_value = member
                .default_value
                .as_ref()
                .map(|value| constants.resolve(value, Some(&member.ty), &context))
                .transpose()?;
            let type_expr = format!(
                "{fidl}.MemberType<{}>(type: {}, offset: {})",
                ty.base_decl(),
                ty.type_expr,
                member.offset
            );

            members.push(StructMember {
                name: names::lower_camel(&member.name, NameContext::Member),
                offset: member.offset,
                default_value,
                type_expr,
                doc: member.attributes.doc_lines(),
                ty,
            });
        }

        let fields = members.iter().map(|m| m.name.as_str());
        check_names(&decl.name, decl.members.iter().map(|m| m.name.as_str()).zip(fields))?;

        let entries: Vec<String> = members.iter().map(|m| m.type_expr.clone()).collect();
        let mut type_expr = String::new();
        type_expr.push_str(&format!("{fidl}.StructType<{name}>(\n"));
        type_expr.push_str(&format!("  encodedSize: {},\n", decl.size));
        type_expr.push_str(&format!("  members: <{fidl}.MemberType>[\n"));
        type_expr.push_str(&indent_entries(&entries, "    "));
        type_expr.push_str("  ],\n");
        type_expr.push_str(&format!("  ctor: {name}._ctor,\n"));
        type_expr.push(')');

        Ok(Struct {
            has_nullable_field: members.iter().any(|m| m.ty.nullable),
            type_symbol: names::type_symbol(&name),
            type_expr,
            members,
            size: decl.size,
            doc: decl.attributes.doc_lines(),
            name,
        })
    }

    /// Compiles a table. Member declarations are always nullable since any field
    /// may be absent on the wire.
    ///
    /// # Errors
    /// Returns `CompileError::DuplicateOrdinal` if two members share an ordinal,
    /// `CompileError::NameCollision` if two members share a field name, and
    /// `CompileError::UnresolvedReference` if a member type cannot be resolved.
    pub fn compile_table(&self, decl: &TableDecl) -> Result<Table> {
        check_ordinals(&decl.name, &decl.members)?;

        let fidl = self.compiler.config().fidl();
        let name = self.compiler.declaration_name(&decl.name)?;
        let types = TypeResolver::new(self.compiler);

        let mut members = Vec::new();
        let mut reserved_ordinals = Vec::new();
        for member in &decl.members {
            let Some(active) = member.as_active() else {
                reserved_ordinals.push(member.ordinal());
                continue;
            };
            let context = format!("member '{}' of '{}'", active.name, decl.name);
            members.push(TableMember {
                ordinal: active.ordinal,
                ty: types.resolve(&active.ty, NullabilityOverride::Nullable, &context)?,
                name: names::lower_camel(&active.name, NameContext::Member),
                doc: active.attributes.doc_lines(),
            });
        }

        let sources = decl
            .members
            .iter()
            .filter_map(OrdinalMember::as_active)
            .map(|m| m.name.as_str());
        check_names(&decl.name, sources.zip(members.iter().map(|m| m.name.as_str())))?;

        let entries: Vec<String> = members
            .iter()
            .map(|m| format!("{}: {}", m.ordinal, m.ty.type_expr))
            .collect();
        let mut type_expr = String::new();
        type_expr.push_str(&format!("{fidl}.TableType<{name}>(\n"));
        type_expr.push_str(&format!("  encodedSize: {},\n", decl.size));
        type_expr.push_str(&format!("  members: <int, {fidl}.FidlType>{{\n"));
        type_expr.push_str(&indent_entries(&entries, "    "));
        type_expr.push_str("  },\n");
        type_expr.push_str(&format!("  ctor: {name}._ctor,\n"));
        type_expr.push(')');

        Ok(Table {
            type_symbol: names::type_symbol(&name),
            type_expr,
            members,
            reserved_ordinals,
            size: decl.size,
            doc: decl.attributes.doc_lines(),
            name,
        })
    }
}
