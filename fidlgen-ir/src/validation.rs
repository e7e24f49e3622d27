//! IR consistency checks.
//!
//! These catch documents whose collections and `declarations` table disagree.
//! Ordinal uniqueness is deliberately left to the compiler, which reports it
//! against the compiled declaration.

use crate::decls::{DeclKind, Root};
use crate::error::IrError;
use crate::identifier::{EncodedCompoundIdentifier, LibraryIdentifier};
use std::collections::HashSet;

/// Validates a parsed root.
///
/// # Errors
/// Returns `IrError::DuplicateDeclaration` if a name is declared twice across the
/// local collections, `IrError::KindMismatch` if the `declarations` table lists a
/// local declaration under another kind, `IrError::MissingDeclaration` if it lists a
/// local name that no collection declares, or `IrError::InvalidIdentifier` for names
/// that do not parse.
pub fn validate_root(root: &Root) -> Result<(), IrError> {
    let mut seen = HashSet::new();

    for (name, declared) in local_declarations(root) {
        name.parse()?;

        if !seen.insert(name) {
            return Err(IrError::DuplicateDeclaration {
                name: name.to_string(),
            });
        }

        if let Some(listed) = root.declarations.get(name) {
            if !kinds_agree(*listed, declared) {
                return Err(IrError::KindMismatch {
                    name: name.to_string(),
                    listed: listed.to_string(),
                    declared: declared.to_string(),
                });
            }
        }
    }

    let library = LibraryIdentifier::parse(&root.name);
    for (name, listed) in &root.declarations {
        let parsed = name.parse()?;
        let local = parsed.library.is_empty() || parsed.library == library;
        if local && !seen.contains(name) {
            return Err(IrError::MissingDeclaration {
                name: name.to_string(),
                listed: listed.to_string(),
            });
        }
    }

    Ok(())
}

/// Iterates every local declaration with the kind implied by its collection.
pub fn local_declarations(
    root: &Root,
) -> impl Iterator<Item = (&EncodedCompoundIdentifier, DeclKind)> {
    let consts = root.consts.iter().map(|d| (&d.name, DeclKind::Const));
    let enums = root.enums.iter().map(|d| (&d.name, DeclKind::Enum));
    let bits = root.bits.iter().map(|d| (&d.name, DeclKind::Bits));
    let structs = root.structs.iter().map(|d| (&d.name, DeclKind::Struct));
    let tables = root.tables.iter().map(|d| (&d.name, DeclKind::Table));
    let unions = root.unions.iter().map(|d| (&d.name, DeclKind::Union));
    let xunions = root.xunions.iter().map(|d| (&d.name, DeclKind::XUnion));
    let interfaces = root
        .interfaces
        .iter()
        .map(|d| (&d.name, DeclKind::Interface));

    consts
        .chain(enums)
        .chain(bits)
        .chain(structs)
        .chain(tables)
        .chain(unions)
        .chain(xunions)
        .chain(interfaces)
}

/// Both union spellings describe the same compiled shape, so either listing is
/// accepted for either collection.
fn kinds_agree(listed: DeclKind, declared: DeclKind) -> bool {
    listed == declared || (listed.is_union() && declared.is_union())
}
