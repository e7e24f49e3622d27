//! Dart resolution modules.

pub mod constants;
pub mod enums;
pub mod interfaces;
pub mod literals;
pub mod structs;
pub mod types;
pub mod unions;

pub use constants::ConstantResolver;
pub use enums::EnumCompiler;
pub use interfaces::InterfaceCompiler;
pub use literals::{format_literal, format_numeric};
pub use structs::StructCompiler;
pub use types::{NullabilityOverride, TypeResolver};
pub use unions::UnionCompiler;

use crate::error::{CompileError, Result};
use fidlgen_ir::{EncodedCompoundIdentifier, OrdinalMember};
use std::collections::HashMap;

/// Rejects an ordinal used twice within one declaration, reserved slots included.
pub(crate) fn check_ordinals(
    declaration: &EncodedCompoundIdentifier,
    members: &[OrdinalMember],
) -> Result<()> {
    let mut seen: HashMap<u32, &str> = HashMap::with_capacity(members.len());

    for member in members {
        let label = member.as_active().map_or("reserved", |m| m.name.as_str());
        if let Some(first) = seen.insert(member.ordinal(), label) {
            return Err(CompileError::DuplicateOrdinal {
                declaration: declaration.to_string(),
                ordinal: member.ordinal(),
                first: first.to_string(),
                second: label.to_string(),
            });
        }
    }

    Ok(())
}

/// Rejects two members that compile to the same Dart spelling.
///
/// `members` pairs each IR member name with its compiled spelling.
pub(crate) fn check_names<'m>(
    declaration: &EncodedCompoundIdentifier,
    members: impl IntoIterator<Item = (&'m str, &'m str)>,
) -> Result<()> {
    let mut seen: HashMap<&str, &str> = HashMap::new();

    for (source, compiled) in members {
        if let Some(first) = seen.insert(compiled, source) {
            return Err(CompileError::NameCollision {
                declaration: declaration.to_string(),
                name: compiled.to_string(),
                first: first.to_string(),
                second: source.to_string(),
            });
        }
    }

    Ok(())
}

/// Joins descriptor entries into an indented multi-line block body.
pub(crate) fn indent_entries(entries: &[String], indent: &str) -> String {
    let mut output = String::new();
    for entry in entries {
        output.push_str(&format!("{indent}{entry},\n"));
    }
    output
}
