//! Compound identifiers.
//!
//! The IR names every declaration with an encoded compound identifier of the form
//! `library.name/Decl` or, for members, `library.name/Decl.MEMBER`. Identifiers in
//! hand-written fixtures may omit the library part entirely (`Decl`).

use crate::error::IrError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Encoded compound identifier exactly as it appears in the IR.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncodedCompoundIdentifier(pub String);

impl EncodedCompoundIdentifier {
    /// Creates an encoded identifier from raw text.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns the raw text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Splits the identifier into its parts.
    ///
    /// # Errors
    /// Returns `IrError::InvalidIdentifier` if the declaration name is empty or
    /// more than one `/` separator is present.
    pub fn parse(&self) -> Result<CompoundIdentifier, IrError> {
        CompoundIdentifier::parse(&self.0)
    }

    /// Returns the identifier with any `.MEMBER` suffix removed.
    ///
    /// # Errors
    /// Returns `IrError::InvalidIdentifier` if the identifier cannot be parsed.
    pub fn declaration(&self) -> Result<Self, IrError> {
        let parsed = self.parse()?;
        Ok(parsed.declaration_identifier())
    }
}

impl fmt::Display for EncodedCompoundIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EncodedCompoundIdentifier {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Library name split on `.`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct LibraryIdentifier(pub Vec<String>);

impl LibraryIdentifier {
    /// Parses a dotted library name. The empty string yields the empty library.
    #[must_use]
    pub fn parse(name: &str) -> Self {
        if name.is_empty() {
            return Self::default();
        }
        Self(name.split('.').map(str::to_string).collect())
    }

    /// Returns true for the unnamed library.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Joins the library parts with a separator.
    #[must_use]
    pub fn join(&self, sep: &str) -> String {
        self.0.join(sep)
    }
}

impl fmt::Display for LibraryIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.join("."))
    }
}

/// Parsed compound identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompoundIdentifier {
    /// Owning library.
    pub library: LibraryIdentifier,
    /// Declaration name.
    pub name: String,
    /// Member name for `Decl.MEMBER` references.
    pub member: Option<String>,
}

impl CompoundIdentifier {
    /// Parses `library/Decl[.MEMBER]` or `Decl[.MEMBER]`.
    ///
    /// # Errors
    /// Returns `IrError::InvalidIdentifier` on empty names or repeated `/`.
    pub fn parse(raw: &str) -> Result<Self, IrError> {
        let (library, rest) = match raw.split_once('/') {
            Some((library, rest)) => (LibraryIdentifier::parse(library), rest),
            None => (LibraryIdentifier::default(), raw),
        };

        if rest.contains('/') {
            return Err(IrError::invalid_identifier(raw));
        }

        let (name, member) = match rest.split_once('.') {
            Some((name, member)) => (name, Some(member.to_string())),
            None => (rest, None),
        };

        if name.is_empty() || member.as_deref() == Some("") {
            return Err(IrError::invalid_identifier(raw));
        }

        Ok(Self {
            library,
            name: name.to_string(),
            member,
        })
    }

    /// Returns the encoded identifier of the owning declaration (member dropped).
    #[must_use]
    pub fn declaration_identifier(&self) -> EncodedCompoundIdentifier {
        if self.library.is_empty() {
            EncodedCompoundIdentifier(self.name.clone())
        } else {
            EncodedCompoundIdentifier(format!("{}/{}", self.library, self.name))
        }
    }
}
