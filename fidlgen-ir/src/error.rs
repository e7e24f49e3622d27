//! Error types for reading and validating the JSON IR.

use thiserror::Error;

/// Error type for IR ingestion.
#[derive(Debug, Error)]
pub enum IrError {
    /// Malformed JSON or a document that does not match the IR shape.
    #[error("JSON IR error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Compound identifier that cannot be split into library, name and member.
    #[error("invalid compound identifier '{identifier}'")]
    InvalidIdentifier {
        /// Raw identifier text.
        identifier: String,
    },

    /// Declaration member missing a field its kind requires.
    #[error("invalid member in '{declaration}': {reason}")]
    InvalidMember {
        /// Owning declaration.
        declaration: String,
        /// What is wrong with the member.
        reason: String,
    },

    /// The same identifier declared more than once in the local collections.
    #[error("duplicate declaration '{name}'")]
    DuplicateDeclaration {
        /// Encoded compound identifier.
        name: String,
    },

    /// The `declarations` table disagrees with the collection a declaration lives in.
    #[error("declaration '{name}' listed as {listed} but declared as {declared}")]
    KindMismatch {
        /// Encoded compound identifier.
        name: String,
        /// Kind recorded in the declarations table.
        listed: String,
        /// Kind implied by the declaration collection.
        declared: String,
    },

    /// A local name in the `declarations` table with no declaration body.
    #[error("declaration '{name}' listed as {listed} but never declared")]
    MissingDeclaration {
        /// Encoded compound identifier.
        name: String,
        /// Kind recorded in the declarations table.
        listed: String,
    },
}

impl IrError {
    /// Creates an invalid member error.
    pub fn invalid_member(declaration: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidMember {
            declaration: declaration.into(),
            reason: reason.into(),
        }
    }

    /// Creates an invalid identifier error.
    pub fn invalid_identifier(identifier: impl Into<String>) -> Self {
        Self::InvalidIdentifier {
            identifier: identifier.into(),
        }
    }
}
