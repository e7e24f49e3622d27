//! Error types for the middle-end.

use thiserror::Error;

/// Error type for compilation. Every variant aborts the whole run.
#[derive(Debug, Error)]
pub enum CompileError {
    /// IR ingestion error.
    #[error("IR error: {0}")]
    Ir(#[from] fidlgen_ir::IrError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Identifier that names no known declaration, const or member.
    #[error("unresolved reference '{identifier}' in {context}")]
    UnresolvedReference {
        /// Identifier as written in the IR.
        identifier: String,
        /// Where the reference appeared.
        context: String,
    },

    /// Ordinal used by two members of one declaration.
    #[error("duplicate ordinal {ordinal:#x} in '{declaration}': '{first}' and '{second}'")]
    DuplicateOrdinal {
        /// Owning declaration.
        declaration: String,
        /// Colliding ordinal.
        ordinal: u32,
        /// Earlier member (or `reserved`).
        first: String,
        /// Later member (or `reserved`).
        second: String,
    },

    /// Two members of one declaration whose Dart spellings coincide.
    #[error("members '{first}' and '{second}' of '{declaration}' both compile to '{name}'")]
    NameCollision {
        /// Owning declaration.
        declaration: String,
        /// Shared Dart spelling.
        name: String,
        /// Earlier member, as named in the IR.
        first: String,
        /// Later member, as named in the IR.
        second: String,
    },

    /// Numeric literal matching neither the integer nor the floating-point grammar.
    #[error("malformed numeric literal '{value}'")]
    MalformedLiteral {
        /// Raw literal text.
        value: String,
    },
}

impl CompileError {
    /// Creates an unresolved reference error.
    pub fn unresolved(identifier: impl Into<String>, context: impl Into<String>) -> Self {
        Self::UnresolvedReference {
            identifier: identifier.into(),
            context: context.into(),
        }
    }

    /// Creates a malformed literal error.
    pub fn malformed(value: impl Into<String>) -> Self {
        Self::MalformedLiteral {
            value: value.into(),
        }
    }
}

/// Result type for compilation.
pub type Result<T> = std::result::Result<T, CompileError>;
