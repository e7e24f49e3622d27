//! Type references, constants and attributes.
//!
//! These mirror the JSON IR shapes one to one; field presence is significant and
//! the serde attributes below keep it that way.

use crate::identifier::EncodedCompoundIdentifier;
use serde::{Deserialize, Serialize};

/// Primitive subtypes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveSubtype {
    /// Boolean.
    Bool,
    /// Signed 8-bit integer.
    Int8,
    /// Signed 16-bit integer.
    Int16,
    /// Signed 32-bit integer.
    Int32,
    /// Signed 64-bit integer.
    Int64,
    /// Unsigned 8-bit integer.
    Uint8,
    /// Unsigned 16-bit integer.
    Uint16,
    /// Unsigned 32-bit integer.
    Uint32,
    /// Unsigned 64-bit integer.
    Uint64,
    /// 32-bit floating point.
    Float32,
    /// 64-bit floating point.
    Float64,
}

impl PrimitiveSubtype {
    /// Returns the size of the primitive in bytes.
    #[must_use]
    pub const fn size(&self) -> usize {
        match self {
            Self::Bool | Self::Int8 | Self::Uint8 => 1,
            Self::Int16 | Self::Uint16 => 2,
            Self::Int32 | Self::Uint32 | Self::Float32 => 4,
            Self::Int64 | Self::Uint64 | Self::Float64 => 8,
        }
    }

    /// Returns the IR spelling.
    #[must_use]
    pub const fn ir_name(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Uint8 => "uint8",
            Self::Uint16 => "uint16",
            Self::Uint32 => "uint32",
            Self::Uint64 => "uint64",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
        }
    }

    /// Returns true if this is a signed integer type.
    #[must_use]
    pub const fn is_signed(&self) -> bool {
        matches!(self, Self::Int8 | Self::Int16 | Self::Int32 | Self::Int64)
    }

    /// Returns true if this is an unsigned integer type.
    #[must_use]
    pub const fn is_unsigned(&self) -> bool {
        matches!(
            self,
            Self::Uint8 | Self::Uint16 | Self::Uint32 | Self::Uint64
        )
    }

    /// Returns true if this is a floating point type.
    #[must_use]
    pub const fn is_float(&self) -> bool {
        matches!(self, Self::Float32 | Self::Float64)
    }
}

/// Kernel object subtypes a handle may be constrained to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandleSubtype {
    /// Untyped handle.
    Handle,
    /// Process.
    Process,
    /// Thread.
    Thread,
    /// Virtual memory object.
    Vmo,
    /// Channel.
    Channel,
    /// Event.
    Event,
    /// Port.
    Port,
    /// Interrupt.
    Interrupt,
    /// Debug log.
    Log,
    /// Socket.
    Socket,
    /// Resource.
    Resource,
    /// Event pair.
    EventPair,
    /// Job.
    Job,
    /// Virtual memory address region.
    Vmar,
    /// FIFO.
    Fifo,
    /// Guest.
    Guest,
    /// Timer.
    Timer,
    /// Bus transaction initiator.
    Bti,
    /// Profile.
    Profile,
}

/// Type reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Type {
    /// Fixed-size array.
    Array {
        /// Element type.
        element_type: Box<Type>,
        /// Number of elements.
        element_count: u32,
    },
    /// Variable-size vector.
    Vector {
        /// Element type.
        element_type: Box<Type>,
        /// Upper bound, if any.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        maybe_element_count: Option<u32>,
        /// Whether absence is allowed.
        #[serde(default)]
        nullable: bool,
    },
    /// UTF-8 string.
    String {
        /// Upper bound in bytes, if any.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        maybe_element_count: Option<u32>,
        /// Whether absence is allowed.
        #[serde(default)]
        nullable: bool,
    },
    /// Kernel handle.
    Handle {
        /// Handle subtype.
        subtype: HandleSubtype,
        /// Whether absence is allowed.
        #[serde(default)]
        nullable: bool,
    },
    /// Server end of an interface channel.
    Request {
        /// Interface identifier.
        subtype: EncodedCompoundIdentifier,
        /// Whether absence is allowed.
        #[serde(default)]
        nullable: bool,
    },
    /// Primitive scalar.
    Primitive {
        /// Primitive subtype.
        subtype: PrimitiveSubtype,
    },
    /// Reference to another declaration.
    Identifier {
        /// Referenced declaration.
        identifier: EncodedCompoundIdentifier,
        /// Whether absence is allowed.
        #[serde(default)]
        nullable: bool,
    },
}

impl Type {
    /// Shorthand for a primitive type.
    #[must_use]
    pub const fn primitive(subtype: PrimitiveSubtype) -> Self {
        Self::Primitive { subtype }
    }

    /// Shorthand for an identifier type.
    #[must_use]
    pub fn identifier(identifier: impl Into<String>, nullable: bool) -> Self {
        Self::Identifier {
            identifier: EncodedCompoundIdentifier(identifier.into()),
            nullable,
        }
    }

    /// Returns the declared nullability. Arrays and primitives are never nullable.
    #[must_use]
    pub const fn is_nullable(&self) -> bool {
        match self {
            Self::Array { .. } | Self::Primitive { .. } => false,
            Self::Vector { nullable, .. }
            | Self::String { nullable, .. }
            | Self::Handle { nullable, .. }
            | Self::Request { nullable, .. }
            | Self::Identifier { nullable, .. } => *nullable,
        }
    }
}

/// Literal kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LiteralKind {
    /// Quoted string, value includes the quotes.
    String,
    /// Numeric literal, value is the source text.
    Numeric,
    /// `true`.
    True,
    /// `false`.
    False,
    /// `default`.
    Default,
}

/// Literal with its raw source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Literal {
    /// Literal kind.
    pub kind: LiteralKind,
    /// Raw text as captured by the schema parser.
    #[serde(default)]
    pub value: String,
}

impl Literal {
    /// Creates a numeric literal.
    #[must_use]
    pub fn numeric(value: impl Into<String>) -> Self {
        Self {
            kind: LiteralKind::Numeric,
            value: value.into(),
        }
    }
}

/// Constant value: either a literal or a reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Constant {
    /// Named reference to a const or an enum/bits member.
    Identifier {
        /// Referenced identifier.
        identifier: EncodedCompoundIdentifier,
    },
    /// Literal value.
    Literal {
        /// The literal.
        literal: Literal,
    },
}

impl Constant {
    /// Creates a numeric literal constant.
    #[must_use]
    pub fn numeric(value: impl Into<String>) -> Self {
        Self::Literal {
            literal: Literal::numeric(value),
        }
    }

    /// Creates an identifier constant.
    #[must_use]
    pub fn identifier(identifier: impl Into<String>) -> Self {
        Self::Identifier {
            identifier: EncodedCompoundIdentifier(identifier.into()),
        }
    }
}

/// Single key/value annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    /// Attribute name.
    pub name: String,
    /// Attribute value; empty for markers such as `[Discoverable]`.
    #[serde(default)]
    pub value: String,
}

/// Ordered attribute list.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes(pub Vec<Attribute>);

impl Attributes {
    /// Looks up an attribute by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.0.iter().find(|attr| attr.name == name)
    }

    /// Returns true if the attribute is present.
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Returns the documentation lines carried by the `Doc` attribute.
    ///
    /// A trailing empty line left by the final newline is dropped.
    #[must_use]
    pub fn doc_lines(&self) -> Vec<String> {
        let Some(doc) = self.get("Doc") else {
            return Vec::new();
        };
        let mut lines: Vec<String> = doc.value.split('\n').map(str::to_string).collect();
        if lines.last().is_some_and(String::is_empty) {
            lines.pop();
        }
        lines
    }
}
