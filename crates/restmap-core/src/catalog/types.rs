//! Core type definitions for the catalog.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Scalar data types a model property can hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScalarType {
    /// Boolean value.
    Bool,
    /// 32-bit signed integer.
    Int32,
    /// 64-bit signed integer.
    Int64,
    /// 32-bit floating point.
    Float32,
    /// 64-bit floating point.
    Float64,
    /// Fixed-precision decimal.
    Decimal {
        /// Total number of digits.
        precision: u8,
        /// Number of digits after decimal point.
        scale: u8,
    },
    /// UTF-8 string.
    String,
    /// Binary data.
    Bytes,
    /// Calendar date-time.
    Date,
    /// Integer timestamp.
    Timestamp,
    /// UUID (128-bit identifier).
    Uuid,
}

/// Field types - flat representation without recursion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldType {
    /// A scalar value.
    Scalar(ScalarType),
    /// An optional scalar value (nullable).
    OptionalScalar(ScalarType),
    /// An array of scalar values.
    ArrayScalar(ScalarType),
    /// An enumeration type.
    Enum {
        /// Name of the enum type.
        name: String,
        /// Allowed variant values.
        variants: Vec<String>,
    },
    /// An optional enumeration.
    OptionalEnum {
        /// Name of the enum type.
        name: String,
        /// Allowed variant values.
        variants: Vec<String>,
    },
    /// An embedded entity (nested object).
    Embedded {
        /// Name of the embedded entity type.
        entity: String,
    },
    /// An optional embedded entity.
    OptionalEmbedded {
        /// Name of the embedded entity type.
        entity: String,
    },
    /// An array of embedded entities.
    ArrayEmbedded {
        /// Name of the embedded entity type.
        entity: String,
    },
}

/// Format tags of a column.
///
/// The value codec reads these tags to decide how a textual operand is
/// turned back into a typed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Format {
    Null,
    Boolean,
    Integer,
    Decimal,
    Number,
    String,
    Enumeration,
    Binary,
    Date,
    Timestamp,
    Uuid,
    Object,
    Array,
}

impl Format {
    /// Lowercase name of the format.
    pub fn name(&self) -> &'static str {
        match self {
            Format::Null => "null",
            Format::Boolean => "boolean",
            Format::Integer => "integer",
            Format::Decimal => "decimal",
            Format::Number => "number",
            Format::String => "string",
            Format::Enumeration => "enumeration",
            Format::Binary => "binary",
            Format::Date => "date",
            Format::Timestamp => "timestamp",
            Format::Uuid => "uuid",
            Format::Object => "object",
            Format::Array => "array",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl ScalarType {
    /// The format tag of this scalar type.
    pub fn format(&self) -> Format {
        match self {
            ScalarType::Bool => Format::Boolean,
            ScalarType::Int32 | ScalarType::Int64 => Format::Integer,
            ScalarType::Float32 | ScalarType::Float64 => Format::Number,
            ScalarType::Decimal { .. } => Format::Decimal,
            ScalarType::String => Format::String,
            ScalarType::Bytes => Format::Binary,
            ScalarType::Date => Format::Date,
            ScalarType::Timestamp => Format::Timestamp,
            ScalarType::Uuid => Format::Uuid,
        }
    }
}

impl FieldType {
    /// Create a scalar field type.
    pub fn scalar(scalar: ScalarType) -> Self {
        FieldType::Scalar(scalar)
    }

    /// Create an optional scalar field type.
    pub fn optional_scalar(scalar: ScalarType) -> Self {
        FieldType::OptionalScalar(scalar)
    }

    /// Create an array of scalars field type.
    pub fn array_scalar(scalar: ScalarType) -> Self {
        FieldType::ArrayScalar(scalar)
    }

    /// Create an enum field type.
    pub fn enum_type(name: impl Into<String>, variants: Vec<String>) -> Self {
        FieldType::Enum {
            name: name.into(),
            variants,
        }
    }

    /// Create an embedded entity field type.
    pub fn embedded(entity: impl Into<String>) -> Self {
        FieldType::Embedded {
            entity: entity.into(),
        }
    }

    /// Check if this type is nullable.
    pub fn is_nullable(&self) -> bool {
        matches!(
            self,
            FieldType::OptionalScalar(_)
                | FieldType::OptionalEnum { .. }
                | FieldType::OptionalEmbedded { .. }
        )
    }

    /// Check if this type is an array.
    pub fn is_array(&self) -> bool {
        matches!(
            self,
            FieldType::ArrayScalar(_) | FieldType::ArrayEmbedded { .. }
        )
    }

    /// Get the embedded entity name if this type nests another entity.
    pub fn embedded_entity(&self) -> Option<&str> {
        match self {
            FieldType::Embedded { entity }
            | FieldType::OptionalEmbedded { entity }
            | FieldType::ArrayEmbedded { entity } => Some(entity),
            _ => None,
        }
    }

    /// Format tags describing this type.
    pub fn formats(&self) -> Vec<Format> {
        let mut formats = Vec::with_capacity(2);
        match self {
            FieldType::Scalar(s) | FieldType::OptionalScalar(s) | FieldType::ArrayScalar(s) => {
                formats.push(s.format())
            }
            FieldType::Enum { .. } | FieldType::OptionalEnum { .. } => {
                formats.push(Format::Enumeration)
            }
            FieldType::Embedded { .. }
            | FieldType::OptionalEmbedded { .. }
            | FieldType::ArrayEmbedded { .. } => formats.push(Format::Object),
        }
        if self.is_array() {
            formats.push(Format::Array);
        }
        if self.is_nullable() {
            formats.push(Format::Null);
        }
        formats
    }
}
