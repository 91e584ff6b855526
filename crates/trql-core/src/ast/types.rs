//! Column type expressions, as used by `CAST(e AS type)`.

use core::fmt;

use serde::Serialize;

use super::format::{write_list, write_name, write_string};
use super::Expr;
use crate::lexer::Span;

/// A column type expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnType {
    /// The shape of the type expression.
    pub kind: ColumnTypeKind,
    /// Source span.
    pub span: Span,
}

/// A field of a `Nested(...)` type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NestedField {
    /// Field name.
    pub name: String,
    /// Field type.
    pub data_type: ColumnType,
}

/// A `'name' = value` entry of an `Enum8(...)` type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumValue {
    /// The enum label.
    pub name: String,
    /// The stored value.
    pub value: i64,
}

/// The shapes a column type expression can take.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ColumnTypeKind {
    /// `UInt64`
    Simple(String),
    /// `Nested(name String, tags Array(String))`
    Nested {
        name: String,
        fields: Vec<NestedField>,
    },
    /// `Enum8('a' = 1, 'b' = 2)`
    Enum {
        name: String,
        values: Vec<EnumValue>,
    },
    /// `Array(String)`, `Tuple(UInt8, String)`
    Complex {
        name: String,
        args: Vec<ColumnType>,
    },
    /// `FixedString(16)`, `DateTime64(3, 'UTC')`
    Param {
        name: String,
        args: Vec<Expr>,
    },
}

impl ColumnType {
    /// Creates a new column type.
    #[must_use]
    pub const fn new(kind: ColumnTypeKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Returns the outermost type name.
    #[must_use]
    pub fn name(&self) -> &str {
        match &self.kind {
            ColumnTypeKind::Simple(name)
            | ColumnTypeKind::Nested { name, .. }
            | ColumnTypeKind::Enum { name, .. }
            | ColumnTypeKind::Complex { name, .. }
            | ColumnTypeKind::Param { name, .. } => name,
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_name(f, self.name())?;
        match &self.kind {
            ColumnTypeKind::Simple(_) => Ok(()),
            ColumnTypeKind::Nested { fields, .. } => {
                f.write_str("(")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write_name(f, &field.name)?;
                    write!(f, " {}", field.data_type)?;
                }
                f.write_str(")")
            }
            ColumnTypeKind::Enum { values, .. } => {
                f.write_str("(")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write_string(f, &value.name, '\'')?;
                    write!(f, " = {}", value.value)?;
                }
                f.write_str(")")
            }
            ColumnTypeKind::Complex { args, .. } => {
                f.write_str("(")?;
                write_list(f, args)?;
                f.write_str(")")
            }
            ColumnTypeKind::Param { args, .. } => {
                f.write_str("(")?;
                write_list(f, args)?;
                f.write_str(")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simple(name: &str) -> ColumnType {
        ColumnType::new(ColumnTypeKind::Simple(name.into()), Span::default())
    }

    #[test]
    fn test_column_type_display() {
        assert_eq!(simple("UInt64").to_string(), "UInt64");
        let array = ColumnType::new(
            ColumnTypeKind::Complex {
                name: "Array".into(),
                args: vec![simple("String")],
            },
            Span::default(),
        );
        assert_eq!(array.to_string(), "Array(String)");
    }

    #[test]
    fn test_enum_display() {
        let enum_type = ColumnType::new(
            ColumnTypeKind::Enum {
                name: "Enum8".into(),
                values: vec![
                    EnumValue {
                        name: "a".into(),
                        value: 1,
                    },
                    EnumValue {
                        name: "b".into(),
                        value: -2,
                    },
                ],
            },
            Span::default(),
        );
        assert_eq!(enum_type.to_string(), "Enum8('a' = 1, 'b' = -2)");
    }

    #[test]
    fn test_only_reserved_type_names_are_quoted() {
        assert_eq!(simple("Date").to_string(), "Date");
        assert_eq!(simple("Date").name(), "Date");
        assert_eq!(simple("select").to_string(), "`select`");
    }
}
