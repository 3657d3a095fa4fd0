//! # Owned Runtime Values
//!
//! `Value` is the owned value representation carried by record instances and
//! consumed/produced by the codec. One variant per field-kind family:
//!
//! | Variant   | Field kinds                                               |
//! |-----------|-----------------------------------------------------------|
//! | `Bool`    | bool                                                      |
//! | `Char`    | single byte char                                          |
//! | `Int`     | every integer kind (i128 covers the full i64..u64 range)  |
//! | `Float`   | f16/f32/f64                                               |
//! | `Bytes`   | fixed-size byte arrays                                    |
//! | `Array`   | fixed-length arrays                                       |
//! | `Record`  | nested record instances                                   |
//!
//! Values are deliberately untyped until they meet a compiled layout: the
//! same `Value::Int(5)` can satisfy a `U8` or an `I64` field. Width and
//! signedness checks happen at default-validation time and again as the
//! encode step narrows the value into its wire width.

use crate::record::Record;

/// Fully-owned field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Char(u8),
    Int(i128),
    Float(f64),
    Bytes(Vec<u8>),
    Array(Vec<Value>),
    Record(Record),
}

impl Value {
    /// Short type tag used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Char(_) => "char",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Bytes(_) => "bytes",
            Value::Array(_) => "array",
            Value::Record(_) => "record",
        }
    }

    /// True if this value is a nested record instance.
    pub fn is_record(&self) -> bool {
        matches!(self, Value::Record(_))
    }

    /// Formats the value as a display string.
    pub fn display_string(&self) -> String {
        match self {
            Value::Bool(b) => if *b { "true" } else { "false" }.to_string(),
            Value::Char(c) => format!("'{}'", *c as char),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Bytes(b) => format!("\\x{}", hex_encode(b)),
            Value::Array(items) => format!(
                "[{}]",
                items
                    .iter()
                    .map(|v| v.display_string())
                    .collect::<Vec<_>>()
                    .join(",")
            ),
            Value::Record(rec) => format!(
                "{}({})",
                rec.layout().name(),
                rec.values()
                    .iter()
                    .map(|v| v.display_string())
                    .collect::<Vec<_>>()
                    .join(",")
            ),
        }
    }
}

fn hex_encode(data: &[u8]) -> String {
    data.iter().map(|b| format!("{:02x}", b)).collect()
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i128> for Value {
    fn from(v: i128) -> Self {
        Value::Int(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v as i128)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::Int(v as i128)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i128)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Int(v as i128)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v as f64)
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::Bytes(v.to_vec())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl From<Record> for Value {
    fn from(v: Record) -> Self {
        Value::Record(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_names_match_variants() {
        assert_eq!(Value::Bool(true).type_name(), "bool");
        assert_eq!(Value::Int(0).type_name(), "integer");
        assert_eq!(Value::Float(0.0).type_name(), "float");
        assert_eq!(Value::Bytes(vec![]).type_name(), "bytes");
        assert_eq!(Value::Array(vec![]).type_name(), "array");
    }

    #[test]
    fn display_strings() {
        assert_eq!(Value::Bool(true).display_string(), "true");
        assert_eq!(Value::Int(-7).display_string(), "-7");
        assert_eq!(Value::Char(b'A').display_string(), "'A'");
        assert_eq!(Value::Bytes(vec![0xde, 0xad]).display_string(), "\\xdead");
        assert_eq!(
            Value::Array(vec![Value::Int(1), Value::Int(2)]).display_string(),
            "[1,2]"
        );
    }

    #[test]
    fn conversions_produce_expected_variants() {
        assert_eq!(Value::from(5u32), Value::Int(5));
        assert_eq!(Value::from(-5i64), Value::Int(-5));
        assert_eq!(Value::from(u64::MAX), Value::Int(u64::MAX as i128));
        assert_eq!(Value::from(0.5f64), Value::Float(0.5));
        assert_eq!(Value::from(&b"ab"[..]), Value::Bytes(vec![b'a', b'b']));
    }
}
