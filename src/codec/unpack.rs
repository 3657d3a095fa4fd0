//! # Record Deserialization
//!
//! Unpacking is all-or-nothing: the buffer length must equal the layout's
//! packed size exactly, and the decode walks the resolved field tree in the
//! same order the encode pass wrote it: explicit pads and alignment gaps are
//! skipped, primitives are widened into runtime values, nested records and
//! fixed-length arrays are rebuilt recursively. Encode and decode share the
//! walk order, so no per-field offset table is needed.

use crate::codec::f16::f16_bits_to_f32;
use crate::layout::{align_up, FieldKind, Layout};
use crate::record::Record;
use crate::types::{Primitive, Value};
use eyre::{ensure, Result};
use std::sync::Arc;

/// Decodes a packed buffer into an instance of the given record type.
pub fn unpack(layout: &Arc<Layout>, data: &[u8]) -> Result<Record> {
    ensure!(
        data.len() == layout.size(),
        "unpack of record '{}' expects a buffer of {} bytes, got {}",
        layout.name(),
        layout.size(),
        data.len()
    );

    let mut cursor = Cursor {
        data,
        offset: 0,
        aligned: layout.mode().is_aligned(),
        big: layout.mode().is_big_endian(),
    };
    let values = decode_fields(layout, &mut cursor)?;
    debug_assert_eq!(cursor.offset, layout.size());

    Ok(Record::from_values_unchecked(layout.clone(), values))
}

struct Cursor<'a> {
    data: &'a [u8],
    offset: usize,
    aligned: bool,
    big: bool,
}

impl<'a> Cursor<'a> {
    fn skip(&mut self, n: usize) -> Result<()> {
        ensure!(
            self.offset + n <= self.data.len(),
            "decode ran past the end of the buffer"
        );
        self.offset += n;
        Ok(())
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        ensure!(
            self.offset + n <= self.data.len(),
            "decode ran past the end of the buffer"
        );
        let slice = &self.data[self.offset..self.offset + n];
        self.offset += n;
        Ok(slice)
    }
}

fn decode_fields(layout: &Layout, cursor: &mut Cursor<'_>) -> Result<Vec<Value>> {
    let mut values = Vec::with_capacity(layout.field_count());
    for field in layout.fields() {
        cursor.skip(field.pad_before())?;
        values.push(decode_kind(field.kind(), cursor)?);
        cursor.skip(field.pad_after())?;
    }
    Ok(values)
}

fn decode_kind(kind: &FieldKind, cursor: &mut Cursor<'_>) -> Result<Value> {
    match kind {
        FieldKind::Prim(prim) => {
            if cursor.aligned {
                let aligned = align_up(cursor.offset, prim.align());
                cursor.skip(aligned - cursor.offset)?;
            }
            let bytes = cursor.take(prim.size())?;
            Ok(read_primitive(*prim, bytes, cursor.big))
        }
        FieldKind::Bytes(len) => Ok(Value::Bytes(cursor.take(*len)?.to_vec())),
        FieldKind::Array { item, len } => {
            let mut items = Vec::with_capacity(*len);
            for _ in 0..*len {
                items.push(decode_kind(item, cursor)?);
            }
            Ok(Value::Array(items))
        }
        FieldKind::Record(nested) => {
            let values = decode_fields(nested, cursor)?;
            Ok(Value::Record(Record::from_values_unchecked(
                nested.clone(),
                values,
            )))
        }
    }
}

fn read_primitive(prim: Primitive, bytes: &[u8], big: bool) -> Value {
    match prim {
        Primitive::Bool => Value::Bool(bytes[0] != 0),
        Primitive::Char => Value::Char(bytes[0]),
        Primitive::F16 => {
            let bits = read_uint(bytes, big) as u16;
            Value::Float(f16_bits_to_f32(bits) as f64)
        }
        Primitive::F32 => {
            let bits = read_uint(bytes, big) as u32;
            Value::Float(f32::from_bits(bits) as f64)
        }
        Primitive::F64 => {
            let bits = read_uint(bytes, big) as u64;
            Value::Float(f64::from_bits(bits))
        }
        _ => {
            let raw = read_uint(bytes, big);
            let bits = bytes.len() as u32 * 8;
            let signed = prim
                .int_signedness()
                .expect("remaining kinds are integers");
            let v = if signed {
                // Sign-extend from the wire width.
                let shift = 128 - bits;
                ((raw as i128) << shift) >> shift
            } else {
                raw as i128
            };
            Value::Int(v)
        }
    }
}

/// Assembles up to 16 wire bytes into an unsigned value.
fn read_uint(bytes: &[u8], big: bool) -> u128 {
    let mut out: u128 = 0;
    if big {
        for &b in bytes {
            out = (out << 8) | b as u128;
        }
    } else {
        for &b in bytes.iter().rev() {
            out = (out << 8) | b as u128;
        }
    }
    out
}
