//! # Record Serialization
//!
//! Packing happens in two passes. The first flattens the instance depth-first
//! in declaration order into a flat list of leaf write-ops: nested record
//! values contribute their own fields inline, fixed-length arrays repeat the
//! item rule per element, byte arrays and primitives become single ops. The
//! second pass encodes the ops with a running byte offset, inserting natural
//! alignment zeros under native-aligned mode and explicit `x` pads as zero
//! bytes everywhere.
//!
//! ## Value Checks
//!
//! The flatten pass rejects values whose shape does not fit the layout
//! (wrong variant, wrong array length, instance of a different record type).
//! Integer leaves are checked against their wire width as the encode step
//! narrows them; there is no separate validator pass at pack time.
//!
//! ## Byte Arrays
//!
//! A bytes value shorter than the declared length is zero-padded on the
//! right; a longer value is silently truncated to the declared length.

use crate::codec::f16::f32_to_f16_bits;
use crate::layout::{align_up, Field, FieldKind, Layout};
use crate::record::Record;
use crate::types::{Primitive, Value};
use eyre::{bail, ensure, Result};
use smallvec::SmallVec;
use std::sync::Arc;

/// One leaf write operation produced by the flatten pass.
enum Op<'a> {
    Pad(usize),
    Prim {
        prim: Primitive,
        value: &'a Value,
        field: &'a str,
    },
    Bytes {
        len: usize,
        value: &'a Value,
        field: &'a str,
    },
}

type Ops<'a> = SmallVec<[Op<'a>; 32]>;

/// Serializes a record instance to its packed byte representation.
pub fn pack(record: &Record) -> Result<Vec<u8>> {
    let layout = record.layout();
    let mut ops: Ops<'_> = SmallVec::new();
    flatten_fields(layout.fields(), record.values(), &mut ops)?;
    encode(layout, &ops)
}

fn flatten_fields<'a>(fields: &'a [Field], values: &'a [Value], ops: &mut Ops<'a>) -> Result<()> {
    for (field, value) in fields.iter().zip(values) {
        if field.pad_before() > 0 {
            ops.push(Op::Pad(field.pad_before()));
        }
        flatten_kind(field.kind(), value, field.name(), ops)?;
        if field.pad_after() > 0 {
            ops.push(Op::Pad(field.pad_after()));
        }
    }
    Ok(())
}

fn flatten_kind<'a>(
    kind: &'a FieldKind,
    value: &'a Value,
    field: &'a str,
    ops: &mut Ops<'a>,
) -> Result<()> {
    match kind {
        FieldKind::Prim(prim) => {
            ops.push(Op::Prim {
                prim: *prim,
                value,
                field,
            });
            Ok(())
        }
        FieldKind::Bytes(len) => {
            ops.push(Op::Bytes {
                len: *len,
                value,
                field,
            });
            Ok(())
        }
        FieldKind::Array { item, len } => {
            let items = match value {
                Value::Array(items) => items,
                other => bail!(
                    "invalid value for field '{}': expected array, got {}",
                    field,
                    other.type_name()
                ),
            };
            ensure!(
                items.len() == *len,
                "array for field '{}' has length {}, expected {}",
                field,
                items.len(),
                len
            );
            for v in items {
                flatten_kind(item, v, field, ops)?;
            }
            Ok(())
        }
        FieldKind::Record(nested) => {
            let rec = match value {
                Value::Record(rec) => rec,
                other => bail!(
                    "invalid value for field '{}': expected instance of record '{}', got {}",
                    field,
                    nested.name(),
                    other.type_name()
                ),
            };
            ensure!(
                Arc::ptr_eq(rec.layout_arc(), nested),
                "value for field '{}' is not an instance of record '{}'",
                field,
                nested.name()
            );
            flatten_fields(nested.fields(), rec.values(), ops)
        }
    }
}

fn encode(layout: &Layout, ops: &[Op<'_>]) -> Result<Vec<u8>> {
    let aligned = layout.mode().is_aligned();
    let big = layout.mode().is_big_endian();
    let mut buf = Vec::with_capacity(layout.size());

    for op in ops {
        match op {
            Op::Pad(n) => buf.resize(buf.len() + n, 0),
            Op::Prim { prim, value, field } => {
                if aligned {
                    let padded = align_up(buf.len(), prim.align());
                    buf.resize(padded, 0);
                }
                write_primitive(&mut buf, *prim, value, big, field)?;
            }
            Op::Bytes { len, value, field } => {
                let bytes = match value {
                    Value::Bytes(b) => b,
                    other => bail!(
                        "invalid value for field '{}': expected bytes, got {}",
                        field,
                        other.type_name()
                    ),
                };
                let copied = bytes.len().min(*len);
                buf.extend_from_slice(&bytes[..copied]);
                buf.resize(buf.len() + (len - copied), 0);
            }
        }
    }

    debug_assert_eq!(buf.len(), layout.size());
    Ok(buf)
}

fn write_primitive(
    buf: &mut Vec<u8>,
    prim: Primitive,
    value: &Value,
    big: bool,
    field: &str,
) -> Result<()> {
    match prim {
        Primitive::Bool => match value {
            Value::Bool(b) => {
                buf.push(u8::from(*b));
                Ok(())
            }
            other => bail!(
                "invalid value for field '{}': expected bool, got {}",
                field,
                other.type_name()
            ),
        },
        Primitive::Char => match value {
            Value::Char(c) => {
                buf.push(*c);
                Ok(())
            }
            other => bail!(
                "invalid value for field '{}': expected char, got {}",
                field,
                other.type_name()
            ),
        },
        Primitive::F16 | Primitive::F32 | Primitive::F64 => {
            let f = match value {
                Value::Float(f) => *f,
                Value::Int(i) => *i as f64,
                other => bail!(
                    "invalid value for field '{}': expected float, got {}",
                    field,
                    other.type_name()
                ),
            };
            match prim {
                Primitive::F16 => push_uint(buf, f32_to_f16_bits(f as f32) as u128, 2, big),
                Primitive::F32 => {
                    let bytes = (f as f32).to_le_bytes();
                    push_le(buf, &bytes, big);
                }
                _ => {
                    let bytes = f.to_le_bytes();
                    push_le(buf, &bytes, big);
                }
            }
            Ok(())
        }
        _ => {
            let v = match value {
                Value::Int(v) => *v,
                other => bail!(
                    "invalid value for field '{}': expected integer, got {}",
                    field,
                    other.type_name()
                ),
            };
            // The narrowing itself is the overflow check; failures read the
            // same as the compile-time default range errors.
            prim.validate(value)
                .map_err(|e| eyre::eyre!("{} (field '{}')", e, field))?;
            push_uint(buf, v as u128, prim.size(), big);
            Ok(())
        }
    }
}

/// Writes the low `size` bytes of `v` (two's complement) in wire order.
fn push_uint(buf: &mut Vec<u8>, v: u128, size: usize, big: bool) {
    let le = v.to_le_bytes();
    push_le(buf, &le[..size], big);
}

fn push_le(buf: &mut Vec<u8>, le_bytes: &[u8], big: bool) {
    if big {
        buf.extend(le_bytes.iter().rev());
    } else {
        buf.extend_from_slice(le_bytes);
    }
}
