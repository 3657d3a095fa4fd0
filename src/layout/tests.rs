use crate::layout::{FieldDef, RecordDef, TypeSpec};
use crate::mode::Mode;
use crate::record::Record;
use crate::registry::Registry;
use crate::types::{Primitive, Value};

#[test]
fn format_string_starts_with_the_mode_marker() {
    for (mode, marker) in [
        (Mode::NATIVE_ALIGNED, '@'),
        (Mode::NATIVE, '='),
        (Mode::LITTLE_ENDIAN, '<'),
        (Mode::BIG_ENDIAN, '>'),
        (Mode::NETWORK, '!'),
    ] {
        let layout = RecordDef::new("One")
            .mode(mode)
            .field(FieldDef::new("v", Primitive::U16))
            .compile()
            .unwrap();
        assert_eq!(layout.format(), format!("{}H", marker));
    }
}

#[test]
fn empty_record_has_size_zero() {
    let layout = RecordDef::new("Empty").compile().unwrap();
    assert_eq!(layout.size(), 0);
    assert_eq!(layout.format(), "@");
    assert_eq!(layout.field_count(), 0);

    let rec = Record::new(&layout, vec![]).unwrap();
    let packed = rec.pack().unwrap();
    assert!(packed.is_empty());
    assert_eq!(layout.unpack(&packed).unwrap(), rec);
}

#[test]
fn standard_size_is_the_sum_of_field_widths() {
    let layout = RecordDef::new("Packet")
        .mode(Mode::BIG_ENDIAN)
        .field(FieldDef::new("a", Primitive::U8))
        .field(FieldDef::new("b", Primitive::U32))
        .field(FieldDef::new("c", Primitive::F64))
        .field(FieldDef::new("d", TypeSpec::Bytes(13)))
        .compile()
        .unwrap();
    assert_eq!(layout.format(), ">BId13s");
    assert_eq!(layout.size(), 1 + 4 + 8 + 13);
}

#[test]
fn native_aligned_mode_inserts_natural_alignment() {
    // u32 at 0..4, f64 padded to 8, bytes at 16..29.
    let layout = RecordDef::new("Aligned")
        .field(FieldDef::new("a", Primitive::U32))
        .field(FieldDef::new("b", Primitive::F64))
        .field(FieldDef::new("c", TypeSpec::Bytes(13)))
        .compile()
        .unwrap();
    assert_eq!(layout.format(), "@Id13s");
    assert_eq!(layout.size(), 29);
}

#[test]
fn no_trailing_padding_is_added() {
    let layout = RecordDef::new("Tail")
        .field(FieldDef::new("a", Primitive::F64))
        .field(FieldDef::new("b", Primitive::Bool))
        .compile()
        .unwrap();
    assert_eq!(layout.size(), 9);
}

#[test]
fn bool_and_char_pack_byte_tight_under_alignment() {
    let layout = RecordDef::new("Tight")
        .field(FieldDef::new("a", Primitive::Char))
        .field(FieldDef::new("b", Primitive::Bool))
        .field(FieldDef::new("c", Primitive::Char))
        .compile()
        .unwrap();
    assert_eq!(layout.size(), 3);

    // A wider neighbor still forces its own alignment.
    let layout = RecordDef::new("Gap")
        .field(FieldDef::new("flag", Primitive::Bool))
        .field(FieldDef::new("count", Primitive::I32))
        .compile()
        .unwrap();
    assert_eq!(layout.format(), "@?i");
    assert_eq!(layout.size(), 8);
}

#[test]
fn nested_records_align_over_the_flattened_stream() {
    let inner = RecordDef::new("Inner")
        .field(FieldDef::new("v", Primitive::F64))
        .compile()
        .unwrap();
    // The nested f64 aligns to 8 relative to the container's start, as if
    // the fields had been declared inline.
    let outer = RecordDef::new("Outer")
        .field(FieldDef::new("tag", Primitive::U8))
        .field(FieldDef::new("inner", &inner))
        .compile()
        .unwrap();
    assert_eq!(outer.format(), "@Bd");
    assert_eq!(outer.size(), 16);
}

#[test]
fn nested_format_embeds_without_its_marker() {
    let inner = RecordDef::new("Inner")
        .mode(Mode::LITTLE_ENDIAN)
        .field(FieldDef::new("x", Primitive::I16))
        .field(FieldDef::new("y", TypeSpec::Bytes(2)))
        .compile()
        .unwrap();
    let outer = RecordDef::new("Outer")
        .mode(Mode::LITTLE_ENDIAN)
        .field(FieldDef::new("head", Primitive::U8))
        .field(FieldDef::new("body", &inner))
        .compile()
        .unwrap();
    assert_eq!(outer.format(), "<Bh2s");
    assert_eq!(outer.size(), 1 + 2 + 2);
}

#[test]
fn nested_mode_mismatch_names_both_modes() {
    let inner = RecordDef::new("Inner")
        .mode(Mode::BIG_ENDIAN)
        .field(FieldDef::new("v", Primitive::U8))
        .compile()
        .unwrap();
    let err = RecordDef::new("Outer")
        .mode(Mode::LITTLE_ENDIAN)
        .field(FieldDef::new("inner", &inner))
        .compile()
        .unwrap_err()
        .to_string();
    assert!(err.contains("mode of nested record 'Inner' ('>')"));
    assert!(err.contains("does not match that of container ('<')"));
}

#[test]
fn explicit_padding_shows_in_format_and_size() {
    let layout = RecordDef::new("Padded")
        .mode(Mode::LITTLE_ENDIAN)
        .field(FieldDef::new("v", Primitive::U16).pad_before(3).pad_after(2))
        .compile()
        .unwrap();
    assert_eq!(layout.format(), "<3xH2x");
    assert_eq!(layout.size(), 7);
}

#[test]
fn repeated_padding_calls_accumulate() {
    let layout = RecordDef::new("Padded")
        .mode(Mode::LITTLE_ENDIAN)
        .field(
            FieldDef::new("v", Primitive::U8)
                .pad_before(2)
                .pad_before(3),
        )
        .compile()
        .unwrap();
    assert_eq!(layout.format(), "<5xB");
    assert_eq!(layout.size(), 6);
}

#[test]
fn arrays_repeat_the_item_fragment() {
    let layout = RecordDef::new("Arr")
        .mode(Mode::BIG_ENDIAN)
        .field(FieldDef::new("xs", TypeSpec::array(Primitive::I16.into(), 3)))
        .compile()
        .unwrap();
    assert_eq!(layout.format(), ">hhh");
    assert_eq!(layout.size(), 6);
}

#[test]
fn multi_dimensional_arrays_flatten() {
    let layout = RecordDef::new("Grid")
        .mode(Mode::LITTLE_ENDIAN)
        .field(FieldDef::new(
            "cells",
            TypeSpec::array(TypeSpec::array(Primitive::U8.into(), 2), 3),
        ))
        .compile()
        .unwrap();
    assert_eq!(layout.format(), "<BBBBBB");
    assert_eq!(layout.size(), 6);
}

#[test]
fn zero_length_byte_array_is_rejected() {
    let err = RecordDef::new("Bad")
        .field(FieldDef::new("data", TypeSpec::Bytes(0)))
        .compile()
        .unwrap_err()
        .to_string();
    assert!(err.contains("byte array length must be a positive integer"));
}

#[test]
fn zero_length_array_is_rejected() {
    let err = RecordDef::new("Bad")
        .field(FieldDef::new("xs", TypeSpec::array(Primitive::U8.into(), 0)))
        .compile()
        .unwrap_err()
        .to_string();
    assert!(err.contains("array length must be a positive integer"));
}

#[test]
fn duplicate_field_names_are_rejected() {
    let err = RecordDef::new("Dup")
        .field(FieldDef::new("v", Primitive::U8))
        .field(FieldDef::new("v", Primitive::U16))
        .compile()
        .unwrap_err()
        .to_string();
    assert!(err.contains("record 'Dup' declares field 'v' more than once"));
}

#[test]
fn platform_kinds_are_refused_under_standard_modes() {
    for mode in [Mode::NATIVE, Mode::LITTLE_ENDIAN, Mode::BIG_ENDIAN, Mode::NETWORK] {
        let err = RecordDef::new("Bad")
            .mode(mode)
            .field(FieldDef::new("n", Primitive::Size))
            .compile()
            .unwrap_err()
            .to_string();
        assert!(err.contains("only supported in native size mode"));
    }
}

#[test]
fn fixed_width_kinds_are_legal_under_native_aligned_mode() {
    let layout = RecordDef::new("Ok")
        .field(FieldDef::new("v", Primitive::U32))
        .compile()
        .unwrap();
    assert_eq!(layout.size(), 4);
}

#[test]
fn default_values_are_range_checked_at_compile_time() {
    let (min, max) = Primitive::I16.int_bounds().unwrap();
    assert!(RecordDef::new("Ok")
        .mode(Mode::LITTLE_ENDIAN)
        .field(FieldDef::new("lo", Primitive::I16).default(min as i64))
        .field(FieldDef::new("hi", Primitive::I16).default(max as i64))
        .compile()
        .is_ok());

    let err = RecordDef::new("Bad")
        .mode(Mode::LITTLE_ENDIAN)
        .field(FieldDef::new("v", Primitive::I16).default(max as i64 + 1))
        .compile()
        .unwrap_err()
        .to_string();
    assert!(err.contains("value out of range for 16-bit signed integer"));
    assert!(err.contains("field 'v'"));
}

#[test]
fn default_validation_can_be_disabled() {
    let layout = RecordDef::new("Loose")
        .mode(Mode::LITTLE_ENDIAN)
        .validate_defaults(false)
        .field(FieldDef::new("v", Primitive::U8).default(4096i64))
        .compile()
        .unwrap();
    // The bad default still fails when the instance is packed.
    let rec = Record::from_defaults(&layout).unwrap();
    assert!(rec.pack().is_err());
}

#[test]
fn default_with_wrong_type_is_rejected() {
    let err = RecordDef::new("Bad")
        .mode(Mode::LITTLE_ENDIAN)
        .field(FieldDef::new("v", Primitive::I32).default(1.5f64))
        .compile()
        .unwrap_err()
        .to_string();
    assert!(err.contains("invalid type for field"));
    assert!(err.contains("expected integer, got float"));
}

#[test]
fn array_default_must_match_the_declared_length() {
    let err = RecordDef::new("Bad")
        .mode(Mode::LITTLE_ENDIAN)
        .field(
            FieldDef::new("xs", TypeSpec::array(Primitive::U8.into(), 3))
                .default(Value::Array(vec![Value::Int(1), Value::Int(2)])),
        )
        .compile()
        .unwrap_err()
        .to_string();
    assert!(err.contains("array default for field 'xs' has length 2, expected 3"));
}

#[test]
fn array_default_elements_are_validated() {
    let err = RecordDef::new("Bad")
        .mode(Mode::LITTLE_ENDIAN)
        .field(
            FieldDef::new("xs", TypeSpec::array(Primitive::U8.into(), 2))
                .default(Value::Array(vec![Value::Int(1), Value::Int(300)])),
        )
        .compile()
        .unwrap_err()
        .to_string();
    assert!(err.contains("value out of range for 8-bit unsigned integer"));
}

#[test]
fn non_init_fields_require_a_default() {
    let err = RecordDef::new("Bad")
        .mode(Mode::LITTLE_ENDIAN)
        .field(FieldDef::new("v", Primitive::U8).no_init())
        .compile()
        .unwrap_err()
        .to_string();
    assert!(err.contains("does not participate in construction and has no default"));

    let layout = RecordDef::new("Ok")
        .mode(Mode::LITTLE_ENDIAN)
        .field(FieldDef::new("magic", Primitive::U8).default(7i64).no_init())
        .field(FieldDef::new("v", Primitive::U16))
        .compile()
        .unwrap();
    let rec = Record::new(&layout, vec![Value::Int(1)]).unwrap();
    assert_eq!(rec.get("magic"), Some(&Value::Int(7)));
}

#[test]
fn named_references_require_a_registry() {
    let err = RecordDef::new("Outer")
        .mode(Mode::LITTLE_ENDIAN)
        .field(FieldDef::new("inner", TypeSpec::named("Missing")))
        .compile()
        .unwrap_err()
        .to_string();
    assert!(err.contains("type not supported: 'Missing' is not a registered record"));
}

#[test]
fn named_references_resolve_like_direct_handles() {
    let registry = Registry::new();
    let inner = registry
        .define(
            &RecordDef::new("Inner")
                .mode(Mode::LITTLE_ENDIAN)
                .field(FieldDef::new("v", Primitive::U16)),
        )
        .unwrap();

    let by_name = registry
        .define(
            &RecordDef::new("ByName")
                .mode(Mode::LITTLE_ENDIAN)
                .field(FieldDef::new("inner", TypeSpec::named("Inner"))),
        )
        .unwrap();
    let by_handle = RecordDef::new("ByHandle")
        .mode(Mode::LITTLE_ENDIAN)
        .field(FieldDef::new("inner", &inner))
        .compile()
        .unwrap();

    assert_eq!(by_name.format(), by_handle.format());
    assert_eq!(by_name.size(), by_handle.size());
}

#[test]
fn field_lookup_by_name_and_index() {
    let layout = RecordDef::new("Pair")
        .mode(Mode::LITTLE_ENDIAN)
        .field(FieldDef::new("x", Primitive::I32))
        .field(FieldDef::new("y", Primitive::I32))
        .compile()
        .unwrap();
    assert_eq!(layout.field_index("y"), Some(1));
    assert_eq!(layout.field_index("z"), None);
    assert_eq!(layout.field(0).unwrap().name(), "x");
    assert!(layout.field(2).is_none());
}

#[test]
fn record_construction_checks_arity() {
    let layout = RecordDef::new("Pair")
        .mode(Mode::LITTLE_ENDIAN)
        .field(FieldDef::new("x", Primitive::I32))
        .field(FieldDef::new("y", Primitive::I32))
        .compile()
        .unwrap();
    let err = Record::new(&layout, vec![Value::Int(1)])
        .unwrap_err()
        .to_string();
    assert!(err.contains("record 'Pair' expects 2 values, got 1"));
}

#[test]
fn get_size_answers_from_the_compiled_layout() {
    let layout = RecordDef::new("Pair")
        .mode(Mode::LITTLE_ENDIAN)
        .field(FieldDef::new("x", Primitive::I32))
        .field(FieldDef::new("y", Primitive::I32))
        .compile()
        .unwrap();
    let rec = Record::new(&layout, vec![Value::Int(1), Value::Int(2)]).unwrap();
    assert_eq!(crate::layout::get_size(&Value::Record(rec)).unwrap(), 8);
    assert!(crate::layout::get_size(&Value::Int(1)).is_err());
}
