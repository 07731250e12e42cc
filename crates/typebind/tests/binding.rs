// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::uninlined_format_args)] // Test/bench code readability over pedantic
#![allow(clippy::float_cmp)] // Test assertions with constants
#![allow(clippy::missing_panics_doc)] // Tests/examples panic on failure

//! Record binding integration tests
//!
//! Derived and hand-written bindings, constructor/accessor selection
//! failures, and schema registration of bound types.

use std::any::Any;
use std::collections::VecDeque;
use std::sync::{Arc, Barrier};
use std::thread;
use typebind::{
    builtin, Bind, Codec, Constructor, DefinitionState, Error, FieldType, NativeType, NativeValue,
    RecordShape, Resolver, TypeLibrary, TypeRef, Typename, Value,
};

#[derive(Bind, Debug, Clone, PartialEq)]
#[bind(namespace = "geo")]
struct Point {
    x: i32,
    y: i32,
}

#[derive(Bind, Debug, PartialEq)]
#[bind(namespace = "geo", name = "Path")]
struct Polyline {
    label: String,
    points: Vec<Point>,
    tags: VecDeque<String>,
    weights: Vec<f64>,
}

#[derive(Bind, Debug, PartialEq)]
struct Meters(f64, i32);

#[derive(Bind, Debug, PartialEq)]
struct Marker;

#[derive(Bind, Debug, PartialEq)]
#[bind(namespace = "geo")]
struct Renamed {
    #[bind(rename = "x_pos")]
    x: i32,
    flag: bool,
}

#[derive(Bind, Debug, PartialEq)]
#[bind(namespace = "geo")]
struct Tree {
    value: i64,
    children: Vec<Tree>,
}

/// A type with no generic form at all.
struct Handle;

impl Bind for Handle {
    fn native_type() -> NativeType {
        NativeType::opaque::<Self>()
    }
}

#[derive(Bind)]
struct HoldsHandle {
    handle: Handle,
}

// ---------------------------------------------------------------------------
// Hand-written contracts
// ---------------------------------------------------------------------------

struct Span {
    start: i32,
    end: i32,
}

fn get_start(v: &dyn Any) -> Option<&dyn Any> {
    v.downcast_ref::<Span>().map(|s| &s.start as &dyn Any)
}

fn get_end(v: &dyn Any) -> Option<&dyn Any> {
    v.downcast_ref::<Span>().map(|s| &s.end as &dyn Any)
}

fn build_span(values: Vec<NativeValue>) -> typebind::Result<NativeValue> {
    let mut values = values.into_iter();
    let start = typebind::native::take_field(&mut values, "start")?;
    let end = typebind::native::take_field(&mut values, "end")?;
    let span: NativeValue = Box::new(Span { start, end });
    Ok(span)
}

fn span_accessors() -> RecordShape {
    RecordShape::new()
        .accessor("start", TypeRef::of::<i32>(), get_start)
        .accessor("end", TypeRef::of::<i32>(), get_end)
}

/// Two constructors that both pair with the accessors.
struct AmbiguousSpan;

impl Bind for AmbiguousSpan {
    fn native_type() -> NativeType {
        let named = Constructor::new(build_span)
            .param("start", TypeRef::of::<i32>())
            .param("end", TypeRef::of::<i32>());
        let positional = Constructor::new(build_span)
            .positional(TypeRef::of::<i32>())
            .positional(TypeRef::of::<i32>());
        NativeType::record::<Self>(
            Typename::new("test", "AmbiguousSpan"),
            span_accessors().constructor(named).constructor(positional),
        )
    }
}

/// Constructor parameter without a matching accessor.
struct MissingAccessorSpan;

impl Bind for MissingAccessorSpan {
    fn native_type() -> NativeType {
        NativeType::record::<Self>(
            Typename::new("test", "MissingAccessorSpan"),
            span_accessors().constructor(
                Constructor::new(build_span)
                    .param("start", TypeRef::of::<i32>())
                    .param("length", TypeRef::of::<i32>()),
            ),
        )
    }
}

/// No construction contract at all.
struct ReadOnlySpan;

impl Bind for ReadOnlySpan {
    fn native_type() -> NativeType {
        NativeType::record::<Self>(Typename::new("test", "ReadOnlySpan"), span_accessors())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn test_point_encodes_as_ordered_pairs() {
    let resolver = Resolver::new();
    let codec = Codec::new(&resolver);

    let value = codec.encode(&Point { x: 1, y: 2 }).expect("encode");
    assert_eq!(
        value,
        Value::Record(vec![
            ("x".to_string(), Value::I32(1)),
            ("y".to_string(), Value::I32(2)),
        ])
    );
    assert_eq!(codec.decode::<Point>(value).expect("decode"), Point { x: 1, y: 2 });
}

#[test]
fn test_decode_accepts_fields_in_any_order() {
    let resolver = Resolver::new();
    let codec = Codec::new(&resolver);
    let value = Value::record([("y", 7i32), ("x", -3i32)]);
    assert_eq!(codec.decode::<Point>(value).expect("decode"), Point { x: -3, y: 7 });
}

#[test]
fn test_decode_rejects_missing_and_unknown_fields() {
    let resolver = Resolver::new();
    let codec = Codec::new(&resolver);

    let missing = codec.decode::<Point>(Value::record([("x", 1i32)]));
    assert!(matches!(missing, Err(Error::ValueMismatch { ref found, .. }) if found == "missing field"));

    let unknown = codec.decode::<Point>(Value::record([("x", 1i32), ("y", 2i32), ("z", 3i32)]));
    assert!(matches!(unknown, Err(Error::ValueMismatch { .. })));

    let wrong_type = codec.decode::<Point>(Value::record([("x", 1i64), ("y", 2i64)]));
    assert!(matches!(wrong_type, Err(Error::ValueMismatch { .. })));
}

#[test]
fn test_descriptor_fields_follow_constructor_order() {
    let resolver = Resolver::new();
    let descriptor = resolver.resolve_type::<Polyline>().expect("resolve");
    let record = descriptor.as_record().expect("record");

    assert_eq!(record.typename, Typename::new("geo", "Path"));
    let fields: Vec<_> = record.fields().iter().map(|f| (f.name, f.ordinal)).collect();
    assert_eq!(fields, [("label", 0), ("points", 1), ("tags", 2), ("weights", 3)]);
    assert_eq!(record.field("points").map(|f| f.ty), Some(TypeRef::of::<Vec<Point>>()));
}

#[test]
fn test_nested_containers_roundtrip() {
    let resolver = Resolver::new();
    let codec = Codec::new(&resolver);
    let path = Polyline {
        label: "route".to_string(),
        points: vec![Point { x: 0, y: 0 }, Point { x: 3, y: 4 }],
        tags: VecDeque::from(vec!["a".to_string(), "b".to_string()]),
        weights: vec![0.25, 0.75],
    };

    let value = codec.encode(&path).expect("encode");
    let points = value.field("points").and_then(Value::as_sequence).expect("points");
    assert_eq!(points.len(), 2);
    assert_eq!(points[1].field("y").and_then(Value::as_i32), Some(4));
    assert_eq!(value.field("label").and_then(Value::as_str), Some("route"));

    let back: Polyline = codec.decode(value).expect("decode");
    assert_eq!(back, path);
}

#[test]
fn test_tuple_struct_binds_positionally() {
    let resolver = Resolver::new();
    let codec = Codec::new(&resolver);

    let value = codec.encode(&Meters(1.5, 3)).expect("encode");
    assert_eq!(value, Value::record([("0", Value::F64(1.5)), ("1", Value::I32(3))]));
    assert_eq!(codec.decode::<Meters>(value).expect("decode"), Meters(1.5, 3));
}

#[test]
fn test_unit_struct_is_empty_record() {
    let resolver = Resolver::new();
    let codec = Codec::new(&resolver);

    let value = codec.encode(&Marker).expect("encode");
    assert_eq!(value, Value::Record(Vec::new()));
    assert_eq!(codec.decode::<Marker>(value).expect("decode"), Marker);

    // Default namespace is the crate name.
    let descriptor = resolver.resolve_type::<Marker>().expect("resolve");
    assert_eq!(
        descriptor.typename(),
        Some(&Typename::new(env!("CARGO_PKG_NAME"), "Marker"))
    );
}

#[test]
fn test_rename_attribute() {
    let resolver = Resolver::new();
    let codec = Codec::new(&resolver);

    let value = codec.encode(&Renamed { x: 9, flag: true }).expect("encode");
    assert_eq!(value.field("x_pos").and_then(Value::as_i32), Some(9));
    assert!(value.field("x").is_none());
    assert_eq!(
        codec.decode::<Renamed>(value).expect("decode"),
        Renamed { x: 9, flag: true }
    );
}

#[test]
fn test_opaque_field_is_unsupported() {
    let resolver = Resolver::new();
    let err = resolver.resolve_type::<HoldsHandle>().expect_err("opaque field");
    assert!(matches!(err, Error::UnsupportedType { ref type_name } if type_name.contains("Handle")));

    assert!(matches!(
        resolver.resolve_type::<Handle>(),
        Err(Error::UnsupportedType { .. })
    ));
}

#[test]
fn test_ambiguous_constructors_fail() {
    let resolver = Resolver::new();
    let err = resolver.resolve_type::<AmbiguousSpan>().expect_err("ambiguous");
    assert!(matches!(err, Error::Binding { ref reason, .. } if reason.contains("ambiguous")));
}

#[test]
fn test_missing_accessor_fails() {
    let resolver = Resolver::new();
    let err = resolver.resolve_type::<MissingAccessorSpan>().expect_err("missing accessor");
    assert!(matches!(err, Error::Binding { ref reason, .. } if reason.contains("`length`")));

    let err = resolver.resolve_type::<ReadOnlySpan>().expect_err("no constructor");
    assert!(matches!(err, Error::Binding { ref reason, .. } if reason.contains("no constructor")));
}

#[test]
fn test_failed_resolution_is_not_cached() {
    let resolver = Resolver::new();
    assert!(resolver.resolve_type::<AmbiguousSpan>().is_err());
    assert!(!resolver.is_cached(TypeRef::of::<AmbiguousSpan>()));
    assert!(resolver.resolve_type::<AmbiguousSpan>().is_err());
}

#[test]
fn test_definition_of_point() {
    let resolver = Resolver::new();
    let definition = resolver.definition_of(TypeRef::of::<Point>()).expect("definition");
    let record = definition.as_record().expect("record");
    assert_eq!(record.len(), 2);
    assert_eq!(
        record.field("y").map(|f| (&f.ty, f.ordinal)),
        Some((&FieldType::Named(builtin::INT32), 1))
    );
}

#[test]
fn test_register_recursive_tree() {
    let resolver = Resolver::new();
    let library = TypeLibrary::new();
    let tree = Typename::new("geo", "Tree");

    resolver
        .register_with(TypeRef::of::<Tree>(), &library)
        .expect("register");
    assert_eq!(library.definition_state(&tree), DefinitionState::Registered);

    let definition = library.definition(&tree).expect("registered");
    let children = definition
        .as_record()
        .and_then(|r| r.field("children"))
        .expect("children field");
    match &children.ty {
        FieldType::Inline(inner) => assert_eq!(
            **inner,
            typebind::Definition::Sequence(typebind::Sequence::new(tree.clone()))
        ),
        other => panic!("unexpected field type: {:?}", other),
    }

    // Round trip of a nested value through the same resolver.
    let codec = Codec::new(&resolver);
    let value = Tree {
        value: 1,
        children: vec![
            Tree {
                value: 2,
                children: Vec::new(),
            },
            Tree {
                value: 3,
                children: vec![Tree {
                    value: 4,
                    children: Vec::new(),
                }],
            },
        ],
    };
    let encoded = codec.encode(&value).expect("encode");
    assert_eq!(codec.decode::<Tree>(encoded).expect("decode"), value);
}

#[test]
fn test_register_with_reaches_nested_records() {
    let resolver = Resolver::new();
    let library = TypeLibrary::new();

    resolver
        .register_with(TypeRef::of::<Polyline>(), &library)
        .expect("register");
    assert!(library.is_registered(&Typename::new("geo", "Path")));
    assert!(library.is_registered(&Typename::new("geo", "Point")));
}

/// Same typename as `Point`, different fields.
mod other {
    use typebind::Bind;

    #[derive(Bind, Debug)]
    #[bind(namespace = "geo", name = "Point")]
    pub struct Point {
        pub label: String,
    }
}

#[test]
fn test_register_with_skips_reserved() {
    let resolver = Resolver::new();
    let library = TypeLibrary::new();
    let point = Typename::new("geo", "Point");
    library.reserve(&point).expect("reserve");

    // Reserved by someone else: left alone.
    resolver
        .register_with(TypeRef::of::<Point>(), &library)
        .expect("skip reserved");
    assert_eq!(library.definition_state(&point), DefinitionState::Reserved);
}

#[test]
fn test_register_with_conflicting_definition() {
    let resolver = Resolver::new();
    let library = TypeLibrary::new();
    let point = Typename::new("geo", "Point");

    resolver
        .register_with(TypeRef::of::<Point>(), &library)
        .expect("register");
    // Same type again is idempotent.
    resolver
        .register_with(TypeRef::of::<Point>(), &library)
        .expect("idempotent");

    let err = resolver
        .register_with(TypeRef::of::<other::Point>(), &library)
        .expect_err("typename taken");
    assert_eq!(err, Error::TypeAlreadyRegistered(point.clone()));

    let kept = library.definition(&point).expect("registered");
    let names: Vec<_> = kept
        .as_record()
        .expect("record")
        .fields()
        .iter()
        .map(|f| f.name.as_str())
        .collect();
    assert_eq!(names, ["x", "y"]);

    // A registered atom under the record's typename conflicts as well.
    let atoms = TypeLibrary::new();
    atoms
        .register(&point, typebind::Definition::Atom(builtin::atom_of(typebind::PrimitiveKind::I32)))
        .expect("register atom");
    assert_eq!(
        resolver.register_with(TypeRef::of::<Point>(), &atoms),
        Err(Error::TypeAlreadyRegistered(point.clone()))
    );
    assert!(atoms.definition(&point).expect("registered").as_atom().is_some());
}

#[test]
fn test_concurrent_first_resolution_shares_descriptor() {
    const THREADS: usize = 8;

    let resolver = Resolver::new();
    let before = resolver.cached_len();
    let barrier = Barrier::new(THREADS);

    let descriptors: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                scope.spawn(|| {
                    barrier.wait();
                    resolver.resolve_type::<Polyline>().expect("resolve")
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("thread panicked"))
            .collect()
    });

    assert_eq!(descriptors.len(), THREADS);
    for descriptor in &descriptors[1..] {
        assert!(Arc::ptr_eq(&descriptors[0], descriptor));
    }
    assert_eq!(resolver.cached_len(), before + 1);
    assert!(Arc::ptr_eq(
        &descriptors[0],
        &resolver.resolve_type::<Polyline>().expect("cached")
    ));
}
