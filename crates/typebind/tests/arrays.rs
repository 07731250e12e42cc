// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::uninlined_format_args)] // Test/bench code readability over pedantic
#![allow(clippy::float_cmp)] // Test assertions with constants
#![allow(clippy::missing_panics_doc)] // Tests/examples panic on failure
#![allow(clippy::cast_possible_truncation)] // Test data generation

//! Array and collection bridge integration tests
//!
//! Randomized round trips through every primitive bridge and the shared
//! object bridge, direct bridge traversal, and custom bridge registration.

use std::any::Any;
use std::collections::VecDeque;
use std::fmt::Debug;
use std::sync::Arc;
use typebind::{
    Bind, BindConfig, Bridge, Codec, Element, ElementForm, Error, IterationState, NativeType,
    NativeValue, OwnedElement, Resolver, TypeRef, Value,
};

const SEED: u64 = 0x5EED_0B1D;

#[derive(Bind, Debug, Clone, PartialEq)]
#[bind(namespace = "geo")]
struct Point {
    x: i32,
    y: i32,
}

fn random_len(rng: &mut fastrand::Rng) -> usize {
    rng.usize(0..64)
}

fn roundtrip<T: Bind + Debug + PartialEq>(codec: &Codec<'_>, original: &T) {
    let value = codec.encode(original).expect("encode");
    assert!(value.as_sequence().is_some(), "{:?} did not encode as a sequence", value);
    let decoded: T = codec.decode(value).expect("decode");
    assert_eq!(&decoded, original);
}

#[test]
fn test_primitive_arrays_roundtrip() {
    let resolver = Resolver::new();
    let codec = Codec::new(&resolver);
    let mut rng = fastrand::Rng::with_seed(SEED);

    for _ in 0..16 {
        let n = random_len(&mut rng);
        roundtrip(&codec, &(0..n).map(|_| rng.bool()).collect::<Vec<bool>>());
        roundtrip(&codec, &(0..n).map(|_| rng.u8(..)).collect::<Vec<u8>>());
        roundtrip(&codec, &(0..n).map(|_| rng.alphanumeric()).collect::<Vec<char>>());
        roundtrip(&codec, &(0..n).map(|_| rng.i16(..)).collect::<Vec<i16>>());
        roundtrip(&codec, &(0..n).map(|_| rng.i32(..)).collect::<Vec<i32>>());
        roundtrip(&codec, &(0..n).map(|_| rng.i64(..)).collect::<Vec<i64>>());
        roundtrip(&codec, &(0..n).map(|_| rng.f32()).collect::<Vec<f32>>());
        roundtrip(&codec, &(0..n).map(|_| rng.f64()).collect::<Vec<f64>>());
    }
}

#[test]
fn test_object_arrays_roundtrip() {
    let resolver = Resolver::new();
    let codec = Codec::new(&resolver);
    let mut rng = fastrand::Rng::with_seed(SEED);

    for _ in 0..8 {
        let n = random_len(&mut rng);
        let words: Vec<String> = (0..n)
            .map(|_| (0..rng.usize(0..12)).map(|_| rng.alphanumeric()).collect())
            .collect();
        roundtrip(&codec, &words);

        let points: Vec<Point> = (0..n)
            .map(|_| Point {
                x: rng.i32(..),
                y: rng.i32(..),
            })
            .collect();
        roundtrip(&codec, &points);

        let deque: VecDeque<i64> = (0..n).map(|_| rng.i64(..)).collect();
        roundtrip(&codec, &deque);

        let nested: Vec<Vec<u8>> = (0..n % 5)
            .map(|_| (0..rng.usize(0..8)).map(|_| rng.u8(..)).collect())
            .collect();
        roundtrip(&codec, &nested);
    }
}

#[test]
fn test_empty_and_large_arrays() {
    let resolver = Resolver::with_config(BindConfig {
        max_preallocation: 8,
        ..BindConfig::default()
    });
    let codec = Codec::new(&resolver);

    roundtrip(&codec, &Vec::<i32>::new());
    roundtrip(&codec, &VecDeque::<String>::new());

    // Longer than the preallocation cap: the container grows as it is filled.
    let long: Vec<i32> = (0..1000).collect();
    roundtrip(&codec, &long);
    let points: Vec<Point> = (0..100).map(|i| Point { x: i, y: -i }).collect();
    roundtrip(&codec, &points);
}

#[test]
fn test_primitive_bridge_traversal() {
    let resolver = Resolver::new();
    let bridge = resolver.bridge_for(TypeRef::of::<Vec<i16>>()).expect("bridge");
    assert_eq!(bridge.name(), "short");

    let values = vec![3i16, -1, 7];
    let mut state = bridge.new_iteration_state(&values);
    let mut seen = Vec::new();
    for _ in 0..bridge.size(&values).expect("size") {
        match bridge.get(&mut state, &values).expect("get") {
            Element::Atom(Value::I16(v)) => seen.push(v),
            other => panic!("unexpected element {:?}", other),
        }
    }
    assert_eq!(seen, values);

    let err = bridge.get(&mut state, &values).expect_err("past the end");
    assert_eq!(err, Error::OutOfBounds { index: 3, length: 3 });
}

#[test]
fn test_put_overwrites_then_appends() {
    let resolver = Resolver::new();
    let bridge = resolver.bridge_for(TypeRef::of::<Vec<String>>()).expect("bridge");
    assert_eq!(bridge.element_form(), ElementForm::Native);

    let mut words: Vec<String> = vec!["old".to_string()];
    let mut state = bridge.new_iteration_state(&words);
    bridge
        .put(&mut state, &mut words, OwnedElement::Native(Box::new("new".to_string())))
        .expect("overwrite");
    bridge
        .put(&mut state, &mut words, OwnedElement::Native(Box::new("more".to_string())))
        .expect("append");
    assert_eq!(words, ["new", "more"]);

    let err = bridge
        .put(&mut state, &mut words, OwnedElement::Native(Box::new(5i32)))
        .expect_err("wrong element type");
    assert!(matches!(err, Error::ValueMismatch { .. }));
}

#[test]
fn test_construct_yields_populated_container() {
    let resolver = Resolver::new();
    let bridge = resolver.bridge_for(TypeRef::of::<Vec<f64>>()).expect("bridge");

    let mut container = bridge.construct(3);
    let mut state = bridge.new_iteration_state(&*container);
    for v in [1.0f64, 2.0, 3.0] {
        bridge
            .put(&mut state, &mut *container, OwnedElement::Atom(Value::F64(v)))
            .expect("put");
    }
    let filled = container.downcast::<Vec<f64>>().expect("Vec<f64>");
    assert_eq!(*filled, [1.0, 2.0, 3.0]);
}

#[test]
fn test_wrong_container_is_rejected() {
    let resolver = Resolver::new();
    let bridge = resolver.bridge_for(TypeRef::of::<Vec<i32>>()).expect("bridge");
    let not_ints = vec![1i64];
    assert!(matches!(bridge.size(&not_ints), Err(Error::ValueMismatch { .. })));
}

// ---------------------------------------------------------------------------
// Custom bridge
// ---------------------------------------------------------------------------

/// A container with no generic form of its own.
#[derive(Debug, Default, PartialEq)]
struct Bag {
    items: Vec<String>,
}

impl Bind for Bag {
    fn native_type() -> NativeType {
        NativeType::opaque::<Self>()
    }
}

#[derive(Debug)]
struct BagBridge;

impl BagBridge {
    fn view(container: &dyn Any) -> typebind::Result<&Bag> {
        container.downcast_ref::<Bag>().ok_or_else(|| Error::ValueMismatch {
            expected: "Bag".to_string(),
            found: "container of another kind".to_string(),
        })
    }
}

impl Bridge for BagBridge {
    fn name(&self) -> &'static str {
        "bag"
    }

    fn element_form(&self) -> ElementForm {
        ElementForm::Native
    }

    fn size(&self, container: &dyn Any) -> typebind::Result<usize> {
        Ok(Self::view(container)?.items.len())
    }

    fn get<'c>(
        &self,
        state: &mut IterationState,
        container: &'c dyn Any,
    ) -> typebind::Result<Element<'c>> {
        let bag = Self::view(container)?;
        let index = state.position();
        let item = bag.items.get(index).ok_or(Error::OutOfBounds {
            index,
            length: bag.items.len(),
        })?;
        state.advance();
        Ok(Element::Native(item))
    }

    fn put(
        &self,
        state: &mut IterationState,
        container: &mut dyn Any,
        element: OwnedElement,
    ) -> typebind::Result<()> {
        let OwnedElement::Native(native) = element else {
            return Err(Error::ValueMismatch {
                expected: "String".to_string(),
                found: "atom".to_string(),
            });
        };
        let item = native.downcast::<String>().map_err(|_| Error::ValueMismatch {
            expected: "String".to_string(),
            found: "value of another type".to_string(),
        })?;
        let bag = container.downcast_mut::<Bag>().ok_or_else(|| Error::ValueMismatch {
            expected: "Bag".to_string(),
            found: "container of another kind".to_string(),
        })?;
        bag.items.push(*item);
        state.advance();
        Ok(())
    }

    fn construct(&self, length: usize) -> NativeValue {
        Box::new(Bag {
            items: Vec::with_capacity(length.min(16)),
        })
    }
}

#[test]
fn test_custom_bridge_registration() {
    let resolver = Resolver::new();
    assert!(matches!(
        resolver.resolve_type::<Bag>(),
        Err(Error::UnsupportedType { .. })
    ));

    resolver
        .bridges()
        .register::<Bag>(TypeRef::of::<String>(), Arc::new(BagBridge));
    let descriptor = resolver.resolve_type::<Bag>().expect("custom container");
    let container = descriptor.as_container().expect("container");
    assert_eq!(container.bridge.name(), "bag");
    assert_eq!(container.element, TypeRef::of::<String>());

    let codec = Codec::new(&resolver);
    let bag = Bag {
        items: vec!["a".to_string(), "b".to_string()],
    };
    let value = codec.encode(&bag).expect("encode");
    assert_eq!(value, Value::from(vec!["a", "b"]));
    assert_eq!(codec.decode::<Bag>(value).expect("decode"), bag);
}

#[test]
fn test_custom_bridge_overrides_builtin_dispatch() {
    let resolver = Resolver::new();
    let bridge = resolver.bridge_for(TypeRef::of::<Vec<u8>>()).expect("builtin");
    assert_eq!(bridge.name(), "byte");

    let other = Resolver::new();
    other.bridges().register::<Vec<u8>>(
        TypeRef::of::<u8>(),
        Arc::new(typebind::ObjectBridge::new(
            typebind::SequenceOps::of::<Vec<u8>>(),
            32,
        )),
    );
    let bridge = other.bridge_for(TypeRef::of::<Vec<u8>>()).expect("custom");
    assert_eq!(bridge.name(), "object");

    // Same generic form either way.
    let bytes = vec![1u8, 2, 250];
    let a = Codec::new(&resolver).encode(&bytes).expect("builtin encode");
    let b = Codec::new(&other).encode(&bytes).expect("custom encode");
    assert_eq!(a, b);
    assert_eq!(Codec::new(&other).decode::<Vec<u8>>(b).expect("decode"), bytes);
}
