// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Dedicated bridges for arrays of primitives.
//!
//! One bridge per element kind. Elements move unboxed as [`Value`] atoms, so
//! `Vec<i32>` is walked without allocating per element.

use super::{container_mismatch, Bridge, Element, ElementForm, IterationState, OwnedElement};
use crate::error::{Error, Result};
use crate::native::{NativeValue, PrimitiveKind};
use crate::value::Value;
use std::any::Any;
use std::cmp::Ordering;

macro_rules! primitive_bridge {
    ($(#[$doc:meta])* $bridge:ident, $ty:ty, $kind:ident, $label:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy)]
        pub struct $bridge {
            max_preallocation: usize,
        }

        impl $bridge {
            pub fn new(max_preallocation: usize) -> Self {
                Self { max_preallocation }
            }

            fn view(container: &dyn Any) -> Result<&Vec<$ty>> {
                container
                    .downcast_ref::<Vec<$ty>>()
                    .ok_or_else(|| container_mismatch(concat!("Vec<", stringify!($ty), ">")))
            }
        }

        impl Bridge for $bridge {
            fn name(&self) -> &'static str {
                $label
            }

            fn element_form(&self) -> ElementForm {
                ElementForm::Atom(PrimitiveKind::$kind)
            }

            fn size(&self, container: &dyn Any) -> Result<usize> {
                Ok(Self::view(container)?.len())
            }

            fn get<'c>(
                &self,
                state: &mut IterationState,
                container: &'c dyn Any,
            ) -> Result<Element<'c>> {
                let values = Self::view(container)?;
                let index = state.position();
                let value = values.get(index).ok_or(Error::OutOfBounds {
                    index,
                    length: values.len(),
                })?;
                state.advance();
                Ok(Element::Atom(Value::$kind(*value)))
            }

            fn put(
                &self,
                state: &mut IterationState,
                container: &mut dyn Any,
                element: OwnedElement,
            ) -> Result<()> {
                let values = container
                    .downcast_mut::<Vec<$ty>>()
                    .ok_or_else(|| container_mismatch(concat!("Vec<", stringify!($ty), ">")))?;
                let value: $ty = match element {
                    OwnedElement::Atom(Value::$kind(v)) => v,
                    OwnedElement::Atom(other) => {
                        return Err(Error::mismatch(stringify!($ty), other.kind_name()));
                    }
                    OwnedElement::Native(native) => *native.downcast::<$ty>().map_err(|_| {
                        Error::mismatch(stringify!($ty), "native value of another type")
                    })?,
                };

                let index = state.position();
                match index.cmp(&values.len()) {
                    Ordering::Less => values[index] = value,
                    Ordering::Equal => values.push(value),
                    Ordering::Greater => {
                        return Err(Error::OutOfBounds {
                            index,
                            length: values.len(),
                        });
                    }
                }
                state.advance();
                Ok(())
            }

            fn construct(&self, length: usize) -> NativeValue {
                Box::new(Vec::<$ty>::with_capacity(length.min(self.max_preallocation)))
            }
        }
    };
}

primitive_bridge!(
    /// `Vec<bool>`.
    BoolBridge, bool, Bool, "bool"
);
primitive_bridge!(
    /// `Vec<u8>`.
    U8Bridge, u8, U8, "byte"
);
primitive_bridge!(
    /// `Vec<char>`.
    CharBridge, char, Char, "char"
);
primitive_bridge!(
    /// `Vec<i16>`.
    I16Bridge, i16, I16, "short"
);
primitive_bridge!(
    /// `Vec<i32>`.
    I32Bridge, i32, I32, "int"
);
primitive_bridge!(
    /// `Vec<i64>`.
    I64Bridge, i64, I64, "long"
);
primitive_bridge!(
    /// `Vec<f32>`.
    F32Bridge, f32, F32, "float"
);
primitive_bridge!(
    /// `Vec<f64>`.
    F64Bridge, f64, F64, "double"
);
