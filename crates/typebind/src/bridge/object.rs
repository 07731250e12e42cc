// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Shared bridge for every container that is not a primitive array.

use super::{container_mismatch, Bridge, Element, ElementForm, IterationState, OwnedElement};
use crate::error::{Error, Result};
use crate::native::{NativeValue, SequenceOps};
use std::any::Any;
use std::collections::VecDeque;
use std::fmt;

/// Index-addressable container with type-erased elements.
///
/// Implemented for `Vec<T>` and `VecDeque<T>`; implement it for a custom
/// collection to serve it with [`ObjectBridge`].
pub trait NativeSequence: Any + Send {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn element(&self, index: usize) -> Option<&dyn Any>;

    /// Overwrite an existing element. Returns the value if it has the wrong type.
    fn set_element(&mut self, index: usize, value: NativeValue) -> std::result::Result<(), NativeValue>;

    /// Append an element. Returns the value if it has the wrong type.
    fn push_element(&mut self, value: NativeValue) -> std::result::Result<(), NativeValue>;

    fn with_capacity(capacity: usize) -> Self
    where
        Self: Sized;
}

impl<T: Any + Send> NativeSequence for Vec<T> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn element(&self, index: usize) -> Option<&dyn Any> {
        self.get(index).map(|v| v as &dyn Any)
    }

    fn set_element(&mut self, index: usize, value: NativeValue) -> std::result::Result<(), NativeValue> {
        let value = value.downcast::<T>()?;
        match self.get_mut(index) {
            Some(slot) => {
                *slot = *value;
                Ok(())
            }
            None => Err(value),
        }
    }

    fn push_element(&mut self, value: NativeValue) -> std::result::Result<(), NativeValue> {
        self.push(*value.downcast::<T>()?);
        Ok(())
    }

    fn with_capacity(capacity: usize) -> Self {
        Vec::with_capacity(capacity)
    }
}

impl<T: Any + Send> NativeSequence for VecDeque<T> {
    fn len(&self) -> usize {
        VecDeque::len(self)
    }

    fn element(&self, index: usize) -> Option<&dyn Any> {
        self.get(index).map(|v| v as &dyn Any)
    }

    fn set_element(&mut self, index: usize, value: NativeValue) -> std::result::Result<(), NativeValue> {
        let value = value.downcast::<T>()?;
        match self.get_mut(index) {
            Some(slot) => {
                *slot = *value;
                Ok(())
            }
            None => Err(value),
        }
    }

    fn push_element(&mut self, value: NativeValue) -> std::result::Result<(), NativeValue> {
        self.push_back(*value.downcast::<T>()?);
        Ok(())
    }

    fn with_capacity(capacity: usize) -> Self {
        VecDeque::with_capacity(capacity)
    }
}

/// One implementation for all object containers.
///
/// Elements are handed out by reference and accepted boxed; the codec binds
/// them through the element type's own descriptor.
#[derive(Clone, Copy)]
pub struct ObjectBridge {
    ops: SequenceOps,
    max_preallocation: usize,
}

impl ObjectBridge {
    pub fn new(ops: SequenceOps, max_preallocation: usize) -> Self {
        Self {
            ops,
            max_preallocation,
        }
    }

    fn view<'c>(&self, container: &'c dyn Any) -> Result<&'c dyn NativeSequence> {
        (self.ops.view)(container).ok_or_else(|| container_mismatch("object sequence"))
    }
}

impl fmt::Debug for ObjectBridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectBridge")
            .field("max_preallocation", &self.max_preallocation)
            .finish_non_exhaustive()
    }
}

impl Bridge for ObjectBridge {
    fn name(&self) -> &'static str {
        "object"
    }

    fn element_form(&self) -> ElementForm {
        ElementForm::Native
    }

    fn size(&self, container: &dyn Any) -> Result<usize> {
        Ok(self.view(container)?.len())
    }

    fn get<'c>(&self, state: &mut IterationState, container: &'c dyn Any) -> Result<Element<'c>> {
        let sequence = self.view(container)?;
        let index = state.position();
        let element = sequence.element(index).ok_or(Error::OutOfBounds {
            index,
            length: sequence.len(),
        })?;
        state.advance();
        Ok(Element::Native(element))
    }

    fn put(
        &self,
        state: &mut IterationState,
        container: &mut dyn Any,
        element: OwnedElement,
    ) -> Result<()> {
        let OwnedElement::Native(value) = element else {
            return Err(Error::mismatch("native element", "atom"));
        };
        let sequence =
            (self.ops.view_mut)(container).ok_or_else(|| container_mismatch("object sequence"))?;

        let index = state.position();
        let length = sequence.len();
        let stored = if index < length {
            sequence.set_element(index, value)
        } else if index == length {
            sequence.push_element(value)
        } else {
            return Err(Error::OutOfBounds { index, length });
        };
        stored.map_err(|_| Error::mismatch("element of the container's type", "value of another type"))?;
        state.advance();
        Ok(())
    }

    fn construct(&self, length: usize) -> NativeValue {
        (self.ops.construct)(length.min(self.max_preallocation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_of_strings() {
        let bridge = ObjectBridge::new(SequenceOps::of::<Vec<String>>(), 64);
        let words = vec!["alpha".to_string(), "beta".to_string()];
        let mut state = bridge.new_iteration_state(&words);
        assert_eq!(bridge.size(&words), Ok(2));

        match bridge.get(&mut state, &words).expect("first") {
            Element::Native(v) => assert_eq!(v.downcast_ref::<String>().map(String::as_str), Some("alpha")),
            Element::Atom(_) => panic!("object bridge yielded an atom"),
        }
        bridge.get(&mut state, &words).expect("second");
        assert!(matches!(
            bridge.get(&mut state, &words),
            Err(Error::OutOfBounds { index: 2, length: 2 })
        ));
    }

    #[test]
    fn test_build_deque() {
        let bridge = ObjectBridge::new(SequenceOps::of::<VecDeque<i32>>(), 64);
        let mut container = bridge.construct(3);
        let mut state = bridge.new_iteration_state(&*container);
        for v in [1i32, 2, 3] {
            bridge
                .put(&mut state, &mut *container, OwnedElement::Native(Box::new(v)))
                .expect("put");
        }
        let built = container.downcast_ref::<VecDeque<i32>>().expect("VecDeque<i32>");
        assert_eq!(built.iter().copied().collect::<Vec<_>>(), [1, 2, 3]);
    }

    #[test]
    fn test_put_rejects_foreign_element() {
        let bridge = ObjectBridge::new(SequenceOps::of::<Vec<String>>(), 64);
        let mut container = bridge.construct(1);
        let mut state = bridge.new_iteration_state(&*container);
        let err = bridge
            .put(&mut state, &mut *container, OwnedElement::Native(Box::new(5u8)))
            .expect_err("u8 into Vec<String>");
        assert!(matches!(err, Error::ValueMismatch { .. }));
    }

    #[test]
    fn test_sequence_set_element() {
        let mut values = vec![1u8, 2];
        assert!(values.set_element(1, Box::new(9u8)).is_ok());
        assert!(values.set_element(5, Box::new(9u8)).is_err());
        assert!(values.set_element(0, Box::new("x")).is_err());
        assert_eq!(values, [1, 9]);
        assert!(!NativeSequence::is_empty(&values));
    }
}
