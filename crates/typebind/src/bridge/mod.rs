// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Uniform sequence access over arrays and collections.
//!
//! A [`Bridge`] lets the codec walk any container the same way: allocate an
//! [`IterationState`], read `size` elements with `get`, or `construct` a new
//! container and fill it with `put`.
//!
//! # Dispatch
//!
//! ```text
//! BridgeRegistry::bridge_for(native)
//!   +-- custom bridge registered for the exact container type?  -> custom
//!   +-- Vec<bool|u8|char|i16|i32|i64|f32|f64>                   -> primitive bridge (one per kind)
//!   +-- any other Vec<T> / VecDeque<T> with bindable T          -> ObjectBridge (shared impl)
//!   +-- element or container without a generic form             -> UnsupportedType
//! ```
//!
//! Primitive bridges move unboxed atoms ([`Element::Atom`]); the object
//! bridge moves borrowed or boxed native elements ([`Element::Native`]) that
//! the codec binds recursively through the element's descriptor.

mod object;
mod primitive;

pub use object::{NativeSequence, ObjectBridge};
pub use primitive::{
    BoolBridge, CharBridge, F32Bridge, F64Bridge, I16Bridge, I32Bridge, I64Bridge, U8Bridge,
};

use crate::config::BindConfig;
use crate::error::{Error, Result};
use crate::native::{ContainerFamily, NativeType, NativeValue, PrimitiveKind, Shape, TypeRef};
use crate::value::Value;
use dashmap::DashMap;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// Single-use traversal cursor.
///
/// Created fresh by [`Bridge::new_iteration_state`] for each traversal; it is
/// neither `Clone`, `Send` nor `Sync`, so it cannot leak into a second
/// traversal or another thread.
#[derive(Debug)]
pub struct IterationState {
    position: usize,
    _not_send: PhantomData<*const ()>,
}

impl IterationState {
    fn new() -> Self {
        Self {
            position: 0,
            _not_send: PhantomData,
        }
    }

    /// Number of elements read or written so far.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Move past the element just read or written.
    pub fn advance(&mut self) {
        self.position += 1;
    }
}

/// Element read from a container.
#[derive(Debug)]
pub enum Element<'c> {
    /// Primitive element, already in generic form.
    Atom(Value),
    /// Reference into the container; bind through the element descriptor.
    Native(&'c dyn Any),
}

/// Element written into a container under construction.
#[derive(Debug)]
pub enum OwnedElement {
    Atom(Value),
    Native(NativeValue),
}

/// What a bridge's `get` yields and `put` expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementForm {
    Atom(PrimitiveKind),
    Native,
}

/// Sequence access contract over one container kind.
pub trait Bridge: Send + Sync + fmt::Debug {
    /// Short label for diagnostics.
    fn name(&self) -> &'static str;

    fn element_form(&self) -> ElementForm;

    /// Fresh traversal state; never reuse it across traversals.
    fn new_iteration_state(&self, container: &dyn Any) -> IterationState {
        let _ = container;
        IterationState::new()
    }

    /// Element count.
    fn size(&self, container: &dyn Any) -> Result<usize>;

    /// Element at the current position, then advance.
    fn get<'c>(&self, state: &mut IterationState, container: &'c dyn Any) -> Result<Element<'c>>;

    /// Write at the current position, then advance (construction only).
    fn put(
        &self,
        state: &mut IterationState,
        container: &mut dyn Any,
        element: OwnedElement,
    ) -> Result<()>;

    /// New empty container sized for `length` elements.
    fn construct(&self, length: usize) -> NativeValue;
}

struct CustomBridge {
    element: TypeRef,
    bridge: Arc<dyn Bridge>,
}

/// Selects the bridge for a native container kind.
pub struct BridgeRegistry {
    primitives: HashMap<PrimitiveKind, Arc<dyn Bridge>>,
    custom: DashMap<TypeId, CustomBridge>,
    max_preallocation: usize,
}

impl BridgeRegistry {
    pub fn new() -> Self {
        Self::with_config(&BindConfig::default())
    }

    pub fn with_config(config: &BindConfig) -> Self {
        let max = config.max_preallocation;
        let mut primitives: HashMap<PrimitiveKind, Arc<dyn Bridge>> = HashMap::new();
        primitives.insert(PrimitiveKind::Bool, Arc::new(BoolBridge::new(max)));
        primitives.insert(PrimitiveKind::U8, Arc::new(U8Bridge::new(max)));
        primitives.insert(PrimitiveKind::Char, Arc::new(CharBridge::new(max)));
        primitives.insert(PrimitiveKind::I16, Arc::new(I16Bridge::new(max)));
        primitives.insert(PrimitiveKind::I32, Arc::new(I32Bridge::new(max)));
        primitives.insert(PrimitiveKind::I64, Arc::new(I64Bridge::new(max)));
        primitives.insert(PrimitiveKind::F32, Arc::new(F32Bridge::new(max)));
        primitives.insert(PrimitiveKind::F64, Arc::new(F64Bridge::new(max)));

        Self {
            primitives,
            custom: DashMap::new(),
            max_preallocation: max,
        }
    }

    /// Register a bridge for a custom container type.
    ///
    /// Takes precedence over the built-in dispatch for exactly `C`. Register
    /// before the first resolution of `C`; descriptors are cached.
    pub fn register<C: Any>(&self, element: TypeRef, bridge: Arc<dyn Bridge>) {
        log::debug!(
            "[bridge] custom bridge {} registered for {}",
            bridge.name(),
            std::any::type_name::<C>()
        );
        self.custom
            .insert(TypeId::of::<C>(), CustomBridge { element, bridge });
    }

    /// Element type of a registered custom container.
    pub fn custom_element(&self, container: TypeId) -> Option<TypeRef> {
        self.custom.get(&container).map(|c| c.element)
    }

    /// Bridge for a primitive array element kind.
    pub fn primitive(&self, kind: PrimitiveKind) -> Option<Arc<dyn Bridge>> {
        self.primitives.get(&kind).cloned()
    }

    /// Select the bridge serving `native`.
    pub fn bridge_for(&self, native: &NativeType) -> Result<Arc<dyn Bridge>> {
        if let Some(custom) = self.custom.get(&native.type_id) {
            return Ok(Arc::clone(&custom.bridge));
        }

        let Shape::Container(shape) = &native.shape else {
            return Err(Error::unsupported(native.rust_name));
        };

        let element = shape.element.describe();
        match element.shape {
            Shape::Atom(kind) if shape.family == ContainerFamily::Array && kind.has_array_bridge() => {
                self.primitive(kind)
                    .ok_or_else(|| Error::unsupported(native.rust_name))
            }
            Shape::Opaque => Err(Error::unsupported(element.rust_name)),
            _ => Ok(Arc::new(ObjectBridge::new(
                shape.sequence,
                self.max_preallocation,
            ))),
        }
    }
}

impl Default for BridgeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for BridgeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BridgeRegistry")
            .field("primitives", &self.primitives.len())
            .field("custom", &self.custom.len())
            .field("max_preallocation", &self.max_preallocation)
            .finish()
    }
}

fn container_mismatch(expected: &'static str) -> Error {
    Error::mismatch(expected, "container of another kind")
}
