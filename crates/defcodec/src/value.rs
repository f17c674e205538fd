// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Runtime values exchanged across the codec boundary.
//!
//! The variant a [`Value`] must take is fixed by the wire shape its Def
//! resolves to: scalars and arrays for fixed-width shapes, [`ItemMap`] for
//! dense/aligned/TOC maps, [`NamedMap`] for named maps, and a boxed [`Item`]
//! for envelopes.

use crate::id::TypeId;
use crate::registry::Def;
use crate::shape::ScalarKind;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// One fixed-width value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Bool(bool),
    I8(i8),
    U8(u8),
    I16(i16),
    U16(u16),
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    F32(f32),
    F64(f64),
    Guid(Uuid),
    /// Raw bytes of a blittable record; the width is the vector length.
    Blob(Vec<u8>),
}

impl Scalar {
    pub fn kind(&self) -> ScalarKind {
        match self {
            Self::Bool(_) => ScalarKind::Bool,
            Self::I8(_) => ScalarKind::I8,
            Self::U8(_) => ScalarKind::U8,
            Self::I16(_) => ScalarKind::I16,
            Self::U16(_) => ScalarKind::U16,
            Self::I32(_) => ScalarKind::I32,
            Self::U32(_) => ScalarKind::U32,
            Self::I64(_) => ScalarKind::I64,
            Self::U64(_) => ScalarKind::U64,
            Self::F32(_) => ScalarKind::F32,
            Self::F64(_) => ScalarKind::F64,
            Self::Guid(_) => ScalarKind::Guid,
            Self::Blob(bytes) => ScalarKind::Blob(bytes.len()),
        }
    }
}

/// A homogeneous array of fixed-width elements.
#[derive(Debug, Clone, PartialEq)]
pub enum Array {
    Bool(Vec<bool>),
    I8(Vec<i8>),
    U8(Vec<u8>),
    I16(Vec<i16>),
    U16(Vec<u16>),
    I32(Vec<i32>),
    U32(Vec<u32>),
    I64(Vec<i64>),
    U64(Vec<u64>),
    F32(Vec<f32>),
    F64(Vec<f64>),
    Guid(Vec<Uuid>),
    /// Packed blittable records, `data.len() == width * count`.
    Blob { width: usize, data: Vec<u8> },
}

impl Array {
    pub fn kind(&self) -> ScalarKind {
        match self {
            Self::Bool(_) => ScalarKind::Bool,
            Self::I8(_) => ScalarKind::I8,
            Self::U8(_) => ScalarKind::U8,
            Self::I16(_) => ScalarKind::I16,
            Self::U16(_) => ScalarKind::U16,
            Self::I32(_) => ScalarKind::I32,
            Self::U32(_) => ScalarKind::U32,
            Self::I64(_) => ScalarKind::I64,
            Self::U64(_) => ScalarKind::U64,
            Self::F32(_) => ScalarKind::F32,
            Self::F64(_) => ScalarKind::F64,
            Self::Guid(_) => ScalarKind::Guid,
            Self::Blob { width, .. } => ScalarKind::Blob(*width),
        }
    }

    /// Element count.
    pub fn len(&self) -> usize {
        match self {
            Self::Bool(v) => v.len(),
            Self::I8(v) => v.len(),
            Self::U8(v) => v.len(),
            Self::I16(v) => v.len(),
            Self::U16(v) => v.len(),
            Self::I32(v) => v.len(),
            Self::U32(v) => v.len(),
            Self::I64(v) => v.len(),
            Self::U64(v) => v.len(),
            Self::F32(v) => v.len(),
            Self::F64(v) => v.len(),
            Self::Guid(v) => v.len(),
            Self::Blob { width, data } => {
                if *width == 0 {
                    0
                } else {
                    data.len() / width
                }
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A value whose layout is selected by its Def.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Scalar(Scalar),
    Array(Array),
    String(String),
    StringArray(Vec<String>),
    /// Dense, aligned and TOC maps.
    Map(ItemMap),
    NamedMap(NamedMap),
    /// Payload of a compression envelope.
    Envelope(Box<Item>),
}

impl Value {
    /// Short variant name for diagnostics.
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Scalar(_) => "scalar",
            Self::Array(_) => "array",
            Self::String(_) => "string",
            Self::StringArray(_) => "string array",
            Self::Map(_) => "map",
            Self::NamedMap(_) => "named map",
            Self::Envelope(_) => "envelope",
        }
    }

    pub fn as_map(&self) -> Option<&ItemMap> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_named_map(&self) -> Option<&NamedMap> {
        match self {
            Self::NamedMap(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Self::Array(array) => Some(array),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

/// A `(Def, value)` pair.
#[derive(Debug, Clone)]
pub struct Item {
    pub def: Arc<Def>,
    pub value: Value,
}

impl Item {
    pub fn new(def: Arc<Def>, value: impl Into<Value>) -> Self {
        Self {
            def,
            value: value.into(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.def.id()
    }
}

impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        self.def.id() == other.def.id() && self.value == other.value
    }
}

/// Map entries keyed by Def id.
///
/// Insertion order is kept for encoding; equality ignores it. Inserting an
/// existing key replaces the previous value in place.
#[derive(Debug, Clone, Default)]
pub struct ItemMap {
    entries: Vec<Item>,
    index: HashMap<TypeId, usize>,
}

impl ItemMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        }
    }

    /// Insert or replace; returns the replaced value.
    pub fn insert(&mut self, def: Arc<Def>, value: impl Into<Value>) -> Option<Value> {
        self.insert_item(Item::new(def, value))
    }

    pub fn insert_item(&mut self, item: Item) -> Option<Value> {
        match self.index.get(&item.id()) {
            Some(&slot) => Some(std::mem::replace(&mut self.entries[slot].value, item.value)),
            None => {
                self.index.insert(item.id(), self.entries.len());
                self.entries.push(item);
                None
            }
        }
    }

    pub fn get(&self, id: TypeId) -> Option<&Value> {
        self.get_item(id).map(|item| &item.value)
    }

    pub fn get_item(&self, id: TypeId) -> Option<&Item> {
        self.index.get(&id).map(|&slot| &self.entries[slot])
    }

    pub fn contains(&self, id: TypeId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Item> {
        self.entries.iter()
    }
}

impl PartialEq for ItemMap {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .entries
                .iter()
                .all(|item| other.get(item.id()) == Some(&item.value))
    }
}

impl FromIterator<Item> for ItemMap {
    fn from_iter<I: IntoIterator<Item = Item>>(iter: I) -> Self {
        let mut map = ItemMap::new();
        for item in iter {
            map.insert_item(item);
        }
        map
    }
}

impl<'a> IntoIterator for &'a ItemMap {
    type Item = &'a Item;
    type IntoIter = std::slice::Iter<'a, Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// One entry of a named map.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedEntry {
    pub name: String,
    pub item: Item,
}

/// Map entries keyed by name; each carries its own Def.
#[derive(Debug, Clone, Default)]
pub struct NamedMap {
    entries: Vec<NamedEntry>,
    index: HashMap<String, usize>,
}

impl NamedMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        }
    }

    /// Insert or replace; returns the replaced item.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        def: Arc<Def>,
        value: impl Into<Value>,
    ) -> Option<Item> {
        let name = name.into();
        let item = Item::new(def, value);
        match self.index.get(&name) {
            Some(&slot) => Some(std::mem::replace(&mut self.entries[slot].item, item)),
            None => {
                self.index.insert(name.clone(), self.entries.len());
                self.entries.push(NamedEntry { name, item });
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Item> {
        self.index.get(name).map(|&slot| &self.entries[slot].item)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NamedEntry> {
        self.entries.iter()
    }
}

impl PartialEq for NamedMap {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .entries
                .iter()
                .all(|entry| other.get(&entry.name) == Some(&entry.item))
    }
}

impl<'a> IntoIterator for &'a NamedMap {
    type Item = &'a NamedEntry;
    type IntoIter = std::slice::Iter<'a, NamedEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

macro_rules! impl_scalar_conversions {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::Scalar(Scalar::$variant(value))
                }
            }

            impl From<Vec<$ty>> for Value {
                fn from(values: Vec<$ty>) -> Self {
                    Value::Array(Array::$variant(values))
                }
            }

            impl FromValue for $ty {
                fn from_value(value: Value) -> Option<Self> {
                    match value {
                        Value::Scalar(Scalar::$variant(v)) => Some(v),
                        _ => None,
                    }
                }
            }

            impl FromValue for Vec<$ty> {
                fn from_value(value: Value) -> Option<Self> {
                    match value {
                        Value::Array(Array::$variant(v)) => Some(v),
                        _ => None,
                    }
                }
            }
        )*
    };
}

/// Typed extraction from a decoded [`Value`].
pub trait FromValue: Sized {
    /// `None` when the value does not have the expected shape.
    fn from_value(value: Value) -> Option<Self>;
}

impl_scalar_conversions! {
    bool => Bool,
    i8 => I8,
    u8 => U8,
    i16 => I16,
    u16 => U16,
    i32 => I32,
    u32 => U32,
    i64 => I64,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    Uuid => Guid,
}

impl From<Scalar> for Value {
    fn from(scalar: Scalar) -> Self {
        Value::Scalar(scalar)
    }
}

impl From<Array> for Value {
    fn from(array: Array) -> Self {
        Value::Array(array)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}

impl From<Vec<String>> for Value {
    fn from(strings: Vec<String>) -> Self {
        Value::StringArray(strings)
    }
}

impl From<ItemMap> for Value {
    fn from(map: ItemMap) -> Self {
        Value::Map(map)
    }
}

impl From<NamedMap> for Value {
    fn from(map: NamedMap) -> Self {
        Value::NamedMap(map)
    }
}

impl From<Item> for Value {
    fn from(item: Item) -> Self {
        Value::Envelope(Box::new(item))
    }
}

impl FromValue for Value {
    fn from_value(value: Value) -> Option<Self> {
        Some(value)
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

impl FromValue for Vec<String> {
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::StringArray(v) => Some(v),
            _ => None,
        }
    }
}

impl FromValue for ItemMap {
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }
}

impl FromValue for NamedMap {
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::NamedMap(map) => Some(map),
            _ => None,
        }
    }
}

impl FromValue for Item {
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Envelope(item) => Some(*item),
            _ => None,
        }
    }
}
