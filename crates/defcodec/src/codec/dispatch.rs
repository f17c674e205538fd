// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Shape dispatch: Def -> primitive id -> [`WireShape`] -> codec.

use super::{envelope, map, primitive, toc};
use crate::builtin::ids;
use crate::config::UnknownIdPolicy;
use crate::error::{CodecError, CodecResult};
use crate::id::TypeId;
use crate::registry::{Catalog, Def};
use crate::shape::WireShape;
use crate::stream::{ByteSink, ByteSource};
use crate::value::{Item, Value};
use std::sync::Arc;

impl Catalog {
    /// Encode `value` (untagged) using the wire shape `def` resolves to.
    pub fn encode(&self, sink: &mut dyn ByteSink, def: &Def, value: &Value) -> CodecResult<()> {
        self.encode_value_at(sink, def, value, 0)
    }

    /// Decode one untagged value of Def `id`.
    ///
    /// The returned item carries the Def registered for `id`; for an alias this
    /// is the target Def. An unregistered `id` follows the catalog's
    /// [`UnknownIdPolicy`].
    pub fn decode(&self, source: &mut dyn ByteSource, id: TypeId) -> CodecResult<Item> {
        self.decode_id_at(source, id, 0)
    }

    /// Encode the tagged form: `[16-byte def id][value]`.
    pub fn encode_entry(
        &self,
        sink: &mut dyn ByteSink,
        def: &Def,
        value: &Value,
    ) -> CodecResult<()> {
        self.encode_entry_at(sink, def, value, 0)
    }

    /// Decode the tagged form: read the id, then the value. Under
    /// [`UnknownIdPolicy::LegacyDenseMap`] an unregistered id is taken to be
    /// the start of an untagged dense map and the source is rewound over it.
    pub fn decode_entry(&self, source: &mut dyn ByteSource) -> CodecResult<Item> {
        self.decode_entry_at(source, 0)
    }

    /// Wire shape used to encode values of `def`.
    pub fn encoder_shape(&self, def: &Def) -> CodecResult<WireShape> {
        let primitive = self.primitive_type(def)?;
        self.dispatch()
            .encoder(primitive)
            .ok_or(CodecError::MissingEncoder {
                def: def.id(),
                primitive,
            })
    }

    /// Wire shape used to decode values of `def`.
    pub fn decoder_shape(&self, def: &Def) -> CodecResult<WireShape> {
        let primitive = self.primitive_type(def)?;
        self.dispatch()
            .decoder(primitive)
            .ok_or(CodecError::MissingDecoder {
                def: def.id(),
                primitive,
            })
    }

    /// Depth for the children of a container entered at `depth`.
    pub(crate) fn nested(&self, depth: usize) -> CodecResult<usize> {
        let limit = self.config().max_depth;
        if depth >= limit {
            return Err(CodecError::NestingTooDeep { limit });
        }
        Ok(depth + 1)
    }

    pub(crate) fn encode_value_at(
        &self,
        sink: &mut dyn ByteSink,
        def: &Def,
        value: &Value,
        depth: usize,
    ) -> CodecResult<()> {
        let shape = self.encoder_shape(def)?;
        match (shape, value) {
            (WireShape::Scalar(kind), Value::Scalar(scalar)) if scalar.kind() == kind => {
                primitive::encode_scalar(sink, scalar)
            }
            (WireShape::Array(kind), Value::Array(array)) if array.kind() == kind => {
                primitive::encode_array(sink, array)
            }
            (WireShape::String, Value::String(s)) => primitive::encode_string(sink, s),
            (WireShape::StringArray, Value::StringArray(values)) => {
                primitive::encode_string_array(sink, values)
            }
            (WireShape::DenseMap, Value::Map(entries)) => {
                map::encode_dense(self, sink, entries, self.nested(depth)?)
            }
            (WireShape::AlignedMap(align), Value::Map(entries)) => {
                map::encode_aligned(self, sink, entries, align, self.nested(depth)?)
            }
            (WireShape::NamedMap(align), Value::NamedMap(entries)) => {
                map::encode_named(self, sink, entries, align, self.nested(depth)?)
            }
            (WireShape::TocMap, Value::Map(entries)) => {
                toc::encode(self, sink, def, entries, self.nested(depth)?)
            }
            (WireShape::GzipEnvelope, Value::Envelope(inner)) => {
                envelope::encode(self, sink, inner, self.nested(depth)?)
            }
            (shape, value) => Err(CodecError::ValueMismatch {
                def: def.id(),
                expected: shape.to_string(),
                found: value.describe(),
            }),
        }
    }

    pub(crate) fn decode_value_at(
        &self,
        source: &mut dyn ByteSource,
        def: &Arc<Def>,
        depth: usize,
    ) -> CodecResult<Value> {
        let limit = self.config().max_payload_bytes;
        let value = match self.decoder_shape(def)? {
            WireShape::Scalar(kind) => Value::Scalar(primitive::decode_scalar(source, kind)?),
            WireShape::Array(kind) => Value::Array(primitive::decode_array(source, kind, limit)?),
            WireShape::String => Value::String(primitive::decode_string(source, limit)?),
            WireShape::StringArray => {
                Value::StringArray(primitive::decode_string_array(source, limit)?)
            }
            WireShape::DenseMap => Value::Map(map::decode_dense(self, source, self.nested(depth)?)?),
            WireShape::AlignedMap(align) => Value::Map(map::decode_aligned(
                self,
                source,
                align,
                self.nested(depth)?,
            )?),
            WireShape::NamedMap(align) => Value::NamedMap(map::decode_named(
                self,
                source,
                align,
                self.nested(depth)?,
            )?),
            WireShape::TocMap => Value::Map(toc::decode(self, source, def, self.nested(depth)?)?),
            WireShape::GzipEnvelope => Value::Envelope(Box::new(envelope::decode(
                self,
                source,
                self.nested(depth)?,
            )?)),
        };
        Ok(value)
    }

    pub(crate) fn decode_id_at(
        &self,
        source: &mut dyn ByteSource,
        id: TypeId,
        depth: usize,
    ) -> CodecResult<Item> {
        match self.try_get(id) {
            Some(def) => {
                let value = self.decode_value_at(source, &def, depth)?;
                Ok(Item { def, value })
            }
            None => self.decode_unknown_at(source, id, None, depth),
        }
    }

    /// Apply the [`UnknownIdPolicy`] to an id missing from the catalog.
    ///
    /// Under `LegacyDenseMap` the payload is read as an untagged dense map,
    /// starting at `rewind` when the id itself was read from the source.
    fn decode_unknown_at(
        &self,
        source: &mut dyn ByteSource,
        id: TypeId,
        rewind: Option<u64>,
        depth: usize,
    ) -> CodecResult<Item> {
        match self.config().unknown_id_policy {
            UnknownIdPolicy::Fail => Err(CodecError::UnknownTypeId(id)),
            UnknownIdPolicy::LegacyDenseMap => {
                if let Some(start) = rewind {
                    source.seek_to(start)?;
                }
                log::warn!(
                    "[dispatch] unknown id {}, reading untagged dense map at {}",
                    id,
                    source.position()
                );
                let def = self.get(ids::MAP)?;
                let value = map::decode_dense(self, source, self.nested(depth)?)?;
                Ok(Item {
                    def,
                    value: Value::Map(value),
                })
            }
        }
    }

    pub(crate) fn encode_entry_at(
        &self,
        sink: &mut dyn ByteSink,
        def: &Def,
        value: &Value,
        depth: usize,
    ) -> CodecResult<()> {
        primitive::write_type_id(sink, def.id())?;
        self.encode_value_at(sink, def, value, depth)
    }

    pub(crate) fn decode_entry_at(
        &self,
        source: &mut dyn ByteSource,
        depth: usize,
    ) -> CodecResult<Item> {
        let start = source.position();
        let id = primitive::read_type_id(source)?;
        match self.try_get(id) {
            Some(def) => {
                let value = self.decode_value_at(source, &def, depth)?;
                Ok(Item { def, value })
            }
            None => self.decode_unknown_at(source, id, Some(start), depth),
        }
    }
}
