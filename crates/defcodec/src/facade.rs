// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Top-level serialize/deserialize entry points.
//!
//! A top-level payload is always `[16-byte def id][value]`. Decoding reads the
//! id, resolves it through the catalog and dispatches.

use crate::codec::primitive::read_type_id;
use crate::codec::toc::TocIndex;
use crate::error::{CodecError, CodecResult};
use crate::registry::{Catalog, Def};
use crate::shape::WireShape;
use crate::stream::{ByteSink, ByteSource, SeekSink, SeekSource, StreamSink, StreamSource};
use crate::value::{FromValue, Item, Value};
use std::fs::File;
use std::io::{BufReader, BufWriter, Cursor, Read, Write};
use std::path::Path;
use std::sync::Arc;

impl Catalog {
    /// Serialize to a new byte vector.
    pub fn serialize(&self, def: &Def, value: &Value) -> CodecResult<Vec<u8>> {
        let mut sink = Cursor::new(Vec::new());
        self.serialize_into(&mut sink, def, value)?;
        Ok(sink.into_inner())
    }

    /// Serialize an [`Item`] to a new byte vector.
    pub fn serialize_item(&self, item: &Item) -> CodecResult<Vec<u8>> {
        self.serialize(&item.def, &item.value)
    }

    /// Serialize at the sink's current position.
    pub fn serialize_into(
        &self,
        sink: &mut dyn ByteSink,
        def: &Def,
        value: &Value,
    ) -> CodecResult<()> {
        self.encode_entry(sink, def, value)
    }

    /// Serialize to a plain writer (pipe, socket, compressor). TOC maps are
    /// staged in memory. Returns the number of bytes written.
    pub fn serialize_to_writer<W: Write>(
        &self,
        writer: &mut W,
        def: &Def,
        value: &Value,
    ) -> CodecResult<u64> {
        let mut sink = StreamSink::new(writer);
        self.encode_entry(&mut sink, def, value)?;
        sink.flush()?;
        Ok(sink.position())
    }

    /// Serialize to a file, creating or truncating it.
    pub fn serialize_to_file<P: AsRef<Path>>(
        &self,
        path: P,
        def: &Def,
        value: &Value,
    ) -> CodecResult<()> {
        let file = File::create(path.as_ref())?;
        let mut sink = SeekSink::new(BufWriter::new(file))?;
        self.encode_entry(&mut sink, def, value)?;
        sink.flush()?;
        log::debug!(
            "[facade] wrote {} bytes to {}",
            sink.position(),
            path.as_ref().display()
        );
        Ok(())
    }

    /// Deserialize one top-level value from a byte slice.
    pub fn deserialize(&self, bytes: &[u8]) -> CodecResult<Item> {
        self.deserialize_from(&mut Cursor::new(bytes))
    }

    /// Deserialize one top-level value at the source's current position.
    ///
    /// A leading id the catalog does not know is handled by the catalog's
    /// [`UnknownIdPolicy`](crate::UnknownIdPolicy).
    pub fn deserialize_from(&self, source: &mut dyn ByteSource) -> CodecResult<Item> {
        self.decode_entry_at(source, 0)
    }

    /// Deserialize from a plain reader, reading forward only.
    pub fn deserialize_from_reader<R: Read>(&self, reader: &mut R) -> CodecResult<Item> {
        self.deserialize_from(&mut StreamSource::new(reader))
    }

    pub fn deserialize_file<P: AsRef<Path>>(&self, path: P) -> CodecResult<Item> {
        let file = File::open(path.as_ref())?;
        let mut source = SeekSource::new(BufReader::new(file))?;
        self.deserialize_from(&mut source)
    }

    /// Deserialize and extract a typed value.
    ///
    /// Fails with `ValueMismatch` when the decoded value is not a `T`.
    pub fn deserialize_as<T: FromValue>(&self, bytes: &[u8]) -> CodecResult<(Arc<Def>, T)> {
        let Item { def, value } = self.deserialize(bytes)?;
        let found = value.describe();
        match T::from_value(value) {
            Some(typed) => Ok((def, typed)),
            None => Err(CodecError::ValueMismatch {
                def: def.id(),
                expected: std::any::type_name::<T>().to_owned(),
                found,
            }),
        }
    }

    /// Read the tag and table of contents of a top-level TOC map without
    /// decoding its children.
    pub fn open_toc(&self, source: &mut dyn ByteSource) -> CodecResult<TocIndex> {
        let id = read_type_id(source)?;
        let def = self.get(id)?;
        match self.decoder_shape(&def)? {
            WireShape::TocMap => TocIndex::read(self, source),
            shape => Err(CodecError::ValueMismatch {
                def: id,
                expected: WireShape::TocMap.to_string(),
                found: shape.value_kind(),
            }),
        }
    }
}
