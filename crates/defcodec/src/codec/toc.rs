// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! TOC-indexed maps.
//!
//! A header and table of contents precede the entries, so a reader can locate
//! and decode one child without touching the others.
//!
//! ```text
//! origin +0   [16B container id][i64 totalBytes][i32 entryCount][i32 flags]
//!        +32  [16B child id][i64 offset] x entryCount
//!             pad(16) [child value] pad(16) [child value] ... pad(16)
//! origin + totalBytes
//! ```
//!
//! Offsets and padding are relative to the origin. Child values are untagged;
//! the TOC record carries their id. The header is reserved on encode and
//! back-patched once the entry offsets are known. A non-seekable sink gets the
//! whole container staged in a [`ScratchSink`] positioned at the real origin.

use super::primitive::{check_payload, read_count, read_type_id, write_count, write_type_id};
use crate::error::{CodecError, CodecResult};
use crate::id::TypeId;
use crate::registry::{Catalog, Def};
use crate::shape::WireShape;
use crate::stream::{pad_from, write_zeros, ByteSink, ByteSource, ScratchSink};
use crate::value::{Item, ItemMap};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::sync::Arc;

/// Entries start on multiples of this, relative to the origin.
pub const ENTRY_ALIGNMENT: u64 = 16;

/// TOC map header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TocHeader {
    /// Id of the Def that was encoded.
    pub container_id: TypeId,
    /// Bytes from the origin to the end of the padded tail.
    pub total_bytes: u64,
    pub entry_count: usize,
    /// Nonzero marks a retired variant of the layout.
    pub flags: i32,
}

impl TocHeader {
    pub const SIZE: usize = 32;

    fn write(&self, sink: &mut dyn ByteSink) -> CodecResult<()> {
        write_type_id(sink, self.container_id)?;
        sink.write_i64::<LittleEndian>(self.total_bytes as i64)?;
        write_count(sink, self.entry_count)?;
        sink.write_i32::<LittleEndian>(self.flags)?;
        Ok(())
    }

    fn read(source: &mut dyn ByteSource) -> CodecResult<Self> {
        let container_id = read_type_id(source)?;
        let total_bytes = source.read_i64::<LittleEndian>()?;
        if total_bytes < 0 {
            return Err(CodecError::InvalidLength {
                what: "toc total bytes",
                len: total_bytes,
            });
        }
        let entry_count = read_count(source, "toc entry count")?;
        let flags = source.read_i32::<LittleEndian>()?;
        Ok(Self {
            container_id,
            total_bytes: total_bytes as u64,
            entry_count,
            flags,
        })
    }
}

/// One table-of-contents record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TocRecord {
    pub id: TypeId,
    /// Offset of the child value from the container origin.
    pub offset: u64,
}

impl TocRecord {
    pub const SIZE: usize = 24;

    fn write(&self, sink: &mut dyn ByteSink) -> CodecResult<()> {
        write_type_id(sink, self.id)?;
        sink.write_i64::<LittleEndian>(self.offset as i64)?;
        Ok(())
    }

    fn read(source: &mut dyn ByteSource) -> CodecResult<Self> {
        let id = read_type_id(source)?;
        let offset = source.read_i64::<LittleEndian>()?;
        if offset < 0 {
            return Err(CodecError::InvalidLength {
                what: "toc entry offset",
                len: offset,
            });
        }
        Ok(Self {
            id,
            offset: offset as u64,
        })
    }
}

pub(crate) fn encode(
    catalog: &Catalog,
    sink: &mut dyn ByteSink,
    def: &Def,
    map: &ItemMap,
    depth: usize,
) -> CodecResult<()> {
    if sink.is_seekable() {
        return encode_patched(catalog, sink, def, map, depth);
    }

    let origin = sink.position();
    let mut scratch = ScratchSink::at(origin);
    encode_patched(catalog, &mut scratch, def, map, depth)?;
    log::debug!(
        "[toc] staged {} bytes for forward-only sink at {}",
        scratch.as_bytes().len(),
        origin
    );
    sink.write_all(scratch.as_bytes())?;
    Ok(())
}

fn encode_patched(
    catalog: &Catalog,
    sink: &mut dyn ByteSink,
    def: &Def,
    map: &ItemMap,
    depth: usize,
) -> CodecResult<()> {
    let origin = sink.position();
    let table_end = TocHeader::SIZE + TocRecord::SIZE * map.len();

    // Reserved, back-patched below.
    write_zeros(sink, table_end)?;

    let mut records = Vec::with_capacity(map.len());
    for item in map {
        pad_from(sink, origin, ENTRY_ALIGNMENT)?;
        records.push(TocRecord {
            id: item.id(),
            offset: sink.position() - origin,
        });
        catalog.encode_value_at(sink, &item.def, &item.value, depth)?;
    }
    pad_from(sink, origin, ENTRY_ALIGNMENT)?;
    let end = sink.position();

    let header = TocHeader {
        container_id: def.id(),
        total_bytes: end - origin,
        entry_count: records.len(),
        flags: 0,
    };
    sink.seek_to(origin)?;
    header.write(sink)?;
    for record in &records {
        record.write(sink)?;
    }
    sink.seek_to(end)?;

    log::debug!(
        "[toc] {} entries, {} bytes at origin {}",
        records.len(),
        header.total_bytes,
        origin
    );
    Ok(())
}

pub(crate) fn decode(
    catalog: &Catalog,
    source: &mut dyn ByteSource,
    def: &Arc<Def>,
    depth: usize,
) -> CodecResult<ItemMap> {
    let index = TocIndex::read_at(catalog, source, depth)?;
    let header_def = catalog.try_get(index.container_id()).map(|d| d.id());
    if header_def != Some(def.id()) {
        log::warn!(
            "[toc] header id {} does not match {}",
            index.container_id(),
            def
        );
    }
    let map = index.decode_all(catalog, source)?;
    index.skip_past(source)?;
    Ok(map)
}

/// Parsed header and table of contents of one TOC map.
///
/// Obtained with [`TocIndex::read`] (or [`Catalog::open_toc`] for a top-level
/// value); children are decoded on demand by seeking to their offsets. Record
/// offsets are strictly increasing, so every child has its own byte range.
#[derive(Debug, Clone)]
pub struct TocIndex {
    header: TocHeader,
    origin: u64,
    records: Vec<TocRecord>,
    /// Nesting depth of the children.
    depth: usize,
}

impl TocIndex {
    /// Parse the header and table of a top-level TOC map at the current source
    /// position, leaving the source just after the table.
    ///
    /// Use [`TocIndex::child_index`] to descend into nested TOC maps so the
    /// catalog's nesting limit keeps counting.
    pub fn read(catalog: &Catalog, source: &mut dyn ByteSource) -> CodecResult<Self> {
        Self::read_at(catalog, source, catalog.nested(0)?)
    }

    pub(crate) fn read_at(
        catalog: &Catalog,
        source: &mut dyn ByteSource,
        depth: usize,
    ) -> CodecResult<Self> {
        let limit = catalog.config().max_payload_bytes;
        let origin = source.position();
        let header = TocHeader::read(source)?;

        if header.flags != 0 {
            return Err(CodecError::DeprecatedVariantUnsupported {
                def: header.container_id,
                flags: header.flags,
            });
        }
        if header.total_bytes > limit {
            return Err(CodecError::LengthLimitExceeded {
                len: header.total_bytes,
                limit,
            });
        }
        let table_bytes = check_payload(header.entry_count, TocRecord::SIZE, limit)?;
        let table_end = (TocHeader::SIZE + table_bytes) as u64;
        if table_end > header.total_bytes {
            return Err(CodecError::InvalidLength {
                what: "toc total bytes",
                len: header.total_bytes as i64,
            });
        }

        let mut records = Vec::with_capacity(header.entry_count.min(1024));
        let mut floor = table_end;
        for _ in 0..header.entry_count {
            let record = TocRecord::read(source)?;
            if record.offset < floor || record.offset >= header.total_bytes {
                return Err(CodecError::InvalidLength {
                    what: "toc entry offset",
                    len: record.offset as i64,
                });
            }
            floor = record.offset + 1;
            records.push(record);
        }

        Ok(Self {
            header,
            origin,
            records,
            depth,
        })
    }

    pub fn container_id(&self) -> TypeId {
        self.header.container_id
    }

    pub fn header(&self) -> &TocHeader {
        &self.header
    }

    /// Absolute source position of the container.
    pub fn origin(&self) -> u64 {
        self.origin
    }

    pub fn total_bytes(&self) -> u64 {
        self.header.total_bytes
    }

    /// Absolute source position just past the container.
    pub fn end(&self) -> u64 {
        self.origin + self.header.total_bytes
    }

    pub fn entries(&self) -> &[TocRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, id: TypeId) -> bool {
        self.records.iter().any(|record| record.id == id)
    }

    fn record(&self, id: TypeId) -> Option<&TocRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    /// Decode the child recorded under `id`; `None` if the TOC has no such
    /// entry. A forward-only source can only reach entries at or after its
    /// current position.
    pub fn decode_child(
        &self,
        catalog: &Catalog,
        source: &mut dyn ByteSource,
        id: TypeId,
    ) -> CodecResult<Option<Item>> {
        let Some(record) = self.record(id) else {
            return Ok(None);
        };
        source.seek_to(self.origin + record.offset)?;
        catalog.decode_id_at(source, record.id, self.depth).map(Some)
    }

    /// Open the index of a nested TOC map recorded under `id`, one nesting
    /// level below this one.
    pub fn child_index(
        &self,
        catalog: &Catalog,
        source: &mut dyn ByteSource,
        id: TypeId,
    ) -> CodecResult<Option<TocIndex>> {
        let Some(record) = self.record(id) else {
            return Ok(None);
        };
        let def = catalog.get(record.id)?;
        let shape = catalog.decoder_shape(&def)?;
        if shape != WireShape::TocMap {
            return Err(CodecError::ValueMismatch {
                def: record.id,
                expected: WireShape::TocMap.to_string(),
                found: shape.value_kind(),
            });
        }
        let depth = catalog.nested(self.depth)?;
        source.seek_to(self.origin + record.offset)?;
        Self::read_at(catalog, source, depth).map(Some)
    }

    /// Decode every child, in table order, keyed by Def.
    ///
    /// A child may not run into the next one or past the container end.
    pub fn decode_all(&self, catalog: &Catalog, source: &mut dyn ByteSource) -> CodecResult<ItemMap> {
        let mut map = ItemMap::with_capacity(self.records.len());
        let mut child_end = self.origin;
        for record in &self.records {
            let start = self.origin + record.offset;
            if start < child_end {
                return Err(CodecError::InvalidLength {
                    what: "toc entry offset",
                    len: record.offset as i64,
                });
            }
            source.seek_to(start)?;
            map.insert_item(catalog.decode_id_at(source, record.id, self.depth)?);
            child_end = source.position();
        }
        if child_end > self.end() {
            return Err(CodecError::InvalidLength {
                what: "toc total bytes",
                len: self.header.total_bytes as i64,
            });
        }
        Ok(map)
    }

    /// Position the source just past the container.
    pub fn skip_past(&self, source: &mut dyn ByteSource) -> CodecResult<()> {
        source.seek_to(self.end())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::ids;
    use crate::config::CodecConfig;
    use crate::registry::TypeRegistry;
    use crate::stream::{align_up, StreamSink, StreamSource};
    use crate::value::Value;
    use std::io::{Cursor, Write};

    fn catalog() -> Catalog {
        TypeRegistry::with_builtins()
            .expect("Builtins should register")
            .seal(CodecConfig::default())
    }

    fn sample(catalog: &Catalog) -> ItemMap {
        let mut map = ItemMap::new();
        map.insert(catalog.get(ids::UINT8_ARRAY).expect("UInt8Array"), vec![1u8, 2, 3]);
        map.insert(
            catalog.get(ids::FLOAT64_ARRAY).expect("Float64Array"),
            vec![1.1f64, 2.2],
        );
        map
    }

    fn encode_sample(catalog: &Catalog) -> Vec<u8> {
        let toc = catalog.get(ids::TOC_MAP).expect("TocMap");
        let mut sink = Cursor::new(Vec::new());
        encode(catalog, &mut sink, &toc, &sample(catalog), 1).expect("Encode should succeed");
        sink.into_inner()
    }

    #[test]
    fn test_header_and_offsets() {
        let catalog = catalog();
        let bytes = encode_sample(&catalog);
        let index = TocIndex::read(&catalog, &mut Cursor::new(bytes.as_slice()))
            .expect("Index should parse");

        assert_eq!(index.container_id(), ids::TOC_MAP);
        assert_eq!(index.total_bytes(), bytes.len() as u64);
        assert_eq!(index.total_bytes() % ENTRY_ALIGNMENT, 0);
        assert_eq!(index.len(), 2);
        // 32 + 2 * 24 = 80, already aligned.
        assert_eq!(index.entries()[0].offset, 80);
        // u8 array: 4 + 3 bytes, padded to 96.
        assert_eq!(index.entries()[1].offset, 96);
        for record in index.entries() {
            assert_eq!(record.offset % ENTRY_ALIGNMENT, 0);
        }
    }

    #[test]
    fn test_decode_child_independently() {
        let catalog = catalog();
        let bytes = encode_sample(&catalog);
        let mut source = Cursor::new(bytes.as_slice());
        let index = TocIndex::read(&catalog, &mut source).expect("Index should parse");

        let floats = index
            .decode_child(&catalog, &mut source, ids::FLOAT64_ARRAY)
            .expect("Decode should succeed")
            .expect("Entry should exist");
        assert_eq!(floats.value, Value::from(vec![1.1f64, 2.2]));

        let bytes_item = index
            .decode_child(&catalog, &mut source, ids::UINT8_ARRAY)
            .expect("Decode should succeed")
            .expect("Entry should exist");
        assert_eq!(bytes_item.value, Value::from(vec![1u8, 2, 3]));

        assert!(index
            .decode_child(&catalog, &mut source, ids::STRING)
            .expect("Lookup should succeed")
            .is_none());
        assert!(!index.contains(ids::STRING));
    }

    #[test]
    fn test_forward_only_sink_matches_seekable() {
        let catalog = catalog();
        let toc = catalog.get(ids::TOC_MAP).expect("TocMap");

        // Start at an odd position so origin-relative padding is exercised.
        let mut seekable = Cursor::new(vec![0xEE; 3]);
        crate::stream::ByteSink::seek_to(&mut seekable, 3).expect("Seek should succeed");
        encode(&catalog, &mut seekable, &toc, &sample(&catalog), 1)
            .expect("Encode should succeed");

        let mut forward = StreamSink::new(Vec::new());
        forward.write_all(&[0xEE; 3]).expect("Write should succeed");
        encode(&catalog, &mut forward, &toc, &sample(&catalog), 1)
            .expect("Encode should succeed");

        assert_eq!(seekable.into_inner(), forward.into_inner());
    }

    #[test]
    fn test_decode_over_forward_only_source() {
        let catalog = catalog();
        let toc = catalog.get(ids::TOC_MAP).expect("TocMap");
        let mut bytes = encode_sample(&catalog);
        bytes.push(0x7F);

        let mut source = StreamSource::new(bytes.as_slice());
        let map = decode(&catalog, &mut source, &toc, 1).expect("Decode should succeed");
        assert_eq!(map, sample(&catalog));
        assert_eq!(source.position(), bytes.len() as u64 - 1);
    }

    #[test]
    fn test_nonzero_flags_rejected() {
        let catalog = catalog();
        let mut bytes = encode_sample(&catalog);
        bytes[28..32].copy_from_slice(&1i32.to_le_bytes());
        let err = TocIndex::read(&catalog, &mut Cursor::new(bytes)).unwrap_err();
        assert!(matches!(
            err,
            CodecError::DeprecatedVariantUnsupported { flags: 1, .. }
        ));
    }

    #[test]
    fn test_offset_out_of_range_rejected() {
        let catalog = catalog();
        let mut bytes = encode_sample(&catalog);
        let total = bytes.len() as i64;
        // First record offset field sits at 32 + 16.
        bytes[48..56].copy_from_slice(&total.to_le_bytes());
        let err = TocIndex::read(&catalog, &mut Cursor::new(bytes)).unwrap_err();
        assert!(matches!(
            err,
            CodecError::InvalidLength {
                what: "toc entry offset",
                ..
            }
        ));
    }

    #[test]
    fn test_empty_toc() {
        let catalog = catalog();
        let toc = catalog.get(ids::TOC_MAP).expect("TocMap");
        let mut sink = Cursor::new(Vec::new());
        encode(&catalog, &mut sink, &toc, &ItemMap::new(), 1).expect("Encode should succeed");
        let bytes = sink.into_inner();
        assert_eq!(bytes.len(), TocHeader::SIZE);

        let map = decode(&catalog, &mut Cursor::new(bytes), &toc, 1).expect("Decode should succeed");
        assert!(map.is_empty());
    }

    /// Hand-built TOC map: `records` hold `(child id, offset into body)`, the
    /// body starts at the first 16-byte boundary after the table.
    fn raw_toc(records: &[(TypeId, u64)], body: &[u8]) -> Vec<u8> {
        let table_end = (TocHeader::SIZE + TocRecord::SIZE * records.len()) as u64;
        let body_at = align_up(table_end, ENTRY_ALIGNMENT);
        let total = align_up(body_at + body.len() as u64, ENTRY_ALIGNMENT);

        let mut bytes = ids::TOC_MAP.to_wire().to_vec();
        bytes.extend_from_slice(&(total as i64).to_le_bytes());
        bytes.extend_from_slice(&(records.len() as i32).to_le_bytes());
        bytes.extend_from_slice(&0i32.to_le_bytes());
        for (id, offset) in records {
            bytes.extend_from_slice(&id.to_wire());
            bytes.extend_from_slice(&((body_at + offset) as i64).to_le_bytes());
        }
        bytes.resize(body_at as usize, 0);
        bytes.extend_from_slice(body);
        bytes.resize(total as usize, 0);
        bytes
    }

    #[test]
    fn test_repeated_offsets_rejected() {
        let catalog = catalog();
        let leaf = raw_toc(&[(ids::INT32, 0); 3], &7i32.to_le_bytes());
        let nested = raw_toc(&[(ids::TOC_MAP, 0); 3], &leaf);

        for bytes in [leaf, nested] {
            let err = catalog
                .decode(&mut Cursor::new(bytes.as_slice()), ids::TOC_MAP)
                .unwrap_err();
            assert!(matches!(
                err,
                CodecError::InvalidLength {
                    what: "toc entry offset",
                    ..
                }
            ));
        }

        // Distinct offsets over the same layout decode.
        let mut body = 7i32.to_le_bytes().to_vec();
        body.resize(16, 0);
        body.extend_from_slice(&8u16.to_le_bytes());
        let bytes = raw_toc(&[(ids::INT32, 0), (ids::UINT16, 16)], &body);
        let item = catalog
            .decode(&mut Cursor::new(bytes.as_slice()), ids::TOC_MAP)
            .expect("Decode should succeed");
        let map = item.value.as_map().expect("Map value");
        assert_eq!(map.get(ids::INT32), Some(&Value::from(7i32)));
        assert_eq!(map.get(ids::UINT16), Some(&Value::from(8u16)));
    }

    #[test]
    fn test_overlapping_children_rejected() {
        let catalog = catalog();
        // i64 array of 4 occupies body bytes 0..36; the second record points
        // inside it.
        let mut body = 4i32.to_le_bytes().to_vec();
        for v in [1i64, 2, 3, 4] {
            body.extend_from_slice(&v.to_le_bytes());
        }
        let bytes = raw_toc(&[(ids::INT64_ARRAY, 0), (ids::INT32, 16)], &body);

        let mut source = Cursor::new(bytes.as_slice());
        let index = TocIndex::read(&catalog, &mut source).expect("Index should parse");
        assert!(index
            .decode_child(&catalog, &mut source, ids::INT32)
            .expect("Decode should succeed")
            .is_some());

        let err = catalog
            .decode(&mut Cursor::new(bytes.as_slice()), ids::TOC_MAP)
            .unwrap_err();
        assert!(matches!(
            err,
            CodecError::InvalidLength {
                what: "toc entry offset",
                len: 96
            }
        ));
    }

    #[test]
    fn test_index_keeps_nesting_depth() {
        let catalog = catalog();
        let toc = catalog.get(ids::TOC_MAP).expect("TocMap");
        let int32 = catalog.get(ids::INT32).expect("Int32");

        let mut level3 = ItemMap::new();
        level3.insert(int32, 1i32);
        let mut level2 = ItemMap::new();
        level2.insert(toc.clone(), level3);
        let mut level1 = ItemMap::new();
        level1.insert(toc.clone(), level2);
        let bytes = catalog
            .serialize(&toc, &Value::from(level1))
            .expect("Serialize should succeed");

        let limited = TypeRegistry::with_builtins()
            .expect("Builtins should register")
            .seal(CodecConfig::builder().max_depth(2).build());
        let mut source = Cursor::new(bytes.as_slice());
        let top = limited.open_toc(&mut source).expect("TOC should open");
        let middle = top
            .child_index(&limited, &mut source, ids::TOC_MAP)
            .expect("Child index should open")
            .expect("Child should exist");

        let err = middle
            .decode_child(&limited, &mut source, ids::TOC_MAP)
            .unwrap_err();
        assert!(matches!(err, CodecError::NestingTooDeep { limit: 2 }));
        let err = middle
            .child_index(&limited, &mut source, ids::TOC_MAP)
            .unwrap_err();
        assert!(matches!(err, CodecError::NestingTooDeep { limit: 2 }));
        assert!(matches!(
            limited.deserialize(&bytes),
            Err(CodecError::NestingTooDeep { limit: 2 })
        ));

        // Unlimited catalog walks all three levels.
        let mut source = Cursor::new(bytes.as_slice());
        let top = catalog.open_toc(&mut source).expect("TOC should open");
        let middle = top
            .child_index(&catalog, &mut source, ids::TOC_MAP)
            .expect("Child index should open")
            .expect("Child should exist");
        let bottom = middle
            .child_index(&catalog, &mut source, ids::TOC_MAP)
            .expect("Child index should open")
            .expect("Child should exist");
        let leaf = bottom
            .decode_child(&catalog, &mut source, ids::INT32)
            .expect("Decode should succeed")
            .expect("Leaf should exist");
        assert_eq!(leaf.value, Value::from(1i32));
    }

    #[test]
    fn test_child_index_requires_toc_shape() {
        let catalog = catalog();
        let bytes = encode_sample(&catalog);
        let mut source = Cursor::new(bytes.as_slice());
        let index = TocIndex::read(&catalog, &mut source).expect("Index should parse");
        let err = index
            .child_index(&catalog, &mut source, ids::UINT8_ARRAY)
            .unwrap_err();
        assert!(matches!(err, CodecError::ValueMismatch { found: "array", .. }));
        assert!(index
            .child_index(&catalog, &mut source, ids::STRING)
            .expect("Lookup should succeed")
            .is_none());
    }
}
