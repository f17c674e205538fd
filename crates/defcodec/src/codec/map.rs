// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Dense, aligned and named maps.
//!
//! ```text
//! dense:    [i32 count] ([16B id][value])*
//! aligned:  [i32 count] pad(N) ([16B id][value] pad(N))*
//! named:    [i32 count] pad(N) ([name] pad(N) [16B id][value] pad(N))*
//! ```
//!
//! Padding is zero-filled on encode and skipped by position on decode, using
//! the absolute stream position. None of these layouts seek backwards, so
//! forward-only sinks and sources work.

use super::primitive::{check_payload, decode_string, encode_string, read_count, write_count};
use crate::error::{CodecError, CodecResult};
use crate::id::TYPE_ID_SIZE;
use crate::registry::Catalog;
use crate::shape::Alignment;
use crate::stream::{pad_to, skip_to, ByteSink, ByteSource};
use crate::value::{ItemMap, NamedMap};

fn read_entry_count(catalog: &Catalog, source: &mut dyn ByteSource) -> CodecResult<usize> {
    let count = read_count(source, "map entry count")?;
    // Every entry carries at least its 16-byte tag.
    check_payload(count, TYPE_ID_SIZE, catalog.config().max_payload_bytes)?;
    Ok(count)
}

pub(crate) fn encode_dense(
    catalog: &Catalog,
    sink: &mut dyn ByteSink,
    map: &ItemMap,
    depth: usize,
) -> CodecResult<()> {
    write_count(sink, map.len())?;
    for item in map {
        catalog.encode_entry_at(sink, &item.def, &item.value, depth)?;
    }
    Ok(())
}

pub(crate) fn decode_dense(
    catalog: &Catalog,
    source: &mut dyn ByteSource,
    depth: usize,
) -> CodecResult<ItemMap> {
    let count = read_entry_count(catalog, source)?;
    let mut map = ItemMap::with_capacity(count.min(1024));
    for _ in 0..count {
        map.insert_item(catalog.decode_entry_at(source, depth)?);
    }
    Ok(map)
}

pub(crate) fn encode_aligned(
    catalog: &Catalog,
    sink: &mut dyn ByteSink,
    map: &ItemMap,
    align: Alignment,
    depth: usize,
) -> CodecResult<()> {
    let n = align.bytes();
    write_count(sink, map.len())?;
    pad_to(sink, n)?;
    for item in map {
        catalog.encode_entry_at(sink, &item.def, &item.value, depth)?;
        pad_to(sink, n)?;
    }
    Ok(())
}

pub(crate) fn decode_aligned(
    catalog: &Catalog,
    source: &mut dyn ByteSource,
    align: Alignment,
    depth: usize,
) -> CodecResult<ItemMap> {
    let n = align.bytes();
    let count = read_entry_count(catalog, source)?;
    skip_to(source, n)?;
    let mut map = ItemMap::with_capacity(count.min(1024));
    for _ in 0..count {
        map.insert_item(catalog.decode_entry_at(source, depth)?);
        skip_to(source, n)?;
    }
    Ok(map)
}

fn check_name(name: &str) -> CodecResult<()> {
    if name.trim().is_empty() {
        return Err(CodecError::InvalidName {
            name: name.to_owned(),
        });
    }
    Ok(())
}

pub(crate) fn encode_named(
    catalog: &Catalog,
    sink: &mut dyn ByteSink,
    map: &NamedMap,
    align: Alignment,
    depth: usize,
) -> CodecResult<()> {
    // Reject bad names before anything reaches the sink.
    for entry in map {
        check_name(&entry.name)?;
    }

    let n = align.bytes();
    write_count(sink, map.len())?;
    pad_to(sink, n)?;
    for entry in map {
        encode_string(sink, &entry.name)?;
        pad_to(sink, n)?;
        catalog.encode_entry_at(sink, &entry.item.def, &entry.item.value, depth)?;
        pad_to(sink, n)?;
    }
    Ok(())
}

pub(crate) fn decode_named(
    catalog: &Catalog,
    source: &mut dyn ByteSource,
    align: Alignment,
    depth: usize,
) -> CodecResult<NamedMap> {
    let n = align.bytes();
    let limit = catalog.config().max_payload_bytes;
    let count = read_entry_count(catalog, source)?;
    skip_to(source, n)?;
    let mut map = NamedMap::with_capacity(count.min(1024));
    for _ in 0..count {
        let name = decode_string(source, limit)?;
        check_name(&name)?;
        skip_to(source, n)?;
        let item = catalog.decode_entry_at(source, depth)?;
        skip_to(source, n)?;
        map.insert(name, item.def, item.value);
    }
    Ok(map)
}
