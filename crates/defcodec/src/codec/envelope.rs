// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Gzip compression envelope.
//!
//! ```text
//! [i32 uncompressedLen][i32 compressedLen][gzip([16B inner id][inner value])]
//! ```
//!
//! The inner entry is encoded into a scratch buffer starting at position 0, so
//! any aligned map inside pads relative to the decompressed buffer.

use super::primitive::{check_payload, read_bytes, read_count, write_count};
use crate::error::{CodecError, CodecResult};
use crate::registry::Catalog;
use crate::stream::{ByteSink, ByteSource, ScratchSink};
use crate::value::Item;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use std::io::{Cursor, Read, Write};

pub(crate) fn encode(
    catalog: &Catalog,
    sink: &mut dyn ByteSink,
    inner: &Item,
    depth: usize,
) -> CodecResult<()> {
    let mut scratch = ScratchSink::new();
    catalog.encode_entry_at(&mut scratch, &inner.def, &inner.value, depth)?;
    let raw = scratch.into_bytes();

    let mut encoder = GzEncoder::new(Vec::new(), catalog.config().compression());
    encoder.write_all(&raw)?;
    let compressed = encoder.finish()?;

    write_count(sink, raw.len())?;
    write_count(sink, compressed.len())?;
    sink.write_all(&compressed)?;

    log::debug!(
        "[gzip] {} -> {} bytes ({})",
        raw.len(),
        compressed.len(),
        inner.def
    );
    Ok(())
}

pub(crate) fn decode(
    catalog: &Catalog,
    source: &mut dyn ByteSource,
    depth: usize,
) -> CodecResult<Item> {
    let limit = catalog.config().max_payload_bytes;
    let expected = read_count(source, "gzip uncompressed length")?;
    let compressed_len = read_count(source, "gzip compressed length")?;
    check_payload(expected, 1, limit)?;
    check_payload(compressed_len, 1, limit)?;

    let compressed = read_bytes(source, compressed_len)?;

    // One byte past the declared size is enough to detect an oversized stream.
    let mut raw = Vec::with_capacity(expected.min(1 << 20));
    GzDecoder::new(compressed.as_slice())
        .take(expected as u64 + 1)
        .read_to_end(&mut raw)
        .map_err(|err| CodecError::Decompression { source: err })?;
    if raw.len() != expected {
        return Err(CodecError::DecompressionMismatch {
            expected,
            actual: raw.len(),
        });
    }

    log::debug!("[gzip] inflated {} -> {} bytes", compressed_len, expected);
    catalog.decode_entry_at(&mut Cursor::new(raw), depth)
}
