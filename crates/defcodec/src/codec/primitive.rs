// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fixed-width scalars, arrays, strings and string arrays.
//!
//! All integers are little-endian. Arrays and strings are `i32 count` followed
//! by the raw element bytes, with no padding.

use crate::error::{CodecError, CodecResult};
use crate::id::{TypeId, TYPE_ID_SIZE};
use crate::shape::ScalarKind;
use crate::stream::{ByteSink, ByteSource};
use crate::value::{Array, Scalar};
use byteorder::{ByteOrder, LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::Read;
use uuid::Uuid;

/// Write an `i32` element/entry count.
pub(crate) fn write_count(sink: &mut dyn ByteSink, len: usize) -> CodecResult<()> {
    let count = i32::try_from(len).map_err(|_| CodecError::InvalidLength {
        what: "count",
        len: len as i64,
    })?;
    sink.write_i32::<LittleEndian>(count)?;
    Ok(())
}

/// Read an `i32` count; negative values are rejected.
pub(crate) fn read_count(source: &mut dyn ByteSource, what: &'static str) -> CodecResult<usize> {
    let count = source.read_i32::<LittleEndian>()?;
    if count < 0 {
        return Err(CodecError::InvalidLength {
            what,
            len: count as i64,
        });
    }
    Ok(count as usize)
}

/// Reject a declared payload above `limit` before anything is allocated.
pub(crate) fn check_payload(count: usize, element_size: usize, limit: u64) -> CodecResult<usize> {
    let bytes = count
        .checked_mul(element_size)
        .ok_or(CodecError::LengthLimitExceeded {
            len: u64::MAX,
            limit,
        })?;
    if bytes as u64 > limit {
        return Err(CodecError::LengthLimitExceeded {
            len: bytes as u64,
            limit,
        });
    }
    Ok(bytes)
}

/// Read exactly `len` bytes. The buffer grows with the data actually present,
/// so a lying length on a short stream cannot force a large allocation.
pub(crate) fn read_bytes(source: &mut dyn ByteSource, len: usize) -> CodecResult<Vec<u8>> {
    let mut buf = Vec::with_capacity(len.min(64 * 1024));
    Read::take(&mut *source, len as u64).read_to_end(&mut buf)?;
    if buf.len() < len {
        return Err(CodecError::StreamTruncated);
    }
    Ok(buf)
}

pub(crate) fn write_type_id(sink: &mut dyn ByteSink, id: TypeId) -> CodecResult<()> {
    sink.write_all(&id.to_wire())?;
    Ok(())
}

pub(crate) fn read_type_id(source: &mut dyn ByteSource) -> CodecResult<TypeId> {
    let mut bytes = [0u8; TYPE_ID_SIZE];
    source.read_exact(&mut bytes)?;
    Ok(TypeId::from_wire(bytes))
}

fn guid_to_wire(guid: &Uuid) -> [u8; 16] {
    guid.to_bytes_le()
}

fn guid_from_wire(bytes: &[u8]) -> Uuid {
    let mut raw = [0u8; 16];
    raw.copy_from_slice(&bytes[..16]);
    Uuid::from_bytes_le(raw)
}

pub(crate) fn encode_scalar(sink: &mut dyn ByteSink, scalar: &Scalar) -> CodecResult<()> {
    match scalar {
        Scalar::Bool(v) => sink.write_u8(u8::from(*v))?,
        Scalar::I8(v) => sink.write_i8(*v)?,
        Scalar::U8(v) => sink.write_u8(*v)?,
        Scalar::I16(v) => sink.write_i16::<LittleEndian>(*v)?,
        Scalar::U16(v) => sink.write_u16::<LittleEndian>(*v)?,
        Scalar::I32(v) => sink.write_i32::<LittleEndian>(*v)?,
        Scalar::U32(v) => sink.write_u32::<LittleEndian>(*v)?,
        Scalar::I64(v) => sink.write_i64::<LittleEndian>(*v)?,
        Scalar::U64(v) => sink.write_u64::<LittleEndian>(*v)?,
        Scalar::F32(v) => sink.write_f32::<LittleEndian>(*v)?,
        Scalar::F64(v) => sink.write_f64::<LittleEndian>(*v)?,
        Scalar::Guid(v) => sink.write_all(&guid_to_wire(v))?,
        Scalar::Blob(bytes) => sink.write_all(bytes)?,
    }
    Ok(())
}

pub(crate) fn decode_scalar(source: &mut dyn ByteSource, kind: ScalarKind) -> CodecResult<Scalar> {
    let scalar = match kind {
        ScalarKind::Bool => Scalar::Bool(source.read_u8()? != 0),
        ScalarKind::I8 => Scalar::I8(source.read_i8()?),
        ScalarKind::U8 => Scalar::U8(source.read_u8()?),
        ScalarKind::I16 => Scalar::I16(source.read_i16::<LittleEndian>()?),
        ScalarKind::U16 => Scalar::U16(source.read_u16::<LittleEndian>()?),
        ScalarKind::I32 => Scalar::I32(source.read_i32::<LittleEndian>()?),
        ScalarKind::U32 => Scalar::U32(source.read_u32::<LittleEndian>()?),
        ScalarKind::I64 => Scalar::I64(source.read_i64::<LittleEndian>()?),
        ScalarKind::U64 => Scalar::U64(source.read_u64::<LittleEndian>()?),
        ScalarKind::F32 => Scalar::F32(source.read_f32::<LittleEndian>()?),
        ScalarKind::F64 => Scalar::F64(source.read_f64::<LittleEndian>()?),
        ScalarKind::Guid => {
            let mut raw = [0u8; 16];
            source.read_exact(&mut raw)?;
            Scalar::Guid(Uuid::from_bytes_le(raw))
        }
        ScalarKind::Blob(width) => {
            let mut raw = vec![0u8; width];
            source.read_exact(&mut raw)?;
            Scalar::Blob(raw)
        }
    };
    Ok(scalar)
}

/// Generate the bulk little-endian conversion for one numeric array variant.
macro_rules! encode_numeric {
    ($values:expr, $size:expr, $write_into:ident) => {{
        let values = $values;
        let mut raw = vec![0u8; values.len() * $size];
        LittleEndian::$write_into(values, &mut raw);
        raw
    }};
}

macro_rules! decode_numeric {
    ($raw:expr, $count:expr, $ty:ty, $read_into:ident) => {{
        let mut values: Vec<$ty> = vec![Default::default(); $count];
        LittleEndian::$read_into(&$raw, &mut values);
        values
    }};
}

pub(crate) fn encode_array(sink: &mut dyn ByteSink, array: &Array) -> CodecResult<()> {
    if let Array::Blob { width, data } = array {
        if *width == 0 || data.len() % width != 0 {
            return Err(CodecError::InvalidLength {
                what: "blob array data",
                len: data.len() as i64,
            });
        }
    }
    write_count(sink, array.len())?;

    let raw: Vec<u8> = match array {
        Array::Bool(values) => values.iter().map(|&b| u8::from(b)).collect(),
        Array::I8(values) => values.iter().map(|&v| v as u8).collect(),
        Array::U8(values) => {
            sink.write_all(values)?;
            return Ok(());
        }
        Array::I16(values) => encode_numeric!(values, 2, write_i16_into),
        Array::U16(values) => encode_numeric!(values, 2, write_u16_into),
        Array::I32(values) => encode_numeric!(values, 4, write_i32_into),
        Array::U32(values) => encode_numeric!(values, 4, write_u32_into),
        Array::I64(values) => encode_numeric!(values, 8, write_i64_into),
        Array::U64(values) => encode_numeric!(values, 8, write_u64_into),
        Array::F32(values) => encode_numeric!(values, 4, write_f32_into),
        Array::F64(values) => encode_numeric!(values, 8, write_f64_into),
        Array::Guid(values) => values.iter().flat_map(guid_to_wire).collect(),
        Array::Blob { data, .. } => {
            sink.write_all(data)?;
            return Ok(());
        }
    };
    sink.write_all(&raw)?;
    Ok(())
}

pub(crate) fn decode_array(
    source: &mut dyn ByteSource,
    kind: ScalarKind,
    limit: u64,
) -> CodecResult<Array> {
    let count = read_count(source, "array count")?;
    let bytes = check_payload(count, kind.size(), limit)?;
    let raw = read_bytes(source, bytes)?;

    let array = match kind {
        ScalarKind::Bool => Array::Bool(raw.iter().map(|&b| b != 0).collect()),
        ScalarKind::I8 => Array::I8(raw.iter().map(|&b| b as i8).collect()),
        ScalarKind::U8 => Array::U8(raw),
        ScalarKind::I16 => Array::I16(decode_numeric!(raw, count, i16, read_i16_into)),
        ScalarKind::U16 => Array::U16(decode_numeric!(raw, count, u16, read_u16_into)),
        ScalarKind::I32 => Array::I32(decode_numeric!(raw, count, i32, read_i32_into)),
        ScalarKind::U32 => Array::U32(decode_numeric!(raw, count, u32, read_u32_into)),
        ScalarKind::I64 => Array::I64(decode_numeric!(raw, count, i64, read_i64_into)),
        ScalarKind::U64 => Array::U64(decode_numeric!(raw, count, u64, read_u64_into)),
        ScalarKind::F32 => Array::F32(decode_numeric!(raw, count, f32, read_f32_into)),
        ScalarKind::F64 => Array::F64(decode_numeric!(raw, count, f64, read_f64_into)),
        ScalarKind::Guid => Array::Guid(raw.chunks_exact(16).map(guid_from_wire).collect()),
        ScalarKind::Blob(width) => Array::Blob { width, data: raw },
    };
    Ok(array)
}

pub(crate) fn encode_string(sink: &mut dyn ByteSink, value: &str) -> CodecResult<()> {
    write_count(sink, value.len())?;
    sink.write_all(value.as_bytes())?;
    Ok(())
}

pub(crate) fn decode_string(source: &mut dyn ByteSource, limit: u64) -> CodecResult<String> {
    let len = read_count(source, "string length")?;
    check_payload(len, 1, limit)?;
    let raw = read_bytes(source, len)?;
    Ok(String::from_utf8(raw)?)
}

pub(crate) fn encode_string_array(sink: &mut dyn ByteSink, values: &[String]) -> CodecResult<()> {
    write_count(sink, values.len())?;
    for value in values {
        encode_string(sink, value)?;
    }
    Ok(())
}

pub(crate) fn decode_string_array(
    source: &mut dyn ByteSource,
    limit: u64,
) -> CodecResult<Vec<String>> {
    let count = read_count(source, "string array count")?;
    // Every string costs at least its 4-byte length prefix.
    check_payload(count, 4, limit)?;
    let mut values = Vec::with_capacity(count.min(4096));
    for _ in 0..count {
        values.push(decode_string(source, limit)?);
    }
    Ok(values)
}
