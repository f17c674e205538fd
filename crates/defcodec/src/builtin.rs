// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Builtin primitive Defs and their wire shapes.
//!
//! Every builtin is a primitive (underlying type `UNIT`) and is bound to the
//! wire shape listed in [`BUILTINS`]. Domain Defs point their underlying-type
//! chain at one of these ids.

use crate::error::CodecResult;
use crate::id::TypeId;
use crate::registry::TypeRegistry;
use crate::shape::{Alignment, ScalarKind, WireShape};

/// Fixed ids of the builtin primitives.
///
/// Layout: `8d3f1c20-0001-4c6e-9a41-6f0b2d10GGNN`, `GG` the family (00 scalar,
/// 01 array, 02 string, 03 map, 04 envelope), `NN` the member.
pub mod ids {
    use crate::id::TypeId;

    const fn builtin(family: u16, member: u16) -> TypeId {
        TypeId::from_u128(
            0x8d3f1c20_0001_4c6e_9a41_6f0b2d100000 | ((family as u128) << 8) | member as u128,
        )
    }

    pub const BOOL: TypeId = builtin(0x00, 0x01);
    pub const INT8: TypeId = builtin(0x00, 0x02);
    pub const UINT8: TypeId = builtin(0x00, 0x03);
    pub const INT16: TypeId = builtin(0x00, 0x04);
    pub const UINT16: TypeId = builtin(0x00, 0x05);
    pub const INT32: TypeId = builtin(0x00, 0x06);
    pub const UINT32: TypeId = builtin(0x00, 0x07);
    pub const INT64: TypeId = builtin(0x00, 0x08);
    pub const UINT64: TypeId = builtin(0x00, 0x09);
    pub const FLOAT32: TypeId = builtin(0x00, 0x0A);
    pub const FLOAT64: TypeId = builtin(0x00, 0x0B);
    pub const GUID: TypeId = builtin(0x00, 0x0C);

    pub const BOOL_ARRAY: TypeId = builtin(0x01, 0x01);
    pub const INT8_ARRAY: TypeId = builtin(0x01, 0x02);
    pub const UINT8_ARRAY: TypeId = builtin(0x01, 0x03);
    pub const INT16_ARRAY: TypeId = builtin(0x01, 0x04);
    pub const UINT16_ARRAY: TypeId = builtin(0x01, 0x05);
    pub const INT32_ARRAY: TypeId = builtin(0x01, 0x06);
    pub const UINT32_ARRAY: TypeId = builtin(0x01, 0x07);
    pub const INT64_ARRAY: TypeId = builtin(0x01, 0x08);
    pub const UINT64_ARRAY: TypeId = builtin(0x01, 0x09);
    pub const FLOAT32_ARRAY: TypeId = builtin(0x01, 0x0A);
    pub const FLOAT64_ARRAY: TypeId = builtin(0x01, 0x0B);
    pub const GUID_ARRAY: TypeId = builtin(0x01, 0x0C);

    pub const STRING: TypeId = builtin(0x02, 0x01);
    pub const STRING_ARRAY: TypeId = builtin(0x02, 0x02);

    /// Dense map.
    pub const MAP: TypeId = builtin(0x03, 0x01);
    pub const MAP8: TypeId = builtin(0x03, 0x02);
    pub const MAP16: TypeId = builtin(0x03, 0x03);
    pub const NAMED_MAP4: TypeId = builtin(0x03, 0x04);
    pub const NAMED_MAP8: TypeId = builtin(0x03, 0x05);
    pub const NAMED_MAP16: TypeId = builtin(0x03, 0x06);
    pub const TOC_MAP: TypeId = builtin(0x03, 0x07);

    pub const GZIP: TypeId = builtin(0x04, 0x01);
}

/// One builtin primitive.
#[derive(Debug, Clone, Copy)]
pub struct Builtin {
    pub id: TypeId,
    pub name: &'static str,
    pub description: &'static str,
    pub is_array: bool,
    pub shape: WireShape,
}

const fn scalar(id: TypeId, name: &'static str, kind: ScalarKind) -> Builtin {
    Builtin {
        id,
        name,
        description: "fixed-width scalar",
        is_array: false,
        shape: WireShape::Scalar(kind),
    }
}

const fn array(id: TypeId, name: &'static str, kind: ScalarKind) -> Builtin {
    Builtin {
        id,
        name,
        description: "count-prefixed array",
        is_array: true,
        shape: WireShape::Array(kind),
    }
}

const fn container(
    id: TypeId,
    name: &'static str,
    description: &'static str,
    shape: WireShape,
) -> Builtin {
    Builtin {
        id,
        name,
        description,
        is_array: false,
        shape,
    }
}

/// All builtin primitives.
pub const BUILTINS: &[Builtin] = &[
    scalar(ids::BOOL, "Bool", ScalarKind::Bool),
    scalar(ids::INT8, "Int8", ScalarKind::I8),
    scalar(ids::UINT8, "UInt8", ScalarKind::U8),
    scalar(ids::INT16, "Int16", ScalarKind::I16),
    scalar(ids::UINT16, "UInt16", ScalarKind::U16),
    scalar(ids::INT32, "Int32", ScalarKind::I32),
    scalar(ids::UINT32, "UInt32", ScalarKind::U32),
    scalar(ids::INT64, "Int64", ScalarKind::I64),
    scalar(ids::UINT64, "UInt64", ScalarKind::U64),
    scalar(ids::FLOAT32, "Float32", ScalarKind::F32),
    scalar(ids::FLOAT64, "Float64", ScalarKind::F64),
    scalar(ids::GUID, "Guid", ScalarKind::Guid),
    array(ids::BOOL_ARRAY, "BoolArray", ScalarKind::Bool),
    array(ids::INT8_ARRAY, "Int8Array", ScalarKind::I8),
    array(ids::UINT8_ARRAY, "UInt8Array", ScalarKind::U8),
    array(ids::INT16_ARRAY, "Int16Array", ScalarKind::I16),
    array(ids::UINT16_ARRAY, "UInt16Array", ScalarKind::U16),
    array(ids::INT32_ARRAY, "Int32Array", ScalarKind::I32),
    array(ids::UINT32_ARRAY, "UInt32Array", ScalarKind::U32),
    array(ids::INT64_ARRAY, "Int64Array", ScalarKind::I64),
    array(ids::UINT64_ARRAY, "UInt64Array", ScalarKind::U64),
    array(ids::FLOAT32_ARRAY, "Float32Array", ScalarKind::F32),
    array(ids::FLOAT64_ARRAY, "Float64Array", ScalarKind::F64),
    array(ids::GUID_ARRAY, "GuidArray", ScalarKind::Guid),
    container(ids::STRING, "String", "UTF8 string", WireShape::String),
    Builtin {
        id: ids::STRING_ARRAY,
        name: "StringArray",
        description: "count-prefixed string array",
        is_array: true,
        shape: WireShape::StringArray,
    },
    container(ids::MAP, "Map", "dense map", WireShape::DenseMap),
    container(
        ids::MAP8,
        "Map8",
        "8-byte aligned map",
        WireShape::AlignedMap(Alignment::Eight),
    ),
    container(
        ids::MAP16,
        "Map16",
        "16-byte aligned map",
        WireShape::AlignedMap(Alignment::Sixteen),
    ),
    container(
        ids::NAMED_MAP4,
        "NamedMap4",
        "4-byte aligned named map",
        WireShape::NamedMap(Alignment::Four),
    ),
    container(
        ids::NAMED_MAP8,
        "NamedMap8",
        "8-byte aligned named map",
        WireShape::NamedMap(Alignment::Eight),
    ),
    container(
        ids::NAMED_MAP16,
        "NamedMap16",
        "16-byte aligned named map",
        WireShape::NamedMap(Alignment::Sixteen),
    ),
    container(ids::TOC_MAP, "TocMap", "TOC-indexed map", WireShape::TocMap),
    container(ids::GZIP, "Gzip", "gzip envelope", WireShape::GzipEnvelope),
];

/// Define every builtin primitive in `registry` and bind its wire shape.
pub fn register(registry: &TypeRegistry) -> CodecResult<()> {
    for builtin in BUILTINS {
        registry.define(
            builtin.id,
            builtin.name,
            builtin.description,
            TypeId::UNIT,
            builtin.is_array,
        )?;
        registry.bind(builtin.id, builtin.shape)?;
    }
    log::debug!("[builtin] registered {} primitives", BUILTINS.len());
    Ok(())
}

/// Builtin entry for a primitive id, if any.
pub fn lookup(id: TypeId) -> Option<&'static Builtin> {
    BUILTINS.iter().find(|builtin| builtin.id == id)
}
