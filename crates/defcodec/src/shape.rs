// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Wire shapes: the closed set of byte layouts an encoder/decoder pair implements.

use std::fmt;

/// Fixed-width element kinds used by scalars and arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Bool,
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    F32,
    F64,
    /// 128-bit identifier in the mixed-endian wire layout.
    Guid,
    /// Opaque blittable record of the given byte width (vectors, colors,
    /// boxes and other fixed-size catalog types).
    Blob(usize),
}

impl ScalarKind {
    /// Encoded size of one element in bytes.
    pub const fn size(self) -> usize {
        match self {
            Self::Bool | Self::I8 | Self::U8 => 1,
            Self::I16 | Self::U16 => 2,
            Self::I32 | Self::U32 | Self::F32 => 4,
            Self::I64 | Self::U64 | Self::F64 => 8,
            Self::Guid => 16,
            Self::Blob(width) => width,
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => f.write_str("bool"),
            Self::I8 => f.write_str("i8"),
            Self::U8 => f.write_str("u8"),
            Self::I16 => f.write_str("i16"),
            Self::U16 => f.write_str("u16"),
            Self::I32 => f.write_str("i32"),
            Self::U32 => f.write_str("u32"),
            Self::I64 => f.write_str("i64"),
            Self::U64 => f.write_str("u64"),
            Self::F32 => f.write_str("f32"),
            Self::F64 => f.write_str("f64"),
            Self::Guid => f.write_str("guid"),
            Self::Blob(width) => write!(f, "blob{}", width),
        }
    }
}

/// Padding boundary for aligned and named maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Alignment {
    Four,
    Eight,
    Sixteen,
}

impl Alignment {
    pub const fn bytes(self) -> u64 {
        match self {
            Self::Four => 4,
            Self::Eight => 8,
            Self::Sixteen => 16,
        }
    }

    pub fn from_bytes(bytes: u64) -> Option<Self> {
        match bytes {
            4 => Some(Self::Four),
            8 => Some(Self::Eight),
            16 => Some(Self::Sixteen),
            _ => None,
        }
    }
}

/// Byte layout bound to a primitive type id.
///
/// Many semantic Defs share one wire shape: a Def resolves to its shape through
/// its underlying-type chain, never through its own id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WireShape {
    /// Raw little-endian bytes of one element.
    Scalar(ScalarKind),
    /// `i32 count` + `count` contiguous elements.
    Array(ScalarKind),
    /// Count-prefixed UTF8 bytes.
    String,
    /// `i32 count` + `count` strings.
    StringArray,
    /// `i32 count` + tagged entries, no padding.
    DenseMap,
    /// Dense map with zero padding after the count and after every entry.
    AlignedMap(Alignment),
    /// Aligned map whose entries carry a name before the tag.
    NamedMap(Alignment),
    /// Header + table of contents + 16-byte aligned entries.
    TocMap,
    /// Length-prefixed gzip block around one tagged entry.
    GzipEnvelope,
}

impl WireShape {
    /// Name of the [`Value`](crate::Value) variant this shape carries, as
    /// reported by `Value::describe`.
    pub fn value_kind(self) -> &'static str {
        match self {
            Self::Scalar(_) => "scalar",
            Self::Array(_) => "array",
            Self::String => "string",
            Self::StringArray => "string array",
            Self::DenseMap | Self::AlignedMap(_) | Self::TocMap => "map",
            Self::NamedMap(_) => "named map",
            Self::GzipEnvelope => "envelope",
        }
    }
}

impl fmt::Display for WireShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(kind) => write!(f, "scalar<{}>", kind),
            Self::Array(kind) => write!(f, "array<{}>", kind),
            Self::String => f.write_str("string"),
            Self::StringArray => f.write_str("string[]"),
            Self::DenseMap => f.write_str("map"),
            Self::AlignedMap(align) => write!(f, "map{}", align.bytes()),
            Self::NamedMap(align) => write!(f, "named-map{}", align.bytes()),
            Self::TocMap => f.write_str("toc-map"),
            Self::GzipEnvelope => f.write_str("gzip"),
        }
    }
}
