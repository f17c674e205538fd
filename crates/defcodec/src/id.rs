// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! 128-bit type identifiers.
//!
//! Every value on the wire is tagged with the [`TypeId`] of its Def. The wire
//! form is 16 bytes in the mixed-endian GUID layout: the first three groups
//! (`u32`, `u16`, `u16`) little-endian, the trailing eight bytes verbatim.

use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Size of a [`TypeId`] on the wire.
pub const TYPE_ID_SIZE: usize = 16;

/// Globally unique identifier of a Def.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TypeId(Uuid);

impl TypeId {
    /// Sentinel meaning "no underlying type": a Def whose underlying type is
    /// `UNIT` is itself a primitive wire shape.
    pub const UNIT: TypeId = TypeId(Uuid::nil());

    pub const fn from_u128(value: u128) -> Self {
        Self(Uuid::from_u128(value))
    }

    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    pub fn is_unit(&self) -> bool {
        self.0.is_nil()
    }

    /// Encode to the 16-byte wire layout.
    pub fn to_wire(&self) -> [u8; TYPE_ID_SIZE] {
        self.0.to_bytes_le()
    }

    /// Decode from the 16-byte wire layout.
    pub fn from_wire(bytes: [u8; TYPE_ID_SIZE]) -> Self {
        Self(Uuid::from_bytes_le(bytes))
    }
}

impl From<Uuid> for TypeId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<TypeId> for Uuid {
    fn from(id: TypeId) -> Self {
        id.0
    }
}

impl FromStr for TypeId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl fmt::Debug for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeId({})", self.0.hyphenated())
    }
}
