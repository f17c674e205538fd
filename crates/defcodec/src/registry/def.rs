// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type definition record.

use crate::id::TypeId;
use std::fmt;

/// A registered type definition.
///
/// Created once by [`TypeRegistry::define`](super::TypeRegistry::define) and
/// immutable afterwards; shared as `Arc<Def>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Def {
    id: TypeId,
    name: String,
    description: String,
    underlying_type: TypeId,
    is_array: bool,
}

impl Def {
    pub(crate) fn new(
        id: TypeId,
        name: String,
        description: String,
        underlying_type: TypeId,
        is_array: bool,
    ) -> Self {
        Self {
            id,
            name,
            description,
            underlying_type,
            is_array,
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Display name (diagnostic only).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Description (diagnostic only).
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Next link in the resolution chain; `TypeId::UNIT` for primitives.
    pub fn underlying_type(&self) -> TypeId {
        self.underlying_type
    }

    /// Informational; decoding never depends on it.
    pub fn is_array(&self) -> bool {
        self.is_array
    }

    /// True when this Def is itself a primitive wire shape.
    pub fn is_primitive(&self) -> bool {
        self.underlying_type.is_unit()
    }

    pub(crate) fn same_shape(&self, underlying_type: TypeId, is_array: bool) -> bool {
        self.underlying_type == underlying_type && self.is_array == is_array
    }
}

impl fmt::Display for Def {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {{{}}}", self.name, self.id)
    }
}
