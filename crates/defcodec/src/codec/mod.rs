// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Encoders and decoders.
//!
//! ```text
//!   Catalog::encode(sink, def, value)
//!     -> primitive_type(def)          underlying-type chain, cached at seal
//!     -> DispatchTable::encoder(id)   WireShape
//!     -> match shape { Scalar | Array | String | .. | TocMap | GzipEnvelope }
//!          containers recurse through Catalog::encode_entry
//! ```
//!
//! Submodules hold one wire family each; [`dispatch`] ties them together.

pub(crate) mod dispatch;
pub(crate) mod envelope;
pub(crate) mod map;
pub(crate) mod primitive;
pub mod toc;

use crate::id::TypeId;
use crate::registry::DefTable;
use crate::shape::WireShape;
use std::collections::HashMap;

/// Encode and decode shape bindings, keyed by primitive id, plus the
/// `def id -> primitive id` resolution computed once at seal time.
#[derive(Debug, Default)]
pub(crate) struct DispatchTable {
    encoders: HashMap<TypeId, WireShape>,
    decoders: HashMap<TypeId, WireShape>,
    resolved: HashMap<TypeId, TypeId>,
}

impl DispatchTable {
    /// Build from the registry bindings. Defs whose chain does not resolve are
    /// left out of the cache and fail lazily when used.
    pub(crate) fn build(
        table: &DefTable,
        encoders: HashMap<TypeId, WireShape>,
        decoders: HashMap<TypeId, WireShape>,
        max_hops: usize,
    ) -> Self {
        let mut resolved = HashMap::with_capacity(table.len());
        for (id, def) in table.ids() {
            match table.primitive_type(def, max_hops) {
                Ok(primitive) => {
                    resolved.insert(id, primitive);
                }
                Err(err) => {
                    log::debug!("[dispatch] {} left unresolved: {}", def, err);
                }
            }
        }
        Self {
            encoders,
            decoders,
            resolved,
        }
    }

    pub(crate) fn encoder(&self, primitive: TypeId) -> Option<WireShape> {
        self.encoders.get(&primitive).copied()
    }

    pub(crate) fn decoder(&self, primitive: TypeId) -> Option<WireShape> {
        self.decoders.get(&primitive).copied()
    }

    /// Cached primitive id for a Def id (or alias id).
    pub(crate) fn resolved(&self, id: TypeId) -> Option<TypeId> {
        self.resolved.get(&id).copied()
    }

    pub(crate) fn encoder_count(&self) -> usize {
        self.encoders.len()
    }

    pub(crate) fn decoder_count(&self) -> usize {
        self.decoders.len()
    }
}
