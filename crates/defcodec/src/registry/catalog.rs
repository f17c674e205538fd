// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Sealed, read-only type catalog.

use super::{Def, DefTable, TypeRegistry};
use crate::codec::DispatchTable;
use crate::config::CodecConfig;
use crate::error::CodecResult;
use crate::id::TypeId;
use std::fmt;
use std::sync::Arc;

/// Immutable catalog produced by [`TypeRegistry::seal`].
///
/// Cheap to clone and safe to share across threads; every encode/decode entry
/// point hangs off this type. Concurrent calls only need distinct sinks and
/// sources.
#[derive(Clone)]
pub struct Catalog {
    inner: Arc<CatalogInner>,
}

struct CatalogInner {
    table: DefTable,
    dispatch: DispatchTable,
    config: CodecConfig,
}

impl Catalog {
    pub(crate) fn new(table: DefTable, dispatch: DispatchTable, config: CodecConfig) -> Self {
        Self {
            inner: Arc::new(CatalogInner {
                table,
                dispatch,
                config,
            }),
        }
    }

    /// Builtin primitives only, default configuration.
    pub fn builtin() -> CodecResult<Self> {
        Ok(TypeRegistry::with_builtins()?.seal(CodecConfig::default()))
    }

    pub fn get(&self, id: TypeId) -> CodecResult<Arc<Def>> {
        self.inner.table.get(id)
    }

    pub fn try_get(&self, id: TypeId) -> Option<Arc<Def>> {
        self.inner.table.try_get(id).cloned()
    }

    /// Primitive wire-shape id selected for `def`.
    pub fn primitive_type(&self, def: &Def) -> CodecResult<TypeId> {
        if let Some(primitive) = self.inner.dispatch.resolved(def.id()) {
            return Ok(primitive);
        }
        self.inner
            .table
            .primitive_type(def, self.inner.config.max_type_chain)
    }

    pub fn config(&self) -> &CodecConfig {
        &self.inner.config
    }

    /// All registered Defs (aliases excluded), in no particular order.
    pub fn defs(&self) -> impl Iterator<Item = &Arc<Def>> {
        self.inner.table.defs()
    }

    pub fn len(&self) -> usize {
        self.inner.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn dispatch(&self) -> &DispatchTable {
        &self.inner.dispatch
    }
}

impl fmt::Debug for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Catalog")
            .field("defs", &self.inner.table.len())
            .field("encoders", &self.inner.dispatch.encoder_count())
            .field("decoders", &self.inner.dispatch.decoder_count())
            .field("config", &self.inner.config)
            .finish()
    }
}
