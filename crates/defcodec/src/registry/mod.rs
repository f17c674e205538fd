// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type registry: Def catalog, alias remapping and wire-shape bindings.
//!
//! The registry is an explicit object. It is populated during startup
//! (`define`, `add_alias`, `bind`), all mutation going through one lock, and
//! is then consumed by [`TypeRegistry::seal`], which produces an immutable
//! [`Catalog`] that encoders and decoders read without locking.
//!
//! ```text
//!   TypeRegistry (Mutex)            Catalog (Arc, read-only)
//!   +---------------------+  seal  +-------------------------+
//!   | defs / aliases      | -----> | DefTable                |
//!   | encoder bindings    |        | DispatchTable           |
//!   | decoder bindings    |        | CodecConfig             |
//!   +---------------------+        +-------------------------+
//! ```

mod catalog;
mod def;

pub use catalog::Catalog;
pub use def::Def;

use crate::codec::DispatchTable;
use crate::config::{CodecConfig, DEFAULT_MAX_TYPE_CHAIN};
use crate::error::{CodecError, CodecResult};
use crate::id::TypeId;
use crate::shape::{ScalarKind, WireShape};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Id -> Def lookup with alias fallback.
#[derive(Debug, Default, Clone)]
pub(crate) struct DefTable {
    defs: HashMap<TypeId, Arc<Def>>,
    aliases: HashMap<TypeId, Arc<Def>>,
}

impl DefTable {
    pub(crate) fn try_get(&self, id: TypeId) -> Option<&Arc<Def>> {
        self.defs.get(&id).or_else(|| self.aliases.get(&id))
    }

    pub(crate) fn get(&self, id: TypeId) -> CodecResult<Arc<Def>> {
        self.try_get(id)
            .cloned()
            .ok_or(CodecError::UnknownTypeId(id))
    }

    /// Follow `underlying_type` links until the Unit sentinel.
    pub(crate) fn primitive_type(&self, def: &Def, max_hops: usize) -> CodecResult<TypeId> {
        if def.is_primitive() {
            return Ok(def.id());
        }
        let mut link = def.underlying_type();
        for _ in 0..max_hops {
            let next = self.try_get(link).ok_or(CodecError::UnknownTypeId(link))?;
            if next.is_primitive() {
                return Ok(next.id());
            }
            link = next.underlying_type();
        }
        // Chain longer than the hop limit: treat as a cycle.
        Err(CodecError::UnknownTypeId(link))
    }

    pub(crate) fn len(&self) -> usize {
        self.defs.len()
    }

    pub(crate) fn defs(&self) -> impl Iterator<Item = &Arc<Def>> {
        self.defs.values()
    }

    pub(crate) fn ids(&self) -> impl Iterator<Item = (TypeId, &Arc<Def>)> {
        self.defs
            .iter()
            .chain(self.aliases.iter())
            .map(|(id, def)| (*id, def))
    }
}

#[derive(Debug, Default)]
struct RegistryState {
    table: DefTable,
    encoders: HashMap<TypeId, WireShape>,
    decoders: HashMap<TypeId, WireShape>,
}

/// Mutable type catalog used during initialization.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    state: Mutex<RegistryState>,
}

impl TypeRegistry {
    /// Empty registry (no builtin primitives).
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with the builtin primitive Defs and their shapes.
    pub fn with_builtins() -> CodecResult<Self> {
        let registry = Self::new();
        crate::builtin::register(&registry)?;
        Ok(registry)
    }

    /// Register a Def.
    ///
    /// Re-registering an id with the same `(underlying_type, is_array)` returns
    /// the existing Def; any other shape fails with `ConflictingDefinition`.
    pub fn define(
        &self,
        id: TypeId,
        name: impl Into<String>,
        description: impl Into<String>,
        underlying_type: TypeId,
        is_array: bool,
    ) -> CodecResult<Arc<Def>> {
        if id.is_unit() {
            return Err(CodecError::ReservedTypeId(id));
        }

        let mut state = self.state.lock();
        if let Some(existing) = state.table.defs.get(&id) {
            if existing.same_shape(underlying_type, is_array) {
                return Ok(Arc::clone(existing));
            }
            return Err(CodecError::ConflictingDefinition {
                id,
                existing_underlying: existing.underlying_type(),
                existing_is_array: existing.is_array(),
                underlying: underlying_type,
                is_array,
            });
        }

        let def = Arc::new(Def::new(
            id,
            name.into(),
            description.into(),
            underlying_type,
            is_array,
        ));
        log::debug!("[registry] defined {} -> {}", def, underlying_type);
        state.table.defs.insert(id, Arc::clone(&def));
        Ok(def)
    }

    /// Bind `alias_id` to an existing Def, replacing any previous binding.
    pub fn add_alias(&self, alias_id: TypeId, target: &Arc<Def>) {
        let mut state = self.state.lock();
        if let Some(previous) = state.table.aliases.insert(alias_id, Arc::clone(target)) {
            if previous.id() != target.id() {
                log::warn!(
                    "[registry] alias {} rebound from {} to {}",
                    alias_id,
                    previous,
                    target
                );
            }
        }
    }

    pub fn get(&self, id: TypeId) -> CodecResult<Arc<Def>> {
        self.state.lock().table.get(id)
    }

    pub fn try_get(&self, id: TypeId) -> Option<Arc<Def>> {
        self.state.lock().table.try_get(id).cloned()
    }

    pub fn primitive_type(&self, def: &Def) -> CodecResult<TypeId> {
        self.state
            .lock()
            .table
            .primitive_type(def, DEFAULT_MAX_TYPE_CHAIN)
    }

    /// Bind a wire shape to a primitive id for both encoding and decoding.
    pub fn bind(&self, primitive: TypeId, shape: WireShape) -> CodecResult<()> {
        check_shape(shape)?;
        let mut state = self.state.lock();
        state.table.get(primitive)?;
        state.encoders.insert(primitive, shape);
        state.decoders.insert(primitive, shape);
        Ok(())
    }

    /// Bind a wire shape for encoding only.
    pub fn bind_encoder(&self, primitive: TypeId, shape: WireShape) -> CodecResult<()> {
        check_shape(shape)?;
        let mut state = self.state.lock();
        state.table.get(primitive)?;
        state.encoders.insert(primitive, shape);
        Ok(())
    }

    /// Bind a wire shape for decoding only.
    pub fn bind_decoder(&self, primitive: TypeId, shape: WireShape) -> CodecResult<()> {
        check_shape(shape)?;
        let mut state = self.state.lock();
        state.table.get(primitive)?;
        state.decoders.insert(primitive, shape);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.state.lock().table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Freeze the registry and build the dispatch table.
    pub fn seal(self, config: CodecConfig) -> Catalog {
        let state = self.state.into_inner();
        let dispatch = DispatchTable::build(
            &state.table,
            state.encoders,
            state.decoders,
            config.max_type_chain,
        );
        log::debug!(
            "[registry] sealed {} defs, {} encoders, {} decoders",
            state.table.len(),
            dispatch.encoder_count(),
            dispatch.decoder_count()
        );
        Catalog::new(state.table, dispatch, config)
    }
}

/// Blob shapes need a nonzero width.
fn check_shape(shape: WireShape) -> CodecResult<()> {
    match shape {
        WireShape::Scalar(ScalarKind::Blob(0)) | WireShape::Array(ScalarKind::Blob(0)) => {
            Err(CodecError::InvalidLength {
                what: "blob width",
                len: 0,
            })
        }
        _ => Ok(()),
    }
}
