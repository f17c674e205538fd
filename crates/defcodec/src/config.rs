// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Codec configuration.
//!
//! A [`CodecConfig`] is fixed when the registry is sealed into a
//! [`Catalog`](crate::Catalog) and applies to every call made through it.

use flate2::Compression;

/// Default gzip level for envelopes.
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 6;

/// Default cap on a single length-prefixed payload (1 GiB).
pub const DEFAULT_MAX_PAYLOAD_BYTES: u64 = 1 << 30;

/// Default hop limit when following underlying-type links.
pub const DEFAULT_MAX_TYPE_CHAIN: usize = 64;

/// Default limit on container/envelope nesting.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// What to do when a top-level leading id is not in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UnknownIdPolicy {
    /// Fail with `UnknownTypeId`.
    #[default]
    Fail,
    /// Rewind over the 16 bytes and decode the payload as a generic dense map.
    /// Reads files written by old producers that emitted untagged maps.
    LegacyDenseMap,
}

/// Codec configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CodecConfig {
    /// Policy for unrecognized leading ids.
    pub unknown_id_policy: UnknownIdPolicy,

    /// Gzip level for envelopes (0-9).
    pub compression_level: u32,

    /// Upper bound on any single declared payload, checked before allocating.
    pub max_payload_bytes: u64,

    /// Hop limit for underlying-type resolution (guards against cycles).
    pub max_type_chain: usize,

    /// Maximum nesting of maps and envelopes.
    pub max_depth: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            unknown_id_policy: UnknownIdPolicy::Fail,
            compression_level: DEFAULT_COMPRESSION_LEVEL,
            max_payload_bytes: DEFAULT_MAX_PAYLOAD_BYTES,
            max_type_chain: DEFAULT_MAX_TYPE_CHAIN,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl CodecConfig {
    /// Create a new config builder
    pub fn builder() -> CodecConfigBuilder {
        CodecConfigBuilder::default()
    }

    pub(crate) fn compression(&self) -> Compression {
        Compression::new(self.compression_level.min(9))
    }
}

/// Config builder for fluent API
#[derive(Debug, Default)]
pub struct CodecConfigBuilder {
    unknown_id_policy: Option<UnknownIdPolicy>,
    compression_level: Option<u32>,
    max_payload_bytes: Option<u64>,
    max_type_chain: Option<usize>,
    max_depth: Option<usize>,
}

impl CodecConfigBuilder {
    pub fn unknown_id_policy(mut self, policy: UnknownIdPolicy) -> Self {
        self.unknown_id_policy = Some(policy);
        self
    }

    /// Gzip level, clamped to 0-9.
    pub fn compression_level(mut self, level: u32) -> Self {
        self.compression_level = Some(level.min(9));
        self
    }

    pub fn max_payload_bytes(mut self, bytes: u64) -> Self {
        self.max_payload_bytes = Some(bytes);
        self
    }

    pub fn max_type_chain(mut self, hops: usize) -> Self {
        self.max_type_chain = Some(hops.max(1));
        self
    }

    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth.max(1));
        self
    }

    pub fn build(self) -> CodecConfig {
        let default = CodecConfig::default();
        CodecConfig {
            unknown_id_policy: self.unknown_id_policy.unwrap_or(default.unknown_id_policy),
            compression_level: self.compression_level.unwrap_or(default.compression_level),
            max_payload_bytes: self.max_payload_bytes.unwrap_or(default.max_payload_bytes),
            max_type_chain: self.max_type_chain.unwrap_or(default.max_type_chain),
            max_depth: self.max_depth.unwrap_or(default.max_depth),
        }
    }
}
