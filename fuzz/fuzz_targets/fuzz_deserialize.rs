// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use defcodec::{CodecConfig, StreamSource, TypeRegistry, UnknownIdPolicy};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(registry) = TypeRegistry::with_builtins() else {
        return;
    };
    let catalog = registry.seal(
        CodecConfig::builder()
            .unknown_id_policy(UnknownIdPolicy::LegacyDenseMap)
            .max_payload_bytes(1 << 20)
            .max_depth(32)
            .build(),
    );

    // Seekable path
    let _ = catalog.deserialize(data);

    // Forward-only path
    let _ = catalog.deserialize_from(&mut StreamSource::new(data));
});
