// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use defcodec::{Catalog, TocIndex};
use libfuzzer_sys::fuzz_target;
use std::io::Cursor;

fuzz_target!(|data: &[u8]| {
    let Ok(catalog) = Catalog::builtin() else {
        return;
    };

    // Parse a bare header + table, then decode whatever it points at.
    let mut source = Cursor::new(data);
    if let Ok(index) = TocIndex::read(&catalog, &mut source) {
        for record in index.entries() {
            let _ = index.decode_child(&catalog, &mut source, record.id);
        }
        let _ = index.skip_past(&mut source);
    }
});
