// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Self-describing binary codec.
//!
//! Every value on the wire is tagged with the 128-bit id of its Def. The id is
//! resolved at runtime, through the Def's underlying-type chain, to one of a
//! closed set of wire shapes: scalars, arrays, strings, four map layouts and a
//! gzip envelope. Producers and consumers only need to agree on the catalog,
//! not on a compiled schema.
//!
//! # Quick Start
//!
//! ```
//! use defcodec::builtin::ids;
//! use defcodec::{CodecConfig, ItemMap, TypeId, TypeRegistry, Value};
//!
//! # fn main() -> defcodec::CodecResult<()> {
//! let registry = TypeRegistry::with_builtins()?;
//! let temperature = registry.define(
//!     TypeId::from_u128(0x7E4F),
//!     "Temperature",
//!     "degrees Celsius",
//!     ids::FLOAT64,
//!     false,
//! )?;
//! let catalog = registry.seal(CodecConfig::default());
//!
//! let mut node = ItemMap::new();
//! node.insert(temperature, 21.5f64);
//! let toc = catalog.get(ids::TOC_MAP)?;
//!
//! let bytes = catalog.serialize(&toc, &Value::from(node.clone()))?;
//! let item = catalog.deserialize(&bytes)?;
//! assert_eq!(item.value, Value::from(node));
//! # Ok(())
//! # }
//! ```
//!
//! # Layouts
//!
//! | Shape | Wire layout |
//! |-------|-------------|
//! | Scalar | raw little-endian bytes |
//! | Array | `i32 count` + elements |
//! | String | `i32 count` + UTF8 |
//! | Dense map | `i32 count` + (`16B id` + value)* |
//! | Aligned map | dense map padded to N after the count and each entry |
//! | Named map | aligned map whose entries start with a name |
//! | TOC map | header + (`16B id` + `i64 offset`)* + 16-aligned values |
//! | Gzip | `i32 raw len` + `i32 packed len` + gzip(`16B id` + value) |
//! | Top level | `16B id` + value |

pub mod builtin;
pub mod codec;
pub mod config;
pub mod error;
pub mod id;
pub mod registry;
pub mod shape;
pub mod stream;
pub mod value;

mod facade;

pub use codec::toc::{TocHeader, TocIndex, TocRecord};
pub use config::{CodecConfig, CodecConfigBuilder, UnknownIdPolicy};
pub use error::{CodecError, CodecResult};
pub use id::{TypeId, TYPE_ID_SIZE};
pub use registry::{Catalog, Def, TypeRegistry};
pub use shape::{Alignment, ScalarKind, WireShape};
pub use stream::{
    ByteSink, ByteSource, ScratchSink, SeekSink, SeekSource, StreamSink, StreamSource,
};
pub use value::{Array, FromValue, Item, ItemMap, NamedEntry, NamedMap, Scalar, Value};
