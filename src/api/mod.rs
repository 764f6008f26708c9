//! Purpose: Define the stable public Rust API boundary for spiral-query.
//! Exports: Codec, value, location and error types needed by the CLI and embedders.
//! Role: Public, additive-only surface over the `core` modules.
//! Invariants: Callers never need to reach into `core` paths directly.

#[doc(hidden)]
pub use crate::core::error::to_exit_code;
pub use crate::core::codec::{HTML_SEPARATOR, QueryCodec};
pub use crate::core::encoding::{decode_component, encode_component};
pub use crate::core::error::{Error, ErrorKind};
pub use crate::core::grammar::{BoolCase, ParseOptions};
pub use crate::core::location::{CurrentLocation, EnvLocation, Href, QUERY_STRING_VAR};
pub use crate::core::value::Value;
pub use crate::sketch::SketchParams;
