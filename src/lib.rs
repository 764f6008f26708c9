//! Purpose: Library crate backing the `spiral-query` CLI and any embedding sketch host.
//! Exports: `api` (public surface), `core` (codec internals), `sketch` (spiral configuration).
//! Role: Typed URL query-string codec plus the spiral sketch's share-link contract.
//! Invariants: Parsing is best-effort and never fails; bad tokens degrade to strings or drop.
//! Invariants: Core modules take explicit inputs (no ambient page location or globals).
pub mod api;
pub mod core;
pub mod sketch;
