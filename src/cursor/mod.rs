//! Cursor module
//!
//! Opaque cursor tokens for keyset pagination.
//!
//! # Overview
//!
//! A cursor names the pagination-key value of a boundary row. The token is
//! the base64 encoding of a compact, versioned JSON document:
//!
//! ```text
//! {"v":1,"k":{"id":10}}  →  eyJ2IjoxLCJrIjp7ImlkIjoxMH19
//! ```
//!
//! Decoding is the exact structural inverse of encoding. Tokens that are not
//! valid base64, not valid JSON, carry an unknown version, or name more than
//! one key are rejected.

mod codec;

pub use codec::{decode_cursor, encode_cursor, Cursor, CURSOR_VERSION};
