//! # Core Protocol Components
//!
//! Low-level wire primitives that every packet codec is built on.
//!
//! ## Components
//! - **Binary**: cursor reader and growable writer for varints, little-endian
//!   floats, length-prefixed strings and vectors
//! - **Math**: the `Vec3`/`Vec2` values those vectors decode into
//!
//! ## Safety
//! - Reads are bounds-checked; a short buffer is an error, never a panic
//! - Varints are capped at 5 (32-bit) or 10 (64-bit) bytes
//! - Strings must be valid UTF-8

pub mod binary;
pub mod math;
