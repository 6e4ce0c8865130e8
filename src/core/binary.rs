//! # Binary Primitive Codec
//!
//! Cursor-based reader and growable writer for the client protocol's
//! low-level wire types.
//!
//! ## Encodings
//! ```text
//! unsigned varint   7 payload bits per byte, high bit = continuation (max 5 bytes)
//! unsigned varlong  same, 64-bit (max 10 bytes)
//! signed varint     zig-zag mapped, then unsigned varint
//! LFloat / LInt     32-bit little-endian
//! string            unsigned varint byte length + UTF-8 payload
//! vec3              three LFloats
//! entity runtime id unsigned varlong
//! ```
//!
//! Reading never panics: running off the end of the buffer, an overlong
//! varint and a non-UTF-8 string all come back as [`DecodeError`]. Writing
//! cannot fail because the writer owns its buffer.

use crate::core::math::Vec3;
use crate::error::{DecodeError, DecodeResult};
use bytes::{Buf, BufMut, Bytes, BytesMut};

/// Segment bits mask (lower 7 bits).
const SEGMENT_BITS: u8 = 0x7F;

/// Continue bit (high bit).
const CONTINUE_BIT: u8 = 0x80;

/// Maximum encoded length of a 32-bit varint.
pub const MAX_VARINT_LEN: usize = 5;

/// Maximum encoded length of a 64-bit varint.
pub const MAX_VARLONG_LEN: usize = 10;

/// Zig-zag map a signed 32-bit value onto an unsigned one.
#[inline]
pub const fn zigzag_encode_32(value: i32) -> u32 {
    ((value << 1) ^ (value >> 31)) as u32
}

/// Inverse of [`zigzag_encode_32`].
#[inline]
pub const fn zigzag_decode_32(value: u32) -> i32 {
    ((value >> 1) as i32) ^ -((value & 1) as i32)
}

/// Zig-zag map a signed 64-bit value onto an unsigned one.
#[inline]
pub const fn zigzag_encode_64(value: i64) -> u64 {
    ((value << 1) ^ (value >> 63)) as u64
}

/// Inverse of [`zigzag_encode_64`].
#[inline]
pub const fn zigzag_decode_64(value: u64) -> i64 {
    ((value >> 1) as i64) ^ -((value & 1) as i64)
}

/// Number of bytes an unsigned varint encoding of `value` occupies.
#[must_use]
pub const fn varint_len(value: u64) -> usize {
    if value == 0 {
        return 1;
    }
    let bits_needed = 64 - value.leading_zeros() as usize;
    bits_needed.div_ceil(7)
}

/// Read cursor over a complete packet payload.
#[derive(Debug)]
pub struct BinaryReader<'a> {
    buf: &'a [u8],
}

impl<'a> BinaryReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf }
    }

    /// Bytes not yet consumed.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.buf.len()
    }

    /// Fail unless the whole payload was consumed.
    pub fn finish(&self, packet: &'static str) -> DecodeResult<()> {
        if self.buf.is_empty() {
            Ok(())
        } else {
            Err(DecodeError::TrailingBytes {
                packet,
                remaining: self.buf.len(),
            })
        }
    }

    #[inline]
    fn ensure(&self, needed: usize) -> DecodeResult<()> {
        if self.buf.len() < needed {
            return Err(DecodeError::Truncated {
                needed,
                remaining: self.buf.len(),
            });
        }
        Ok(())
    }

    pub fn get_byte(&mut self) -> DecodeResult<u8> {
        self.ensure(1)?;
        Ok(self.buf.get_u8())
    }

    pub fn get_bool(&mut self) -> DecodeResult<bool> {
        Ok(self.get_byte()? != 0)
    }

    pub fn get_lint(&mut self) -> DecodeResult<i32> {
        self.ensure(4)?;
        Ok(self.buf.get_i32_le())
    }

    pub fn get_lfloat(&mut self) -> DecodeResult<f32> {
        self.ensure(4)?;
        Ok(self.buf.get_f32_le())
    }

    pub fn get_unsigned_varint(&mut self) -> DecodeResult<u32> {
        let mut value: u32 = 0;
        for i in 0..MAX_VARINT_LEN {
            let byte = self.get_byte()?;
            value |= u32::from(byte & SEGMENT_BITS) << (7 * i);
            if byte & CONTINUE_BIT == 0 {
                return Ok(value);
            }
        }
        Err(DecodeError::VarIntTooLong)
    }

    pub fn get_unsigned_varlong(&mut self) -> DecodeResult<u64> {
        let mut value: u64 = 0;
        for i in 0..MAX_VARLONG_LEN {
            let byte = self.get_byte()?;
            value |= u64::from(byte & SEGMENT_BITS) << (7 * i);
            if byte & CONTINUE_BIT == 0 {
                return Ok(value);
            }
        }
        Err(DecodeError::VarLongTooLong)
    }

    pub fn get_varint(&mut self) -> DecodeResult<i32> {
        Ok(zigzag_decode_32(self.get_unsigned_varint()?))
    }

    pub fn get_varlong(&mut self) -> DecodeResult<i64> {
        Ok(zigzag_decode_64(self.get_unsigned_varlong()?))
    }

    pub fn get_entity_runtime_id(&mut self) -> DecodeResult<u64> {
        self.get_unsigned_varlong()
    }

    pub fn get_string(&mut self) -> DecodeResult<String> {
        let len = self.get_unsigned_varint()? as usize;
        self.ensure(len)?;
        let (raw, rest) = self.buf.split_at(len);
        let text = std::str::from_utf8(raw).map_err(|_| DecodeError::InvalidUtf8)?;
        self.buf = rest;
        Ok(text.to_owned())
    }

    /// Read a string and reject it if its byte length exceeds `max`.
    pub fn get_bounded_string(&mut self, field: &'static str, max: usize) -> DecodeResult<String> {
        let text = self.get_string()?;
        if text.len() > max {
            return Err(DecodeError::StringTooLong {
                field,
                len: text.len(),
                max,
            });
        }
        Ok(text)
    }

    pub fn get_vec3(&mut self) -> DecodeResult<Vec3> {
        self.ensure(12)?;
        let x = self.buf.get_f32_le();
        let y = self.buf.get_f32_le();
        let z = self.buf.get_f32_le();
        Ok(Vec3::new(x, y, z))
    }
}

/// Growable output buffer.
#[derive(Debug, Default)]
pub struct BinaryWriter {
    buf: BytesMut,
}

impl BinaryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_bytes(self) -> Bytes {
        self.buf.freeze()
    }

    pub fn put_byte(&mut self, value: u8) {
        self.buf.put_u8(value);
    }

    pub fn put_bool(&mut self, value: bool) {
        self.buf.put_u8(u8::from(value));
    }

    pub fn put_lint(&mut self, value: i32) {
        self.buf.put_i32_le(value);
    }

    pub fn put_lfloat(&mut self, value: f32) {
        self.buf.put_f32_le(value);
    }

    pub fn put_unsigned_varint(&mut self, value: u32) {
        self.put_unsigned_varlong(u64::from(value));
    }

    #[allow(clippy::cast_possible_truncation)]
    pub fn put_unsigned_varlong(&mut self, mut value: u64) {
        loop {
            let byte = (value & u64::from(SEGMENT_BITS)) as u8;
            value >>= 7;
            if value == 0 {
                self.buf.put_u8(byte);
                return;
            }
            self.buf.put_u8(byte | CONTINUE_BIT);
        }
    }

    pub fn put_varint(&mut self, value: i32) {
        self.put_unsigned_varint(zigzag_encode_32(value));
    }

    pub fn put_varlong(&mut self, value: i64) {
        self.put_unsigned_varlong(zigzag_encode_64(value));
    }

    pub fn put_entity_runtime_id(&mut self, value: u64) {
        self.put_unsigned_varlong(value);
    }

    #[allow(clippy::cast_possible_truncation)]
    pub fn put_string(&mut self, value: &str) {
        self.put_unsigned_varint(value.len() as u32);
        self.buf.put_slice(value.as_bytes());
    }

    /// Write at most `max` bytes of `value`, cut back to a character boundary.
    pub fn put_truncated_string(&mut self, value: &str, max: usize) {
        self.put_string(truncate_utf8(value, max));
    }

    pub fn put_vec3(&mut self, value: Vec3) {
        self.buf.put_f32_le(value.x);
        self.buf.put_f32_le(value.y);
        self.buf.put_f32_le(value.z);
    }
}

/// Longest prefix of `value` that is at most `max` bytes and still valid UTF-8.
pub fn truncate_utf8(value: &str, max: usize) -> &str {
    if value.len() <= max {
        return value;
    }
    let mut end = max;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    &value[..end]
}
