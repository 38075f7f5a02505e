// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Byte-counting output stream
//!
//! Integers are big-endian, float buffers native-endian. Strings are modified
//! UTF-8 behind a 16-bit big-endian length prefix.

use crate::error::{Result, SerializeError};
use std::io::{self, Write};

/// Largest encoded string that fits the 16-bit length prefix
pub const MAX_UTF_BYTES: usize = u16::MAX as usize;

/// Writer that counts the bytes passed through it
pub struct CountingWriter<W: Write> {
    inner: W,
    written: usize,
}

impl<W: Write> CountingWriter<W> {
    /// Wrap a sink, starting the count at zero
    pub fn new(inner: W) -> Self {
        Self { inner, written: 0 }
    }

    /// Bytes written since construction
    pub fn bytes_written(&self) -> usize {
        self.written
    }

    /// Unwrap the sink
    pub fn into_inner(self) -> W {
        self.inner
    }

    pub fn write_u8(&mut self, value: u8) -> Result<()> {
        self.write_all(&[value])?;
        Ok(())
    }

    pub fn write_i32(&mut self, value: i32) -> Result<()> {
        self.write_all(&value.to_be_bytes())?;
        Ok(())
    }

    pub fn write_i64(&mut self, value: i64) -> Result<()> {
        self.write_all(&value.to_be_bytes())?;
        Ok(())
    }

    /// Write a string as 16-bit big-endian length plus modified UTF-8
    pub fn write_utf(&mut self, value: &str) -> Result<()> {
        let encoded = encode_modified_utf8(value);
        if encoded.len() > MAX_UTF_BYTES {
            return Err(SerializeError::StringTooLong(encoded.len()));
        }
        self.write_all(&(encoded.len() as u16).to_be_bytes())?;
        self.write_all(&encoded)?;
        Ok(())
    }

    /// Write floats in native byte order
    pub fn write_f32s(&mut self, values: &[f32]) -> Result<()> {
        self.write_all(bytemuck::cast_slice(values))?;
        Ok(())
    }

    /// Write zero bytes until the count is a multiple of `alignment`
    pub fn pad_to(&mut self, alignment: usize) -> Result<()> {
        let rem = self.written % alignment;
        if rem != 0 {
            const ZEROS: [u8; 8] = [0; 8];
            let mut remaining = alignment - rem;
            while remaining > 0 {
                let n = remaining.min(ZEROS.len());
                self.write_all(&ZEROS[..n])?;
                remaining -= n;
            }
        }
        Ok(())
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.written += n;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Encode a string as modified UTF-8
///
/// NUL becomes `C0 80`; characters outside the BMP are written as two
/// 3-byte surrogates.
pub fn encode_modified_utf8(value: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(value.len());
    for unit in value.encode_utf16() {
        match unit {
            0x0001..=0x007F => out.push(unit as u8),
            0x0000 | 0x0080..=0x07FF => {
                out.push(0xC0 | (unit >> 6) as u8);
                out.push(0x80 | (unit & 0x3F) as u8);
            }
            _ => {
                out.push(0xE0 | (unit >> 12) as u8);
                out.push(0x80 | ((unit >> 6) & 0x3F) as u8);
                out.push(0x80 | (unit & 0x3F) as u8);
            }
        }
    }
    out
}

/// Decode modified UTF-8, returning `None` on malformed input
pub fn decode_modified_utf8(bytes: &[u8]) -> Option<String> {
    let mut units = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        match b {
            0x01..=0x7F => {
                units.push(b as u16);
                i += 1;
            }
            0xC0..=0xDF => {
                let b2 = continuation(bytes.get(i + 1))?;
                units.push(((b as u16 & 0x1F) << 6) | b2);
                i += 2;
            }
            0xE0..=0xEF => {
                let b2 = continuation(bytes.get(i + 1))?;
                let b3 = continuation(bytes.get(i + 2))?;
                units.push(((b as u16 & 0x0F) << 12) | (b2 << 6) | b3);
                i += 3;
            }
            _ => return None,
        }
    }
    String::from_utf16(&units).ok()
}

fn continuation(byte: Option<&u8>) -> Option<u16> {
    match byte {
        Some(b) if b & 0xC0 == 0x80 => Some((b & 0x3F) as u16),
        _ => None,
    }
}
