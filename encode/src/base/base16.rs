use crate::{Decode, Encode, EncodeError};
use std::io::{Read, Write};

/// Hexadecimal codec, lower-case on encode and case-insensitive on decode.
#[derive(Clone)]
pub struct Base16 {
    buf: Vec<u8>,
}

impl Base16 {
    pub fn new() -> Self {
        Self::with_capacity(128)
    }

    /// read buffer size, at least 128 bytes
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            buf: vec![0u8; cap.max(128)],
        }
    }

    const BASE16_LOWER: [u8; 16] = *b"0123456789abcdef";

    fn nibble(d: u8) -> Result<u8, EncodeError> {
        match d {
            b'0'..=b'9' => Ok(d - b'0'),
            b'a'..=b'f' => Ok(10 + d - b'a'),
            b'A'..=b'F' => Ok(10 + d - b'A'),
            _ => Err(EncodeError::InvalidBaseCodeInDec(char::from(d))),
        }
    }
}

impl Default for Base16 {
    fn default() -> Self {
        Self::new()
    }
}

impl Encode for Base16 {
    fn encode<R: Read, W: Write>(
        &mut self,
        in_data: &mut R,
        out_data: &mut W,
    ) -> Result<(usize, usize), EncodeError> {
        let mut ilen = 0;

        loop {
            let l = in_data.read(self.buf.as_mut_slice())?;
            if l == 0 {
                break;
            }

            for &d in self.buf.iter().take(l) {
                out_data.write_all(&[
                    Self::BASE16_LOWER[(d >> 4) as usize],
                    Self::BASE16_LOWER[(d & 0xf) as usize],
                ])?;
            }

            ilen += l;
        }

        out_data.flush()?;
        Ok((ilen, ilen << 1))
    }
}

impl Decode for Base16 {
    fn decode<R: Read, W: Write>(
        &mut self,
        in_data: &mut R,
        out_data: &mut W,
    ) -> Result<(usize, usize), EncodeError> {
        let (mut ilen, mut high) = (0, None);

        loop {
            let l = in_data.read(self.buf.as_mut_slice())?;
            if l == 0 {
                break;
            }

            for &d in self.buf.iter().take(l) {
                let x = Self::nibble(d)?;
                match high.take() {
                    Some(h) => out_data.write_all(&[(h << 4) | x])?,
                    None => high = Some(x),
                }
            }

            ilen += l;
        }

        if high.is_some() {
            Err(EncodeError::InvalidLenInDec(ilen))
        } else {
            out_data.flush()?;
            Ok((ilen, ilen >> 1))
        }
    }
}
