//! Conversions between UTF-8 text, unsigned big integers and their hexadecimal wire form.
//!
//! Text maps to the big-endian integer of its UTF-8 bytes. Hex is lower-case without a `0x`
//! prefix or zero padding.

use crate::base::Base16;
use crate::{Decode, EncodeError};
use num_bigint::BigUint;
use num_traits::Zero;
use std::io::Read;

pub fn text_to_integer(s: &str) -> BigUint {
    BigUint::from_bytes_be(s.as_bytes())
}

/// Inverse of [`text_to_integer`]; zero is the empty string.
pub fn integer_to_text(i: &BigUint) -> Result<String, EncodeError> {
    let bytes = if i.is_zero() {
        Vec::new()
    } else {
        i.to_bytes_be()
    };

    Ok(String::from_utf8(bytes)?)
}

/// `0` for zero, otherwise no leading zeros
pub fn integer_to_hex(i: &BigUint) -> String {
    format!("{:x}", i)
}

/// Case-insensitive; an odd number of digits is read as if it had a leading zero.
pub fn hex_to_integer(s: &str) -> Result<BigUint, EncodeError> {
    if s.is_empty() {
        return Err(EncodeError::InvalidLenInDec(0));
    }

    let pad: &[u8] = if s.len() & 1 == 1 { b"0" } else { b"" };
    let mut bytes = Vec::with_capacity((s.len() + 1) >> 1);
    Base16::new().decode(&mut pad.chain(s.as_bytes()), &mut bytes)?;

    Ok(BigUint::from_bytes_be(bytes.as_slice()))
}
