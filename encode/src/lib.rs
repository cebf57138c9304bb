use std::io::{Read, Write};

pub trait Encode {
    /// returns the number of bytes read and written
    fn encode<R: Read, W: Write>(
        &mut self,
        in_data: &mut R,
        out_data: &mut W,
    ) -> Result<(usize, usize), EncodeError>;
}

pub trait Decode {
    fn decode<R: Read, W: Write>(
        &mut self,
        in_data: &mut R,
        out_data: &mut W,
    ) -> Result<(usize, usize), EncodeError>;
}

pub mod base;

mod codec;
pub use codec::{hex_to_integer, integer_to_hex, integer_to_text, text_to_integer};

mod error;
pub use error::EncodeError;
