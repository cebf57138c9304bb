use std::fmt::{Display, Formatter};
use std::io::Error;
use std::string::FromUtf8Error;

#[derive(Debug)]
pub enum EncodeError {
    IoErr(Error),
    InvalidBaseCodeInDec(char),
    InvalidLenInDec(usize),
    /// the integer bytes are not a UTF-8 string
    InvalidUtf8(FromUtf8Error),
}

impl Display for EncodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            EncodeError::IoErr(io) => f.write_fmt(format_args!("{}", io)),
            EncodeError::InvalidLenInDec(len) => {
                f.write_fmt(format_args!("Invalid data length `{}` in the decode", len))
            }
            EncodeError::InvalidBaseCodeInDec(code) => f.write_fmt(format_args!(
                "Invalid base encode character `{}({:#x})`",
                code, *code as u64
            )),
            EncodeError::InvalidUtf8(e) => {
                f.write_fmt(format_args!("Decoded integer is not valid UTF-8: {}", e))
            }
        }
    }
}

impl std::error::Error for EncodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EncodeError::IoErr(e) => Some(e),
            EncodeError::InvalidUtf8(e) => Some(e),
            _ => None,
        }
    }
}

impl From<Error> for EncodeError {
    fn from(value: Error) -> Self {
        Self::IoErr(value)
    }
}

impl From<FromUtf8Error> for EncodeError {
    fn from(value: FromUtf8Error) -> Self {
        Self::InvalidUtf8(value)
    }
}
