use std::{error::Error, fmt::Display};
use utils::ArithmeticError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CipherError {
    InvalidPublicKey(String),

    InvalidPrivateKey(String),

    /// the input integer is not below the modulus
    OutOfRange { bits: u64, modulus_bits: u64 },

    /// no prime coprime to the modulus within the retry budget
    BlindingFactor { attempts: usize },

    Arithmetic(ArithmeticError),

    Other(String),
}

impl Display for CipherError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPublicKey(e) => f.write_fmt(format_args!("Invalid public key: {e}")),
            Self::InvalidPrivateKey(e) => f.write_fmt(format_args!("Invalid private key: {e}")),
            Self::OutOfRange { bits, modulus_bits } => f.write_fmt(format_args!(
                "Value of `{bits}` bits is not less than the `{modulus_bits}`-bit modulus"
            )),
            Self::BlindingFactor { attempts } => f.write_fmt(format_args!(
                "No blinding factor coprime to the modulus after `{attempts}` attempts"
            )),
            Self::Arithmetic(e) => f.write_fmt(format_args!("{e}")),
            Self::Other(e) => f.write_str(e),
        }
    }
}

impl Error for CipherError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Arithmetic(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ArithmeticError> for CipherError {
    fn from(value: ArithmeticError) -> Self {
        Self::Arithmetic(value)
    }
}
