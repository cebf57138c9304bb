use std::{error::Error, fmt::Display};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArithmeticError {
    /// modulus must be positive
    ZeroModulus,

    /// `gcd(value, modulus) != 1`
    NotInvertible,

    /// prime bit length or bound too small
    InvalidBitLength(usize),

    /// no prime found within the candidate budget
    PrimeNotFound { bits: usize, attempts: usize },
}

impl Display for ArithmeticError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroModulus => f.write_str("modulus must not be zero"),
            Self::NotInvertible => f.write_str("value is not invertible for the modulus"),
            Self::InvalidBitLength(bits) => {
                f.write_fmt(format_args!("cannot generate a prime of `{bits}` bits"))
            }
            Self::PrimeNotFound { bits, attempts } => f.write_fmt(format_args!(
                "no `{bits}`-bit prime found after `{attempts}` candidates"
            )),
        }
    }
}

impl Error for ArithmeticError {}
