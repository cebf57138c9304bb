mod error;
pub use error::CipherError;

pub use rand::{DefaultRand, Rand};

pub mod rsa;
