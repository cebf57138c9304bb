//! Secure random byte sources.
//!
//! Everything that draws key material or blinding factors goes through [`Rand`],
//! which is only implemented for cryptographically secure generators.

/// A cryptographically secure source of random bytes.
pub trait Rand: Default {
    fn rand(&mut self, random: &mut [u8]);
}

mod default_rand;
pub use default_rand::DefaultRand;

impl<T: xrand::RngCore + xrand::CryptoRng + Default> Rand for T {
    fn rand(&mut self, random: &mut [u8]) {
        self.fill_bytes(random);
    }
}
