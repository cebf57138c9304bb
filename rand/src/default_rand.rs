use xrand::rngs::OsRng;
use xrand::{CryptoRng, RngCore};

/// Operating system entropy, see [`OsRng`].
#[derive(Copy, Clone, Default)]
pub struct DefaultRand {
    rng: OsRng,
}

impl RngCore for DefaultRand {
    fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.rng.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), xrand::Error> {
        self.rng.try_fill_bytes(dest)
    }
}

impl CryptoRng for DefaultRand {}
