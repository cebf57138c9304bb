use super::PublicKey;
use crate::{CipherError, Rand};
use num_bigint::BigUint;
use num_traits::One;
use utils::{ArithmeticError, BigUintExt};

/// Where blinding factor candidates come from.
pub trait PrimeSource {
    /// A prime with the same bit length as `bound` and less than it.
    fn random_prime(&mut self, bound: &BigUint) -> Result<BigUint, CipherError>;
}

impl<P: PrimeSource + ?Sized> PrimeSource for &mut P {
    fn random_prime(&mut self, bound: &BigUint) -> Result<BigUint, CipherError> {
        (**self).random_prime(bound)
    }
}

/// Draws primes from a secure random source.
pub struct RandPrimeSource<R: Rand> {
    rng: R,
    test_rounds: usize,
    max_attempts: usize,
}

impl<R: Rand> RandPrimeSource<R> {
    /// `max_attempts` bounds the prime candidates tried per call.
    pub fn new(rng: R, test_rounds: usize, max_attempts: usize) -> Self {
        Self {
            rng,
            test_rounds,
            max_attempts,
        }
    }
}

impl<R: Rand> PrimeSource for RandPrimeSource<R> {
    fn random_prime(&mut self, bound: &BigUint) -> Result<BigUint, CipherError> {
        Ok(BigUintExt::<BigUint>::generate_prime_below(
            bound,
            self.test_rounds,
            self.max_attempts,
            &mut self.rng,
        )?)
    }
}

/// The secret `r` of one blind signature run: `0 < r < n` and `gcd(r, n) = 1`.
///
/// Build a fresh one for every run and drop it as soon as the run ends.
pub struct BlindingFactor {
    r: BigUint,
}

impl BlindingFactor {
    pub fn new(pk: &PublicKey, r: BigUint) -> Result<Self, CipherError> {
        pk.check_range(&r)?;
        if BigUintExt(&r).gcd(pk.modulus()).is_one() {
            Ok(Self { r })
        } else {
            Err(ArithmeticError::NotInvertible.into())
        }
    }

    /// Draw primes from `source` until one is coprime to the modulus, giving up with
    /// [`CipherError::BlindingFactor`] after `max_attempts` draws. A draw where the source
    /// found no prime counts as a failed one.
    pub fn generate<P: PrimeSource + ?Sized>(
        pk: &PublicKey,
        source: &mut P,
        max_attempts: usize,
    ) -> Result<Self, CipherError> {
        for _ in 0..max_attempts {
            let r = match source.random_prime(pk.modulus()) {
                Ok(r) => r,
                // a source out of candidates costs one attempt
                Err(CipherError::Arithmetic(ArithmeticError::PrimeNotFound { .. })) => continue,
                Err(e) => return Err(e),
            };
            match Self::new(pk, r) {
                Ok(factor) => return Ok(factor),
                Err(CipherError::Arithmetic(ArithmeticError::NotInvertible))
                | Err(CipherError::OutOfRange { .. }) => continue,
                Err(e) => return Err(e),
            }
        }

        Err(CipherError::BlindingFactor {
            attempts: max_attempts,
        })
    }
}

#[cfg(feature = "sec-zeroize")]
impl Drop for BlindingFactor {
    fn drop(&mut self) {
        utils::wipe(&mut self.r);
    }
}

impl PublicKey {
    /// $b = m * r^e \mod n$, hides `m` from whoever does not know `r`
    pub fn blind(&self, m: &BigUint, factor: &BlindingFactor) -> Result<BigUint, CipherError> {
        self.check_range(m)?;
        let re = self.forward_transform(&factor.r)?;
        Ok(m * re % self.modulus())
    }

    /// $s = bs * r^{-1} \mod n$
    ///
    /// With an honest signer $bs = m^d * r$, so `s` is the signature $m^d$ of the unblinded message.
    pub fn unblind(
        &self,
        blind_sig: &BigUint,
        factor: &BlindingFactor,
    ) -> Result<BigUint, CipherError> {
        self.check_range(blind_sig)?;
        #[allow(unused_mut)]
        let mut r_inv = BigUintExt(&factor.r).mod_inverse(self.modulus())?;
        let s = blind_sig * &r_inv % self.modulus();

        #[cfg(feature = "sec-zeroize")]
        utils::wipe(&mut r_inv);
        Ok(s)
    }
}
