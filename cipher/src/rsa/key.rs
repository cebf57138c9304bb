use crate::{CipherError, Rand};
use num_bigint::BigUint;
use num_traits::{One, Zero};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use utils::{ArithmeticError, BigUintExt};

#[derive(Clone, Debug, PartialOrd, PartialEq, Ord, Eq, Serialize, Deserialize)]
pub struct PublicKey {
    // n = p * q
    n: BigUint,
    // public exponent, gcd(e, (p-1)(q-1)) = 1
    e: BigUint,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PrivateKey {
    pk: PublicKey,
    // d * e = 1 % (p-1)(q-1)
    d: BigUint,
    // [p, q], empty when the key was built from (n, e, d) only
    primes: Vec<BigUint>,
}

impl PublicKey {
    /// `1 < e < n` is checked, the factorization of `n` is not.
    pub fn new(n: BigUint, e: BigUint) -> Result<Self, CipherError> {
        let pk = Self::new_uncheck(n, e);
        pk.is_valid()?;
        Ok(pk)
    }

    /// note: not to check the `n` and `exp` are right RSA parameters
    pub fn new_uncheck(n: BigUint, exp: BigUint) -> Self {
        Self { e: exp, n }
    }

    /// n
    pub fn modulus(&self) -> &BigUint {
        &self.n
    }

    /// e
    pub fn exponent(&self) -> &BigUint {
        &self.e
    }

    /// `x < n`, otherwise [`CipherError::OutOfRange`]
    pub fn check_range(&self, x: &BigUint) -> Result<(), CipherError> {
        if x < &self.n {
            Ok(())
        } else {
            Err(CipherError::OutOfRange {
                bits: x.bits(),
                modulus_bits: self.n.bits(),
            })
        }
    }

    /// $x^e \mod n$, `x < n`
    fn rsaep(&self, x: &BigUint) -> Result<BigUint, CipherError> {
        self.check_range(x)?;
        Ok(BigUintExt(x).mod_pow(&self.e, &self.n)?)
    }

    /// Encrypt: $m^e \mod n$.
    ///
    /// A message that is not below the modulus fails with [`CipherError::OutOfRange`], it is
    /// never reduced.
    pub fn forward_transform(&self, m: &BigUint) -> Result<BigUint, CipherError> {
        self.rsaep(m)
    }

    /// Recover the value signed by the private key holder: $s^e \mod n$.
    ///
    /// This is the very same computation as [`PublicKey::forward_transform`]. No accept or
    /// reject decision is made here, the caller compares the returned value with the message
    /// it expects.
    pub fn verify_transform(&self, s: &BigUint) -> Result<BigUint, CipherError> {
        self.rsaep(s)
    }

    pub fn is_valid(&self) -> Result<(), CipherError> {
        if self.e <= BigUint::one() {
            Err(CipherError::InvalidPublicKey(format!(
                "rsa: public exponent {:#x} is too small",
                self.e
            )))
        } else if self.e >= self.n {
            Err(CipherError::InvalidPublicKey(format!(
                "rsa: public exponent {:#x} is not less than the modulus {:#x}",
                self.e, self.n
            )))
        } else {
            Ok(())
        }
    }
}

impl PrivateKey {
    /// note: not to check the parameters, the prime factors stay unknown
    pub fn new_uncheck(modulus: BigUint, public_exp: BigUint, private_exp: BigUint) -> Self {
        Self {
            pk: PublicKey::new_uncheck(modulus, public_exp),
            d: private_exp,
            primes: Vec::new(),
        }
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.pk
    }

    /// RSADP: $c^d \mod n$, `c < n`.
    ///
    /// Serves both decryption and raw signing.
    pub fn rsadp(&self, c: &BigUint) -> Result<BigUint, CipherError> {
        self.pk.check_range(c)?;
        Ok(BigUintExt(c).mod_pow(&self.d, &self.pk.n)?)
    }

    pub fn is_valid(&self) -> Result<(), CipherError> {
        self.pk.is_valid()?;
        if self.d.is_zero() || self.d >= self.pk.n {
            return Err(CipherError::InvalidPrivateKey(
                "rsa: invalid private exponent".to_string(),
            ));
        }

        if self.primes.is_empty() {
            return Ok(());
        }

        let mut n = BigUint::one();
        for prime in self.primes.iter() {
            if prime.is_zero() || prime.is_one() {
                return Err(CipherError::InvalidPrivateKey(
                    "rsa: invalid prime value".to_string(),
                ));
            }
            n *= prime;
        }

        if n != self.pk.n {
            return Err(CipherError::InvalidPrivateKey(
                "rsa: invalid modulus".to_string(),
            ));
        }

        let de = &self.d * &self.pk.e;
        for prime in self.primes.iter() {
            if !(&de % (prime - 1u32)).is_one() {
                return Err(CipherError::InvalidPrivateKey(
                    "rsa: invalid exponent".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Generate a two prime key pair with `e = 65537` and a modulus of exactly `bits_len` bits.
    ///
    /// `prime_test_rounds` bounds the prime test error by $4^{-rounds}$, `max_attempts` bounds
    /// both the prime candidates and the number of prime pairs tried.
    pub fn generate_key<R: Rand>(
        bits_len: usize,
        prime_test_rounds: usize,
        max_attempts: usize,
        rd: &mut R,
    ) -> Result<PrivateKey, CipherError> {
        if bits_len < 32 {
            return Err(CipherError::Other(format!(
                "rsa: modulus of `{bits_len}` bits is too small"
            )));
        }

        let pub_exp = BigUint::from(65537u32);
        let (p_bits, q_bits) = (bits_len - bits_len / 2, bits_len / 2);
        for _ in 0..max_attempts {
            let p = BigUintExt::<BigUint>::generate_prime(p_bits, prime_test_rounds, max_attempts, rd)?;
            let q = BigUintExt::<BigUint>::generate_prime(q_bits, prime_test_rounds, max_attempts, rd)?;
            if p == q {
                continue;
            }

            // both primes carry their two top bits, so this only guards odd corner cases
            let n = &p * &q;
            if n.bits() as usize != bits_len {
                continue;
            }

            let totient = (&p - 1u32) * (&q - 1u32);
            if let Some(d) = BigUintExt(&pub_exp).modinv(&totient) {
                return Ok(Self {
                    pk: PublicKey::new_uncheck(n, pub_exp),
                    d,
                    primes: vec![p, q],
                });
            }
        }

        Err(ArithmeticError::PrimeNotFound {
            bits: bits_len,
            attempts: max_attempts,
        }
        .into())
    }
}

#[cfg(feature = "sec-zeroize")]
impl Drop for PrivateKey {
    fn drop(&mut self) {
        utils::wipe(&mut self.d);
        self.primes.iter_mut().for_each(utils::wipe);
    }
}

impl Display for PublicKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{n={:#x}, e={:#x}}}", self.n, self.e)
    }
}
