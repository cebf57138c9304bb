//! RSA
//!
//! - pick two primes $p \neq q$, the modulus is $n = p * q$;
//! - the public exponent $e$ is coprime to $(p-1)(q-1)$, $1 \lt e \lt n$;
//! - the private exponent $d$ satisfies $d * e \equiv 1 \mod (p-1)(q-1)$;
//!
//! forward transform (encrypt / verify): $y = x^e \mod n$;
//!
//! private transform (decrypt / sign): $x = y^d \mod n$;
//!
//! blinding: $b = m * r^e \mod n$, and since $(m * r^e)^d = m^d * r \mod n$ the signer's answer
//! is unblinded by multiplying with $r^{-1}$.

mod key;
pub use key::{PrivateKey, PublicKey};

mod blind;
pub use blind::{BlindingFactor, PrimeSource, RandPrimeSource};
