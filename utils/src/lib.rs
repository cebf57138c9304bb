//! Big integer helpers shared by the workspace: modular arithmetic, gcd,
//! modular inverse and probabilistic prime generation.

mod bigint_ext;
pub use bigint_ext::BigIntExt;

mod biguint_ext;
pub use biguint_ext::BigUintExt;

mod error;
pub use error::ArithmeticError;

/// Miller-Rabin rounds giving a false positive rate of at most $4^{-40} = 2^{-80}$.
pub const DEFAULT_PRIME_TEST_ROUNDS: usize = 40;

/// Overwrite the digits of `value` with zeros in place, leaving it equal to zero.
#[cfg(feature = "sec-zeroize")]
pub fn wipe(value: &mut num_bigint::BigUint) {
    // assign_from_slice writes into the existing digit buffer before normalizing it
    let zeros = vec![0u32; value.iter_u32_digits().len()];
    value.assign_from_slice(zeros.as_slice());
}
