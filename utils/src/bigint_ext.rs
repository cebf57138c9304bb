use num_bigint::BigInt;
use num_traits::{Euclid, One, Signed, Zero};
use std::borrow::Borrow;
use std::ops::Deref;

pub struct BigIntExt<T: Borrow<BigInt>>(pub T);

impl<T: Borrow<BigInt>> Deref for BigIntExt<T> {
    type Target = BigInt;
    fn deref(&self) -> &Self::Target {
        self.0.borrow()
    }
}

impl<T: Borrow<BigInt>> BigIntExt<T> {
    /// Jacobi symbol $(\frac{self}{b})$, `None` if `b == 0`.
    ///
    /// Used by the Lucas half of the prime test to pick its discriminant.
    pub fn jacobi(&self, b: &BigInt) -> Option<isize> {
        if b.is_zero() {
            return None;
        }

        let (mut a, mut b) = (self.deref().clone(), b.clone());
        let mut j = 1isize;
        if b.is_negative() {
            b = -b;
            if a.is_negative() {
                j = -1;
            }
        }

        let (three, five, seven) = (BigInt::from(3u8), BigInt::from(5u8), BigInt::from(7u8));
        loop {
            if b.is_one() {
                return Some(j);
            }

            a = a.rem_euclid(&b);
            if a.is_zero() {
                return Some(0);
            }

            // (2/b) = -1 iff b = 3, 5 mod 8
            let s = a.trailing_zeros().unwrap_or(0);
            if (s & 1) != 0 {
                let b_mod8 = &b & &seven;
                if b_mod8 == three || b_mod8 == five {
                    j = -j;
                }
            }
            a >>= s;

            // quadratic reciprocity
            if (&b & &three) == three && (&a & &three) == three {
                j = -j;
            }

            std::mem::swap(&mut a, &mut b);
        }
    }
}
