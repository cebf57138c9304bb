use crate::{ArithmeticError, BigIntExt};
use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{Euclid, One, ToPrimitive, Zero};
use rand::Rand;
use std::borrow::Borrow;
use std::ops::Deref;
#[cfg(feature = "sec-zeroize")]
use zeroize::Zeroize;

// 3 * 5 * ... * 53
const SMALL_PRIMES: [u8; 15] = [3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53];
const SMALL_PRIMES_PRODUCT: u64 = 16294579238595022365u64;

pub struct BigUintExt<T: Borrow<BigUint>>(pub T);

impl<T: Borrow<BigUint>> Deref for BigUintExt<T> {
    type Target = BigUint;
    fn deref(&self) -> &Self::Target {
        self.0.borrow()
    }
}

impl<T: Borrow<BigUint>> BigUintExt<T> {
    /// $self^{exponent} \mod modulus$
    ///
    /// Left-to-right square-and-multiply: one squaring per exponent bit and one extra
    /// multiplication per set bit, so the cost is linear in `exponent.bits()`.
    pub fn mod_pow(&self, exponent: &BigUint, modulus: &BigUint) -> Result<BigUint, ArithmeticError> {
        if modulus.is_zero() {
            return Err(ArithmeticError::ZeroModulus);
        } else if modulus.is_one() {
            return Ok(BigUint::zero());
        }

        let base = self.deref() % modulus;
        let mut acc = BigUint::one();
        for i in (0..exponent.bits()).rev() {
            acc = &acc * &acc % modulus;
            if exponent.bit(i) {
                acc = acc * &base % modulus;
            }
        }

        Ok(acc)
    }

    /// Euclid's algorithm, `gcd(a, 0) = a`
    pub fn gcd(&self, other: &BigUint) -> BigUint {
        let (mut a, mut b) = (self.deref().clone(), other.clone());
        while !b.is_zero() {
            let r = &a % &b;
            a = std::mem::replace(&mut b, r);
        }
        a
    }

    /// `self * inv = 1 mod modulus` by the extended Euclidean algorithm.
    ///
    /// If `d = gcd(a, n)` and `d = ax' + ny'`, then `x'` is the inverse exactly when `d = 1`.
    pub fn modinv(&self, modulus: &BigUint) -> Option<BigUint> {
        if modulus.is_zero() {
            return None;
        }

        let (a, n) = (
            BigInt::from(self.deref() % modulus),
            BigInt::from(modulus.clone()),
        );
        let g = a.extended_gcd(&n);
        if g.gcd.is_one() {
            g.x.rem_euclid(&n).to_biguint()
        } else {
            None
        }
    }

    pub fn mod_inverse(&self, modulus: &BigUint) -> Result<BigUint, ArithmeticError> {
        if modulus.is_zero() {
            return Err(ArithmeticError::ZeroModulus);
        }

        self.modinv(modulus).ok_or(ArithmeticError::NotInvertible)
    }

    /// uniform random number in `[0, self)`, zero if `self` is zero
    pub fn gen_random<R: Rand>(&self, rng: &mut R) -> BigUint {
        let bound = self.deref();
        if bound.is_zero() {
            return BigUint::zero();
        }

        let bits = bound.bits() as usize;
        let top_mask = match bits & 7 {
            0 => 0xff,
            b => (1u8 << b) - 1,
        };
        let mut buf = vec![0u8; (bits + 7) >> 3];

        let r = loop {
            rng.rand(buf.as_mut_slice());
            if let Some(x) = buf.last_mut() {
                *x &= top_mask;
            }

            let r = BigUint::from_bytes_le(buf.as_slice());
            if &r < bound {
                break r;
            }
        };

        #[cfg(feature = "sec-zeroize")]
        buf.zeroize();
        r
    }

    /// Probabilistic prime test: trial division by the small primes, then Miller-Rabin with
    /// `test_rounds + 1` random bases, then the Lucas test (together a Baillie-PSW test).
    ///
    /// For any odd number greater than 2 each Miller-Rabin round errs with probability at most 1/4.
    pub fn probably_prime_test<R: Rand>(&self, test_rounds: usize, rng: &mut R) -> bool {
        const PRIME_BIT_MASK: u128 = 1 << 2
            | 1 << 3
            | 1 << 5
            | 1 << 7
            | 1 << 11
            | 1 << 13
            | 1 << 17
            | 1 << 19
            | 1 << 23
            | 1 << 29
            | 1 << 31
            | 1 << 37
            | 1 << 41
            | 1 << 43
            | 1 << 47
            | 1 << 53
            | 1 << 59
            | 1 << 61
            | 1 << 67
            | 1 << 71
            | 1 << 73
            | 1 << 79
            | 1 << 83
            | 1 << 89
            | 1 << 97
            | 1 << 101
            | 1 << 103
            | 1 << 107
            | 1 << 109
            | 1 << 113
            | 1 << 127;

        let n = self.deref();
        if n.bits() < 8 {
            let x = n.to_u8().unwrap_or(0);
            return ((1u128 << x) & PRIME_BIT_MASK) != 0;
        } else if n.is_even() {
            return false;
        }

        let Some(r) = (n % SMALL_PRIMES_PRODUCT).to_u64() else {
            return false;
        };
        if SMALL_PRIMES.iter().any(|&p| r % (p as u64) == 0) {
            return false;
        }

        self.miller_rabin(test_rounds + 1, rng) && self.lucas()
    }

    /// `self` is odd and greater than 2
    fn miller_rabin<R: Rand>(&self, rounds: usize, rng: &mut R) -> bool {
        let n = self.deref();
        let n_m1 = n - 1u32;
        let s = n_m1.trailing_zeros().unwrap_or(0);
        let d = &n_m1 >> s;

        'witness: for _ in 0..rounds {
            let a = self.gen_random(rng);
            if a.is_zero() || a.is_one() {
                continue;
            }

            let mut x = a.modpow(&d, n);
            if x.is_one() || x == n_m1 {
                continue;
            }

            for _ in 1..s {
                x = &x * &x % n;
                if x == n_m1 {
                    continue 'witness;
                } else if x.is_one() {
                    return false;
                }
            }

            return false;
        }

        true
    }

    /// "Almost extra strong" Lucas probable prime test with Baillie-OEIS parameter selection.
    ///
    /// Baillie and Wagstaff, "Lucas Pseudoprimes", Mathematics of Computation 35(152), 1980.
    /// Grantham, "Frobenius Pseudoprimes", Mathematics of Computation 70(234), 2000.
    /// Baillie, "Extra strong Lucas pseudoprimes", OEIS A217719.
    fn lucas(&self) -> bool {
        let n = self.deref();
        if n.is_one() {
            return false;
        } else if n.is_even() {
            return n == &BigUint::from(2u8);
        }

        // method C: smallest p >= 3 with jacobi(p^2 - 4, n) = -1, q = 1
        let n_int = BigInt::from(n.clone());
        let mut p = 3u32;
        loop {
            if p > 10000 {
                return false;
            }

            match BigIntExt(BigInt::from(p * p - 4)).jacobi(&n_int) {
                None => return false,
                Some(-1) => break,
                // p^2 - 4 = (p - 2)(p + 2) shares the factor p + 2 with n
                Some(0) => return n.bits() <= 32 && n.to_u32() == Some(p + 2),
                _ => {}
            }

            // a square n never yields -1
            if p == 40 {
                let root = n.sqrt();
                if &(&root * &root) == n {
                    return false;
                }
            }

            p += 1;
        }

        // n + 1 = 2^r * s, s odd
        let mut s = n + 1u32;
        let r = s.trailing_zeros().unwrap_or(0);
        s >>= r;

        // V(0) = 2, V(1) = p
        // V(2k) = V(k)^2 - 2
        // V(2k+1) = V(k)V(k+1) - p
        let (p, nm2, two) = (BigUint::from(p) % n, n - 2u32, BigUint::from(2u32));
        let (mut vk, mut vk1) = (two.clone(), p.clone());
        for i in (0..=s.bits()).rev() {
            let odd = (&vk * &vk1 + n - &p) % n;
            if s.bit(i) {
                vk = odd;
                vk1 = (&vk1 * &vk1 + &nm2) % n;
            } else {
                vk1 = odd;
                vk = (&vk * &vk + &nm2) % n;
            }
        }

        // V(s) = ±2 and U(s) = 0, where U(s) = 0 iff p V(s) = 2 V(s+1)
        if (vk == two || vk == nm2) && (&vk * &p % n) == ((&vk1 << 1u32) % n) {
            return true;
        }

        // V(2^t s) = 0 for some 0 <= t < r - 1
        for _ in 0..r.saturating_sub(1) {
            if vk.is_zero() {
                return true;
            } else if vk == two {
                return false;
            }
            vk = (&vk * &vk + &nm2) % n;
        }

        false
    }

    /// Generate a prime of exactly `bits_len` bits with its two most significant bits set, so that
    /// the product of two such primes is never a bit short.
    ///
    /// At most `max_attempts` random candidates are drawn before giving up.
    pub fn generate_prime<R: Rand>(
        bits_len: usize,
        test_rounds: usize,
        max_attempts: usize,
        rng: &mut R,
    ) -> Result<BigUint, ArithmeticError> {
        if bits_len < 2 {
            return Err(ArithmeticError::InvalidBitLength(bits_len));
        }

        let top = match bits_len & 7 {
            0 => 8,
            b => b,
        };
        let mut buf = vec![0u8; (bits_len + 7) >> 3];
        let last = buf.len() - 1;

        let mut prime = None;
        for _ in 0..max_attempts {
            rng.rand(buf.as_mut_slice());
            if top >= 2 {
                buf[last] &= ((1u16 << top) - 1) as u8;
                buf[last] |= 3 << (top - 2);
            } else {
                buf[last] = 1;
                buf[last - 1] |= 0x80;
            }
            buf[0] |= 1;

            // step over multiples of the small primes, Miller-Rabin still runs on the result
            let mut n = BigUint::from_bytes_le(buf.as_slice());
            let Some(base) = (&n % SMALL_PRIMES_PRODUCT).to_u64() else {
                continue;
            };
            let delta = (0u64..(1u64 << 20)).step_by(2).find(|delta| {
                let m = base + delta;
                SMALL_PRIMES.iter().all(|&p| {
                    let p = p as u64;
                    m % p != 0 || (bits_len <= 6 && m == p)
                })
            });
            if let Some(delta) = delta {
                n += delta;
            }

            let n = BigUintExt(n);
            if n.bits() as usize == bits_len && n.probably_prime_test(test_rounds, rng) {
                prime = Some(n.0);
                break;
            }
        }

        #[cfg(feature = "sec-zeroize")]
        buf.zeroize();
        prime.ok_or(ArithmeticError::PrimeNotFound {
            bits: bits_len,
            attempts: max_attempts,
        })
    }

    /// Generate a prime `p` with `p < bound` and the same bit length as `bound`.
    ///
    /// Candidates are uniform in `[2^(bits-1), bound)`; at most `max_attempts` are drawn.
    pub fn generate_prime_below<R: Rand>(
        bound: &BigUint,
        test_rounds: usize,
        max_attempts: usize,
        rng: &mut R,
    ) -> Result<BigUint, ArithmeticError> {
        let bits = bound.bits() as usize;
        if bits < 2 {
            return Err(ArithmeticError::InvalidBitLength(bits));
        }

        let low = BigUint::one() << (bits - 1);
        let span = BigUintExt(bound - &low);
        if span.is_zero() {
            return Err(ArithmeticError::InvalidBitLength(bits));
        }

        for _ in 0..max_attempts {
            let mut candidate = &low + span.gen_random(rng);
            candidate.set_bit(0, true);
            if &candidate >= bound {
                continue;
            }

            let candidate = BigUintExt(candidate);
            if candidate.probably_prime_test(test_rounds, rng) {
                return Ok(candidate.0);
            }
        }

        Err(ArithmeticError::PrimeNotFound {
            bits,
            attempts: max_attempts,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::{ArithmeticError, BigUintExt, DEFAULT_PRIME_TEST_ROUNDS};
    use num_bigint::BigUint;
    use num_traits::{Num, One, Zero};
    use rand::DefaultRand;

    fn big(s: &str) -> BigUint {
        BigUint::from_str_radix(s, 10).expect("convert string to big uint failed")
    }

    #[test]
    fn mod_pow() {
        // (base, exponent, modulus, out)
        let cases = [
            (65u64, 17u64, 3233u64, 2790u64),
            (2790, 2753, 3233, 65),
            (4, 13, 497, 445),
            (0, 0, 7, 1),
            (5, 0, 13, 1),
            (0, 5, 13, 0),
            (12345, 1, 7, 12345 % 7),
            (9, 9, 1, 0),
        ];

        for (base, exp, m, out) in cases {
            let r = BigUintExt(BigUint::from(base))
                .mod_pow(&BigUint::from(exp), &BigUint::from(m))
                .unwrap();
            assert_eq!(r, BigUint::from(out), "case: {base}^{exp} mod {m}");
        }
    }

    #[test]
    fn mod_pow_matches_num_bigint() {
        let mut rng = DefaultRand::default();
        let m = big("94560208308847015747498523884063394671606671904944666360068158221458669711639");
        for _ in 0..16 {
            let (b, e) = (BigUintExt(&m).gen_random(&mut rng), BigUintExt(&m).gen_random(&mut rng));
            assert_eq!(BigUintExt(&b).mod_pow(&e, &m).unwrap(), b.modpow(&e, &m));
        }
    }

    #[test]
    fn mod_pow_zero_modulus() {
        let r = BigUintExt(BigUint::from(3u8)).mod_pow(&BigUint::one(), &BigUint::zero());
        assert_eq!(r, Err(ArithmeticError::ZeroModulus));
    }

    #[test]
    fn gcd() {
        let cases = [
            (0u64, 0u64, 0u64),
            (12, 0, 12),
            (0, 12, 12),
            (48, 18, 6),
            (17, 3233, 1),
            (53, 3233, 53),
            (3233, 61, 61),
        ];

        for (a, b, out) in cases {
            let g = BigUintExt(BigUint::from(a)).gcd(&BigUint::from(b));
            assert_eq!(g, BigUint::from(out), "case: gcd({a}, {b})");
        }
    }

    #[test]
    fn mod_inverse() {
        // from the int_test.go in the golang source code, and the RSA textbook example
        let cases = [
            ("1234567", "458948883992"),
            ("239487239847", "2410312426921032588552076022197566074856950548502459942654116941958108831682612228890093858261341614673227141477904012196503648957050582631942730706805009223062734745341073406696246014589361659774041027169249453200378729434170325843778659198143763193776859869524088940195577346119843545301547043747207749969763750084308926339295559968882457872412993810129130294592999947926365264059284647209730384947211681434464714438488520940127459844288859336526896320919633919"),
            ("17", "3120"),
            ("7", "3233"),
        ];

        for (a, n) in cases {
            let (a, n) = (big(a), big(n));
            let inv = BigUintExt(&a).mod_inverse(&n).expect("inverse exist");
            assert!((&a * &inv % &n).is_one(), "{a} * {inv} != 1 mod {n}");
        }

        assert_eq!(
            BigUintExt(BigUint::from(17u8)).mod_inverse(&BigUint::from(3120u32)),
            Ok(BigUint::from(2753u32))
        );
    }

    #[test]
    fn mod_inverse_not_coprime() {
        let cases = [(53u32, 3233u32), (6, 9), (0, 7)];
        for (a, n) in cases {
            let r = BigUintExt(BigUint::from(a)).mod_inverse(&BigUint::from(n));
            assert_eq!(r, Err(ArithmeticError::NotInvertible), "case: {a}^-1 mod {n}");
        }

        let r = BigUintExt(BigUint::from(3u8)).mod_inverse(&BigUint::zero());
        assert_eq!(r, Err(ArithmeticError::ZeroModulus));
    }

    #[test]
    fn gen_random_in_range() {
        let mut rng = DefaultRand::default();
        for bound in [1u32, 2, 7, 255, 256, 257, 3233] {
            let bound = BigUint::from(bound);
            for _ in 0..64 {
                assert!(BigUintExt(&bound).gen_random(&mut rng) < bound);
            }
        }
        assert!(BigUintExt(BigUint::zero()).gen_random(&mut rng).is_zero());
    }

    #[test]
    fn gen_small_prime() {
        let mut rng = DefaultRand::default();
        for bits_len in 2..10 {
            let p = BigUintExt::<BigUint>::generate_prime(bits_len, 19, 1000, &mut rng).unwrap();
            assert_eq!(p.bits() as usize, bits_len);
            assert!(BigUintExt(p).probably_prime_test(31, &mut rng));
        }
    }

    #[test]
    fn gen_prime_bits() {
        let mut rng = DefaultRand::default();
        for bits_len in [64usize, 127, 256, 512] {
            let p = BigUintExt::<BigUint>::generate_prime(
                bits_len,
                DEFAULT_PRIME_TEST_ROUNDS,
                10_000,
                &mut rng,
            )
            .unwrap();
            assert_eq!(p.bits() as usize, bits_len);
            assert!(p.bit(bits_len as u64 - 2), "second highest bit not set");
        }
    }

    #[test]
    fn gen_prime_invalid() {
        let mut rng = DefaultRand::default();
        for bits_len in [0usize, 1] {
            assert_eq!(
                BigUintExt::<BigUint>::generate_prime(bits_len, 10, 10, &mut rng),
                Err(ArithmeticError::InvalidBitLength(bits_len))
            );
        }
        assert_eq!(
            BigUintExt::<BigUint>::generate_prime(256, 10, 0, &mut rng),
            Err(ArithmeticError::PrimeNotFound {
                bits: 256,
                attempts: 0
            })
        );
    }

    #[test]
    fn gen_prime_below() {
        let mut rng = DefaultRand::default();
        let bounds = [
            big("3233"),
            big("4093"),
            big("290684273230919398108010081414538931343"),
        ];
        for bound in bounds.iter() {
            for _ in 0..8 {
                let p = BigUintExt::<BigUint>::generate_prime_below(bound, 20, 10_000, &mut rng)
                    .unwrap();
                assert!(&p < bound, "{p} is not below {bound}");
                assert_eq!(p.bits(), bound.bits());
                assert!(BigUintExt(p).probably_prime_test(20, &mut rng));
            }
        }
    }

    #[test]
    fn gen_prime_below_empty_range() {
        let mut rng = DefaultRand::default();
        for bound in [0u32, 1, 2048] {
            let r = BigUintExt::<BigUint>::generate_prime_below(
                &BigUint::from(bound),
                10,
                10,
                &mut rng,
            );
            assert!(matches!(r, Err(ArithmeticError::InvalidBitLength(_))), "bound {bound}");
        }

        // only 3 has two bits and 3 is not below 3
        let r = BigUintExt::<BigUint>::generate_prime_below(&BigUint::from(3u8), 10, 5, &mut rng);
        assert_eq!(r, Err(ArithmeticError::PrimeNotFound { bits: 2, attempts: 5 }));
    }

    #[test]
    fn composite_validate() {
        let cases = [
            "0",
            "1",
            "3233",
            "21284175091214687912771199898307297748211672914763848041968395774954376176754",
            "6084766654921918907427900243509372380954290099172559290432744450051395395951",
            "84594350493221918389213352992032324280367711247940675652888030554255915464401",
            "82793403787388584738507275144194252681",

            // Arnault, "Rabin-Miller Primality Test: Composite Numbers Which Pass It",
            // Mathematics of Computation, 64(209) (January 1995), pp. 335-361.
            // strong pseudoprime to prime bases 2 through 29
            "1195068768795265792518361315725116351898245581",
            // strong pseudoprime to all prime bases up to 200
            "8038374574536394912570796143419421081388376882875581458374889175222974273765333652186502336163960045457915042023603208766569966760987284043965408232928738791850869166857328267761771029389697739470167082304286871099974399765441448453411558724506334092790222752962294149842306881685404326457534018329786111298960644845216191652872597534901",

            // Extra-strong Lucas pseudoprimes. https://oeis.org/A217719
            "989",
            "3239",
            "5777",
            "10877",
            "27971",
            "29681",
            "30739",
            "31631",
            "39059",
            "72389",
            "73919",
            "75077",
            "100127",
            "113573",
            "125249",
            "137549",
            "137801",
            "153931",
            "155819",
            "161027",
            "162133",
            "189419",
            "218321",
            "231703",
            "249331",
            "370229",
            "429479",
            "430127",
            "459191",
            "473891",
            "480689",
            "600059",
            "621781",
            "632249",
            "635627",

            "3673744903",
            "3281593591",
            "2385076987",
            "2738053141",
            "2009621503",
            "1502682721",
            "255866131",
            "117987841",
            "587861",

            "6368689",
            "8725753",
            "80579735209",
            "105919633",
        ];

        let mut rng = DefaultRand::default();
        for s in cases {
            assert!(
                !BigUintExt(big(s)).probably_prime_test(10, &mut rng),
                "composite `{}` test failed",
                s
            );
        }
    }

    #[test]
    fn prime_validate() {
        let cases = [
            "13756265695458089029",
            "2",
            "3",
            "5",
            "7",
            "11",
            "53",
            "61",
            "13496181268022124907",
            "10953742525620032441",
            "17908251027575790097",

            // https://golang.org/issue/638
            "18699199384836356663",

            "98920366548084643601728869055592650835572950932266967461790948584315647051443",
            "94560208308847015747498523884063394671606671904944666360068158221458669711639",

            // https://primes.utm.edu/lists/small/small3.html
            "449417999055441493994709297093108513015373787049558499205492347871729927573118262811508386655998299074566974373711472560655026288668094291699357843464363003144674940345912431129144354948751003607115263071543163",
            "230975859993204150666423538988557839555560243929065415434980904258310530753006723857139742334640122533598517597674807096648905501653461687601339782814316124971547968912893214002992086353183070342498989426570593",

            // ECC primes: https://tools.ietf.org/html/draft-ladd-safecurves-02
            "57896044618658097711785492504343953926634992332820282019728792003956564819949", // Curve25519: 2^255-19
            "6864797660130609714981900799081393217269435300143305409394463459185543183397656052122559640661454554977296311391480858037121987999716643812574028291115057151", // E-521: 2^521-1
        ];

        let mut rng = DefaultRand::default();
        for s in cases {
            assert!(
                BigUintExt(big(s)).probably_prime_test(10, &mut rng),
                "prime `{}` test failed",
                s
            );
        }
    }
}
