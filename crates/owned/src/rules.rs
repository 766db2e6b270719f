//! Numeric rules behind catch, release and rename.

use rand::Rng;
use rand::seq::SliceRandom;

/// Release draw set: every prime up to 97.
pub const PRIMES_UP_TO_97: [u64; 25] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97,
];

/// Chance, in percent, that a catch attempt succeeds.
pub const CATCH_SUCCESS_PERCENT: u32 = 50;

/// `fib(0) = 0`, `fib(1) = 1`, `fib(n) = fib(n-1) + fib(n-2)`.
///
/// Saturates at `u128::MAX` (from `n = 187` on).
pub fn fibonacci(n: u32) -> u128 {
    let (mut a, mut b) = (0u128, 1u128);
    for _ in 0..n {
        let next = a.saturating_add(b);
        a = b;
        b = next;
    }
    a
}

/// Trial-division primality check.
pub fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    let mut d = 2u64;
    while d.saturating_mul(d) <= n {
        if n % d == 0 {
            return false;
        }
        d += 1;
    }
    true
}

/// Picks one candidate uniformly at random, `None` if there are none.
pub fn draw_release_value<R: Rng + ?Sized>(rng: &mut R, candidates: &[u64]) -> Option<u64> {
    candidates.choose(rng).copied()
}

/// Rolls a catch attempt.
pub fn catch_succeeds<R: Rng + ?Sized>(rng: &mut R) -> bool {
    rng.gen_range(0..100) < CATCH_SUCCESS_PERCENT
}
