//! Twin-prime table sizes.
//!
//! The slot table length `n` must satisfy "`n` and `n - 2` are both prime"
//! so the double-hashing step `1 + h % (n - 2)` is always coprime with `n`
//! and a probe visits every slot before repeating.

/// Smallest valid table length.
pub(crate) const MIN_TABLE_LEN: usize = 7;

/// Trial division; table lengths stay small enough for this to be cheap
/// relative to the rehash that follows.
pub(crate) fn is_prime(n: usize) -> bool {
    if n < 2 {
        return false;
    }
    if n < 4 {
        return true;
    }
    if n % 2 == 0 || n % 3 == 0 {
        return false;
    }
    let mut d = 5usize;
    while d.saturating_mul(d) <= n {
        if n % d == 0 || n % (d + 2) == 0 {
            return false;
        }
        d += 6;
    }
    true
}

/// Whether `n` is the larger member of a twin-prime pair.
pub(crate) fn is_twin_prime(n: usize) -> bool {
    n >= 5 && is_prime(n) && is_prime(n - 2)
}

/// Smallest larger-of-twin-primes `p` with `p >= max(n, MIN_TABLE_LEN)`.
pub(crate) fn twin_prime_at_least(n: usize) -> usize {
    let mut p = n.max(MIN_TABLE_LEN);
    // Every twin pair above (5, 7) straddles a multiple of six, so the
    // larger member is 1 mod 6.
    p += (7 - p % 6) % 6;
    while !is_twin_prime(p) {
        p += 6;
    }
    p
}
