//! Fixed-dimension modular linear algebra
//!
//! [`ModMatrix`] and [`ModVector`] carry their dimension and modulus in the
//! type, so a jump matrix built for one sub-generator can never be applied to
//! the other sub-generator's state.
//!
//! # Overflow
//!
//! Products are accumulated in `u128` and reduced after every term, so
//! intermediate values up to `(M - 1)^2` are exact for any modulus below 2^64.
//!
//! # Const evaluation
//!
//! All arithmetic is `const fn`. The MRG families evaluate their inverse and
//! leap matrices at compile time, and the same code runs unchanged at run
//! time on any thread.

pub mod gf2;

use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};

/// Vector of `N` components, each reduced into `[0, M)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModVector<const N: usize, const M: u64>([u64; N]);

impl<const N: usize, const M: u64> ModVector<N, M> {
    /// Modulus every component is reduced by
    pub const MODULUS: u64 = M;

    /// Build a vector, or `None` when some component is not below `M`.
    ///
    /// # Example
    /// ```
    /// use rngstreams::modular::ModVector;
    ///
    /// assert!(ModVector::<3, 7>::new([1, 2, 6]).is_some());
    /// assert!(ModVector::<3, 7>::new([1, 2, 7]).is_none());
    /// ```
    pub const fn new(components: [u64; N]) -> Option<Self> {
        let mut i = 0;
        while i < N {
            if components[i] >= M {
                return None;
            }
            i += 1;
        }
        Some(Self(components))
    }

    /// Wrap components already known to be reduced.
    pub(crate) const fn from_reduced(components: [u64; N]) -> Self {
        debug_assert!(Self::new(components).is_some());
        Self(components)
    }

    pub const fn components(&self) -> &[u64; N] {
        &self.0
    }

    /// True when every component is zero (a fixed point of any linear step).
    pub const fn is_zero(&self) -> bool {
        let mut i = 0;
        while i < N {
            if self.0[i] != 0 {
                return false;
            }
            i += 1;
        }
        true
    }
}

impl<const N: usize, const M: u64> Serialize for ModVector<N, M> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.iter())
    }
}

impl<'de, const N: usize, const M: u64> Deserialize<'de> for ModVector<N, M> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let values = Vec::<u64>::deserialize(deserializer)?;
        let len = values.len();
        let components: [u64; N] = values
            .try_into()
            .map_err(|_| de::Error::invalid_length(len, &"a fixed-size state vector"))?;
        Self::new(components).ok_or_else(|| {
            de::Error::custom(format!("state component not reduced modulo {}", M))
        })
    }
}

/// `N x N` matrix with entries reduced into `[0, M)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModMatrix<const N: usize, const M: u64> {
    rows: [[u64; N]; N],
}

impl<const N: usize, const M: u64> ModMatrix<N, M> {
    /// Build from row-major entries, reducing each one modulo `M`.
    pub const fn from_rows(rows: [[u64; N]; N]) -> Self {
        let mut reduced = rows;
        let mut i = 0;
        while i < N {
            let mut j = 0;
            while j < N {
                reduced[i][j] = rows[i][j] % M;
                j += 1;
            }
            i += 1;
        }
        Self { rows: reduced }
    }

    pub const fn identity() -> Self {
        let mut rows = [[0u64; N]; N];
        let mut i = 0;
        while i < N {
            rows[i][i] = 1 % M;
            i += 1;
        }
        Self { rows }
    }

    pub const fn rows(&self) -> &[[u64; N]; N] {
        &self.rows
    }

    /// `(self · v) mod M`
    pub const fn mul_vec(&self, v: &ModVector<N, M>) -> ModVector<N, M> {
        let mut out = [0u64; N];
        let mut i = 0;
        while i < N {
            let mut acc: u128 = 0;
            let mut k = 0;
            while k < N {
                acc = (acc + self.rows[i][k] as u128 * v.0[k] as u128) % M as u128;
                k += 1;
            }
            out[i] = acc as u64;
            i += 1;
        }
        ModVector(out)
    }

    /// `(self · rhs) mod M`
    pub const fn mul(&self, rhs: &Self) -> Self {
        let mut out = [[0u64; N]; N];
        let mut i = 0;
        while i < N {
            let mut j = 0;
            while j < N {
                let mut acc: u128 = 0;
                let mut k = 0;
                while k < N {
                    acc = (acc + self.rows[i][k] as u128 * rhs.rows[k][j] as u128)
                        % M as u128;
                    k += 1;
                }
                out[i][j] = acc as u64;
                j += 1;
            }
            i += 1;
        }
        Self { rows: out }
    }

    /// `self^k mod M` by repeated squaring: O(log k) products.
    pub const fn pow(&self, k: u128) -> Self {
        let mut result = Self::identity();
        let mut base = *self;
        let mut k = k;
        while k > 0 {
            if k & 1 == 1 {
                result = result.mul(&base);
            }
            base = base.mul(&base);
            k >>= 1;
        }
        result
    }

    /// `self^(2^e) mod M` by `e` successive squarings.
    pub const fn pow_log2(&self, e: u32) -> Self {
        let mut result = *self;
        let mut i = 0;
        while i < e {
            result = result.mul(&result);
            i += 1;
        }
        result
    }
}
