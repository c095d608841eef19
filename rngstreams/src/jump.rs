//! Jump-ahead engine
//!
//! Every family in this crate advances its state with a map that composes: a
//! matrix modulo a prime (MRG families), a GF(2) matrix (LFSR113, Xorwow), or
//! an addition on the counter (Philox). Any offset is then reached in
//! O(log offset) compositions of the one-step map or of its inverse.
//!
//! # Offsets
//!
//! A [`JumpOffset`] `{ e, c }` names the number of steps
//!
//! - `2^e + c` when `e > 0`
//! - `c` when `e == 0`
//! - `-2^|e| + c` when `e < 0`
//!
//! The sign of `c` picks the forward or the inverse step map for the `c`
//! part; the power-of-two part follows the sign of `e`.

use crate::modular::gf2::BitMatrix;
use crate::modular::ModMatrix;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A state-advancing map that can be composed and raised to powers
pub trait LinearMap: Clone {
    /// Map that leaves every state unchanged
    fn identity_map() -> Self;

    /// `self · rhs`: apply `rhs` first, then `self`.
    fn compose(&self, rhs: &Self) -> Self;

    /// `self^k` by repeated squaring.
    fn power(&self, k: u64) -> Self {
        let mut result = Self::identity_map();
        let mut base = self.clone();
        let mut k = k;
        while k > 0 {
            if k & 1 == 1 {
                result = result.compose(&base);
            }
            base = base.compose(&base);
            k >>= 1;
        }
        result
    }

    /// `self^(2^e)` by `e` squarings.
    fn power_log2(&self, e: u32) -> Self {
        let mut result = self.clone();
        for _ in 0..e {
            result = result.compose(&result);
        }
        result
    }
}

impl<const N: usize, const M: u64> LinearMap for ModMatrix<N, M> {
    fn identity_map() -> Self {
        ModMatrix::identity()
    }

    fn compose(&self, rhs: &Self) -> Self {
        self.mul(rhs)
    }

    fn power(&self, k: u64) -> Self {
        self.pow(u128::from(k))
    }

    fn power_log2(&self, e: u32) -> Self {
        self.pow_log2(e)
    }
}

impl<const W: usize> LinearMap for BitMatrix<W> {
    fn identity_map() -> Self {
        BitMatrix::identity()
    }

    fn compose(&self, rhs: &Self) -> Self {
        BitMatrix::compose(self, rhs)
    }
}

/// Signed jump distance `2^e + c` (see module docs for the sign rules)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JumpOffset {
    pub e: i32,
    pub c: i32,
}

impl JumpOffset {
    pub const fn new(e: i32, c: i32) -> Self {
        Self { e, c }
    }

    /// Offset of exactly `c` steps.
    pub const fn steps(c: i32) -> Self {
        Self { e: 0, c }
    }

    /// True when some part of the offset runs backward.
    pub const fn needs_inverse(&self) -> bool {
        self.e < 0 || self.c < 0
    }

    /// Signed step count, when it fits in an `i128`.
    ///
    /// # Example
    /// ```
    /// use rngstreams::jump::JumpOffset;
    ///
    /// assert_eq!(JumpOffset::new(3, 1).total(), Some(9));
    /// assert_eq!(JumpOffset::new(0, -4).total(), Some(-4));
    /// assert_eq!(JumpOffset::new(-2, 1).total(), Some(-3));
    /// ```
    pub fn total(&self) -> Option<i128> {
        let power = match self.e.cmp(&0) {
            Ordering::Greater => 1i128.checked_shl(self.e as u32).filter(|p| *p > 0)?,
            Ordering::Less => -(1i128.checked_shl(self.e.unsigned_abs()).filter(|p| *p > 0)?),
            Ordering::Equal => 0,
        };
        Some(power + i128::from(self.c))
    }
}

/// Build the map advancing a state by `offset` steps.
///
/// Returns `None` when the offset runs backward and the family has no inverse
/// step map.
///
/// # Example
/// ```
/// use rngstreams::jump::{offset_map, JumpOffset, LinearMap};
/// use rngstreams::modular::ModMatrix;
///
/// let a = ModMatrix::<2, 101>::from_rows([[0, 1], [3, 5]]);
/// let by_nine = offset_map(&a, None, JumpOffset::new(3, 1)).unwrap();
/// assert_eq!(by_nine, a.power(9));
/// assert!(offset_map(&a, None, JumpOffset::new(0, -1)).is_none());
/// ```
pub fn offset_map<L: LinearMap>(forward: &L, inverse: Option<&L>, offset: JumpOffset) -> Option<L> {
    let linear = if offset.c >= 0 {
        forward.power(u64::from(offset.c.unsigned_abs()))
    } else {
        inverse?.power(u64::from(offset.c.unsigned_abs()))
    };

    match offset.e.cmp(&0) {
        Ordering::Greater => Some(forward.power_log2(offset.e.unsigned_abs()).compose(&linear)),
        Ordering::Less => Some(inverse?.power_log2(offset.e.unsigned_abs()).compose(&linear)),
        Ordering::Equal => Some(linear),
    }
}
