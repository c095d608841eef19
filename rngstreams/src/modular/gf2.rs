//! Linear maps over GF(2)
//!
//! Shift-register steps (LFSR113, the xorshift register of Xorwow) are linear
//! over GF(2) once the state is read as a bit vector. A [`BitMatrix`] stores
//! such a map on `32 * W` bits as the images of the basis vectors, so it is
//! built by probing the step function itself rather than by transcribing
//! shift tables.

use std::fmt;

/// GF(2) linear map on `32 * W` bits, stored column-wise
#[derive(Clone, PartialEq, Eq)]
pub struct BitMatrix<const W: usize> {
    /// `columns[j]` is the image of basis vector `j`
    /// (bit `j % 32` of word `j / 32`)
    columns: Vec<[u32; W]>,
}

fn basis<const W: usize>(j: usize) -> [u32; W] {
    let mut v = [0u32; W];
    v[j / 32] = 1 << (j % 32);
    v
}

impl<const W: usize> BitMatrix<W> {
    /// Dimension of the underlying bit vector
    pub const BITS: usize = 32 * W;

    pub fn identity() -> Self {
        Self {
            columns: (0..Self::BITS).map(basis::<W>).collect(),
        }
    }

    /// Capture a linear step function as a matrix.
    ///
    /// `step` must be linear over GF(2) (xor of shifted/masked copies of the
    /// input, no constant term); the matrix then reproduces it exactly.
    pub fn from_linear_fn(step: impl Fn([u32; W]) -> [u32; W]) -> Self {
        Self {
            columns: (0..Self::BITS).map(|j| step(basis::<W>(j))).collect(),
        }
    }

    pub fn apply(&self, x: &[u32; W]) -> [u32; W] {
        let mut acc = [0u32; W];
        for (j, column) in self.columns.iter().enumerate() {
            if (x[j / 32] >> (j % 32)) & 1 == 1 {
                for (word, bits) in acc.iter_mut().zip(column.iter()) {
                    *word ^= *bits;
                }
            }
        }
        acc
    }

    /// `self · rhs`: apply `rhs` first, then `self`.
    pub fn compose(&self, rhs: &Self) -> Self {
        Self {
            columns: rhs.columns.iter().map(|c| self.apply(c)).collect(),
        }
    }
}

impl<const W: usize> fmt::Debug for BitMatrix<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BitMatrix")
            .field("bits", &Self::BITS)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xorshift32([x]: [u32; 1]) -> [u32; 1] {
        let mut x = x;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        [x]
    }

    #[test]
    fn test_from_linear_fn_reproduces_step() {
        let m = BitMatrix::<1>::from_linear_fn(xorshift32);
        for seed in [1u32, 0xDEAD_BEEF, 0x8000_0001, 12345] {
            assert_eq!(m.apply(&[seed]), xorshift32([seed]));
        }
    }

    #[test]
    fn test_compose_is_sequential_application() {
        let m = BitMatrix::<1>::from_linear_fn(xorshift32);
        let m3 = m.compose(&m).compose(&m);
        let expected = xorshift32(xorshift32(xorshift32([42])));
        assert_eq!(m3.apply(&[42]), expected);
    }

    #[test]
    fn test_identity_is_neutral() {
        let id = BitMatrix::<2>::identity();
        assert_eq!(id.apply(&[7, 0xFFFF_0000]), [7, 0xFFFF_0000]);
        let m = BitMatrix::<2>::from_linear_fn(|[a, b]| [b, a ^ (b << 1)]);
        assert_eq!(id.compose(&m), m);
        assert_eq!(m.compose(&id), m);
    }
}
