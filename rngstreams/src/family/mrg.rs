//! State and jump types shared by the combined MRG families
//!
//! A combined MRG runs two order-3 recurrences, one modulo `M1` and one modulo
//! `M2`, and combines their outputs. Both recurrences are linear, so a jump of
//! any length is one 3x3 matrix per component.

use crate::error::{Result, RngError};
use crate::jump::LinearMap;
use crate::modular::{ModMatrix, ModVector};
use serde::{Deserialize, Serialize};

/// State of a two-component MRG: `g1` modulo `M1`, `g2` modulo `M2`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MrgState<const M1: u64, const M2: u64> {
    pub g1: ModVector<3, M1>,
    pub g2: ModVector<3, M2>,
}

impl<const M1: u64, const M2: u64> MrgState<M1, M2> {
    /// Build a state from raw components.
    ///
    /// Fails with `InvalidSeed` when a component is not below its modulus.
    /// All-zero vectors are representable here and rejected when the state is
    /// used as a seed.
    pub fn from_components(g1: [u64; 3], g2: [u64; 3]) -> Result<Self> {
        if let Some(i) = g1.iter().position(|&x| x >= M1) {
            return Err(RngError::invalid_seed(
                "from_components",
                format!("seed.g1[{}] >= M1 ({})", i, M1),
            ));
        }
        if let Some(i) = g2.iter().position(|&x| x >= M2) {
            return Err(RngError::invalid_seed(
                "from_components",
                format!("seed.g2[{}] >= M2 ({})", i, M2),
            ));
        }
        Ok(Self {
            g1: ModVector::from_reduced(g1),
            g2: ModVector::from_reduced(g2),
        })
    }

    pub(crate) const fn splat(value: u64) -> Self {
        Self {
            g1: ModVector::from_reduced([value; 3]),
            g2: ModVector::from_reduced([value; 3]),
        }
    }

    pub(crate) fn validate(&self) -> std::result::Result<(), String> {
        if self.g1.is_zero() {
            return Err("seed.g1 = (0,0,0)".to_string());
        }
        if self.g2.is_zero() {
            return Err("seed.g2 = (0,0,0)".to_string());
        }
        Ok(())
    }

    pub(crate) fn components(&self) -> Vec<u64> {
        self.g1
            .components()
            .iter()
            .chain(self.g2.components().iter())
            .copied()
            .collect()
    }

    pub(crate) fn apply(&mut self, jump: &MrgJump<M1, M2>) {
        self.g1 = jump.g1.mul_vec(&self.g1);
        self.g2 = jump.g2.mul_vec(&self.g2);
    }
}

/// One jump matrix per MRG component
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MrgJump<const M1: u64, const M2: u64> {
    pub g1: ModMatrix<3, M1>,
    pub g2: ModMatrix<3, M2>,
}

impl<const M1: u64, const M2: u64> MrgJump<M1, M2> {
    pub const fn new(g1: [[u64; 3]; 3], g2: [[u64; 3]; 3]) -> Self {
        Self {
            g1: ModMatrix::from_rows(g1),
            g2: ModMatrix::from_rows(g2),
        }
    }

    /// Both components raised to `2^e`.
    pub const fn pow_log2(&self, e: u32) -> Self {
        Self {
            g1: self.g1.pow_log2(e),
            g2: self.g2.pow_log2(e),
        }
    }

    /// Inverse of a full-period step map.
    ///
    /// A full-period order-3 recurrence modulo a prime `m` has a transition
    /// matrix of multiplicative order `m^3 - 1`, so its inverse is
    /// `A^(m^3 - 2)`.
    pub const fn full_period_inverse(&self) -> Self {
        Self {
            g1: self.g1.pow(M1 as u128 * M1 as u128 * M1 as u128 - 2),
            g2: self.g2.pow(M2 as u128 * M2 as u128 * M2 as u128 - 2),
        }
    }
}

impl<const M1: u64, const M2: u64> LinearMap for MrgJump<M1, M2> {
    fn identity_map() -> Self {
        Self {
            g1: ModMatrix::identity(),
            g2: ModMatrix::identity(),
        }
    }

    fn compose(&self, rhs: &Self) -> Self {
        Self {
            g1: self.g1.mul(&rhs.g1),
            g2: self.g2.mul(&rhs.g2),
        }
    }

    fn power(&self, k: u64) -> Self {
        Self {
            g1: self.g1.pow(u128::from(k)),
            g2: self.g2.pow(u128::from(k)),
        }
    }

    fn power_log2(&self, e: u32) -> Self {
        self.pow_log2(e)
    }
}
