//! LFSR113 combined Tausworthe generator
//!
//! Four 32-bit linear feedback shift registers of periods close to 2^31,
//! 2^29, 2^28 and 2^25, xor-combined. Each component step discards low bits
//! of the register, so the step map is singular and the family cannot run
//! backward.

use super::Family;
use crate::jump::LinearMap;
use crate::modular::gf2::BitMatrix;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Smallest admissible value of each component
const MIN_SEED: [u32; 4] = [2, 8, 16, 128];

/// `(q, s, mask, r)` per component:
/// `b = ((z << q) ^ z) >> s; z = ((z & mask) << r) ^ b`
const SHIFTS: [(u32, u32, u32, u32); 4] = [
    (6, 13, 4_294_967_294, 18),
    (2, 27, 4_294_967_288, 2),
    (13, 21, 4_294_967_280, 7),
    (3, 12, 4_294_967_168, 13),
];

fn component_step(i: usize, z: u32) -> u32 {
    let (q, s, mask, r) = SHIFTS[i];
    let b = ((z << q) ^ z) >> s;
    ((z & mask) << r) ^ b
}

static STEP: LazyLock<Lfsr113Jump> = LazyLock::new(|| {
    Lfsr113Jump(std::array::from_fn(|i| {
        BitMatrix::<1>::from_linear_fn(move |[z]: [u32; 1]| [component_step(i, z)])
    }))
});
static STREAM_LEAP: LazyLock<Lfsr113Jump> = LazyLock::new(|| STEP.power_log2(100));
static SUBSTREAM_LEAP: LazyLock<Lfsr113Jump> = LazyLock::new(|| STEP.power_log2(55));

/// Four Tausworthe registers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Lfsr113State {
    pub z: [u32; 4],
}

impl Lfsr113State {
    pub const fn new(z: [u32; 4]) -> Self {
        Self { z }
    }
}

/// One GF(2) matrix per register
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lfsr113Jump([BitMatrix<1>; 4]);

impl LinearMap for Lfsr113Jump {
    fn identity_map() -> Self {
        Self(std::array::from_fn(|_| BitMatrix::identity()))
    }

    fn compose(&self, rhs: &Self) -> Self {
        Self(std::array::from_fn(|i| self.0[i].compose(&rhs.0[i])))
    }
}

/// LFSR113 family marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Lfsr113;

impl Family for Lfsr113 {
    type State = Lfsr113State;
    type Jump = Lfsr113Jump;

    const NAME: &'static str = "lfsr113";

    const NORM: f64 = 2.3283064365386963e-10;

    const NORM_F32: f32 = 2.328_306_3e-10;

    fn default_base_state() -> Self::State {
        Lfsr113State::new([987_654_321; 4])
    }

    fn validate_seed(state: &Self::State) -> Result<(), String> {
        match (0..4).find(|&i| state.z[i] < MIN_SEED[i]) {
            Some(i) => Err(format!("seed.z[{}] < {}", i, MIN_SEED[i])),
            None => Ok(()),
        }
    }

    fn next_raw(state: &mut Self::State) -> u64 {
        for (i, z) in state.z.iter_mut().enumerate() {
            *z = component_step(i, *z);
        }
        u64::from(state.z[0] ^ state.z[1] ^ state.z[2] ^ state.z[3])
    }

    fn apply_jump(jump: &Self::Jump, state: &mut Self::State) {
        for (z, m) in state.z.iter_mut().zip(jump.0.iter()) {
            *z = m.apply(&[*z])[0];
        }
    }

    fn step_map() -> &'static Self::Jump {
        &STEP
    }

    fn inverse_step_map() -> Option<&'static Self::Jump> {
        None
    }

    fn stream_leap() -> &'static Self::Jump {
        &STREAM_LEAP
    }

    fn substream_leap() -> &'static Self::Jump {
        &SUBSTREAM_LEAP
    }

    fn components(state: &Self::State) -> Vec<u64> {
        state.z.iter().map(|&z| u64::from(z)).collect()
    }
}
