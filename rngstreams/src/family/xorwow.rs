//! Xorwow: Marsaglia's xorshift register plus a Weyl sequence
//!
//! The 160-bit xorshift register is linear over GF(2) and the Weyl counter is
//! an addition modulo 2^32, so a jump is a register matrix paired with a
//! counter increment.

use super::Family;
use crate::jump::LinearMap;
use crate::modular::gf2::BitMatrix;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

const WEYL_STEP: u32 = 362_437;

/// Register period is 2^160 - 1
const REGISTER_BITS: u32 = 160;

fn step_register(v: [u32; 5]) -> [u32; 5] {
    let t = v[0] ^ (v[0] >> 2);
    let last = (v[4] ^ (v[4] << 4)) ^ (t ^ (t << 1));
    [v[1], v[2], v[3], v[4], last]
}

static STEP: LazyLock<XorwowJump> = LazyLock::new(|| XorwowJump {
    register: BitMatrix::from_linear_fn(step_register),
    weyl: WEYL_STEP,
});

// M^(2^160 - 2): the bits 1..160 of the exponent are all set
static INVERSE_STEP: LazyLock<XorwowJump> = LazyLock::new(|| {
    let mut square = STEP.register.clone();
    let mut register = BitMatrix::identity();
    for _ in 1..REGISTER_BITS {
        square = square.compose(&square);
        register = register.compose(&square);
    }
    XorwowJump {
        register,
        weyl: WEYL_STEP.wrapping_neg(),
    }
});

static STREAM_LEAP: LazyLock<XorwowJump> = LazyLock::new(|| STEP.power_log2(100));
static SUBSTREAM_LEAP: LazyLock<XorwowJump> = LazyLock::new(|| STEP.power_log2(67));

/// Xorshift register and Weyl counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct XorwowState {
    pub v: [u32; 5],
    pub d: u32,
}

/// Register matrix plus Weyl increment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XorwowJump {
    register: BitMatrix<5>,
    weyl: u32,
}

impl LinearMap for XorwowJump {
    fn identity_map() -> Self {
        Self {
            register: BitMatrix::identity(),
            weyl: 0,
        }
    }

    fn compose(&self, rhs: &Self) -> Self {
        Self {
            register: self.register.compose(&rhs.register),
            weyl: self.weyl.wrapping_add(rhs.weyl),
        }
    }
}

/// Xorwow family marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Xorwow;

impl Family for Xorwow {
    type State = XorwowState;
    type Jump = XorwowJump;

    const NAME: &'static str = "xorwow";

    const NORM: f64 = 2.3283064365386963e-10;

    const NORM_F32: f32 = 2.328_306_3e-10;

    fn default_base_state() -> Self::State {
        XorwowState {
            v: [123_456_789, 362_436_069, 521_288_629, 88_675_123, 5_783_321],
            d: 6_615_241,
        }
    }

    fn validate_seed(state: &Self::State) -> Result<(), String> {
        if state.v.iter().all(|&w| w == 0) {
            return Err("seed.v = (0,0,0,0,0)".to_string());
        }
        Ok(())
    }

    fn next_raw(state: &mut Self::State) -> u64 {
        state.v = step_register(state.v);
        state.d = state.d.wrapping_add(WEYL_STEP);
        u64::from(state.d.wrapping_add(state.v[4]))
    }

    fn apply_jump(jump: &Self::Jump, state: &mut Self::State) {
        state.v = jump.register.apply(&state.v);
        state.d = state.d.wrapping_add(jump.weyl);
    }

    fn step_map() -> &'static Self::Jump {
        &STEP
    }

    fn inverse_step_map() -> Option<&'static Self::Jump> {
        Some(&INVERSE_STEP)
    }

    fn stream_leap() -> &'static Self::Jump {
        &STREAM_LEAP
    }

    fn substream_leap() -> &'static Self::Jump {
        &SUBSTREAM_LEAP
    }

    fn components(state: &Self::State) -> Vec<u64> {
        state
            .v
            .iter()
            .chain(std::iter::once(&state.d))
            .map(|&w| u64::from(w))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recurrence_agrees_with_step_matrix() {
        let mut stepped = Xorwow::default_base_state();
        let mut jumped = stepped;
        for _ in 0..10 {
            Xorwow::next_raw(&mut stepped);
            Xorwow::apply_jump(&STEP, &mut jumped);
            assert_eq!(stepped, jumped);
        }
    }

    #[test]
    fn test_inverse_step_undoes_step() {
        let start = Xorwow::default_base_state();
        let mut state = start;
        Xorwow::next_raw(&mut state);
        Xorwow::apply_jump(&INVERSE_STEP, &mut state);
        assert_eq!(state, start);
        assert_eq!(STEP.compose(&INVERSE_STEP), XorwowJump::identity_map());
    }

    #[test]
    fn test_zero_register_rejected() {
        let state = XorwowState { v: [0; 5], d: 17 };
        assert!(Xorwow::validate_seed(&state).is_err());
    }

    #[test]
    fn test_leap_weyl_increments() {
        // 2^100 and 2^67 steps are multiples of 2^32
        assert_eq!(STREAM_LEAP.weyl, 0);
        assert_eq!(SUBSTREAM_LEAP.weyl, 0);
    }
}
