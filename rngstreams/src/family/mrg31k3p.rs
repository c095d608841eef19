//! MRG31k3p combined multiple recursive generator
//!
//! ```text
//! x1[n] = (2^22 x1[n-2] + (2^7 + 1) x1[n-3]) mod (2^31 - 1)
//! x2[n] = (2^15 x2[n-1] + (2^15 + 1) x2[n-3]) mod 2147462579
//! ```
//!
//! The newest value is stored first: `g[0] = x[n-1]`.

use super::mrg::{MrgJump, MrgState};
use super::Family;
use crate::modular::ModVector;

const M1: u64 = 2_147_483_647;
const M2: u64 = 2_147_462_579;

const A1P0: [[u64; 3]; 3] = [[0, 4_194_304, 129], [1, 0, 0], [0, 1, 0]];
const A2P0: [[u64; 3]; 3] = [[32_768, 0, 32_769], [1, 0, 0], [0, 1, 0]];

const STEP: Mrg31k3pJump = MrgJump::new(A1P0, A2P0);

static STEP_MAP: Mrg31k3pJump = STEP;
static INVERSE_STEP_MAP: Mrg31k3pJump = STEP.full_period_inverse();
static STREAM_LEAP: Mrg31k3pJump = STEP.pow_log2(134);
static SUBSTREAM_LEAP: Mrg31k3pJump = STEP.pow_log2(72);

pub type Mrg31k3pState = MrgState<M1, M2>;
pub type Mrg31k3pJump = MrgJump<M1, M2>;

/// MRG31k3p family marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Mrg31k3p;

impl Family for Mrg31k3p {
    type State = Mrg31k3pState;
    type Jump = Mrg31k3pJump;

    const NAME: &'static str = "mrg31k3p";

    // 2^-31
    const NORM: f64 = 4.656_612_873_077_392_578_125e-10;

    const NORM_F32: f32 = 4.656_612_6e-10;

    fn default_base_state() -> Self::State {
        MrgState::splat(12345)
    }

    fn validate_seed(state: &Self::State) -> Result<(), String> {
        state.validate()
    }

    fn next_raw(state: &mut Self::State) -> u64 {
        let [x10, x11, x12] = *state.g1.components();
        let [x20, x21, x22] = *state.g2.components();

        let y1 = (A1P0[0][1] * x11 + A1P0[0][2] * x12) % M1;
        state.g1 = ModVector::from_reduced([y1, x10, x11]);

        let y2 = (A2P0[0][0] * x20 + A2P0[0][2] * x22) % M2;
        state.g2 = ModVector::from_reduced([y2, x20, x21]);

        if y1 <= y2 {
            y1 + M1 - y2
        } else {
            y1 - y2
        }
    }

    fn apply_jump(jump: &Self::Jump, state: &mut Self::State) {
        state.apply(jump);
    }

    fn step_map() -> &'static Self::Jump {
        &STEP_MAP
    }

    fn inverse_step_map() -> Option<&'static Self::Jump> {
        Some(&INVERSE_STEP_MAP)
    }

    fn stream_leap() -> &'static Self::Jump {
        &STREAM_LEAP
    }

    fn substream_leap() -> &'static Self::Jump {
        &SUBSTREAM_LEAP
    }

    fn components(state: &Self::State) -> Vec<u64> {
        state.components()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jump::LinearMap;

    #[test]
    fn test_norm_is_two_pow_minus_31() {
        assert_eq!(Mrg31k3p::NORM, 1.0 / (1u64 << 31) as f64);
    }

    #[test]
    fn test_inverse_step() {
        assert_eq!(STEP.compose(&INVERSE_STEP_MAP), Mrg31k3pJump::identity_map());
        assert_eq!(INVERSE_STEP_MAP.compose(&STEP), Mrg31k3pJump::identity_map());
    }

    #[test]
    fn test_recurrence_agrees_with_step_matrix() {
        let mut stepped = Mrg31k3p::default_base_state();
        let mut jumped = stepped;
        for _ in 0..10 {
            Mrg31k3p::next_raw(&mut stepped);
            Mrg31k3p::apply_jump(&STEP, &mut jumped);
            assert_eq!(stepped, jumped);
        }
    }

    #[test]
    fn test_leaps_compose_from_step() {
        assert_eq!(SUBSTREAM_LEAP.power_log2(62), STREAM_LEAP);
    }

    #[test]
    fn test_first_output_from_default_seed() {
        let mut state = Mrg31k3p::default_base_state();
        assert_eq!(Mrg31k3p::next_raw(&mut state), 1_579_097_239);
    }
}
