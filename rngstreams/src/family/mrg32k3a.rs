//! MRG32k3a combined multiple recursive generator
//!
//! Two order-3 recurrences
//!
//! ```text
//! x1[n] = (1403580 x1[n-2] - 810728 x1[n-3]) mod 4294967087
//! x2[n] = (527612 x2[n-1] - 1370589 x2[n-3]) mod 4294944443
//! ```
//!
//! combined as `x1 - x2 mod M1`, period about 2^191. Streams are 2^127 steps
//! apart and substreams 2^76 steps apart.

use super::mrg::{MrgJump, MrgState};
use super::Family;
use crate::modular::ModVector;

const M1: u64 = 4_294_967_087;
const M2: u64 = 4_294_944_443;

const A12: i64 = 1_403_580;
const A13N: i64 = 810_728;
const A21: i64 = 527_612;
const A23N: i64 = 1_370_589;

const A1P0: [[u64; 3]; 3] = [[0, 1, 0], [0, 0, 1], [M1 - A13N as u64, A12 as u64, 0]];
const A2P0: [[u64; 3]; 3] = [[0, 1, 0], [0, 0, 1], [M2 - A23N as u64, 0, A21 as u64]];

const STEP: Mrg32k3aJump = MrgJump::new(A1P0, A2P0);

static STEP_MAP: Mrg32k3aJump = STEP;
static INVERSE_STEP_MAP: Mrg32k3aJump = STEP.full_period_inverse();

// A^(2^127)
static STREAM_LEAP: Mrg32k3aJump = MrgJump::new(
    [
        [2_427_906_178, 3_580_155_704, 949_770_784],
        [226_153_695, 1_230_515_664, 3_580_155_704],
        [1_988_835_001, 986_791_581, 1_230_515_664],
    ],
    [
        [1_464_411_153, 277_697_599, 1_610_723_613],
        [32_183_930, 1_464_411_153, 1_022_607_788],
        [2_824_425_944, 32_183_930, 2_093_834_863],
    ],
);

static SUBSTREAM_LEAP: Mrg32k3aJump = STEP.pow_log2(76);

pub type Mrg32k3aState = MrgState<M1, M2>;
pub type Mrg32k3aJump = MrgJump<M1, M2>;

/// MRG32k3a family marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Mrg32k3a;

impl Family for Mrg32k3a {
    type State = Mrg32k3aState;
    type Jump = Mrg32k3aJump;

    const NAME: &'static str = "mrg32k3a";

    #[allow(clippy::excessive_precision)]
    const NORM: f64 = 2.328306549295727688e-10;

    const NORM_F32: f32 = 2.328_306_4e-10;

    fn default_base_state() -> Self::State {
        MrgState::splat(12345)
    }

    fn validate_seed(state: &Self::State) -> Result<(), String> {
        state.validate()
    }

    fn next_raw(state: &mut Self::State) -> u64 {
        let [x10, x11, x12] = *state.g1.components();
        let [x20, x21, x22] = *state.g2.components();

        let p1 = (A12 * x11 as i64 - A13N * x10 as i64).rem_euclid(M1 as i64) as u64;
        state.g1 = ModVector::from_reduced([x11, x12, p1]);

        let p2 = (A21 * x22 as i64 - A23N * x20 as i64).rem_euclid(M2 as i64) as u64;
        state.g2 = ModVector::from_reduced([x21, x22, p2]);

        // Range is [1, M1]: equal components map to M1, never to 0
        if p1 > p2 {
            p1 - p2
        } else {
            p1 + M1 - p2
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
