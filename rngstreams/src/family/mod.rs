//! Generator families
//!
//! Each family is a zero-sized marker type implementing [`Family`]: its state
//! layout, one-step recurrence, seed rules and the jump maps the creator and
//! the substream protocol apply. Streams and creators are generic over the
//! family, so the creation and jump logic is written once.
//!
//! | Family | Kind | Stream leap | Substream leap |
//! |---|---|---|---|
//! | [`Mrg32k3a`] | combined MRG | 2^127 | 2^76 |
//! | [`Mrg31k3p`] | combined MRG | 2^134 | 2^72 |
//! | [`Lfsr113`] | combined LFSR | 2^100 | 2^55 |
//! | [`Philox432`] | counter-based | 2^100 | 2^64 |
//! | [`Xorwow`] | xorshift + Weyl | 2^100 | 2^67 |

mod lfsr113;
mod mrg;
mod mrg31k3p;
mod mrg32k3a;
mod philox432;
mod xorwow;

pub use lfsr113::{Lfsr113, Lfsr113Jump, Lfsr113State};
pub use mrg::{MrgJump, MrgState};
pub use mrg31k3p::{Mrg31k3p, Mrg31k3pJump, Mrg31k3pState};
pub use mrg32k3a::{Mrg32k3a, Mrg32k3aJump, Mrg32k3aState};
pub use philox432::{philox4x32_10, CounterOffset, Philox432, Philox432State};
pub use xorwow::{Xorwow, XorwowJump, XorwowState};

use crate::jump::{offset_map, JumpOffset, LinearMap};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;

/// A pseudorandom generator family with jump-ahead support
pub trait Family: fmt::Debug + Clone + Copy + PartialEq + Eq + Send + Sync + 'static {
    /// Complete recurrence state of one cursor
    type State: fmt::Debug
        + Clone
        + Copy
        + PartialEq
        + Eq
        + Send
        + Sync
        + Serialize
        + DeserializeOwned;

    /// Map advancing a state by a fixed number of steps
    type Jump: LinearMap + fmt::Debug + Send + Sync + 'static;

    /// Family name, recorded in snapshots
    const NAME: &'static str;

    /// Multiplier taking a raw output to the unit interval
    const NORM: f64;

    /// Single-precision multiplier; the largest raw output, rounded to `f32`,
    /// still maps below 1
    const NORM_F32: f32;

    /// Seed of the default creator
    fn default_base_state() -> Self::State;

    /// Check that `state` may seed a creator; the error names the offending
    /// component.
    fn validate_seed(state: &Self::State) -> Result<(), String>;

    /// Advance `state` one step and return the raw output.
    fn next_raw(state: &mut Self::State) -> u64;

    fn apply_jump(jump: &Self::Jump, state: &mut Self::State);

    /// One-step map
    fn step_map() -> &'static Self::Jump;

    /// Inverse of [`Family::step_map`], when the family can run backward
    fn inverse_step_map() -> Option<&'static Self::Jump>;

    /// Default distance between consecutive streams of a creator
    fn stream_leap() -> &'static Self::Jump;

    /// Distance between consecutive substreams of a stream
    fn substream_leap() -> &'static Self::Jump;

    /// Raw state components in declared order, for info dumps
    fn components(state: &Self::State) -> Vec<u64>;

    /// Map advancing a state by `offset` steps; `None` when the offset runs
    /// backward and the family has no inverse.
    fn jump(offset: JumpOffset) -> Option<Self::Jump> {
        offset_map(Self::step_map(), Self::inverse_step_map(), offset)
    }
}
