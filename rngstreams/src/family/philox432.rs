//! Philox4x32-10 counter-based generator
//!
//! The output at position `p` is word `p mod 4` of the Philox4x32-10 bijection
//! applied to the 128-bit counter `p / 4` under a fixed 64-bit key. A state is
//! therefore just a position, and a jump of any length is an addition modulo
//! 2^130.

use super::Family;
use crate::jump::LinearMap;
use serde::{Deserialize, Serialize};

// Philox round constants
const PHILOX_M4X32_0: u32 = 0xD2511F53;
const PHILOX_M4X32_1: u32 = 0xCD9E8D57;
const PHILOX_W32_0: u32 = 0x9E3779B9;
const PHILOX_W32_1: u32 = 0xBB67AE85;

/// Outputs produced per counter value
const DECK_SIZE: u32 = 4;

static STEP: CounterOffset = CounterOffset::new(0, 1);
// -1 modulo 2^130
static INVERSE_STEP: CounterOffset = CounterOffset::new(u128::MAX, DECK_SIZE - 1);
// 2^100 outputs
static STREAM_LEAP: CounterOffset = CounterOffset::new(1 << 98, 0);
// 2^64 outputs
static SUBSTREAM_LEAP: CounterOffset = CounterOffset::new(1 << 62, 0);

#[inline]
fn philox_round(ctr: &mut [u32; 4], key: &[u32; 2]) {
    let p0 = u64::from(ctr[0]) * u64::from(PHILOX_M4X32_0);
    let p1 = u64::from(ctr[2]) * u64::from(PHILOX_M4X32_1);

    *ctr = [
        (p1 >> 32) as u32 ^ ctr[1] ^ key[0],
        p1 as u32,
        (p0 >> 32) as u32 ^ ctr[3] ^ key[1],
        p0 as u32,
    ];
}

/// The Philox4x32-10 bijection: ten rounds with a Weyl-bumped key.
///
/// # Example
/// ```
/// use rngstreams::family::philox4x32_10;
///
/// let out = philox4x32_10([0; 4], [0; 2]);
/// assert_eq!(out, [0x6627e8d5, 0xe169c58d, 0xbc57ac4c, 0x9b00dbd8]);
/// ```
pub fn philox4x32_10(counter: [u32; 4], key: [u32; 2]) -> [u32; 4] {
    let mut ctr = counter;
    let mut key = key;
    for _ in 0..10 {
        philox_round(&mut ctr, &key);
        key[0] = key[0].wrapping_add(PHILOX_W32_0);
        key[1] = key[1].wrapping_add(PHILOX_W32_1);
    }
    ctr
}

fn counter_to_u128(counter: &[u32; 4]) -> u128 {
    counter
        .iter()
        .rev()
        .fold(0u128, |acc, &w| (acc << 32) | u128::from(w))
}

fn u128_to_counter(value: u128) -> [u32; 4] {
    std::array::from_fn(|i| (value >> (32 * i)) as u32)
}

/// Philox cursor: counter block, key and position within the block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Philox432State {
    /// 128-bit counter, word 0 least significant
    pub counter: [u32; 4],
    pub key: [u32; 2],
    /// Next word of the current block to return, in `[0, 4)`
    pub deck_index: u32,
}

impl Philox432State {
    pub const fn new(counter: [u32; 4], key: [u32; 2]) -> Self {
        Self {
            counter,
            key,
            deck_index: 0,
        }
    }
}

/// Position offset `4 * blocks + deck` modulo 2^130
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CounterOffset {
    pub blocks: u128,
    pub deck: u32,
}

impl CounterOffset {
    pub const fn new(blocks: u128, deck: u32) -> Self {
        Self { blocks, deck }
    }

    /// Add `deck` words to a block/word position, carrying into the block.
    ///
    /// Both word indices are reduced into `[0, 4)` first, so an unvalidated
    /// state cannot overflow.
    fn advance(&self, blocks: u128, deck: u32) -> (u128, u32) {
        let words = self.deck % DECK_SIZE + deck % DECK_SIZE;
        let blocks = blocks
            .wrapping_add(self.blocks)
            .wrapping_add(u128::from(words / DECK_SIZE));
        (blocks, words % DECK_SIZE)
    }
}

impl LinearMap for CounterOffset {
    fn identity_map() -> Self {
        Self::new(0, 0)
    }

    fn compose(&self, rhs: &Self) -> Self {
        let (blocks, deck) = self.advance(rhs.blocks, rhs.deck);
        Self { blocks, deck }
    }

    fn power(&self, k: u64) -> Self {
        let total = self.blocks.wrapping_mul(u128::from(k));
        let words = u128::from(self.deck) * u128::from(k);
        Self {
            blocks: total.wrapping_add(words / u128::from(DECK_SIZE)),
            deck: (words % u128::from(DECK_SIZE)) as u32,
        }
    }
}

/// Philox4x32-10 family marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Philox432;

impl Family for Philox432 {
    type State = Philox432State;
    type Jump = CounterOffset;

    const NAME: &'static str = "philox432";

    const NORM: f64 = 2.3283064365386963e-10;

    const NORM_F32: f32 = 2.328_306_3e-10;

    fn default_base_state() -> Self::State {
        Philox432State::new([0; 4], [0; 2])
    }

    fn validate_seed(state: &Self::State) -> Result<(), String> {
        if state.deck_index >= DECK_SIZE {
            return Err(format!("seed.deck_index >= {}", DECK_SIZE));
        }
        Ok(())
    }

    fn next_raw(state: &mut Self::State) -> u64 {
        let block = philox4x32_10(state.counter, state.key);
        let out = block[(state.deck_index % DECK_SIZE) as usize];
        Self::apply_jump(&STEP, state);
        u64::from(out)
    }

    fn apply_jump(jump: &Self::Jump, state: &mut Self::State) {
        let (blocks, deck) = jump.advance(counter_to_u128(&state.counter), state.deck_index);
        state.counter = u128_to_counter(blocks);
        state.deck_index = deck;
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
            .counter
            .iter()
            .chain(state.key.iter())
            .chain(std::iter::once(&state.deck_index))
            .map(|&w| u64::from(w))
            .collect()
    }
}
