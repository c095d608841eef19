//! Stream creator
//!
//! A [`StreamCreator`] holds a base state, a cursor and a leap. Every stream it
//! creates starts at the cursor, and the cursor then moves one leap forward,
//! so the i-th stream created starts exactly `i` leaps past the base state.
//!
//! # Default creator
//!
//! [`StreamCreator::shared_default`] returns the family's default creator
//! (default seed, default leap), marked immutable: reseeding or respacing it
//! fails with `InvalidStreamCreator`. [`StreamCreator::create`] returns a
//! mutable copy of it, or of any other creator.
//!
//! # Example
//! ```
//! use rngstreams::prelude::*;
//!
//! let mut creator = StreamCreator::<Mrg32k3a>::create(None);
//! creator.change_spacing(100, 0).unwrap();
//! let streams = creator.create_streams(4).unwrap();
//! assert_eq!(streams.len(), 4);
//! assert_ne!(streams[0].initial_state(), streams[1].initial_state());
//! ```

use crate::error::{Result, RngError};
use crate::family::Family;
use crate::jump::JumpOffset;
use crate::stream::Stream;
use serde::{Deserialize, Serialize};

/// Creator settings, applied on top of a copy of the default creator
///
/// # Example
/// ```
/// use rngstreams::prelude::*;
///
/// let config: CreatorConfig<Lfsr113> = serde_json::from_str(
///     r#"{ "base_state": { "z": [12345, 12345, 12345, 12345] },
///          "spacing": { "e": 90, "c": 0 } }"#,
/// ).unwrap();
/// let creator = StreamCreator::from_config(&config).unwrap();
/// assert_eq!(creator.initial_state().z, [12345; 4]);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct CreatorConfig<F: Family> {
    /// Base state of the first stream (None = family default seed)
    #[serde(default)]
    pub base_state: Option<F::State>,

    /// Leap between streams as `{e, c}` (None = family default leap)
    #[serde(default)]
    pub spacing: Option<JumpOffset>,
}

impl<F: Family> Default for CreatorConfig<F> {
    fn default() -> Self {
        Self {
            base_state: None,
            spacing: None,
        }
    }
}

/// Factory of mutually independent streams of family `F`
#[derive(Debug, Clone)]
pub struct StreamCreator<F: Family> {
    /// Base state; `rewind` returns the cursor here
    initial: F::State,

    /// Initial state of the next stream to be created
    next: F::State,

    /// Jump applied to `next` after each stream
    leap: F::Jump,

    /// True only for the value returned by `shared_default`
    shared_default: bool,
}

impl<F: Family> StreamCreator<F> {
    /// The family's default creator, which refuses reseeding and respacing.
    pub fn shared_default() -> Self {
        let base = F::default_base_state();
        Self {
            initial: base,
            next: base,
            leap: F::stream_leap().clone(),
            shared_default: true,
        }
    }

    /// Mutable copy of `seed`, or of the default creator when `None`.
    pub fn create(seed: Option<&Self>) -> Self {
        let mut creator = match seed {
            Some(creator) => creator.clone(),
            None => Self::shared_default(),
        };
        creator.shared_default = false;
        creator
    }

    /// Copy of the default creator with `config` applied.
    ///
    /// Fails like [`set_base_state`](Self::set_base_state) and
    /// [`change_spacing`](Self::change_spacing) would.
    pub fn from_config(config: &CreatorConfig<F>) -> Result<Self> {
        let mut creator = Self::create(None);
        if let Some(state) = config.base_state {
            creator.set_base_state(state)?;
        }
        if let Some(spacing) = config.spacing {
            creator.change_spacing(spacing.e, spacing.c)?;
        }
        Ok(creator)
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Reseed: both the base state and the cursor become `state`.
    ///
    /// Fails with `InvalidStreamCreator` on the shared default and with
    /// `InvalidSeed` when `state` is not a valid seed; the creator is left
    /// untouched on failure.
    pub fn set_base_state(&mut self, state: F::State) -> Result<()> {
        self.ensure_mutable("set_base_state")?;
        F::validate_seed(&state)
            .map_err(|detail| RngError::invalid_seed("set_base_state", detail))?;

        self.initial = state;
        self.next = state;
        tracing::debug!(family = F::NAME, "creator reseeded");
        Ok(())
    }

    /// Set the leap between consecutive streams to `2^e + c` steps (`c` steps
    /// when `e == 0`).
    ///
    /// Fails with `InvalidStreamCreator` on the shared default, and with
    /// `InvalidValue` when `e < 0` or when `c < 0` for a family that cannot
    /// run backward.
    pub fn change_spacing(&mut self, e: i32, c: i32) -> Result<()> {
        self.ensure_mutable("change_spacing")?;
        if e < 0 {
            return Err(RngError::invalid_value("change_spacing", "e must be >= 0"));
        }
        let leap = F::jump(JumpOffset::new(e, c)).ok_or_else(|| {
            RngError::invalid_value(
                "change_spacing",
                format!("{} cannot jump backward (c = {})", F::NAME, c),
            )
        })?;

        self.leap = leap;
        tracing::debug!(family = F::NAME, e, c, "creator spacing changed");
        Ok(())
    }

    /// Move the cursor back to the base state: the next stream created
    /// repeats the first one ever created.
    pub fn rewind(&mut self) {
        self.next = self.initial;
    }

    fn ensure_mutable(&self, func: &str) -> Result<()> {
        if self.shared_default {
            return Err(RngError::invalid_stream_creator(
                func,
                "modifying the default stream creator is forbidden",
            ));
        }
        Ok(())
    }

    // ========================================================================
    // Stream creation
    // ========================================================================

    /// Create one stream at the cursor and advance the cursor by one leap.
    pub fn create_stream(&mut self) -> Stream<F> {
        let stream = Stream::from_state(self.next);
        F::apply_jump(&self.leap, &mut self.next);
        stream
    }

    /// Create `count` consecutive streams.
    ///
    /// Fails with `OutOfResources` if the array cannot be allocated; the
    /// cursor only moves once allocation succeeded.
    pub fn create_streams(&mut self, count: usize) -> Result<Vec<Stream<F>>> {
        let mut streams = Vec::new();
        streams.try_reserve_exact(count).map_err(|e| {
            RngError::out_of_resources(
                "create_streams",
                format!("could not allocate memory for {} streams: {}", count, e),
            )
        })?;
        streams.extend((0..count).map(|_| self.create_stream()));
        Ok(streams)
    }

    /// Overwrite every stream of `streams`, in order, with newly created ones.
    pub fn create_over_streams(&mut self, streams: &mut [Stream<F>]) {
        for stream in streams.iter_mut() {
            *stream = self.create_stream();
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn initial_state(&self) -> &F::State {
        &self.initial
    }

    pub fn next_state(&self) -> &F::State {
        &self.next
    }

    pub fn leap(&self) -> &F::Jump {
        &self.leap
    }

    pub fn is_shared_default(&self) -> bool {
        self.shared_default
    }
}

impl<F: Family> Default for StreamCreator<F> {
    fn default() -> Self {
        Self::create(None)
    }
}
