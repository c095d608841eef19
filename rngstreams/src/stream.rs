//! Streams and the substream protocol
//!
//! A [`Stream`] carries three cursors:
//!
//! - `initial`: fixed at creation
//! - `substream`: start of the current substream, moved only by
//!   [`Stream::forward_to_next_substream`]
//! - `current`: advanced one step per value drawn
//!
//! Lanes that each own a distinct substream of one stream, and forward to the
//! next substream at the same cadence, draw pairwise-disjoint subsequences
//! without coordinating.

use crate::error::{Result, RngError};
use crate::family::Family;
use crate::jump::JumpOffset;
use serde::{Deserialize, Serialize};
use std::io;

/// One independent stream of family `F`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Stream<F: Family> {
    initial: F::State,
    substream: F::State,
    current: F::State,
}

impl<F: Family> Stream<F> {
    /// Stream whose three cursors all start at `state`.
    ///
    /// `state` is not validated; creators only hand out validated states.
    pub fn from_state(state: F::State) -> Self {
        Self {
            initial: state,
            substream: state,
            current: state,
        }
    }

    pub fn initial_state(&self) -> &F::State {
        &self.initial
    }

    pub fn substream_state(&self) -> &F::State {
        &self.substream
    }

    pub fn current_state(&self) -> &F::State {
        &self.current
    }

    /// One recurrence step; returns the family's raw output.
    pub fn next_raw(&mut self) -> u64 {
        F::next_raw(&mut self.current)
    }

    /// Abandon the rest of the current substream and start the next one.
    pub fn forward_to_next_substream(&mut self) {
        F::apply_jump(F::substream_leap(), &mut self.substream);
        self.current = self.substream;
    }

    /// Replay the current substream from its start.
    pub fn rewind_substream(&mut self) {
        self.current = self.substream;
    }

    /// Return to the start of the stream.
    pub fn rewind(&mut self) {
        self.substream = self.initial;
        self.current = self.initial;
    }

    /// Apply `jump` to the current cursor only.
    pub fn advance(&mut self, jump: &F::Jump) {
        F::apply_jump(jump, &mut self.current);
    }

    /// Split off `count` streams starting at consecutive substreams of this
    /// one, beginning with the current substream. Afterwards this stream sits
    /// at the start of the substream following the last one handed out.
    pub fn make_substreams(&mut self, count: usize) -> Result<Vec<Stream<F>>> {
        let mut substreams = Vec::new();
        substreams.try_reserve_exact(count).map_err(|e| {
            RngError::out_of_resources(
                "make_substreams",
                format!("could not allocate memory for {} substreams: {}", count, e),
            )
        })?;
        for _ in 0..count {
            substreams.push(Stream::from_state(self.substream));
            self.forward_to_next_substream();
        }
        self.current = self.substream;
        Ok(substreams)
    }

    /// [`make_substreams`](Self::make_substreams) into an existing array:
    /// `dest[i]` becomes the i-th substream from the current one.
    pub fn make_over_substreams(&mut self, dest: &mut [Stream<F>]) {
        for slot in dest.iter_mut() {
            *slot = Stream::from_state(self.substream);
            self.forward_to_next_substream();
        }
        self.current = self.substream;
    }

    /// Write the `initial` and `current` components, in declared order, as
    ///
    /// ```text
    /// initial = { 12345, 12345, ... }
    /// current = { ... }
    /// ```
    pub fn write_info<W: io::Write>(&self, sink: &mut W) -> io::Result<()> {
        for (label, state) in [("initial", &self.initial), ("current", &self.current)] {
            let components: Vec<String> = F::components(state)
                .iter()
                .map(|c| c.to_string())
                .collect();
            writeln!(sink, "{} = {{ {} }}", label, components.join(", "))?;
        }
        Ok(())
    }
}

// ============================================================================
// Stream arrays
// ============================================================================

fn reserve<F: Family>(func: &str, count: usize) -> Result<Vec<Stream<F>>> {
    let mut streams = Vec::new();
    streams.try_reserve_exact(count).map_err(|e| {
        RngError::out_of_resources(
            func,
            format!("could not allocate memory for {} streams: {}", count, e),
        )
    })?;
    Ok(streams)
}

/// `count` placeholder streams at the family's default base state.
///
/// `count == 0` yields an empty array.
pub fn allocate_streams<F: Family>(count: usize) -> Result<Vec<Stream<F>>> {
    let mut streams = reserve("allocate_streams", count)?;
    streams.resize(count, Stream::from_state(F::default_base_state()));
    Ok(streams)
}

/// Deep copy of `src`.
pub fn copy_streams<F: Family>(src: &[Stream<F>]) -> Result<Vec<Stream<F>>> {
    let mut streams = reserve("copy_streams", src.len())?;
    streams.extend_from_slice(src);
    Ok(streams)
}

/// Overwrite `dest` with `src`; both must have the same length.
pub fn copy_over_streams<F: Family>(dest: &mut [Stream<F>], src: &[Stream<F>]) -> Result<()> {
    if dest.len() != src.len() {
        return Err(RngError::invalid_value(
            "copy_over_streams",
            format!("length mismatch: dest {} vs src {}", dest.len(), src.len()),
        ));
    }
    dest.clone_from_slice(src);
    Ok(())
}

/// Move the current cursor of every stream by `2^e + c` steps (`c` steps when
/// `e == 0`, `-2^|e| + c` when `e < 0`).
///
/// Fails with `InvalidValue`, leaving every stream untouched, when the offset
/// runs backward and the family has no inverse step.
pub fn advance_streams<F: Family>(streams: &mut [Stream<F>], e: i32, c: i32) -> Result<()> {
    let jump = F::jump(JumpOffset::new(e, c)).ok_or_else(|| {
        RngError::invalid_value(
            "advance_streams",
            format!("{} cannot jump backward (e = {}, c = {})", F::NAME, e, c),
        )
    })?;
    for stream in streams.iter_mut() {
        stream.advance(&jump);
    }
    tracing::debug!(family = F::NAME, count = streams.len(), e, c, "streams advanced");
    Ok(())
}

pub fn forward_to_next_substreams<F: Family>(streams: &mut [Stream<F>]) {
    streams.iter_mut().for_each(Stream::forward_to_next_substream);
}

pub fn rewind_substreams<F: Family>(streams: &mut [Stream<F>]) {
    streams.iter_mut().for_each(Stream::rewind_substream);
}

pub fn rewind_streams<F: Family>(streams: &mut [Stream<F>]) {
    streams.iter_mut().for_each(Stream::rewind);
}
