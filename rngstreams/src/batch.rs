//! Batch generation across lanes
//!
//! A batch hands `stream_count` streams to `stream_count / streams_per_lane`
//! lanes. Lane `gid` owns streams `[spl * gid, spl * (gid + 1))` and, for each
//! draw round `i`, writes one value per owned stream into
//!
//! ```text
//! out[spl * (i * lanes + gid) + sid]
//! ```
//!
//! Before drawing in round `i > 0`, a lane forwards all its streams to their
//! next substream when `substream_length > 0` divides `i`, or rewinds their
//! current substream when `-substream_length > 0` divides `i`.
//!
//! [`run_host`] is the sequential reference loop. [`run_parallel`] runs every
//! lane on the rayon pool and produces bit-identical output, because each lane
//! only touches its own streams and both paths share [`LaneProcedure`].
//!
//! # Example
//! ```
//! use rngstreams::prelude::*;
//!
//! let mut creator = StreamCreator::<Mrg32k3a>::create(None);
//! let mut streams = creator.create_streams(10).unwrap();
//! let config = BatchConfig::new(10, 100).with_substream_length(5);
//!
//! let values: Vec<f64> = random_u01_array(&mut streams, &config).unwrap();
//! assert_eq!(values.len(), 100);
//! ```

use crate::error::{Result, RngError};
use crate::family::Family;
use crate::stream::{forward_to_next_substreams, rewind_substreams, Stream};
use crate::transform::{NormalSampler, Real};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Where lanes run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    /// Sequential reference loop
    Host,
    /// One rayon task per lane
    #[default]
    Parallel,
}

/// Batch shape and substream cadence
///
/// # Example
/// ```
/// use rngstreams::batch::{Backend, BatchConfig};
///
/// let config: BatchConfig = serde_json::from_str(
///     r#"{ "stream_count": 10, "number_count": 100, "substream_length": -5 }"#,
/// ).unwrap();
/// assert_eq!(config.streams_per_lane, 1);
/// assert_eq!(config.backend, Backend::Parallel);
/// assert!(config.validate(10).is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Number of streams used, taken from the front of the array
    pub stream_count: usize,

    /// Total values generated; a multiple of `stream_count`
    pub number_count: usize,

    /// Substream cadence: forward every `L > 0` rounds, rewind every `-L`
    /// rounds when negative, never when 0
    #[serde(default)]
    pub substream_length: i32,

    /// Streams owned by each lane
    #[serde(default = "default_streams_per_lane")]
    pub streams_per_lane: usize,

    #[serde(default)]
    pub backend: Backend,
}

fn default_streams_per_lane() -> usize {
    1
}

impl BatchConfig {
    pub fn new(stream_count: usize, number_count: usize) -> Self {
        Self {
            stream_count,
            number_count,
            substream_length: 0,
            streams_per_lane: default_streams_per_lane(),
            backend: Backend::default(),
        }
    }

    pub fn with_substream_length(mut self, substream_length: i32) -> Self {
        self.substream_length = substream_length;
        self
    }

    pub fn with_streams_per_lane(mut self, streams_per_lane: usize) -> Self {
        self.streams_per_lane = streams_per_lane;
        self
    }

    pub fn with_backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }

    /// Check the batch shape against an array of `available` streams.
    pub fn validate(&self, available: usize) -> Result<()> {
        let fail = |detail: String| Err(RngError::invalid_value("validate", detail));

        if self.stream_count == 0 {
            return fail("stream_count must be > 0".to_string());
        }
        if self.number_count == 0 {
            return fail("number_count must be > 0".to_string());
        }
        if self.number_count % self.stream_count != 0 {
            return fail(format!(
                "number_count ({}) must be a multiple of stream_count ({})",
                self.number_count, self.stream_count
            ));
        }
        if self.streams_per_lane == 0 {
            return fail("streams_per_lane must be > 0".to_string());
        }
        if self.stream_count % self.streams_per_lane != 0 {
            return fail(format!(
                "stream_count ({}) must be a multiple of streams_per_lane ({})",
                self.stream_count, self.streams_per_lane
            ));
        }
        if available < self.stream_count {
            return fail(format!(
                "stream_count ({}) exceeds the {} streams supplied",
                self.stream_count, available
            ));
        }
        Ok(())
    }

    /// Number of lanes
    pub fn lanes(&self) -> usize {
        self.stream_count / self.streams_per_lane
    }

    /// Draw rounds per lane
    pub fn quota(&self) -> usize {
        self.number_count / self.stream_count
    }
}

/// Work performed by every lane for each of its streams in each round
pub trait LaneProcedure<F: Family>: Sync {
    type Output: Copy + Default + Send;

    /// Per-lane scratch state, created fresh for every lane of every batch
    type LaneState: Send;

    fn lane_state(&self, streams_per_lane: usize) -> Self::LaneState;

    /// Value for stream `sid` of `lane`.
    fn draw(&self, state: &mut Self::LaneState, lane: &mut [Stream<F>], sid: usize)
        -> Self::Output;
}

/// Uniform values in precision `T`
#[derive(Debug, Clone, Copy, Default)]
pub struct Uniform01<T>(std::marker::PhantomData<T>);

impl<T> Uniform01<T> {
    pub fn new() -> Self {
        Self(std::marker::PhantomData)
    }
}

impl<F: Family, T: Real> LaneProcedure<F> for Uniform01<T> {
    type Output = T;
    type LaneState = ();

    fn lane_state(&self, _streams_per_lane: usize) {}

    fn draw(&self, _state: &mut (), lane: &mut [Stream<F>], sid: usize) -> T {
        lane[sid].uniform01()
    }
}

/// Normal deviates; stream `sid` pairs with stream `(sid + 1) % spl` of the
/// same lane and keeps its own sampler cache
#[derive(Debug, Clone, Copy)]
pub struct Normal<T> {
    pub mu: T,
    pub sigma: T,
}

impl<F: Family, T: Real> LaneProcedure<F> for Normal<T> {
    type Output = T;
    type LaneState = Vec<NormalSampler<T>>;

    fn lane_state(&self, streams_per_lane: usize) -> Self::LaneState {
        vec![NormalSampler::new(); streams_per_lane]
    }

    fn draw(&self, samplers: &mut Self::LaneState, lane: &mut [Stream<F>], sid: usize) -> T {
        let partner = (sid + 1) % lane.len();
        let sampler = &mut samplers[sid];
        match pair_mut(lane, sid, partner) {
            Some((first, second)) => sampler.next(first, second, self.mu, self.sigma),
            None => sampler.next_single(&mut lane[sid], self.mu, self.sigma),
        }
    }
}

/// Integers in `[lo, hi]` computed in precision `T`
#[derive(Debug, Clone, Copy)]
pub struct IntegerRange<T> {
    lo: i32,
    hi: i32,
    precision: std::marker::PhantomData<T>,
}

impl<T> IntegerRange<T> {
    /// Fails with `InvalidValue` when `lo > hi`.
    pub fn new(lo: i32, hi: i32) -> Result<Self> {
        if lo > hi {
            return Err(RngError::invalid_value(
                "IntegerRange::new",
                format!("lo ({}) > hi ({})", lo, hi),
            ));
        }
        Ok(Self {
            lo,
            hi,
            precision: std::marker::PhantomData,
        })
    }
}

impl<F: Family, T: Real> LaneProcedure<F> for IntegerRange<T> {
    type Output = i32;
    type LaneState = ();

    fn lane_state(&self, _streams_per_lane: usize) {}

    fn draw(&self, _state: &mut (), lane: &mut [Stream<F>], sid: usize) -> i32 {
        lane[sid].integer_in_range::<T>(self.lo, self.hi)
    }
}

/// Two distinct mutable elements of `slice`, or `None` when `i == j`.
fn pair_mut<S>(slice: &mut [S], i: usize, j: usize) -> Option<(&mut S, &mut S)> {
    if i == j {
        return None;
    }
    if i < j {
        let (left, right) = slice.split_at_mut(j);
        Some((&mut left[i], &mut right[0]))
    } else {
        let (left, right) = slice.split_at_mut(i);
        Some((&mut right[0], &mut left[j]))
    }
}

fn apply_cadence<F: Family>(lane: &mut [Stream<F>], substream_length: i32, round: usize) {
    if round == 0 || substream_length == 0 {
        return;
    }
    let period = substream_length.unsigned_abs() as usize;
    if round % period != 0 {
        return;
    }
    if substream_length > 0 {
        forward_to_next_substreams(lane);
    } else {
        rewind_substreams(lane);
    }
}

fn allocate_output<O: Copy + Default>(count: usize) -> Result<Vec<O>> {
    let mut out = Vec::new();
    out.try_reserve_exact(count).map_err(|e| {
        RngError::out_of_resources(
            "allocate_output",
            format!("could not allocate {} output values: {}", count, e),
        )
    })?;
    out.resize(count, O::default());
    Ok(out)
}

/// Sequential reference loop over rounds, then lanes.
pub fn run_host<F, P>(
    streams: &mut [Stream<F>],
    config: &BatchConfig,
    procedure: &P,
) -> Result<Vec<P::Output>>
where
    F: Family,
    P: LaneProcedure<F>,
{
    config.validate(streams.len())?;
    let spl = config.streams_per_lane;
    let lanes = config.lanes();
    let mut out = allocate_output(config.number_count)?;

    let streams = &mut streams[..config.stream_count];
    let mut states: Vec<P::LaneState> = (0..lanes).map(|_| procedure.lane_state(spl)).collect();

    for i in 0..config.quota() {
        let lanes_with_state = streams.chunks_mut(spl).zip(states.iter_mut());
        for (gid, (lane, state)) in lanes_with_state.enumerate() {
            apply_cadence(lane, config.substream_length, i);
            let base = spl * (i * lanes + gid);
            for sid in 0..spl {
                out[base + sid] = procedure.draw(state, lane, sid);
            }
        }
    }

    tracing::debug!(
        family = F::NAME,
        stream_count = config.stream_count,
        number_count = config.number_count,
        substream_length = config.substream_length,
        streams_per_lane = spl,
        "host batch generated"
    );
    Ok(out)
}

/// Every lane as one rayon task; output identical to [`run_host`].
pub fn run_parallel<F, P>(
    streams: &mut [Stream<F>],
    config: &BatchConfig,
    procedure: &P,
) -> Result<Vec<P::Output>>
where
    F: Family,
    P: LaneProcedure<F>,
{
    config.validate(streams.len())?;
    let spl = config.streams_per_lane;
    let lanes = config.lanes();
    let quota = config.quota();
    let mut out = allocate_output(config.number_count)?;

    let per_lane: Vec<Vec<P::Output>> = streams[..config.stream_count]
        .par_chunks_mut(spl)
        .map(|lane| {
            let mut state = procedure.lane_state(spl);
            let mut values = Vec::with_capacity(quota * spl);
            for i in 0..quota {
                apply_cadence(lane, config.substream_length, i);
                for sid in 0..spl {
                    values.push(procedure.draw(&mut state, lane, sid));
                }
            }
            values
        })
        .collect();

    for (gid, values) in per_lane.iter().enumerate() {
        for (i, round) in values.chunks(spl).enumerate() {
            let base = spl * (i * lanes + gid);
            out[base..base + spl].copy_from_slice(round);
        }
    }

    tracing::debug!(
        family = F::NAME,
        stream_count = config.stream_count,
        number_count = config.number_count,
        substream_length = config.substream_length,
        streams_per_lane = spl,
        lanes,
        "parallel batch generated"
    );
    Ok(out)
}

/// Run `procedure` on the backend selected by `config`.
pub fn run<F, P>(
    streams: &mut [Stream<F>],
    config: &BatchConfig,
    procedure: &P,
) -> Result<Vec<P::Output>>
where
    F: Family,
    P: LaneProcedure<F>,
{
    match config.backend {
        Backend::Host => run_host(streams, config, procedure),
        Backend::Parallel => run_parallel(streams, config, procedure),
    }
}

pub fn random_u01_array<F: Family, T: Real>(
    streams: &mut [Stream<F>],
    config: &BatchConfig,
) -> Result<Vec<T>> {
    run(streams, config, &Uniform01::<T>::new())
}

pub fn random_n_array<F: Family, T: Real>(
    streams: &mut [Stream<F>],
    config: &BatchConfig,
    mu: T,
    sigma: T,
) -> Result<Vec<T>> {
    run(streams, config, &Normal { mu, sigma })
}

pub fn random_integer_array<F: Family, T: Real>(
    streams: &mut [Stream<F>],
    config: &BatchConfig,
    lo: i32,
    hi: i32,
) -> Result<Vec<i32>> {
    run(streams, config, &IntegerRange::<T>::new(lo, hi)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::creator::StreamCreator;
    use crate::error::Status;
    use crate::family::{Mrg31k3p, Mrg32k3a};

    #[test]
    fn test_validate_rejects_bad_shapes() {
        let cases = [
            BatchConfig::new(0, 10),
            BatchConfig::new(10, 0),
            BatchConfig::new(10, 95),
            BatchConfig::new(10, 100).with_streams_per_lane(0),
            BatchConfig::new(10, 100).with_streams_per_lane(3),
        ];
        for config in cases {
            let err = config.validate(10).unwrap_err();
            assert_eq!(err.status(), Status::InvalidValue, "{:?}", config);
        }
        assert!(BatchConfig::new(10, 100).validate(9).is_err());
        assert!(BatchConfig::new(10, 100).with_streams_per_lane(5).validate(10).is_ok());
    }

    #[test]
    fn test_pair_mut() {
        let mut values = [1, 2, 3];
        let (a, b) = pair_mut(&mut values, 2, 0).unwrap();
        std::mem::swap(a, b);
        assert_eq!(values, [3, 2, 1]);
        assert!(pair_mut(&mut values, 1, 1).is_none());
    }

    #[test]
    fn test_layout_without_cadence_is_round_robin() {
        let mut creator = StreamCreator::<Mrg32k3a>::create(None);
        let mut streams = creator.create_streams(4).unwrap();
        let mut reference = streams.clone();

        let config = BatchConfig::new(4, 12).with_backend(Backend::Host);
        let values: Vec<f64> = random_u01_array(&mut streams, &config).unwrap();

        for (k, value) in values.iter().enumerate() {
            assert_eq!(*value, reference[k % 4].uniform01::<f64>());
        }
        assert_eq!(streams, reference);
    }

    #[test]
    fn test_positive_cadence_forwards_substreams() {
        let mut creator = StreamCreator::<Mrg31k3p>::create(None);
        let mut streams = creator.create_streams(1).unwrap();
        let mut reference = streams[0].clone();

        let config = BatchConfig::new(1, 6).with_substream_length(3);
        let values: Vec<f64> = random_u01_array(&mut streams, &config).unwrap();

        let mut expected: Vec<f64> = (0..3).map(|_| reference.uniform01()).collect();
        reference.forward_to_next_substream();
        expected.extend((0..3).map(|_| reference.uniform01::<f64>()));
        assert_eq!(values, expected);
    }

    #[test]
    fn test_negative_cadence_replays_substream() {
        let mut creator = StreamCreator::<Mrg31k3p>::create(None);
        let mut streams = creator.create_streams(1).unwrap();

        let config = BatchConfig::new(1, 6).with_substream_length(-2);
        let values: Vec<f32> = random_u01_array(&mut streams, &config).unwrap();
        assert_eq!(values[0..2], values[2..4]);
        assert_eq!(values[2..4], values[4..6]);
    }

    #[test]
    fn test_integer_array_rejects_inverted_range() {
        let mut streams = StreamCreator::<Mrg32k3a>::create(None).create_streams(2).unwrap();
        let config = BatchConfig::new(2, 4);
        let err = random_integer_array::<_, f64>(&mut streams, &config, 5, 1).unwrap_err();
        assert_eq!(err.status(), Status::InvalidValue);
    }

    #[test]
    fn test_single_precision_normal_batches_match() {
        let mut host = StreamCreator::<Mrg32k3a>::create(None).create_streams(4).unwrap();
        let mut parallel = host.clone();
        let config = BatchConfig::new(4, 40).with_streams_per_lane(2);
        let normal = Normal { mu: 0.0f32, sigma: 1.0 };

        let a = run_host(&mut host, &config, &normal).unwrap();
        let b = run_parallel(&mut parallel, &config, &normal).unwrap();
        assert_eq!(a, b);
        assert!(a.iter().all(|z| z.is_finite()));
    }
}
