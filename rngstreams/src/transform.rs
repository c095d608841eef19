//! Output transforms: uniform, normal and integer-range values
//!
//! Every transform is generic over the floating-point precision ([`Real`]) and
//! mutates only the `current` cursor of the streams it is given.

use crate::family::Family;
use crate::stream::Stream;
use num_traits::Float;
use std::fmt;

/// Floating-point precision a transform computes in
pub trait Real: Float + Default + fmt::Debug + Send + Sync + 'static {
    /// `raw` scaled into the unit interval with the family norm for this
    /// precision.
    fn from_raw<F: Family>(raw: u64) -> Self;

    fn from_literal(x: f64) -> Self;

    /// `floor(self)` as an integer, saturating at the `i64` bounds.
    fn floor_to_i64(self) -> i64;
}

impl Real for f32 {
    fn from_raw<F: Family>(raw: u64) -> Self {
        raw as f32 * F::NORM_F32
    }

    fn from_literal(x: f64) -> Self {
        x as f32
    }

    fn floor_to_i64(self) -> i64 {
        self.floor() as i64
    }
}

impl Real for f64 {
    fn from_raw<F: Family>(raw: u64) -> Self {
        raw as f64 * F::NORM
    }

    fn from_literal(x: f64) -> Self {
        x
    }

    fn floor_to_i64(self) -> i64 {
        self.floor() as i64
    }
}

impl<F: Family> Stream<F> {
    /// Next value in the unit interval: raw output times the family norm.
    ///
    /// # Example
    /// ```
    /// use rngstreams::prelude::*;
    ///
    /// let mut stream = StreamCreator::<Mrg32k3a>::create(None).create_stream();
    /// let u: f64 = stream.uniform01();
    /// assert_eq!(u, 0.12701112204657714);
    /// ```
    pub fn uniform01<T: Real>(&mut self) -> T {
        T::from_raw::<F>(self.next_raw())
    }

    /// Integer in `[lo, hi]`: `lo + floor((hi - lo + 1) * u)`.
    ///
    /// # Panics
    /// Panics if `lo > hi`
    pub fn integer_in_range<T: Real>(&mut self, lo: i32, hi: i32) -> i32 {
        assert!(lo <= hi, "lo must not exceed hi");

        let span = i64::from(hi) - i64::from(lo) + 1;
        let u: T = self.uniform01();
        // span * u may still round up to span in single precision
        let offset = (T::from_literal(span as f64) * u).floor_to_i64().clamp(0, span - 1);
        (i64::from(lo) + offset) as i32
    }
}

/// Box–Muller: two uniforms to two independent standard normal deviates
/// (cosine branch, sine branch).
pub fn box_muller<T: Real>(u1: T, u2: T) -> (T, T) {
    // Avoid ln(0)
    let u1 = if u1 <= T::zero() { T::min_positive_value() } else { u1 };

    let r = (T::from_literal(-2.0) * u1.ln()).sqrt();
    let theta = T::from_literal(std::f64::consts::TAU) * u2;

    (r * theta.cos(), r * theta.sin())
}

/// Normal deviates from pairs of uniforms, caching the second deviate of each
/// pair
///
/// A sampler belongs to one generation site. Every other call draws one
/// uniform from each stream and returns the cosine branch; the call after it
/// returns the cached sine branch without drawing.
///
/// # Example
/// ```
/// use rngstreams::prelude::*;
///
/// let mut creator = StreamCreator::<Mrg31k3p>::create(None);
/// let mut streams = creator.create_streams(2).unwrap();
/// let (a, b) = streams.split_at_mut(1);
///
/// let mut sampler = NormalSampler::<f64>::new();
/// let _first = sampler.next(&mut a[0], &mut b[0], 0.0, 1.0);
/// assert!(sampler.has_cached());
/// let _second = sampler.next(&mut a[0], &mut b[0], 0.0, 1.0);
/// assert!(!sampler.has_cached());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NormalSampler<T> {
    cached: Option<T>,
}

impl<T: Real> NormalSampler<T> {
    pub fn new() -> Self {
        Self { cached: None }
    }

    /// `mu + sigma * z`, drawing `u1` from `first` and `u2` from `second` when
    /// no deviate is cached.
    pub fn next<F: Family>(
        &mut self,
        first: &mut Stream<F>,
        second: &mut Stream<F>,
        mu: T,
        sigma: T,
    ) -> T {
        if let Some(z) = self.cached.take() {
            return mu + sigma * z;
        }
        let u1 = first.uniform01();
        let u2 = second.uniform01();
        let (z0, z1) = box_muller(u1, u2);
        self.cached = Some(z1);
        mu + sigma * z0
    }

    /// Like [`next`](Self::next) with both uniforms drawn from `stream`.
    pub fn next_single<F: Family>(&mut self, stream: &mut Stream<F>, mu: T, sigma: T) -> T {
        if let Some(z) = self.cached.take() {
            return mu + sigma * z;
        }
        let u1 = stream.uniform01();
        let u2 = stream.uniform01();
        let (z0, z1) = box_muller(u1, u2);
        self.cached = Some(z1);
        mu + sigma * z0
    }

    pub fn has_cached(&self) -> bool {
        self.cached.is_some()
    }

    /// Drop the cached deviate; the next call draws fresh uniforms.
    pub fn reset(&mut self) {
        self.cached = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::creator::StreamCreator;
    use crate::family::{Lfsr113, Mrg31k3p, Mrg31k3pState, Mrg32k3a, Philox432, Xorwow};

    #[test]
    fn test_uniform_bounds() {
        let mut stream = StreamCreator::<Xorwow>::create(None).create_stream();
        for _ in 0..1000 {
            let u: f64 = stream.uniform01();
            assert!((0.0..1.0).contains(&u));
        }
    }

    #[test]
    fn test_single_precision_stays_below_one_near_modulus() {
        let mut creator = StreamCreator::<Mrg31k3p>::create(None);
        let seed = Mrg31k3pState::from_components([5, 0, 16_647_160], [0, 1, 0]).unwrap();
        creator.set_base_state(seed).unwrap();
        let mut stream = creator.create_stream();
        let mut raw = stream.clone();

        assert_eq!(raw.next_raw(), 2_147_483_640);
        let u: f32 = stream.uniform01();
        assert!(u < 1.0, "u = {}", u);
    }

    #[test]
    fn test_single_precision_largest_raw_below_one() {
        let top = u64::from(u32::MAX);
        assert!(f32::from_raw::<Lfsr113>(top) < 1.0);
        assert!(f32::from_raw::<Philox432>(top) < 1.0);
        assert!(f32::from_raw::<Xorwow>(top) < 1.0);
        assert!(f32::from_raw::<Mrg32k3a>(4_294_967_087) < 1.0);
        assert!(f32::from_raw::<Mrg31k3p>(2_147_483_647) < 1.0);
        assert!(f32::from_raw::<Mrg32k3a>(1) > 0.0);
    }

    #[test]
    fn test_single_precision_tracks_double() {
        let mut a = StreamCreator::<Mrg32k3a>::create(None).create_stream();
        let mut b = a.clone();
        for _ in 0..100 {
            let single: f32 = a.uniform01();
            let double: f64 = b.uniform01();
            assert!((f64::from(single) - double).abs() < 1e-6);
        }
    }

    #[test]
    fn test_integer_in_range_stays_in_bounds() {
        let mut stream = StreamCreator::<Lfsr113>::create(None).create_stream();
        let mut seen = [false; 6];
        for _ in 0..600 {
            let k = stream.integer_in_range::<f32>(-2, 3);
            assert!((-2..=3).contains(&k));
            seen[(k + 2) as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_integer_in_range_follows_uniform() {
        let mut a = StreamCreator::<Philox432>::create(None).create_stream();
        let mut b = a.clone();
        for _ in 0..50 {
            let u: f64 = b.uniform01();
            let expected = 10 + (91.0 * u).floor() as i32;
            assert_eq!(a.integer_in_range::<f64>(10, 100), expected);
        }
    }

    #[test]
    fn test_integer_in_range_single_value() {
        let mut stream = StreamCreator::<Mrg32k3a>::create(None).create_stream();
        assert_eq!(stream.integer_in_range::<f64>(7, 7), 7);
    }

    #[test]
    #[should_panic(expected = "lo must not exceed hi")]
    fn test_integer_in_range_invalid_bounds() {
        let mut stream = StreamCreator::<Mrg32k3a>::create(None).create_stream();
        stream.integer_in_range::<f64>(5, 4);
    }

    #[test]
    fn test_box_muller_zero_uniform_is_finite() {
        let (z0, z1) = box_muller(0.0f64, 0.25);
        assert!(z0.is_finite() && z1.is_finite());
        let (z0, _) = box_muller(0.0f32, 0.0);
        assert!(z0.is_finite());
    }

    #[test]
    fn test_normal_pair_uses_both_branches() {
        let mut creator = StreamCreator::<Mrg32k3a>::create(None);
        let mut s1 = creator.create_stream();
        let mut s2 = creator.create_stream();
        let (mut r1, mut r2) = (s1.clone(), s2.clone());

        let mut sampler = NormalSampler::<f64>::new();
        let first = sampler.next(&mut s1, &mut s2, 1.0, 2.0);
        let second = sampler.next(&mut s1, &mut s2, 1.0, 2.0);

        let (z0, z1) = box_muller(r1.uniform01::<f64>(), r2.uniform01::<f64>());
        assert_eq!(first, 1.0 + 2.0 * z0);
        assert_eq!(second, 1.0 + 2.0 * z1);
        // The cached call drew nothing
        assert_eq!(s1, r1);
        assert_eq!(s2, r2);
    }

    #[test]
    fn test_samplers_do_not_share_cache() {
        let mut creator = StreamCreator::<Xorwow>::create(None);
        let mut s = creator.create_stream();
        let mut t = creator.create_stream();

        let mut a = NormalSampler::<f32>::new();
        let mut b = NormalSampler::<f32>::new();
        a.next_single(&mut s, 0.0, 1.0);
        assert!(a.has_cached());
        assert!(!b.has_cached());
        b.next_single(&mut t, 0.0, 1.0);
        a.reset();
        assert!(!a.has_cached());
    }
}
