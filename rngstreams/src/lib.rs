//! RNG Streams - parallel multi-stream random number generators
//!
//! Pseudorandom generators that split one infinite sequence into
//! non-overlapping streams and substreams, and move any of them by an
//! arbitrary offset in logarithmic time.
//!
//! # Architecture
//!
//! - **modular**: Fixed-dimension matrices modulo a prime, and over GF(2)
//! - **jump**: Jump offsets and composable jump maps
//! - **family**: Generator families (MRG32k3a, MRG31k3p, LFSR113, Philox4x32-10, Xorwow)
//! - **creator**: Stream creators spacing streams a fixed leap apart
//! - **stream**: Streams, stream arrays and the substream protocol
//! - **transform**: Uniform, normal and integer-range outputs
//! - **batch**: Host and parallel lane execution with identical output
//! - **snapshot**: Save/load of stream arrays
//! - **error**: Status codes, error type and the last-error slot
//!
//! # Critical Invariants
//!
//! 1. Every MRG state component is reduced below its modulus
//! 2. The i-th stream of a creator starts exactly i leaps past its base state
//! 3. Host and parallel batches produce bit-identical output
//!
//! # Example
//! ```
//! use rngstreams::prelude::*;
//!
//! let mut creator = StreamCreator::<Mrg32k3a>::create(None);
//! let mut streams = creator.create_streams(2).unwrap();
//!
//! let u: f64 = streams[0].uniform01();
//! assert!(u > 0.0 && u < 1.0);
//!
//! streams[1].forward_to_next_substream();
//! let k = streams[1].integer_in_range::<f64>(1, 6);
//! assert!((1..=6).contains(&k));
//! ```

// Module declarations
pub mod batch;
pub mod creator;
pub mod error;
pub mod family;
pub mod jump;
pub mod modular;
pub mod snapshot;
pub mod stream;
pub mod transform;

// Re-exports for convenience
pub use creator::{CreatorConfig, StreamCreator};
pub use error::{Result, RngError, Status};
pub use family::Family;
pub use jump::JumpOffset;
pub use stream::Stream;

pub mod prelude {
    pub use crate::batch::{
        random_integer_array, random_n_array, random_u01_array, Backend, BatchConfig,
    };
    pub use crate::creator::{CreatorConfig, StreamCreator};
    pub use crate::error::{Result, RngError, Status};
    pub use crate::family::{Family, Lfsr113, Mrg31k3p, Mrg32k3a, Philox432, Xorwow};
    pub use crate::jump::JumpOffset;
    pub use crate::stream::{
        advance_streams, forward_to_next_substreams, rewind_streams, rewind_substreams, Stream,
    };
    pub use crate::transform::{NormalSampler, Real};
}
