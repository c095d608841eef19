//! Status taxonomy and error reporting
//!
//! Every fallible operation returns [`Result`]. A failure also leaves a
//! diagnostic of the form `"<function>(): <detail>"` in a process-wide
//! last-error slot, readable through [`last_error`]. The slot is informational
//! only: control flow always goes through the returned `Result`.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use thiserror::Error;

static LAST_ERROR: Mutex<Option<String>> = parking_lot::const_mutex(None);

/// Outcome of a call, mirroring the status codes consumed by lane backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    Success,
    InvalidValue,
    InvalidSeed,
    InvalidStreamCreator,
    OutOfResources,
}

/// Errors returned by stream, creator and batch operations
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RngError {
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Invalid seed: {0}")]
    InvalidSeed(String),

    #[error("Invalid stream creator: {0}")]
    InvalidStreamCreator(String),

    #[error("Out of resources: {0}")]
    OutOfResources(String),
}

/// Result type for all fallible operations in this crate.
pub type Result<T> = std::result::Result<T, RngError>;

impl RngError {
    pub fn invalid_value(func: &str, detail: impl Display) -> Self {
        Self::recorded(RngError::InvalidValue(format!("{}(): {}", func, detail)))
    }

    pub fn invalid_seed(func: &str, detail: impl Display) -> Self {
        Self::recorded(RngError::InvalidSeed(format!("{}(): {}", func, detail)))
    }

    pub fn invalid_stream_creator(func: &str, detail: impl Display) -> Self {
        Self::recorded(RngError::InvalidStreamCreator(format!(
            "{}(): {}",
            func, detail
        )))
    }

    pub fn out_of_resources(func: &str, detail: impl Display) -> Self {
        Self::recorded(RngError::OutOfResources(format!("{}(): {}", func, detail)))
    }

    /// Status code corresponding to this error
    pub fn status(&self) -> Status {
        match self {
            RngError::InvalidValue(_) => Status::InvalidValue,
            RngError::InvalidSeed(_) => Status::InvalidSeed,
            RngError::InvalidStreamCreator(_) => Status::InvalidStreamCreator,
            RngError::OutOfResources(_) => Status::OutOfResources,
        }
    }

    fn recorded(self) -> Self {
        let message = self.to_string();
        tracing::warn!(status = ?self.status(), "{}", message);
        *LAST_ERROR.lock() = Some(message);
        self
    }
}

impl From<&RngError> for Status {
    fn from(err: &RngError) -> Self {
        err.status()
    }
}

/// Status of a finished call: `Success` for `Ok`, the error's code otherwise.
///
/// # Example
/// ```
/// use rngstreams::error::{status_of, RngError, Status};
///
/// let ok: rngstreams::Result<()> = Ok(());
/// assert_eq!(status_of(&ok), Status::Success);
///
/// let failed: rngstreams::Result<()> = Err(RngError::invalid_value("demo", "bad"));
/// assert_eq!(status_of(&failed), Status::InvalidValue);
/// ```
pub fn status_of<T>(result: &Result<T>) -> Status {
    match result {
        Ok(_) => Status::Success,
        Err(err) => err.status(),
    }
}

/// Most recent diagnostic recorded by a failing call, if any.
pub fn last_error() -> Option<String> {
    LAST_ERROR.lock().clone()
}

/// Reset the last-error slot.
pub fn clear_last_error() {
    *LAST_ERROR.lock() = None;
}
