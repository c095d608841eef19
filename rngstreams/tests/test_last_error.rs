//! Last-error slot
//!
//! Kept in its own binary with a single test: the slot is process-wide.

use rngstreams::error::{clear_last_error, last_error, status_of};
use rngstreams::prelude::*;

#[test]
fn test_last_error_records_function_and_detail() {
    clear_last_error();
    assert_eq!(last_error(), None);

    let mut creator = StreamCreator::<Mrg32k3a>::create(None);
    creator.create_stream();
    assert_eq!(last_error(), None, "success must not record anything");

    let result = creator.change_spacing(-1, 0);
    assert_eq!(status_of(&result), Status::InvalidValue);
    assert_eq!(
        last_error().as_deref(),
        Some("Invalid value: change_spacing(): e must be >= 0")
    );

    let mut shared = StreamCreator::<Mrg32k3a>::shared_default();
    let result = shared.set_base_state(Mrg32k3a::default_base_state());
    assert_eq!(status_of(&result), Status::InvalidStreamCreator);
    let message = last_error().unwrap();
    assert!(message.contains("set_base_state(): "), "{}", message);

    // The slot holds only the most recent failure
    clear_last_error();
    assert_eq!(last_error(), None);
    assert_eq!(status_of(&creator.change_spacing(3, 0)), Status::Success);
    assert_eq!(last_error(), None);
}
