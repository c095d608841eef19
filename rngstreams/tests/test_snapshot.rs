//! Snapshot save/load tests
//!
//! A restored array must continue exactly where the saved one stopped.

use rngstreams::family::XorwowState;
use rngstreams::prelude::*;
use rngstreams::snapshot::{compute_digest, load_streams, save_streams, StreamArraySnapshot};
use serde_json::Value;

fn used_streams<F: Family>() -> Vec<Stream<F>> {
    let mut creator = StreamCreator::<F>::create(None);
    let mut streams = creator.create_streams(4).unwrap();
    streams[1].forward_to_next_substream();
    for (i, stream) in streams.iter_mut().enumerate() {
        for _ in 0..(3 * i + 1) {
            stream.next_raw();
        }
    }
    streams
}

fn continues_after_reload<F: Family>() {
    let mut streams = used_streams::<F>();
    let json = save_streams(&streams).unwrap();
    let mut restored: Vec<Stream<F>> = load_streams(&json).unwrap();
    assert_eq!(restored, streams);

    for (a, b) in streams.iter_mut().zip(restored.iter_mut()) {
        for _ in 0..20 {
            assert_eq!(a.next_raw(), b.next_raw());
        }
        a.rewind_substream();
        b.rewind_substream();
        assert_eq!(a.next_raw(), b.next_raw());
    }
}

#[test]
fn test_round_trip_all_families() {
    continues_after_reload::<Mrg32k3a>();
    continues_after_reload::<Mrg31k3p>();
    continues_after_reload::<Lfsr113>();
    continues_after_reload::<Philox432>();
    continues_after_reload::<Xorwow>();
}

#[test]
fn test_tampered_state_rejected() {
    let json = save_streams(&used_streams::<Mrg32k3a>()).unwrap();
    let mut value: Value = serde_json::from_str(&json).unwrap();
    let slot = &mut value["streams"][0]["current"]["g1"][2];
    let original = slot.as_u64().unwrap();
    let changed = if original > 0 { original - 1 } else { 1 };
    *slot = Value::from(changed);
    let tampered = serde_json::to_string(&value).unwrap();

    let err = load_streams::<Mrg32k3a>(&tampered).unwrap_err();
    assert_eq!(err.status(), Status::InvalidValue);
    assert!(err.to_string().contains("digest mismatch"));
}

#[test]
fn test_unreduced_component_rejected() {
    let json = save_streams(&used_streams::<Mrg31k3p>()).unwrap();
    let mut value: Value = serde_json::from_str(&json).unwrap();
    value["streams"][2]["initial"]["g2"][1] = Value::from(2147462579u64);
    let tampered = serde_json::to_string(&value).unwrap();

    let err = load_streams::<Mrg31k3p>(&tampered).unwrap_err();
    assert_eq!(err.status(), Status::InvalidValue);
}

#[test]
fn test_wrong_family_rejected() {
    let json = save_streams(&used_streams::<Philox432>()).unwrap();
    let err = load_streams::<Xorwow>(&json).unwrap_err();
    assert_eq!(err.status(), Status::InvalidValue);
    assert!(err.to_string().contains("philox432"));
}

#[test]
fn test_invalid_cursor_is_invalid_seed() {
    // Digest is consistent, but the current cursor is the all-zero fixed point
    let mut stream = StreamCreator::<Xorwow>::create(None).create_stream();
    let stuck = Stream::<Xorwow>::from_state(XorwowState { v: [0; 5], d: 7 });
    let mut streams = vec![stream.clone(), stuck];
    stream.next_raw();
    streams.push(stream);

    let snapshot = StreamArraySnapshot::<Xorwow> {
        family: Xorwow::NAME.to_string(),
        digest: compute_digest(&streams).unwrap(),
        streams,
    };
    let err = snapshot.restore().unwrap_err();
    assert_eq!(err.status(), Status::InvalidSeed);
    assert!(err.to_string().contains("streams[1].initial"));
}

#[test]
fn test_snapshot_is_deterministic() {
    let streams = used_streams::<Lfsr113>();
    assert_eq!(save_streams(&streams).unwrap(), save_streams(&streams).unwrap());

    let mut moved = streams.clone();
    moved[3].next_raw();
    assert_ne!(
        compute_digest(&streams).unwrap(),
        compute_digest(&moved).unwrap()
    );
}
