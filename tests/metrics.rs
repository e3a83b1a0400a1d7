#![cfg(feature = "metrics")]
//! Tests for decoder counters using
//! `metrics_util::debugging::DebuggingRecorder`.

use metrics_util::debugging::{DebugValue, DebuggingRecorder, Snapshotter};
use rstest::rstest;
use sipframe::{Decoder, DecoderConfig, metrics as sip_metrics};
use sipframe_testing::{Event, Recorder, SipMessage, feed_in_chunks};

/// Creates a debugging recorder and snapshotter for metrics testing.
fn debugging_recorder_setup() -> (Snapshotter, DebuggingRecorder) {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    (snapshotter, recorder)
}

fn counter(snapshotter: &Snapshotter, name: &str, label: Option<(&str, &str)>) -> u64 {
    snapshotter
        .snapshot()
        .into_vec()
        .into_iter()
        .filter(|(key, _, _, _)| {
            key.key().name() == name
                && label.is_none_or(|(k, v)| {
                    key.key().labels().any(|l| l.key() == k && l.value() == v)
                })
        })
        .map(|(_, _, _, value)| match value {
            DebugValue::Counter(c) => c,
            _ => 0,
        })
        .sum()
}

#[rstest]
#[case(1)]
#[case(3)]
fn decoded_messages_are_counted_by_method(#[case] invites: usize) {
    let (snapshotter, recorder) = debugging_recorder_setup();
    let invite = SipMessage::request("INVITE", "sip:bob@example.com").via("z9hG4bK1").build();
    let bye = SipMessage::request("BYE", "sip:bob@example.com").via("z9hG4bK2").build();
    let wire = [invite.repeat(invites), bye].concat();

    metrics::with_local_recorder(&recorder, || {
        let mut decoder = Decoder::new(Recorder::default(), DecoderConfig::default());
        feed_in_chunks(&mut decoder, wire.as_bytes(), 11).expect("unbounded buffer");
    });

    assert_eq!(
        counter(&snapshotter, sip_metrics::MESSAGES_DECODED, Some(("method", "invite"))),
        invites as u64
    );
    assert_eq!(
        counter(&snapshotter, sip_metrics::MESSAGES_DECODED, Some(("method", "bye"))),
        1
    );
}

#[test]
fn suspensions_are_counted() {
    let (snapshotter, recorder) = debugging_recorder_setup();
    let wire = SipMessage::request("ACK", "sip:bob@example.com").build();

    metrics::with_local_recorder(&recorder, || {
        let mut decoder = Decoder::new(
            Recorder::suspending([(0, Event::TransportBegin), (0, Event::MessageEnd)]),
            DecoderConfig::default(),
        );
        let mut buffer = feed_in_chunks(&mut decoder, wire.as_bytes(), 64).expect("unbounded");
        decoder.on_data(&mut buffer, true).expect("suspended");
        decoder.on_data(&mut buffer, true).expect("suspended");
    });

    assert_eq!(counter(&snapshotter, sip_metrics::MESSAGES_SUSPENDED, None), 2);
}

#[test]
fn buffer_limit_rejections_are_counted() {
    let (snapshotter, recorder) = debugging_recorder_setup();
    let config = DecoderConfig::default().max_buffered_bytes(std::num::NonZeroUsize::new(8));

    metrics::with_local_recorder(&recorder, || {
        let mut decoder = Decoder::new(Recorder::default(), config);
        let result = feed_in_chunks(&mut decoder, b"INVITE sip:bob@example.com", 64);
        assert!(result.is_err());
    });

    assert_eq!(counter(&snapshotter, sip_metrics::BUFFER_LIMIT_EXCEEDED, None), 1);
}
