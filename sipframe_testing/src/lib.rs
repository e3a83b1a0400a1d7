//! Utilities for driving a [`sipframe::Decoder`] in tests.
//!
//! Provides a recording callbacks/handler pair with scriptable suspension
//! points, builders for well-formed SIP messages, a helper that feeds a
//! byte stream to the decoder in fixed-size chunks, and serialised access
//! to a global [`logtest::Logger`].
//!
//! ```rust
//! use sipframe::{Decoder, DecoderConfig};
//! use sipframe_testing::{Recorder, SipMessage, feed_in_chunks};
//!
//! let wire = SipMessage::request("BYE", "sip:bob@example.com").build();
//! let mut decoder = Decoder::new(Recorder::default(), DecoderConfig::default());
//! let rest = feed_in_chunks(&mut decoder, wire.as_bytes(), 3).unwrap();
//! assert!(rest.is_empty());
//! assert_eq!(decoder.callbacks().messages().len(), 1);
//! ```

mod feeding;
mod logging;
mod messages;
mod recorder;

pub use feeding::{feed_in_chunks, feed_into};
pub use logging::{LoggerHandle, logger};
pub use messages::SipMessage;
pub use recorder::{Event, EventLog, FULL_LIFECYCLE, Recorder, RecordingHandler};
