#![doc(html_root_url = "https://docs.rs/sipframe/latest")]
//! Public API for the `sipframe` library.
//!
//! This crate reassembles SIP messages from a stream transport, decodes each
//! into a [`MessageMetadata`] record, and drives a per-message lifecycle
//! through a host-supplied [`DecoderEventHandler`] that may suspend and later
//! resume processing.

pub mod buffer;
pub mod codec;
pub mod config;
pub mod decoder;
pub mod error;
pub mod header;
pub mod metadata;
pub mod metrics;
pub mod prelude;
pub mod sip;
pub mod state_machine;

pub use buffer::ByteBuffer;
pub use codec::SipFrameCodec;
pub use config::DecoderConfig;
pub use decoder::{Decoder, DecoderCallbacks};
pub use error::{DecoderError, FramingError};
pub use header::{HandlerKind, HeaderHandler};
pub use metadata::{MessageMetadata, Operation, OperationKind, OperationValue};
pub use sip::{HeaderType, MethodType, MsgType};
pub use state_machine::{
    DecoderEventHandler,
    DecoderStateMachine,
    FilterStatus,
    RunStatus,
    State,
};

#[cfg(test)]
mod test_helpers;
