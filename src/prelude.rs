//! Convenience imports for hosts embedding the decoder.
//!
//! # Examples
//!
//! ```rust
//! use sipframe::prelude::*;
//!
//! fn config() -> DecoderConfig { DecoderConfig::default().own_domain("example.com") }
//! ```

pub use crate::{
    config::DecoderConfig,
    decoder::{Decoder, DecoderCallbacks},
    error::DecoderError,
    metadata::MessageMetadata,
    sip::{MethodType, MsgType},
    state_machine::{DecoderEventHandler, FilterStatus},
};
