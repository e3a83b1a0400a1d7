//! Binary decoding a captured SIP byte stream.
//!
//! Feeds the capture through [`sipframe::Decoder`] in fixed-size chunks, as
//! a transport would, and prints one line per decoded message.

mod cli;

use std::{error::Error, fs, sync::Arc};

use bytes::BytesMut;
use clap::Parser;
use sipframe::{
    Decoder,
    DecoderCallbacks,
    DecoderConfig,
    DecoderEventHandler,
    FilterStatus,
    MessageMetadata,
};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command, DecodeArgs};

#[derive(Debug, Default)]
struct Printer {
    decoded: usize,
}

impl DecoderCallbacks for Printer {
    type Handler = PrintHandler;

    fn new_decoder_event_handler(&mut self, _metadata: &Arc<MessageMetadata>) -> PrintHandler {
        self.decoded += 1;
        PrintHandler {
            index: self.decoded,
        }
    }
}

struct PrintHandler {
    index: usize,
}

impl DecoderEventHandler for PrintHandler {
    fn transport_begin(&mut self, _metadata: &Arc<MessageMetadata>) -> FilterStatus {
        FilterStatus::Continue
    }

    fn message_begin(&mut self, metadata: &Arc<MessageMetadata>) -> FilterStatus {
        println!(
            "#{} {:?} {} tx={} domain={} params={} operations={}",
            self.index,
            metadata.msg_type(),
            metadata.method_type(),
            metadata.transaction_id().unwrap_or("-"),
            metadata.domain().unwrap_or("-"),
            metadata.params().len(),
            metadata.operations().len(),
        );
        FilterStatus::Continue
    }

    fn message_end(&mut self) -> FilterStatus { FilterStatus::Continue }

    fn transport_end(&mut self) -> FilterStatus { FilterStatus::Continue }
}

fn decode(args: &DecodeArgs) -> Result<(), Box<dyn Error>> {
    let capture = fs::read(&args.file)?;
    let config = DecoderConfig::default()
        .own_domain(args.own_domain.clone())
        .domain_match_param_name(args.domain_param.clone())
        .max_buffered_bytes(args.max_buffered_bytes);
    let mut decoder = Decoder::new(Printer::default(), config);
    let mut buffer = BytesMut::with_capacity(args.chunk_size.get());

    for chunk in capture.chunks(args.chunk_size.get()) {
        buffer.extend_from_slice(chunk);
        decoder.on_data(&mut buffer, false)?;
    }

    if !buffer.is_empty() {
        tracing::warn!(
            trailing = buffer.len(),
            "capture ends with an incomplete message"
        );
    }
    println!("{} messages decoded", decoder.callbacks().decoded);
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    // Applications embedding the library should install their own subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Decode(args) => decode(&args),
    }
}
