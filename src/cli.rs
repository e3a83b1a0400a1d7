//! Command line interface for the `sipframe` binary.
//!
//! Kept free of library imports so `build.rs` can render the man page from
//! the same definition.

use std::{num::NonZeroUsize, path::PathBuf};

use clap::{Args, Parser, Subcommand};

/// Command line arguments for the `sipframe` binary.
#[derive(Debug, Parser)]
#[command(
    name = "sipframe",
    version,
    about = "Frame and decode SIP messages from a captured byte stream"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Decode every complete message in a capture file.
    Decode(DecodeArgs),
}

#[derive(Debug, Args)]
pub struct DecodeArgs {
    /// Raw stream capture to decode.
    pub file: PathBuf,

    /// Bytes delivered to the decoder per read.
    #[arg(long, default_value = "4096")]
    pub chunk_size: NonZeroUsize,

    /// Domain owned by this proxy, used for `ep` insertion.
    #[arg(long, default_value = "")]
    pub own_domain: String,

    /// URI parameter naming the routing domain; `host` uses the URI host.
    #[arg(long, default_value = "host")]
    pub domain_param: String,

    /// Fail when this many bytes are buffered without a complete message.
    #[arg(long)]
    pub max_buffered_bytes: Option<NonZeroUsize>,
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::{Cli, Command};

    #[test]
    fn parses_decode_with_defaults() {
        let cli = Cli::parse_from(["sipframe", "decode", "capture.bin"]);
        let Command::Decode(args) = cli.command;
        assert_eq!(args.file.to_str(), Some("capture.bin"));
        assert_eq!(args.chunk_size.get(), 4096);
        assert_eq!(args.domain_param, "host");
        assert!(args.own_domain.is_empty());
        assert_eq!(args.max_buffered_bytes, None);
    }

    #[test]
    fn parses_decode_options() {
        let cli = Cli::parse_from([
            "sipframe",
            "decode",
            "capture.bin",
            "--chunk-size",
            "7",
            "--own-domain",
            "scscf.example.com",
            "--domain-param",
            "x-suri",
            "--max-buffered-bytes",
            "1024",
        ]);
        let Command::Decode(args) = cli.command;
        assert_eq!(args.chunk_size.get(), 7);
        assert_eq!(args.own_domain, "scscf.example.com");
        assert_eq!(args.domain_param, "x-suri");
        assert_eq!(args.max_buffered_bytes.map(|n| n.get()), Some(1024));
    }

    #[test]
    fn rejects_zero_chunk_size() {
        assert!(Cli::try_parse_from(["sipframe", "decode", "f", "--chunk-size", "0"]).is_err());
    }
}
