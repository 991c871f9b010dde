//! Command-line argument structures for the `asnmp-*` CLI tools.

use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::net::SocketAddr;

use bytes::Bytes;

use crate::error::Error;
use crate::util::decode_hex;

/// Output format for CLI tools.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output with type information.
    #[default]
    Human,
    /// JSON output for scripting.
    Json,
    /// Raw tab-separated varbinds.
    Raw,
}

/// Where datagrams are read from.
#[derive(Debug, Parser)]
pub struct InputArgs {
    /// Hex-encoded datagrams, one per argument. Reads one per line from
    /// stdin when omitted. Whitespace and a `0x` prefix are ignored.
    #[arg(value_name = "HEX")]
    pub datagrams: Vec<String>,

    /// Address the datagrams are treated as coming from.
    #[arg(short = 's', long = "source", default_value = "0.0.0.0:0")]
    pub source: SocketAddr,
}

impl InputArgs {
    /// Collect and hex-decode the input datagrams.
    pub fn read_datagrams(&self) -> Result<Vec<Bytes>, String> {
        let lines = if self.datagrams.is_empty() {
            let mut input = String::new();
            io::stdin()
                .read_to_string(&mut input)
                .map_err(|source| Error::Io {
                    target: None,
                    source,
                })
                .map_err(|e| format!("reading stdin: {}", e))?;
            input
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty() && !l.starts_with('#'))
                .map(String::from)
                .collect()
        } else {
            self.datagrams.clone()
        };

        if lines.is_empty() {
            return Err("no datagrams given".into());
        }

        lines
            .iter()
            .enumerate()
            .map(|(i, line)| {
                decode_hex(line)
                    .map(Bytes::from)
                    .map_err(|e| format!("datagram {}: {}", i + 1, e))
            })
            .collect()
    }
}

/// Output control arguments.
#[derive(Debug, Parser)]
pub struct OutputArgs {
    /// Output format: human, json, or raw.
    #[arg(short = 'O', long = "format", default_value = "human")]
    pub format: OutputFormat,

    /// Show message header and wire details on stderr.
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Always display OctetString as hex.
    #[arg(long = "hex")]
    pub hex: bool,

    /// Disable well-known OID name hints.
    #[arg(long = "no-hints")]
    pub no_hints: bool,

    /// Enable debug logging (snmp_mp=debug).
    #[arg(short = 'd', long = "debug")]
    pub debug: bool,

    /// Enable trace logging (snmp_mp=trace).
    #[arg(short = 'D', long = "trace")]
    pub trace: bool,
}

impl OutputArgs {
    /// Initialize tracing based on debug/trace flags.
    ///
    /// `RUST_LOG` takes precedence when set.
    pub fn init_tracing(&self) {
        use tracing_subscriber::EnvFilter;

        let filter = if self.trace {
            "snmp_mp=trace"
        } else if self.debug {
            "snmp_mp=debug"
        } else {
            "snmp_mp=warn"
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
            )
            .with_writer(std::io::stderr)
            .try_init();
    }
}
