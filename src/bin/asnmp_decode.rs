//! asnmp-decode: Decode SNMP datagrams from hex dumps.
//!
//! Part of the snmp-mp CLI utilities.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use snmp_mp::MessageDispatcher;
use snmp_mp::cli::args::{InputArgs, OutputArgs};
use snmp_mp::cli::output::{OutputContext, write_error, write_verbose_message};
use snmp_mp::security::SecurityModels;
use snmp_mp::supplies::{SupplyColumn, Supplies};

/// Decode hex-encoded SNMPv1/v2c datagrams and print their contents.
#[derive(Debug, Parser)]
#[command(name = "asnmp-decode", version, about)]
struct Args {
    #[command(flatten)]
    input: InputArgs,

    #[command(flatten)]
    output: OutputArgs,

    /// Merge Printer-MIB supply columns from all datagrams into a supplies summary.
    #[arg(long = "supplies")]
    supplies: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    args.output.init_tracing();

    let datagrams = match args.input.read_datagrams() {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let dispatcher = MessageDispatcher::builder()
        .community(Arc::new(SecurityModels::community()))
        .build();

    let ctx = OutputContext {
        format: args.output.format,
        show_hints: !args.output.no_hints,
        force_hex: args.output.hex,
    };

    let mut reports = Vec::with_capacity(datagrams.len());
    let mut supplies = Supplies::default();
    let mut failed = false;

    for datagram in datagrams {
        let size = datagram.len();
        let wire = datagram.clone();
        match dispatcher.prepare_data_elements(datagram, args.input.source) {
            Ok(elements) => {
                if args.output.verbose {
                    write_verbose_message(&elements, &wire, ctx.show_hints);
                }
                if args.supplies {
                    collect_supplies(&mut supplies, &elements.pdu.pdu().varbinds);
                }
                reports.push(ctx.build_report(&elements, size));
            }
            Err(e) => {
                write_error(&e);
                failed = true;
            }
        }
    }

    let written = if args.supplies {
        ctx.write_supplies(&supplies)
    } else {
        ctx.write_messages(&reports)
    };
    if let Err(e) = written {
        eprintln!("Error writing output: {}", e);
        return ExitCode::FAILURE;
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn collect_supplies(supplies: &mut Supplies, varbinds: &[snmp_mp::VarBind]) {
    for vb in varbinds {
        for column in [
            SupplyColumn::Level,
            SupplyColumn::MaxCapacity,
            SupplyColumn::Unit,
        ] {
            if vb.oid.starts_with(&column.oid()) {
                supplies.insert(column, vb);
            }
        }
    }
}
