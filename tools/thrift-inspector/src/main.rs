use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, ValueEnum};
use thrift_skip::codec::types::MessageHeader;
use thrift_skip::internal::limits::DEFAULT_MAX_DEPTH;
use thrift_skip::{
    BinaryProtocol, BinaryProtocolConfig, MemoryBuffer, ProtocolReader, Result, SkipLimits, TType,
};

/// Skips Thrift binary-encoded values in a file and reports their sizes.
#[derive(Parser, Debug)]
#[command(name = "thrift-inspector", version)]
struct Args {
    /// File holding binary-encoded data
    file: PathBuf,

    /// Type of the value(s) to skip
    #[arg(long = "type", value_enum, default_value_t = ValueKind::Struct)]
    value_type: ValueKind,

    /// Skip engine to use
    #[arg(long, value_enum, default_value_t = Engine::Binary)]
    engine: Engine,

    /// Read a message header before the first value
    #[arg(long)]
    message: bool,

    /// Reject message headers without a version word
    #[arg(long)]
    strict_read: bool,

    /// Keep skipping values until the input is exhausted
    #[arg(long)]
    repeat: bool,

    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    #[arg(long)]
    max_container_size: Option<usize>,

    #[arg(long)]
    max_string_len: Option<usize>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ValueKind {
    Bool,
    Byte,
    I16,
    I32,
    I64,
    Double,
    String,
    Struct,
    Map,
    Set,
    List,
}

impl From<ValueKind> for TType {
    fn from(kind: ValueKind) -> TType {
        match kind {
            ValueKind::Bool => TType::Bool,
            ValueKind::Byte => TType::Byte,
            ValueKind::I16 => TType::I16,
            ValueKind::I32 => TType::I32,
            ValueKind::I64 => TType::I64,
            ValueKind::Double => TType::Double,
            ValueKind::String => TType::String,
            ValueKind::Struct => TType::Struct,
            ValueKind::Map => TType::Map,
            ValueKind::Set => TType::Set,
            ValueKind::List => TType::List,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Engine {
    /// Raw byte layout, no protocol dispatch
    Binary,
    /// Typed protocol primitives
    Protocol,
}

#[derive(Debug, Default, PartialEq)]
struct Report {
    header: Option<(MessageHeader, usize)>,
    values: Vec<usize>,
    remaining: usize,
}

impl Args {
    fn limits(&self) -> SkipLimits {
        SkipLimits {
            max_depth: self.max_depth,
            max_container_size: self.max_container_size,
            max_string_len: self.max_string_len,
        }
    }

    fn protocol_config(&self) -> BinaryProtocolConfig {
        BinaryProtocolConfig {
            strict_read: self.strict_read,
            string_limit: self.max_string_len,
            container_limit: self.max_container_size,
            ..Default::default()
        }
    }
}

fn inspect(data: Vec<u8>, args: &Args) -> Result<Report> {
    let mut protocol = BinaryProtocol::with_config(MemoryBuffer::from(data), args.protocol_config());
    let limits = args.limits();
    let ttype = TType::from(args.value_type);
    let mut report = Report::default();

    if args.message {
        report.header = Some(protocol.read_message_begin()?);
    }

    loop {
        let consumed = match args.engine {
            Engine::Binary => protocol.skip_binary_with_limits(ttype, &limits)?,
            Engine::Protocol => protocol.skip_with_limits(ttype, &limits)?,
        };
        tracing::debug!(index = report.values.len(), consumed, "skipped value");
        report.values.push(consumed);
        if !args.repeat || protocol.transport().is_empty() {
            break;
        }
    }

    report.remaining = protocol.transport().available();
    Ok(report)
}

fn run(args: &Args) -> Result<()> {
    let data = std::fs::read(&args.file)?;
    tracing::info!(path = %args.file.display(), len = data.len(), "inspecting");
    let report = inspect(data, args)?;

    if let Some((header, len)) = &report.header {
        println!(
            "message {:?} name={} seq={} ({} bytes)",
            header.message_type, header.name, header.sequence_id, len
        );
    }
    for (index, consumed) in report.values.iter().enumerate() {
        println!("{:?} #{}: {} bytes", args.value_type, index, consumed);
    }
    let total: usize = report.values.iter().sum();
    println!("total: {} bytes, {} bytes remaining", total, report.remaining);
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = match args.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
