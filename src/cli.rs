// Command-line front end for golombdelta.
//
// Integer lists are read and written as text (see `crate::io`); the
// encoded side is the raw Exp-Golomb bitstream.  Omitted paths mean
// stdin/stdout.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::{ArgAction, Args, Parser, Subcommand};
use log::{LevelFilter, debug};

use crate::golomb::codeword::{Codeword, MAX_CODEWORD_BITS};
use crate::io::{self as codec_io, CodecOptions};

const BUF_SIZE: usize = 64 * 1024;

// ---------------------------------------------------------------------------
// Clap CLI definition
// ---------------------------------------------------------------------------

/// Signed Exp-Golomb integer coder with optional delta transform.
#[derive(Parser, Debug)]
#[command(
    name = "golombdelta",
    version,
    about = "Exp-Golomb / delta integer coder",
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Cmd,

    /// Force overwrite existing output files.
    #[arg(short = 'f', long, global = true)]
    force: bool,

    /// Quiet mode (suppress non-error output).
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Verbose mode (use multiple times for more detail).
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Output stats as JSON to stderr.
    #[arg(long = "json", global = true)]
    json_output: bool,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Encode a text list of integers into a bitstream.
    Encode(EncodeArgs),
    /// Decode a bitstream into a text list of integers.
    Decode(DecodeArgs),
    /// Print the codeword of each value.
    Codeword(CodewordArgs),
    /// Print build/configuration details.
    Config,
}

#[derive(Args, Debug)]
struct EncodeArgs {
    /// Delta-encode against the start value.
    #[arg(short = 'd', long)]
    delta: bool,

    /// Start value for delta encoding [default: 0].
    #[arg(long, allow_negative_numbers = true, requires = "delta")]
    start: Option<i64>,

    /// Input text file (stdin if omitted).
    input: Option<PathBuf>,

    /// Output bitstream file (stdout if omitted).
    output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct DecodeArgs {
    /// Treat the stream as delta-coded residuals.
    #[arg(short = 'd', long)]
    delta: bool,

    /// Base value for delta decoding [default: 0].
    #[arg(long, allow_negative_numbers = true, requires = "delta")]
    base: Option<i64>,

    /// Stop after this many values.
    #[arg(short = 'n', long)]
    count: Option<usize>,

    /// Input bitstream file (stdin if omitted).
    input: Option<PathBuf>,

    /// Output text file (stdout if omitted).
    output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct CodewordArgs {
    /// Values to show.
    #[arg(required = true, allow_negative_numbers = true)]
    values: Vec<i64>,
}

// ---------------------------------------------------------------------------
// Resolved options
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Encode,
    Decode,
    Codeword,
    Config,
}

#[derive(Debug)]
struct Options {
    command: Command,
    codec: CodecOptions,
    input_file: Option<PathBuf>,
    output_file: Option<PathBuf>,
    values: Vec<i64>,
    force: bool,
    quiet: bool,
    verbose: u8,
    json_output: bool,
}

fn resolve_options(cli: Cli) -> Options {
    let mut opts = Options {
        command: Command::Config,
        codec: CodecOptions::default(),
        input_file: None,
        output_file: None,
        values: Vec::new(),
        force: cli.force,
        quiet: cli.quiet,
        verbose: cli.verbose.min(2),
        json_output: cli.json_output,
    };

    match cli.command {
        Cmd::Encode(args) => {
            opts.command = Command::Encode;
            opts.codec.delta_base = args.delta.then(|| args.start.unwrap_or(0));
            opts.input_file = args.input;
            opts.output_file = args.output;
        }
        Cmd::Decode(args) => {
            opts.command = Command::Decode;
            opts.codec.delta_base = args.delta.then(|| args.base.unwrap_or(0));
            opts.codec.max_count = args.count;
            opts.input_file = args.input;
            opts.output_file = args.output;
        }
        Cmd::Codeword(args) => {
            opts.command = Command::Codeword;
            opts.values = args.values;
        }
        Cmd::Config => {}
    }

    opts
}

fn log_level(opts: &Options) -> LevelFilter {
    if opts.quiet {
        return LevelFilter::Error;
    }
    match opts.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    }
}

// ---------------------------------------------------------------------------
// I/O plumbing
// ---------------------------------------------------------------------------

fn open_input(path: Option<&Path>) -> Result<Box<dyn BufRead>, String> {
    match path {
        Some(path) => File::open(path)
            .map(|f| Box::new(BufReader::with_capacity(BUF_SIZE, f)) as Box<dyn BufRead>)
            .map_err(|e| format!("input file: {}: {e}", path.display())),
        None => Ok(Box::new(BufReader::new(io::stdin()))),
    }
}

fn open_output(path: Option<&Path>, force: bool) -> Result<Box<dyn Write>, String> {
    match path {
        None => Ok(Box::new(BufWriter::with_capacity(
            BUF_SIZE,
            io::stdout().lock(),
        ))),
        Some(path) => {
            if path.exists() && !force {
                return Err(format!(
                    "output file exists, use -f to overwrite: {}",
                    path.display()
                ));
            }
            File::create(path)
                .map(|f| Box::new(BufWriter::with_capacity(BUF_SIZE, f)) as Box<dyn Write>)
                .map_err(|e| format!("output file: {}: {e}", path.display()))
        }
    }
}

fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => eprintln!("{s}"),
        Err(e) => eprintln!("golombdelta: json error: {e}"),
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn cmd_encode(opts: &Options) -> i32 {
    let reader = match open_input(opts.input_file.as_deref()) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("golombdelta: encode: {e}");
            return 1;
        }
    };
    let writer = match open_output(opts.output_file.as_deref(), opts.force) {
        Ok(w) => w,
        Err(e) => {
            eprintln!("golombdelta: encode: {e}");
            return 1;
        }
    };

    let stats = match codec_io::encode_stream(reader, writer, &opts.codec) {
        Ok((_, stats)) => stats,
        Err(e) => {
            eprintln!("golombdelta: encode: {e}");
            if let Some(path) = &opts.output_file {
                codec_io::discard_output(path);
            }
            return 1;
        }
    };

    if opts.verbose > 0 && !opts.quiet {
        eprintln!(
            "golombdelta: encoder: values: {}, bits: {}, output size: {}",
            stats.values, stats.bits, stats.output_size
        );
    }

    if opts.json_output {
        print_json(&serde_json::json!({
            "command": "encode",
            "values": stats.values,
            "bits": stats.bits,
            "output_size": stats.output_size,
            "delta_start": opts.codec.delta_base,
        }));
    }

    0
}

fn cmd_decode(opts: &Options) -> i32 {
    let reader: Box<dyn Read> = match &opts.input_file {
        Some(path) => match File::open(path) {
            Ok(f) => Box::new(BufReader::with_capacity(BUF_SIZE, f)),
            Err(e) => {
                eprintln!("golombdelta: input file: {}: {e}", path.display());
                return 1;
            }
        },
        None => Box::new(BufReader::new(io::stdin())),
    };

    let writer = match open_output(opts.output_file.as_deref(), opts.force) {
        Ok(w) => w,
        Err(e) => {
            eprintln!("golombdelta: {e}");
            return 1;
        }
    };

    let stats = match codec_io::decode_stream(reader, writer, &opts.codec) {
        Ok((_, stats)) => stats,
        Err(e) => {
            eprintln!("golombdelta: decode: {e}");
            if let Some(path) = &opts.output_file {
                codec_io::discard_output(path);
            }
            return 1;
        }
    };

    if opts.verbose > 0 && !opts.quiet {
        eprintln!(
            "golombdelta: decoder: values: {}, input size: {}, partial tail: {}",
            stats.values, stats.input_size, stats.partial_tail
        );
    }

    if opts.json_output {
        print_json(&serde_json::json!({
            "command": "decode",
            "values": stats.values,
            "input_size": stats.input_size,
            "partial_tail": stats.partial_tail,
            "delta_base": opts.codec.delta_base,
        }));
    }

    0
}

fn cmd_codeword(opts: &Options) -> i32 {
    let words: Vec<(i64, Codeword)> = opts.values.iter().map(|&v| (v, Codeword::of(v))).collect();

    if opts.json_output {
        let rows: Vec<_> = words
            .iter()
            .map(|(v, cw)| {
                serde_json::json!({
                    "value": v,
                    "bits": cw.bit_len(),
                    "codeword": cw.to_string(),
                })
            })
            .collect();
        print_json(&serde_json::Value::Array(rows));
    }

    let mut out = io::stdout().lock();
    for (value, cw) in &words {
        if let Err(e) = writeln!(out, "{value}\t{}\t{cw}", cw.bit_len()) {
            eprintln!("golombdelta: write error: {e}");
            return 1;
        }
    }
    0
}

fn cmd_config() -> i32 {
    println!("golombdelta version {}", env!("CARGO_PKG_VERSION"));
    println!("value type: i64 (full range)");
    println!("longest codeword: {MAX_CODEWORD_BITS} bits");
    println!("bit order: MSB-first, final byte zero-padded");
    println!("framing: none (raw, unterminated bitstream)");
    0
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run() -> ! {
    let cli = Cli::parse();
    let opts = resolve_options(cli);

    // RUST_LOG, when set, overrides the level picked from -q/-v.
    env_logger::Builder::new()
        .filter_level(log_level(&opts))
        .parse_default_env()
        .format_timestamp(None)
        .format_target(false)
        .init();
    debug!("resolved options: {opts:?}");

    let exit_code = match opts.command {
        Command::Encode => cmd_encode(&opts),
        Command::Decode => cmd_decode(&opts),
        Command::Codeword => cmd_codeword(&opts),
        Command::Config => cmd_config(),
    };

    process::exit(exit_code);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
