use std::io::{IsTerminal, Read};
use std::path::PathBuf;
use std::process;

use clap::{CommandFactory, Parser};

use framely::{
    format_debug, format_headers_only, format_json, parse_with, CollectedRequest,
    ContiguousParser, Rejection, SegmentedParser,
};

/// framely CLI — strict HTTP/1.1 request-frame parser.
///
/// Reads a raw HTTP request from a file, --raw string, or stdin and
/// prints the parsed request line and headers in the chosen format.
///
/// Escape sequences (\r, \n, \t, \\) in the --raw value are interpreted
/// so you can pass a full HTTP request as a single shell argument.
#[derive(Parser)]
#[command(name = "framely-cli", version, about, long_about = None)]
struct Cli {
    /// Path to a file containing a raw HTTP request.
    /// Reads from stdin when neither FILE nor --raw is given.
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Raw HTTP request string (escape sequences \r \n \t \\ are expanded).
    #[arg(long)]
    raw: Option<String>,

    /// Output format.
    #[arg(short, long, default_value = "json", value_enum)]
    format: OutputFormat,

    /// Pretty-print JSON output (ignored for other formats).
    #[arg(short, long)]
    pretty: bool,

    /// Parsing strategy to drive.
    #[arg(short, long, default_value = "contiguous", value_enum)]
    strategy: Strategy,

    /// Suppress the escaped input snippet in rejection messages.
    #[arg(long)]
    no_detail: bool,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum OutputFormat {
    /// JSON output
    Json,
    /// Human-readable debug output
    Debug,
    /// Request-line + headers only
    Headers,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum Strategy {
    /// Single-contiguous-region fast path.
    Contiguous,
    /// Segment-tolerant general strategy.
    Generic,
}

fn main() {
    let cli = Cli::parse();

    // When no input source is provided and stdin is a terminal (not piped),
    // show help instead of blocking.
    if cli.file.is_none() && cli.raw.is_none() && std::io::stdin().is_terminal() {
        Cli::command().print_help().ok();
        println!();
        process::exit(0);
    }

    let data = match read_input(&cli) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error reading input: {e}");
            process::exit(1);
        }
    };

    if data.is_empty() {
        eprintln!("Error: empty input");
        process::exit(1);
    }

    let frame = match parse_frame(&cli, &data) {
        Ok(Some(frame)) => frame,
        Ok(None) => {
            eprintln!("Parse error: input ended before the request frame was complete");
            process::exit(2);
        }
        Err(e) => {
            eprintln!("Parse error: {e}");
            process::exit(2);
        }
    };

    let output = match cli.format {
        OutputFormat::Json => format_json(&frame, cli.pretty),
        OutputFormat::Debug => format_debug(&frame),
        OutputFormat::Headers => format_headers_only(&frame),
    };

    print!("{output}");
}

/// Run the selected strategy over the raw request bytes.
fn parse_frame(cli: &Cli, data: &[u8]) -> Result<Option<CollectedRequest>, Rejection> {
    let detailed = !cli.no_detail;
    match cli.strategy {
        Strategy::Contiguous => {
            let mut parser = ContiguousParser::with_detailed_rejections(detailed);
            parse_with(&mut parser, data)
        }
        Strategy::Generic => {
            let mut parser = SegmentedParser::with_detailed_rejections(detailed);
            parse_with(&mut parser, data)
        }
    }
}

/// Read raw HTTP bytes from --raw, a file, or stdin.
fn read_input(cli: &Cli) -> Result<Vec<u8>, std::io::Error> {
    if let Some(raw) = &cli.raw {
        return Ok(unescape(raw).into_bytes());
    }
    match &cli.file {
        Some(path) => std::fs::read(path),
        None => {
            let mut buf = Vec::new();
            std::io::stdin().read_to_end(&mut buf)?;
            Ok(buf)
        }
    }
}

/// Expand C-style escape sequences (`\r`, `\n`, `\t`, `\\`) in a string.
///
/// Any other `\X` sequence is kept as-is (both the backslash and `X`).
fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            match chars.next() {
                Some('r') => out.push('\r'),
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some('\\') => out.push('\\'),
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
                None => out.push('\\'),
            }
        } else {
            out.push(ch);
        }
    }
    out
}
