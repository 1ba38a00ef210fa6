mod config;
mod error;
mod format;
mod kinds;

use std::io::{IsTerminal, Read, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::config::load_config;
use crate::error::ToolError;
use crate::format::Format;
use crate::kinds::{Kind, encode};

#[derive(Parser)]
#[command(name = "gm")]
#[command(
    about = "Decode, transcode and inspect Graph payloads through the typed models",
    long_about = None
)]
struct Cli {
    /// Log decoder decisions (unknown type tags, captured fields)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Indent JSON output
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decode a payload and report what it decoded to
    Decode {
        /// Model family to decode through
        #[arg(long, value_enum)]
        kind: Kind,

        /// Input encoding: json or cbor
        #[arg(long, default_value = "json")]
        format: Format,

        /// Input file (default: stdin)
        input: Option<PathBuf>,
    },

    /// Re-encode a payload through the typed models
    Transcode {
        #[arg(long, value_enum)]
        kind: Kind,

        /// Input encoding: json or cbor
        #[arg(long, default_value = "json")]
        from: Format,

        /// Output encoding (default: from the config file)
        #[arg(long)]
        to: Option<Format>,

        input: Option<PathBuf>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the wire fields a family's base record declares
    Fields {
        #[arg(long, value_enum)]
        kind: Kind,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = load_config();
    let pretty = cli.pretty || config.output.pretty;

    match cli.command {
        Command::Decode { kind, format, input } => {
            let bytes = read_input(input.as_deref())?;
            let decoded = kind.decode(&bytes, format)?;

            println!("type: {}", decoded.type_name);
            let keys = decoded.additional_keys();
            if keys.is_empty() {
                println!("additional data: (none)");
            } else {
                println!("additional data: {}", keys.join(", "));
            }
            let json = encode(decoded.record.as_ref(), Format::Json, pretty)?;
            println!("{}", String::from_utf8_lossy(&json));
        }
        Command::Transcode {
            kind,
            from,
            to,
            input,
            output,
        } => {
            let to = to.unwrap_or(config.output.format);
            let bytes = read_input(input.as_deref())?;
            let decoded = kind.decode(&bytes, from)?;
            tracing::debug!(type_name = decoded.type_name, %from, %to, "transcoding");
            let encoded = encode(decoded.record.as_ref(), to, pretty)?;

            match output {
                Some(path) => std::fs::write(path, encoded)?,
                None if to == Format::Cbor && std::io::stdout().is_terminal() => {
                    return Err(ToolError::BinaryOutput.into());
                }
                None => {
                    let mut stdout = std::io::stdout().lock();
                    stdout.write_all(&encoded)?;
                    if to == Format::Json {
                        writeln!(stdout)?;
                    }
                }
            }
        }
        Command::Fields { kind } => {
            for name in kind.fields() {
                println!("{}", name);
            }
        }
    }

    Ok(())
}

fn read_input(path: Option<&Path>) -> Result<Vec<u8>, ToolError> {
    match path {
        Some(path) if path != Path::new("-") => Ok(std::fs::read(path)?),
        _ => {
            let mut buf = Vec::new();
            std::io::stdin().read_to_end(&mut buf)?;
            Ok(buf)
        }
    }
}
