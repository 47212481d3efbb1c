//! Decrypts an encrypted MicroMsg database into a plaintext SQLite file
//!
//! Accepts both `--db <path> --key <hex> --out <path>` and the shorter
//! `mmdb-decrypt <input> <output>`. Without a key, it is derived from the
//! config files next to the database.

use clap::error::ErrorKind;
use clap::{ArgAction, CommandFactory, Parser};
use colored::Colorize;
use log::info;
use mmdb_rs::{logger, Config, HexKey};
use std::path::PathBuf;
use std::process;

#[derive(Debug, Parser)]
#[command(name = "mmdb-decrypt", version, about)]
struct Args {
    /// Encrypted database file
    #[arg(long, value_name = "PATH", conflicts_with = "input")]
    db: Option<PathBuf>,

    /// Raw database key as hex. Leave empty to derive the key from
    /// CompatibleInfo.cfg and systemInfo.cfg
    #[arg(long, value_name = "HEXKEY", default_value = "")]
    key: String,

    /// Output database file
    #[arg(long, value_name = "PATH", conflicts_with = "output")]
    out: Option<PathBuf>,

    /// Apply PRAGMA cipher_compatibility before reading a derived-key database
    #[arg(long, value_name = "VERSION", value_parser = clap::value_parser!(u8).range(1..=4))]
    compat: Option<u8>,

    /// Replace the output file if it already exists
    #[arg(short, long)]
    force: bool,

    /// Print more detail, repeat for engine statements
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Only print errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Encrypted database file
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,

    /// Output database file
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,
}

impl Args {
    fn config(&self) -> Result<Config, mmdb_rs::Error> {
        let (source, output) = match (
            self.db.as_ref().or(self.input.as_ref()),
            self.out.as_ref().or(self.output.as_ref()),
        ) {
            (Some(source), Some(output)) => (source.clone(), output.clone()),
            _ => Args::command()
                .error(
                    ErrorKind::MissingRequiredArgument,
                    "No file specified, both a database and an output path are required",
                )
                .exit(),
        };

        let config = if self.key.trim().is_empty() {
            Config::derived(source, output)
        } else {
            info!("Using supplied key");
            Config::explicit(source, output, HexKey::parse(&self.key)?)
        };
        Ok(config
            .with_compatibility(self.compat)
            .with_overwrite(self.force))
    }
}

fn run() -> Result<(), mmdb_rs::Error> {
    let args = Args::parse();
    if let Err(e) = logger::init(logger::level_from_flags(args.verbose, args.quiet)) {
        eprintln!("{}: {}", "warning".bold().yellow(), e);
    }
    let config = args.config()?;
    mmdb_rs::convert(&config)
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".bold().red(), e);
        process::exit(1);
    }
}
