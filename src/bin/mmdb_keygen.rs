//! Prints the identifiers and candidate keys found next to a database
//!
//! Each account id in systemInfo.cfg gives a different key; mmdb-decrypt
//! always uses the first one.

use clap::Parser;
use colored::Colorize;
use mmdb_rs::{logger, Error};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "mmdb-keygen", version, about)]
struct Args {
    /// Directory containing CompatibleInfo.cfg and systemInfo.cfg
    #[arg(value_name = "DIR", default_value = ".")]
    dir: PathBuf,
}

fn main() -> Result<(), Error> {
    let args = Args::parse();
    if let Err(e) = logger::init(log::LevelFilter::Warn) {
        eprintln!("{}: {}", "warning".bold().yellow(), e);
    }
    let (device_config, account_config) = mmdb_rs::companion_paths(args.dir.join("EnMicroMsg.db"));
    let identity = mmdb_rs::extract_identity(device_config, account_config)?;

    println!("Device id: {}", identity.device_id());
    for (index, uin) in identity.account_ids().iter().enumerate() {
        let key = mmdb_rs::derive(identity.device_id(), *uin);
        let marker = if index == 0 { " (used)" } else { "" };
        println!("Account id: {}{}", uin, marker);
        println!("\tKey: {}", key.cipher_key_prefix());
        println!("\tDirectory: {}", key.directory_hash());
    }
    Ok(())
}
