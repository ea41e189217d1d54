use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use clap_num::maybe_hex;
use crp_tools::{
    codec::{CrpCodec, PackOptions},
    commands::{info::info_file, pack::pack_file, unpack::unpack_file},
    config::CodecConfig,
    size_policy::FlashRegion,
};
use log::LevelFilter;

/// Flash addresses are always given in hex, with or without the 0x prefix
fn parse_hex_u32(s: &str) -> Result<u32, String> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    u32::from_str_radix(digits, 16).map_err(|e| format!("Invalid hex value {s:?}: {e}"))
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Encrypt a binary into a CRP payload
    Pack {
        /// Binary file that should be encrypted
        #[arg(short = 'f', long)]
        bin: PathBuf,
        /// Output CRP filename
        #[arg(short = 'c', long)]
        crp: PathBuf,
        /// Destination address in the ECU - 0x10000 for calibration, 0x20000 for program data
        #[arg(short = 'a', long, value_parser = parse_hex_u32)]
        flash_addr: u32,
        /// Size in bytes to flash to the ECU, otherwise the binary's size is used
        #[arg(short = 's', long, value_parser = maybe_hex::<u32>)]
        flash_size: Option<u32>,
        /// Prefix a T4e CAN bootloader header before encryption
        #[arg(long)]
        header: bool,
        /// Wrap the payload in a single chunk CRP container that `unpack` can read
        #[arg(long)]
        container: bool,
    },
    /// Decrypt every chunk of a CRP file to out_<offset>.bin
    Unpack {
        /// CRP firmware file
        #[arg(short = 'f', long)]
        crp: PathBuf,
        /// Folder to write the decrypted chunks to
        #[arg(short, long, default_value = ".")]
        output_folder: PathBuf,
        /// Remove the bootloader header and padding from chunks that have one
        #[arg(long)]
        strip_header: bool,
    },
    /// Print the chunk table of a CRP file
    Info {
        /// CRP firmware file
        #[arg(short = 'f', long)]
        crp: PathBuf,
    },
}

/// Packs and unpacks Lotus T4e CRP firmware files.
#[derive(Parser, Debug)]
#[command(name = "crp_tools")]
#[clap(version)]
struct Cli {
    /// JSON file with an alternate XTEA key and round count
    #[arg(short, long, global = true)]
    key_file: Option<PathBuf>,

    /// Log progress and extra detail
    #[arg(short, long, default_value_t = false, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

/// Usage errors exit with 1 like every other startup failure; help and version exit with 0
fn usage_exit_code(e: &clap::Error) -> i32 {
    if e.use_stderr() {
        1
    } else {
        0
    }
}

/// Validates user input before any file is touched
fn parse_args() -> Result<Cli> {
    let cli = Cli::try_parse().unwrap_or_else(|e| {
        let _ = e.print();
        std::process::exit(usage_exit_code(&e));
    });

    if let Command::Pack { flash_addr, .. } = &cli.command {
        FlashRegion::from_addr(*flash_addr).context("Unknown flash address given")?;
    }

    Ok(cli)
}

fn main() -> Result<()> {
    let cli = parse_args()?;

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    simple_logger::SimpleLogger::new()
        .with_level(level)
        .without_timestamps()
        .init()
        .context("Failed to initialise logger")?;

    let config = match &cli.key_file {
        Some(path) => CodecConfig::load(path)?,
        None => CodecConfig::default(),
    };
    let codec = CrpCodec::new(&config);

    match cli.command {
        Command::Pack {
            bin,
            crp,
            flash_addr,
            flash_size,
            header,
            container,
        } => {
            let options = PackOptions {
                flash_size,
                flash_addr,
                header,
            };
            pack_file(&codec, &bin, &crp, &options, container).context("Pack command failed")?
        }
        Command::Unpack {
            crp,
            output_folder,
            strip_header,
        } => {
            unpack_file(&codec, &crp, &output_folder, strip_header)
                .context("Unpack command failed")?;
        }
        Command::Info { crp } => info_file(&codec, &crp).context("Info command failed")?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex_u32("0x20000"), Ok(0x20000));
        assert_eq!(parse_hex_u32("10000"), Ok(0x10000));
        assert!(parse_hex_u32("0xZZ").is_err());
    }

    #[test]
    fn test_cli_pack() {
        let cli = Cli::try_parse_from([
            "crp_tools", "pack", "-f", "a.bin", "-c", "a.crp", "-a", "0x10000", "-s", "1024",
            "--header",
        ])
        .unwrap();

        match cli.command {
            Command::Pack {
                flash_addr,
                flash_size,
                header,
                container,
                ..
            } => {
                assert_eq!(flash_addr, 0x10000);
                assert_eq!(flash_size, Some(1024));
                assert!(header);
                assert!(!container);
            }
            _ => panic!("Expected pack command"),
        }
    }

    #[test]
    fn test_cli_requires_addr() {
        let err = Cli::try_parse_from(["crp_tools", "pack", "-f", "a.bin", "-c", "a.crp"])
            .unwrap_err();
        assert_eq!(usage_exit_code(&err), 1);
    }

    #[test]
    fn test_cli_bad_size_exits_1() {
        let err = Cli::try_parse_from([
            "crp_tools", "pack", "-f", "a.bin", "-c", "a.crp", "-a", "10000", "-s", "abc",
        ])
        .unwrap_err();
        assert_eq!(usage_exit_code(&err), 1);
    }

    #[test]
    fn test_cli_help_exits_0() {
        let err = Cli::try_parse_from(["crp_tools", "--help"]).unwrap_err();
        assert_eq!(usage_exit_code(&err), 0);
    }
}
