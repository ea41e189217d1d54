use std::{fs, path::Path};

use anyhow::{Context, Result};
use log::{info, warn};

use super::log_progress;
use crate::{
    codec::{CrpCodec, PackOptions},
    file_parsers::{boot_header::types::HEADER_LEN, crp::writer::write_crp_bytes},
};

/// Encrypt a .BIN file into a CRP payload.
///
/// By default the output is the flat encrypted blob the flashing tool expects;
/// `container` wraps it in a single chunk container that `unpack` can read back.
pub fn pack_file(
    codec: &CrpCodec,
    bin_path: &Path,
    crp_path: &Path,
    options: &PackOptions,
    container: bool,
) -> Result<()> {
    info!("Opening .BIN file: {}", bin_path.display());
    let bin = fs::read(bin_path).context("Failed to read BIN file")?;

    let packed = codec
        .pack_with_progress(&bin, options, log_progress("encrypting"))
        .context("Failed to pack BIN file")?;

    for warning in &packed.layout.warnings {
        warn!("{warning}");
    }

    if let Some(header) = &packed.header {
        info!("Created T4e CAN bootloader header ({HEADER_LEN}/0x{HEADER_LEN:X} bytes)");
        info!(
            "  \\_ Payload length: {}/0x{:X}",
            header.len_data, header.len_data
        );
        info!("  \\_ Flash addr: 0x{:X}", header.flash_addr);
    }
    info!("Encrypted {} (HDR+BIN+Padding) bytes", packed.plain_len);

    let out = if container {
        write_crp_bytes(&[packed.data.as_slice()]).context("Failed to build CRP container")?
    } else {
        packed.data
    };

    fs::write(crp_path, &out)
        .with_context(|| format!("Failed to write CRP file {}", crp_path.display()))?;
    info!("Wrote '{}' ({} bytes)", crp_path.display(), out.len());

    Ok(())
}
