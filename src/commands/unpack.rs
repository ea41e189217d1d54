use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use log::{info, warn};

use super::log_progress;
use crate::{
    codec::CrpCodec,
    file_parsers::{
        boot_header::{types::HEADER_LEN, BootHeaderParser},
        crp::CrpParser,
        FileParser,
    },
};

/// Drop the bootloader header and block padding from a decrypted chunk, if it has a header
fn strip_boot_header(data: Vec<u8>) -> Vec<u8> {
    match BootHeaderParser.parse(&data) {
        Ok(header) => {
            info!(
                "  \\_ Bootloader header: payload 0x{:X} bytes for flash addr 0x{:X}",
                header.len_data, header.flash_addr
            );
            let end = (HEADER_LEN + header.len_data as usize).min(data.len());
            data[HEADER_LEN..end].to_vec()
        }
        Err(e) => {
            warn!("Keeping chunk as-is, no bootloader header found: {e}");
            data
        }
    }
}

/// Decrypt every chunk of a CRP file into `output_folder`, returning the written paths.
///
/// Nothing is written unless the checksum matches.
pub fn unpack_file(
    codec: &CrpCodec,
    crp_path: &Path,
    output_folder: &Path,
    strip_header: bool,
) -> Result<Vec<PathBuf>> {
    info!("Opening CRP file: {}", crp_path.display());
    let contents = fs::read(crp_path).context("Failed to read CRP file")?;
    info!("Read {} bytes", contents.len());

    let container = CrpParser.parse(&contents).context("Failed to parse CRP file")?;
    info!("Checksum 0x{:04x} => MATCH", container.checksum);
    info!("CRP chunks: {}", container.descriptors.len());

    fs::create_dir_all(output_folder).context("Failed to create output folder")?;

    let mut written = vec![];
    for index in 0..container.descriptors.len() {
        let chunk = codec
            .unpack_chunk(&container, index, log_progress("deciphering"))
            .context("Chunk missing from table")?;
        info!(
            "Chunk {}: start 0x{:x}, length 0x{:x}",
            index + 1,
            chunk.descriptor.offset,
            chunk.descriptor.length
        );

        let data = if strip_header {
            strip_boot_header(chunk.data)
        } else {
            chunk.data
        };

        let out_path = output_folder.join(chunk.descriptor.out_filename());
        fs::write(&out_path, &data)
            .with_context(|| format!("Failed to write {}", out_path.display()))?;
        info!("Wrote '{}' ({} bytes)", out_path.display(), data.len());

        written.push(out_path);
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_parsers::crp::writer::write_crp_bytes;

    #[test]
    fn test_unpack_chunks() {
        let dir = tempfile::tempdir().unwrap();
        let codec = CrpCodec::default();
        let first = vec![0x11; 24];
        let second = vec![0x22; 40];
        let file = write_crp_bytes(&[codec.encrypt(&first), codec.encrypt(&second)]).unwrap();
        let crp_path = dir.path().join("fw.crp");
        fs::write(&crp_path, file).unwrap();

        let out_dir = dir.path().join("out");
        let written = unpack_file(&codec, &crp_path, &out_dir, false).unwrap();

        assert_eq!(
            written,
            vec![
                out_dir.join("out_0000001c.bin"),
                out_dir.join("out_00000034.bin")
            ]
        );
        assert_eq!(fs::read(&written[0]).unwrap(), first);
        assert_eq!(fs::read(&written[1]).unwrap(), second);
    }

    #[test]
    fn test_unpack_bad_checksum_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let codec = CrpCodec::default();
        let mut file = write_crp_bytes(&[codec.encrypt(&[0; 16])]).unwrap();
        let last = file.len() - 2;
        file[last] = file[last].wrapping_add(1);
        let crp_path = dir.path().join("fw.crp");
        fs::write(&crp_path, file).unwrap();

        let out_dir = dir.path().join("out");
        assert!(unpack_file(&codec, &crp_path, &out_dir, false).is_err());
        assert!(!out_dir.exists());
    }

    #[test]
    fn test_strip_without_header_keeps_data() {
        assert_eq!(strip_boot_header(vec![1; 100]), vec![1; 100]);
    }
}
