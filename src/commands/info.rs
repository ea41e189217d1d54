use std::{
    fs,
    io::{self, BufWriter, Write},
    path::Path,
};

use anyhow::{Context, Result};

use crate::{
    codec::CrpCodec,
    file_parsers::{boot_header::BootHeaderParser, crp::CrpParser, FileParser},
};

/// Describe a CRP file: checksum, chunk table and any bootloader headers
pub fn write_info<W: Write>(codec: &CrpCodec, contents: &[u8], out: &mut W) -> Result<()> {
    let size = contents.len();
    let container = CrpParser.parse(contents).context("Failed to parse CRP file")?;

    writeln!(out, "Size: {size} bytes")?;
    writeln!(out, "Checksum: 0x{:04x}", container.checksum)?;
    writeln!(out, "Chunks: {}", container.descriptors.len())?;

    for (i, chunk) in codec.unpack(&container).iter().enumerate() {
        let d = &chunk.descriptor;
        writeln!(
            out,
            "  [{}] offset 0x{:08x} length 0x{:08x} -> {}",
            i + 1,
            d.offset,
            d.length,
            d.out_filename()
        )?;

        if let Ok(header) = BootHeaderParser.parse(&chunk.data) {
            writeln!(
                out,
                "      {} header: payload 0x{:X} bytes, flash addr 0x{:X}",
                header.ident_str(),
                header.len_data,
                header.flash_addr
            )?;
        }
    }

    Ok(())
}

pub fn info_file(codec: &CrpCodec, crp_path: &Path) -> Result<()> {
    let contents = fs::read(crp_path).context("Failed to read CRP file")?;

    let mut stdout = BufWriter::new(io::stdout().lock());
    write_info(codec, &contents, &mut stdout)?;

    stdout.flush().context("Failed to flush stdout")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        codec::PackOptions,
        file_parsers::crp::{types::checksum, writer::write_crp_bytes},
    };

    #[test]
    fn test_info_lists_chunks_and_headers() {
        let codec = CrpCodec::default();
        let packed = codec
            .pack(
                &[0xAB; 200],
                &PackOptions {
                    flash_size: None,
                    flash_addr: 0x10000,
                    header: true,
                },
            )
            .unwrap();
        let plain_chunk = codec.encrypt(&[0; 32]);
        let file = write_crp_bytes(&[packed.data, plain_chunk]).unwrap();
        let sum = checksum(&file[..file.len() - 2]);

        let mut out = vec![];
        write_info(&codec, &file, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains(&format!("Checksum: 0x{sum:04x}")));
        assert!(text.contains("Chunks: 2"));
        assert!(text.contains("[1] offset 0x0000001c"));
        assert!(text.contains("T4E header: payload 0xC8 bytes, flash addr 0x10000"));
        assert_eq!(text.matches("header:").count(), 1);
    }
}
