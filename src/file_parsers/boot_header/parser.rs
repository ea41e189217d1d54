use nom::{IResult, Parser, bytes::complete::take, number::complete::be_u32};

use super::types::*;
use crate::error::{CrpError, Result};

fn header(input: &[u8]) -> IResult<&[u8], BootloaderHeader> {
    (
        take(8_usize),
        be_u32,
        take(32_usize),
        be_u32,
        be_u32,
        be_u32,
        be_u32,
        take(16_usize),
    )
        .map(
            |(seed, len_hdr_data, ident, flash_addr, len_data, reserved_min, reserved_max, _)| {
                let mut header = BootloaderHeader {
                    seed: [0; 8],
                    len_hdr_data,
                    ident: [0; 32],
                    flash_addr,
                    len_data,
                    reserved_min,
                    reserved_max,
                };
                header.seed.copy_from_slice(seed);
                header.ident.copy_from_slice(ident);
                header
            },
        )
        .parse(input)
}

/// Decode a header from the start of a decrypted payload
pub fn parse_boot_header_bytes(contents: &[u8]) -> Result<BootloaderHeader> {
    if contents.len() < HEADER_LEN {
        return Err(CrpError::Truncated {
            needed: HEADER_LEN,
            available: contents.len(),
        });
    }

    let (_, header) =
        header(contents).map_err(|e| CrpError::InvalidHeader(format!("{e:?}")))?;

    if !header.ident.starts_with(b"T4E") {
        return Err(CrpError::InvalidHeader(format!(
            "unexpected identifier {:?}",
            header.ident_str()
        )));
    }

    Ok(header)
}
