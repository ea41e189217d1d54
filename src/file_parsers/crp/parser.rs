use bytes::Bytes;
use nom::{
    IResult, Parser,
    bytes::complete::take,
    multi::count,
    number::complete::{le_u16, le_u32},
};

use super::types::*;
use crate::error::{CrpError, Result};

fn descriptor(input: &[u8]) -> IResult<&[u8], ChunkDescriptor> {
    (le_u32, le_u32) //
        .map(|(offset, length)| ChunkDescriptor { offset, length })
        .parse(input)
}

/// Chunk count followed by the descriptor table. Entry 0 is never used.
fn chunk_table(input: &[u8]) -> IResult<&[u8], (u16, Vec<ChunkDescriptor>)> {
    let (input, chunk_count) = le_u16(input)?;

    let entries = chunk_count.saturating_sub(1) as usize;
    if entries == 0 {
        return Ok((input, (chunk_count, vec![])));
    }

    // Skip bytes 2-3 and entry 0
    let (input, _) = take(TABLE_BASE - 2 + DESCRIPTOR_LEN).parse(input)?;
    let (input, descriptors) = count(descriptor, entries).parse(input)?;

    Ok((input, (chunk_count, descriptors)))
}

/// Split off the trailing checksum and check it against the rest of the file
pub fn verify_checksum(contents: &[u8]) -> Result<(&[u8], u16)> {
    let Some(split) = contents.len().checked_sub(CHECKSUM_LEN) else {
        return Err(CrpError::Truncated {
            needed: CHECKSUM_LEN,
            available: contents.len(),
        });
    };
    let (body, tail) = contents.split_at(split);

    let stored = u16::from_le_bytes([tail[0], tail[1]]);
    let computed = checksum(body);
    if stored != computed {
        return Err(CrpError::ChecksumMismatch { stored, computed });
    }

    Ok((body, stored))
}

pub fn parse_crp_bytes(contents: Bytes) -> Result<CrpContainer> {
    let (body, stored) = verify_checksum(&contents)?;

    let (_, (chunk_count, descriptors)) = chunk_table(body).map_err(|_| {
        let chunk_count = match body {
            [lo, hi, ..] => u16::from_le_bytes([*lo, *hi]),
            _ => 0,
        };
        CrpError::Truncated {
            needed: table_len(chunk_count),
            available: body.len(),
        }
    })?;

    for (i, d) in descriptors.iter().enumerate() {
        let end = (d.offset as usize).checked_add(d.length as usize);
        if !end.is_some_and(|end| end <= contents.len()) {
            return Err(CrpError::ChunkOutOfBounds {
                index: i as u16 + 1,
                offset: d.offset,
                length: d.length,
                file_len: contents.len(),
            });
        }
    }

    Ok(CrpContainer {
        chunk_count,
        descriptors,
        checksum: stored,
        data: contents,
    })
}
