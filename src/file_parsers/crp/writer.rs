use super::types::*;
use crate::error::{CrpError, Result};

/// Wrap already encrypted chunks in an indexed CRP container.
///
/// Chunk data follows the table back to back, and the checksum is appended last.
pub fn write_crp_bytes<C: AsRef<[u8]>>(chunks: &[C]) -> Result<Vec<u8>> {
    let chunk_count = u16::try_from(chunks.len() + 1)
        .map_err(|_| CrpError::ContainerTooLarge(format!("{} chunks", chunks.len())))?;

    let header_len = table_len(chunk_count);
    let data_len: usize = chunks.iter().map(|c| c.as_ref().len()).sum();
    let total = header_len + data_len + CHECKSUM_LEN;
    if u32::try_from(total).is_err() {
        return Err(CrpError::ContainerTooLarge(format!("{total} bytes")));
    }

    let mut out = Vec::with_capacity(total);
    out.extend(chunk_count.to_le_bytes());
    // Reserved bytes and the unused entry 0
    out.resize(header_len.min(TABLE_BASE + DESCRIPTOR_LEN), 0);

    let mut offset = header_len;
    for chunk in chunks {
        let len = chunk.as_ref().len();
        out.extend((offset as u32).to_le_bytes());
        out.extend((len as u32).to_le_bytes());
        offset += len;
    }

    for chunk in chunks {
        out.extend_from_slice(chunk.as_ref());
    }

    out.extend(checksum(&out).to_le_bytes());

    Ok(out)
}
