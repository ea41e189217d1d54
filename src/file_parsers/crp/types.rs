use bytes::Bytes;

/// Offset of descriptor 0 in the file. Bytes 2-3 are unused.
pub const TABLE_BASE: usize = 4;

/// Size of one chunk descriptor
pub const DESCRIPTOR_LEN: usize = 8;

/// Size of the trailing checksum
pub const CHECKSUM_LEN: usize = 2;

/// Location of one encrypted region in a CRP file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkDescriptor {
    pub offset: u32,
    pub length: u32,
}

impl ChunkDescriptor {
    /// Name used when the decrypted chunk is written out
    pub fn out_filename(&self) -> String {
        format!("out_{:08x}.bin", self.offset)
    }
}

#[derive(Debug, Clone)]
pub struct CrpContainer {
    /// Count as stored in the file, one more than the number of chunks
    pub chunk_count: u16,
    pub descriptors: Vec<ChunkDescriptor>,
    pub checksum: u16,
    /// Whole file, checksum included
    pub data: Bytes,
}

impl CrpContainer {
    /// Encrypted bytes of every chunk, in table order
    pub fn chunks(&self) -> impl Iterator<Item = (ChunkDescriptor, Bytes)> + '_ {
        self.descriptors.iter().map(|d| {
            let start = d.offset as usize;
            (*d, self.data.slice(start..start + d.length as usize))
        })
    }
}

/// Bytes needed for the count field and a table holding `chunk_count` entries
pub fn table_len(chunk_count: u16) -> usize {
    match chunk_count {
        0 | 1 => 2,
        n => TABLE_BASE + DESCRIPTOR_LEN * n as usize,
    }
}

/// 16 bit additive checksum
pub fn checksum(bytes: &[u8]) -> u16 {
    bytes
        .iter()
        .fold(0u16, |sum, &b| sum.wrapping_add(b as u16))
}
