//! Pack and unpack directions of the CRP codec

use bytes::Bytes;

use crate::{
    byte_order::{words_from_be, words_to_be},
    chain::{ChainedCodec, Direction},
    config::CodecConfig,
    error::Result,
    file_parsers::{
        boot_header::types::BootloaderHeader,
        crp::{
            parser::parse_crp_bytes,
            types::{ChunkDescriptor, CrpContainer},
        },
    },
    size_policy::{compute_flash_size, fill_flash, FlashLayout},
};

#[derive(Debug, Clone)]
pub struct PackOptions {
    /// Bytes to flash, `None` to use the whole binary
    pub flash_size: Option<u32>,
    pub flash_addr: u32,
    /// Prefix a CAN bootloader header before encrypting
    pub header: bool,
}

#[derive(Debug, Clone)]
pub struct PackedImage {
    pub layout: FlashLayout,
    pub header: Option<BootloaderHeader>,
    /// Header + payload + padding, as handed to the cipher
    pub plain_len: usize,
    /// Encrypted big-endian words
    pub data: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct DecodedChunk {
    pub descriptor: ChunkDescriptor,
    pub data: Vec<u8>,
}

/// XTEA feedback codec configured with one device family's key
#[derive(Debug, Clone)]
pub struct CrpCodec {
    chain: ChainedCodec,
}

impl CrpCodec {
    pub fn new(config: &CodecConfig) -> Self {
        Self {
            chain: ChainedCodec::new(config.key, config.rounds),
        }
    }

    pub fn encrypt(&self, plain: &[u8]) -> Vec<u8> {
        self.encrypt_with_progress(plain, |_, _| {})
    }

    pub fn decrypt(&self, cipher: &[u8]) -> Vec<u8> {
        self.decrypt_with_progress(cipher, |_, _| {})
    }

    /// Encrypt whole 8 byte blocks of `plain`; a shorter tail is dropped
    pub fn encrypt_with_progress<F>(&self, plain: &[u8], progress: F) -> Vec<u8>
    where
        F: FnMut(usize, usize),
    {
        let words = words_from_be(plain);
        words_to_be(&self.chain.run(Direction::Encrypt, &words, progress))
    }

    pub fn decrypt_with_progress<F>(&self, cipher: &[u8], progress: F) -> Vec<u8>
    where
        F: FnMut(usize, usize),
    {
        let words = words_from_be(cipher);
        words_to_be(&self.chain.run(Direction::Decrypt, &words, progress))
    }

    pub fn pack(&self, bin: &[u8], options: &PackOptions) -> Result<PackedImage> {
        self.pack_with_progress(bin, options, |_, _| {})
    }

    /// Size, optionally prefix with a header, and encrypt a raw binary
    pub fn pack_with_progress<F>(
        &self,
        bin: &[u8],
        options: &PackOptions,
        progress: F,
    ) -> Result<PackedImage>
    where
        F: FnMut(usize, usize),
    {
        let bin_size = u32::try_from(bin.len()).unwrap_or(u32::MAX);
        let layout = compute_flash_size(
            bin_size,
            options.flash_size,
            options.flash_addr,
            options.header,
        )?;

        let header = options.header.then(|| {
            BootloaderHeader::new(layout.flash_size, layout.padding_size, options.flash_addr)
        });

        let mut plain = match &header {
            Some(header) => header.to_bytes().to_vec(),
            None => vec![],
        };
        plain.extend(fill_flash(bin, layout.flash_size));

        let data = self.encrypt_with_progress(&plain, progress);

        Ok(PackedImage {
            layout,
            header,
            plain_len: plain.len(),
            data,
        })
    }

    /// Decrypt the chunk at `index` in table order
    pub fn unpack_chunk<F>(
        &self,
        container: &CrpContainer,
        index: usize,
        progress: F,
    ) -> Option<DecodedChunk>
    where
        F: FnMut(usize, usize),
    {
        let (descriptor, cipher) = container.chunks().nth(index)?;
        let data = self.decrypt_with_progress(&cipher, progress);

        Some(DecodedChunk { descriptor, data })
    }

    /// Decrypt every chunk of a container
    pub fn unpack(&self, container: &CrpContainer) -> Vec<DecodedChunk> {
        container
            .chunks()
            .map(|(descriptor, cipher)| DecodedChunk {
                descriptor,
                data: self.decrypt(&cipher),
            })
            .collect()
    }

    /// Verify, parse and decrypt a container file
    pub fn unpack_bytes(&self, contents: Bytes) -> Result<(CrpContainer, Vec<DecodedChunk>)> {
        let container = parse_crp_bytes(contents)?;
        let chunks = self.unpack(&container);
        Ok((container, chunks))
    }
}

impl Default for CrpCodec {
    fn default() -> Self {
        Self::new(&CodecConfig::default())
    }
}
