/// Size of the serialised header
pub const HEADER_LEN: usize = 76;

/// Leading bytes the bootloader expects, presumably the first XTEA round of its own data
pub const SEED: [u8; 8] = [0x25, 0x36, 0xAD, 0x49, 0x79, 0x5C, 0x86, 0x7A];

/// Fixed identifier checked by the bootloader
pub const IDENT: &[u8; 32] = b"T4E                             ";

/// `len_hdr_data` counts this much on top of the payload, not the full header size
pub const LEN_HDR_EXTRA: u32 = 0x40;

// Field offsets within the header
pub(crate) const OFF_SEED: usize = 0;
pub(crate) const OFF_LEN_HDR_DATA: usize = 8;
pub(crate) const OFF_IDENT: usize = 12;
pub(crate) const OFF_FLASH_ADDR: usize = 44;
pub(crate) const OFF_LEN_DATA: usize = 48;
pub(crate) const OFF_RESERVED_MIN: usize = 52;
pub(crate) const OFF_RESERVED_MAX: usize = 56;

/// CAN bootloader header prefixed to a payload before encryption.
///
/// Integer fields are big-endian on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootloaderHeader {
    pub seed: [u8; 8],
    /// Payload length plus 0x40
    pub len_hdr_data: u32,
    pub ident: [u8; 32],
    pub flash_addr: u32,
    /// Payload length excluding block padding
    pub len_data: u32,
    /// Unknown, 0xA00 related. Possibly a min bootloader version
    pub reserved_min: u32,
    /// Unknown, 0xA00 related. Possibly a max bootloader version
    pub reserved_max: u32,
}

impl BootloaderHeader {
    /// `padding_size` is part of `flash_size`; a larger value records an empty payload
    pub fn new(flash_size: u32, padding_size: u32, flash_addr: u32) -> Self {
        let len_data = flash_size.saturating_sub(padding_size);

        Self {
            seed: SEED,
            len_hdr_data: len_data.wrapping_add(LEN_HDR_EXTRA),
            ident: *IDENT,
            flash_addr,
            len_data,
            reserved_min: 0,
            reserved_max: 0,
        }
    }

    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut buf = [0u8; HEADER_LEN];

        buf[OFF_SEED..OFF_SEED + 8].copy_from_slice(&self.seed);
        put_be_u32(&mut buf, OFF_LEN_HDR_DATA, self.len_hdr_data);
        buf[OFF_IDENT..OFF_IDENT + 32].copy_from_slice(&self.ident);
        put_be_u32(&mut buf, OFF_FLASH_ADDR, self.flash_addr);
        put_be_u32(&mut buf, OFF_LEN_DATA, self.len_data);
        put_be_u32(&mut buf, OFF_RESERVED_MIN, self.reserved_min);
        put_be_u32(&mut buf, OFF_RESERVED_MAX, self.reserved_max);
        // Trailing 16 bytes stay zero

        buf
    }

    /// Identifier with the space padding stripped
    pub fn ident_str(&self) -> String {
        String::from_utf8_lossy(&self.ident).trim_end().to_string()
    }
}

fn put_be_u32(buf: &mut [u8], offset: usize, value: u32) {
    buf[offset..offset + 4].copy_from_slice(&value.to_be_bytes());
}
