//! XTEA block primitive

/// Key schedule constant
pub const DELTA: u32 = 0x9E3779B9;

/// Round count the T4e bootloader uses
pub const ROUNDS: u32 = 32;

/// Block size in bytes
pub const BLOCK_LEN: usize = 8;

/// Key shipped with the Lotus T4e bootloader
pub const T4E_KEY: [u32; 4] = [0x8fcb06da, 0xac193e62, 0x41500c5c, 0x64a7b1db];

pub type Block = [u32; 2];

pub fn encipher(rounds: u32, block: Block, key: &[u32; 4]) -> Block {
    let [mut v0, mut v1] = block;
    let mut sum = 0u32;

    for _ in 0..rounds {
        v0 = v0.wrapping_add(
            (((v1 << 4) ^ (v1 >> 5)).wrapping_add(v1)) ^ sum.wrapping_add(key[(sum & 3) as usize]),
        );
        sum = sum.wrapping_add(DELTA);
        v1 = v1.wrapping_add(
            (((v0 << 4) ^ (v0 >> 5)).wrapping_add(v0))
                ^ sum.wrapping_add(key[((sum >> 11) & 3) as usize]),
        );
    }

    [v0, v1]
}

pub fn decipher(rounds: u32, block: Block, key: &[u32; 4]) -> Block {
    let [mut v0, mut v1] = block;
    let mut sum = DELTA.wrapping_mul(rounds);

    for _ in 0..rounds {
        v1 = v1.wrapping_sub(
            (((v0 << 4) ^ (v0 >> 5)).wrapping_add(v0))
                ^ sum.wrapping_add(key[((sum >> 11) & 3) as usize]),
        );
        sum = sum.wrapping_sub(DELTA);
        v0 = v0.wrapping_sub(
            (((v1 << 4) ^ (v1 >> 5)).wrapping_add(v1)) ^ sum.wrapping_add(key[(sum & 3) as usize]),
        );
    }

    [v0, v1]
}
