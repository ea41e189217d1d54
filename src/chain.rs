//! Feedback chaining of XTEA blocks.
//!
//! Each plaintext block is XORed with the previous ciphertext block before it is
//! enciphered, starting from an all-zero feedback value. Decryption deciphers
//! first and XORs afterwards with the ciphertext that preceded the block.

use crate::xtea::{self, Block};

/// Running feedback value for one chained pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChainState {
    pub feedback: Block,
}

impl ChainState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn encrypt_step(&mut self, rounds: u32, key: &[u32; 4], plain: Block) -> Block {
        let mixed = [plain[0] ^ self.feedback[0], plain[1] ^ self.feedback[1]];
        let cipher = xtea::encipher(rounds, mixed, key);
        self.feedback = cipher;
        cipher
    }

    pub fn decrypt_step(&mut self, rounds: u32, key: &[u32; 4], cipher: Block) -> Block {
        let [v0, v1] = xtea::decipher(rounds, cipher, key);
        let plain = [v0 ^ self.feedback[0], v1 ^ self.feedback[1]];
        self.feedback = cipher;
        plain
    }
}

/// Direction of a chained pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Encrypt,
    Decrypt,
}

/// Applies the chained cipher over whole word buffers
#[derive(Debug, Clone)]
pub struct ChainedCodec {
    key: [u32; 4],
    rounds: u32,
}

impl ChainedCodec {
    pub fn new(key: [u32; 4], rounds: u32) -> Self {
        Self { key, rounds }
    }

    pub fn encrypt(&self, words: &[u32]) -> Vec<u32> {
        self.run(Direction::Encrypt, words, |_, _| {})
    }

    pub fn decrypt(&self, words: &[u32]) -> Vec<u32> {
        self.run(Direction::Decrypt, words, |_, _| {})
    }

    /// Run one pass, reporting `(blocks_done, blocks_total)` after every block.
    ///
    /// Only complete 2-word blocks are processed; an odd trailing word is dropped.
    pub fn run<F>(&self, direction: Direction, words: &[u32], mut progress: F) -> Vec<u32>
    where
        F: FnMut(usize, usize),
    {
        let blocks = words.chunks_exact(2);
        let total = blocks.len();
        let mut out = Vec::with_capacity(total * 2);
        let mut state = ChainState::new();

        for (i, block) in blocks.enumerate() {
            let block = [block[0], block[1]];
            let result = match direction {
                Direction::Encrypt => state.encrypt_step(self.rounds, &self.key, block),
                Direction::Decrypt => state.decrypt_step(self.rounds, &self.key, block),
            };
            out.extend(result);
            progress(i + 1, total);
        }

        out
    }
}
