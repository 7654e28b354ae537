//! Feistel block cipher keyed through the hyperchaotic system.
//!
//! Round keys are read from the chaotic keystream seeded by SHA-256 of the
//! key. The round function XORs the round key in, substitutes every byte
//! through the S-box and applies one of three neighbour-mixing patterns
//! chosen by the round number.
//!
//! [`BlockCipher::encrypt`] is the deterministic single-block operation the
//! avalanche tests measure. Whole messages go through CBC mode with PKCS#7
//! padding and a caller-supplied IV.

use serde::Serialize;

use crate::PrimitiveError;
use crate::chaos::{HyperchaosSystem, initial_state_from_bytes};
use crate::primitive::BlockCipher;

/// Keystream samples discarded before the round keys are read.
const ROUND_KEY_SKIP: usize = 200;

/// Length of the key derived from the S-box when none is given.
const DERIVED_KEY_LEN: usize = 32;

/// Public cipher parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CipherInfo {
    pub rounds: usize,
    pub block_size: usize,
    pub sbox_size: usize,
}

#[derive(Debug, Clone)]
pub struct HyperchaosBlockCipher {
    sbox: Vec<u32>,
    rounds: usize,
    block_size: usize,
    system: HyperchaosSystem,
}

impl HyperchaosBlockCipher {
    pub fn new(sbox: Vec<u32>, rounds: usize, block_size: usize) -> Result<Self, PrimitiveError> {
        if sbox.is_empty() {
            return Err(PrimitiveError::invalid("S-box must not be empty"));
        }
        if rounds == 0 {
            return Err(PrimitiveError::invalid("rounds must be at least 1"));
        }
        if block_size < 2 || block_size % 2 != 0 {
            return Err(PrimitiveError::invalid(format!(
                "block_size must be an even number >= 2, got {block_size}"
            )));
        }
        Ok(Self {
            sbox,
            rounds,
            block_size,
            system: HyperchaosSystem::default(),
        })
    }

    pub fn info(&self) -> CipherInfo {
        CipherInfo {
            rounds: self.rounds,
            block_size: self.block_size,
            sbox_size: self.sbox.len(),
        }
    }

    /// An empty key is replaced by the first 32 S-box entries.
    fn derive_key(&self, key: &[u8]) -> Vec<u8> {
        if !key.is_empty() {
            return key.to_vec();
        }
        let mut derived = vec![0u8; DERIVED_KEY_LEN];
        for (slot, &entry) in derived.iter_mut().zip(&self.sbox) {
            *slot = (entry % 256) as u8;
        }
        derived
    }

    fn round_keys(&self, key: &[u8]) -> Vec<Vec<u8>> {
        let initial = initial_state_from_bytes(&self.derive_key(key));
        self.system
            .generate_block(&initial, self.block_size / 2, self.rounds, ROUND_KEY_SKIP)
    }

    fn round_function(&self, half: &[u8], round_key: &[u8], round: usize) -> Vec<u8> {
        let len = half.len();
        let substituted: Vec<u8> = half
            .iter()
            .enumerate()
            .map(|(i, &b)| {
                let keyed = b ^ round_key[i % round_key.len()];
                (self.sbox[keyed as usize % self.sbox.len()] & 0xFF) as u8
            })
            .collect();

        let r = (round % 256) as u8;
        (0..len)
            .map(|i| {
                let cur = substituted[i];
                let prev = substituted[(i + len - 1) % len];
                let next = substituted[(i + 1) % len];
                match round % 3 {
                    0 => cur.rotate_right(1) ^ prev.wrapping_add(r),
                    1 => cur.rotate_left(2) ^ next.wrapping_add(r),
                    _ => (cur ^ prev ^ next).wrapping_add(r),
                }
            })
            .collect()
    }

    fn process_block(&self, block: &[u8], round_keys: &[Vec<u8>], encrypt: bool) -> Vec<u8> {
        let half = block.len() / 2;
        let mut left = block[..half].to_vec();
        let mut right = block[half..].to_vec();

        let order: Box<dyn Iterator<Item = usize>> = if encrypt {
            Box::new(0..self.rounds)
        } else {
            Box::new((0..self.rounds).rev())
        };
        for round in order {
            let transformed = self.round_function(&right, &round_keys[round], round);
            let new_left: Vec<u8> = left
                .iter()
                .enumerate()
                .map(|(i, &b)| b ^ transformed[i % transformed.len()])
                .collect();
            left = std::mem::replace(&mut right, new_left);
        }

        right.extend_from_slice(&left);
        right
    }

    fn check_block(&self, block: &[u8]) -> Result<(), PrimitiveError> {
        if block.len() != self.block_size {
            return Err(PrimitiveError::BlockLength {
                expected: self.block_size,
                got: block.len(),
            });
        }
        Ok(())
    }

    /// Encrypt one block.
    pub fn encrypt_block(&self, plaintext: &[u8], key: &[u8]) -> Result<Vec<u8>, PrimitiveError> {
        self.check_block(plaintext)?;
        Ok(self.process_block(plaintext, &self.round_keys(key), true))
    }

    /// Invert [`encrypt_block`](Self::encrypt_block).
    pub fn decrypt_block(&self, ciphertext: &[u8], key: &[u8]) -> Result<Vec<u8>, PrimitiveError> {
        self.check_block(ciphertext)?;
        Ok(self.process_block(ciphertext, &self.round_keys(key), false))
    }

    /// CBC-encrypt a message of any length. The IV is prepended to the output.
    pub fn encrypt_cbc(
        &self,
        plaintext: &[u8],
        key: &[u8],
        iv: &[u8],
    ) -> Result<Vec<u8>, PrimitiveError> {
        self.check_block(iv)?;
        let round_keys = self.round_keys(key);
        let padded = pkcs7_pad(plaintext, self.block_size);

        let mut out = iv.to_vec();
        let mut prev = iv.to_vec();
        for block in padded.chunks(self.block_size) {
            let xored: Vec<u8> = block.iter().zip(&prev).map(|(a, b)| a ^ b).collect();
            prev = self.process_block(&xored, &round_keys, true);
            out.extend_from_slice(&prev);
        }
        Ok(out)
    }

    /// Decrypt the output of [`encrypt_cbc`](Self::encrypt_cbc).
    pub fn decrypt_cbc(&self, ciphertext: &[u8], key: &[u8]) -> Result<Vec<u8>, PrimitiveError> {
        if ciphertext.len() < self.block_size || ciphertext.len() % self.block_size != 0 {
            return Err(PrimitiveError::BlockLength {
                expected: self.block_size,
                got: ciphertext.len() % self.block_size,
            });
        }
        let (iv, body) = ciphertext.split_at(self.block_size);
        if body.is_empty() {
            return Ok(Vec::new());
        }
        let round_keys = self.round_keys(key);

        let mut plain = Vec::with_capacity(body.len());
        let mut prev = iv;
        for block in body.chunks(self.block_size) {
            let decrypted = self.process_block(block, &round_keys, false);
            plain.extend(decrypted.iter().zip(prev).map(|(a, b)| a ^ b));
            prev = block;
        }
        pkcs7_unpad(plain, self.block_size)
    }
}

impl BlockCipher for HyperchaosBlockCipher {
    fn block_size(&self) -> usize {
        self.block_size
    }

    fn encrypt(&self, plaintext: &[u8], key: &[u8]) -> Result<Vec<u8>, PrimitiveError> {
        self.encrypt_block(plaintext, key)
    }
}

fn pkcs7_pad(data: &[u8], block_size: usize) -> Vec<u8> {
    let pad = block_size - data.len() % block_size;
    let mut out = Vec::with_capacity(data.len() + pad);
    out.extend_from_slice(data);
    out.resize(data.len() + pad, pad as u8);
    out
}

fn pkcs7_unpad(mut data: Vec<u8>, block_size: usize) -> Result<Vec<u8>, PrimitiveError> {
    let pad = *data.last().ok_or(PrimitiveError::InvalidPadding)? as usize;
    if pad == 0 || pad > block_size || pad > data.len() {
        return Err(PrimitiveError::InvalidPadding);
    }
    if data[data.len() - pad..].iter().any(|&b| b as usize != pad) {
        return Err(PrimitiveError::InvalidPadding);
    }
    data.truncate(data.len() - pad);
    Ok(data)
}
