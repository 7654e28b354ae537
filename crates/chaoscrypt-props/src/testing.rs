//! Deterministic primitive doubles with known avalanche behavior.

use std::cell::Cell;

use chaoscrypt_core::{
    BlockCipher, EntropyLabel, ExchangeOutcome, KeyExchange, PrimitiveError, PrimitiveFactory,
    SBoxGenerator, SystemInfo,
};
use num_bigint::BigUint;

/// Every primitive ignores its inputs: 0% difference everywhere.
pub(crate) struct FixedPrimitives;

/// Every primitive changes exactly half of its output: 50% difference.
pub(crate) struct HalfPrimitives;

struct TableGen {
    secret: u64,
    box_size: usize,
    /// Entries actually produced; differs from `box_size` only in
    /// [`OversizedPrimitives`].
    entries: usize,
    shift_upper_half: bool,
}

impl SBoxGenerator for TableGen {
    fn box_size(&self) -> usize {
        self.box_size
    }

    fn generate(&self) -> Result<Vec<u32>, PrimitiveError> {
        let n = self.entries as u64;
        Ok((0..n)
            .map(|i| {
                if self.shift_upper_half && i >= n / 2 {
                    ((i + self.secret) % n) as u32
                } else {
                    i as u32
                }
            })
            .collect())
    }
}

/// First call yields all-zero bytes, later calls `0x0F` bytes.
struct CountingCipher {
    block_size: usize,
    half: bool,
    calls: Cell<usize>,
}

impl BlockCipher for CountingCipher {
    fn block_size(&self) -> usize {
        self.block_size
    }

    fn encrypt(&self, plaintext: &[u8], _key: &[u8]) -> Result<Vec<u8>, PrimitiveError> {
        if plaintext.len() != self.block_size {
            return Err(PrimitiveError::BlockLength {
                expected: self.block_size,
                got: plaintext.len(),
            });
        }
        let n = self.calls.get();
        self.calls.set(n + 1);
        let fill = if self.half && n > 0 { 0x0F } else { 0x00 };
        Ok(vec![fill; self.block_size])
    }
}

/// Baseline secret `0xF0`; variations `0xFF` when `half`, else `0xF0`.
struct LabelExchange {
    private_bits: u32,
    half: bool,
}

impl KeyExchange for LabelExchange {
    fn system_info(&self) -> SystemInfo {
        SystemInfo {
            modulus: BigUint::from(251u32),
            mod_bits: 8,
            param: BigUint::from(3u32),
            param_bits: 2,
            private_bits: self.private_bits,
            public_bits: 2 * self.private_bits,
        }
    }

    fn simulate_exchange(&self, label: EntropyLabel) -> Result<ExchangeOutcome, PrimitiveError> {
        let shared = match label {
            EntropyLabel::AliceShared => 0xF0u32,
            _ if self.half => 0xFF,
            _ => 0xF0,
        };
        let shared = BigUint::from(shared);
        let one = BigUint::from(1u32);
        Ok(ExchangeOutcome {
            label,
            alice_private: one.clone(),
            alice_public: one.clone(),
            alice_raw_public: one.clone(),
            bob_private: one.clone(),
            bob_public: one.clone(),
            bob_raw_public: one,
            shared_secret: shared.clone(),
            bob_shared: shared,
            mod_bits: 8,
        })
    }
}

fn build_sbox(
    secret: u64,
    box_size: usize,
    half: bool,
) -> Result<Box<dyn SBoxGenerator>, PrimitiveError> {
    if box_size == 0 {
        return Err(PrimitiveError::InvalidArgument("box_size must be positive".into()));
    }
    Ok(Box::new(TableGen {
        secret,
        box_size,
        entries: box_size,
        shift_upper_half: half,
    }))
}

impl PrimitiveFactory for FixedPrimitives {
    fn sbox_generator(
        &self,
        secret: u64,
        box_size: usize,
    ) -> Result<Box<dyn SBoxGenerator>, PrimitiveError> {
        build_sbox(secret, box_size, false)
    }

    fn block_cipher(
        &self,
        _sbox: &[u32],
        _rounds: usize,
        block_size: usize,
    ) -> Result<Box<dyn BlockCipher>, PrimitiveError> {
        Ok(Box::new(CountingCipher {
            block_size,
            half: false,
            calls: Cell::new(0),
        }))
    }

    fn key_exchange(
        &self,
        private_bits: u32,
        _seed: u64,
    ) -> Result<Box<dyn KeyExchange>, PrimitiveError> {
        Ok(Box::new(LabelExchange {
            private_bits,
            half: false,
        }))
    }
}

impl PrimitiveFactory for HalfPrimitives {
    fn sbox_generator(
        &self,
        secret: u64,
        box_size: usize,
    ) -> Result<Box<dyn SBoxGenerator>, PrimitiveError> {
        build_sbox(secret, box_size, true)
    }

    fn block_cipher(
        &self,
        _sbox: &[u32],
        _rounds: usize,
        block_size: usize,
    ) -> Result<Box<dyn BlockCipher>, PrimitiveError> {
        Ok(Box::new(CountingCipher {
            block_size,
            half: true,
            calls: Cell::new(0),
        }))
    }

    fn key_exchange(
        &self,
        private_bits: u32,
        _seed: u64,
    ) -> Result<Box<dyn KeyExchange>, PrimitiveError> {
        Ok(Box::new(LabelExchange {
            private_bits,
            half: true,
        }))
    }
}

/// Fails every call.
pub(crate) struct BrokenPrimitives;

impl PrimitiveFactory for BrokenPrimitives {
    fn sbox_generator(
        &self,
        _secret: u64,
        _box_size: usize,
    ) -> Result<Box<dyn SBoxGenerator>, PrimitiveError> {
        Err(PrimitiveError::InvalidArgument("broken".into()))
    }

    fn block_cipher(
        &self,
        _sbox: &[u32],
        _rounds: usize,
        _block_size: usize,
    ) -> Result<Box<dyn BlockCipher>, PrimitiveError> {
        Err(PrimitiveError::InvalidArgument("broken".into()))
    }

    fn key_exchange(
        &self,
        _private_bits: u32,
        _seed: u64,
    ) -> Result<Box<dyn KeyExchange>, PrimitiveError> {
        Err(PrimitiveError::PrimeSearchExhausted {
            bits: 256,
            attempts: 0,
        })
    }
}

/// S-boxes hold three times the requested entries; everything else behaves
/// like [`HalfPrimitives`].
pub(crate) struct OversizedPrimitives;

impl PrimitiveFactory for OversizedPrimitives {
    fn sbox_generator(
        &self,
        secret: u64,
        box_size: usize,
    ) -> Result<Box<dyn SBoxGenerator>, PrimitiveError> {
        Ok(Box::new(TableGen {
            secret,
            box_size,
            entries: 3 * box_size,
            shift_upper_half: true,
        }))
    }

    fn block_cipher(
        &self,
        sbox: &[u32],
        rounds: usize,
        block_size: usize,
    ) -> Result<Box<dyn BlockCipher>, PrimitiveError> {
        HalfPrimitives.block_cipher(sbox, rounds, block_size)
    }

    fn key_exchange(
        &self,
        private_bits: u32,
        seed: u64,
    ) -> Result<Box<dyn KeyExchange>, PrimitiveError> {
        HalfPrimitives.key_exchange(private_bits, seed)
    }
}
