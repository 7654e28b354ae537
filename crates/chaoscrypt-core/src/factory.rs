//! Default [`PrimitiveFactory`] wiring the hyperchaotic primitives together.

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::PrimitiveError;
use crate::chaos::HyperchaosSystem;
use crate::dh::ChebyshevDh;
use crate::feistel::HyperchaosBlockCipher;
use crate::primitive::{BlockCipher, KeyExchange, PrimitiveFactory, SBoxGenerator};
use crate::sbox::HyperchaosBoxGenerator;

/// Builds [`HyperchaosBoxGenerator`], [`HyperchaosBlockCipher`] and
/// [`ChebyshevDh`] instances.
#[derive(Debug, Clone, Copy, Default)]
pub struct HyperchaosPrimitives {
    system: HyperchaosSystem,
}

impl HyperchaosPrimitives {
    /// S-boxes from this factory use the given system parameters.
    pub fn with_system(system: HyperchaosSystem) -> Self {
        Self { system }
    }
}

impl PrimitiveFactory for HyperchaosPrimitives {
    fn sbox_generator(
        &self,
        secret: u64,
        box_size: usize,
    ) -> Result<Box<dyn SBoxGenerator>, PrimitiveError> {
        Ok(Box::new(HyperchaosBoxGenerator::with_system(
            secret,
            box_size,
            self.system,
        )?))
    }

    fn block_cipher(
        &self,
        sbox: &[u32],
        rounds: usize,
        block_size: usize,
    ) -> Result<Box<dyn BlockCipher>, PrimitiveError> {
        Ok(Box::new(HyperchaosBlockCipher::new(
            sbox.to_vec(),
            rounds,
            block_size,
        )?))
    }

    fn key_exchange(
        &self,
        private_bits: u32,
        seed: u64,
    ) -> Result<Box<dyn KeyExchange>, PrimitiveError> {
        let mut rng = StdRng::seed_from_u64(seed);
        Ok(Box::new(ChebyshevDh::new(private_bits, &mut rng)?))
    }
}
